use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, ReverieError};

/// State reported by a remote generation job.
///
/// Anything a provider reports that is not recognizably terminal maps to
/// `Pending`; `Complete` always carries the job's assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Complete { assets: Vec<String> },
    Failed { reason: String },
}

/// Fixed-interval, bounded polling parameters.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval_secs: u64, max_attempts: u32) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            max_attempts,
        }
    }
}

/// Poll a job until it reaches a terminal state.
///
/// Runs at most `max_attempts` polls with one outstanding request at a time,
/// sleeping for the fixed interval between pending reports. A `Failed` report
/// stops immediately with the provider's reason; exhausting the attempt cap
/// is a timeout, distinct from a provider-reported failure. Transport errors
/// from the poll function propagate unchanged.
pub async fn poll_until_complete<F, Fut>(
    stage: &str,
    policy: PollPolicy,
    mut poll: F,
) -> Result<Vec<String>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobState>>,
{
    for attempt in 1..=policy.max_attempts {
        match poll().await? {
            JobState::Complete { assets } => {
                info!("{} job completed after {} polls", stage, attempt);
                return Ok(assets);
            }
            JobState::Failed { reason } => {
                return Err(ReverieError::Provider {
                    stage: stage.to_string(),
                    reason,
                });
            }
            JobState::Pending => {
                debug!(
                    "{} job still pending (attempt {}/{})",
                    stage, attempt, policy.max_attempts
                );
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(ReverieError::Timeout {
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn instant_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::ZERO,
            max_attempts,
        }
    }

    fn scripted_poll(
        states: Vec<JobState>,
    ) -> (
        impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<JobState>>>>,
        Arc<AtomicU32>,
    ) {
        let queue = Arc::new(Mutex::new(states.into_iter().collect::<VecDeque<_>>()));
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let poll = move || {
            let queue = queue.clone();
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(queue.lock().unwrap().pop_front().unwrap_or(JobState::Pending))
            }) as std::pin::Pin<Box<dyn Future<Output = Result<JobState>>>>
        };
        (poll, calls)
    }

    #[tokio::test]
    async fn returns_assets_after_exactly_as_many_polls_as_pending_states() {
        let (poll, calls) = scripted_poll(vec![
            JobState::Pending,
            JobState::Pending,
            JobState::Complete {
                assets: vec!["u1".to_string(), "u2".to_string()],
            },
        ]);

        let assets = poll_until_complete("image", instant_policy(10), poll)
            .await
            .unwrap();

        assert_eq!(assets, vec!["u1".to_string(), "u2".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_immediately_on_provider_failure() {
        let (poll, calls) = scripted_poll(vec![
            JobState::Pending,
            JobState::Failed {
                reason: "nsfw filter triggered".to_string(),
            },
            JobState::Complete { assets: vec![] },
        ]);

        let err = poll_until_complete("video", instant_policy(10), poll)
            .await
            .unwrap_err();

        match err {
            ReverieError::Provider { stage, reason } => {
                assert_eq!(stage, "video");
                assert_eq!(reason, "nsfw filter triggered");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn times_out_after_exactly_max_attempts_polls() {
        let (poll, calls) = scripted_poll(vec![]);

        let err = poll_until_complete("image", instant_policy(5), poll)
            .await
            .unwrap_err();

        match err {
            ReverieError::Timeout { attempts } => assert_eq!(attempts, 5),
            other => panic!("expected timeout error, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn transport_errors_propagate_without_further_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let poll = move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ReverieError::Download("connection reset".to_string()))
            }
        };

        let err = poll_until_complete("image", instant_policy(10), poll)
            .await
            .unwrap_err();

        assert!(matches!(err, ReverieError::Download(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
