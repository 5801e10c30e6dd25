//! Reverie - Automated Generative Video Pipeline
//!
//! A Rust implementation of an automated pipeline that generates a set of
//! images with Leonardo AI, animates them into a video with Luma AI, and
//! burns in captions and a voice-over track using ffmpeg.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod job;
pub mod media;
pub mod pipeline;
