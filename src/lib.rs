//! Vision analysis relay.
//!
//! Accepts an image or video source (local path or http(s) URL) plus a prompt,
//! validates and encodes the source, forwards it to a chat-completions vision
//! model, and returns a normalized success/failure result. Failures are
//! classified into a fixed taxonomy before they reach the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vision_relay::prelude::*;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(VisionConfig::from_env()?);
//! let pipeline = AnalysisPipeline::new(config);
//! let text = pipeline
//!     .analyze(MediaKind::Image, "./photo.png", "What is in this picture?")
//!     .await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod media;
pub mod pipeline;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
