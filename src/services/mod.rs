//! Desktop simulator services.
//!
//! The watch's platform pieces, replaced by desktop equivalents:
//! - `web`: Axum HTTP API standing in for the companion message channel
//! - `ticker`: tokio interval standing in for the timer tick service
//!
//! Both drive a single [`WatchFace`](crate::face::WatchFace) through
//! `SharedFace<R, S>` wrapped in `Arc`.
//!
//! # Shared State Pattern
//!
//! ```ignore
//! use std::sync::Arc;
//! use aviator_face::services::{LocalClock, SharedFace};
//!
//! let state = Arc::new(SharedFace::new(face, LocalClock));
//!
//! tokio::spawn(run_ticker(Arc::clone(&state), 1000));
//! run_server_with_state(state, web_config).await?;
//! ```

pub mod api;
pub mod shared;
pub mod ticker;
pub mod web;

pub use api::*;
pub use shared::*;
pub use ticker::*;
pub use web::*;
