//! Animove API Library
//!
//! HTTP relay between clients and the video-synthesis API: uploads, task
//! submission, status polling, result download and static file serving.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod registry;
pub mod services;
pub mod setup;
pub mod telemetry;
mod utils;

pub mod error;
pub mod state;

pub use error::{EnvelopeError, ErrorResponse, HttpAppError};
pub use registry::TaskRegistry;
pub use state::AppState;
