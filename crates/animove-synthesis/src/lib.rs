//! Animove Synthesis Library
//!
//! Client for the asynchronous video-synthesis API (DashScope `animate-move`):
//! task submission, status queries with result normalization, and streaming
//! download of finished artifacts.

pub mod client;
pub mod error;
pub mod types;

pub use client::{
    DashScopeClient, SynthesisProvider, DOWNLOAD_TIMEOUT, QUERY_TIMEOUT, SUBMIT_TIMEOUT,
};
pub use error::SynthesisError;
pub use types::{ResultsPayload, SubmitOutcome, SubmitTask, TaskSnapshot};
