//! # Campaign Gemini
//!
//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Text parts and inline image parts of the first candidate are mapped onto
//! the core `ModelResponse`.

pub mod client;
pub mod error;
mod wire;

pub use client::{GeminiClient, DEFAULT_API_BASE};
pub use error::GeminiError;
