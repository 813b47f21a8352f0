//! Gemini `generateContent` client.
//!
//! Each call sends the whole conversation; the API keeps no state between
//! calls.

mod api;
mod client;
mod config;


pub use client::GeminiClient;
pub use config::{GeminiConfig, DEFAULT_MODEL};
