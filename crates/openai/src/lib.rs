//! OpenAI image generation client.
//!
//! Wraps the `/v1/images/generations` endpoint with round-robin API-key
//! selection ([`keys::KeyRing`]) and exponential-backoff retry
//! ([`retry::RetryConfig`]). [`client::GenerationClient`] implements the
//! pipeline's [`ImageGenerator`](promptsheet_core::ports::ImageGenerator)
//! port.

pub mod api;
pub mod client;
pub mod keys;
pub mod retry;

pub use client::{GenerationClient, GenerationConfig};
