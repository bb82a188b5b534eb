pub mod cache;
pub mod client;

pub use client::{audio_data_uri, SynthesisClient, SynthesisRequest, DEFAULT_ENDPOINT};
