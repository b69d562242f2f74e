//! Outbound adapter for the AI adventure subsystem.

mod dto;
mod http_client;

pub use http_client::{
    AdventureHttpSource, AiClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT,
};
