pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod gemini;
pub mod generator;
pub mod local_server;
pub mod models;
pub mod preview;
pub mod utils;
pub mod view;
pub mod websocket;

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;

pub use config::AppConfig;
pub use controller::{Controller, Phase, Studio, ViewState};
pub use error::{FailureKind, GenerationError};
pub use gemini::GeminiClient;
pub use generator::{AdGenerator, GenerateAd};
pub use models::{AdCopy, BusinessField, BusinessInfo, GeneratedAd};
