use crate::error::GenerationError;
use crate::generator::{CopyWriter, EncodedImage, ImageRenderer, ImageRequest};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Notify;

/// Start of a JPEG file, base64 encoded.
pub const JPEG_BASE64: &str = "/9j/4AAQSkZJRg==";

pub struct MockCopyWriter {
    reply: Result<String, fn() -> GenerationError>,
    gate: Option<Arc<Notify>>,
}

impl MockCopyWriter {
    pub fn replying(raw: &str) -> Self {
        Self {
            reply: Ok(raw.to_string()),
            gate: None,
        }
    }

    pub fn failing(error: fn() -> GenerationError) -> Self {
        Self {
            reply: Err(error),
            gate: None,
        }
    }

    /// Holds the reply back until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl CopyWriter for MockCopyWriter {
    async fn write_copy(&self, _prompt: &str, _schema: &Value) -> Result<String, GenerationError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Ok(raw) => Ok(raw.clone()),
            Err(error) => Err(error()),
        }
    }
}

pub struct MockImageRenderer {
    images: Vec<EncodedImage>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageRenderer {
    pub fn with_images(count: usize) -> Self {
        Self::returning(
            (0..count)
                .map(|_| EncodedImage {
                    bytes_base64: JPEG_BASE64.to_string(),
                })
                .collect(),
        )
    }

    pub fn returning(images: Vec<EncodedImage>) -> Self {
        Self {
            images,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts this renderer has been asked to draw.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl ImageRenderer for MockImageRenderer {
    async fn render(
        &self,
        prompt: &str,
        _request: &ImageRequest,
    ) -> Result<Vec<EncodedImage>, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.images.clone())
    }
}
