pub mod image_client;

use crate::{
    error::Result,
    models::{AspectRatio, GeneratedImage},
};
use async_trait::async_trait;

pub use image_client::GeminiImageClient;

/// A generative image backend. Implementations report failures through
/// `GenerationError`; the acquisition layer decides what to do with them.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<GeneratedImage>;
}
