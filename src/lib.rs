pub mod acquisition;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod page;
pub mod slot;

#[cfg(test)]
mod testing;

pub use acquisition::{AttemptState, ImageAcquirer, RATE_LIMIT_RETRY_DELAY};
pub use config::{Config, GeminiConfig};
pub use error::{GenerationError, Result};
pub use gemini::{GeminiImageClient, ImageProvider};
pub use models::{
    AspectRatio, GeneratedImage, ImagePayload, ImageRequest, ImageResult, SlotKind, SlotSpec,
    SlotStatus,
};
pub use page::Page;
pub use slot::Slot;
