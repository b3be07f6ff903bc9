//! In-memory provider used by the unit tests.

use crate::{
    error::{GenerationError, Result},
    gemini::ImageProvider,
    models::{AspectRatio, GeneratedImage, ImagePayload},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub enum Reply {
    Image(ImagePayload),
    Empty,
    Fail(GenerationError),
    /// Answers with the image after sleeping.
    Slow(Duration, ImagePayload),
    Panic,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub at: Instant,
}

/// Replays `Reply` values in order and records every call it receives.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
    completed: Mutex<usize>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            completed: Mutex::new(0),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls that ran to the end, slow ones included.
    pub fn completed(&self) -> usize {
        *self.completed.lock().unwrap()
    }
}

#[async_trait]
impl ImageProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<GeneratedImage> {
        self.calls.lock().unwrap().push(Call {
            prompt: prompt.to_string(),
            aspect_ratio,
            at: Instant::now(),
        });

        let reply = self.replies.lock().unwrap().pop_front();
        let outcome = match reply {
            Some(Reply::Image(payload)) => Ok(GeneratedImage::with_payload(payload)),
            Some(Reply::Empty) => Ok(GeneratedImage::empty()),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Slow(delay, payload)) => {
                tokio::time::sleep(delay).await;
                Ok(GeneratedImage::with_payload(payload))
            }
            Some(Reply::Panic) => panic!("provider blew up"),
            None => Err(GenerationError::unavailable("script exhausted")),
        };
        *self.completed.lock().unwrap() += 1;
        outcome
    }
}
