//! Best-effort acquisition of decorative artwork.
//!
//! An attempt waits out its slot's stagger delay, asks the provider for an
//! image and, if the provider answers with a rate limit, waits
//! [`RATE_LIMIT_RETRY_DELAY`] and asks exactly once more. Whatever happens the
//! attempt ends in [`ImageResult::Ready`]: either a data URI of the generated
//! bytes or the slot's fallback URI. Errors never leave this module.

use crate::{
    error::{GenerationError, Result},
    gemini::ImageProvider,
    models::{ImagePayload, ImageRequest, ImageResult},
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Fixed wait before the single rate-limit retry.
pub const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Created,
    Staggering,
    Requesting,
    Retrying,
    Resolved,
}

/// Bookkeeping for one acquisition attempt.
#[derive(Debug)]
struct Attempt {
    id: String,
    state: AttemptState,
    retried: bool,
}

impl Attempt {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            state: AttemptState::Created,
            retried: false,
        }
    }

    fn enter(&mut self, next: AttemptState) {
        debug_assert!(self.state != AttemptState::Resolved, "attempt already resolved");
        log::debug!("[attempt:{}] {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    /// Moves to `Retrying` unless this attempt has already retried.
    fn begin_retry(&mut self) -> bool {
        if self.retried {
            return false;
        }
        self.retried = true;
        self.enter(AttemptState::Retrying);
        true
    }
}

#[derive(Clone)]
pub struct ImageAcquirer {
    provider: Arc<dyn ImageProvider>,
}

impl ImageAcquirer {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    /// Runs one attempt to completion. Never returns `Pending`.
    pub async fn acquire(&self, request: &ImageRequest, fallback_uri: &str) -> ImageResult {
        let mut attempt = Attempt::new();

        if !request.wants_generation() {
            log::debug!("[attempt:{}] empty prompt, using fallback", attempt.id);
            attempt.enter(AttemptState::Resolved);
            return ImageResult::Ready(fallback_uri.to_string());
        }

        attempt.enter(AttemptState::Staggering);
        let delay = request.stagger_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let uri = match self.fetch(&mut attempt, request).await {
            Ok(payload) => {
                log::info!(
                    "[attempt:{}] generated {} bytes of {}",
                    attempt.id,
                    payload.bytes.len(),
                    payload.mime_type
                );
                payload.to_data_uri()
            }
            Err(e) => {
                log::warn!(
                    "[attempt:{}] image generation failed (using fallback): {}",
                    attempt.id,
                    e
                );
                fallback_uri.to_string()
            }
        };

        attempt.enter(AttemptState::Resolved);
        ImageResult::Ready(uri)
    }

    async fn fetch(&self, attempt: &mut Attempt, request: &ImageRequest) -> Result<ImagePayload> {
        attempt.enter(AttemptState::Requesting);
        match self.request_once(request).await {
            Err(e) if e.is_rate_limited() && attempt.begin_retry() => {
                log::warn!("[attempt:{}] Rate limited ({}). Retrying in 2s...", attempt.id, e);
                tokio::time::sleep(RATE_LIMIT_RETRY_DELAY).await;
                attempt.enter(AttemptState::Requesting);
                self.request_once(request).await
            }
            other => other,
        }
    }

    async fn request_once(&self, request: &ImageRequest) -> Result<ImagePayload> {
        let generated = self
            .provider
            .generate(request.prompt(), request.aspect_ratio())
            .await?;

        generated
            .payload
            .ok_or_else(|| GenerationError::MalformedResponse("response carried no image".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;
    use crate::testing::{Reply, ScriptedProvider};
    use tokio::time::Instant;

    const FALLBACK: &str = "https://example.com/fallback.png";

    fn acquirer(provider: &Arc<ScriptedProvider>) -> ImageAcquirer {
        ImageAcquirer::new(provider.clone())
    }

    fn png(bytes: &[u8]) -> ImagePayload {
        ImagePayload::png(bytes.to_vec())
    }

    #[tokio::test(start_paused = true)]
    async fn empty_prompt_resolves_to_fallback_without_calls() {
        let provider = ScriptedProvider::new(vec![]);
        let request = ImageRequest::new("", AspectRatio::Square, 1000);

        let result = acquirer(&provider).acquire(&request, "X").await;

        assert_eq!(result, ImageResult::Ready("X".into()));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn payload_becomes_data_uri() {
        let provider = ScriptedProvider::new(vec![Reply::Image(png(b"art"))]);
        let request = ImageRequest::new("p", AspectRatio::Widescreen, 0);

        let result = acquirer(&provider).acquire(&request, FALLBACK).await;

        assert_eq!(result, ImageResult::Ready(png(b"art").to_data_uri()));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.calls()[0].aspect_ratio, AspectRatio::Widescreen);
    }

    #[tokio::test(start_paused = true)]
    async fn success_without_payload_falls_back() {
        let provider = ScriptedProvider::new(vec![Reply::Empty]);
        let request = ImageRequest::new("p", AspectRatio::Square, 0);

        let result = acquirer(&provider).acquire(&request, FALLBACK).await;

        assert_eq!(result, ImageResult::Ready(FALLBACK.into()));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_retries_once_after_two_seconds() {
        let provider = ScriptedProvider::new(vec![
            Reply::Fail(GenerationError::from_status(429, "slow down")),
            Reply::Image(png(b"b")),
        ]);
        let request = ImageRequest::new("p", AspectRatio::Square, 0);

        let result = acquirer(&provider).acquire(&request, FALLBACK).await;

        assert_eq!(result, ImageResult::Ready(png(b"b").to_data_uri()));
        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].at - calls[0].at >= RATE_LIMIT_RETRY_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_detected_from_message() {
        let provider = ScriptedProvider::new(vec![
            Reply::Fail(GenerationError::unavailable("got HTTP 429 from upstream")),
            Reply::Image(png(b"b")),
        ]);
        let request = ImageRequest::new("p", AspectRatio::Square, 0);

        let result = acquirer(&provider).acquire(&request, FALLBACK).await;

        assert!(result.uri().unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn second_rate_limit_is_not_retried() {
        let provider = ScriptedProvider::new(vec![
            Reply::Fail(GenerationError::from_status(429, "slow down")),
            Reply::Fail(GenerationError::from_status(429, "still slow")),
            Reply::Image(png(b"never")),
        ]);
        let request = ImageRequest::new("p", AspectRatio::Square, 0);

        let result = acquirer(&provider).acquire(&request, FALLBACK).await;

        assert_eq!(result, ImageResult::Ready(FALLBACK.into()));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_without_payload_falls_back() {
        let provider = ScriptedProvider::new(vec![
            Reply::Fail(GenerationError::from_status(429, "slow down")),
            Reply::Empty,
        ]);
        let request = ImageRequest::new("p", AspectRatio::Square, 0);

        let result = acquirer(&provider).acquire(&request, FALLBACK).await;

        assert_eq!(result, ImageResult::Ready(FALLBACK.into()));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn other_failures_fall_back_without_retry() {
        for error in [
            GenerationError::from_status(500, "internal"),
            GenerationError::unavailable("connection refused"),
            GenerationError::MalformedResponse("not json".into()),
            GenerationError::Config("no key".into()),
        ] {
            let provider = ScriptedProvider::new(vec![Reply::Fail(error), Reply::Image(png(b"x"))]);
            let request = ImageRequest::new("p", AspectRatio::Square, 0);

            let result = acquirer(&provider).acquire(&request, FALLBACK).await;

            assert_eq!(result, ImageResult::Ready(FALLBACK.into()));
            assert_eq!(provider.call_count(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn call_is_not_issued_before_stagger_delay() {
        let provider = ScriptedProvider::new(vec![Reply::Image(png(b"x"))]);
        let request = ImageRequest::new("p", AspectRatio::Widescreen, 2500);
        let started = Instant::now();

        acquirer(&provider).acquire(&request, FALLBACK).await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].at - started >= Duration::from_millis(2500));
    }

    #[test]
    fn retry_is_granted_once() {
        let mut attempt = Attempt::new();
        attempt.enter(AttemptState::Requesting);
        assert!(attempt.begin_retry());
        assert_eq!(attempt.state, AttemptState::Retrying);
        attempt.enter(AttemptState::Requesting);
        assert!(!attempt.begin_retry());
        assert_eq!(attempt.state, AttemptState::Requesting);
    }
}
