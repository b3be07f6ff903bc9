use crate::{
    acquisition::ImageAcquirer,
    models::{ImageResult, SlotSpec, SlotStatus},
};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Publishes an attempt's terminal result. If the attempt's task unwinds
/// before resolving, dropping this publishes the fallback instead.
struct Resolution {
    tx: watch::Sender<ImageResult>,
    fallback_uri: String,
}

impl Resolution {
    /// Only the first `Ready` is kept; later ones are ignored.
    fn resolve(&self, result: ImageResult) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_ready() || !result.is_ready() {
                return false;
            }
            *current = result;
            true
        })
    }
}

impl Drop for Resolution {
    fn drop(&mut self) {
        if self.resolve(ImageResult::Ready(self.fallback_uri.clone())) {
            log::error!("Attempt ended without a result, published fallback");
        }
    }
}

/// One mounted decorative slot. The acquisition attempt runs on its own
/// task; dropping the slot discards the result but leaves any in-flight
/// provider call alone.
pub struct Slot {
    spec: SlotSpec,
    rx: watch::Receiver<ImageResult>,
}

impl Slot {
    /// Must be called from within a tokio runtime.
    pub fn mount(acquirer: ImageAcquirer, spec: SlotSpec) -> Self {
        let (tx, rx) = watch::channel(ImageResult::Pending);
        let resolution = Resolution {
            tx,
            fallback_uri: spec.fallback_uri.clone(),
        };
        let request = spec.request.clone();
        let id = spec.id.clone();
        let title = spec.title.clone();

        log::debug!(
            "Mounting slot '{}' (stagger {}ms)",
            id,
            request.stagger_delay().as_millis()
        );

        tokio::spawn(async move {
            let result = acquirer.acquire(&request, &resolution.fallback_uri).await;
            let fell_back = result.uri() == Some(resolution.fallback_uri.as_str());
            if request.wants_generation() && fell_back {
                log::warn!("Failed to generate image for {} (using fallback)", title);
            }
            if resolution.resolve(result) {
                log::debug!("Slot '{}' resolved", id);
            }
        });

        Self { spec, rx }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn spec(&self) -> &SlotSpec {
        &self.spec
    }

    pub fn status(&self) -> SlotStatus {
        SlotStatus::from(&*self.rx.borrow())
    }

    pub fn result(&self) -> ImageResult {
        self.rx.borrow().clone()
    }

    /// Current result followed by every change (at most one).
    pub fn updates(&self) -> WatchStream<ImageResult> {
        WatchStream::new(self.rx.clone())
    }

    /// Waits for the slot to resolve and returns the URI to display.
    pub async fn ready(&self) -> String {
        let mut rx = self.rx.clone();
        let uri = match rx.wait_for(ImageResult::is_ready).await {
            Ok(result) => result.uri().unwrap_or(&self.spec.fallback_uri).to_string(),
            Err(_) => self.spec.fallback_uri.clone(),
        };
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, ImagePayload, ImageRequest, SlotKind};
    use crate::testing::{Reply, ScriptedProvider};
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;

    const FALLBACK: &str = "https://example.com/fallback.png";

    fn spec(prompt: &str, stagger_ms: u64) -> SlotSpec {
        SlotSpec::new(
            "project-1",
            SlotKind::Project,
            ImageRequest::new(prompt, AspectRatio::Widescreen, stagger_ms),
            FALLBACK,
        )
    }

    fn mount(provider: &Arc<ScriptedProvider>, spec: SlotSpec) -> Slot {
        Slot::mount(ImageAcquirer::new(provider.clone()), spec)
    }

    #[tokio::test(start_paused = true)]
    async fn loading_until_resolved() {
        let provider = ScriptedProvider::new(vec![Reply::Image(ImagePayload::png(b"a".to_vec()))]);
        let slot = mount(&provider, spec("p", 1000));

        assert_eq!(
            slot.status(),
            SlotStatus {
                loading: true,
                resolved_uri: None
            }
        );

        let uri = slot.ready().await;
        let status = slot.status();
        assert!(!status.loading);
        assert_eq!(status.resolved_uri.as_deref(), Some(uri.as_str()));
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[tokio::test(start_paused = true)]
    async fn updates_go_from_pending_to_ready_once() {
        let provider = ScriptedProvider::new(vec![Reply::Fail(
            crate::error::GenerationError::from_status(500, "down"),
        )]);
        let slot = mount(&provider, spec("p", 0));

        let mut updates = slot.updates();
        assert_eq!(updates.next().await, Some(ImageResult::Pending));
        assert_eq!(updates.next().await, Some(ImageResult::Ready(FALLBACK.into())));

        // The attempt's task has finished and closed the channel.
        assert_eq!(updates.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_slot_does_not_cancel_the_call() {
        let provider = ScriptedProvider::new(vec![Reply::Slow(
            Duration::from_secs(3),
            ImagePayload::png(b"late".to_vec()),
        )]);
        let slot = mount(&provider, spec("p", 0));
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(slot);

        assert_eq!(provider.completed(), 0);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_keeps_its_title() {
        let provider = ScriptedProvider::new(vec![Reply::Empty]);
        let slot = mount(&provider, spec("p", 0).with_title("Archvision: Homebuilder"));

        assert_eq!(slot.ready().await, FALLBACK);
        assert_eq!(slot.spec().title, "Archvision: Homebuilder");
        assert_eq!(slot.id(), "project-1");
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_provider_still_resolves_to_fallback() {
        let provider = ScriptedProvider::new(vec![Reply::Panic]);
        let slot = mount(&provider, spec("p", 0));

        assert_eq!(slot.ready().await, FALLBACK);
        assert_eq!(slot.result(), ImageResult::Ready(FALLBACK.into()));
    }

    #[test]
    fn resolution_keeps_first_ready() {
        let (tx, rx) = watch::channel(ImageResult::Pending);
        let resolution = Resolution {
            tx,
            fallback_uri: "fb".into(),
        };

        assert!(!resolution.resolve(ImageResult::Pending));
        assert!(resolution.resolve(ImageResult::Ready("first".into())));
        assert!(!resolution.resolve(ImageResult::Ready("second".into())));
        drop(resolution);

        assert_eq!(*rx.borrow(), ImageResult::Ready("first".into()));
    }
}
