use crate::{
    acquisition::ImageAcquirer,
    models::{SlotSpec, SlotStatus},
    slot::Slot,
};
use futures::future::join_all;

/// All decorative slots of one rendered page. Each slot runs independently;
/// the page only groups them.
pub struct Page {
    slots: Vec<Slot>,
}

impl Page {
    pub fn mount(acquirer: &ImageAcquirer, specs: impl IntoIterator<Item = SlotSpec>) -> Self {
        let slots: Vec<Slot> = specs
            .into_iter()
            .map(|spec| Slot::mount(acquirer.clone(), spec))
            .collect();
        log::info!("Mounted {} decorative slots", slots.len());
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id() == id)
    }

    pub fn statuses(&self) -> Vec<(String, SlotStatus)> {
        self.slots
            .iter()
            .map(|slot| (slot.id().to_string(), slot.status()))
            .collect()
    }

    pub fn loading_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.status().loading).count()
    }

    /// Waits until every slot has resolved and returns `(id, uri)` in mount
    /// order.
    pub async fn settle(&self) -> Vec<(String, String)> {
        let uris = join_all(self.slots.iter().map(|slot| slot.ready())).await;
        self.slots
            .iter()
            .map(|slot| slot.id().to_string())
            .zip(uris)
            .collect()
    }
}
