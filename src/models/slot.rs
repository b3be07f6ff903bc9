use super::image::{ImageRequest, ImageResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Hero,
    Project,
    Featured,
}

/// Everything a decorative slot needs to mount its acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub id: String,
    /// Human-readable name used in logs; defaults to the id.
    pub title: String,
    pub kind: SlotKind,
    pub request: ImageRequest,
    pub fallback_uri: String,
}

impl SlotSpec {
    pub fn new(
        id: impl Into<String>,
        kind: SlotKind,
        request: ImageRequest,
        fallback_uri: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            kind,
            request,
            fallback_uri: fallback_uri.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Read-only view the presentation layer polls to pick between a loading
/// placeholder and the final image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub loading: bool,
    pub resolved_uri: Option<String>,
}

impl From<&ImageResult> for SlotStatus {
    fn from(result: &ImageResult) -> Self {
        match result {
            ImageResult::Pending => SlotStatus {
                loading: true,
                resolved_uri: None,
            },
            ImageResult::Ready(uri) => SlotStatus {
                loading: false,
                resolved_uri: Some(uri.clone()),
            },
        }
    }
}
