//! The portfolio's decorative slots: prompts, aspect ratios, stagger offsets
//! and static fallbacks.

use crate::models::{AspectRatio, ImageRequest, SlotKind, SlotSpec};

pub const HERO_STAGGER_MS: u64 = 0;
pub const FEATURED_STAGGER_MS: u64 = 500;
pub const PROJECT_STAGGER_BASE_MS: u64 = 1000;
pub const PROJECT_STAGGER_STEP_MS: u64 = 1500;

pub const HERO_PROMPT: &str = "A high-fidelity, stylized 3D animation illustration of a confident Black woman in an IT role. She is wearing a professional white jacket, a light gray top, and dark gray pants. She is in a high-tech workspace with clean code monitors and abstract data charts. The background features subtle neural network connections. The lighting is cinematic with a purple and lavender glow. Transparent-friendly style, professional and modern.";
pub const HERO_FALLBACK: &str = "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2?auto=format&fit=crop&q=80&w=1000";

pub const FEATURED_PROMPT: &str = "A high-fidelity 3D stylized illustration of a sleek smartphone with a vibrant red holographic alarm signal or siren bursting out of the screen. Cinematic lighting, deep red glow, digital data particles, futuristic IT aesthetic, dark purple background, professional finish.";
pub const FEATURED_FALLBACK: &str = "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?auto=format&fit=crop&q=80&w=800";

/// A portfolio project as far as its artwork is concerned.
#[derive(Debug, Clone, Copy)]
pub struct ProjectArt {
    pub id: &'static str,
    pub title: &'static str,
    pub image_url: &'static str,
    pub generation_prompt: Option<&'static str>,
}

pub const PROJECTS: &[ProjectArt] = &[
    ProjectArt {
        id: "1",
        title: "Archvision: Homebuilder",
        image_url: "https://images.unsplash.com/photo-1639322537228-f710d846310a?auto=format&fit=crop&q=80&w=800",
        generation_prompt: Some("A high-fidelity 3D stylized illustration of a futuristic, sun-drenched dream house with glass walls, floating balconies, and lush vertical gardens. Cinematic lighting, architectural masterpiece, hyper-realistic textures, vibrant sky, purple and lavender highlights."),
    },
    ProjectArt {
        id: "2",
        title: "Talu Future Assist",
        image_url: "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&q=80&w=800",
        generation_prompt: Some("A high-fidelity 3D stylized illustration of a diverse group of joyful graduates in caps and gowns, throwing their caps into the air. Golden hour lighting, digital data particles floating around, celebratory atmosphere, professional 3D finish, purple and lavender accents."),
    },
    ProjectArt {
        id: "3",
        title: "SentimentIQ",
        image_url: "https://images.unsplash.com/photo-1551288049-bbbda536339a?auto=format&fit=crop&q=80&w=800",
        generation_prompt: Some("A high-fidelity 3D stylized illustration of a cloud of floating emojis with various vibrant emotive expressions—happy, surprised, thinking, curious. Glowing neon outlines, digital social media aesthetic, cinematic depth of field, purple and indigo background."),
    },
];

/// Stagger for the project card at `index` in the grid.
pub fn project_stagger_ms(index: usize) -> u64 {
    index as u64 * PROJECT_STAGGER_STEP_MS + PROJECT_STAGGER_BASE_MS
}

pub fn hero_slot() -> SlotSpec {
    SlotSpec::new(
        "hero",
        SlotKind::Hero,
        ImageRequest::new(HERO_PROMPT, AspectRatio::Square, HERO_STAGGER_MS),
        HERO_FALLBACK,
    )
    .with_title("Hero portrait")
}

pub fn featured_slot() -> SlotSpec {
    SlotSpec::new(
        "featured",
        SlotKind::Featured,
        ImageRequest::new(FEATURED_PROMPT, AspectRatio::Square, FEATURED_STAGGER_MS),
        FEATURED_FALLBACK,
    )
    .with_title("Featured case")
}

pub fn project_slot(index: usize, project: &ProjectArt) -> SlotSpec {
    SlotSpec::new(
        format!("project-{}", project.id),
        SlotKind::Project,
        ImageRequest::new(
            project.generation_prompt.unwrap_or_default(),
            AspectRatio::Widescreen,
            project_stagger_ms(index),
        ),
        project.image_url,
    )
    .with_title(project.title)
}

/// Every slot on the page, hero first.
pub fn page_slots() -> Vec<SlotSpec> {
    let mut slots = vec![hero_slot(), featured_slot()];
    slots.extend(
        PROJECTS
            .iter()
            .enumerate()
            .map(|(index, project)| project_slot(index, project)),
    );
    slots
}
