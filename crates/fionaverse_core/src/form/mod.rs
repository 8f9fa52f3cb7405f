//! Entity forms: user input drafts turned into validated records.
//!
//! # Responsibility
//! - Check required fields before any record exists.
//! - Assign identifiers and creation timestamps.
//!
//! # Invariants
//! - A required field is present when it is non-empty; input is stored as typed.
//! - Validation failure returns the user-facing message and creates nothing.

use crate::model::entity::{Achievement, BlogPost, GalleryFrame, GalleryItem, Project};
use crate::model::{new_entity_id, now_epoch_ms};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required input is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Names of the empty required fields, in form order.
    pub missing: Vec<&'static str>,
    /// Message to show the user.
    pub message: &'static str,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

impl Error for ValidationError {}

fn is_missing(value: &str) -> bool {
    value.is_empty()
}

fn require(
    fields: &[(&'static str, bool)],
    message: &'static str,
) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing, message })
    }
}

fn image_present(image: Option<&String>) -> bool {
    image.is_some_and(|image| !is_missing(image))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementDraft {
    pub caption: String,
    /// Encoded upload; `None` until a file has been read.
    pub image: Option<String>,
}

impl AchievementDraft {
    pub fn submit(self) -> Result<Achievement, ValidationError> {
        require(
            &[
                ("caption", !is_missing(&self.caption)),
                ("image", image_present(self.image.as_ref())),
            ],
            "Please provide a caption and an image.",
        )?;
        Ok(Achievement {
            id: new_entity_id(),
            image: self.image.unwrap_or_default(),
            caption: self.caption,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub link: String,
    /// Comma-separated tag list as typed.
    pub tags: String,
    pub image: Option<String>,
}

impl ProjectDraft {
    pub fn submit(self) -> Result<Project, ValidationError> {
        require(
            &[
                ("title", !is_missing(&self.title)),
                ("description", !is_missing(&self.description)),
                ("image", image_present(self.image.as_ref())),
            ],
            "Please fill all required fields.",
        )?;
        Ok(Project {
            id: new_entity_id(),
            image: self.image.unwrap_or_default(),
            title: self.title,
            description: self.description,
            link: self.link,
            tags: split_tags(&self.tags),
        })
    }
}

/// Splits `"rust, wasm ,,art"` into `["rust", "wasm", "", "art"]`.
///
/// Entries are trimmed but never dropped, so `""` yields `[""]`.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(|tag| tag.trim().to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryDraft {
    pub caption: String,
    pub frame: GalleryFrame,
    pub image: Option<String>,
}

impl GalleryDraft {
    pub fn submit(self) -> Result<GalleryItem, ValidationError> {
        require(
            &[("image", image_present(self.image.as_ref()))],
            "Please upload an image.",
        )?;
        Ok(GalleryItem {
            id: new_entity_id(),
            image: self.image.unwrap_or_default(),
            caption: self.caption,
            frame: self.frame,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostDraft {
    pub title: String,
    pub content: String,
    /// Optional; blank means no image.
    pub image_url: String,
}

impl BlogPostDraft {
    /// Submits with the current wall-clock time as creation timestamp.
    pub fn submit(self) -> Result<BlogPost, ValidationError> {
        self.submit_at(now_epoch_ms())
    }

    pub fn submit_at(self, timestamp: i64) -> Result<BlogPost, ValidationError> {
        require(
            &[
                ("title", !is_missing(&self.title)),
                ("content", !is_missing(&self.content)),
            ],
            "Please provide a title and content.",
        )?;
        Ok(BlogPost {
            id: new_entity_id(),
            timestamp,
            title: self.title,
            content: self.content,
            image_url: (!self.image_url.is_empty()).then_some(self.image_url),
        })
    }
}
