//! List entities: achievements, projects, gallery items and blog posts.

use crate::model::{new_entity_id, EntityId};
use crate::store::list::Identified;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: EntityId,
    /// Data URL or remote URL.
    pub image: String,
    pub caption: String,
}

impl Achievement {
    pub fn new(image: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            image: image.into(),
            caption: caption.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub image: String,
    pub title: String,
    pub description: String,
    /// May be empty when the project has no public page.
    pub link: String,
    pub tags: Vec<String>,
}

/// How a gallery picture is framed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryFrame {
    #[default]
    Square,
    Circle,
    Polaroid,
}

impl GalleryFrame {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Polaroid => "polaroid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "square" => Some(Self::Square),
            "circle" => Some(Self::Circle),
            "polaroid" => Some(Self::Polaroid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: EntityId,
    pub image: String,
    pub caption: String,
    pub frame: GalleryFrame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: EntityId,
    /// Creation time, Unix epoch milliseconds.
    pub timestamp: i64,
    pub title: String,
    /// Markdown or plain text body.
    pub content: String,
    /// Omitted from stored JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

macro_rules! impl_identified {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl Identified for $entity {
                fn id(&self) -> &EntityId {
                    &self.id
                }
            }
        )+
    };
}

impl_identified!(Achievement, Project, GalleryItem, BlogPost);

#[cfg(test)]
mod tests {
    use super::{Achievement, BlogPost, GalleryFrame, GalleryItem};
    use crate::model::new_entity_id;
    use serde_json::json;

    #[test]
    fn blog_post_uses_camel_case_and_omits_missing_image() {
        let id = new_entity_id();
        let post = BlogPost {
            id: id.clone(),
            timestamp: 1_700_000_000_000,
            title: "Hello".to_string(),
            content: "World".to_string(),
            image_url: None,
        };

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(
            value,
            json!({
                "id": id.as_str(),
                "timestamp": 1_700_000_000_000_i64,
                "title": "Hello",
                "content": "World",
            })
        );

        let with_image = BlogPost {
            image_url: Some("https://example.com/a.png".to_string()),
            ..post
        };
        let value = serde_json::to_value(&with_image).unwrap();
        assert_eq!(value["imageUrl"], "https://example.com/a.png");
    }

    #[test]
    fn gallery_frame_is_lowercase_and_closed() {
        let item = GalleryItem {
            id: new_entity_id(),
            image: "data:image/png;base64,AA==".to_string(),
            caption: String::new(),
            frame: GalleryFrame::Polaroid,
        };
        assert_eq!(serde_json::to_value(&item).unwrap()["frame"], "polaroid");

        let bad = json!({
            "id": "g1",
            "image": "x",
            "caption": "",
            "frame": "hexagon",
        });
        assert!(serde_json::from_value::<GalleryItem>(bad).is_err());
        assert_eq!(GalleryFrame::parse(" Circle "), Some(GalleryFrame::Circle));
        assert_eq!(GalleryFrame::parse("hexagon"), None);
    }

    #[test]
    fn missing_field_is_rejected() {
        let value = json!({ "id": "a1", "image": "x" });
        assert!(serde_json::from_value::<Achievement>(value).is_err());
    }

    #[test]
    fn achievement_new_assigns_fresh_id() {
        let first = Achievement::new("img", "Won X");
        let second = Achievement::new("img", "Won X");
        assert_ne!(first.id, second.id);
        assert_eq!(first.caption, "Won X");
    }
}
