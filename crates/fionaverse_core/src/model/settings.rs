//! Scalar site settings: theme and active tab.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Aurora,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Aurora,
            Self::Aurora => Self::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Aurora => "aurora",
        }
    }
}

/// Top-level content sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Home,
    About,
    Achievements,
    Projects,
    Gallery,
    Blog,
}

impl Tab {
    /// Navigation order.
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::About,
        Self::Blog,
        Self::Achievements,
        Self::Projects,
        Self::Gallery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Achievements => "achievements",
            Self::Projects => "projects",
            Self::Gallery => "gallery",
            Self::Blog => "blog",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == value)
    }

    /// Section heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "🏠 Home",
            Self::About => "💜 About Me",
            Self::Achievements => "🏆 Achievements",
            Self::Projects => "💻 Projects",
            Self::Gallery => "🎨 Gallery / Memories",
            Self::Blog => "📝 My Blog",
        }
    }

    /// Label of the section's add button, for sections that open an add form.
    pub fn add_label(self) -> Option<&'static str> {
        match self {
            Self::Achievements => Some("Add Achievement"),
            Self::Projects => Some("Add Project"),
            Self::Gallery => Some("Add Image"),
            Self::Home | Self::About | Self::Blog => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Tab, Theme};

    #[test]
    fn theme_toggles_between_two_values() {
        assert_eq!(Theme::default().toggled(), Theme::Aurora);
        assert_eq!(Theme::Aurora.toggled(), Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Aurora).unwrap(), "\"aurora\"");
    }

    #[test]
    fn tab_wire_names_roundtrip_through_parse() {
        for tab in Tab::ALL {
            let text = serde_json::to_string(&tab).unwrap();
            assert_eq!(text, format!("\"{}\"", tab.as_str()));
            assert_eq!(Tab::parse(tab.as_str()), Some(tab));
        }
        assert!(serde_json::from_str::<Tab>("\"settings\"").is_err());
    }

    #[test]
    fn only_list_sections_have_add_labels() {
        assert_eq!(Tab::Gallery.add_label(), Some("Add Image"));
        assert_eq!(Tab::Blog.add_label(), None);
    }
}
