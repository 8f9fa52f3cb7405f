//! Family tree: a fixed set of twelve members whose pictures can change.
//!
//! # Invariants
//! - A `FamilyTree` holds every `FamilyMemberId` exactly once.
//! - Members are never added or removed; only `image` is replaced.
//! - Stored data violating the above fails to decode.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PLACEHOLDER_IMAGE_BASE: &str = "https://via.placeholder.com/100?text=";

/// Closed set of family tree positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyMemberId {
    PaternalGrandmother,
    PaternalGrandfather,
    Father,
    Mother,
    Uncle,
    Aunt,
    Me,
    Brother1,
    Brother2,
    Sister,
    Sister2,
    Sister3,
}

impl FamilyMemberId {
    /// Seed order of the default tree.
    pub const ALL: [Self; 12] = [
        Self::PaternalGrandmother,
        Self::PaternalGrandfather,
        Self::Father,
        Self::Mother,
        Self::Uncle,
        Self::Aunt,
        Self::Me,
        Self::Brother1,
        Self::Brother2,
        Self::Sister,
        Self::Sister2,
        Self::Sister3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PaternalGrandmother => "paternal_grandmother",
            Self::PaternalGrandfather => "paternal_grandfather",
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Uncle => "uncle",
            Self::Aunt => "aunt",
            Self::Me => "me",
            Self::Brother1 => "brother1",
            Self::Brother2 => "brother2",
            Self::Sister => "sister",
            Self::Sister2 => "sister2",
            Self::Sister3 => "sister3",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }

    /// Name shown before the owner renames anyone.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::PaternalGrandmother => "Grandmother",
            Self::PaternalGrandfather => "Grandfather",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Uncle => "Uncle",
            Self::Aunt => "Aunt",
            Self::Me => "Me",
            Self::Brother1 | Self::Brother2 => "Brother",
            Self::Sister | Self::Sister2 | Self::Sister3 => "Sister",
        }
    }
}

/// Display rows of the tree, oldest generation first.
pub const GENERATIONS: [&[FamilyMemberId]; 4] = [
    &[
        FamilyMemberId::PaternalGrandfather,
        FamilyMemberId::PaternalGrandmother,
    ],
    &[
        FamilyMemberId::Uncle,
        FamilyMemberId::Father,
        FamilyMemberId::Mother,
        FamilyMemberId::Aunt,
    ],
    &[FamilyMemberId::Me],
    &[
        FamilyMemberId::Brother1,
        FamilyMemberId::Brother2,
        FamilyMemberId::Sister,
        FamilyMemberId::Sister2,
        FamilyMemberId::Sister3,
    ],
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: FamilyMemberId,
    pub name: String,
    /// `null` until a picture is uploaded.
    pub image: Option<String>,
}

impl FamilyMember {
    /// Uploaded picture, or a placeholder URL carrying the member's name.
    pub fn display_image(&self) -> String {
        match self.image.as_deref() {
            Some(image) => image.to_string(),
            None => format!(
                "{PLACEHOLDER_IMAGE_BASE}{}",
                self.name.replacen(' ', "%0A", 1)
            ),
        }
    }
}

/// Stored tree does not contain the twelve members exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyTreeError {
    DuplicateMember(FamilyMemberId),
    MissingMember(FamilyMemberId),
}

impl Display for FamilyTreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMember(id) => write!(f, "family member `{}` appears twice", id.as_str()),
            Self::MissingMember(id) => write!(f, "family member `{}` is missing", id.as_str()),
        }
    }
}

impl Error for FamilyTreeError {}

/// Complete family tree, stored as a JSON array of members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FamilyMember>", into = "Vec<FamilyMember>")]
pub struct FamilyTree {
    members: Vec<FamilyMember>,
}

impl Default for FamilyTree {
    fn default() -> Self {
        Self {
            members: FamilyMemberId::ALL
                .into_iter()
                .map(|id| FamilyMember {
                    id,
                    name: id.default_name().to_string(),
                    image: None,
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<FamilyMember>> for FamilyTree {
    type Error = FamilyTreeError;

    fn try_from(members: Vec<FamilyMember>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if !seen.insert(member.id) {
                return Err(FamilyTreeError::DuplicateMember(member.id));
            }
        }
        if let Some(missing) = FamilyMemberId::ALL
            .into_iter()
            .find(|id| !seen.contains(id))
        {
            return Err(FamilyTreeError::MissingMember(missing));
        }
        Ok(Self { members })
    }
}

impl From<FamilyTree> for Vec<FamilyMember> {
    fn from(tree: FamilyTree) -> Self {
        tree.members
    }
}

impl FamilyTree {
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn member(&self, id: FamilyMemberId) -> Option<&FamilyMember> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Returns a copy with `id`'s picture replaced.
    pub fn with_image(&self, id: FamilyMemberId, image: impl Into<String>) -> Self {
        let image = image.into();
        Self {
            members: self
                .members
                .iter()
                .map(|member| {
                    if member.id == id {
                        FamilyMember {
                            image: Some(image.clone()),
                            ..member.clone()
                        }
                    } else {
                        member.clone()
                    }
                })
                .collect(),
        }
    }

    /// Members grouped into display rows, oldest generation first.
    pub fn generations(&self) -> Vec<Vec<&FamilyMember>> {
        GENERATIONS
            .iter()
            .map(|row| row.iter().filter_map(|id| self.member(*id)).collect())
            .collect()
    }
}
