//! Core of the Fionaverse portfolio site.
//! Persistent keyed state, content model, forms and owner actions.

pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod upload;

pub use config::{open_backend, StoreConfig};
pub use form::{AchievementDraft, BlogPostDraft, GalleryDraft, ProjectDraft, ValidationError};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::entity::{Achievement, BlogPost, GalleryFrame, GalleryItem, Project};
pub use model::family::{FamilyMember, FamilyMemberId, FamilyTree, FamilyTreeError};
pub use model::settings::{Tab, Theme};
pub use model::{new_entity_id, EntityId};
pub use service::confirm::ConfirmPrompt;
pub use service::portfolio::{embed_url, Portfolio};
pub use store::backend::{BackendError, BackendResult, MemoryBackend, StorageBackend};
pub use store::codec::{Codec, DecodeError, EncodeError, JsonCodec};
pub use store::list::{prepend, remove_by_id, update_by_id, Identified};
pub use store::slot::{Slot, SlotError, SubscriptionId};
pub use store::sqlite_backend::SqliteBackend;
pub use upload::{DataUrlEncoder, FileEncoder, FileReadError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
