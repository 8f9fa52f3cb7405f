//! Site use-case services.
//!
//! # Responsibility
//! - Turn owner actions (add, edit, delete, upload) into slot mutations.
//! - Keep presentation layers decoupled from storage keys and defaults.

pub mod confirm;
pub mod portfolio;
