//! Persistent keyed state store.
//!
//! # Responsibility
//! - Backends: durable key→string storage (`backend`, `sqlite_backend`).
//! - Codec: typed value ⇄ stored text (`codec`).
//! - Slots: one typed value per key with write-through persistence (`slot`).
//! - List helpers: pure transforms over entity lists (`list`).
//!
//! # Invariants
//! - Everything here is single-threaded (`Rc`/`RefCell`); no type is `Send`.
//! - No operation spans more than one key.

pub mod backend;
pub mod codec;
pub mod list;
pub mod slot;
pub mod sqlite_backend;
