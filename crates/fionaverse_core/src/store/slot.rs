//! Persistent state slot.
//!
//! # Responsibility
//! - Bind one storage key to one typed in-memory value.
//! - Load once at creation, write back on every mutation, notify subscribers.
//!
//! # Invariants
//! - Creation never fails on missing, unreadable or undecodable data; the
//!   caller default is used instead and nothing is written.
//! - Every `set`/`update` performs exactly one backend write attempt and
//!   exactly one subscriber notification.
//! - A failed write keeps the new in-memory value (best-effort persistence).
//! - Key uniqueness is the caller's responsibility; two slots with the same
//!   key alias one stored value.

use crate::logging::sanitize_message;
use crate::store::backend::{BackendError, StorageBackend};
use crate::store::codec::{Codec, EncodeError, JsonCodec};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

const MAX_LOGGED_ERROR_CHARS: usize = 200;

/// Slot construction or persistence failure.
///
/// `Encode` and `Write` are reported after the in-memory value has already
/// been replaced; they only mean the change will not survive a reload.
#[derive(Debug)]
pub enum SlotError {
    InvalidKey,
    Encode { key: String, source: EncodeError },
    Write { key: String, source: BackendError },
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "slot key must not be empty"),
            Self::Encode { key, source } => write!(f, "slot `{key}` not persisted: {source}"),
            Self::Write { key, source } => write!(f, "slot `{key}` not persisted: {source}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey => None,
            Self::Encode { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}

/// Handle returned by [`Slot::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct SlotState<T, C> {
    key: String,
    value: RefCell<T>,
    backend: Rc<dyn StorageBackend>,
    codec: C,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
    next_subscription: Cell<u64>,
}

/// One persisted, typed, named value.
///
/// Cloning yields another handle to the same value, so callbacks can keep
/// their own handle and still observe every earlier mutation.
pub struct Slot<T, C = JsonCodec> {
    state: Rc<SlotState<T, C>>,
}

impl<T, C> Clone for Slot<T, C> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> Slot<T, JsonCodec>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Creates a JSON slot, loading `key` from `backend` or using `default`.
    pub fn new(
        backend: Rc<dyn StorageBackend>,
        key: impl Into<String>,
        default: T,
    ) -> Result<Self, SlotError> {
        Self::with_codec(backend, key, default, JsonCodec)
    }
}

impl<T, C> Slot<T, C>
where
    T: Serialize + DeserializeOwned + Clone,
    C: Codec,
{
    pub fn with_codec(
        backend: Rc<dyn StorageBackend>,
        key: impl Into<String>,
        default: T,
        codec: C,
    ) -> Result<Self, SlotError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(SlotError::InvalidKey);
        }

        let value = load_initial(backend.as_ref(), &codec, &key, default);
        Ok(Self {
            state: Rc::new(SlotState {
                key,
                value: RefCell::new(value),
                backend,
                codec,
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        })
    }

    pub fn key(&self) -> &str {
        &self.state.key
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.state.value.borrow().clone()
    }

    /// Runs `read` against the current value without cloning it.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.state.value.borrow())
    }

    /// Replaces the value, persists it and notifies subscribers.
    pub fn set(&self, value: T) -> Result<(), SlotError> {
        *self.state.value.borrow_mut() = value;
        let persisted = self.persist();
        self.notify();
        persisted
    }

    /// Replaces the value with `next(current)`.
    ///
    /// `current` is the value at the time of the call, including every
    /// earlier mutation made through any handle. `next` must not mutate this
    /// slot itself.
    pub fn update(&self, next: impl FnOnce(&T) -> T) -> Result<(), SlotError> {
        let value = {
            let current = self.state.value.borrow();
            next(&current)
        };
        self.set(value)
    }

    /// Registers a change listener called after every mutation.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.state.next_subscription.get());
        self.state.next_subscription.set(id.0 + 1);
        self.state
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener; returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.state.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    fn persist(&self) -> Result<(), SlotError> {
        let state = &self.state;
        let encoded = {
            let value = state.value.borrow();
            state.codec.encode(&*value)
        };

        let text = match encoded {
            Ok(text) => text,
            Err(source) => {
                error!(
                    "event=slot_write module=store status=error key={} error_code=encode_failed error={}",
                    state.key,
                    sanitize_message(&source.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                return Err(SlotError::Encode {
                    key: state.key.clone(),
                    source,
                });
            }
        };

        match state.backend.write(&state.key, &text) {
            Ok(()) => {
                debug!(
                    "event=slot_write module=store status=ok key={} bytes={}",
                    state.key,
                    text.len()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=slot_write module=store status=error key={} error_code=write_failed error={}",
                    state.key,
                    sanitize_message(&source.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                Err(SlotError::Write {
                    key: state.key.clone(),
                    source,
                })
            }
        }
    }

    fn notify(&self) {
        let subscribers: Vec<Subscriber<T>> = self
            .state
            .subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if subscribers.is_empty() {
            return;
        }

        let snapshot = self.get();
        for listener in subscribers {
            listener(&snapshot);
        }
    }
}

fn load_initial<T, C>(backend: &dyn StorageBackend, codec: &C, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    C: Codec,
{
    let text = match backend.read(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("event=slot_load module=store status=default key={key} reason=absent");
            return default;
        }
        Err(err) => {
            warn!(
                "event=slot_load module=store status=default key={} reason=read_failed error={}",
                key,
                sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
            );
            return default;
        }
    };

    match codec.decode(&text) {
        Ok(value) => {
            debug!(
                "event=slot_load module=store status=ok key={} bytes={}",
                key,
                text.len()
            );
            value
        }
        Err(err) => {
            warn!(
                "event=slot_load module=store status=default key={} reason=decode_failed error={}",
                key,
                sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Slot, SlotError};
    use crate::store::backend::{BackendResult, MemoryBackend, StorageBackend};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingBackend {
        inner: MemoryBackend,
        writes: Cell<usize>,
    }

    impl StorageBackend for CountingBackend {
        fn read(&self, key: &str) -> BackendResult<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> BackendResult<()> {
            self.writes.set(self.writes.get() + 1);
            self.inner.write(key, value)
        }
    }

    fn memory() -> Rc<MemoryBackend> {
        Rc::new(MemoryBackend::new())
    }

    #[test]
    fn missing_key_yields_default_without_writing() {
        let backend = Rc::new(CountingBackend::default());
        let slot = Slot::new(backend.clone(), "bio", "hello".to_string()).unwrap();

        assert_eq!(slot.get(), "hello");
        assert_eq!(backend.writes.get(), 0);
        assert!(backend.read("bio").unwrap().is_none());
    }

    #[test]
    fn corrupt_text_yields_default() {
        let backend = memory();
        backend.insert_raw("funFacts", "[\"unterminated");

        let slot = Slot::new(backend.clone(), "funFacts", vec!["a".to_string()]).unwrap();
        assert_eq!(slot.get(), vec!["a".to_string()]);
        assert_eq!(
            backend.read("funFacts").unwrap().as_deref(),
            Some("[\"unterminated")
        );
    }

    #[test]
    fn wrong_shape_yields_default() {
        let backend = memory();
        backend.insert_raw("count", "{\"not\":\"a number\"}");

        let slot = Slot::new(backend, "count", 7_u32).unwrap();
        assert_eq!(slot.get(), 7);
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = Slot::new(memory(), "  ", 0_u8).err().unwrap();
        assert!(matches!(err, SlotError::InvalidKey));
    }

    #[test]
    fn set_writes_once_and_notifies_once() {
        let backend = Rc::new(CountingBackend::default());
        let slot = Slot::new(backend.clone(), "theme", "dark".to_string()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        slot.subscribe(move |value: &String| sink.borrow_mut().push(value.clone()));

        slot.set("aurora".to_string()).unwrap();

        assert_eq!(backend.writes.get(), 1);
        assert_eq!(*seen.borrow(), vec!["aurora".to_string()]);
        assert_eq!(backend.read("theme").unwrap().as_deref(), Some("\"aurora\""));
    }

    #[test]
    fn value_survives_fresh_slot_on_same_backend() {
        let backend = memory();
        let slot = Slot::new(backend.clone(), "count", 0_u32).unwrap();
        slot.set(5).unwrap();

        let reloaded = Slot::new(backend, "count", 0_u32).unwrap();
        assert_eq!(reloaded.get(), 5);
    }

    #[test]
    fn updates_through_cloned_handles_see_prevailing_value() {
        let slot = Slot::new(memory(), "count", 0_u32).unwrap();
        let captured = slot.clone();

        slot.update(|n| n + 1).unwrap();
        captured.update(|n| n + 10).unwrap();
        slot.update(|n| n * 2).unwrap();

        assert_eq!(slot.get(), 22);
        assert_eq!(captured.get(), 22);
    }

    #[test]
    fn failed_write_keeps_new_value_in_memory_only() {
        let backend = memory();
        let slot = Slot::new(backend.clone(), "bio", "old".to_string()).unwrap();
        slot.set("old".to_string()).unwrap();
        backend.set_reject_writes(true);

        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        slot.subscribe(move |_| counter.set(counter.get() + 1));

        let err = slot.set("new".to_string()).unwrap_err();
        assert!(matches!(err, SlotError::Write { .. }));
        assert_eq!(slot.get(), "new");
        assert_eq!(notified.get(), 1);

        let fresh = Slot::new(backend, "bio", "default".to_string()).unwrap();
        assert_eq!(fresh.get(), "old");
    }

    #[test]
    fn encode_failure_skips_write() {
        let backend = Rc::new(CountingBackend::default());
        let slot: Slot<HashMap<Vec<u8>, u8>> =
            Slot::new(backend.clone(), "bytes", HashMap::new()).unwrap();

        let err = slot.set(HashMap::from([(vec![1_u8], 1_u8)])).unwrap_err();
        assert!(matches!(err, SlotError::Encode { .. }));
        assert_eq!(backend.writes.get(), 0);
        assert_eq!(slot.with(HashMap::len), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let slot = Slot::new(memory(), "count", 0_u32).unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = slot.subscribe(move |_| counter.set(counter.get() + 1));

        slot.set(1).unwrap();
        assert!(slot.unsubscribe(id));
        assert!(!slot.unsubscribe(id));
        slot.set(2).unwrap();

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn subscriber_may_read_and_write_other_slots() {
        let backend = memory();
        let source = Slot::new(backend.clone(), "source", 0_u32).unwrap();
        let mirror = Slot::new(backend, "mirror", 0_u32).unwrap();
        let target = mirror.clone();
        let reader = source.clone();
        source.subscribe(move |value| {
            assert_eq!(reader.get(), *value);
            target.set(*value * 100).unwrap();
        });

        source.set(3).unwrap();
        assert_eq!(mirror.get(), 300);
    }
}
