//! Pure helpers over ordered entity lists held in slots.
//!
//! Every helper returns a new `Vec`; the input slice is never modified.
//! Elements that are not targeted are cloned as-is, so lists of `Rc<T>`
//! keep pointer identity for untouched entries.

use crate::model::EntityId;
use std::rc::Rc;

/// An entity with a list-unique identifier.
pub trait Identified {
    fn id(&self) -> &EntityId;
}

impl<T: Identified> Identified for Rc<T> {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

/// Returns `[item, ..list]`.
pub fn prepend<T: Clone>(list: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(list.len() + 1);
    next.push(item);
    next.extend_from_slice(list);
    next
}

/// Returns `list` without the element carrying `id`.
pub fn remove_by_id<T: Identified + Clone>(list: &[T], id: &EntityId) -> Vec<T> {
    list.iter().filter(|item| item.id() != id).cloned().collect()
}

/// Returns `list` with the element carrying `id` replaced by `patch(element)`.
pub fn update_by_id<T, F>(list: &[T], id: &EntityId, patch: F) -> Vec<T>
where
    T: Identified + Clone,
    F: FnOnce(&T) -> T,
{
    let mut patch = Some(patch);
    list.iter()
        .map(|item| {
            if item.id() == id {
                if let Some(patch) = patch.take() {
                    return patch(item);
                }
            }
            item.clone()
        })
        .collect()
}

/// Whether `id` occurs in `list`.
pub fn contains_id<T: Identified>(list: &[T], id: &EntityId) -> bool {
    list.iter().any(|item| item.id() == id)
}

/// Returns `[..list, item]`.
pub fn append<T: Clone>(list: &[T], item: T) -> Vec<T> {
    let mut next = list.to_vec();
    next.push(item);
    next
}

/// Returns `list` with position `index` replaced; out of range is a no-op.
pub fn replace_at<T: Clone>(list: &[T], index: usize, item: T) -> Vec<T> {
    let mut next = list.to_vec();
    if let Some(slot) = next.get_mut(index) {
        *slot = item;
    }
    next
}

/// Returns `list` without position `index`; out of range is a no-op.
pub fn remove_at<T: Clone>(list: &[T], index: usize) -> Vec<T> {
    list.iter()
        .enumerate()
        .filter(|(position, _)| *position != index)
        .map(|(_, item)| item.clone())
        .collect()
}
