//! Append-only slot storage addressed by stable handles

use std::collections::HashMap;

use uuid::Uuid;

/// Stable position of a record inside its arena. Handles grow with
/// insertion order and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Handle(usize);

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    index: HashMap<Uuid, Handle>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Arena<T> {
    /// Append a record. Callers check `contains` first; ids are unique.
    pub fn insert(&mut self, id: Uuid, value: T) -> Handle {
        let handle = Handle(self.slots.len());
        self.slots.push(Some(value));
        self.index.insert(id, handle);
        handle
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    pub fn handle(&self, id: Uuid) -> Option<Handle> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    pub fn by_id(&self, id: Uuid) -> Option<&T> {
        self.handle(id).and_then(|handle| self.get(handle))
    }

    pub fn by_id_mut(&mut self, id: Uuid) -> Option<&mut T> {
        let handle = self.handle(id)?;
        self.get_mut(handle)
    }

    /// Vacate the slot; the handle stays retired
    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let handle = self.index.remove(&id)?;
        self.slots.get_mut(handle.0).and_then(Option::take)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Live records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

/// Insert keeping the list ordered by handle, i.e. by insertion time
pub(crate) fn insert_ordered(handles: &mut Vec<Handle>, handle: Handle) {
    if let Err(pos) = handles.binary_search(&handle) {
        handles.insert(pos, handle);
    }
}

pub(crate) fn remove_handle(handles: &mut Vec<Handle>, handle: Handle) {
    if let Ok(pos) = handles.binary_search(&handle) {
        handles.remove(pos);
    }
}
