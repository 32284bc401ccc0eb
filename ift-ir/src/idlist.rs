//! An ordered, name-indexed collection with O(1) lookup, used for a
//! module's wire and cell lists. Mirrors the teacher's `calyx_ir::IdList`.

use crate::common::RRC;
use ift_utils::{GetName, Id};
use linked_hash_map::LinkedHashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct IdList<T: GetName>(LinkedHashMap<Id, RRC<T>>);

impl<T: GetName> Default for IdList<T> {
    fn default() -> Self {
        IdList(LinkedHashMap::new())
    }
}

impl<'a, T: GetName> IntoIterator for &'a IdList<T> {
    type Item = &'a RRC<T>;
    type IntoIter = linked_hash_map::Values<'a, Id, RRC<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

impl<T: GetName> IdList<T> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn add(&mut self, item: RRC<T>) {
        let name = item.borrow().name();
        self.0.insert(name, item);
    }

    pub fn remove<S: Into<Id>>(&mut self, name: S) -> Option<RRC<T>> {
        self.0.remove(&name.into())
    }

    /// Keep only elements satisfying `f`; returns the number removed.
    pub fn retain<F>(&mut self, mut f: F) -> u64
    where
        F: FnMut(&RRC<T>) -> bool,
    {
        let mut removed = 0;
        for entry in self.0.entries() {
            if !f(entry.get()) {
                entry.remove();
                removed += 1;
            }
        }
        removed
    }

    pub fn iter(&self) -> impl Clone + Iterator<Item = &RRC<T>> {
        self.0.values()
    }

    pub fn find<S: Into<Id>>(&self, name: S) -> Option<RRC<T>> {
        self.0.get(&name.into()).map(Rc::clone)
    }
}
