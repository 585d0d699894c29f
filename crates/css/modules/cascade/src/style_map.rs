//! Per-element computed-style cache.

use crate::priority::{CascadePriority, Origin};
use css_values_units::Value;
use smallvec::SmallVec;
use std::sync::Arc;

/// Flag bits describing how a computed value was obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntryFlags(u16);

impl EntryFlags {
    pub const COMPUTED: Self = Self(1);
    pub const IMPORTANT: Self = Self(1 << 1);
    /// The value was taken from the parent.
    pub const INHERITED: Self = Self(1 << 2);
    /// No declaration applied.
    pub const NULL_CASCADED: Self = Self(1 << 3);
    pub const FONT_SIZE_RELATIVE: Self = Self(1 << 4);
    pub const COLOR_RELATIVE: Self = Self(1 << 5);
    pub const PARENT_RELATIVE: Self = Self(1 << 6);
    pub const BLOCK_WIDTH_RELATIVE: Self = Self(1 << 7);
    pub const BLOCK_HEIGHT_RELATIVE: Self = Self(1 << 8);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub const fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub const fn set(&mut self, other: Self, enabled: bool) {
        if enabled {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

/// Cache key: an element and the pseudo-element it is styled for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleKey {
    pub element: u64,
    pub pseudo_element: Option<Arc<str>>,
}

impl StyleKey {
    pub fn new(element: u64, pseudo_element: Option<&str>) -> Self {
        Self {
            element,
            pseudo_element: pseudo_element.map(Arc::from),
        }
    }
}

/// Which element a dependency was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Parent,
    /// Another property of the same element.
    Own,
}

/// A computed value another computed value was derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub relation: Relation,
    pub target: StyleKey,
    pub index: usize,
    /// Generation of the target entry when it was read.
    pub generation: u64,
}

/// A cached computed value.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleEntry {
    pub value: Value,
    /// Engine-wide stamp, fresh on every recomputation.
    pub generation: u64,
    pub dependencies: SmallVec<Dependency, 2>,
}

/// The declaration that won the cascade for one property.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadedValue {
    pub value: Value,
    pub priority: CascadePriority,
}

impl CascadedValue {
    /// Same value, importance and origin; the only changes that matter downstream.
    fn same_outcome(&self, other: &Self) -> bool {
        self.value == other.value
            && self.priority.important == other.priority.important
            && self.priority.origin == other.priority.origin
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    entry: Option<StyleEntry>,
    flags: EntryFlags,
    origin: Option<Origin>,
    cascaded: Option<CascadedValue>,
}

/// Computed values of one element (or one of its pseudo-elements), indexed by
/// property index.
#[derive(Clone, Debug, Default)]
pub struct StyleMap {
    slots: Vec<Slot>,
    cascade_epoch: Option<u64>,
}

impl StyleMap {
    pub fn with_capacity(properties: usize) -> Self {
        Self {
            slots: vec![Slot::default(); properties],
            cascade_epoch: None,
        }
    }

    fn slot_mut(&mut self, index: usize) -> &mut Slot {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, Slot::default);
        }
        &mut self.slots[index]
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.entry(index).map(|entry| &entry.value)
    }

    pub fn entry(&self, index: usize) -> Option<&StyleEntry> {
        self.slots.get(index).and_then(|slot| slot.entry.as_ref())
    }

    pub fn flags(&self, index: usize) -> EntryFlags {
        self.slots.get(index).map_or_else(EntryFlags::empty, |slot| slot.flags)
    }

    /// Origin of the declaration the value was computed from.
    pub fn origin(&self, index: usize) -> Option<Origin> {
        self.slots.get(index).and_then(|slot| slot.origin)
    }

    pub fn cascaded(&self, index: usize) -> Option<&CascadedValue> {
        self.slots.get(index).and_then(|slot| slot.cascaded.as_ref())
    }

    pub fn is_computed(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::COMPUTED)
    }

    pub fn is_important(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::IMPORTANT)
    }

    pub fn is_inherited(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::INHERITED)
    }

    pub fn is_null_cascaded(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::NULL_CASCADED)
    }

    pub fn is_font_size_relative(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::FONT_SIZE_RELATIVE)
    }

    pub fn is_color_relative(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::COLOR_RELATIVE)
    }

    pub fn is_parent_relative(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::PARENT_RELATIVE)
    }

    pub fn is_block_width_relative(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::BLOCK_WIDTH_RELATIVE)
    }

    pub fn is_block_height_relative(&self, index: usize) -> bool {
        self.flags(index).contains(EntryFlags::BLOCK_HEIGHT_RELATIVE)
    }

    pub fn put_inherited(&mut self, index: usize, enabled: bool) {
        self.slot_mut(index).flags.set(EntryFlags::INHERITED, enabled);
    }

    pub fn put_font_size_relative(&mut self, index: usize, enabled: bool) {
        self.slot_mut(index).flags.set(EntryFlags::FONT_SIZE_RELATIVE, enabled);
    }

    pub fn put_color_relative(&mut self, index: usize, enabled: bool) {
        self.slot_mut(index).flags.set(EntryFlags::COLOR_RELATIVE, enabled);
    }

    pub fn put_parent_relative(&mut self, index: usize, enabled: bool) {
        self.slot_mut(index).flags.set(EntryFlags::PARENT_RELATIVE, enabled);
    }

    pub fn put_block_width_relative(&mut self, index: usize, enabled: bool) {
        self.slot_mut(index).flags.set(EntryFlags::BLOCK_WIDTH_RELATIVE, enabled);
    }

    pub fn put_block_height_relative(&mut self, index: usize, enabled: bool) {
        self.slot_mut(index).flags.set(EntryFlags::BLOCK_HEIGHT_RELATIVE, enabled);
    }

    /// Epoch the cascaded declarations were collected in.
    pub const fn cascade_epoch(&self) -> Option<u64> {
        self.cascade_epoch
    }

    /// Forces the next read to re-collect declarations.
    pub(crate) fn mark_stale(&mut self) {
        self.cascade_epoch = None;
    }

    /// Installs freshly collected winners and drops every computed entry whose
    /// winning declaration changed. Returns the number of dropped entries.
    pub(crate) fn replace_cascade(
        &mut self,
        winners: Vec<Option<CascadedValue>>,
        epoch: u64,
    ) -> usize {
        let mut dropped = 0;
        if self.slots.len() < winners.len() {
            self.slots.resize_with(winners.len(), Slot::default);
        }
        for (slot, winner) in self.slots.iter_mut().zip(winners) {
            let unchanged = match (&slot.cascaded, &winner) {
                (Some(old), Some(new)) => old.same_outcome(new),
                (None, None) => true,
                _ => false,
            };
            if !unchanged && slot.entry.take().is_some() {
                slot.flags = EntryFlags::empty();
                dropped += 1;
            }
            slot.cascaded = winner;
        }
        self.cascade_epoch = Some(epoch);
        dropped
    }

    /// Clears computation flags before a recomputation and records how the
    /// property was cascaded.
    pub(crate) fn begin_compute(&mut self, index: usize) {
        let slot = self.slot_mut(index);
        let (important, origin) = slot.cascaded.as_ref().map_or((false, None), |cascaded| {
            (cascaded.priority.important, Some(cascaded.priority.origin))
        });
        slot.entry = None;
        slot.flags = EntryFlags::empty();
        slot.flags.set(EntryFlags::IMPORTANT, important);
        slot.flags.set(EntryFlags::NULL_CASCADED, origin.is_none());
        slot.origin = origin;
    }

    pub(crate) fn store(&mut self, index: usize, entry: StyleEntry) {
        let slot = self.slot_mut(index);
        slot.flags.insert(EntryFlags::COMPUTED);
        slot.entry = Some(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::{CascadedValue, EntryFlags, StyleEntry, StyleMap};
    use crate::priority::{CascadePriority, Origin};
    use css_selectors::Specificity;
    use css_values_units::Value;
    use smallvec::SmallVec;

    fn cascaded(value: Value, important: bool) -> CascadedValue {
        CascadedValue {
            value,
            priority: CascadePriority::new(Origin::Author, important, Specificity::ZERO, 0, 0),
        }
    }

    fn entry(value: Value) -> StyleEntry {
        StyleEntry {
            value,
            generation: 1,
            dependencies: SmallVec::new(),
        }
    }

    #[test]
    fn flags_are_independent_bits() {
        let mut flags = EntryFlags::empty();
        flags.insert(EntryFlags::PARENT_RELATIVE);
        flags.set(EntryFlags::IMPORTANT, true);
        assert!(flags.contains(EntryFlags::PARENT_RELATIVE));
        flags.remove(EntryFlags::PARENT_RELATIVE);
        assert!(!flags.contains(EntryFlags::PARENT_RELATIVE));
        assert_eq!(flags, EntryFlags::IMPORTANT);
        assert_eq!(flags.bits(), 2);
    }

    #[test]
    fn begin_compute_records_cascade_outcome() {
        let mut map = StyleMap::with_capacity(2);
        map.replace_cascade(vec![Some(cascaded(Value::number(1.0), true)), None], 1);
        map.begin_compute(0);
        map.begin_compute(1);
        assert!(map.is_important(0));
        assert_eq!(map.origin(0), Some(Origin::Author));
        assert!(map.is_null_cascaded(1));
        map.store(0, entry(Value::number(1.0)));
        assert!(map.is_computed(0));
        assert!(!map.is_computed(1));
    }

    #[test]
    fn changed_winners_drop_entries() {
        let mut map = StyleMap::with_capacity(2);
        map.replace_cascade(vec![Some(cascaded(Value::number(1.0), false)), None], 1);
        map.store(0, entry(Value::number(1.0)));
        map.store(1, entry(Value::number(2.0)));
        let dropped = map.replace_cascade(vec![Some(cascaded(Value::number(1.0), false)), None], 2);
        assert_eq!(dropped, 0);
        assert_eq!(map.cascade_epoch(), Some(2));
        let dropped = map.replace_cascade(vec![Some(cascaded(Value::number(3.0), false)), None], 3);
        assert_eq!(dropped, 1);
        assert!(map.value(0).is_none());
        assert_eq!(map.value(1), Some(&Value::number(2.0)));
    }
}
