use slotmap::{new_key_type, SlotMap};

use super::{DrawCallEntry, LayerIndex, RenderCommand, SortKey};

new_key_type! {
    /// Handle of a mounted drawable component inside the render context.
    pub struct ComponentKey;
}

struct ComponentRecord<O, C> {
    /// Command the component mounted with; kept for the component's lifetime.
    command: RenderCommand<C>,
    order: u32,
    entry: Option<DrawCallEntry<O, C>>,
}

impl<O, C> ComponentRecord<O, C> {
    fn sort_key(&self) -> SortKey {
        let layer = self.entry.as_ref().map_or(LayerIndex::default(), |e| e.layer);
        SortKey::new(layer, self.order)
    }
}

/// Registry of mounted drawable components and their draw-call entries.
///
/// Performance characteristics:
/// - mount / unmount / register are O(1)
/// - paint-order iteration reuses an internal key buffer and only re-sorts
///   after membership or layer changes
pub struct DrawRegistry<O, C> {
    records: SlotMap<ComponentKey, ComponentRecord<O, C>>,
    next_order: u32,

    sorted: Vec<ComponentKey>,
    sorted_dirty: bool,
}

impl<O, C> DrawRegistry<O, C> {
    pub fn new() -> Self {
        Self {
            records: SlotMap::with_key(),
            next_order: 0,
            sorted: Vec::new(),
            sorted_dirty: false,
        }
    }

    /// Creates the record for a newly mounted component. It has no entry yet.
    pub fn mount(&mut self, command: RenderCommand<C>) -> ComponentKey {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.sorted_dirty = true;
        self.records.insert(ComponentRecord { command, order, entry: None })
    }

    /// Removes the component and its entry. Returns `false` if it was not mounted.
    pub fn unmount(&mut self, key: ComponentKey) -> bool {
        let removed = self.records.remove(key).is_some();
        if removed {
            self.sorted_dirty = true;
        }
        removed
    }

    /// Installs `entry` as the component's draw call, replacing any previous one.
    ///
    /// The entry always carries the command the component mounted with.
    /// Returns `false` (and drops the entry) if the component is not mounted.
    pub fn register(&mut self, mut entry: DrawCallEntry<O, C>) -> bool {
        let Some(record) = self.records.get_mut(entry.component) else {
            return false;
        };

        entry.command = record.command.clone();
        let layer_changed = record.entry.as_ref().is_none_or(|e| e.layer != entry.layer);
        record.entry = Some(entry);

        if layer_changed {
            self.sorted_dirty = true;
        }
        true
    }

    #[inline]
    pub fn contains(&self, key: ComponentKey) -> bool {
        self.records.contains_key(key)
    }

    /// Number of mounted components.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of components that have registered a draw call.
    pub fn entry_count(&self) -> usize {
        self.records.values().filter(|r| r.entry.is_some()).count()
    }

    pub fn entry(&self, key: ComponentKey) -> Option<&DrawCallEntry<O, C>> {
        self.records.get(key).and_then(|r| r.entry.as_ref())
    }

    /// Command the component mounted with.
    pub fn command(&self, key: ComponentKey) -> Option<&RenderCommand<C>> {
        self.records.get(key).map(|r| &r.command)
    }

    /// Iterates registered entries back-to-front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawCallEntry<O, C>> {
        if self.sorted_dirty {
            self.rebuild_sorted();
        }

        let records = &self.records;
        self.sorted
            .iter()
            .filter_map(move |&k| records.get(k).and_then(|r| r.entry.as_ref()))
    }

    fn rebuild_sorted(&mut self) {
        self.sorted.clear();
        self.sorted.extend(self.records.keys());

        // Mount order inside the key keeps this deterministic.
        let records = &self.records;
        self.sorted.sort_by_key(|&k| records[k].sort_key());

        self.sorted_dirty = false;
    }
}

impl<O, C> Default for DrawRegistry<O, C> {
    fn default() -> Self {
        Self::new()
    }
}
