//! The per-client replica store.
//!
//! Owns the local copy of a room's element set plus everything that is local
//! by construction: selection, clipboard, the undo/redo history, and the
//! z-index allocation counter. The store never performs network I/O — local
//! mutations happen synchronously and the caller emits the matching protocol
//! event afterwards, while `apply_remote_*` operations absorb peer events.
//!
//! Remote applies are idempotent and commutative per element id. Two senders'
//! operations may arrive at different replicas in different relative order
//! (the channel only orders messages per sender), so the upsert is a full
//! field-replace keyed by id: last writer wins, no per-field merge.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;

use protocol::element::ElementId;
use protocol::{Element, ElementKind, ElementPatch, Point, Style};
use uuid::Uuid;

use crate::consts::PASTE_OFFSET;
use crate::history::History;

/// Local, independently mutable copy of one room's element set.
#[derive(Debug)]
pub struct ReplicaStore {
    /// Elements in insertion order. Paint order is `(z_index, id)`.
    elements: Vec<Element>,
    selection: HashSet<ElementId>,
    clipboard: Vec<Element>,
    history: History,
    /// Next z-index to hand out. A local ordering hint only: two clients can
    /// allocate the same value concurrently, which the `(z_index, id)`
    /// tie-break resolves at render time.
    next_z: i64,
}

impl ReplicaStore {
    /// Create an empty replica with an empty initial history snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            selection: HashSet::new(),
            clipboard: Vec::new(),
            history: History::new(),
            next_z: 1,
        }
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn selection(&self) -> &HashSet<ElementId> {
        &self.selection
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in paint order: stable sort by `(z_index, id)`.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&Element> {
        let mut els: Vec<&Element> = self.elements.iter().collect();
        els.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        els
    }

    /// Replace the selection. Ids that don't resolve to elements are allowed;
    /// they simply select nothing.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.selection = ids.into_iter().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // =========================================================================
    // LOCAL MUTATIONS (caller emits the matching client event afterwards)
    // =========================================================================

    /// Build a new element at `origin` with a fresh id and the next local
    /// z-index, apply it locally, and return a copy for emission.
    pub fn create_element(&mut self, kind: ElementKind, origin: Point, style: &Style) -> Element {
        let z = self.next_z_index();
        let element = Element::create(kind, origin, style, z);
        self.apply_local_create(element.clone());
        element
    }

    /// Apply a locally constructed element. Upserts by id, so re-applying the
    /// element a drag gesture keeps mutating is safe.
    pub fn apply_local_create(&mut self, element: Element) {
        self.upsert(element);
    }

    /// Apply a sparse update to one element. Returns a copy of the updated
    /// element for emission, or `None` if the id is unknown.
    pub fn apply_local_update(&mut self, id: ElementId, patch: &ElementPatch) -> Option<Element> {
        let el = self.elements.iter_mut().find(|el| el.id == id)?;
        el.apply_patch(patch);
        let updated = el.clone();
        self.next_z = self.next_z.max(updated.z_index + 1);
        Some(updated)
    }

    /// Remove elements by id and drop them from the selection.
    pub fn apply_local_remove(&mut self, ids: &[ElementId]) {
        self.remove_ids(ids);
    }

    /// Empty the board and the selection.
    pub fn apply_local_clear(&mut self) {
        self.elements.clear();
        self.selection.clear();
    }

    // =========================================================================
    // REMOTE APPLIES (idempotent; commutative per id)
    // =========================================================================

    /// Upsert a peer's element: full field-replace if the id exists, append
    /// otherwise. This one rule covers both "new element drawn" and "existing
    /// element edited".
    pub fn apply_remote_upsert(&mut self, element: Element) {
        self.upsert(element);
    }

    /// Remove peer-deleted elements; also deselects them if selected here.
    pub fn apply_remote_remove(&mut self, ids: &[ElementId]) {
        self.remove_ids(ids);
    }

    /// A peer cleared the board. Absorbing: removals of ids that no longer
    /// exist afterwards are no-ops, not errors.
    pub fn apply_remote_clear(&mut self) {
        self.elements.clear();
        self.selection.clear();
    }

    /// Wholesale replace of the board with a peer's exact element array,
    /// abandoning any local-only state. The strong-consistency primitive used
    /// after a peer's undo/redo and on join.
    pub fn apply_remote_full_sync(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.selection.clear();
        self.reseed_z();
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// Record the current element array as a history snapshot. Call after a
    /// committed gesture (draw finished, drag finished, paste, delete, clear)
    /// — never per intermediate move sample.
    pub fn commit_history(&mut self) {
        let elements = self.elements.clone();
        self.history.commit(&elements);
    }

    /// Step back one snapshot and adopt it. Returns the restored elements so
    /// the caller can broadcast a `sync-board`; peers are NOT notified here.
    pub fn undo(&mut self) -> Option<&[Element]> {
        let snapshot = self.history.undo()?.to_vec();
        self.elements = snapshot;
        self.selection.clear();
        self.reseed_z();
        Some(&self.elements)
    }

    /// Step forward one snapshot and adopt it. Same contract as [`Self::undo`].
    pub fn redo(&mut self) -> Option<&[Element]> {
        let snapshot = self.history.redo()?.to_vec();
        self.elements = snapshot;
        self.selection.clear();
        self.reseed_z();
        Some(&self.elements)
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    // =========================================================================
    // CLIPBOARD
    // =========================================================================

    /// Copy the selected elements into the local clipboard.
    pub fn copy_selected(&mut self) {
        self.clipboard = self
            .elements
            .iter()
            .filter(|el| self.selection.contains(&el.id))
            .cloned()
            .collect();
    }

    /// Paste the clipboard: brand-new ids, offset geometry, fresh z-indices.
    /// Selection moves to the pasted elements. Returns copies for emission.
    pub fn paste_clipboard(&mut self) -> Vec<Element> {
        let sources = self.clipboard.clone();
        self.insert_copies(&sources)
    }

    /// Duplicate the selected elements without touching the clipboard.
    pub fn duplicate_selected(&mut self) -> Vec<Element> {
        let sources: Vec<Element> = self
            .elements
            .iter()
            .filter(|el| self.selection.contains(&el.id))
            .cloned()
            .collect();
        self.insert_copies(&sources)
    }

    // =========================================================================
    // Z-ORDER
    // =========================================================================

    /// Return and advance the local z-index counter.
    pub fn next_z_index(&mut self) -> i64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Move the selected set above everything else: one destination value of
    /// `max(existing) + 1` for the whole batch, ties broken by id at render.
    /// Returns the changed elements for emission.
    pub fn bring_to_front(&mut self) -> Vec<Element> {
        let Some(max_z) = self.elements.iter().map(|el| el.z_index).max() else {
            return Vec::new();
        };
        self.assign_selected_z(max_z + 1)
    }

    /// Move the selected set below everything else at `min(existing) - 1`.
    pub fn send_to_back(&mut self) -> Vec<Element> {
        let Some(min_z) = self.elements.iter().map(|el| el.z_index).min() else {
            return Vec::new();
        };
        self.assign_selected_z(min_z - 1)
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn upsert(&mut self, element: Element) {
        self.next_z = self.next_z.max(element.z_index + 1);
        match self.elements.iter_mut().find(|el| el.id == element.id) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    fn remove_ids(&mut self, ids: &[ElementId]) {
        self.elements.retain(|el| !ids.contains(&el.id));
        for id in ids {
            self.selection.remove(id);
        }
    }

    fn assign_selected_z(&mut self, z: i64) -> Vec<Element> {
        let mut changed = Vec::new();
        for el in &mut self.elements {
            if self.selection.contains(&el.id) {
                el.z_index = z;
                changed.push(el.clone());
            }
        }
        self.next_z = self.next_z.max(z + 1);
        changed
    }

    fn insert_copies(&mut self, sources: &[Element]) -> Vec<Element> {
        let mut fresh = Vec::with_capacity(sources.len());
        for source in sources {
            let mut copy = source.clone();
            copy.id = Uuid::new_v4();
            copy.x += PASTE_OFFSET;
            copy.y += PASTE_OFFSET;
            copy.z_index = self.next_z_index();
            fresh.push(copy);
        }
        for el in &fresh {
            self.upsert(el.clone());
        }
        self.selection = fresh.iter().map(|el| el.id).collect();
        fresh
    }

    /// Keep the z counter strictly above everything currently on the board.
    fn reseed_z(&mut self) {
        let max_z = self.elements.iter().map(|el| el.z_index).max().unwrap_or(0);
        self.next_z = self.next_z.max(max_z + 1);
    }
}

impl Default for ReplicaStore {
    fn default() -> Self {
        Self::new()
    }
}
