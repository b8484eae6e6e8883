//! Per-tick signal storage: one lane of per-entry booleans per node.
//!
//! The [`SignalStore`] is the kernel's working memory for a tick. Its lane
//! set is fixed when the schedule is compiled (one lane per registered
//! output node); every Compute phase starts by clearing all lanes in place,
//! so a value is only ever visible for entry keys of the batch currently
//! being iterated.
//!
//! Reads are string-keyed for convenience: `store.get("in_range", "c-7")`.

use rustc_hash::FxHashMap;

use crate::module::SignalWrites;
use crate::types::{EntryId, NodeId};

/// Mapping from node name to that node's per-entry boolean values.
///
/// Lanes for registered nodes always exist (possibly empty); a missing lane
/// means the node was never registered with the kernel.
///
/// # Examples
///
/// ```rust
/// use gatewave::store::SignalStore;
/// use gatewave::types::{EntryId, NodeId};
///
/// let mut store = SignalStore::with_nodes([NodeId::from("visible")]);
/// store.insert(&NodeId::from("visible"), &EntryId::from("c-1"), true);
///
/// assert_eq!(store.get("visible", "c-1"), Some(true));
/// assert_eq!(store.get("visible", "c-2"), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SignalStore {
    lanes: FxHashMap<NodeId, FxHashMap<EntryId, bool>>,
}

impl SignalStore {
    /// Build a store with one empty lane per node name.
    pub fn with_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let lanes = nodes
            .into_iter()
            .map(|node| (node, FxHashMap::default()))
            .collect();
        Self { lanes }
    }

    /// Last computed value of `node` for `entry`, if it was produced this
    /// tick.
    #[must_use]
    pub fn get(&self, node: &str, entry: &str) -> Option<bool> {
        self.lanes.get(node)?.get(entry).copied()
    }

    /// The full per-entry lane for `node`, if that node is registered.
    #[must_use]
    pub fn lane(&self, node: &str) -> Option<&FxHashMap<EntryId, bool>> {
        self.lanes.get(node)
    }

    /// Iterate the registered node names.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.lanes.keys()
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.lanes.len()
    }

    /// True when no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Record one value. The lane is created if `node` was not registered,
    /// which keeps hand-built stores in tests ergonomic; the kernel itself
    /// only writes to registered lanes.
    pub fn insert(&mut self, node: &NodeId, entry: &EntryId, value: bool) {
        self.lanes
            .entry(node.clone())
            .or_default()
            .insert(entry.clone(), value);
    }

    /// Clear every lane in place, keeping lane allocations for the next
    /// Compute phase.
    pub(crate) fn reset(&mut self) {
        for lane in self.lanes.values_mut() {
            lane.clear();
        }
    }

    /// Apply a module's writes to its declared outputs for one entry.
    ///
    /// `SignalWrites::One` targets the first output; `SignalWrites::Many`
    /// zips positionally. Surplus values are dropped and unwritten outputs
    /// stay unset for this entry.
    pub(crate) fn commit(&mut self, outputs: &[NodeId], entry: &EntryId, writes: SignalWrites) {
        match writes {
            SignalWrites::One(value) => {
                if let Some(node) = outputs.first() {
                    self.insert(node, entry, value);
                }
            }
            SignalWrites::Many(values) => {
                for (node, value) in outputs.iter().zip(values) {
                    self.insert(node, entry, value);
                }
            }
        }
    }
}
