//! FILENAME: core/drilldown-engine/src/builder/trie.rs
//! Build-time arena. Nodes are addressed by index while records stream in,
//! then folded into the owned forest in one pass.

use records::FlatRecord;
use rustc_hash::FxHashMap;

use super::path::{labels_through, node_id, record_field};
use crate::tree::{AggregatedNode, HierarchyLevel};

struct Slot {
    node: AggregatedNode,
    children: Vec<usize>,
}

/// Grouping key: the trimmed label of one level inside its parent.
type ChildKey = (Option<usize>, HierarchyLevel, String);

/// Nodes grouped per parent, level and label. Children only ever get higher
/// indices than their parent.
#[derive(Default)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    index: FxHashMap<ChildKey, usize>,
    roots: Vec<usize>,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        NodeArena::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the index of the `kind` node labelled `label` under `parent`,
    /// creating it on first sight. Insertion order is preserved among
    /// siblings.
    pub(crate) fn get_or_insert(
        &mut self,
        parent: Option<usize>,
        kind: HierarchyLevel,
        label: &str,
        make: impl FnOnce() -> AggregatedNode,
    ) -> usize {
        let key = (parent, kind, label.to_string());
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.slots.len();
        self.index.insert(key, idx);
        self.slots.push(Slot {
            node: make(),
            children: Vec::new(),
        });
        match parent.and_then(|p| self.slots.get_mut(p)) {
            Some(parent) => parent.children.push(idx),
            None => self.roots.push(idx),
        }
        idx
    }

    /// Walks (creating as needed) the chain of `levels` for one record and
    /// returns the index of the deepest node.
    pub(crate) fn insert_path(
        &mut self,
        record: &FlatRecord,
        levels: &[HierarchyLevel],
    ) -> Option<usize> {
        let has_factory = record_field(record, HierarchyLevel::Factory).is_some();
        let mut parent = None;
        for &kind in levels {
            let label = match kind {
                HierarchyLevel::Division => record.division.trim(),
                _ => record_field(record, kind).unwrap_or(""),
            };
            let idx = self.get_or_insert(parent, kind, label, || {
                AggregatedNode::new(
                    node_id(record, kind),
                    kind,
                    kind.depth(has_factory),
                    labels_through(record, kind),
                )
            });
            parent = Some(idx);
        }
        parent
    }

    pub(crate) fn node_mut(&mut self, idx: usize) -> Option<&mut AggregatedNode> {
        self.slots.get_mut(idx).map(|slot| &mut slot.node)
    }

    /// Folds the arena into owned roots. Slots are consumed from the back so
    /// every child is complete before its parent claims it.
    pub(crate) fn into_forest(mut self) -> Vec<AggregatedNode> {
        let mut finished: FxHashMap<usize, AggregatedNode> = FxHashMap::default();
        while let Some(slot) = self.slots.pop() {
            let idx = self.slots.len();
            let mut node = slot.node;
            node.children = slot
                .children
                .iter()
                .filter_map(|child| finished.remove(child))
                .collect();
            finished.insert(idx, node);
        }
        self.roots
            .iter()
            .filter_map(|root| finished.remove(root))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeLabels;

    fn bare(id: &str, kind: HierarchyLevel) -> impl FnOnce() -> AggregatedNode + '_ {
        move || AggregatedNode::new(id.to_string(), kind, 0, NodeLabels::default())
    }

    #[test]
    fn same_label_resolves_to_same_slot() {
        let mut arena = NodeArena::new();
        let a = arena.get_or_insert(None, HierarchyLevel::Division, "A", bare("D:A", HierarchyLevel::Division));
        let again = arena.get_or_insert(None, HierarchyLevel::Division, "A", bare("D:A", HierarchyLevel::Division));
        assert_eq!(a, again);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn labels_group_per_parent_and_level() {
        let mut arena = NodeArena::new();
        let d = arena.get_or_insert(None, HierarchyLevel::Division, "D", bare("D:D", HierarchyLevel::Division));
        let t1 = arena.get_or_insert(Some(d), HierarchyLevel::Team, "X", bare("U:D/X", HierarchyLevel::Team));
        let p1 = arena.get_or_insert(Some(d), HierarchyLevel::Process, "X", bare("P:D//X", HierarchyLevel::Process));
        let t2 = arena.get_or_insert(Some(t1), HierarchyLevel::Process, "X", bare("P:D/X/X", HierarchyLevel::Process));
        assert_ne!(t1, p1);
        assert_ne!(p1, t2);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn forest_keeps_first_seen_order() {
        let mut arena = NodeArena::new();
        let b = arena.get_or_insert(None, HierarchyLevel::Division, "B", bare("D:B", HierarchyLevel::Division));
        let a = arena.get_or_insert(None, HierarchyLevel::Division, "A", bare("D:A", HierarchyLevel::Division));
        arena.get_or_insert(Some(b), HierarchyLevel::Team, "2", bare("U:B/2", HierarchyLevel::Team));
        arena.get_or_insert(Some(a), HierarchyLevel::Team, "1", bare("U:A/1", HierarchyLevel::Team));
        arena.get_or_insert(Some(b), HierarchyLevel::Team, "1", bare("U:B/1", HierarchyLevel::Team));

        let forest = arena.into_forest();
        let ids: Vec<&str> = forest.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["D:B", "D:A"]);
        let b_children: Vec<&str> = forest[0].children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(b_children, vec!["U:B/2", "U:B/1"]);
        assert_eq!(forest[1].children.len(), 1);
    }
}
