//! FILENAME: core/drilldown-engine/src/builder/fixed_slot.rs
//! Fixed-slot builder: team, process and plant always occupy their slot.

use records::FlatRecord;
use smallvec::SmallVec;

use super::path::record_field;
use super::trie::NodeArena;
use super::TreeBuilder;
use crate::definition::BuilderMode;
use crate::tree::{DrilldownTree, HierarchyLevel};

/// Blank team, process or plant values group under the empty label. Factory
/// and line are materialized only when present; without a line the plant
/// node is the leaf that absorbs the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSlotBuilder;

impl FixedSlotBuilder {
    pub fn new() -> Self {
        FixedSlotBuilder
    }

    fn chain(record: &FlatRecord) -> SmallVec<[HierarchyLevel; 6]> {
        let mut levels: SmallVec<[HierarchyLevel; 6]> = SmallVec::new();
        levels.push(HierarchyLevel::Division);
        levels.push(HierarchyLevel::Team);
        levels.push(HierarchyLevel::Process);
        if record_field(record, HierarchyLevel::Factory).is_some() {
            levels.push(HierarchyLevel::Factory);
        }
        levels.push(HierarchyLevel::Plant);
        if record_field(record, HierarchyLevel::Line).is_some() {
            levels.push(HierarchyLevel::Line);
        }
        levels
    }
}

impl TreeBuilder for FixedSlotBuilder {
    fn mode(&self) -> BuilderMode {
        BuilderMode::FixedSlot
    }

    fn build<'a, I>(&self, records: I) -> DrilldownTree
    where
        I: IntoIterator<Item = &'a FlatRecord>,
    {
        let mut arena = NodeArena::new();
        let mut skipped = 0;
        let mut absorbed = 0;

        for record in records {
            if !record.has_division() {
                skipped += 1;
                continue;
            }
            let leaf = arena.insert_path(record, &Self::chain(record));
            if let Some(node) = leaf.and_then(|idx| arena.node_mut(idx)) {
                node.absorb(record);
                absorbed += 1;
            }
        }

        log::debug!(
            target: "drilldown",
            "fixed-slot build: {} records, {} nodes, {} skipped",
            absorbed,
            arena.len(),
            skipped
        );
        DrilldownTree::new(self.mode(), arena.into_forest(), skipped)
    }
}
