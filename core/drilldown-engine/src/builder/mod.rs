//! FILENAME: core/drilldown-engine/src/builder/mod.rs
//! Tree builders.
//!
//! Two interchangeable strategies turn flat records into an aggregated
//! forest. They share path identity and the build arena, and differ in
//! which levels get materialized and whether empty leaves survive.

mod fixed_slot;
mod path;
mod skip_prune;
mod trie;

pub use fixed_slot::FixedSlotBuilder;
pub use skip_prune::SkipAndPruneBuilder;

use records::FlatRecord;

use crate::definition::BuilderMode;
use crate::tree::DrilldownTree;

/// A strategy for building a drilldown tree from records.
pub trait TreeBuilder {
    fn mode(&self) -> BuilderMode;

    /// Builds a fresh tree. Records with a blank division are skipped and
    /// counted in `DrilldownTree::skipped_records`.
    fn build<'a, I>(&self, records: I) -> DrilldownTree
    where
        I: IntoIterator<Item = &'a FlatRecord>;
}

/// Builds with the default configuration of the given mode.
pub fn build_tree<'a, I>(mode: BuilderMode, records: I) -> DrilldownTree
where
    I: IntoIterator<Item = &'a FlatRecord>,
{
    match mode {
        BuilderMode::FixedSlot => FixedSlotBuilder::new().build(records),
        BuilderMode::SkipAndPrune => SkipAndPruneBuilder::new().build(records),
    }
}
