//! FILENAME: core/drilldown-engine/src/builder/skip_prune.rs
//! Skip-and-prune builder: only populated levels are materialized.

use records::FlatRecord;
use smallvec::SmallVec;

use super::path::{division_id, record_field};
use super::trie::NodeArena;
use super::TreeBuilder;
use crate::definition::BuilderMode;
use crate::tree::{AggregatedNode, DrilldownTree, HierarchyLevel, NodeLabels};

/// A record lands on the deepest node of its populated path (the division
/// when nothing below it is set). After the build, childless nodes whose
/// own totals sum to zero are removed bottom-up; divisions always stay.
#[derive(Debug, Clone, Default)]
pub struct SkipAndPruneBuilder {
    known_divisions: Vec<String>,
}

impl SkipAndPruneBuilder {
    pub fn new() -> Self {
        SkipAndPruneBuilder::default()
    }

    /// Divisions to materialize up front, in order, even without records.
    pub fn with_known_divisions<I, S>(mut self, divisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_divisions = divisions
            .into_iter()
            .map(|d| d.as_ref().trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }

    fn chain(record: &FlatRecord) -> SmallVec<[HierarchyLevel; 6]> {
        let mut levels: SmallVec<[HierarchyLevel; 6]> = SmallVec::new();
        levels.push(HierarchyLevel::Division);
        levels.extend(
            HierarchyLevel::BELOW_DIVISION
                .into_iter()
                .filter(|&level| record_field(record, level).is_some()),
        );
        levels
    }

    fn seed(&self, arena: &mut NodeArena) {
        for division in &self.known_divisions {
            arena.get_or_insert(None, HierarchyLevel::Division, division, || {
                let labels = NodeLabels {
                    division: division.clone(),
                    ..NodeLabels::default()
                };
                AggregatedNode::new(division_id(division), HierarchyLevel::Division, 0, labels)
            });
        }
    }
}

/// Post-order removal of childless zero-sum nodes below `node`.
fn prune(node: &mut AggregatedNode) -> usize {
    let mut removed = 0;
    for child in &mut node.children {
        removed += prune(child);
    }
    let before = node.children.len();
    node.children
        .retain(|child| !(child.is_leaf() && child.self_totals.sum() == 0.0));
    removed + before - node.children.len()
}

impl TreeBuilder for SkipAndPruneBuilder {
    fn mode(&self) -> BuilderMode {
        BuilderMode::SkipAndPrune
    }

    fn build<'a, I>(&self, records: I) -> DrilldownTree
    where
        I: IntoIterator<Item = &'a FlatRecord>,
    {
        let mut arena = NodeArena::new();
        self.seed(&mut arena);
        let mut skipped = 0;

        for record in records {
            if !record.has_division() {
                skipped += 1;
                continue;
            }
            let deepest = arena.insert_path(record, &Self::chain(record));
            if let Some(node) = deepest.and_then(|idx| arena.node_mut(idx)) {
                node.absorb(record);
            }
        }

        let built = arena.len();
        let mut roots = arena.into_forest();
        let pruned: usize = roots.iter_mut().map(prune).sum();

        log::debug!(
            target: "drilldown",
            "skip-and-prune build: {} nodes, {} pruned, {} skipped",
            built,
            pruned,
            skipped
        );
        DrilldownTree::new(self.mode(), roots, skipped)
    }
}
