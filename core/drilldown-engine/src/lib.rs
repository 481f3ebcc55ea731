//! FILENAME: core/drilldown-engine/src/lib.rs
//! Hierarchical staffing drilldown.
//!
//! Turns flat records into an aggregated division tree and reads it back as
//! per-job-title rollups. Depends on `records` only for the record model.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the drilldown IS)
//! - `builder`: Fixed-slot and skip-and-prune tree construction
//! - `tree`: The aggregated forest (immutable once built)
//! - `rollup`: On-demand bottom-up sums over the forest
//! - `view`: Renderable rows, columns and expand state
//! - `engine`: Entry points and the interactive session

pub mod builder;
pub mod definition;
pub mod engine;
pub mod rollup;
pub mod tree;
pub mod view;

pub use builder::{build_tree, FixedSlotBuilder, SkipAndPruneBuilder, TreeBuilder};
pub use definition::*;
pub use engine::{
    calculate_drilldown, known_divisions, partition_records, render_drilldown, DrilldownSession,
};
pub use rollup::{MemoRollup, Rollup, RollupEvaluator, RollupPolicy};
pub use tree::*;
pub use view::*;
