//! FILENAME: core/drilldown-engine/src/builder/path.rs
//! Path identity shared by both builders.
//!
//! An id is `TAG:` followed by positional segments: division, team,
//! process, factory (only when the record has one), plant, line. A level
//! that is blank or was skipped keeps its slot as an empty segment, so a
//! plant under team `A` with no process (`PL:Production/A//B`) stays
//! distinct from one under process `A` with no team (`PL:Production//A/B`).
//! Inside a segment `\` and `/` are escaped with a backslash, so a team
//! `A/B` (`U:Production/A\/B`) never reads as team `A`, process `B`.

use records::FlatRecord;
use smallvec::SmallVec;
use std::borrow::Cow;

use crate::tree::{HierarchyLevel, NodeId, NodeLabels};

/// Trimmed, non-empty value of a hierarchy field.
pub(crate) fn record_field(record: &FlatRecord, level: HierarchyLevel) -> Option<&str> {
    let value = match level {
        HierarchyLevel::Division => Some(record.division.as_str()),
        HierarchyLevel::Team => record.team.as_deref(),
        HierarchyLevel::Process => record.process.as_deref(),
        HierarchyLevel::Factory => record.factory.as_deref(),
        HierarchyLevel::Plant => record.plant.as_deref(),
        HierarchyLevel::Line => record.line.as_deref(),
    }?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn segments(record: &FlatRecord, through: HierarchyLevel) -> SmallVec<[&str; 6]> {
    let has_factory = record_field(record, HierarchyLevel::Factory).is_some();
    let mut segments: SmallVec<[&str; 6]> = SmallVec::new();
    segments.push(record.division.trim());
    if through == HierarchyLevel::Division {
        return segments;
    }
    for level in HierarchyLevel::BELOW_DIVISION {
        if level == HierarchyLevel::Factory && !has_factory && through != level {
            continue;
        }
        segments.push(record_field(record, level).unwrap_or(""));
        if level == through {
            break;
        }
    }
    segments
}

fn escape_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains(['\\', '/']) {
        Cow::Owned(segment.replace('\\', "\\\\").replace('/', "\\/"))
    } else {
        Cow::Borrowed(segment)
    }
}

pub(crate) fn node_id(record: &FlatRecord, kind: HierarchyLevel) -> NodeId {
    let escaped: SmallVec<[Cow<'_, str>; 6]> =
        segments(record, kind).into_iter().map(escape_segment).collect();
    format!("{}:{}", kind.tag(), escaped.join("/"))
}

/// Id of a division root.
pub(crate) fn division_id(division: &str) -> NodeId {
    format!("{}:{}", HierarchyLevel::Division.tag(), escape_segment(division.trim()))
}

/// Labels of the node for `kind`: fields above and including it.
pub(crate) fn labels_through(record: &FlatRecord, kind: HierarchyLevel) -> NodeLabels {
    let upto = |level: HierarchyLevel| {
        if level <= kind {
            record_field(record, level).map(str::to_string)
        } else {
            None
        }
    };
    NodeLabels {
        division: record.division.trim().to_string(),
        team: upto(HierarchyLevel::Team),
        process: upto(HierarchyLevel::Process),
        factory: upto(HierarchyLevel::Factory),
        plant: upto(HierarchyLevel::Plant),
        line: upto(HierarchyLevel::Line),
    }
}
