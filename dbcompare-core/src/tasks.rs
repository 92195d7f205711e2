use crate::object::ObjectKind;

/// One entry of the comparison catalog: which kind to fetch from both sides and which
/// report sheet receives its differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonTask {
    pub kind: ObjectKind,
    pub sheet_name: &'static str,
}

/// Ordered catalog driving a comparison run. Order only affects sheet order.
pub const TASK_CATALOG: [ComparisonTask; 8] = [
    ComparisonTask {
        kind: ObjectKind::AllObjects,
        sheet_name: "All Objects",
    },
    ComparisonTask {
        kind: ObjectKind::Table,
        sheet_name: "Tables",
    },
    ComparisonTask {
        kind: ObjectKind::View,
        sheet_name: "Views",
    },
    ComparisonTask {
        kind: ObjectKind::Procedure,
        sheet_name: "Procedures",
    },
    ComparisonTask {
        kind: ObjectKind::Function,
        sheet_name: "Functions",
    },
    ComparisonTask {
        kind: ObjectKind::Sequence,
        sheet_name: "Sequences",
    },
    ComparisonTask {
        kind: ObjectKind::Constraint,
        sheet_name: "Constraints",
    },
    ComparisonTask {
        kind: ObjectKind::Index,
        sheet_name: "Indexes",
    },
];
