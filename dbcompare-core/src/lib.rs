pub mod compare;
pub mod object;
pub mod tasks;

pub use compare::{ComparisonResult, DiffSide, MatchKey, MatchStrategy, compare};
pub use object::{DatabaseObject, Dialect, ObjectDetails, ObjectKind};
pub use tasks::{ComparisonTask, TASK_CATALOG};
