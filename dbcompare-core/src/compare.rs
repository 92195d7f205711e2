use crate::object::{DatabaseObject, Dialect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How two descriptors are matched across databases. Both strategies ignore case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Match on `(name, type)`.
    #[default]
    NameAndType,
    /// Match on `name` alone; a table and a view with the same name are the same object.
    NameOnly,
}

/// Normalized, case-folded comparison key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    name: String,
    object_type: Option<String>,
}

impl MatchStrategy {
    pub fn key(self, object: &DatabaseObject) -> MatchKey {
        let name = object.name.to_lowercase();
        let object_type = match self {
            MatchStrategy::NameAndType => Some(object.object_type.to_lowercase()),
            MatchStrategy::NameOnly => None,
        };
        MatchKey { name, object_type }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::NameAndType => "name_and_type",
            MatchStrategy::NameOnly => "name_only",
        }
    }
}

/// Objects present on exactly one side, in the order they were fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub only_in_a: Vec<DatabaseObject>,
    pub only_in_b: Vec<DatabaseObject>,
}

impl ComparisonResult {
    pub fn is_empty(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }

    pub fn difference_count(&self) -> usize {
        self.only_in_a.len() + self.only_in_b.len()
    }

    pub fn side(&self, side: DiffSide) -> &[DatabaseObject] {
        match side {
            DiffSide::OnlyInA => &self.only_in_a,
            DiffSide::OnlyInB => &self.only_in_b,
        }
    }
}

/// Which side of a comparison a difference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffSide {
    /// Present in Oracle (side A), absent in PostgreSQL.
    OnlyInA,
    /// Present in PostgreSQL (side B), absent in Oracle.
    OnlyInB,
}

impl DiffSide {
    pub const BOTH: [DiffSide; 2] = [DiffSide::OnlyInA, DiffSide::OnlyInB];

    /// Database the objects were found in.
    pub fn dialect(self) -> Dialect {
        match self {
            DiffSide::OnlyInA => Dialect::Oracle,
            DiffSide::OnlyInB => Dialect::Postgres,
        }
    }

    /// Label written to the `Status` report column and the audit `status` column.
    pub fn status(self) -> &'static str {
        match self {
            DiffSide::OnlyInA => "Only in Oracle",
            DiffSide::OnlyInB => "Only in PostgreSQL",
        }
    }

    /// Label written to the audit `source_db` column.
    pub fn source_db(self) -> &'static str {
        self.dialect().label()
    }
}

/// Symmetric difference of `a` and `b` under `strategy`.
///
/// Duplicates on one side are kept as-is: each copy is reported if its key is missing
/// from the other side.
pub fn compare(
    a: &[DatabaseObject],
    b: &[DatabaseObject],
    strategy: MatchStrategy,
) -> ComparisonResult {
    ComparisonResult {
        only_in_a: missing_from(a, b, strategy),
        only_in_b: missing_from(b, a, strategy),
    }
}

fn missing_from(
    source: &[DatabaseObject],
    other: &[DatabaseObject],
    strategy: MatchStrategy,
) -> Vec<DatabaseObject> {
    let other_keys: HashSet<MatchKey> = other.iter().map(|o| strategy.key(o)).collect();
    source
        .iter()
        .filter(|o| !other_keys.contains(&strategy.key(o)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ora(name: &str, ty: &str) -> DatabaseObject {
        DatabaseObject::oracle(name, ty, "TEST_ORA")
    }

    fn pg(name: &str, ty: &str) -> DatabaseObject {
        DatabaseObject::postgres(name, ty, "test_pg")
    }

    fn names(objects: &[DatabaseObject]) -> Vec<&str> {
        objects.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn shared_keys_appear_in_neither_side() {
        let a = vec![ora("A", "TABLE"), ora("ORA_ONLY", "TABLE")];
        let b = vec![pg("a", "table"), pg("PG_ONLY", "TABLE")];

        let result = compare(&a, &b, MatchStrategy::NameAndType);
        assert_eq!(names(&result.only_in_a), vec!["ORA_ONLY"]);
        assert_eq!(names(&result.only_in_b), vec!["PG_ONLY"]);
        assert_eq!(result.difference_count(), 2);
    }

    #[test]
    fn comparing_a_list_with_itself_is_empty() {
        let a = vec![ora("X", "VIEW"), ora("Y", "TABLE"), ora("Y", "TABLE")];
        let result = compare(&a, &a, MatchStrategy::NameAndType);
        assert!(result.is_empty());

        let result = compare(&a, &a, MatchStrategy::NameOnly);
        assert!(result.is_empty());
    }

    #[test]
    fn empty_side_returns_other_side_verbatim() {
        let a = vec![ora("Z", "TABLE"), ora("B", "VIEW"), ora("M", "INDEX")];

        let result = compare(&a, &[], MatchStrategy::NameAndType);
        assert_eq!(result.only_in_a, a);
        assert!(result.only_in_b.is_empty());

        let result = compare(&[], &a, MatchStrategy::NameAndType);
        assert!(result.only_in_a.is_empty());
        assert_eq!(result.only_in_b, a);

        assert!(compare(&[], &[], MatchStrategy::NameAndType).is_empty());
    }

    #[test]
    fn matching_ignores_case_of_name_and_type() {
        let result = compare(
            &[ora("Foo", "TABLE")],
            &[pg("foo", "table")],
            MatchStrategy::NameAndType,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn strategy_decides_whether_type_participates() {
        let a = vec![ora("ORDERS", "TABLE")];
        let b = vec![pg("orders", "VIEW")];

        let by_type = compare(&a, &b, MatchStrategy::NameAndType);
        assert_eq!(names(&by_type.only_in_a), vec!["ORDERS"]);
        assert_eq!(names(&by_type.only_in_b), vec!["orders"]);

        let by_name = compare(&a, &b, MatchStrategy::NameOnly);
        assert!(by_name.is_empty());
    }

    #[test]
    fn side_labels_name_the_source_database() {
        assert_eq!(DiffSide::OnlyInA.status(), "Only in Oracle");
        assert_eq!(DiffSide::OnlyInA.source_db(), "Oracle");
        assert_eq!(DiffSide::OnlyInB.status(), "Only in PostgreSQL");
        assert_eq!(DiffSide::OnlyInB.source_db(), "PostgreSQL");
    }

    #[test]
    fn duplicates_are_reported_individually() {
        let a = vec![ora("DUP", "TABLE"), ora("DUP", "TABLE"), ora("KEEP", "TABLE")];
        let b = vec![pg("keep", "TABLE")];

        let result = compare(&a, &b, MatchStrategy::NameAndType);
        assert_eq!(names(&result.only_in_a), vec!["DUP", "DUP"]);
        assert!(result.only_in_b.is_empty());
    }

    #[test]
    fn outputs_partition_unshared_elements() {
        let a = vec![
            ora("T1", "TABLE"),
            ora("T2", "TABLE"),
            ora("V1", "VIEW"),
            ora("S1", "SEQUENCE"),
        ];
        let b = vec![pg("t2", "TABLE"), pg("v1", "VIEW"), pg("f1", "FUNCTION")];
        let strategy = MatchStrategy::NameAndType;

        let result = compare(&a, &b, strategy);
        let b_keys: HashSet<_> = b.iter().map(|o| strategy.key(o)).collect();
        let a_keys: HashSet<_> = a.iter().map(|o| strategy.key(o)).collect();

        let expected_a: Vec<_> = a
            .iter()
            .filter(|o| !b_keys.contains(&strategy.key(o)))
            .cloned()
            .collect();
        let expected_b: Vec<_> = b
            .iter()
            .filter(|o| !a_keys.contains(&strategy.key(o)))
            .cloned()
            .collect();

        assert_eq!(result.only_in_a, expected_a);
        assert_eq!(result.only_in_b, expected_b);
        assert_eq!(names(&result.only_in_a), vec!["T1", "S1"]);
        assert_eq!(names(&result.only_in_b), vec!["f1"]);
    }
}
