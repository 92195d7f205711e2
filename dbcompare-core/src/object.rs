use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of catalog object a comparison task covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    AllObjects,
    Table,
    View,
    Procedure,
    Function,
    Sequence,
    Constraint,
    Index,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::AllObjects,
        ObjectKind::Table,
        ObjectKind::View,
        ObjectKind::Procedure,
        ObjectKind::Function,
        ObjectKind::Sequence,
        ObjectKind::Constraint,
        ObjectKind::Index,
    ];

    /// Stable upper-case label, also used as `object_kind` in the audit table.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::AllObjects => "ALL_OBJECTS",
            ObjectKind::Table => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Sequence => "SEQUENCE",
            ObjectKind::Constraint => "CONSTRAINT",
            ObjectKind::Index => "INDEX",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two database dialects being compared. Oracle is side A, PostgreSQL side B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Oracle,
    Postgres,
}

impl Dialect {
    pub fn label(self) -> &'static str {
        match self {
            Dialect::Oracle => "Oracle",
            Dialect::Postgres => "PostgreSQL",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized descriptor for one catalog object.
///
/// `name`, `object_type` and `schema` are the shared projection every consumer reads;
/// anything dialect-specific lives in [`ObjectDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseObject {
    pub name: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub schema: String,
    #[serde(flatten)]
    pub details: ObjectDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialect")]
pub enum ObjectDetails {
    #[serde(rename_all = "camelCase")]
    Oracle {
        owner: String,
        status: String,
        created: Option<String>,
        last_ddl_time: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Postgres {
        schema_name: String,
        object_type: String,
        created_at: Option<String>,
        updated_at: Option<String>,
    },
}

impl DatabaseObject {
    /// Oracle descriptor with owner = schema and no timestamps.
    pub fn oracle(
        name: impl Into<String>,
        object_type: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        Self {
            name: name.into(),
            object_type: object_type.into(),
            schema: owner.clone(),
            details: ObjectDetails::Oracle {
                owner,
                status: "VALID".to_string(),
                created: None,
                last_ddl_time: None,
            },
        }
    }

    /// Postgres descriptor with schema_name = schema and no timestamps.
    pub fn postgres(
        name: impl Into<String>,
        object_type: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        let schema = schema.into();
        let object_type = object_type.into();
        Self {
            name: name.into(),
            object_type: object_type.clone(),
            schema: schema.clone(),
            details: ObjectDetails::Postgres {
                schema_name: schema,
                object_type,
                created_at: None,
                updated_at: None,
            },
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self.details {
            ObjectDetails::Oracle { .. } => Dialect::Oracle,
            ObjectDetails::Postgres { .. } => Dialect::Postgres,
        }
    }
}
