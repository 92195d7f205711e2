use dbcompare_core::{ComparisonResult, DatabaseObject, DiffSide};

/// Largest row count a worksheet accepts, header included.
pub const MAX_SHEET_ROWS: usize = 1_048_576;

pub const DIFFERENCE_HEADERS: [&str; 4] = ["Name", "Type", "Schema", "Status"];
pub const LISTING_HEADERS: [&str; 3] = ["Name", "Type", "Schema"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Text rendered with the header format.
    Label(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) | Cell::Label(s) => Some(s),
            Cell::Number(_) | Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// In-memory worksheet: an optional header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetModel {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetModel {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// `Name, Type, Schema` for every object, in fetch order.
    pub fn listing(name: impl Into<String>, objects: &[DatabaseObject]) -> Self {
        let mut sheet = Self::new(name, &LISTING_HEADERS);
        sheet.rows = objects
            .iter()
            .map(|o| {
                vec![
                    Cell::from(o.name.as_str()),
                    Cell::from(o.object_type.as_str()),
                    Cell::from(o.schema.as_str()),
                ]
            })
            .collect();
        sheet
    }

    /// Oracle-only rows first, then PostgreSQL-only rows, each tagged with its status.
    pub fn differences(name: impl Into<String>, result: &ComparisonResult) -> Self {
        let mut sheet = Self::new(name, &DIFFERENCE_HEADERS);
        for side in DiffSide::BOTH {
            for o in result.side(side) {
                sheet.rows.push(vec![
                    Cell::from(o.name.as_str()),
                    Cell::from(o.object_type.as_str()),
                    Cell::from(o.schema.as_str()),
                    Cell::from(side.status()),
                ]);
            }
        }
        sheet
    }

    /// Rows including the header row, if any.
    pub fn total_rows(&self) -> usize {
        self.rows.len() + usize::from(!self.headers.is_empty())
    }

    /// Text of every data row; non-text cells become empty strings.
    pub fn text_rows(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.text().unwrap_or("")).collect())
            .collect()
    }
}
