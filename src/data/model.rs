use serde::Serialize;

/// Header label of summary rows and of the per-sector total column.
pub const TOTAL_LABEL: &str = "total";

// ---------------------------------------------------------------------------
// Headers – the column names of the located table
// ---------------------------------------------------------------------------

/// Ordered column names, exactly as read from the header row.
///
/// Column [`Headers::NAME_COLUMN`] always holds the sector name; every other
/// column holds a number. Duplicates are kept, so name lookups resolve to the
/// first matching column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Headers {
    names: Vec<String>,
}

impl Headers {
    /// Index of the sector-name column.
    pub const NAME_COLUMN: usize = 0;

    pub fn new(names: Vec<String>) -> Self {
        Headers { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.names.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Numeric columns as `(column index, name)` pairs.
    pub fn value_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.iter().enumerate().skip(Self::NAME_COLUMN + 1)
    }

    /// First column whose name is exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    /// First numeric column named "Total" (case-insensitive).
    pub fn total_column(&self) -> Option<usize> {
        self.value_columns()
            .find(|(_, h)| h.eq_ignore_ascii_case(TOTAL_LABEL))
            .map(|(i, _)| i)
    }
}

// ---------------------------------------------------------------------------
// ParsedRow – one sector line of the table
// ---------------------------------------------------------------------------

/// A single sector row: its name plus one number per numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRow {
    /// Text of the name column, trimmed.
    pub name: String,
    /// `values[i]` belongs to header column `i + 1`.
    pub values: Vec<f64>,
}

impl ParsedRow {
    /// Value at a header column index. The name column has no value.
    pub fn value(&self, column: usize) -> Option<f64> {
        column
            .checked_sub(Headers::NAME_COLUMN + 1)
            .and_then(|i| self.values.get(i))
            .copied()
    }

    /// Value of the first column named `header`.
    pub fn get(&self, headers: &Headers, header: &str) -> Option<f64> {
        headers.position(header).and_then(|i| self.value(i))
    }
}

// ---------------------------------------------------------------------------
// ParsedTable – headers plus sector rows
// ---------------------------------------------------------------------------

/// Result of parsing the located table. Summary and short rows are gone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedTable {
    pub headers: Headers,
    pub rows: Vec<ParsedRow>,
}

impl ParsedTable {
    /// Number of sector rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there is nothing to analyze.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row with the given sector name.
    pub fn row_by_name(&self, name: &str) -> Option<&ParsedRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn sector_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.name.as_str())
    }
}
