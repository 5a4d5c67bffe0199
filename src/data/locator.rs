use super::markup::{normalize_ws, Element};

/// Lower-case prefix identifying the header row of the production table.
pub const SECTOR_MARKER: &str = "setor";

pub(crate) const TABLE_TAGS: &[&str] = &["table"];
pub(crate) const ROW_TAGS: &[&str] = &["tr"];
pub(crate) const CELL_TAGS: &[&str] = &["th", "td"];
pub(crate) const DATA_CELL_TAGS: &[&str] = &["td"];

/// Whether the first header-or-data cell of `row` starts with the marker.
pub fn is_header_row(row: &Element) -> bool {
    row.select(CELL_TAGS)
        .next()
        .is_some_and(|cell| normalize_ws(&cell.inner_text()).to_lowercase().starts_with(SECTOR_MARKER))
}

/// First table, in document order, containing a row that starts with
/// [`SECTOR_MARKER`]. Layout and menu tables pasted alongside are skipped.
pub fn find_target_table(root: &Element) -> Option<&Element> {
    let found = root
        .select(TABLE_TAGS)
        .enumerate()
        .find(|(_, table)| table.select(ROW_TAGS).any(is_header_row));

    match found {
        Some((index, table)) => {
            log::debug!("Production table found at table #{index}");
            Some(table)
        }
        None => {
            log::debug!("No table with a '{SECTOR_MARKER}' header row");
            None
        }
    }
}
