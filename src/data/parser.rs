use super::locator::{is_header_row, CELL_TAGS, DATA_CELL_TAGS, ROW_TAGS};
use super::markup::Element;
use super::model::{Headers, ParsedRow, ParsedTable, TOTAL_LABEL};
use super::number::parse_localized_number;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn a located table into headers plus sector rows.
///
/// * The header row is the first row whose first cell starts with the marker.
/// * Rows after it with fewer `<td>` cells than headers are dropped.
/// * Rows named "Total" are pre-aggregated summaries and are dropped.
/// * Numeric cells go through [`parse_localized_number`].
///
/// A table without a header row yields an empty [`ParsedTable`].
pub fn parse_table(table: &Element) -> ParsedTable {
    let rows: Vec<&Element> = table.select(ROW_TAGS).collect();
    let Some(header_index) = rows.iter().position(|row| is_header_row(row)) else {
        return ParsedTable::default();
    };

    let headers = Headers::new(rows[header_index].select(CELL_TAGS).map(header_text).collect());

    let mut parsed = Vec::new();
    for (offset, row) in rows[header_index + 1..].iter().enumerate() {
        let line = header_index + 1 + offset;
        let cells: Vec<&Element> = row.select(DATA_CELL_TAGS).collect();
        if cells.len() < headers.len() {
            log::debug!(
                "Row {line}: {} cells for {} headers, skipped",
                cells.len(),
                headers.len()
            );
            continue;
        }

        let name = cells[Headers::NAME_COLUMN].inner_text().trim().to_string();
        if name.eq_ignore_ascii_case(TOTAL_LABEL) {
            log::debug!("Row {line}: summary row skipped");
            continue;
        }

        let values = cells[Headers::NAME_COLUMN + 1..headers.len()]
            .iter()
            .map(|cell| parse_localized_number(&cell.inner_text()))
            .collect();
        parsed.push(ParsedRow { name, values });
    }

    ParsedTable {
        headers,
        rows: parsed,
    }
}

/// Header label with line breaks removed (`Total<br>(m²)` → `Total(m²)`).
fn header_text(cell: &Element) -> String {
    cell.inner_text().replace('\n', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::markup::parse_fragment;
    use pretty_assertions::assert_eq;

    fn parse(html: &str) -> ParsedTable {
        let root = parse_fragment(html).unwrap();
        let table = root.select(&["table"]).next().unwrap();
        parse_table(table)
    }

    #[test]
    fn summary_row_is_dropped() {
        let table = parse(
            "<table>\
             <tr><th>Setor</th><th>7h</th><th>8h</th><th>Total</th></tr>\
             <tr><td>A</td><td>1</td><td>2</td><td>3</td></tr>\
             <tr><td> TOTAL </td><td>10</td><td>20</td><td>30</td></tr>\
             </table>",
        );
        assert_eq!(table.headers.iter().collect::<Vec<_>>(), vec!["Setor", "7h", "8h", "Total"]);
        assert_eq!(
            table.rows,
            vec![ParsedRow {
                name: "A".into(),
                values: vec![1.0, 2.0, 3.0],
            }]
        );
    }

    #[test]
    fn short_rows_are_dropped() {
        let table = parse(
            "<table>\
             <tr><td>Setor</td><td>7h</td><td>8h</td><td>Total</td></tr>\
             <tr><td>A</td><td>1</td><td>2</td></tr>\
             <tr><td>B</td><td>1</td><td>2</td><td>3</td><td>extra</td></tr>\
             </table>",
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].name, "B");
        assert_eq!(table.rows[0].values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn rows_before_header_are_ignored() {
        let table = parse(
            "<table>\
             <tr><td>Produção por hora</td></tr>\
             <tr><td>X</td><td>9</td></tr>\
             <tr><td>Setor</td><td>7h</td></tr>\
             <tr><td>Norte</td><td>1.234,5</td></tr>\
             </table>",
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].values, vec![1234.5]);
    }

    #[test]
    fn header_cells_lose_line_breaks() {
        let table = parse("<table><tr><th>Setor</th><th>Total<br>(m²)</th></tr></table>");
        assert_eq!(table.headers.get(1), Some("Total(m²)"));
        assert!(table.is_empty());
    }

    #[test]
    fn th_cells_do_not_count_as_data() {
        let table = parse(
            "<table>\
             <tr><th>Setor</th><th>7h</th></tr>\
             <tr><th>A</th><td>1</td></tr>\
             </table>",
        );
        assert!(table.is_empty());
    }

    #[test]
    fn no_header_row_is_empty_not_error() {
        let table = parse("<table><tr><td>Nome</td><td>7h</td></tr></table>");
        assert_eq!(table, ParsedTable::default());
    }
}
