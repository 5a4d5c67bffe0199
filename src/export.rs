use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::report::ReportRow;

pub const REPORT_TITLE: &str = "Relatório de Produção";

/// `dd/mm/yyyy`, as shown in the report header.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `Analise_dd-mm-yyyy.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("Analise_{}.csv", date.format("%d-%m-%Y"))
}

/// Write the report: a title block, the header row, then one row per sector
/// with unformatted numbers.
pub fn write_report<W: Write>(writer: W, date: NaiveDate, rows: &[ReportRow]) -> Result<()> {
    let mut out = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    out.write_record([REPORT_TITLE])?;
    out.write_record(["Data:", display_date(date).as_str()])?;
    out.write_record([""])?;
    out.write_record(ReportRow::headers())?;

    for row in rows {
        let mut record = vec![row.sector.clone()];
        record.extend(row.values().iter().map(f64::to_string));
        out.write_record(&record)
            .with_context(|| format!("writing row for sector '{}'", row.sector))?;
    }

    out.flush().context("flushing report")?;
    Ok(())
}

pub fn write_report_to_path(path: &Path, date: NaiveDate, rows: &[ReportRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating report {}", path.display()))?;
    write_report(std::io::BufWriter::new(file), date, rows)?;
    log::info!("Wrote {} sectors to {}", rows.len(), path.display());
    Ok(())
}
