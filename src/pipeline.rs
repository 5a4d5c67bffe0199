//! Paste validation and the extract pipeline.
//!
//! ```text
//!  paste ──► inspect_paste ──► PasteState::Accepted(content)
//!                                      │  (explicit extract)
//!                                      ▼
//!  parse_fragment ─► find_target_table ─► parse_table ─► ProductionAggregator
//!                                                               │
//!                                                               ▼
//!                                                          Extraction
//! ```
//!
//! Every call rebuilds its result from scratch; nothing is cached here.

use serde::Serialize;

use crate::analysis::{derive_stats, AnalysisResult, DerivedStats, ProductionAggregator};
use crate::config::PeriodConfig;
use crate::data::locator::find_target_table;
use crate::data::markup::parse_fragment;
use crate::data::model::ParsedTable;
use crate::data::parser::parse_table;
use crate::error::ExtractError;
use crate::report::{report_rows, ReportRow};

// ---------------------------------------------------------------------------
// Paste validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PasteState {
    /// Nothing pasted yet, or the clipboard was empty.
    #[default]
    Empty,
    /// Content with a recognizable production table, kept for extraction.
    Accepted(String),
    /// Content was pasted but no production table was found in it.
    Rejected,
}

/// Check a clipboard payload as soon as it is pasted. HTML is preferred over
/// the plain-text flavour.
pub fn inspect_paste(html: &str, text: &str) -> PasteState {
    let content = if html.is_empty() { text } else { html };
    if content.is_empty() {
        return PasteState::Empty;
    }
    match parse_fragment(content) {
        Ok(root) if find_target_table(&root).is_some() => PasteState::Accepted(content.to_string()),
        Ok(_) => PasteState::Rejected,
        Err(e) => {
            log::warn!("Pasted content could not be read: {e}");
            PasteState::Rejected
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Everything one extraction produced. Consumers (charts, sector table,
/// export) read it and never mutate it.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub table: ParsedTable,
    pub analysis: AnalysisResult,
    pub config: PeriodConfig,
}

impl Extraction {
    /// Sector shown first: the second row when there are at least two.
    pub fn default_index(&self) -> usize {
        if self.analysis.len() >= 2 {
            1
        } else {
            0
        }
    }

    pub fn derived(&self, index: usize) -> Option<DerivedStats> {
        self.analysis
            .sectors
            .get(index)
            .map(|s| derive_stats(s, &self.config.durations))
    }

    pub fn report_rows(&self) -> Vec<ReportRow> {
        report_rows(&self.analysis.sectors, &self.config.durations)
    }
}

/// Run the full pipeline over pasted content.
pub fn extract(content: &str, config: &PeriodConfig) -> Result<Extraction, ExtractError> {
    if content.trim().is_empty() {
        return Err(ExtractError::NoContent);
    }

    let root = parse_fragment(content).inspect_err(|e| log::error!("Markup parsing failed: {e}"))?;
    let table_el = find_target_table(&root).ok_or(ExtractError::NotFound)?;

    let table = parse_table(table_el);
    if table.is_empty() {
        log::warn!(
            "Production table has {} columns but no sector rows",
            table.headers.len()
        );
        return Err(ExtractError::Empty);
    }

    let analysis = ProductionAggregator::from_config(config).aggregate(&table);
    log::info!(
        "Extracted {} sectors over {} columns (config {}), grand total {:.2}",
        analysis.len(),
        table.headers.len(),
        config.version,
        analysis.grand_total
    );

    Ok(Extraction {
        table,
        analysis,
        config: config.clone(),
    })
}
