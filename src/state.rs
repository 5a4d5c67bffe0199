use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::chart::{hourly_chart, overview_pie, production_chart, HourlyChart, PieSlice, ProductionChart};
use crate::config::PeriodConfig;
use crate::error::ExtractError;
use crate::pipeline::{extract, inspect_paste, Extraction, PasteState};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Owned by whatever drives the screen. The last successful [`Extraction`]
/// lives here and is replaced wholesale by the next one.
pub struct Session {
    /// Period rules handed to every extraction.
    pub config: PeriodConfig,

    /// Outcome of the last paste.
    pub paste: PasteState,

    /// Reference date printed on the report (required to extract).
    pub report_date: Option<NaiveDate>,

    /// Result of the last successful extraction.
    pub extraction: Option<Extraction>,

    /// Sector shown in the overview pie.
    pub overview_index: usize,

    /// Row indices of sectors drawn on the hourly chart.
    pub selected_rows: BTreeSet<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PeriodConfig::default())
    }
}

impl Session {
    pub fn new(config: PeriodConfig) -> Self {
        Self {
            config,
            paste: PasteState::Empty,
            report_date: None,
            extraction: None,
            overview_index: 0,
            selected_rows: BTreeSet::new(),
            status_message: None,
        }
    }

    /// Validate a clipboard payload; only accepted content can be extracted.
    pub fn paste(&mut self, html: &str, text: &str) -> &PasteState {
        self.paste = inspect_paste(html, text);
        self.status_message = None;
        &self.paste
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.report_date = date;
    }

    /// Run the pipeline over the accepted paste. On failure the previous
    /// extraction (if any) stays in place and the status line explains why.
    pub fn extract(&mut self) -> Result<&Extraction, ExtractError> {
        match self.run_extraction() {
            Ok(extraction) => {
                let default_index = extraction.default_index();
                self.overview_index = default_index;
                self.selected_rows = BTreeSet::from([default_index]);
                self.status_message = None;
                Ok(self.extraction.insert(extraction))
            }
            Err(e) => {
                if e.is_internal() {
                    log::error!("Extraction failed: {e}");
                } else {
                    log::warn!("Extraction stopped: {e}");
                }
                self.status_message = Some(e.status_message().to_string());
                Err(e)
            }
        }
    }

    fn run_extraction(&self) -> Result<Extraction, ExtractError> {
        if self.report_date.is_none() {
            return Err(ExtractError::MissingDate);
        }
        match &self.paste {
            PasteState::Accepted(content) => extract(content, &self.config),
            PasteState::Empty | PasteState::Rejected => Err(ExtractError::NoContent),
        }
    }

    /// Back to the input screen.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    fn sector_count(&self) -> usize {
        self.extraction.as_ref().map_or(0, |e| e.analysis.len())
    }

    /// Choose the overview sector; out-of-range indices are ignored.
    pub fn select_overview(&mut self, index: usize) {
        if index < self.sector_count() {
            self.overview_index = index;
        }
    }

    /// Toggle a sector on the hourly chart by name (first row with that name).
    pub fn toggle_sector(&mut self, name: &str) {
        let Some(index) = self
            .extraction
            .as_ref()
            .and_then(|e| e.table.rows.iter().position(|r| r.name == name))
        else {
            return;
        };
        if !self.selected_rows.remove(&index) {
            self.selected_rows.insert(index);
        }
    }

    pub fn select_all_sectors(&mut self) {
        self.selected_rows = (0..self.sector_count()).collect();
    }

    pub fn select_no_sectors(&mut self) {
        self.selected_rows.clear();
    }

    /// Names of the selected sectors, in table order.
    pub fn selected_sectors(&self) -> Vec<&str> {
        let Some(extraction) = &self.extraction else {
            return Vec::new();
        };
        self.selected_rows
            .iter()
            .filter_map(|&i| extraction.table.rows.get(i))
            .map(|r| r.name.as_str())
            .collect()
    }

    // -- Chart data for the current selection --

    pub fn production_chart(&self) -> Option<ProductionChart> {
        self.extraction
            .as_ref()
            .map(|e| production_chart(&e.analysis.sectors))
    }

    pub fn overview(&self) -> Option<Vec<PieSlice>> {
        let extraction = self.extraction.as_ref()?;
        let sector = extraction.analysis.sectors.get(self.overview_index)?;
        Some(overview_pie(sector, &extraction.config.durations))
    }

    pub fn hourly_chart(&self) -> Option<HourlyChart> {
        let extraction = self.extraction.as_ref()?;
        Some(hourly_chart(
            &extraction.table,
            &extraction.config.boundaries,
            &self.selected_sectors(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "<table><tr><th>Setor</th><th>8h</th><th>14h</th></tr>\
                         <tr><td>A</td><td>1</td><td>2</td></tr>\
                         <tr><td>B</td><td>3</td><td>4</td></tr>\
                         <tr><td>C</td><td>5</td><td>6</td></tr></table>";

    fn date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 5, 20)
    }

    fn ready() -> Session {
        let mut session = Session::default();
        session.paste(TABLE, "");
        session.set_date(date());
        session.extract().unwrap();
        session
    }

    #[test]
    fn extraction_selects_second_sector() {
        let session = ready();
        assert_eq!(session.overview_index, 1);
        assert_eq!(session.selected_sectors(), vec!["B"]);
        assert!(session.status_message.is_none());
    }

    #[test]
    fn date_is_required() {
        let mut session = Session::default();
        session.paste(TABLE, "");
        assert!(matches!(session.extract(), Err(ExtractError::MissingDate)));
        assert_eq!(
            session.status_message.as_deref(),
            Some(ExtractError::MissingDate.status_message())
        );
    }

    #[test]
    fn failed_extraction_keeps_previous_result() {
        let mut session = ready();
        session.paste("<p>nada</p>", "");
        assert_eq!(session.paste, PasteState::Rejected);
        assert!(session.extract().is_err());
        assert_eq!(session.extraction.as_ref().map(|e| e.analysis.len()), Some(3));
        assert!(session.status_message.is_some());
    }

    #[test]
    fn toggling_keeps_table_order() {
        let mut session = ready();
        session.toggle_sector("C");
        session.toggle_sector("A");
        assert_eq!(session.selected_sectors(), vec!["A", "B", "C"]);
        session.toggle_sector("B");
        session.toggle_sector("nope");
        assert_eq!(session.selected_sectors(), vec!["A", "C"]);

        session.select_no_sectors();
        assert!(session.selected_sectors().is_empty());
        session.select_all_sectors();
        assert_eq!(session.hourly_chart().unwrap().series.len(), 3);
    }

    #[test]
    fn overview_follows_selection() {
        let mut session = ready();
        session.select_overview(2);
        assert_eq!(session.overview().unwrap()[0].value, 5.0);
        session.select_overview(9);
        assert_eq!(session.overview_index, 2);
    }

    #[test]
    fn reset_returns_to_input() {
        let mut session = ready();
        session.reset();
        assert!(session.extraction.is_none());
        assert_eq!(session.paste, PasteState::Empty);
        assert!(session.report_date.is_none());
        assert!(session.production_chart().is_none());
    }
}
