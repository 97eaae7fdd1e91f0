//! Multi-sheet workbook export, one sheet per named result set
//!
//! Rendering needs the `xlsx` cargo feature; without it [`render_workbook`]
//! reports [`OutrightError::WorkbookUnavailable`].

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{OutrightError, Result};
use crate::simulation::{round4, MonthlySummary};
use super::table::format_value;

pub const WORKBOOK_HEADER: [&str; 4] = ["Month", "Avg Rate (%)", "Outright", "1M Spread"];

const MAX_SHEET_NAME: usize = 31;
const MAX_COLUMN_WIDTH: usize = 50;
const ILLEGAL_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// One result set destined for its own sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedResults {
    pub name: String,
    pub results: Vec<MonthlySummary>,
}

impl NamedResults {
    pub fn new(name: impl Into<String>, results: Vec<MonthlySummary>) -> Self {
        Self { name: name.into(), results }
    }
}

/// One data row of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub month: String,
    pub avg_rate: f64,
    pub outright: f64,
    /// This month's outright minus next month's; `None` on the last row
    pub spread: Option<f64>,
}

impl SheetRow {
    fn cells(&self) -> [String; 4] {
        [
            self.month.clone(),
            format_value(self.avg_rate),
            format_value(self.outright),
            self.spread.map_or_else(|| "N/A".to_string(), format_value),
        ]
    }
}

/// Outright spread between consecutive months
pub fn one_month_spreads(results: &[MonthlySummary]) -> Vec<Option<f64>> {
    let mut spreads: Vec<Option<f64>> = results
        .windows(2)
        .map(|pair| Some(round4(pair[0].outright - pair[1].outright)))
        .collect();
    if !results.is_empty() {
        spreads.push(None);
    }
    spreads
}

pub fn sheet_rows(results: &[MonthlySummary]) -> Vec<SheetRow> {
    results
        .iter()
        .zip(one_month_spreads(results))
        .map(|(r, spread)| SheetRow {
            month: r.month.clone(),
            avg_rate: r.avg_rate,
            outright: r.outright,
            spread,
        })
        .collect()
}

/// Strip characters spreadsheets reject and cap the length
///
/// A sheet name may not start or end with an apostrophe, so those are
/// trimmed from both ends.
pub fn sanitize_sheet_name(name: &str, index: usize) -> String {
    let filtered: String = name
        .chars()
        .filter(|c| !ILLEGAL_SHEET_CHARS.contains(c))
        .collect();
    let capped: String = filtered
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = capped.trim_end_matches('\'');
    if cleaned.is_empty() {
        format!("Case {}", index)
    } else {
        cleaned.to_string()
    }
}

/// Sanitized names, suffixed where two cases would collide
pub fn sheet_names(cases: &[NamedResults]) -> Vec<String> {
    let mut seen = HashSet::new();
    cases
        .iter()
        .enumerate()
        .map(|(i, case)| {
            let base = sanitize_sheet_name(&case.name, i);
            let mut candidate = base.clone();
            let mut n = 2;
            while !seen.insert(candidate.to_lowercase()) {
                let suffix = format!(" ({})", n);
                let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
                let stem: String = base.chars().take(keep).collect();
                candidate = format!("{}{}", stem.trim_end_matches('\''), suffix);
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Width per column: longest cell plus 2, capped at 50
pub fn column_widths(rows: &[SheetRow]) -> [usize; 4] {
    let mut widths = WORKBOOK_HEADER.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
}

pub fn workbook_available() -> bool {
    cfg!(feature = "xlsx")
}

#[cfg(feature = "xlsx")]
pub fn render_workbook(cases: &[NamedResults]) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Workbook, XlsxError};

    fn xlsx_err(e: XlsxError) -> OutrightError {
        OutrightError::Workbook(e.to_string())
    }

    let mut workbook = Workbook::new();

    for (case, name) in cases.iter().zip(sheet_names(cases)) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).map_err(xlsx_err)?;

        for (col, header) in WORKBOOK_HEADER.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).map_err(xlsx_err)?;
        }

        let rows = sheet_rows(&case.results);
        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            sheet.write_string(r, 0, row.month.as_str()).map_err(xlsx_err)?;
            sheet.write_number(r, 1, row.avg_rate).map_err(xlsx_err)?;
            sheet.write_number(r, 2, row.outright).map_err(xlsx_err)?;
            match row.spread {
                Some(spread) => sheet.write_number(r, 3, spread).map_err(xlsx_err)?,
                None => sheet.write_string(r, 3, "N/A").map_err(xlsx_err)?,
            };
        }

        for (col, width) in column_widths(&rows).iter().enumerate() {
            sheet.set_column_width(col as u16, *width as f64).map_err(xlsx_err)?;
        }
    }

    log::debug!("Rendered workbook with {} sheets", cases.len());
    workbook.save_to_buffer().map_err(xlsx_err)
}

#[cfg(not(feature = "xlsx"))]
pub fn render_workbook(_cases: &[NamedResults]) -> Result<Vec<u8>> {
    Err(OutrightError::WorkbookUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{AdjustmentMagnitudes, RateEvent, RatePathSimulator};
    use chrono::NaiveDate;

    fn cut_path() -> Vec<MonthlySummary> {
        let events = [RateEvent::new(NaiveDate::from_ymd_opt(2026, 1, 28).unwrap(), -0.25)];
        RatePathSimulator::new(2026).simulate(5.25, &events, &AdjustmentMagnitudes::default())
    }

    #[test]
    fn test_spreads_compare_with_next_month() {
        let spreads = one_month_spreads(&cut_path());
        assert_eq!(spreads.len(), 12);
        // 94.7742 - 95.0
        assert_eq!(spreads[0], Some(-0.2258));
        assert_eq!(spreads[1], Some(0.0));
        assert_eq!(spreads[11], None);
        assert!(one_month_spreads(&[]).is_empty());
    }

    #[test]
    fn test_sheet_rows_render_na_on_last_row() {
        let rows = sheet_rows(&cut_path());
        assert_eq!(rows[11].cells()[3], "N/A");
        assert_eq!(rows[0].cells(), ["Jan 2026", "5.2258", "94.7742", "-0.2258"].map(String::from));
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("Q1/Q2 [cuts]: what?", 0), "Q1Q2 cuts what");
        assert_eq!(sanitize_sheet_name("***", 4), "Case 4");
        let long = "a".repeat(40);
        assert_eq!(sanitize_sheet_name(&long, 0).len(), 31);
    }

    #[test]
    fn test_sheet_names_drop_edge_apostrophes() {
        assert_eq!(sanitize_sheet_name("'Base'", 0), "Base");
        assert_eq!(sanitize_sheet_name("Fed's path", 0), "Fed's path");
        assert_eq!(sanitize_sheet_name("''", 3), "Case 3");
        // 31st character would be an apostrophe after the cap
        let long = format!("{}'tail", "a".repeat(30));
        assert_eq!(sanitize_sheet_name(&long, 0), "a".repeat(30));
    }

    #[test]
    fn test_duplicate_sheet_names_get_suffixes() {
        let cases = vec![
            NamedResults::new("Base", vec![]),
            NamedResults::new("base", vec![]),
            NamedResults::new("", vec![]),
        ];
        assert_eq!(sheet_names(&cases), vec!["Base", "base (2)", "Case 2"]);
    }

    #[test]
    fn test_column_widths_are_capped() {
        let rows = vec![SheetRow {
            month: "x".repeat(80),
            avg_rate: 5.0,
            outright: 95.0,
            spread: None,
        }];
        let widths = column_widths(&rows);
        assert_eq!(widths[0], 50);
        assert_eq!(widths[1], "Avg Rate (%)".len() + 2);
        assert_eq!(widths[3], "1M Spread".len() + 2);
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_workbook_unavailable_without_feature() {
        assert!(!workbook_available());
        let err = render_workbook(&[NamedResults::new("Current", cut_path())]).unwrap_err();
        assert!(matches!(err, OutrightError::WorkbookUnavailable));
        assert_eq!(err.status_code(), 400);
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_workbook_renders_quoted_case_name() {
        let cases = [
            NamedResults::new("'Base'", cut_path()),
            NamedResults::new("Hold", cut_path()),
        ];
        let bytes = render_workbook(&cases).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_workbook_renders_zip_container() {
        let bytes = render_workbook(&[NamedResults::new("Current", cut_path())]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
