//! Tabular projection of a plan for spreadsheet and print writers.
//!
//! Each non-empty day becomes one [`DaySheet`] of flat rows. Sheet names are
//! restricted to ASCII letters and digits and capped at
//! [`MAX_SHEET_NAME_LEN`] characters, the limit spreadsheet formats put on
//! sheet names. Encoding the rows (CSV, workbook, print) is left to the
//! writer; [`ExportRow`] serializes with the column headers as field names.

use serde::Serialize;
use thiserror::Error;

use crate::routine::Plan;

/// Longest sheet name emitted.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Column headers, in row order.
pub const COLUMN_HEADERS: [&str; 3] = ["Ejercicio", "Series", "Repeticiones"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the plan has no days")]
    EmptyPlan,
}

/// One exported exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Ejercicio")]
    pub exercise: String,
    #[serde(rename = "Series")]
    pub sets: u32,
    #[serde(rename = "Repeticiones")]
    pub rep_range: String,
}

impl ExportRow {
    fn cells(&self) -> [String; 3] {
        [self.exercise.clone(), self.sets.to_string(), self.rep_range.clone()]
    }
}

/// One day's worth of rows, ready for a tabular writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySheet {
    /// Sanitized sheet name.
    pub name: String,
    /// Original day label.
    pub label: String,
    pub rows: Vec<ExportRow>,
}

impl DaySheet {
    /// Display width per column: the longest header or cell, plus two.
    pub fn column_widths(&self) -> [usize; 3] {
        let mut widths = COLUMN_HEADERS.map(|h| h.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths.map(|w| w + 2)
    }
}

/// Project `plan` into one sheet per non-empty day, in plan order.
pub fn export_plan(plan: &Plan) -> Result<Vec<DaySheet>, ExportError> {
    if plan.is_empty() {
        return Err(ExportError::EmptyPlan);
    }

    let sheets = plan
        .days()
        .iter()
        .enumerate()
        .filter(|(_, day)| !day.exercises.is_empty())
        .map(|(index, day)| DaySheet {
            name: sheet_name(&day.label, index),
            label: day.label.clone(),
            rows: day
                .exercises
                .iter()
                .map(|ex| ExportRow {
                    exercise: ex.name.clone(),
                    sets: ex.sets,
                    rep_range: ex.rep_range.clone(),
                })
                .collect(),
        })
        .collect();
    Ok(sheets)
}

/// Keep ASCII letters and digits, truncated to [`MAX_SHEET_NAME_LEN`].
///
/// A label with no usable characters becomes `Dia<n>` (1-based position).
pub fn sheet_name(label: &str, index: usize) -> String {
    let name: String = label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if name.is_empty() {
        format!("Dia{}", index + 1)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::build_plan_from_text;

    #[test]
    fn sheet_name_drops_non_ascii_alphanumerics() {
        assert_eq!(sheet_name("Miércoles", 0), "Mircoles");
        assert_eq!(sheet_name("Día 1: Pierna", 0), "Da1Pierna");
    }

    #[test]
    fn sheet_name_truncates() {
        let long = "A".repeat(40);
        assert_eq!(sheet_name(&long, 0).len(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn sheet_name_falls_back_when_nothing_survives() {
        assert_eq!(sheet_name("¡¿?!", 2), "Dia3");
    }

    #[test]
    fn empty_plan_is_rejected() {
        let plan = build_plan_from_text("{}").unwrap().into_plan();
        assert!(matches!(export_plan(&plan), Err(ExportError::EmptyPlan)));
    }

    #[test]
    fn exports_rows_in_plan_order_and_skips_empty_days() {
        let plan = build_plan_from_text(
            r#"{
                "Lunes": [{"ejercicio": "Sentadilla", "series": 4, "repeticiones": "6-8"}],
                "Martes": [],
                "Miércoles": [{"ejercicio": "Remo"}, {"ejercicio": "Curl", "series": 2}]
            }"#,
        )
        .unwrap()
        .into_plan();

        let sheets = export_plan(&plan).unwrap();
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Lunes", "Mircoles"]);
        assert_eq!(sheets[1].label, "Miércoles");
        assert_eq!(
            sheets[1].rows,
            vec![
                ExportRow { exercise: "Remo".into(), sets: 3, rep_range: "8-12".into() },
                ExportRow { exercise: "Curl".into(), sets: 2, rep_range: "8-12".into() },
            ]
        );
    }

    #[test]
    fn column_widths_cover_headers_and_cells() {
        let sheet = DaySheet {
            name: "Lunes".into(),
            label: "Lunes".into(),
            rows: vec![ExportRow {
                exercise: "Peso muerto rumano".into(),
                sets: 4,
                rep_range: "6-8".into(),
            }],
        };
        assert_eq!(sheet.column_widths(), [20, 8, 14]);
    }

    #[test]
    fn rows_serialize_under_column_headers() {
        let row = ExportRow {
            exercise: "Remo".into(),
            sets: 3,
            rep_range: "8-12".into(),
        };
        let value = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, COLUMN_HEADERS);
    }
}
