use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::rankings::{self, SlotRanking};

pub struct ExportReport {
    pub sheets: usize,
    pub rows: usize,
}

/// Writes one worksheet per slot leaderboard, plus a summary sheet with the
/// scope label and per-slot counts.
pub fn export_leaderboards(
    path: &Path,
    scope_label: &str,
    slot_rankings: &[SlotRanking],
    top_n: usize,
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut rows_written = 0usize;

    let mut summary = vec![
        vec!["Scope".to_string(), scope_label.to_string()],
        vec![
            "Exported".to_string(),
            chrono::Utc::now().to_rfc3339(),
        ],
        vec![String::new(), String::new()],
        vec!["Position".to_string(), "Players".to_string()],
    ];
    for ranking in slot_rankings {
        summary.push(vec![
            ranking.slot.label().to_string(),
            ranking.rows.len().to_string(),
        ]);
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary)?;
        rows_written += summary.len();
    }

    for ranking in slot_rankings {
        let columns = rankings::display_columns(ranking.slot);
        let board = rankings::top_n(&ranking.rows, top_n, &columns);

        let mut table = vec![board.columns.clone()];
        table.extend(board.rows.iter().cloned());

        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(ranking.slot.label()))?;
        write_rows(sheet, &table)?;
        rows_written += table.len();
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        sheets: slot_rankings.len() + 1,
        rows: rows_written,
    })
}

// Excel sheet names cap at 31 chars.
fn sheet_name(label: &str) -> String {
    label.chars().take(31).collect()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
