use crate::dataset::PlayerRow;

pub const DEFAULT_STEP: u32 = 5;

/// One computed percentile, addressed by row index into the table the subset
/// was taken from: (row index, source score column, quantized percentile).
pub type PercentilePatch = (usize, &'static str, u8);

/// Rank percentiles for `columns` over the rows named by `subset`.
///
/// Per column: rows without a numeric value are excluded from ranking and get
/// no percentile; a column with no values at all in the subset is skipped
/// entirely. A value's percentile is the share of in-subset values less than
/// or equal to it (ties share the rank), scaled to 0-100, rounded, then
/// floor-quantized to the nearest lower multiple of `step`.
///
/// Percentiles are relative to exactly the subset passed in; scoping to the
/// right comparison pool is the caller's job.
pub fn compute_percentiles(
    rows: &[PlayerRow],
    subset: &[usize],
    columns: &[&'static str],
    step: u32,
) -> Vec<PercentilePatch> {
    let step = step.clamp(1, 100);
    let mut patches = Vec::new();

    for &column in columns {
        let present: Vec<(usize, f64)> = subset
            .iter()
            .filter_map(|&idx| rows[idx].metric(column).map(|v| (idx, v)))
            .collect();
        if present.is_empty() {
            continue;
        }

        let mut sorted: Vec<f64> = present.iter().map(|(_, v)| *v).collect();
        sorted.sort_by(f64::total_cmp);

        for (idx, value) in &present {
            let leq = sorted.partition_point(|x| x <= value);
            patches.push((*idx, column, quantize(leq, sorted.len(), step)));
        }
    }

    patches
}

/// Computes and writes back in one go. Idempotent: rerunning over the same
/// subset overwrites each percentile with the same value.
pub fn apply_percentiles(
    rows: &mut [PlayerRow],
    subset: &[usize],
    columns: &[&'static str],
    step: u32,
) {
    for (idx, column, pct) in compute_percentiles(rows, subset, columns, step) {
        rows[idx].percentiles.insert(column.to_string(), pct);
    }
}

fn quantize(leq: usize, total: usize, step: u32) -> u8 {
    let pct = (100.0 * leq as f64 / total as f64).round() as u32;
    let bucket = (pct / step) * step;
    bucket.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_floors_to_step_and_clips() {
        // 97 drops to 95; exact 100 survives.
        assert_eq!(quantize(97, 100, 5), 95);
        assert_eq!(quantize(100, 100, 5), 100);
        assert_eq!(quantize(1, 100, 5), 0);
        assert_eq!(quantize(1, 3, 5), 30); // 33.3 -> 33 -> 30
        assert_eq!(quantize(2, 3, 5), 65); // 66.7 -> 67 -> 65
    }

    #[test]
    fn quantize_step_one_keeps_rounded_rank() {
        assert_eq!(quantize(1, 3, 1), 33);
        assert_eq!(quantize(3, 4, 1), 75);
    }
}
