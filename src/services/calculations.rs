// src/services/calculations.rs
use log::warn;

use crate::models::{PriceRow, PriceTable};

/// Fill in month-over-month change columns.
///
/// For every row after the first, `change_factor = value / prior value` and
/// `pct_change = (change_factor - 1) * 100`. The first row has no prior month
/// and keeps `None`, so the change series is one element shorter than the
/// price series.
pub fn apply_monthly_changes(table: &mut PriceTable) {
    let rows = table.rows_mut();
    if rows.len() < 2 {
        warn!("Price table too short ({} rows) for change calculation", rows.len());
        return;
    }

    for i in 1..rows.len() {
        let prior = rows[i - 1].value;
        let factor = rows[i].value / prior;
        rows[i].change_factor = Some(factor);
        rows[i].pct_change = Some((factor - 1.0) * 100.0);
    }
}

/// The single worst and best months by percent change, if any are filled in.
pub fn extreme_months(table: &PriceTable) -> Option<(&PriceRow, &PriceRow)> {
    let mut worst: Option<(f64, &PriceRow)> = None;
    let mut best: Option<(f64, &PriceRow)> = None;

    for row in table.iter() {
        let pct = match row.pct_change {
            Some(pct) => pct,
            None => continue,
        };
        if worst.map_or(true, |(w, _)| pct < w) {
            worst = Some((pct, row));
        }
        if best.map_or(true, |(b, _)| pct > b) {
            best = Some((pct, row));
        }
    }

    worst.zip(best).map(|((_, w), (_, b))| (w, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(values: &[f64]) -> PriceTable {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
                    + chrono::Months::new(i as u32);
                (date, *v)
            })
            .collect();
        PriceTable::from_values(rows).unwrap()
    }

    #[test]
    fn change_factor_is_exact_ratio_of_consecutive_values() {
        let mut t = table(&[100.0, 110.0, 99.0, 99.0]);
        apply_monthly_changes(&mut t);

        let rows: Vec<_> = t.iter().collect();
        for pair in rows.windows(2) {
            let expected = pair[1].value / pair[0].value;
            assert_eq!(pair[1].change_factor, Some(expected));
        }
        assert_eq!(rows[1].pct_change, Some(10.0));
        assert_eq!(rows[3].pct_change, Some(0.0));
    }

    #[test]
    fn first_row_has_no_change() {
        let mut t = table(&[100.0, 110.0]);
        apply_monthly_changes(&mut t);

        assert!(t.first().change_factor.is_none());
        assert!(t.first().pct_change.is_none());
        // exactly one fewer change value than price rows
        let filled = t.iter().filter(|r| r.change_factor.is_some()).count();
        assert_eq!(filled, t.len() - 1);
    }

    #[test]
    fn single_row_table_is_left_untouched() {
        let mut t = table(&[100.0]);
        apply_monthly_changes(&mut t);
        assert!(t.first().change_factor.is_none());
    }

    #[test]
    fn extremes_pick_worst_and_best_months() {
        let mut t = table(&[100.0, 80.0, 120.0, 121.0]);
        apply_monthly_changes(&mut t);

        let (worst, best) = extreme_months(&t).unwrap();
        assert_eq!(worst.pct_change, Some(-20.0));
        assert_eq!(best.pct_change, Some(50.0));
    }

    #[test]
    fn extremes_need_filled_changes() {
        let t = table(&[100.0, 80.0]);
        assert!(extreme_months(&t).is_none());
    }
}
