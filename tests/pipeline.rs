// End-to-end run over a synthetic provider CSV: parse, derive changes, and
// compare the return models against hand-computed figures.

use chrono::{Months, NaiveDate};
use std::fmt::Write;

use sp500_horizon::services::{calculations, prices, recessions, returns};

fn ymd(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

/// 50 years of monthly rows from Jan 1950, growing 0.4% a month, with a few
/// malformed lines the loader must drop.
fn provider_csv() -> String {
    let mut csv = String::from("Date,SP500,Real Price\n");
    let start = ymd(1950, 1);
    for i in 0..600u32 {
        let date = start + Months::new(i);
        let value = 100.0 * 1.004f64.powi(i as i32);
        writeln!(csv, "{},0.0,{}", date, value).unwrap();
    }
    csv.push_str("1950-06-15,0.0,123.0\n");
    csv.push_str("2000-01-01,0.0,oops\n");
    csv
}

const RECESSIONS_CSV: &str = "\
peak,trough
1957-08-01,1958-04-01
1973-11-01,1975-03-01
1999-12-01,
";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}

#[test]
fn full_report_pipeline() {
    let mut table = prices::parse_price_table(provider_csv().as_bytes()).unwrap();
    assert_eq!(table.len(), 600);

    calculations::apply_monthly_changes(&mut table);
    let second = table.row_by_id(2).unwrap();
    assert!(close(second.change_factor.unwrap(), 1.004));

    let recession_table =
        recessions::parse_recessions(RECESSIONS_CSV.as_bytes(), ymd(2000, 1)).unwrap();
    // the open 1999 recession is clamped to the reference month
    assert_eq!(recession_table.last().unwrap().end, ymd(2000, 1));

    // simple hold over the whole table
    let held = returns::buy_and_hold_quick(&table, ymd(1950, 1), ymd(1999, 12), 10_000.0).unwrap();
    let expected_ratio = table.last().value / table.first().value;
    assert!(close(returns::end_value(&held).unwrap(), 10_000.0 * expected_ratio));

    // 40-year window with dividends, checked against the closed form
    let series = returns::compound_40y(&table, ymd(1950, 1), 10_000.0, 0.04).unwrap();
    let end_row = table.row_by_date(ymd(1990, 1)).unwrap();
    let expected = 10_000.0 * end_row.value / table.first().value * 1.04f64.powi(40);
    assert!(close(returns::end_value(&series).unwrap(), expected));

    // delaying entry to the 1958 trough, horizon anchored at the 1957 peak
    let dip = returns::buy_the_dip(&table, &recession_table, ymd(1957, 8), 10_000.0, 0.04).unwrap();
    assert_eq!(dip[0].date, ymd(1958, 4));
    assert_eq!(dip[0].invested_value, 10_000.0);
    assert_eq!(dip.last().unwrap().date, ymd(1997, 8));
}

#[test]
fn ten_thousand_from_1871_tracks_the_price_ratio() {
    // Jan 1871 real price was 70.77; against a ~2966 endpoint the headline
    // figure lands around $419k.
    let mut csv = String::from("Date,Real Price\n1871-01-01,70.77\n");
    let start = ymd(1871, 1);
    for i in 1..=3u32 {
        writeln!(csv, "{},{}", start + Months::new(i), 70.77 + i as f64).unwrap();
    }
    writeln!(csv, "{},2965.66", start + Months::new(4)).unwrap();
    let table = prices::parse_price_table(csv.as_bytes()).unwrap();

    let held =
        returns::buy_and_hold_quick(&table, start, table.last().date, 10_000.0).unwrap();
    let end = returns::end_value(&held).unwrap();
    assert!(close(end, 10_000.0 * 2965.66 / 70.77));
    assert!((end - 419_055.0).abs() < 50.0);
}

#[test]
fn bundled_recession_table_parses() {
    let data = std::fs::read(concat!(env!("CARGO_MANIFEST_DIR"), "/data/recessions.csv")).unwrap();
    let recession_table =
        recessions::parse_recessions(data.as_slice(), ymd(2026, 8)).unwrap();

    assert_eq!(recession_table.len(), 34);
    assert_eq!(recession_table[0].start, ymd(1857, 6));
    // the open 2020 recession picks up the reference date
    assert_eq!(recession_table.last().unwrap().end, ymd(2026, 8));
}
