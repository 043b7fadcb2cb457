//! Formatted terminal output for tables, views, and totals.

use crate::domain::{AlignedRecord, AlignedTable, FilteredView, Metric, Totals};

/// `1234567` -> `"1,234,567"`.
pub fn fmt_thousands(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One `Total <Metric>: n` line per metric.
pub fn format_totals(totals: &Totals) -> String {
    let mut out = String::new();
    for metric in Metric::ALL {
        out.push_str(&format!(
            "Total {}: {}\n",
            metric.display_name(),
            fmt_thousands(totals.get(metric))
        ));
    }
    out
}

/// Short description of a table: row count and date span.
pub fn format_table_summary(country: &str, table: &AlignedTable) -> String {
    match (table.first_date(), table.last_date()) {
        (Some(first), Some(last)) => format!(
            "{}: {} days ({first} to {last})",
            super::title_case(country.trim()),
            fmt_thousands(table.len() as u64)
        ),
        _ => format!("{}: no data", super::title_case(country.trim())),
    }
}

/// Fixed-width listing of the view's records.
///
/// Long views show the first and last `max_rows / 2` rows around a `...` line.
pub fn format_view_rows(view: &FilteredView, max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<10} {:>14} {:>12} {:>14} {:>14}\n",
            "date", "cases", "deaths", "recovered", "vaccinations"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<14} {:-<12} {:-<14} {:-<14}\n",
            "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    let records = view.records();
    let max_rows = max_rows.max(2);
    if records.len() <= max_rows {
        for r in records {
            push_row(&mut out, r);
        }
    } else {
        let half = max_rows / 2;
        for r in &records[..half] {
            push_row(&mut out, r);
        }
        out.push_str(&format!("... ({} more rows)\n", records.len() - 2 * half));
        for r in &records[records.len() - half..] {
            push_row(&mut out, r);
        }
    }

    out
}

fn push_row(out: &mut String, r: &AlignedRecord) {
    out.push_str(
        format!(
            "{:<10} {:>14} {:>12} {:>14} {:>14}\n",
            r.date.to_string(),
            fmt_thousands(r.cases),
            fmt_thousands(r.deaths),
            fmt_thousands(r.recovered),
            fmt_thousands(r.vaccinations),
        )
        .trim_end(),
    );
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn view(n: u32) -> FilteredView {
        let records = (1..=n)
            .map(|d| AlignedRecord {
                date: NaiveDate::from_ymd_opt(2021, 1, d).unwrap(),
                cases: 1000 * d as u64,
                deaths: d as u64,
                recovered: 0,
                vaccinations: 0,
            })
            .collect();
        FilteredView::new(None, records)
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(fmt_thousands(0), "0");
        assert_eq!(fmt_thousands(999), "999");
        assert_eq!(fmt_thousands(1000), "1,000");
        assert_eq!(fmt_thousands(44_690_738), "44,690,738");
    }

    #[test]
    fn totals_lines_in_metric_order() {
        let totals = Totals { cases: 8, deaths: 1, recovered: 3, vaccinations: 12_000 };
        assert_eq!(
            format_totals(&totals),
            "Total Cases: 8\nTotal Deaths: 1\nTotal Recovered: 3\nTotal Vaccinations: 12,000\n"
        );
    }

    #[test]
    fn long_views_are_elided_in_the_middle() {
        let txt = format_view_rows(&view(10), 4);
        let lines: Vec<&str> = txt.lines().collect();
        // header + rule + 2 head rows + marker + 2 tail rows
        assert_eq!(lines.len(), 7);
        assert!(lines[2].starts_with("2021-01-01"));
        assert_eq!(lines[4], "... (6 more rows)");
        assert!(lines[6].starts_with("2021-01-10"));
        assert!(lines[6].contains("10,000"));
    }

    #[test]
    fn summary_mentions_span() {
        let table = AlignedTable::new(view(3).records().to_vec()).unwrap();
        assert_eq!(
            format_table_summary("peru", &table),
            "Peru: 3 days (2021-01-01 to 2021-01-03)"
        );
        assert_eq!(format_table_summary("peru", &AlignedTable::default()), "Peru: no data");
    }
}
