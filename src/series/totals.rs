//! Per-metric totals over a filtered view.

use crate::domain::{FilteredView, Totals};

/// Sum every metric over the view. An empty view sums to zero.
///
/// Sums saturate at `u64::MAX`.
pub fn totals(view: &FilteredView) -> Totals {
    view.records().iter().fold(Totals::default(), |acc, r| Totals {
        cases: acc.cases.saturating_add(r.cases),
        deaths: acc.deaths.saturating_add(r.deaths),
        recovered: acc.recovered.saturating_add(r.recovered),
        vaccinations: acc.vaccinations.saturating_add(r.vaccinations),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlignedRecord, AlignedTable, FilterSpec};
    use crate::series::filter::apply;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_view_totals_are_zero() {
        assert_eq!(totals(&FilteredView::default()), Totals::default());
    }

    #[test]
    fn exact_date_totals_equal_that_record() {
        let table = AlignedTable::new(vec![
            AlignedRecord { date: ymd(2021, 1, 1), cases: 5, deaths: 1, recovered: 2, vaccinations: 0 },
            AlignedRecord { date: ymd(2021, 1, 2), cases: 8, deaths: 1, recovered: 3, vaccinations: 0 },
        ])
        .unwrap();

        let view = apply(&table, FilterSpec::ExactDate { date: ymd(2021, 1, 2) });
        assert_eq!(
            totals(&view),
            Totals { cases: 8, deaths: 1, recovered: 3, vaccinations: 0 }
        );

        let whole = FilteredView::whole(&table);
        assert_eq!(
            totals(&whole),
            Totals { cases: 13, deaths: 2, recovered: 5, vaccinations: 0 }
        );
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let rec = |day, vaccinations| AlignedRecord { date: ymd(2021, 1, day), cases: 1, deaths: 0, recovered: 0, vaccinations };
        let view = FilteredView::new(None, vec![rec(1, u64::MAX), rec(2, 5)]);
        let sum = totals(&view);
        assert_eq!(sum.vaccinations, u64::MAX);
        assert_eq!(sum.cases, 2);
    }
}
