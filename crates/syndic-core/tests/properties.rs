use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use syndic_core::context::{DateRange, FilterContext};
use syndic_core::derive::{AgreementStatus, agreement_status};
use syndic_core::filter::{DateFiltered, filter};
use syndic_core::model::Severity;
use syndic_core::report::{Report, ReportId, Row, generate};

use generators::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn share_sum(report: &Report) -> usize {
    report
        .rows
        .iter()
        .filter_map(Row::share)
        .map(|s| s.count)
        .sum()
}

/// Every record `inner` admits is also admitted by `outer`.
fn nested<T: DateFiltered>(records: &[T], inner: &DateRange, outer: &DateRange) -> bool {
    let kept = filter(records, outer);
    filter(records, inner)
        .into_iter()
        .all(|record| kept.iter().any(|k| std::ptr::eq(*k, record)))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn share_counts_sum_to_the_total(snapshot in arb_snapshot()) {
        let book = generate(&snapshot, &FilterContext::new(today()));
        let members = snapshot.members.records().unwrap().len();

        for report in &book.reports {
            if report.rows.iter().any(|row| row.share().is_some()) {
                prop_assert_eq!(share_sum(report), report.total, "{}", report.id);
            }
        }
        // Every member has a sex bucket, including Unknown.
        prop_assert_eq!(book.get(ReportId::MembersBySex).unwrap().total, members);
        prop_assert_eq!(book.get(ReportId::MembersByUnion).unwrap().total, members);
    }

    #[test]
    fn percentages_sum_to_one_hundred(snapshot in arb_snapshot()) {
        let book = generate(&snapshot, &FilterContext::new(today()));
        for report in &book.reports {
            let shares: Vec<_> = report.rows.iter().filter_map(Row::share).collect();
            if report.total > 0 && !shares.is_empty() {
                let sum: f64 = shares.iter().map(|s| s.percentage).sum();
                prop_assert!((sum - 100.0).abs() < 1e-6, "{} sums to {}", report.id, sum);
            }
        }
    }

    #[test]
    fn all_time_filter_is_identity(snapshot in arb_snapshot()) {
        let members = snapshot.members.records().unwrap();
        prop_assert_eq!(filter(members, &DateRange::ALL_TIME).len(), members.len());
    }

    #[test]
    fn narrowing_the_range_never_adds_records(
        snapshot in arb_snapshot(),
        start in arb_date(),
        span in 0u64..5_000,
        shrink_start in 0u64..2_000,
        shrink_end in 0u64..2_000,
    ) {
        let end = start + Days::new(span);
        let inner_start = start + Days::new(shrink_start.min(span));
        let inner_span = span - shrink_start.min(span);
        let inner_end = end - Days::new(shrink_end.min(inner_span));
        let wide = DateRange::new(Some(start), Some(end));
        let narrow = DateRange::new(Some(inner_start), Some(inner_end));
        let open = DateRange::new(Some(start), None);

        let members = snapshot.members.records().unwrap();
        let unions = snapshot.unions.records().unwrap();
        let executives = snapshot.executives.records().unwrap();
        let agreements = snapshot.agreements.records().unwrap();
        let incidents = snapshot.incidents.records().unwrap();
        let terminated = snapshot.terminated.records().unwrap();

        for (inner, outer) in [(&narrow, &wide), (&wide, &open)] {
            prop_assert!(nested(members, inner, outer));
            prop_assert!(nested(unions, inner, outer));
            prop_assert!(nested(executives, inner, outer));
            prop_assert!(nested(agreements, inner, outer));
            prop_assert!(nested(incidents, inner, outer));
            prop_assert!(nested(terminated, inner, outer));
        }
        prop_assert!(filter(members, &open).len() <= members.len());
    }

    #[test]
    fn agreement_status_is_total(snapshot in arb_snapshot(), today in arb_date()) {
        for agreement in snapshot.agreements.records().unwrap() {
            let status = agreement_status(agreement, today);
            prop_assert!(AgreementStatus::ALL.contains(&status));
        }
    }

    #[test]
    fn severity_classification_is_total(raw in ".{0,12}") {
        let severity = Severity::classify(Some(raw.as_str()));
        prop_assert!(Severity::ALL.contains(&severity));
        prop_assert_eq!(Severity::classify(Some(raw.as_str())), severity);
    }

    #[test]
    fn generation_is_idempotent(snapshot in arb_snapshot(), start in arb_opt_date()) {
        let ctx = FilterContext::new(today()).with_range(DateRange::new(start, None));
        let first = generate(&snapshot, &ctx);
        let second = generate(&snapshot, &ctx);
        prop_assert_eq!(first, second);
    }
}
