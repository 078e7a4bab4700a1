//! Pipeline integration tests.
//!
//! Tests cover:
//! - The fixed ledger scenarios (mixed day, no rows today, bad price, loss day)
//! - Fetch → digest → dispatch through mock ports
//! - Error propagation from the row source and the notifier
//! - Properties over arbitrary ledgers (counts, ordering, loss suppression)

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use tradedigest::cli::run_digest;
use tradedigest::domain::digest::build_digest;
use tradedigest::domain::error::{DigestError, NotificationError};
use tradedigest::domain::summary::{RenderPolicy, NO_TRADES_MESSAGE};

mod scenarios {
    use super::*;

    #[test]
    fn scenario_a_mixed_day() {
        let digest = build_digest(&scenario_a(), &options(date(2024, 6, 1), RenderPolicy::Verbose));

        assert_eq!(digest.metrics.buy_count, 1);
        assert_eq!(digest.metrics.sell_count, 1);
        assert_relative_eq!(digest.metrics.proceeds, 150.0);
        assert_relative_eq!(digest.metrics.cost, 100.0);
        assert_relative_eq!(digest.metrics.net_profit, 50.0);
        assert_eq!(
            digest.summary.body,
            "Bought 1 stocks. Sold 1 stocks. Generated $50.00 profit today."
        );
    }

    #[test]
    fn scenario_b_no_rows_today_under_all_policies() {
        for policy in RenderPolicy::ALL {
            let digest = build_digest(&scenario_a(), &options(date(2024, 6, 2), policy));
            assert_eq!(digest.rows_today, 0);
            assert_eq!(digest.summary.body, NO_TRADES_MESSAGE);
            assert_eq!(digest.summary.subject, NO_TRADES_MESSAGE);
        }
    }

    #[test]
    fn scenario_c_unparsable_price_contributes_zero() {
        let snap = snapshot(
            FULL_HEADER,
            &[
                &["2024-06-01T10:00Z", "sell", "n/a", ""],
                &["2024-06-01T11:00Z", "sell", "40", ""],
            ],
        );
        let digest = build_digest(&snap, &options(date(2024, 6, 1), RenderPolicy::Verbose));

        assert_eq!(digest.metrics.sell_count, 2);
        assert_relative_eq!(digest.metrics.proceeds, 40.0);
        assert_eq!(digest.warnings.len(), 1);
        assert_eq!(digest.summary.body, "Sold 2 stocks. Generated $40.00 profit today.");
    }

    #[test]
    fn scenario_d_loss_is_suppressed() {
        let snap = snapshot(
            FULL_HEADER,
            &[
                &["2024-06-01T10:00Z", "buy", "", "50"],
                &["2024-06-01T11:00Z", "sell", "30", ""],
            ],
        );
        let digest = build_digest(&snap, &options(date(2024, 6, 1), RenderPolicy::SuppressedLoss));

        assert_relative_eq!(digest.metrics.net_profit, -20.0);
        assert!(!digest.summary.body.contains("-20"));
        assert!(!digest.summary.body.contains('-'));
        assert_eq!(
            digest.summary.body,
            "Bought 1 stocks. Sold 1 stocks. No profit generated today."
        );
    }

    #[test]
    fn subject_only_uses_same_metrics() {
        let digest = build_digest(
            &scenario_a(),
            &options(date(2024, 6, 1), RenderPolicy::SubjectOnly),
        );
        assert_eq!(digest.summary.subject, "Bought 1 stocks. Proceeds $150.00 today.");
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn sends_rendered_summary_once() {
        let source = MockRowSource::new(scenario_a());
        let notifier = RecordingNotifier::new();

        let report = run_digest(
            &source,
            Some(&notifier),
            &options(date(2024, 6, 1), RenderPolicy::Verbose),
        )
        .unwrap();

        assert_eq!(source.fetches.get(), 1);
        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.as_deref(), Some("Daily trading summary"));
        assert_eq!(sent[0].1, "Bought 1 stocks. Sold 1 stocks. Generated $50.00 profit today.");
        assert_eq!(report.receipt.unwrap().message_id.as_deref(), Some("msg-1"));
    }

    #[test]
    fn no_trades_message_is_still_sent() {
        let source = MockRowSource::new(scenario_a());
        let notifier = RecordingNotifier::new();

        run_digest(&source, Some(&notifier), &options(date(2030, 1, 1), RenderPolicy::Verbose))
            .unwrap();

        assert_eq!(notifier.sent.borrow()[0].1, NO_TRADES_MESSAGE);
    }

    #[test]
    fn dry_run_sends_nothing() {
        let source = MockRowSource::new(scenario_a());
        let report =
            run_digest(&source, None, &options(date(2024, 6, 1), RenderPolicy::Verbose)).unwrap();
        assert!(report.receipt.is_none());
        assert_eq!(report.digest.metrics.trade_count(), 2);
    }

    #[test]
    fn rejected_notification_is_an_error() {
        let source = MockRowSource::new(scenario_a());
        let notifier = RecordingNotifier::rejecting(503);

        let err = run_digest(
            &source,
            Some(&notifier),
            &options(date(2024, 6, 1), RenderPolicy::Verbose),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DigestError::Notification(NotificationError::Rejected { status: 503, .. })
        ));
        assert_eq!(notifier.sent.borrow().len(), 1);
    }

    #[test]
    fn ledger_failure_stops_before_dispatch() {
        let source = MockRowSource::failing("sheet unavailable");
        let notifier = RecordingNotifier::new();

        let err = run_digest(
            &source,
            Some(&notifier),
            &options(date(2024, 6, 1), RenderPolicy::Verbose),
        )
        .unwrap_err();

        assert!(matches!(err, DigestError::Ledger { .. }));
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn missing_timestamp_column_degrades_to_no_trades() {
        let source = MockRowSource::new(snapshot(&["Side", "Price"], &[&["buy", "1"]]));
        let notifier = RecordingNotifier::new();

        let report = run_digest(
            &source,
            Some(&notifier),
            &options(date(2024, 6, 1), RenderPolicy::Verbose),
        )
        .unwrap();

        assert_eq!(report.digest.summary.body, NO_TRADES_MESSAGE);
        assert_eq!(report.digest.warnings.len(), 1);
    }
}

mod properties {
    use super::*;
    use tradedigest::domain::ledger::LedgerSnapshot;

    fn cell_strategy() -> impl Strategy<Value = (bool, String, String, String)> {
        (
            any::<bool>(),
            prop_oneof![
                Just("buy".to_string()),
                Just("sell".to_string()),
                Just(" SELL ".to_string()),
                Just("hold".to_string()),
                Just(String::new()),
            ],
            prop_oneof![
                (0u32..100_000).prop_map(|c| format!("{}.{:02}", c / 100, c % 100)),
                Just("n/a".to_string()),
                Just(String::new()),
            ],
            prop_oneof![
                (0u32..100_000).prop_map(|c| format!("{}.{:02}", c / 100, c % 100)),
                Just("oops".to_string()),
                Just(String::new()),
            ],
        )
    }

    fn build(rows: &[(bool, String, String, String)]) -> LedgerSnapshot {
        let owned: Vec<Vec<&str>> = rows
            .iter()
            .map(|(today, side, price, notional)| {
                let ts = if *today { "2024-06-01T09:30:00Z" } else { "2024-05-31T09:30:00Z" };
                vec![ts, side.as_str(), price.as_str(), notional.as_str()]
            })
            .collect();
        let refs: Vec<&[&str]> = owned.iter().map(Vec::as_slice).collect();
        snapshot(FULL_HEADER, &refs)
    }

    proptest! {
        #[test]
        fn counts_never_exceed_rows_today(rows in prop::collection::vec(cell_strategy(), 0..40)) {
            let opts = options(date(2024, 6, 1), RenderPolicy::Verbose);
            let digest = build_digest(&build(&rows), &opts);
            prop_assert!(digest.metrics.buy_count + digest.metrics.sell_count <= digest.rows_today);
            prop_assert_eq!(digest.rows_today, rows.iter().filter(|r| r.0).count());
        }

        #[test]
        fn net_profit_invariant_under_reordering(
            rows in prop::collection::vec(cell_strategy(), 0..40),
            seed in any::<u64>(),
        ) {
            let opts = options(date(2024, 6, 1), RenderPolicy::Verbose);
            let original = build_digest(&build(&rows), &opts);

            let mut shuffled = rows.clone();
            let len = shuffled.len();
            if len > 1 {
                let mut state = seed;
                for i in (1..len).rev() {
                    state = state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    let j = (state >> 33) as usize % (i + 1);
                    shuffled.swap(i, j);
                }
            }
            let reordered = build_digest(&build(&shuffled), &opts);

            prop_assert!((original.metrics.net_profit - reordered.metrics.net_profit).abs() < 1e-6);
            prop_assert_eq!(original.metrics.buy_count, reordered.metrics.buy_count);
            prop_assert_eq!(original.metrics.sell_count, reordered.metrics.sell_count);
        }

        #[test]
        fn suppressed_loss_never_shows_negative_figure(
            rows in prop::collection::vec(cell_strategy(), 0..40),
        ) {
            let opts = options(date(2024, 6, 1), RenderPolicy::SuppressedLoss);
            let digest = build_digest(&build(&rows), &opts);
            prop_assert!(!digest.summary.body.contains("$-"));
            prop_assert!(!digest.summary.subject.contains("$-"));
        }

        #[test]
        fn no_rows_today_is_canonical(rows in prop::collection::vec(cell_strategy(), 0..20)) {
            let past: Vec<_> = rows.into_iter().map(|(_, s, p, n)| (false, s, p, n)).collect();
            for policy in RenderPolicy::ALL {
                let digest = build_digest(&build(&past), &options(date(2024, 6, 1), policy));
                prop_assert_eq!(digest.summary.body.as_str(), NO_TRADES_MESSAGE);
            }
        }
    }
}
