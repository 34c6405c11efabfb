//! Unit tests for the price poller

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::client::MockPriceFeed;
    use crate::error::BotError;
    use crate::notify::{AuditLog, Console};
    use crate::sentiment::SentimentScorer;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{tempdir, TempDir};

    struct FixedScorer(f64);

    impl SentimentScorer for FixedScorer {
        fn score(&self, _text: &str) -> f64 {
            self.0
        }
    }

    fn snapshot(pairs: &[(&str, &str)]) -> PriceSnapshot {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fast_settings(policy: FailurePolicy) -> PollerSettings {
        PollerSettings {
            interval: Duration::from_millis(5),
            initial_delay: Duration::ZERO,
            threshold: dec!(1.0),
            failure_policy: policy,
        }
    }

    fn poller_with(
        feed: MockPriceFeed,
        initial: &[(&str, &str)],
        settings: PollerSettings,
    ) -> (PricePoller, AssetRegistry, TempDir) {
        let dir = tempdir().unwrap();
        let registry = AssetRegistry::build(&snapshot(initial), "BTC").unwrap();
        let notifier = Notifier::new(
            AuditLog::new(dir.path().join("audit.log")),
            Console::silent(),
            None,
        );
        let poller = PricePoller::new(Arc::new(feed), registry.clone(), notifier, settings);
        (poller, registry, dir)
    }

    #[test]
    fn test_growth_rounds_to_two_places() {
        assert_eq!(growth_pct(dec!(100), dec!(101)), dec!(1.00));
        assert_eq!(growth_pct(dec!(100), dec!(101.01)), dec!(1.01));
        assert_eq!(growth_pct(dec!(0.05), dec!(0.0506)), dec!(1.20));
        assert_eq!(growth_pct(dec!(3), dec!(3.1)), dec!(3.33));
        assert_eq!(growth_pct(dec!(100), dec!(90)), dec!(-10));
    }

    #[test]
    fn test_growth_rounds_half_away_from_zero() {
        // 1.005% exactly
        assert_eq!(growth_pct(dec!(200), dec!(202.01)), dec!(1.01));
    }

    #[test]
    fn test_growth_saturates_instead_of_overflowing() {
        assert_eq!(
            growth_pct(dec!(0.00000001), dec!(100000000000000000000)),
            Decimal::MAX
        );
    }

    #[test]
    fn test_extreme_jump_still_alerts() {
        let (poller, registry, _dir) = poller_with(
            MockPriceFeed::new(),
            &[("ETHBTC", "0.00000001")],
            fast_settings(FailurePolicy::FailFast),
        );
        let alerts = poller
            .evaluate(&snapshot(&[("ETHBTC", "100000000000000000000")]))
            .unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].growth, Decimal::MAX);
        assert_eq!(
            registry.get("ETH").unwrap().last_price,
            dec!(100000000000000000000)
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = PollerSettings::default();
        assert_eq!(settings.interval, Duration::from_millis(60_000));
        assert_eq!(settings.initial_delay, Duration::from_millis(1_000));
        assert_eq!(settings.threshold, dec!(1));
        assert_eq!(settings.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_exactly_one_percent_does_not_alert() {
        let (poller, _, _dir) = poller_with(
            MockPriceFeed::new(),
            &[("ETHBTC", "100")],
            fast_settings(FailurePolicy::FailFast),
        );
        let alerts = poller.evaluate(&snapshot(&[("ETHBTC", "101")])).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_above_one_percent_alerts() {
        let (poller, _, _dir) = poller_with(
            MockPriceFeed::new(),
            &[("ETHBTC", "100")],
            fast_settings(FailurePolicy::FailFast),
        );
        let alerts = poller.evaluate(&snapshot(&[("ETHBTC", "101.01")])).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].growth, dec!(1.01));
        assert_eq!(alerts[0].quote_asset, "BTC");
    }

    #[test]
    fn test_drop_does_not_alert() {
        let (poller, _, _dir) = poller_with(
            MockPriceFeed::new(),
            &[("ETHBTC", "100")],
            fast_settings(FailurePolicy::FailFast),
        );
        assert!(poller.evaluate(&snapshot(&[("ETHBTC", "80")])).unwrap().is_empty());
    }

    #[test]
    fn test_every_entry_resets_after_cycle() {
        let (poller, registry, _dir) = poller_with(
            MockPriceFeed::new(),
            &[("ETHBTC", "100"), ("LTCBTC", "10"), ("XRPBTC", "1")],
            fast_settings(FailurePolicy::FailFast),
        );
        registry.apply_text("eth ltc xrp", &FixedScorer(3.0));

        let next = snapshot(&[("ETHBTC", "110"), ("LTCBTC", "10"), ("XRPBTC", "0.5")]);
        let alerts = poller.evaluate(&next).unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].symbol, "ETH");
        assert_eq!(alerts[0].sentiment, 1.5);
        for entry in registry.entries() {
            assert_eq!(entry.sentiment, 0.0);
            assert_eq!(&entry.last_price.to_string(), &next[&entry.quote_ticker]);
        }
    }

    #[test]
    fn test_growth_uses_previous_cycle_price() {
        let (poller, _, _dir) = poller_with(
            MockPriceFeed::new(),
            &[("ETHBTC", "100")],
            fast_settings(FailurePolicy::FailFast),
        );
        // +0.8% then +0.8%: neither cycle crosses 1% against its own baseline
        assert!(poller.evaluate(&snapshot(&[("ETHBTC", "100.8")])).unwrap().is_empty());
        assert!(poller.evaluate(&snapshot(&[("ETHBTC", "101.6064")])).unwrap().is_empty());
    }

    #[test]
    fn test_missing_ticker_fails_cycle() {
        let (poller, registry, _dir) = poller_with(
            MockPriceFeed::new(),
            &[("ETHBTC", "100"), ("LTCBTC", "10")],
            fast_settings(FailurePolicy::FailFast),
        );
        let result = poller.evaluate(&snapshot(&[("ETHBTC", "200")]));
        assert!(matches!(result, Err(BotError::MissingTicker(_))));
        assert_eq!(registry.get("ETH").unwrap().last_price, dec!(100));
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch_prices()
            .times(1)
            .returning(|| Ok(snapshot(&[("ETHBTC", "0.0506")])));

        let (poller, registry, dir) = poller_with(
            feed,
            &[("ETHBTC", "0.050000")],
            fast_settings(FailurePolicy::FailFast),
        );
        let eth = registry.get("ETH").unwrap();
        assert_eq!(eth.last_price, dec!(0.05));
        assert_eq!(eth.sentiment, 0.0);

        registry.apply_text("ETH to the moon", &FixedScorer(4.0));
        assert_eq!(registry.get("ETH").unwrap().sentiment, 2.0);

        let alerts = poller.poll_once().await.unwrap();
        assert_eq!(
            alerts,
            vec![Alert {
                symbol: "ETH".to_string(),
                quote_asset: "BTC".to_string(),
                price: dec!(0.0506),
                growth: dec!(1.20),
                sentiment: 2.0,
            }]
        );

        let eth = registry.get("ETH").unwrap();
        assert_eq!(eth.last_price, dec!(0.0506));
        assert_eq!(eth.sentiment, 0.0);

        let audit = std::fs::read_to_string(dir.path().join("audit.log")).unwrap();
        assert!(audit.contains("[ETH]         @ 0.05060000 | 1.20% | 2.00 <3"));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_from_poll_once() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch_prices()
            .times(1)
            .returning(|| Err(BotError::Fetch("connection refused".into())));

        let (poller, registry, _dir) = poller_with(
            feed,
            &[("ETHBTC", "0.05")],
            fast_settings(FailurePolicy::FailFast),
        );
        registry.apply_text("eth", &FixedScorer(2.0));

        let result = poller.poll_once().await;
        assert!(matches!(result, Err(BotError::Fetch(_))));
        assert_eq!(registry.get("ETH").unwrap().sentiment, 1.0);
    }

    #[tokio::test]
    async fn test_run_fail_fast_stops_on_first_error() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch_prices()
            .times(1)
            .returning(|| Err(BotError::Fetch("boom".into())));

        let (poller, _, _dir) = poller_with(
            feed,
            &[("ETHBTC", "0.05")],
            fast_settings(FailurePolicy::FailFast),
        );

        let result = tokio::time::timeout(Duration::from_secs(1), poller.run())
            .await
            .expect("fail-fast poller should return");
        assert!(matches!(result, Err(BotError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_run_skip_failed_cycle_keeps_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch_prices().returning(move || {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Err(BotError::Fetch("blip".into())),
                1 => Ok(snapshot(&[("ETHBTC", "0.06")])),
                _ => Ok(snapshot(&[("LTCBTC", "1")])),
            }
        });

        let (poller, registry, dir) = poller_with(
            feed,
            &[("ETHBTC", "0.05")],
            fast_settings(FailurePolicy::SkipFailedCycle),
        );
        let audit_path = dir.path().join("audit.log");
        let handle = tokio::spawn(async move { poller.run().await });

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let audit = std::fs::read_to_string(&audit_path).unwrap_or_default();
            if audit.contains("Ticker missing") || tokio::time::Instant::now() > deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.abort();

        assert!(calls.load(Ordering::SeqCst) >= 3);
        assert_eq!(registry.get("ETH").unwrap().last_price, dec!(0.06));
        let audit = std::fs::read_to_string(&audit_path).unwrap();
        assert!(audit.contains("]Error: Price fetch failed: blip"));
        assert!(audit.contains("]Error: Ticker missing from snapshot: ETHBTC"));
    }
}
