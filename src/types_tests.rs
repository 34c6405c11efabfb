//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_entry_starts_neutral() {
        let entry = AssetEntry::new("ETH", "ETHBTC", dec!(0.05));
        assert_eq!(entry.symbol, "ETH");
        assert_eq!(entry.quote_ticker, "ETHBTC");
        assert_eq!(entry.last_price, dec!(0.05));
        assert_eq!(entry.sentiment, 0.0);
    }

    #[test]
    fn test_absorb_halves_towards_score() {
        let mut entry = AssetEntry::new("ETH", "ETHBTC", dec!(0.05));
        entry.absorb(4.0);
        assert_eq!(entry.sentiment, 2.0);
    }

    #[test]
    fn test_absorb_is_order_sensitive_decay() {
        let mut entry = AssetEntry::new("ADA", "ADABTC", dec!(0.00001));
        entry.sentiment = 1.0;
        entry.absorb(3.0);
        entry.absorb(-2.0);
        // ((1 + 3) / 2 - 2) / 2, not (1 + 3 - 2) / 3
        assert_eq!(entry.sentiment, 0.0);

        let mut reversed = AssetEntry::new("ADA", "ADABTC", dec!(0.00001));
        reversed.sentiment = 1.0;
        reversed.absorb(-2.0);
        reversed.absorb(3.0);
        assert_eq!(reversed.sentiment, 1.25);
    }

    #[test]
    fn test_parse_price_plain() {
        assert_eq!(parse_price("0.05000000"), Some(dec!(0.05)));
        assert_eq!(parse_price(" 1.0 "), Some(dec!(1)));
    }

    #[test]
    fn test_parse_price_scientific() {
        assert_eq!(parse_price("5e-2"), Some(dec!(0.05)));
    }

    #[test]
    fn test_parse_price_rejects_non_positive_and_garbage() {
        assert_eq!(parse_price("0"), None);
        assert_eq!(parse_price("0.00000000"), None);
        assert_eq!(parse_price("-1.5"), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn test_text_event_with_id() {
        let event = TextEvent::new("BTC to the moon").with_id("42");
        assert_eq!(event.id.as_deref(), Some("42"));
        assert_eq!(event.text, "BTC to the moon");
    }
}
