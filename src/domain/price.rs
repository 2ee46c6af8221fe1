use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use super::DateKey;

/// Daily reference price in the quote currency. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PriceQuote(f64);

impl PriceQuote {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for PriceQuote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

/// Prices keyed by day. Days that could not be priced are absent, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceMap {
    entries: BTreeMap<DateKey, PriceQuote>,
}

impl PriceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: DateKey, price: PriceQuote) {
        self.entries.insert(day, price);
    }

    pub fn get(&self, day: &DateKey) -> Option<PriceQuote> {
        self.entries.get(day).copied()
    }

    pub fn contains(&self, day: &DateKey) -> bool {
        self.entries.contains_key(day)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_non_finite_quotes() {
        assert!(PriceQuote::new(-0.01).is_none());
        assert!(PriceQuote::new(f64::NAN).is_none());
        assert!(PriceQuote::new(f64::INFINITY).is_none());
        assert_eq!(PriceQuote::new(0.0).map(|p| p.value()), Some(0.0));
    }

    #[test]
    fn serializes_as_date_keyed_object_in_day_order() {
        let mut prices = PriceMap::new();
        prices.insert(
            DateKey::parse("2024-01-02").unwrap(),
            PriceQuote::new(101.5).unwrap(),
        );
        prices.insert(
            DateKey::parse("2024-01-01").unwrap(),
            PriceQuote::new(100.0).unwrap(),
        );

        let json = serde_json::to_string(&prices).unwrap();
        assert_eq!(json, r#"{"2024-01-01":100.0,"2024-01-02":101.5}"#);
    }
}
