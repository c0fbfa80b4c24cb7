//! Core data types for the tsflow pipelines.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used across both pipelines (UTC).
pub type Timestamp = DateTime<Utc>;

/// Check that `next` follows `prev` by exactly `step`.
#[inline]
pub fn is_exact_step(prev: Timestamp, next: Timestamp, step: Duration) -> bool {
    next - prev == step
}

/// Lenient timestamp (de)serialization for loader columns.
///
/// Malformed or empty values become `None` instead of failing the batch.
pub mod ts_serde {
    use super::*;
    use serde::{Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Parse a timestamp string leniently. Accepts RFC 3339 and the
    /// `YYYY-MM-DD HH:MM:SS[.f]` layout of the source files.
    pub fn parse(raw: &str) -> Option<Timestamp> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    }

    pub fn serialize<S>(ts: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(t) => serializer.serialize_str(&t.format(WRITE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}

/// Lenient boolean deserialization for rule columns.
///
/// Accepts `true`/`false` in any case, `1`/`0`, and `t`/`f`; anything else
/// (including an empty cell) reads as `false`.
pub mod flag_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> bool {
        matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "true" | "t" | "1" | "yes"
        )
    }

    pub fn serialize<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(*flag)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(parse).unwrap_or(false))
    }
}

/// One observed quote on a currency pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Observation time. `None` when the source value failed to parse.
    #[serde(with = "ts_serde", default)]
    pub timestamp: Option<Timestamp>,
    /// Currency pair identifier, e.g. "EURUSD".
    pub ccy_pair: String,
    /// Quoted price.
    pub price: Option<f64>,
}

/// One observed spot-rate snapshot on a currency pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotRateRecord {
    #[serde(with = "ts_serde", default)]
    pub timestamp: Option<Timestamp>,
    pub ccy_pair: String,
    /// Mid spot rate at the snapshot time.
    pub spot_mid_rate: Option<f64>,
}

/// Conversion rule for a currency pair. At most one rule per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRule {
    pub ccy_pair: String,
    /// Whether prices on this pair require conversion.
    #[serde(with = "flag_serde", default)]
    pub convert_price: bool,
    /// Divisor applied when converting. A missing or zero factor makes the
    /// converted price null for that row.
    pub conversion_factor: Option<f64>,
}

/// A price row extended with its as-of spot match and conversion rule.
///
/// All extension fields are nullable: no spot within tolerance and no rule
/// for the pair are both valid outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedRecord {
    #[serde(with = "ts_serde", default)]
    pub timestamp: Option<Timestamp>,
    pub ccy_pair: String,
    pub price: Option<f64>,
    /// Timestamp of the matched spot snapshot.
    #[serde(with = "ts_serde", default)]
    pub spot_time: Option<Timestamp>,
    /// Mid rate of the matched spot snapshot.
    pub spot_mid_rate: Option<f64>,
    /// Rule flag; `None` when the pair has no conversion rule.
    pub convert_price: Option<bool>,
    pub conversion_factor: Option<f64>,
}

impl AlignedRecord {
    /// Build an aligned row from a price row with no spot match and no rule.
    pub fn from_price(price: &PriceRecord) -> Self {
        Self {
            timestamp: price.timestamp,
            ccy_pair: price.ccy_pair.clone(),
            price: price.price,
            spot_time: None,
            spot_mid_rate: None,
            convert_price: None,
            conversion_factor: None,
        }
    }

    /// Whether a usable spot rate was matched for this row.
    #[inline]
    pub fn has_spot(&self) -> bool {
        self.spot_mid_rate.is_some()
    }
}

/// An aligned row extended with the converted price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedRecord {
    #[serde(with = "ts_serde", default)]
    pub timestamp: Option<Timestamp>,
    pub ccy_pair: String,
    pub price: Option<f64>,
    #[serde(with = "ts_serde", default)]
    pub spot_time: Option<Timestamp>,
    pub spot_mid_rate: Option<f64>,
    pub convert_price: Option<bool>,
    pub conversion_factor: Option<f64>,
    /// Converted price; null whenever no spot was matched or the conversion
    /// arithmetic had a null/zero input.
    pub new_price: Option<f64>,
}

/// One snapshot of a security's bid/mid/ask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySnapshot {
    pub security_id: String,
    #[serde(with = "ts_serde", default)]
    pub snap_time: Option<Timestamp>,
    pub bid: Option<f64>,
    pub mid: Option<f64>,
    pub ask: Option<f64>,
}

/// A snapshot extended with rolling standard deviations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingResult {
    pub security_id: String,
    #[serde(with = "ts_serde", default)]
    pub snap_time: Option<Timestamp>,
    pub bid: Option<f64>,
    pub mid: Option<f64>,
    pub ask: Option<f64>,
    pub bid_stdev: Option<f64>,
    pub mid_stdev: Option<f64>,
    pub ask_stdev: Option<f64>,
    /// Diagnostic: the window had enough data but a gap invalidated it.
    /// Absent from output when the diagnostic is disabled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gap_blocked: Option<bool>,
}

impl RollingResult {
    /// Build a result row from a snapshot with all derived fields null.
    pub fn from_snapshot(snap: &SecuritySnapshot) -> Self {
        Self {
            security_id: snap.security_id.clone(),
            snap_time: snap.snap_time,
            bid: snap.bid,
            mid: snap.mid,
            ask: snap.ask,
            bid_stdev: None,
            mid_stdev: None,
            ask_stdev: None,
            gap_blocked: None,
        }
    }

    /// Whether any of the three stdev fields is populated.
    #[inline]
    pub fn has_any_stdev(&self) -> bool {
        self.bid_stdev.is_some() || self.mid_stdev.is_some() || self.ask_stdev.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(ts_serde::parse("2021-11-20 00:00:00").is_some());
        assert!(ts_serde::parse("2021-11-20 00:00:00.250").is_some());
        assert!(ts_serde::parse("2021-11-20T00:00:00+00:00").is_some());
    }

    #[test]
    fn test_parse_timestamp_malformed() {
        assert!(ts_serde::parse("").is_none());
        assert!(ts_serde::parse("not-a-date").is_none());
        assert!(ts_serde::parse("2021-13-40 99:00:00").is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert!(flag_serde::parse("True"));
        assert!(flag_serde::parse("true"));
        assert!(flag_serde::parse("1"));
        assert!(!flag_serde::parse("False"));
        assert!(!flag_serde::parse("0"));
        assert!(!flag_serde::parse(""));
    }

    #[test]
    fn test_exact_step() {
        let t0 = ts_serde::parse("2021-11-20 00:00:00").unwrap();
        let t1 = ts_serde::parse("2021-11-20 01:00:00").unwrap();
        let t2 = ts_serde::parse("2021-11-20 01:00:01").unwrap();
        assert!(is_exact_step(t0, t1, Duration::hours(1)));
        assert!(!is_exact_step(t0, t2, Duration::hours(1)));
    }

    #[test]
    fn test_aligned_from_price() {
        let price = PriceRecord {
            timestamp: ts_serde::parse("2021-11-20 00:00:00"),
            ccy_pair: "EURUSD".to_string(),
            price: Some(100.0),
        };
        let aligned = AlignedRecord::from_price(&price);
        assert!(!aligned.has_spot());
        assert!(aligned.convert_price.is_none());
        assert_eq!(aligned.price, Some(100.0));
    }
}
