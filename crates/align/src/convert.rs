//! Conditional price conversion over aligned rows.
//!
//! Row-local and order-independent: each output depends only on its own row.

use tsflow_core::{AlignedRecord, ConvertedRecord};

/// Compute the converted price for one row.
///
/// - No usable spot match: `None`, regardless of the rule.
/// - Rule absent or `convert_price == false`: the original price.
/// - `convert_price == true`: `price / conversion_factor + spot_mid_rate`,
///   where a null or zero factor (or any null input) yields `None` for this
///   row only.
pub fn convert_row(row: &AlignedRecord) -> Option<f64> {
    if !row.has_spot() {
        return None;
    }
    if !row.convert_price.unwrap_or(false) {
        return row.price;
    }
    let price = row.price?;
    let factor = row.conversion_factor?;
    if factor == 0.0 {
        return None;
    }
    let spot = row.spot_mid_rate?;
    Some(price / factor + spot)
}

/// Convert every aligned row, preserving order and row count.
pub fn convert_records(rows: Vec<AlignedRecord>) -> Vec<ConvertedRecord> {
    rows.into_iter()
        .map(|row| {
            let new_price = convert_row(&row);
            ConvertedRecord {
                timestamp: row.timestamp,
                ccy_pair: row.ccy_pair,
                price: row.price,
                spot_time: row.spot_time,
                spot_mid_rate: row.spot_mid_rate,
                convert_price: row.convert_price,
                conversion_factor: row.conversion_factor,
                new_price,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tsflow_core::ts_serde;

    fn make_row(
        price: Option<f64>,
        spot: Option<f64>,
        convert: Option<bool>,
        factor: Option<f64>,
    ) -> AlignedRecord {
        AlignedRecord {
            timestamp: ts_serde::parse("2021-11-20 10:30:00"),
            ccy_pair: "EURUSD".to_string(),
            price,
            spot_time: spot.and(ts_serde::parse("2021-11-20 10:00:00")),
            spot_mid_rate: spot,
            convert_price: convert,
            conversion_factor: factor,
        }
    }

    #[test]
    fn test_convert_true() {
        // 100 / 2 + 1.5 = 51.5
        let row = make_row(Some(100.0), Some(1.5), Some(true), Some(2.0));
        assert_relative_eq!(convert_row(&row).unwrap(), 51.5);
    }

    #[test]
    fn test_convert_false_passes_price_through() {
        let row = make_row(Some(100.0), Some(1.5), Some(false), Some(2.0));
        assert_relative_eq!(convert_row(&row).unwrap(), 100.0);
    }

    #[test]
    fn test_no_spot_is_null_regardless_of_rule() {
        let row = make_row(Some(100.0), None, Some(true), Some(2.0));
        assert!(convert_row(&row).is_none());

        let row = make_row(Some(100.0), None, Some(false), Some(2.0));
        assert!(convert_row(&row).is_none());
    }

    #[test]
    fn test_missing_rule_treated_as_no_conversion() {
        let row = make_row(Some(100.0), Some(1.5), None, None);
        assert_relative_eq!(convert_row(&row).unwrap(), 100.0);
    }

    #[test]
    fn test_zero_or_null_factor_propagates_null() {
        let row = make_row(Some(100.0), Some(1.5), Some(true), Some(0.0));
        assert!(convert_row(&row).is_none());

        let row = make_row(Some(100.0), Some(1.5), Some(true), None);
        assert!(convert_row(&row).is_none());
    }

    #[test]
    fn test_null_price_propagates_null() {
        let row = make_row(None, Some(1.5), Some(true), Some(2.0));
        assert!(convert_row(&row).is_none());
    }

    #[test]
    fn test_convert_records_preserves_rows() {
        let rows = vec![
            make_row(Some(100.0), Some(1.5), Some(true), Some(2.0)),
            make_row(Some(50.0), None, Some(true), Some(2.0)),
        ];
        let out = convert_records(rows);

        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0].new_price.unwrap(), 51.5);
        assert!(out[1].new_price.is_none());
    }
}
