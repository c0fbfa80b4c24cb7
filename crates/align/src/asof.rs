//! Backward as-of alignment of prices to spot rates.
//!
//! Every price row is matched to the latest spot snapshot on the same
//! currency pair whose timestamp is at or before the price's, provided the
//! gap does not exceed the configured tolerance.

use chrono::Duration;
use std::cmp::Ordering;
use std::collections::HashMap;
use tsflow_core::config::AlignConfig;
use tsflow_core::{AlignedRecord, PriceRecord, SpotRateRecord, Timestamp};

/// Tolerance-bounded backward as-of aligner.
///
/// Pure: holds only the tolerance, never any per-call state.
pub struct TemporalAligner {
    /// Maximum allowed spot staleness.
    tolerance: Duration,
}

/// Ordering for the (timestamp, ccy_pair) sort key. Null timestamps sort
/// last so they end up grouped at the tail, where they can never match.
fn by_time_then_pair(
    a_ts: Option<Timestamp>,
    a_pair: &str,
    b_ts: Option<Timestamp>,
    b_pair: &str,
) -> Ordering {
    match (a_ts, b_ts) {
        (Some(a), Some(b)) => a.cmp(&b).then_with(|| a_pair.cmp(b_pair)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a_pair.cmp(b_pair),
    }
}

impl TemporalAligner {
    /// Create a new aligner from configuration.
    pub fn new(config: &AlignConfig) -> Self {
        Self {
            tolerance: Duration::seconds(config.tolerance_secs),
        }
    }

    /// Align every price row to its as-of spot match.
    ///
    /// Output rows are in stable (timestamp, ccy_pair) order of the price
    /// input, one output row per input row. Rows with no admissible match
    /// carry null spot fields.
    pub fn align(
        &self,
        prices: &[PriceRecord],
        spots: &[SpotRateRecord],
    ) -> Vec<AlignedRecord> {
        // Stable sort both sides by (timestamp, ccy_pair); ties keep input
        // order, which decides the match among equal-timestamp spots.
        let mut price_order: Vec<usize> = (0..prices.len()).collect();
        price_order.sort_by(|&a, &b| {
            by_time_then_pair(
                prices[a].timestamp,
                &prices[a].ccy_pair,
                prices[b].timestamp,
                &prices[b].ccy_pair,
            )
        });

        let mut spot_order: Vec<usize> = (0..spots.len()).collect();
        spot_order.sort_by(|&a, &b| {
            by_time_then_pair(
                spots[a].timestamp,
                &spots[a].ccy_pair,
                spots[b].timestamp,
                &spots[b].ccy_pair,
            )
        });

        // Partition spots by pair, keeping the sorted order within each
        // partition. Spots with a null timestamp can never be matched.
        let mut partitions: HashMap<&str, Vec<(Timestamp, Option<f64>)>> = HashMap::new();
        for &idx in &spot_order {
            if let Some(spot_ts) = spots[idx].timestamp {
                partitions
                    .entry(spots[idx].ccy_pair.as_str())
                    .or_default()
                    .push((spot_ts, spots[idx].spot_mid_rate));
            }
        }

        // Per-pair cursor into the partition. Prices arrive in ascending
        // timestamp order per pair, so each cursor only moves forward.
        let mut cursors: HashMap<&str, usize> = HashMap::new();
        let mut out = Vec::with_capacity(prices.len());

        for &pidx in &price_order {
            let price = &prices[pidx];
            let mut aligned = AlignedRecord::from_price(price);

            if let (Some(price_ts), Some(partition)) = (
                price.timestamp,
                partitions.get(price.ccy_pair.as_str()),
            ) {
                let cursor = cursors.entry(price.ccy_pair.as_str()).or_insert(0);
                while *cursor < partition.len() && partition[*cursor].0 <= price_ts {
                    *cursor += 1;
                }
                // The candidate is the last spot the cursor admitted: the
                // latest one at or before the price, and among equal
                // timestamps the last in stable-sorted order.
                if *cursor > 0 {
                    let (spot_ts, rate) = partition[*cursor - 1];
                    if price_ts - spot_ts <= self.tolerance {
                        aligned.spot_time = Some(spot_ts);
                        aligned.spot_mid_rate = rate;
                    }
                }
            }

            out.push(aligned);
        }

        out
    }
}
