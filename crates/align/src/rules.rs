//! Left join of conversion rules onto aligned rows.

use std::collections::HashMap;
use tsflow_core::{AlignedRecord, ConversionRule, Error, Result};

/// Merges the conversion-rule table into aligned rows by currency pair.
///
/// The rule table is uniquely keyed: a duplicate pair is rejected at
/// construction rather than silently resolved.
pub struct RuleMerger {
    rules: HashMap<String, ConversionRule>,
}

impl RuleMerger {
    /// Build a merger from the rule table.
    pub fn new(rules: Vec<ConversionRule>) -> Result<Self> {
        let mut map = HashMap::with_capacity(rules.len());
        for rule in rules {
            let pair = rule.ccy_pair.clone();
            if map.insert(pair.clone(), rule).is_some() {
                return Err(Error::data(format!(
                    "duplicate conversion rule for pair {pair}"
                )));
            }
        }
        Ok(Self { rules: map })
    }

    /// Number of distinct rules held.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fill the rule fields of every row. Each input row is preserved
    /// exactly once; rows whose pair has no rule keep null rule fields.
    pub fn merge(&self, mut rows: Vec<AlignedRecord>) -> Vec<AlignedRecord> {
        for row in &mut rows {
            if let Some(rule) = self.rules.get(&row.ccy_pair) {
                row.convert_price = Some(rule.convert_price);
                row.conversion_factor = rule.conversion_factor;
            }
        }
        rows
    }
}
