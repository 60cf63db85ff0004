//! Historical ledger of processed (input, output) pairs.

use std::collections::VecDeque;

use crate::value::IndicatorValue;

/// Append-only history of `(input, output)` pairs for one indicator.
///
/// Only final inputs reach the container; the lifecycle engine enforces
/// that before calling [`add`](IndicatorContainer::add), so the
/// container does not re-validate. Unbounded by default — lookback
/// indicators rely on history staying put — with an explicit opt-in
/// cap for long-running processes.
#[derive(Debug, Clone, Default)]
pub struct IndicatorContainer {
    pairs: VecDeque<(IndicatorValue, IndicatorValue)>,
    max_count: Option<usize>,
}

impl IndicatorContainer {
    /// Create an unbounded container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container that evicts oldest pairs beyond `max_count`.
    pub fn with_max_count(max_count: usize) -> Self {
        Self {
            pairs: VecDeque::with_capacity(max_count),
            max_count: Some(max_count),
        }
    }

    /// Set or clear the history cap. Existing overflow is evicted.
    pub fn set_max_count(&mut self, max_count: Option<usize>) {
        self.max_count = max_count;
        if let Some(cap) = max_count {
            while self.pairs.len() > cap {
                self.pairs.pop_front();
            }
        }
    }

    /// Append a pair. The caller guarantees the input was final.
    pub fn add(&mut self, input: IndicatorValue, output: IndicatorValue) {
        if let Some(cap) = self.max_count {
            while self.pairs.len() >= cap {
                self.pairs.pop_front();
            }
        }
        self.pairs.push_back((input, output));
    }

    /// Empty the ledger. Used only by reset.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Number of stored pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the ledger is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The most recent pair.
    pub fn last(&self) -> Option<&(IndicatorValue, IndicatorValue)> {
        self.pairs.back()
    }

    /// The most recent `k` pairs, oldest first.
    pub fn recent(&self, k: usize) -> impl Iterator<Item = &(IndicatorValue, IndicatorValue)> {
        let start = self.pairs.len().saturating_sub(k);
        self.pairs.iter().skip(start)
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(IndicatorValue, IndicatorValue)> {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::IndicatorId;
    use crate::value::IndicatorPayload;
    use rust_decimal::Decimal;

    fn pair(id: IndicatorId, n: i64) -> (IndicatorValue, IndicatorValue) {
        (
            IndicatorValue::new(id, IndicatorPayload::Decimal(Decimal::from(n))),
            IndicatorValue::new(id, IndicatorPayload::Decimal(Decimal::from(n * 10))),
        )
    }

    #[test]
    fn test_insertion_order_preserved() {
        let id = IndicatorId::new();
        let mut container = IndicatorContainer::new();
        for n in 1..=3 {
            let (input, output) = pair(id, n);
            container.add(input, output);
        }

        let outputs: Vec<Decimal> = container
            .iter()
            .map(|(_, out)| out.decimal().unwrap())
            .collect();
        assert_eq!(
            outputs,
            vec![Decimal::from(10), Decimal::from(20), Decimal::from(30)]
        );
        assert_eq!(container.len(), 3);
    }

    #[test]
    fn test_clear_empties_ledger() {
        let id = IndicatorId::new();
        let mut container = IndicatorContainer::new();
        let (input, output) = pair(id, 1);
        container.add(input, output);

        container.clear();
        assert!(container.is_empty());
        assert!(container.last().is_none());
    }

    #[test]
    fn test_recent_returns_newest_k() {
        let id = IndicatorId::new();
        let mut container = IndicatorContainer::new();
        for n in 1..=5 {
            let (input, output) = pair(id, n);
            container.add(input, output);
        }

        let recent: Vec<Decimal> = container
            .recent(2)
            .map(|(input, _)| input.decimal().unwrap())
            .collect();
        assert_eq!(recent, vec![Decimal::from(4), Decimal::from(5)]);
    }

    #[test]
    fn test_opt_in_cap_evicts_oldest() {
        let id = IndicatorId::new();
        let mut container = IndicatorContainer::with_max_count(2);
        for n in 1..=4 {
            let (input, output) = pair(id, n);
            container.add(input, output);
        }

        assert_eq!(container.len(), 2);
        let oldest = container.iter().next().unwrap();
        assert_eq!(oldest.0.decimal().unwrap(), Decimal::from(3));

        container.set_max_count(Some(1));
        assert_eq!(container.len(), 1);
        assert_eq!(container.last().unwrap().0.decimal().unwrap(), Decimal::from(4));
    }
}
