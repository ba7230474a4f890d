//! Sales ledger: append-only, sequence-numbered sale records.

use stockledger_core::{DomainError, DomainResult, Sku};

use crate::sale::{SaleDraft, SaleRecord};

/// Append-only sequence of sale records.
///
/// Appending is split in two so a caller can make the record durable between
/// the steps:
///
/// 1. `reserve` validates the draft and allocates the next sequence number
/// 2. `commit` inserts the (now durable) record
///
/// A reserved number whose record is never committed is simply skipped; numbers
/// are never handed out twice.
#[derive(Debug, Clone)]
pub struct SalesLedger {
    /// Ascending by `sequence`.
    records: Vec<SaleRecord>,
    next_sequence: u64,
}

impl Default for SalesLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesLedger {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Rebuild from stored records. Numbering resumes after the highest one.
    pub fn from_records(records: impl IntoIterator<Item = SaleRecord>) -> DomainResult<Self> {
        let mut records: Vec<SaleRecord> = records.into_iter().collect();
        records.sort_by_key(|r| r.sequence);

        for pair in records.windows(2) {
            if pair[0].sequence == pair[1].sequence {
                return Err(DomainError::persistence(format!(
                    "duplicate sale sequence number {}",
                    pair[0].sequence
                )));
            }
        }

        let next_sequence = records.last().map(|r| r.sequence + 1).unwrap_or(1);
        Ok(Self {
            records,
            next_sequence,
        })
    }

    /// Validate a draft and give it the next sequence number.
    pub fn reserve(&mut self, draft: SaleDraft) -> DomainResult<SaleRecord> {
        draft.validate()?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Ok(draft.into_record(sequence))
    }

    /// Insert a record obtained from `reserve`.
    pub fn commit(&mut self, record: SaleRecord) {
        if record.sequence >= self.next_sequence {
            self.next_sequence = record.sequence + 1;
        }
        let at = self
            .records
            .partition_point(|r| r.sequence < record.sequence);
        self.records.insert(at, record);
    }

    /// `reserve` + `commit`, for callers with nothing to persist in between.
    pub fn append(&mut self, draft: SaleDraft) -> DomainResult<SaleRecord> {
        let record = self.reserve(draft)?;
        self.commit(record.clone());
        Ok(record)
    }

    /// Most recent first (descending sequence number).
    pub fn list_all(&self) -> Vec<SaleRecord> {
        self.records.iter().rev().cloned().collect()
    }

    /// One SKU's sales, most recent first.
    pub fn for_sku(&self, sku: &Sku) -> Vec<SaleRecord> {
        self.records
            .iter()
            .rev()
            .filter(|r| &r.sku == sku)
            .cloned()
            .collect()
    }

    pub fn units_sold(&self, sku: &Sku) -> i64 {
        self.records
            .iter()
            .filter(|r| &r.sku == sku)
            .map(|r| r.quantity)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn draft(sku: &str, quantity: i64) -> SaleDraft {
        SaleDraft {
            sku: Sku::new(sku).unwrap(),
            name: format!("{sku} name"),
            category: Some("Food".to_string()),
            quantity,
            unit_price: Decimal::new(12, 1),
            sold_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn append_assigns_increasing_sequence_numbers() {
        let mut ledger = SalesLedger::new();
        let a = ledger.append(draft("UQ001", 1)).unwrap();
        let b = ledger.append(draft("UQ002", 2)).unwrap();
        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 2);
    }

    #[test]
    fn list_all_is_most_recent_first() {
        let mut ledger = SalesLedger::new();
        for n in 1..=3 {
            ledger.append(draft("UQ001", n)).unwrap();
        }
        let seqs: Vec<u64> = ledger.list_all().iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![3, 2, 1]);
    }

    #[test]
    fn append_rejects_non_positive_quantity() {
        let mut ledger = SalesLedger::new();
        for qty in [0, -4] {
            assert!(matches!(
                ledger.append(draft("UQ001", qty)).unwrap_err(),
                DomainError::InvalidField { field: "quantity", .. }
            ));
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn append_rejects_negative_price() {
        let mut ledger = SalesLedger::new();
        let mut d = draft("UQ001", 1);
        d.unit_price = Decimal::new(-1, 0);
        assert!(ledger.append(d).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn timestamps_are_truncated_to_seconds() {
        let mut ledger = SalesLedger::new();
        let mut d = draft("UQ001", 1);
        d.sold_at = Utc.timestamp_opt(1_700_000_000, 987_654_321).unwrap();
        let record = ledger.append(d).unwrap();
        assert_eq!(record.sold_at, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn abandoned_reservation_is_never_reused() {
        let mut ledger = SalesLedger::new();
        let abandoned = ledger.reserve(draft("UQ001", 1)).unwrap();
        let kept = ledger.append(draft("UQ001", 1)).unwrap();
        assert_eq!(abandoned.sequence, 1);
        assert_eq!(kept.sequence, 2);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn out_of_order_commits_keep_descending_listing() {
        let mut ledger = SalesLedger::new();
        let first = ledger.reserve(draft("UQ001", 1)).unwrap();
        let second = ledger.reserve(draft("UQ002", 1)).unwrap();
        ledger.commit(second);
        ledger.commit(first);
        let seqs: Vec<u64> = ledger.list_all().iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![2, 1]);
    }

    #[test]
    fn from_records_resumes_numbering() {
        let mut seed = SalesLedger::new();
        seed.append(draft("UQ001", 1)).unwrap();
        seed.append(draft("UQ001", 1)).unwrap();

        let mut restored = SalesLedger::from_records(seed.list_all()).unwrap();
        let next = restored.append(draft("UQ001", 1)).unwrap();
        assert_eq!(next.sequence, 3);
        assert_eq!(restored.list_all()[2].sequence, 1);
    }

    #[test]
    fn from_records_rejects_duplicate_sequences() {
        let mut seed = SalesLedger::new();
        let r = seed.append(draft("UQ001", 1)).unwrap();
        assert!(SalesLedger::from_records(vec![r.clone(), r]).is_err());
    }

    #[test]
    fn for_sku_filters_and_sums() {
        let mut ledger = SalesLedger::new();
        ledger.append(draft("UQ001", 2)).unwrap();
        ledger.append(draft("UQ002", 5)).unwrap();
        ledger.append(draft("UQ001", 3)).unwrap();

        let sku = Sku::new("UQ001").unwrap();
        let mine = ledger.for_sku(&sku);
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].quantity, 3);
        assert_eq!(ledger.units_sold(&sku), 5);
    }
}
