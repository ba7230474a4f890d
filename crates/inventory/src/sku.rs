//! SKU allocation: `PREFIX + zero-padded counter`, e.g. `UQ004`.
//!
//! This is a convenience for callers that do not bring their own SKUs. The
//! catalog only cares that SKUs are unique.

use std::sync::atomic::{AtomicU64, Ordering};

use stockledger_core::{DomainError, DomainResult, Sku};

/// Counter value meaning no further numbers can be handed out.
const EXHAUSTED: u64 = u64::MAX;

#[derive(Debug)]
pub struct SkuAllocator {
    prefix: String,
    width: usize,
    next: AtomicU64,
}

impl SkuAllocator {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            next: AtomicU64::new(1),
        }
    }

    /// Start after the highest number found in `existing`.
    ///
    /// The number of a SKU is all of its digits read as one integer; SKUs
    /// without digits are ignored.
    pub fn seeded_from<'a>(
        prefix: impl Into<String>,
        width: usize,
        existing: impl IntoIterator<Item = &'a Sku>,
    ) -> Self {
        let allocator = Self::new(prefix, width);
        for sku in existing {
            allocator.observe(sku);
        }
        allocator
    }

    /// Make sure a caller-supplied SKU's number is never handed out later.
    pub fn observe(&self, sku: &Sku) {
        if let Some(n) = sku_number(sku) {
            self.next.fetch_max(n.saturating_add(1), Ordering::SeqCst);
        }
    }

    /// Allocate the next SKU. Fails once the counter is used up; it never
    /// wraps around to numbers already handed out.
    pub fn next_sku(&self) -> DomainResult<Sku> {
        let n = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n != EXHAUSTED).then(|| n + 1)
            })
            .map_err(|_| exhausted())?;
        self.format(n)
    }

    /// The SKU `next_sku` would return, without consuming it.
    pub fn peek(&self) -> DomainResult<Sku> {
        match self.next.load(Ordering::SeqCst) {
            EXHAUSTED => Err(exhausted()),
            n => self.format(n),
        }
    }

    fn format(&self, n: u64) -> DomainResult<Sku> {
        Sku::new(format!("{}{:0width$}", self.prefix, n, width = self.width))
    }
}

fn exhausted() -> DomainError {
    DomainError::invalid("sku", "no SKU numbers left to allocate")
}

fn sku_number(sku: &Sku) -> Option<u64> {
    let digits: String = sku.as_str().chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
