//! Forms submitted in a single call, without a preview round trip
//!
//! Supplier orders, customer returns and discards are built like movement
//! forms but go straight to the create call. The draft survives a failed
//! call untouched; the caller resets it once the call succeeds.

use crate::cart::{CartTotals, LineCandidate, LineItem, LineKey, LineStore, SubmissionShape};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct Draft<S: SubmissionShape> {
    header: S::Header,
    lines: LineStore<S>,
}

impl<S: SubmissionShape> Default for Draft<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SubmissionShape> Draft<S> {
    pub fn new() -> Self {
        Self {
            header: S::Header::default(),
            lines: LineStore::new(),
        }
    }

    pub fn header(&self) -> &S::Header {
        &self.header
    }

    pub fn lines(&self) -> &[LineItem] {
        self.lines.lines()
    }

    pub fn totals(&self) -> CartTotals {
        self.lines.total()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn update_header(&mut self, edit: impl FnOnce(&mut S::Header)) {
        edit(&mut self.header);
    }

    pub fn add_line(&mut self, candidate: LineCandidate) -> DomainResult<&LineItem> {
        self.lines.add_line(candidate)
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> DomainResult<()> {
        self.lines.update_quantity(key, quantity)
    }

    pub fn remove_line(&mut self, key: &LineKey) {
        self.lines.remove_line(key);
    }

    /// Request body, once the draft has lines and a valid header
    pub fn payload(&self) -> DomainResult<S::Payload> {
        if self.lines.is_empty() {
            return Err(DomainError::validation("lines", "Add at least one line"));
        }
        S::validate_header(&self.header)
            .map_err(|errors| DomainError::from_validation("header", &errors))?;
        Ok(self.lines.assemble(&self.header))
    }

    /// Empty header and lines
    pub fn reset(&mut self) {
        self.header = S::Header::default();
        self.lines.clear();
    }
}
