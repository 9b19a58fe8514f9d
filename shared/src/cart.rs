//! Line-item store shared by the POS and warehouse movement screens
//!
//! A store holds an ordered list of lines keyed by `(product, batch)`. Adding
//! a line for a key that is already present merges quantities; the merged
//! quantity is checked against the batch's available stock as last fetched.
//! The store is parameterised by a [`SubmissionShape`] that knows how to turn
//! its lines and a header into the request body of one backend endpoint.

use std::fmt::Debug;
use std::marker::PhantomData;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::error::{DomainError, DomainResult};
use crate::models::{Batch, Product};
use crate::types::Money;

/// Identity of a line: one product in one batch
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: String,
    pub batch_id: String,
}

impl LineKey {
    pub fn new(product_id: impl Into<String>, batch_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            batch_id: batch_id.into(),
        }
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.product_id, self.batch_id)
    }
}

/// A line the operator wants to add
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCandidate {
    pub product_id: String,
    pub product_name: Option<String>,
    pub batch_id: String,
    pub barcode: Option<String>,
    pub unit_price: Option<Money>,
    pub quantity: i64,
    pub unit_label: String,
    /// Stock ceiling from the batch snapshot; `None` for imports
    pub available_stock: Option<i64>,
    pub manufacture_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

impl LineCandidate {
    /// Candidate for an existing batch (sale, export, transfer)
    pub fn from_batch(product: &Product, batch: &Batch, quantity: i64) -> Self {
        Self {
            product_id: product.product_id.clone(),
            product_name: Some(product.name.clone()),
            batch_id: batch.batch_id.clone(),
            barcode: batch.barcode.clone(),
            unit_price: Some(product.unit_price),
            quantity,
            unit_label: product.unit_label().to_string(),
            available_stock: Some(batch.available_stock),
            manufacture_date: batch.manufacture_date,
            expiry_date: batch.expiry_date,
        }
    }

    /// Candidate for a new batch being received; imports have no ceiling
    pub fn for_import(
        product: &Product,
        batch_id: &str,
        manufacture_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
        quantity: i64,
    ) -> Self {
        Self {
            product_id: product.product_id.clone(),
            product_name: Some(product.name.clone()),
            batch_id: batch_id.trim().to_string(),
            barcode: None,
            unit_price: None,
            quantity,
            unit_label: product.unit_label().to_string(),
            available_stock: None,
            manufacture_date,
            expiry_date,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.batch_id.clone())
    }

    /// Refuse a batch whose expiry date is before `today`
    pub fn ensure_not_expired(&self, today: NaiveDate) -> DomainResult<()> {
        match self.expiry_date {
            Some(expiry) if expiry < today => Err(DomainError::ExpiredBatch {
                batch_id: self.batch_id.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// One line of a cart or movement form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub product_name: Option<String>,
    pub batch_id: String,
    pub barcode: Option<String>,
    pub unit_price: Option<Money>,
    pub quantity: i64,
    pub unit_label: String,
    /// `quantity * unit_price` on priced screens, `None` elsewhere
    pub line_total: Option<Money>,
    pub available_stock: Option<i64>,
    pub manufacture_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

impl LineItem {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.batch_id.clone())
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.batch_id == key.batch_id
    }

    fn reprice(&mut self, priced: bool) -> DomainResult<()> {
        self.line_total = match self.unit_price {
            Some(price) if priced => Some(price.checked_mul(self.quantity).ok_or_else(too_large)?),
            _ => None,
        };
        Ok(())
    }
}

fn too_large() -> DomainError {
    DomainError::validation("quantity", "Quantity is too large")
}

/// The request body a store is submitted as
pub trait SubmissionShape {
    /// Header fields entered next to the lines
    type Header: Clone + Debug + Default;
    /// Wire body of the preview/create call
    type Payload: Serialize + Debug;

    /// Whether lines carry a price and a line total
    const PRICED: bool;

    /// Whether every line must carry the batch's available stock
    const CEILING: bool;

    fn assemble(header: &Self::Header, lines: &[LineItem]) -> Self::Payload;

    fn validate_header(_header: &Self::Header) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Aggregate figures of a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    /// Sum of line totals; zero on unpriced screens
    pub total_amount: Money,
}

/// Ordered, key-unique collection of lines
#[derive(Debug, Clone)]
pub struct LineStore<S: SubmissionShape> {
    lines: Vec<LineItem>,
    _shape: PhantomData<S>,
}

impl<S: SubmissionShape> Default for LineStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SubmissionShape> PartialEq for LineStore<S> {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
    }
}

impl<S: SubmissionShape> LineStore<S> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            _shape: PhantomData,
        }
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, key: &LineKey) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// Add a line, merging into an existing line with the same key
    ///
    /// On error the store is left untouched.
    pub fn add_line(&mut self, candidate: LineCandidate) -> DomainResult<&LineItem> {
        if candidate.quantity <= 0 {
            return Err(DomainError::validation(
                "quantity",
                "Quantity must be greater than zero",
            ));
        }
        if S::CEILING && candidate.available_stock.is_none() {
            return Err(DomainError::validation(
                "available_stock",
                "Batch stock is unknown",
            ));
        }
        if S::PRICED && candidate.unit_price.is_none() {
            return Err(DomainError::validation("unit_price", "Price is required"));
        }
        let key = candidate.key();

        match self.lines.iter().position(|line| line.matches(&key)) {
            Some(index) => {
                let mut line = self.lines[index].clone();
                let merged = line
                    .quantity
                    .checked_add(candidate.quantity)
                    .ok_or_else(too_large)?;
                let ceiling = candidate.available_stock.or(line.available_stock);
                check_ceiling(&key, merged, ceiling)?;

                line.quantity = merged;
                line.available_stock = ceiling;
                if candidate.unit_price.is_some() {
                    line.unit_price = candidate.unit_price;
                }
                if line.barcode.is_none() {
                    line.barcode = candidate.barcode;
                }
                line.reprice(S::PRICED)?;
                self.ensure_totals_fit(Some(index), &line)?;
                self.lines[index] = line;
                Ok(&self.lines[index])
            }
            None => {
                check_ceiling(&key, candidate.quantity, candidate.available_stock)?;
                let mut line = LineItem {
                    product_id: candidate.product_id,
                    product_name: candidate.product_name,
                    batch_id: candidate.batch_id,
                    barcode: candidate.barcode,
                    unit_price: candidate.unit_price,
                    quantity: candidate.quantity,
                    unit_label: candidate.unit_label,
                    line_total: None,
                    available_stock: candidate.available_stock,
                    manufacture_date: candidate.manufacture_date,
                    expiry_date: candidate.expiry_date,
                };
                line.reprice(S::PRICED)?;
                self.ensure_totals_fit(None, &line)?;
                self.lines.push(line);
                Ok(&self.lines[self.lines.len() - 1])
            }
        }
    }

    /// Set a line's quantity; zero or less removes the line
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> DomainResult<()> {
        let index = self
            .lines
            .iter()
            .position(|line| line.matches(key))
            .ok_or_else(|| DomainError::LineNotFound {
                product_id: key.product_id.clone(),
                batch_id: key.batch_id.clone(),
            })?;

        if quantity <= 0 {
            self.lines.remove(index);
            return Ok(());
        }

        check_ceiling(key, quantity, self.lines[index].available_stock)?;
        let mut line = self.lines[index].clone();
        line.quantity = quantity;
        line.reprice(S::PRICED)?;
        self.ensure_totals_fit(Some(index), &line)?;
        self.lines[index] = line;
        Ok(())
    }

    /// The store's totals must stay representable after `line` goes in at
    /// `replacing` (or is appended)
    fn ensure_totals_fit(&self, replacing: Option<usize>, line: &LineItem) -> DomainResult<()> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replacing)
            .map(|(_, other)| other);
        checked_totals(others.chain(std::iter::once(line)))
            .map(|_| ())
            .ok_or_else(too_large)
    }

    /// Remove a line; unknown keys are ignored
    pub fn remove_line(&mut self, key: &LineKey) {
        self.lines.retain(|line| !line.matches(key));
    }

    /// Aggregate figures; every mutation keeps these within `i64`
    pub fn total(&self) -> CartTotals {
        self.lines.iter().fold(CartTotals::default(), |acc, line| CartTotals {
            line_count: acc.line_count + 1,
            total_quantity: acc.total_quantity.saturating_add(line.quantity),
            total_amount: acc
                .total_amount
                .saturating_add(line.line_total.unwrap_or(0)),
        })
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Flatten the lines and the header into the request body
    pub fn assemble(&self, header: &S::Header) -> S::Payload {
        S::assemble(header, &self.lines)
    }
}

fn checked_totals<'a>(mut lines: impl Iterator<Item = &'a LineItem>) -> Option<CartTotals> {
    lines.try_fold(CartTotals::default(), |acc, line| {
        Some(CartTotals {
            line_count: acc.line_count + 1,
            total_quantity: acc.total_quantity.checked_add(line.quantity)?,
            total_amount: acc.total_amount.checked_add(line.line_total.unwrap_or(0))?,
        })
    })
}

fn check_ceiling(key: &LineKey, requested: i64, ceiling: Option<i64>) -> DomainResult<()> {
    match ceiling {
        Some(available) if requested > available => Err(DomainError::InsufficientStock {
            product_id: key.product_id.clone(),
            batch_id: key.batch_id.clone(),
            requested,
            available,
        }),
        _ => Ok(()),
    }
}
