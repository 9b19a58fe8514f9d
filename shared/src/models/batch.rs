//! Batch (lot) models and FEFO ordering

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Days before expiry at which a batch counts as expiring soon
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// A received lot of a product, as fetched for one selection dialog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Batch {
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaVach", default)]
    pub barcode: Option<String>,
    #[serde(rename = "MaKho", default)]
    pub warehouse_id: Option<String>,
    #[serde(rename = "NSX", default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(rename = "HSD", default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "SLTon")]
    pub available_stock: i64,
    /// Position in FEFO order; 0 is the preferred batch
    #[serde(default)]
    pub fefo_rank: usize,
    /// Quantity the backend proposes to take from this batch
    #[serde(default)]
    pub suggested_quantity: Option<i64>,
    #[serde(default)]
    pub is_expired: bool,
}

impl Batch {
    /// Expired per the backend flag or by date relative to `today`
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.is_expired || self.expiry_date.map(|d| d < today).unwrap_or(false)
    }

    pub fn days_to_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.expiry_date.map(|d| (d - today).num_days())
    }

    pub fn expiry_status(&self, today: NaiveDate) -> ExpiryStatus {
        if self.is_expired {
            return ExpiryStatus::Expired;
        }
        ExpiryStatus::classify(self.expiry_date, today)
    }
}

/// Expiry classification shown next to each batch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Good,
    Unknown,
}

impl ExpiryStatus {
    pub fn classify(expiry_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match expiry_date {
            None => ExpiryStatus::Unknown,
            Some(d) => {
                let days = (d - today).num_days();
                if days < 0 {
                    ExpiryStatus::Expired
                } else if days <= EXPIRING_SOON_DAYS {
                    ExpiryStatus::ExpiringSoon
                } else {
                    ExpiryStatus::Good
                }
            }
        }
    }
}

/// FEFO comparison: earliest expiry first, undated last, ties by batch id
pub fn fefo_cmp(a: &Batch, b: &Batch) -> Ordering {
    match (a.expiry_date, b.expiry_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.batch_id.cmp(&b.batch_id))
}

/// Sort batches into FEFO order and assign `fefo_rank`
///
/// The backend already returns batches in this order; normalising on the
/// client keeps rank 0 meaningful even when an endpoint sorts differently.
pub fn order_fefo(mut batches: Vec<Batch>) -> Vec<Batch> {
    batches.sort_by(fefo_cmp);
    for (rank, batch) in batches.iter_mut().enumerate() {
        batch.fefo_rank = rank;
    }
    batches
}

/// True when the list is non-decreasing in expiry with undated batches last
pub fn is_fefo_ordered(batches: &[Batch]) -> bool {
    batches
        .windows(2)
        .all(|pair| fefo_cmp(&pair[0], &pair[1]) != Ordering::Greater)
}

/// The batch a FEFO dialog preselects: the lowest-ranked selectable batch
pub fn preferred_batch(batches: &[Batch], today: NaiveDate) -> Option<&Batch> {
    batches
        .iter()
        .filter(|b| !b.is_expired_on(today) && b.available_stock > 0)
        .min_by(|a, b| fefo_cmp(a, b))
}

/// Pick a batch by id for a movement line, refusing expired batches
pub fn select_batch<'a>(
    batches: &'a [Batch],
    batch_id: &str,
    today: NaiveDate,
) -> DomainResult<&'a Batch> {
    let batch = batches
        .iter()
        .find(|b| b.batch_id == batch_id)
        .ok_or_else(|| DomainError::validation("batch_id", "Batch is not in the fetched list"))?;
    if batch.is_expired_on(today) {
        return Err(DomainError::ExpiredBatch {
            batch_id: batch.batch_id.clone(),
        });
    }
    Ok(batch)
}

/// FEFO batch suggestion for a requested quantity
///
/// `suggested_quantity` on each batch is computed by the backend; the client
/// only displays it and lets the operator override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FefoSuggestion {
    #[serde(rename = "suggested_batches", alias = "batches", default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub can_fulfill: bool,
    #[serde(default)]
    pub shortage: i64,
}

impl FefoSuggestion {
    pub fn suggested_total(&self) -> i64 {
        self.batches
            .iter()
            .filter_map(|b| b.suggested_quantity)
            .sum()
    }
}
