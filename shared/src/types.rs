//! Common types used across the client

use serde::{Deserialize, Serialize};

/// Monetary amount in integral currency units (VND has no minor unit)
pub type Money = i64;

/// Serde helpers for money fields
///
/// The backend serialises prices from a NUMERIC column, so integral amounts
/// arrive as JSON floats (`25000.0`). They are rounded to whole units.
pub mod money {
    use serde::{Deserialize, Deserializer};

    use super::Money;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("money amount must be finite"));
        }
        Ok(value.round() as Money)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<f64>::deserialize(deserializer)?;
        match value {
            Some(v) if !v.is_finite() => {
                Err(serde::de::Error::custom("money amount must be finite"))
            }
            Some(v) => Ok(Some(v.round() as Money)),
            None => Ok(None),
        }
    }
}

/// Response envelope used by every backend endpoint
///
/// Successful calls carry `data`; failures carry a human-readable `error`
/// (older endpoints put the text in `message` instead).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// The human-readable failure text, preferring `error` over `message`
    pub fn failure_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Clamp to the bounds the backend accepts (page >= 1, 1..=100 per page)
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

fn first_page() -> u32 {
    1
}

/// Date range for history and report queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
