//! WebAssembly module for Warehouse Retail Management
//!
//! Exposes the client-side logic the browser UI needs without a round trip:
//! - POS cart (merge by product and batch, stock ceiling, expiry, totals)
//! - FEFO ordering and preferred batch selection
//! - Capability tags for navigation
//! - Barcode input validation
//!
//! Values cross the boundary as JSON strings. Errors are JSON objects
//! `{ "code", "message" }` so the UI can branch on the code.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    capability_tags, order_fefo, preferred_batch, validate_barcode, AccountKind, Batch,
    DomainError, ExpiryStatus, LineCandidate, LineKey, LineStore, SaleHeader, SaleShape,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log("warehouse-retail-wasm loaded");
}

fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[derive(Debug, Serialize, PartialEq)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl From<DomainError> for ErrorBody {
    fn from(e: DomainError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl ErrorBody {
    fn invalid_json(e: serde_json::Error) -> Self {
        Self {
            code: "INVALID_JSON",
            message: e.to_string(),
        }
    }

    fn invalid_date(value: &str) -> Self {
        Self {
            code: "INVALID_DATE",
            message: format!("'{}' is not a YYYY-MM-DD date", value),
        }
    }
}

fn to_js(error: ErrorBody) -> JsValue {
    let text = serde_json::to_string(&error).unwrap_or_else(|_| error.message.clone());
    web_sys::console::warn_1(&JsValue::from_str(&text));
    JsValue::from_str(&text)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ErrorBody> {
    serde_json::to_string(value).map_err(ErrorBody::invalid_json)
}

/// Parse `today`, or read the browser clock when it is empty
fn parse_today(today: &str) -> Result<NaiveDate, ErrorBody> {
    if today.trim().is_empty() {
        return browser_today().ok_or_else(|| ErrorBody::invalid_date(today));
    }
    NaiveDate::parse_from_str(today.trim(), "%Y-%m-%d").map_err(|_| ErrorBody::invalid_date(today))
}

fn browser_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

// ============================================================================
// Cart
// ============================================================================

/// Point-of-sale cart
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmCart {
    store: LineStore<SaleShape>,
}

#[wasm_bindgen]
impl WasmCart {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCart {
        WasmCart::default()
    }

    /// Add a line; `candidate_json` is a serialized `LineCandidate`.
    /// Batches that expired before `today` are refused; an empty `today`
    /// uses the browser date. Returns the lines after the merge.
    #[wasm_bindgen(js_name = addLine)]
    pub fn add_line(&mut self, candidate_json: &str, today: &str) -> Result<String, JsValue> {
        self.try_add_line(candidate_json, today).map_err(to_js)
    }

    /// Set a line's quantity; zero or less removes the line
    #[wasm_bindgen(js_name = updateQuantity)]
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        batch_id: &str,
        quantity: i64,
    ) -> Result<String, JsValue> {
        self.try_update_quantity(product_id, batch_id, quantity)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = removeLine)]
    pub fn remove_line(&mut self, product_id: &str, batch_id: &str) -> Result<String, JsValue> {
        self.store.remove_line(&LineKey::new(product_id, batch_id));
        self.lines()
    }

    pub fn lines(&self) -> Result<String, JsValue> {
        to_json(&self.store.lines()).map_err(to_js)
    }

    /// `{ line_count, total_quantity, total_amount }`
    pub fn totals(&self) -> Result<String, JsValue> {
        to_json(&self.store.total()).map_err(to_js)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Invoice request body for the current lines
    #[wasm_bindgen(js_name = checkoutPayload)]
    pub fn checkout_payload(&self) -> Result<String, JsValue> {
        to_json(&self.store.assemble(&SaleHeader)).map_err(to_js)
    }
}

impl WasmCart {
    fn try_add_line(&mut self, candidate_json: &str, today: &str) -> Result<String, ErrorBody> {
        let today = parse_today(today)?;
        let candidate: LineCandidate =
            serde_json::from_str(candidate_json).map_err(ErrorBody::invalid_json)?;
        candidate.ensure_not_expired(today)?;
        self.store.add_line(candidate)?;
        to_json(&self.store.lines())
    }

    fn try_update_quantity(
        &mut self,
        product_id: &str,
        batch_id: &str,
        quantity: i64,
    ) -> Result<String, ErrorBody> {
        self.store
            .update_quantity(&LineKey::new(product_id, batch_id), quantity)?;
        to_json(&self.store.lines())
    }
}

// ============================================================================
// FEFO
// ============================================================================

#[derive(Serialize)]
struct RankedBatch {
    #[serde(flatten)]
    batch: Batch,
    expiry_status: ExpiryStatus,
    selectable: bool,
}

fn rank_batches(batches_json: &str, today: &str) -> Result<String, ErrorBody> {
    let today = parse_today(today)?;
    let batches: Vec<Batch> = serde_json::from_str(batches_json).map_err(ErrorBody::invalid_json)?;
    let ranked: Vec<RankedBatch> = order_fefo(batches)
        .into_iter()
        .map(|batch| RankedBatch {
            expiry_status: batch.expiry_status(today),
            selectable: !batch.is_expired_on(today) && batch.available_stock > 0,
            batch,
        })
        .collect();
    to_json(&ranked)
}

fn preferred_id(batches_json: &str, today: &str) -> Result<Option<String>, ErrorBody> {
    let today = parse_today(today)?;
    let batches: Vec<Batch> = serde_json::from_str(batches_json).map_err(ErrorBody::invalid_json)?;
    Ok(preferred_batch(&batches, today).map(|b| b.batch_id.clone()))
}

/// Sort batches into FEFO order, adding `fefo_rank`, `expiry_status` and
/// `selectable`. An empty `today` uses the browser date.
#[wasm_bindgen(js_name = orderBatches)]
pub fn order_batches(batches_json: &str, today: &str) -> Result<String, JsValue> {
    rank_batches(batches_json, today).map_err(to_js)
}

/// Id of the batch the selection dialog should preselect
#[wasm_bindgen(js_name = preferredBatchId)]
pub fn preferred_batch_id(batches_json: &str, today: &str) -> Result<Option<String>, JsValue> {
    preferred_id(batches_json, today).map_err(to_js)
}

// ============================================================================
// Permissions and validation
// ============================================================================

fn tags_for(account_type: &str, role: Option<String>) -> Result<String, ErrorBody> {
    let kind = AccountKind::from_wire(account_type, role.as_deref())?;
    to_json(&capability_tags(kind))
}

/// Capability tags for an account's `Type` and `Role`, as a JSON array
#[wasm_bindgen(js_name = capabilityTags)]
pub fn capability_tags_for(account_type: &str, role: Option<String>) -> Result<String, JsValue> {
    tags_for(account_type, role).map_err(to_js)
}

/// Error message for a barcode the scanner produced, or nothing when valid
#[wasm_bindgen(js_name = barcodeError)]
pub fn barcode_error(barcode: &str) -> Option<String> {
    validate_barcode(barcode).err().map(str::to_string)
}
