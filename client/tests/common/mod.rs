//! In-process mock of the warehouse/retail backend
//!
//! Serves the subset of endpoints the client tests exercise, on an ephemeral
//! port, with the same `{ success, message, data | error }` envelope.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::SecretString;
use serde_json::{json, Value};
use shared::AccountKind;
use warehouse_retail_client::{ApiClient, Credentials, Session};

pub const USERNAME: &str = "lan";
pub const PASSWORD: &str = "secret123";
pub const CASHIER: &str = "hoa";
pub const MANAGER: &str = "minh";

/// Knobs and counters shared with the handlers
#[derive(Default)]
pub struct MockState {
    /// Every create, commit or other stock-changing call
    pub commit_calls: AtomicUsize,
    pub invoice_calls: AtomicUsize,
    pub record_calls: AtomicUsize,
    /// Make every stock-changing call answer 502
    pub fail_commits: AtomicBool,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .route("/api/auth/me", get(me))
            .route("/api/warehouse/warehouses", get(warehouses))
            .route("/api/warehouse/export/fefo-batches", post(fefo_batches))
            .route("/api/warehouse/export/scan-barcode", post(warehouse_scan))
            .route("/api/warehouse/transfer/scan-barcode", post(warehouse_scan))
            .route("/api/warehouse/transfer/validate", post(transfer_preview))
            .route("/api/warehouse/transfer", get(transfer_history).post(transfer_commit))
            .route("/api/sales/scan-barcode", post(sale_scan))
            .route("/api/sales/products/:id/batches", get(sale_batches))
            .route("/api/sales/invoices", post(create_invoice))
            .route("/api/warehouse/warehouses/:id/inventory", get(inventory))
            .route("/api/warehouse/import/preview", post(import_preview))
            .route("/api/warehouse/import", get(import_history).post(import_commit))
            .route("/api/warehouse/export/preview", post(export_preview))
            .route("/api/warehouse/export", get(export_history).post(export_commit))
            .route("/api/warehouse/discard", post(discard))
            .route("/api/warehouse/inventory/start", post(count_start))
            .route("/api/warehouse/inventory/record", post(count_record))
            .route("/api/warehouse/adjustment/inventories", get(adjustable_counts))
            .route("/api/warehouse/adjustment/preview", post(adjustment_preview))
            .route("/api/warehouse/adjustment", post(adjustment_execute))
            .route("/api/warehouse/adjustment/history", get(adjustment_history))
            .route("/api/suppliers", get(suppliers))
            .route("/api/suggest-order", get(suggest_order))
            .route("/api/orders", get(orders).post(create_order))
            .route("/api/orders/:id", get(order).delete(delete_order))
            .route("/api/orders/:id/approve", post(approve_order))
            .route("/api/orders/:id/reject", post(reject_order))
            .route("/api/sales/returns/search-invoice", get(returnable_invoice))
            .route("/api/sales/returns", get(returns).post(create_return))
            .route("/api/sales/returns/:id", get(return_detail))
            .route("/api/products", post(create_product))
            .route("/api/products/:id", put(update_product).delete(delete_product))
            .route("/api/reports/expiry", get(expiry_report))
            .route("/api/reports/sales", get(sales_report))
            .route("/api/reports/batch-history", get(batch_history))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::with_base_url(self.base_url.clone())
    }

    pub fn commit_calls(&self) -> usize {
        self.state.commit_calls.load(Ordering::SeqCst)
    }

    pub fn record_calls(&self) -> usize {
        self.state.record_calls.load(Ordering::SeqCst)
    }

    pub fn fail_commits(&self, fail: bool) {
        self.state.fail_commits.store(fail, Ordering::SeqCst);
    }
}

pub async fn staff_session(api: &ApiClient) -> Session {
    let credentials = Credentials::new(
        USERNAME,
        SecretString::from(PASSWORD.to_string()),
        AccountKind::Staff(shared::StaffRole::Clerk),
    );
    api.auth().login(&credentials).await.expect("staff login")
}

pub async fn manager_session(api: &ApiClient) -> Session {
    let credentials = Credentials::new(
        MANAGER,
        SecretString::from(PASSWORD.to_string()),
        AccountKind::Staff(shared::StaffRole::Manager),
    );
    api.auth().login(&credentials).await.expect("manager login")
}

pub async fn cashier_session(api: &ApiClient) -> Session {
    let credentials = Credentials::new(
        CASHIER,
        SecretString::from(PASSWORD.to_string()),
        AccountKind::Cashier,
    );
    api.auth().login(&credentials).await.expect("cashier login")
}

// ============================================================================
// Envelope helpers
// ============================================================================

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "message": "Success", "data": data })).into_response()
}

fn fail(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn upstream_down() -> Response {
    (StatusCode::BAD_GATEWAY, "<html>upstream timeout</html>").into_response()
}

/// Count a stock-changing call; `Some` when the call should fail
fn write_call(state: &MockState) -> Option<Response> {
    state.commit_calls.fetch_add(1, Ordering::SeqCst);
    state
        .fail_commits
        .load(Ordering::SeqCst)
        .then(upstream_down)
}

fn items(body: &Value) -> Vec<Value> {
    body["items"].as_array().cloned().unwrap_or_default()
}

fn token(sub: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": sub, "exp": 4_102_444_800i64 }),
        &EncodingKey::from_secret(b"mock-backend"),
    )
    .expect("encode token")
}

// ============================================================================
// Handlers
// ============================================================================

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid credentials" })),
        )
            .into_response();
    }
    let user = match (body["username"].as_str(), body["type"].as_str()) {
        (Some(USERNAME), Some("NhanVienKho")) => json!({
            "MaNV": "NV01", "Ten": "Lan", "TaiKhoanNV": USERNAME,
            "Role": "Nhân viên", "Type": "NhanVienKho"
        }),
        (Some(MANAGER), Some("NhanVienKho")) => json!({
            "MaNV": "NV09", "Ten": "Minh", "TaiKhoanNV": MANAGER,
            "Role": "Quản lý", "Type": "NhanVienKho"
        }),
        (Some(CASHIER), Some("ThuNgan")) => json!({
            "MaNV": "TN01", "Ten": "Hoa", "Type": "ThuNgan"
        }),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "Invalid credentials" })),
            )
                .into_response()
        }
    };
    let sub = user["MaNV"].as_str().unwrap_or_default().to_string();
    ok(json!({ "access_token": token(&sub), "user": user }))
}

async fn logout() -> Response {
    Json(json!({ "success": true, "message": "Logout successful" })).into_response()
}

async fn me() -> Response {
    ok(json!({
        "MaNV": "NV01", "Ten": "Lan", "TaiKhoanNV": USERNAME,
        "Role": "Quản lý", "Type": "NhanVienKho"
    }))
}

async fn warehouses() -> Response {
    ok(json!([
        { "MaKho": "W1", "DiaChi": "Q1", "Loai": "Kho thường" },
        { "MaKho": "W2", "DiaChi": "Q7", "Loai": "Kho thường" },
        { "MaKho": "WL", "Loai": "Kho lỗi" }
    ]))
}

async fn fefo_batches(Json(body): Json<Value>) -> Response {
    match body["MaSP"].as_str() {
        Some("SP404") => fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable"),
        Some("SP000") => ok(json!({
            "suggested_batches": [], "can_fulfill": false, "shortage": body["SoLuong"]
        })),
        _ => ok(json!({
            "suggested_batches": [
                { "MaLo": "LO2", "MaSP": "SP001", "HSD": "2031-03-01", "SLTon": 20,
                  "suggested_quantity": 5 },
                { "MaLo": "LO1", "MaSP": "SP001", "HSD": "2030-01-01", "SLTon": 10,
                  "suggested_quantity": 10 }
            ],
            "can_fulfill": true,
            "shortage": 0
        })),
    }
}

async fn warehouse_scan(Json(body): Json<Value>) -> Response {
    if body["MaVach"] != "8930001" || body["MaKho"] != "W1" {
        return fail(
            StatusCode::NOT_FOUND,
            "Không tìm thấy lô hàng với mã vạch này trong kho",
        );
    }
    ok(json!({
        "batch_info": { "MaLo": "B2", "MaSP": "P2", "MaVach": "8930001",
                        "HSD": "2030-01-01", "SLTon": 5 },
        "product": { "MaSP": "P2", "TenSP": "Nước suối", "DVT": "Thùng", "GiaBan": 60000.0 },
        "warnings": ["Lô hàng sắp hết hạn"]
    }))
}

async fn sale_scan(Json(body): Json<Value>) -> Response {
    if body["barcode"] != "8930001" {
        return fail(StatusCode::NOT_FOUND, "Không tìm thấy sản phẩm với mã vạch này");
    }
    ok(json!({
        "product": { "MaSP": "P2", "TenSP": "Nước suối", "DVT": "Chai", "GiaBan": 5000.0 },
        "batch": { "MaLo": "B2", "MaSP": "P2", "MaVach": "8930001",
                   "HSD": "2030-01-01", "SLTon": 5 },
        "expiry_warning": null
    }))
}

async fn sale_batches(Path(id): Path<String>) -> Response {
    ok(json!({
        "product": { "MaSP": id, "TenSP": "Nước suối", "GiaBan": 5000.0 },
        "batches": [
            { "MaLo": "B3", "MaSP": id, "HSD": null, "SLTon": 8 },
            { "MaLo": "B2", "MaSP": id, "HSD": "2030-01-01", "SLTon": 5 }
        ],
        "total_stock": 13
    }))
}

/// Source stock per batch in warehouse W1
fn source_stock(batch: &str) -> i64 {
    match batch {
        "B2" => 5,
        "B3" => 8,
        _ => 0,
    }
}

fn classify_transfer_line(item: &Value) -> Value {
    let batch = item["MaLo"].as_str().unwrap_or_default();
    let qty = item["SoLuong"].as_i64().unwrap_or_default();
    let stock = source_stock(batch);
    if qty > stock {
        return json!({
            "MaSP": item["MaSP"], "MaLo": batch, "SoLuong": qty, "SLTon": stock,
            "status": "error", "message": "Không đủ số lượng tồn kho"
        });
    }
    let (kind, dest) = if qty == stock {
        ("full", batch.to_string())
    } else {
        ("partial", format!("{}-T001", batch))
    };
    json!({
        "MaSP": item["MaSP"], "MaLo": batch, "SoLuong": qty, "SLTon": stock,
        "status": "ok", "transfer_type": kind, "new_MaLo": dest
    })
}

async fn transfer_preview(Json(body): Json<Value>) -> Response {
    let items: Vec<Value> = body["items"]
        .as_array()
        .map(|items| items.iter().map(classify_transfer_line).collect())
        .unwrap_or_default();
    let valid = items.iter().all(|i| i["status"] != "error");
    ok(json!({
        "valid": valid,
        "items": items,
        "errors": [],
        "warnings": [],
        "summary": {
            "source_warehouse": body["KhoXuat"],
            "destination_warehouse": body["KhoNhap"],
            "total_items": items.len()
        }
    }))
}

async fn transfer_commit(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(down) = write_call(&state) {
        return down;
    }
    let transferred: Vec<Value> = body["items"]
        .as_array()
        .map(|items| items.iter().map(classify_transfer_line).collect())
        .unwrap_or_default();
    let doc = |code: &str| json!({ "MaPhieu": code, "NgayTao": "2025-06-01T09:30:00",
                                   "KhoXuat": body["KhoXuat"], "KhoNhap": body["KhoNhap"] });
    ok(json!({
        "phieu_chuyen_kho": doc("PCK000001"),
        "phieu_xuat": doc("PX000001"),
        "phieu_nhap": doc("PN000001"),
        "transferred_items": transferred
    }))
}

async fn transfer_history() -> Response {
    ok(json!([{ "MaPhieu": "PCK000001", "NgayTao": "2025-06-01T09:30:00" }]))
}

async fn create_invoice(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.invoice_calls.fetch_add(1, Ordering::SeqCst);
    let items: Vec<Value> = body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|i| {
                    let qty = i["SoLuong"].as_i64().unwrap_or_default();
                    json!({ "MaSP": i["MaSP"], "MaLo": i["MaLo"], "SoLuong": qty,
                            "DonGia": 5000.0, "ThanhTien": (qty * 5000) as f64 })
                })
                .collect()
        })
        .unwrap_or_default();
    let total: f64 = items.iter().filter_map(|i| i["ThanhTien"].as_f64()).sum();
    ok(json!({
        "MaHD": "HD000001",
        "NgayTao": "2025-06-01T10:00:00",
        "TenThuNgan": "Hoa",
        "items": items,
        "TongTien": total,
        "MaPhieuXK": "PX000002"
    }))
}

// ============================================================================
// Import, export and defect stock
// ============================================================================

async fn inventory(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "WL" => ok(json!({
            "warehouse": { "MaKho": "WL", "Loai": "Kho lỗi" },
            "inventory": [
                { "MaSP": "P1", "TenSP": "Sữa tươi", "MaLo": "L1", "HSD": "2025-05-20", "SLTon": 4 },
                { "MaSP": "P2", "TenSP": "Nước suối", "MaLo": "L2", "SLTon": 2 }
            ]
        })),
        "W1" => ok(json!({
            "warehouse": { "MaKho": "W1", "Loai": "Kho thường" },
            "inventory": [
                { "MaSP": "P2", "MaLo": "B2", "SLTon": 5 },
                { "MaSP": "P2", "MaLo": "B3", "SLTon": 8 }
            ]
        })),
        _ => fail(StatusCode::NOT_FOUND, "Không tìm thấy kho"),
    }
}

/// `DUP` already exists in every warehouse
fn classify_import_line(item: &Value) -> Value {
    let batch = item["MaLo"].as_str().unwrap_or_default();
    let (status, message) = if batch == "DUP" {
        ("error", Some("Mã lô đã tồn tại"))
    } else {
        ("ok", None)
    };
    json!({
        "MaSP": item["MaSP"], "MaLo": batch, "SoLuong": item["SoLuong"],
        "status": status, "message": message
    })
}

fn classify_export_line(item: &Value) -> Value {
    let batch = item["MaLo"].as_str().unwrap_or_default();
    let qty = item["SoLuong"].as_i64().unwrap_or_default();
    let stock = source_stock(batch);
    let (status, message) = if qty > stock {
        ("error", Some("Không đủ số lượng tồn kho"))
    } else {
        ("ok", None)
    };
    json!({
        "MaSP": item["MaSP"], "MaLo": batch, "SoLuong": qty, "SLTon": stock,
        "status": status, "message": message
    })
}

fn preview_report(items: Vec<Value>, body: &Value) -> Response {
    let valid = items.iter().all(|i| i["status"] != "error");
    let total: i64 = items.iter().filter_map(|i| i["SoLuong"].as_i64()).sum();
    ok(json!({
        "valid": valid,
        "items": items,
        "errors": [],
        "warnings": [],
        "summary": { "source_warehouse": body["MaKho"], "total_items": items.len(),
                     "total_quantity": total }
    }))
}

async fn import_preview(Json(body): Json<Value>) -> Response {
    let lines = items(&body).iter().map(classify_import_line).collect();
    preview_report(lines, &body)
}

async fn export_preview(Json(body): Json<Value>) -> Response {
    let lines = items(&body).iter().map(classify_export_line).collect();
    preview_report(lines, &body)
}

async fn import_commit(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(down) = write_call(&state) {
        return down;
    }
    ok(json!({
        "phieu": { "MaPhieu": "PN000009", "NgayTao": "2025-06-01T08:00:00",
                   "MucDich": body["MucDich"], "KhoNhap": body["MaKho"] },
        "batches": items(&body)
    }))
}

async fn export_commit(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(down) = write_call(&state) {
        return down;
    }
    ok(json!({
        "phieu": { "MaPhieu": "PX000009", "NgayTao": "2025-06-01T08:30:00",
                   "MucDich": body["MucDich"], "KhoXuat": body["MaKho"] },
        "batches": items(&body)
    }))
}

async fn import_history() -> Response {
    ok(json!([{ "MaPhieu": "PN000009", "NgayTao": "2025-06-01T08:00:00" }]))
}

async fn export_history() -> Response {
    ok(json!({ "items": [{ "MaPhieu": "PX000009", "NgayTao": "2025-06-01T08:30:00" }] }))
}

/// Defect stock per batch in warehouse WL
fn defect_stock(batch: &str) -> Option<i64> {
    match batch {
        "L1" => Some(4),
        "L2" => Some(2),
        _ => None,
    }
}

async fn discard(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(down) = write_call(&state) {
        return down;
    }
    let lines = items(&body);
    for line in &lines {
        let batch = line["MaLo"].as_str().unwrap_or_default();
        match defect_stock(batch) {
            None => return fail(StatusCode::BAD_REQUEST, "Lô hàng không nằm trong kho lỗi"),
            Some(stock) if line["SoLuong"].as_i64().unwrap_or_default() > stock => {
                return fail(StatusCode::BAD_REQUEST, "Không đủ số lượng để hủy")
            }
            Some(_) => {}
        }
    }
    let discarded: Vec<Value> = lines
        .iter()
        .map(|l| json!({ "MaSP": l["MaSP"], "MaLo": l["MaLo"], "SoLuong": l["SoLuong"],
                         "MaKho": "WL" }))
        .collect();
    ok(json!({
        "phieu": { "MaPhieu": "PX000020", "NgayTao": "2025-06-01T11:00:00",
                   "MucDich": format!("Hủy hàng: {}", body["LyDo"].as_str().unwrap_or_default()),
                   "KhoXuat": "WL" },
        "discarded_items": discarded
    }))
}

// ============================================================================
// Inventory count and adjustment
// ============================================================================

/// System quantity per batch of the count sheet
fn counted_system_quantity(batch: &str) -> i64 {
    match batch {
        "B1" => 10,
        "B2" => 4,
        _ => 0,
    }
}

async fn count_start(Json(body): Json<Value>) -> Response {
    if body["MaKho"] == "W404" {
        return fail(StatusCode::NOT_FOUND, "Không tìm thấy kho");
    }
    ok(json!({
        "phieu": { "MaPhieu": "PKK000001", "NgayTao": "2025-06-01T07:00:00",
                   "MaKho": body["MaKho"], "MucDich": body["MucDich"] },
        "batches": [
            { "MaSP": "P1", "MaLo": "B1", "MaVach": "111", "SLHeThong": 10 },
            { "MaSP": "P1", "MaLo": "B2", "MaVach": "222", "SLHeThong": 4 }
        ],
        "total_batches": 2
    }))
}

async fn count_record(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.record_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_commits.load(Ordering::SeqCst) {
        return upstream_down();
    }
    let discrepancies: Vec<Value> = items(&body)
        .iter()
        .filter_map(|i| {
            let batch = i["MaLo"].as_str().unwrap_or_default();
            let system = counted_system_quantity(batch);
            let counted = i["SLThucTe"].as_i64().unwrap_or_default();
            (counted != system).then(|| json!({
                "MaSP": i["MaSP"], "MaLo": batch, "MaVach": i["MaVach"],
                "SLHeThong": system, "SLThucTe": counted, "ChenhLech": counted - system
            }))
        })
        .collect();
    ok(json!({
        "phieu": { "MaPhieu": body["MaPhieu"], "MaKho": "W1" },
        "has_discrepancies": !discrepancies.is_empty(),
        "discrepancies": discrepancies
    }))
}

async fn adjustable_counts() -> Response {
    ok(json!({
        "inventories": [
            { "MaPhieu": "PKK000001", "NgayTao": "2025-06-01T07:00:00", "MaKho": "W1",
              "discrepancy_count": 2 }
        ],
        "total": 1
    }))
}

/// Receipt lines of the PKK000001 adjustment; codes exist once executed
fn adjustment_lines(executed: bool) -> (Value, Value) {
    let code = |c: &str| executed.then(|| c.to_string());
    (
        json!([{ "MaPhieu": code("PN000011"), "MaSP": "P1", "MaLo": "B2", "SoLuong": 1 }]),
        json!([{ "MaPhieu": code("PX000011"), "MaSP": "P1", "MaLo": "B1", "SoLuong": 2 }]),
    )
}

async fn adjustment_preview(Json(body): Json<Value>) -> Response {
    if body["MaPhieuKiem"] != "PKK000001" {
        return fail(StatusCode::NOT_FOUND, "Không tìm thấy phiếu kiểm kê");
    }
    let (imports, exports) = adjustment_lines(false);
    ok(json!({
        "import_receipts": imports,
        "export_receipts": exports,
        "total_adjustments": 2,
        "summary": { "import_receipts": 1, "export_receipts": 1,
                     "total_increase": 1, "total_decrease": 2 }
    }))
}

async fn adjustment_execute(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(down) = write_call(&state) {
        return down;
    }
    if body["MaPhieuKiem"] != "PKK000001" {
        return fail(StatusCode::BAD_REQUEST, "Phiếu kiểm kê đã được điều chỉnh");
    }
    let (imports, exports) = adjustment_lines(true);
    ok(json!({ "phieu_nhap": imports, "phieu_xuat": exports, "total_adjustments": 2 }))
}

async fn adjustment_history() -> Response {
    ok(json!({
        "adjustments": [
            { "MaPhieu": "PN000011", "NgayTao": "2025-06-01T12:00:00", "type": "increase",
              "MaThamChieu": "PKK000001", "MaSP": "P1", "MaLo": "B2", "SoLuong": 1 },
            { "MaPhieu": "PX000011", "NgayTao": "2025-06-01T12:00:00", "type": "decrease",
              "MaThamChieu": "PKK000001", "MaSP": "P1", "MaLo": "B1", "SoLuong": 2 }
        ]
    }))
}

// ============================================================================
// Supplier orders
// ============================================================================

async fn suppliers() -> Response {
    ok(json!({
        "suppliers": [{ "Ten": "Vinamilk", "PhuongThucLienHe": "0281234567" }],
        "total": 1
    }))
}

async fn suggest_order() -> Response {
    ok(json!({
        "suggestions": [
            { "MaSP": "SP001", "TenSP": "Sữa tươi", "DVT": "Hộp", "GiaBan": 12000.0,
              "MucCanhBaoDatHang": 10, "current_stock": 4, "warning_level": 10,
              "suggested_quantity": 16, "shortage": 6 },
            { "MaSP": "SP002", "TenSP": "Sữa chua", "DVT": "Hộp", "GiaBan": 8000.0,
              "MucCanhBaoDatHang": 10, "current_stock": 7, "warning_level": 10,
              "suggested_quantity": 0, "shortage": 3 }
        ],
        "total": 2
    }))
}

fn pending_order() -> Value {
    json!({
        "MaDonHang": "DH000001", "TenNCC": "Vinamilk", "MaNV": "NV01",
        "NgayDat": "2025-06-01T09:00:00", "TrangThai": "Chờ duyệt",
        "items": [{ "MaSP": "SP001", "SoLuongDat": 16, "GiaBan": 12000.0 }],
        "total_items": 1, "total_quantity": 16, "total_amount": 192000.0
    })
}

async fn create_order(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(down) = write_call(&state) {
        return down;
    }
    let lines = items(&body);
    if lines.iter().any(|l| l["SoLuongDat"].as_i64().unwrap_or_default() <= 0) {
        return fail(StatusCode::BAD_REQUEST, "Số lượng đặt phải lớn hơn 0");
    }
    let total: i64 = lines.iter().filter_map(|l| l["SoLuongDat"].as_i64()).sum();
    ok(json!({
        "order": {
            "MaDonHang": "DH000003", "TenNCC": body["TenNCC"], "MucDich": body["MucDich"],
            "MaNV": "NV01", "NgayDat": "2025-06-01T09:15:00", "TrangThai": "Chờ duyệt",
            "items": lines, "total_items": lines.len(), "total_quantity": total
        }
    }))
}

async fn orders() -> Response {
    let mut approved = pending_order();
    approved["MaDonHang"] = json!("DH000002");
    approved["TrangThai"] = json!("Đã duyệt");
    approved["MaNVDuyet"] = json!("NV09");
    ok(json!({ "orders": [pending_order(), approved], "total": 2 }))
}

async fn order(Path(id): Path<String>) -> Response {
    if id != "DH000001" {
        return fail(StatusCode::NOT_FOUND, "Không tìm thấy đơn hàng");
    }
    ok(pending_order())
}

async fn approve_order(Path(id): Path<String>) -> Response {
    ok(json!({ "MaDonHang": id, "TrangThai": "Đã duyệt", "MaNVDuyet": "NV09" }))
}

async fn reject_order(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    match body["LyDo"].as_str().filter(|r| !r.is_empty()) {
        Some(reason) => ok(json!({
            "MaDonHang": id, "TrangThai": "Từ chối", "MaNVDuyet": "NV09", "LyDoTuChoi": reason
        })),
        None => fail(StatusCode::BAD_REQUEST, "Vui lòng nhập lý do từ chối"),
    }
}

async fn delete_order(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.commit_calls.fetch_add(1, Ordering::SeqCst);
    if id == "DH000002" {
        return fail(StatusCode::BAD_REQUEST, "Không thể xóa đơn hàng đã duyệt");
    }
    Json(json!({ "success": true, "message": "Đã xóa đơn hàng" })).into_response()
}

// ============================================================================
// Customer returns
// ============================================================================

/// HD000001 is returnable, HD000002 was already returned, HD000003 is too old
async fn returnable_invoice(Query(query): Query<HashMap<String, String>>) -> Response {
    let code = query.get("ma_hd").map(String::as_str).unwrap_or_default();
    let (returned, days) = match code {
        "HD000001" => (false, 2),
        "HD000002" => (true, 3),
        "HD000003" => (false, 10),
        _ => return fail(StatusCode::NOT_FOUND, "Không tìm thấy hóa đơn"),
    };
    ok(json!({
        "MaHD": code, "NgayTao": "2025-05-30T10:00:00", "TongTien": 23000.0,
        "ThuNgan": "Hoa", "da_tra_hang": returned, "days_since_purchase": days,
        "items": [
            { "MaSP": "P2", "TenSP": "Nước suối", "DVT": "Chai", "SoLuong": 3,
              "DonGia": 5000.0, "ThanhTien": 15000.0,
              "batch_info": { "MaLo": "B2", "HSD": "2030-01-01" } },
            { "MaSP": "P3", "TenSP": "Bánh mì", "SoLuong": 1, "DonGia": 8000.0,
              "batch_info": null }
        ]
    }))
}

async fn create_return(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(down) = write_call(&state) {
        return down;
    }
    let returned: Vec<Value> = items(&body)
        .iter()
        .map(|i| {
            let qty = i["SoLuong"].as_i64().unwrap_or_default();
            json!({ "MaSP": i["MaSP"], "MaLo": i["MaLo"], "SoLuong": qty,
                    "DonGia": 5000.0, "ThanhTien": (qty * 5000) as f64 })
        })
        .collect();
    let refund: f64 = returned.iter().filter_map(|i| i["ThanhTien"].as_f64()).sum();
    ok(json!({
        "MaYC": "YC000001", "MaHD": body["ma_hd"], "MaPhieuNK": "PN000010",
        "NgayTao": "2025-06-01T14:00:00", "LyDo": body["ly_do"], "KhoNhap": body["kho_nhap"],
        "items": returned, "TongTienHoanTra": refund, "NguoiXuLy": "Hoa"
    }))
}

async fn returns(Query(query): Query<HashMap<String, String>>) -> Response {
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: u32 = query.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(20);
    ok(json!({
        "items": [{ "MaYC": "YC000001", "MaHD": "HD000001", "TongTienHoanTra": 10000.0,
                    "NguoiXuLy": "Hoa" }],
        "total": 1, "page": page, "per_page": per_page, "pages": 1,
        "has_next": false, "has_prev": false
    }))
}

async fn return_detail(Path(id): Path<String>) -> Response {
    if id != "YC000001" {
        return fail(StatusCode::NOT_FOUND, "Không tìm thấy yêu cầu trả hàng");
    }
    ok(json!({
        "MaYC": id, "MaHD": "HD000001", "KhoNhap": "Kho lỗi", "TongTienHoanTra": 10000.0,
        "NguoiXuLy": { "MaNV": "TN01", "Ten": "Hoa" },
        "items": [{ "MaSP": "P2", "MaLo": "B2", "SoLuong": 2, "DonGia": 5000.0 }]
    }))
}

// ============================================================================
// Products
// ============================================================================

async fn create_product(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.commit_calls.fetch_add(1, Ordering::SeqCst);
    if body["MaSP"] == "SP001" {
        return fail(StatusCode::CONFLICT, "Mã sản phẩm đã tồn tại");
    }
    let mut product = body.clone();
    if product["MaSP"].is_null() {
        product["MaSP"] = json!("SP100");
    }
    product["TrangThai"] = json!("Hết hàng");
    ok(product)
}

async fn update_product(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let mut product = json!({
        "MaSP": id, "TenSP": "Sữa tươi", "DVT": "Hộp", "GiaBan": 12000.0,
        "MucCanhBaoDatHang": 10, "TrangThai": "Còn hàng"
    });
    if let (Some(target), Some(changes)) = (product.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    ok(product)
}

async fn delete_product(Path(id): Path<String>) -> Response {
    if id == "SP001" {
        return fail(StatusCode::BAD_REQUEST, "Không thể xóa sản phẩm còn tồn kho");
    }
    Json(json!({ "success": true, "message": "Đã xóa sản phẩm" })).into_response()
}

// ============================================================================
// Reports
// ============================================================================

async fn expiry_report(Query(query): Query<HashMap<String, String>>) -> Response {
    let days: u32 = query.get("days").and_then(|d| d.parse().ok()).unwrap_or(30);
    let status = query.get("status").map(String::as_str).unwrap_or("all");
    let expired = json!([
        { "MaKho": "W1", "MaSP": "P1", "TenSP": "Sữa tươi", "MaLo": "L1",
          "HSD": "2025-05-20", "SLTon": 4, "days_to_expiry": -12, "is_expired": true,
          "status": "expired" }
    ]);
    let expiring = json!([
        { "MaKho": "W1", "MaSP": "P2", "TenSP": "Nước suối", "MaLo": "B9",
          "HSD": "2025-06-20", "SLTon": 6, "days_to_expiry": 19, "status": "warning" },
        { "MaKho": "W2", "MaSP": "P2", "TenSP": "Nước suối", "MaLo": "B8",
          "HSD": "2025-06-04", "SLTon": 3, "days_to_expiry": 3, "status": "critical" }
    ]);
    let (expired, expiring) = match status {
        "expired" => (expired, json!([])),
        "expiring" => (json!([]), expiring),
        _ => (expired, expiring),
    };
    let count = |v: &Value| v.as_array().map(Vec::len).unwrap_or_default();
    ok(json!({
        "summary": { "total_expired": count(&expired), "total_expiring": count(&expiring),
                     "check_period_days": days },
        "expired": expired,
        "expiring": expiring
    }))
}

async fn sales_report(Query(query): Query<HashMap<String, String>>) -> Response {
    let (Some(from), Some(to)) = (query.get("from_date"), query.get("to_date")) else {
        return fail(StatusCode::BAD_REQUEST, "Thiếu khoảng thời gian");
    };
    ok(json!({
        "daily_sales": [
            { "date": "2025-06-01", "total_revenue": 150000.0, "total_quantity": 30,
              "total_invoices": 6 },
            { "date": "2025-06-02", "total_revenue": 90000.0, "total_quantity": 18,
              "total_invoices": 4 }
        ],
        "top_products": [
            { "MaSP": "P2", "TenSP": "Nước suối", "GiaBan": 5000.0, "total_quantity": 40,
              "total_revenue": 200000.0 }
        ],
        "summary": { "total_revenue": 240000.0, "total_quantity": 48, "total_invoices": 10,
                     "average_revenue_per_day": 120000.0, "average_invoice_value": 24000.0 },
        "period": { "from_date": from, "to_date": to }
    }))
}

async fn batch_history(Query(query): Query<HashMap<String, String>>) -> Response {
    let (Some(batch), Some(product)) = (query.get("ma_lo"), query.get("ma_sp")) else {
        return fail(StatusCode::BAD_REQUEST, "Thiếu mã lô hoặc mã sản phẩm");
    };
    if batch != "B2" {
        return fail(StatusCode::NOT_FOUND, "Không tìm thấy lô hàng");
    }
    ok(json!({
        "batch_info": { "MaLo": batch, "MaSP": product, "MaKho": "W1", "SLTon": 5 },
        "history": [
            { "type": "export", "date": "2025-05-10T15:00:00", "ma_phieu": "PX000003",
              "ma_kho": "W1", "so_luong": 5, "action": "Xuất kho" },
            { "type": "import", "date": "2025-05-01T08:00:00", "ma_phieu": "PN000001",
              "ma_kho": "W1", "so_luong": 10, "action": "Nhập kho" }
        ],
        "total_movements": 2
    }))
}
