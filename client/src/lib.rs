//! Warehouse Retail Management client
//!
//! Async client for the warehouse/retail backend: session handling, catalogue
//! and warehouse lookups, FEFO batch resolution, barcode scans, POS checkout,
//! customer returns, warehouse movements, discards, inventory adjustment,
//! supplier orders, catalogue maintenance and reports.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod session;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use session::{Credentials, Session};
