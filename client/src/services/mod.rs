//! Screen-level services built on the API client

pub mod adjustment;
pub mod batch_resolver;
pub mod checkout;
pub mod discard;
pub mod movement;
pub mod orders;
pub mod products;
pub mod reporting;
pub mod reports;
pub mod returns;
pub mod scan;

pub use adjustment::AdjustmentDesk;
pub use batch_resolver::{BatchLookup, BatchResolver, FefoLookup};
pub use checkout::Checkout;
pub use discard::DiscardDesk;
pub use movement::{ExportDesk, ImportDesk, MovementDesk, MovementEndpoint, TransferDesk};
pub use orders::OrderDesk;
pub use products::ProductDesk;
pub use reports::ReportDesk;
pub use returns::ReturnDesk;
pub use scan::{ScanField, ScanOutcome, ScanResolver};
