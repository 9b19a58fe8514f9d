//! Domain models for the Warehouse Retail Management client

mod adjustment;
mod batch;
mod discard;
mod movement;
mod order;
mod product;
mod report;
mod returns;
mod sale;
mod scan;
mod user;
mod warehouse;

pub use adjustment::*;
pub use batch::*;
pub use discard::*;
pub use movement::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use returns::*;
pub use sale::*;
pub use scan::*;
pub use user::*;
pub use warehouse::*;
