//! Shared types and models for the Warehouse Retail Management client
//!
//! This crate contains the pure, I/O-free part of the client: the data model,
//! the line-item store used by the POS and warehouse movement screens, FEFO
//! ordering, the preview/commit state machine, single-call drafts for orders,
//! returns and discards, and the permission model.
//! It is shared between the networked client and the WASM bindings.

pub mod cart;
pub mod draft;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;
pub mod workflow;

pub use cart::*;
pub use draft::*;
pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
pub use workflow::*;
