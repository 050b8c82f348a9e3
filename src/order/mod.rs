//! Lease order model

mod data;

pub use data::LeaseOrder;
