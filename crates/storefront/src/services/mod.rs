//! Business logic services.

pub mod lead;

pub use lead::{LeadChannel, LeadError, VisitRequest};
