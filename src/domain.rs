//! Domain models for the genealogy checker.
//!
//! This module contains the typed entity records, cross-reference
//! identifiers, event dates, and the entity store they live in.

/// Event date parsing and comparison.
pub mod date;
pub use date::{Date, Month};

/// Family record.
pub mod family;
pub use family::Family;

/// Individual record.
pub mod individual;
pub use individual::{Individual, Sex};

mod sourced;
pub use sourced::Sourced;

/// The entity store.
pub mod store;
pub use store::GedcomStore;

/// Cross-reference identifiers.
pub mod xref;
pub use xref::{InvalidXrefError, Xref};
