//! GEDCOM genealogy parsing and consistency checking.
//!
//! Ingests a GEDCOM-like record file, builds a typed in-memory model of
//! individuals and families, computes derived data, and runs a catalogue of
//! consistency rules producing findings. Data flows one way: raw lines →
//! tokens → entities → derived fields → findings → report.

pub mod domain;
pub use domain::{Date, Family, GedcomStore, Individual, Month, Sex, Sourced, Xref};

/// Tokenizer, entity builder, and file loading.
pub mod parser;
pub use parser::LoadError;

/// The derived-data pass: ages, sibling order, multiple-birth clusters.
pub mod analysis;

/// The validation rule engine.
pub mod checks;
pub use checks::{Context, Finding};

/// Derived listings over the entity store.
pub mod report;
