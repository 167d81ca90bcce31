//! Validation of extracted document data.
//!
//! Two concerns live here: cross-document consistency scoring over OCR
//! extractions, and checking a user's document selection against a
//! service's requirement rules.

pub mod consistency;
pub mod requirements;

pub use consistency::{check_validity, cross_validate, validate_document};
pub use requirements::{validate_selection, SelectionVerdict};
