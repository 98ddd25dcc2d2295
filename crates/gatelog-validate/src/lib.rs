//! Field-level validation for visitor registration forms.
//!
//! Every rule is a pure function from a raw input string to either "valid"
//! or a human-readable error message. Rules are independent — a failure in
//! one field never blocks validation of another — and cheap enough to re-run
//! on every keystroke.

pub mod format;
pub mod rules;

pub use rules::{Field, validate, validate_form};
