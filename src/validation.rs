//! Diagnostics shared by every dialect validator.
//!
//! - `report`     : diagnostic records and the [`Report`] builder.
//! - `structural` : the dialect-independent first layer (empty query, brackets,
//!   quotes).
//! - `grammar`    : helpers dialect grammars are written with, and the
//!   [`pipeline`](grammar::pipeline) that orders the layers.
//!
//! Dialect validators run an ordered pipeline over a [`Report`]: structural,
//! then grammar, then semantic heuristics. A layer that adds an error stops the
//! pipeline, so later layers only ever see text that passed the earlier ones.
pub mod grammar;
mod report;
pub mod structural;

pub use report::{ErrorType, Report, Severity, ValidationError, ValidationResult};
pub use structural::StructuralRules;
