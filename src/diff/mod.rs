//! Structural deck comparison, used to detect and describe unsaved edits.

pub mod comparer;
pub mod error;
mod formatting;
pub mod structured;

pub use comparer::{Comparer, ComparerBuilder, ComparisonResult};
pub use error::DiffError;
pub use structured::{Change, ChangeType, ValueRepr};
