pub mod markdown;
pub mod prompt;
pub mod providers;
pub mod valuation;

pub use valuation::{RenderMode, ValuationError, ValuationService};
