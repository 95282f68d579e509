//! Request and view models for the valuation page.

pub mod report;

pub use report::{ReportBody, ValuationForm};
