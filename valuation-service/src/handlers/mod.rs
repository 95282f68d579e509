//! HTTP handlers: the valuation page plus probes.

pub mod health;
pub mod valuation;
