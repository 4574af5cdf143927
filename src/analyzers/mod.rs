//! Analytical passes over the loaded record set.
//!
//! This module ranks and filters schools, assigns performance tiers,
//! aggregates district and sheet-wide figures, and computes the
//! correlation matrix behind the insights view.

pub mod aggregate;
pub mod correlation;
pub mod rank;
pub mod tier;
pub mod types;
pub mod utility;
