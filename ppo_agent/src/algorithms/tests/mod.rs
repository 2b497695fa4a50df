//! Tests for the algorithms module.
//!
//! - `gae_tests`: the advantage recursion over raw slices
//! - `estimator_tests`: the raw -> training trajectory transform

pub mod gae_tests;
