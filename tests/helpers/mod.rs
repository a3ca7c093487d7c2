// Shared helpers for the integration tests.
//
// Every test crate pulls this module in with
// `#[path = "../helpers/mod.rs"] mod helpers;` and uses the subset it needs.
#![allow(dead_code)]

pub mod assertions;

pub use assertions::*;
pub use test_app::*;
pub use test_data::*;
