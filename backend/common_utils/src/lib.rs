//! Shared helpers for the Gestpay client crates.

pub mod consts;
pub mod errors;
pub mod fp_utils;
pub mod log_utils;
