//! Common error types shared across the type library

pub mod errors;
