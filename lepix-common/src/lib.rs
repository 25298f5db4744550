//! An internal crate containing the packed pixel accessors reused across the
//! crates in the lepix project.
//!
//! This crate is not meant for external consumption.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bit;
