//! Token exchange
//!
//! Bridges the continuous balance domain and the discrete, countable
//! token domain. A withdrawal never drops a remaining balance below the
//! floor; a rejected withdrawal leaves balance and token state untouched.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod converter;

pub use converter::{TokenConverter, WithdrawReason, WithdrawResult};
