//! Wire and domain types shared between the promotions client crates.

pub mod domain;
pub mod error;
pub mod protocol;
