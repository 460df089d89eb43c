//! Wire envelopes and validated domain types shared by the portfolio clients.

pub mod domain;
pub mod error;
pub mod protocol;
