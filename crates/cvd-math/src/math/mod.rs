//! Core math modules.

pub mod composition;
pub mod rounding;
pub mod survival;
