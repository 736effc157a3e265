//! CVD risk common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - The immutable patient profile and its clinical input bounds
//! - Risk horizons
//! - Common error types with stable codes
//! - Output formats

pub mod error;
pub mod horizon;
pub mod output;
pub mod profile;
pub mod schema;

pub use error::{Error, ErrorCategory, Result};
pub use horizon::Horizon;
pub use output::OutputFormat;
pub use profile::{InputBounds, PatientProfile, Range, SbpRange, Sex, VascularHistory};
pub use schema::SCHEMA_VERSION;
