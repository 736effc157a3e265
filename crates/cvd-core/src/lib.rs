//! CVD risk core library.
//!
//! Estimates baseline cardiovascular risk from a patient profile, converts it
//! across horizons, projects LDL under lipid-lowering therapy and composes the
//! relative risk reductions of a chosen treatment plan.

pub mod assess;
pub mod config;
pub mod engine;
pub mod exit_codes;
pub mod horizon;
pub mod logging;
pub mod output;
pub mod risk_model;
pub mod schema;
pub mod therapy;

pub use assess::{assess, Assessment, AssessmentRequest, ClinicalFlag};
pub use engine::{reduce, ReductionEngine, ReductionRequest, ReductionResult, ReductionStep};
pub use horizon::{convert_5yr, convert_lifetime};
pub use risk_model::{estimate_10y_risk, RiskEstimate, RiskModel};
pub use therapy::{project_ldl, LdlProjection, LdlTherapySelection, TherapySet};
