//! Risk reduction engine.
//!
//! Relative reductions compose multiplicatively on the remaining risk, in a
//! fixed order:
//!
//! 1. Selected catalog interventions, in catalog order
//! 2. LDL lowering: `min(22 × ΔLDL, 35)` percent
//! 3. Blood pressure lowering: `min(15 × ΔSBP / 10, 20)` percent
//!
//! Walking the catalog rather than the caller's list makes the result
//! independent of selection order and applies a repeated name once.

use cvd_common::{Horizon, InputBounds, Result};
use cvd_config::{evidence_for, InterventionCatalog, ReductionPolicy, TrialReference};
use cvd_math::{capped_linear_rrr, prob_to_percent, round1, ReductionChain};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of reduction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Intervention,
    Ldl,
    BloodPressure,
}

/// One applied reduction and the risk left after it.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ReductionStep {
    pub kind: StepKind,
    pub label: String,
    /// Relative reduction applied (percent).
    pub rrr: f64,
    /// Risk remaining after this step (percent, unrounded).
    pub remaining_risk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<TrialReference>,
}

/// Outcome of a reduction for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ReductionResult {
    pub horizon: Horizon,
    pub baseline_risk: f64,
    pub final_risk: f64,
    /// Absolute risk reduction (percentage points).
    pub arr: f64,
    /// Relative risk reduction (percent); 0 for a zero baseline.
    pub rrr: f64,
    pub steps: Vec<ReductionStep>,
    /// Selected names absent from the catalog.
    pub ignored: Vec<String>,
}

/// Inputs for one reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionRequest<'a, S: AsRef<str>> {
    /// Baseline risk for `horizon` (percent).
    pub baseline_risk: f64,
    pub interventions: &'a [S],
    pub horizon: Horizon,
    pub ldl_baseline: f64,
    pub ldl_final: f64,
    pub sbp_current: f64,
    pub sbp_target: f64,
}

/// Engine bound to a catalog and a reduction policy.
#[derive(Debug, Clone, Default)]
pub struct ReductionEngine {
    catalog: InterventionCatalog,
    policy: ReductionPolicy,
}

impl ReductionEngine {
    pub fn new(catalog: InterventionCatalog, policy: ReductionPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &InterventionCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &ReductionPolicy {
        &self.policy
    }

    /// LDL relative reduction (percent) for a drop from `baseline` to `final_ldl`.
    pub fn ldl_rrr(&self, baseline: f64, final_ldl: f64) -> f64 {
        capped_linear_rrr(
            baseline - final_ldl,
            self.policy.ldl_rrr_per_mmol,
            self.policy.ldl_rrr_cap,
        )
    }

    /// Blood pressure relative reduction (percent) for a drop from `current` to `target`.
    pub fn bp_rrr(&self, current: f64, target: f64) -> f64 {
        capped_linear_rrr(
            (current - target) / 10.0,
            self.policy.bp_rrr_per_10_mmhg,
            self.policy.bp_rrr_cap,
        )
    }

    fn validate<S: AsRef<str>>(&self, request: &ReductionRequest<'_, S>) -> Result<()> {
        let bounds: InputBounds = self.policy.input_bounds();
        bounds
            .risk_percent
            .check("baseline_risk", request.baseline_risk)?;
        bounds.ldl.check("ldl_baseline", request.ldl_baseline)?;
        bounds.ldl.check("ldl_final", request.ldl_final)?;
        bounds.sbp.check("sbp_current", request.sbp_current)?;
        bounds.sbp.check("sbp_target", request.sbp_target)?;
        Ok(())
    }

    pub fn reduce<S: AsRef<str>>(&self, request: &ReductionRequest<'_, S>) -> Result<ReductionResult> {
        self.validate(request)?;

        let selected: Vec<&str> = request.interventions.iter().map(AsRef::as_ref).collect();
        let mut ignored: Vec<String> = selected
            .iter()
            .filter(|name| !self.catalog.contains(name))
            .map(|name| name.to_string())
            .collect();
        ignored.sort();
        ignored.dedup();
        for name in &ignored {
            debug!(intervention = %name, "unknown intervention ignored");
        }

        let mut chain = ReductionChain::new(request.baseline_risk / 100.0);
        let mut steps = Vec::new();

        for record in self.catalog.iter() {
            if !selected.contains(&record.name) {
                continue;
            }
            let rrr = record.arr_for(request.horizon);
            let remaining = chain.apply(rrr);
            steps.push(ReductionStep {
                kind: StepKind::Intervention,
                label: record.name.to_string(),
                rrr,
                remaining_risk: prob_to_percent(remaining),
                evidence: evidence_for(record.name).copied(),
            });
        }

        let ldl_rrr = self.ldl_rrr(request.ldl_baseline, request.ldl_final);
        if ldl_rrr > 0.0 {
            let remaining = chain.apply(ldl_rrr);
            steps.push(ReductionStep {
                kind: StepKind::Ldl,
                label: format!(
                    "LDL {:.2} → {:.2} mmol/L",
                    request.ldl_baseline, request.ldl_final
                ),
                rrr: ldl_rrr,
                remaining_risk: prob_to_percent(remaining),
                evidence: None,
            });
        }

        let bp_rrr = self.bp_rrr(request.sbp_current, request.sbp_target);
        if bp_rrr > 0.0 {
            let remaining = chain.apply(bp_rrr);
            steps.push(ReductionStep {
                kind: StepKind::BloodPressure,
                label: format!(
                    "SBP {:.0} → {:.0} mmHg",
                    request.sbp_current, request.sbp_target
                ),
                rrr: bp_rrr,
                remaining_risk: prob_to_percent(remaining),
                evidence: None,
            });
        }

        let baseline_risk = request.baseline_risk;
        let final_risk = round1(prob_to_percent(chain.remaining()));
        let arr = round1(baseline_risk - final_risk);
        let rrr = if baseline_risk > 0.0 {
            round1(arr / baseline_risk * 100.0)
        } else {
            0.0
        };

        debug!(
            horizon = %request.horizon,
            baseline_risk,
            final_risk,
            arr,
            rrr,
            steps = steps.len(),
            "risk reduction composed"
        );

        Ok(ReductionResult {
            horizon: request.horizon,
            baseline_risk,
            final_risk,
            arr,
            rrr,
            steps,
            ignored,
        })
    }
}

/// Reduce `baseline_risk` under the built-in catalog and default policy.
pub fn reduce<S: AsRef<str>>(
    baseline_risk: f64,
    interventions: &[S],
    horizon: Horizon,
    ldl_baseline: f64,
    ldl_final: f64,
    sbp_current: f64,
    sbp_target: f64,
) -> Result<ReductionResult> {
    ReductionEngine::default().reduce(&ReductionRequest {
        baseline_risk,
        interventions,
        horizon,
        ldl_baseline,
        ldl_final,
        sbp_current,
        sbp_target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvd_common::Error;

    const NONE: &[&str] = &[];

    #[test]
    fn test_blood_pressure_example() {
        let result = reduce(20.0, NONE, Horizon::TenYear, 3.0, 3.0, 150.0, 120.0).unwrap();
        assert_eq!(result.final_risk, 16.0);
        assert_eq!(result.arr, 4.0);
        assert_eq!(result.rrr, 20.0);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].kind, StepKind::BloodPressure);
        assert_eq!(result.steps[0].rrr, 20.0);
    }

    #[test]
    fn test_ldl_reduction_capped() {
        // 22 × 2.0 = 44 → capped at 35.
        let result = reduce(40.0, NONE, Horizon::TenYear, 3.5, 1.5, 130.0, 130.0).unwrap();
        assert_eq!(result.final_risk, 26.0);
        assert_eq!(result.steps[0].rrr, 35.0);
    }

    #[test]
    fn test_no_reduction_keeps_baseline() {
        let result = reduce(12.3, NONE, Horizon::FiveYear, 3.0, 3.0, 140.0, 140.0).unwrap();
        assert_eq!(result.final_risk, 12.3);
        assert_eq!(result.arr, 0.0);
        assert_eq!(result.rrr, 0.0);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_negative_deltas_never_increase_risk() {
        let result = reduce(25.0, NONE, Horizon::TenYear, 2.0, 3.0, 120.0, 150.0).unwrap();
        assert_eq!(result.final_risk, 25.0);
    }

    #[test]
    fn test_zero_baseline_has_zero_rrr() {
        let result = reduce(
            0.0,
            &["Smoking cessation"],
            Horizon::Lifetime,
            3.0,
            1.5,
            150.0,
            120.0,
        )
        .unwrap();
        assert_eq!(result.final_risk, 0.0);
        assert_eq!(result.rrr, 0.0);
    }

    #[test]
    fn test_horizon_selects_catalog_column() {
        let five = reduce(40.0, &["Smoking cessation"], Horizon::FiveYear, 3.0, 3.0, 140.0, 140.0)
            .unwrap();
        let ten = reduce(40.0, &["Smoking cessation"], Horizon::TenYear, 3.0, 3.0, 140.0, 140.0)
            .unwrap();
        // 40 × (1 - 0.025) and 40 × (1 - 0.08).
        assert_eq!(five.final_risk, 39.0);
        assert_eq!(ten.final_risk, 36.8);
        assert_eq!(
            ten.steps[0].evidence, None,
            "smoking cessation carries no trial reference"
        );
    }

    #[test]
    fn test_order_and_duplicates_do_not_matter() {
        let a = reduce(
            30.0,
            &["Mediterranean diet", "Semaglutide", "Mediterranean diet"],
            Horizon::Lifetime,
            3.0,
            2.0,
            150.0,
            130.0,
        )
        .unwrap();
        let b = reduce(
            30.0,
            &["Semaglutide", "Mediterranean diet"],
            Horizon::Lifetime,
            3.0,
            2.0,
            150.0,
            130.0,
        )
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.steps[0].label, "Mediterranean diet");
        assert!(a.steps[1].evidence.is_some());
    }

    #[test]
    fn test_unknown_intervention_ignored() {
        let result = reduce(
            30.0,
            &["Homeopathy", "Homeopathy"],
            Horizon::TenYear,
            3.0,
            3.0,
            140.0,
            140.0,
        )
        .unwrap();
        assert_eq!(result.final_risk, 30.0);
        assert_eq!(result.ignored, vec!["Homeopathy".to_string()]);
    }

    #[test]
    fn test_invalid_baseline_risk() {
        let err = reduce(120.0, NONE, Horizon::TenYear, 3.0, 3.0, 140.0, 140.0).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                field: "baseline_risk",
                ..
            }
        ));
    }

    #[test]
    fn test_policy_switches_effect_sizes() {
        let policy = ReductionPolicy {
            bp_rrr_cap: 30.0,
            ..Default::default()
        };
        let engine = ReductionEngine::new(InterventionCatalog::builtin(), policy);
        assert_eq!(engine.bp_rrr(150.0, 120.0), 30.0);
        assert_eq!(ReductionEngine::default().bp_rrr(150.0, 120.0), 20.0);
    }
}
