//! End-to-end assessment of one patient.
//!
//! Validates the profile, estimates baseline risk, projects LDL under the
//! therapy selection, gates injectables and composes the reductions for every
//! horizon. Clinical flags never block the result.

use chrono::{DateTime, Utc};
use cvd_common::{Horizon, PatientProfile, Result, Sex, SCHEMA_VERSION};
use cvd_config::ConfigSnapshot;
use cvd_math::round1;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ResolvedConfig;
use crate::engine::{ReductionRequest, ReductionResult};
use crate::risk_model::RiskEstimate;
use crate::therapy::{
    injectable_eligibility, new_injectables, project_ldl_with, InjectableEligibility,
    LdlProjection, LdlTherapySelection,
};

/// Condition worth surfacing next to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClinicalFlag {
    /// hs-CRP above 10 mg/L; the model is less reliable.
    AcuteInflammation { crp: f64 },
    /// Injectable selected while oral therapy already reaches the LDL threshold.
    IneligibleInjectable {
        drug: String,
        oral_ldl: f64,
        threshold: f64,
    },
    /// At or past age 85 the lifetime horizon is empty.
    BeyondLifetimeHorizon { age: u32 },
    /// 10-year risk hit the modeling ceiling.
    RiskSaturated { risk_10yr: f64 },
}

impl ClinicalFlag {
    pub fn message(&self) -> String {
        match self {
            ClinicalFlag::AcuteInflammation { crp } => format!(
                "hs-CRP {:.1} mg/L suggests acute inflammation; repeat the measurement when well",
                crp
            ),
            ClinicalFlag::IneligibleInjectable {
                drug,
                oral_ldl,
                threshold,
            } => format!(
                "{} is not indicated: LDL on oral therapy is {:.2} mmol/L (threshold {:.1})",
                drug, oral_ldl, threshold
            ),
            ClinicalFlag::BeyondLifetimeHorizon { age } => {
                format!("age {} is at or past 85; lifetime risk is 0 by definition", age)
            }
            ClinicalFlag::RiskSaturated { risk_10yr } => format!(
                "10-year risk reached the modeling ceiling of {:.1}%",
                risk_10yr
            ),
        }
    }
}

/// Patient details echoed back with the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProfileSummary {
    pub age: u32,
    pub sex: Sex,
    pub sbp: f64,
    pub sbp_target: f64,
    pub ldl: f64,
    pub vascular_beds: u8,
    /// Body-mass index (kg/m², one decimal) when weight and height are known.
    #[serde(default)]
    pub bmi: Option<f64>,
}

impl From<&PatientProfile> for ProfileSummary {
    fn from(profile: &PatientProfile) -> Self {
        Self {
            age: profile.age,
            sex: profile.sex,
            sbp: profile.sbp,
            sbp_target: profile.effective_sbp_target(),
            ldl: profile.ldl,
            vascular_beds: profile.vascular_count(),
            bmi: profile.bmi().map(round1),
        }
    }
}

/// Everything needed for one assessment.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    pub profile: PatientProfile,
    pub therapy: LdlTherapySelection,
    pub interventions: Vec<String>,
    pub horizon: Horizon,
}

/// Full assessment output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Assessment {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub config: ConfigSnapshot,
    pub profile: ProfileSummary,
    pub risk: RiskEstimate,
    pub ldl: LdlProjection,
    pub injectable: InjectableEligibility,
    /// Reduction for the requested horizon.
    pub reduction: ReductionResult,
    /// Reduction for every horizon, shortest first.
    pub by_horizon: Vec<ReductionResult>,
    pub flags: Vec<ClinicalFlag>,
}

impl Assessment {
    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Run the full pipeline for one patient.
pub fn assess(
    request: &AssessmentRequest,
    config: &ResolvedConfig,
    run_id: &str,
) -> Result<Assessment> {
    let profile = &request.profile;
    let policy = &config.policy;

    let risk = config.risk_model().estimate(profile)?;
    let ldl = project_ldl_with(profile.ldl, &request.therapy, policy.titration)?;
    let injectable = injectable_eligibility(
        profile.ldl,
        &request.therapy,
        policy.titration,
        policy.injectable_ldl_threshold,
    );

    let engine = config.engine();
    let reduce_for = |horizon: Horizon| {
        engine.reduce(&ReductionRequest {
            baseline_risk: risk.for_horizon(horizon),
            interventions: request.interventions.as_slice(),
            horizon,
            ldl_baseline: ldl.baseline,
            ldl_final: ldl.projected,
            sbp_current: profile.sbp,
            sbp_target: profile.effective_sbp_target(),
        })
    };
    let reduction = reduce_for(request.horizon)?;
    let by_horizon = Horizon::ALL
        .into_iter()
        .map(reduce_for)
        .collect::<Result<Vec<_>>>()?;

    let flags = collect_flags(request, &risk, &injectable);
    for flag in &flags {
        warn!(run_id, flag = %flag.message(), "clinical flag");
    }

    info!(
        run_id,
        horizon = %request.horizon,
        baseline = reduction.baseline_risk,
        final_risk = reduction.final_risk,
        flags = flags.len(),
        "assessment complete"
    );

    Ok(Assessment {
        schema_version: SCHEMA_VERSION.to_string(),
        run_id: run_id.to_string(),
        generated_at: Utc::now(),
        config: config.snapshot.clone(),
        profile: ProfileSummary::from(profile),
        risk,
        ldl,
        injectable,
        reduction,
        by_horizon,
        flags,
    })
}

fn collect_flags(
    request: &AssessmentRequest,
    risk: &RiskEstimate,
    injectable: &InjectableEligibility,
) -> Vec<ClinicalFlag> {
    let profile = &request.profile;
    let mut flags = Vec::new();

    if profile.has_acute_inflammation() {
        flags.push(ClinicalFlag::AcuteInflammation { crp: profile.crp });
    }

    if !injectable.eligible {
        for record in new_injectables(&request.therapy) {
            flags.push(ClinicalFlag::IneligibleInjectable {
                drug: record.name.to_string(),
                oral_ldl: injectable.oral_ldl,
                threshold: injectable.threshold,
            });
        }
    }

    if cvd_math::years_to_lifetime_horizon(profile.age) == 0 {
        flags.push(ClinicalFlag::BeyondLifetimeHorizon { age: profile.age });
    }

    if risk.is_saturated() {
        flags.push(ClinicalFlag::RiskSaturated {
            risk_10yr: risk.risk_10yr,
        });
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvd_common::VascularHistory;

    fn request(profile: PatientProfile, therapy: LdlTherapySelection) -> AssessmentRequest {
        AssessmentRequest {
            profile,
            therapy,
            interventions: vec!["Smoking cessation".to_string()],
            horizon: Horizon::TenYear,
        }
    }

    fn worked_example() -> PatientProfile {
        PatientProfile {
            age: 60,
            sbp: 145.0,
            sbp_target: Some(125.0),
            total_cholesterol: 5.0,
            hdl: 1.0,
            ldl: 3.5,
            egfr: 80.0,
            crp: 2.0,
            vascular: VascularHistory {
                coronary: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_assessment_pipeline() {
        let therapy =
            LdlTherapySelection::new(Vec::<String>::new(), ["Atorvastatin 80 mg"]).unwrap();
        let assessment = assess(
            &request(worked_example(), therapy),
            &ResolvedConfig::defaults(),
            "run-test",
        )
        .unwrap();

        assert_eq!(assessment.risk.risk_10yr, 33.5);
        assert!((assessment.ldl.projected - 1.75).abs() < 1e-12);
        assert_eq!(assessment.by_horizon.len(), 3);
        assert_eq!(assessment.reduction.horizon, Horizon::TenYear);
        assert_eq!(assessment.reduction.baseline_risk, 33.5);
        assert!(assessment.reduction.final_risk < 33.5);
        // Smoking cessation, LDL and BP all contribute.
        assert_eq!(assessment.reduction.steps.len(), 3);
        assert!(!assessment.has_flags());
        assert_eq!(assessment.run_id, "run-test");
    }

    #[test]
    fn test_ineligible_injectable_flagged() {
        let therapy = LdlTherapySelection::new(
            ["Rosuvastatin 20 mg"],
            ["Ezetimibe 10 mg", "PCSK9 inhibitor"],
        )
        .unwrap();
        let assessment = assess(
            &request(worked_example(), therapy),
            &ResolvedConfig::defaults(),
            "run-test",
        )
        .unwrap();

        assert!(!assessment.injectable.eligible);
        assert!(assessment.flags.iter().any(|f| matches!(
            f,
            ClinicalFlag::IneligibleInjectable { drug, .. } if drug == "PCSK9 inhibitor"
        )));
    }

    #[test]
    fn test_inflammation_and_age_flags() {
        let profile = PatientProfile {
            age: 86,
            crp: 12.0,
            ..worked_example()
        };
        let assessment = assess(
            &request(profile, LdlTherapySelection::none()),
            &ResolvedConfig::defaults(),
            "run-test",
        )
        .unwrap();

        assert!(assessment
            .flags
            .contains(&ClinicalFlag::AcuteInflammation { crp: 12.0 }));
        assert!(assessment
            .flags
            .contains(&ClinicalFlag::BeyondLifetimeHorizon { age: 86 }));
        assert_eq!(assessment.risk.risk_lifetime, 0.0);
    }

    #[test]
    fn test_half_weight_titration() {
        let mut config = ResolvedConfig::defaults();
        config.policy = config
            .policy
            .clone()
            .with_titration(cvd_config::TitrationPolicy::HalfWeight);
        let therapy =
            LdlTherapySelection::new(Vec::<String>::new(), ["Atorvastatin 80 mg"]).unwrap();
        let assessment = assess(&request(worked_example(), therapy), &config, "run-test").unwrap();

        assert!((assessment.ldl.projected - 2.625).abs() < 1e-12);
        // Less LDL lowering, less reduction.
        let full = assess(
            &request(
                worked_example(),
                LdlTherapySelection::new(Vec::<String>::new(), ["Atorvastatin 80 mg"]).unwrap(),
            ),
            &ResolvedConfig::defaults(),
            "run-test",
        )
        .unwrap();
        assert!(assessment.reduction.final_risk > full.reduction.final_risk);
    }

    #[test]
    fn test_bmi_in_summary() {
        let profile = PatientProfile {
            weight_kg: Some(75.0),
            height_cm: Some(170.0),
            ..worked_example()
        };
        let summary = ProfileSummary::from(&profile);
        assert_eq!(summary.bmi, Some(26.0));
        assert_eq!(summary.sbp_target, 125.0);
    }

    #[test]
    fn test_flag_serialization() {
        let flag = ClinicalFlag::RiskSaturated { risk_10yr: 95.0 };
        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["kind"], "risk_saturated");
        assert_eq!(json["risk_10yr"], 95.0);
    }
}
