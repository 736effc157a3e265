//! Rendering of results as Markdown and one-line summaries.
//!
//! JSON output is plain `serde_json` over the result types; this module only
//! covers the human-facing formats.

use cvd_common::Horizon;
use cvd_config::{
    drugs, trials, DrugRecord, InterventionCatalog, InterventionRecord, TrialReference,
};
use serde::Serialize;

use crate::assess::Assessment;
use crate::engine::{ReductionResult, StepKind};
use crate::risk_model::RiskEstimate;
use crate::therapy::{InjectableEligibility, LdlProjection};

/// Percentage points, one decimal.
pub fn format_pp(value: f64) -> String {
    format!("{:.1} pp", value)
}

/// Percentage, one decimal.
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

fn format_mmol(value: f64) -> String {
    format!("{:.2} mmol/L", value)
}

/// Static reference tables as listed by `catalog`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub interventions: Vec<InterventionRecord>,
    pub drugs: Vec<DrugRecord>,
    pub evidence: Vec<TrialReference>,
}

impl CatalogListing {
    pub fn builtin() -> Self {
        Self {
            interventions: InterventionCatalog::builtin().iter().copied().collect(),
            drugs: drugs().to_vec(),
            evidence: trials().to_vec(),
        }
    }
}

pub fn risk_markdown(risk: &RiskEstimate) -> String {
    let mut lines = vec![
        "## Baseline risk".to_string(),
        String::new(),
        "| Horizon | Risk |".to_string(),
        "|---|---|".to_string(),
    ];
    for horizon in Horizon::ALL {
        lines.push(format!(
            "| {} | {} |",
            horizon.label(),
            format_pct(risk.for_horizon(horizon))
        ));
    }
    lines.push(String::new());
    lines.push(format!("Linear predictor: {:.4}", risk.linear_predictor));
    lines.join("\n")
}

pub fn risk_summary(risk: &RiskEstimate) -> String {
    format!(
        "risk 5yr={} 10yr={} lifetime={}",
        format_pct(risk.risk_5yr),
        format_pct(risk.risk_10yr),
        format_pct(risk.risk_lifetime)
    )
}

pub fn ldl_markdown(ldl: &LdlProjection, injectable: &InjectableEligibility) -> String {
    let mut lines = vec![
        "## LDL projection".to_string(),
        String::new(),
        format!(
            "{} → {} (Δ {}, titration {})",
            format_mmol(ldl.baseline),
            format_mmol(ldl.projected),
            format_mmol(ldl.delta),
            ldl.titration
        ),
    ];
    if !ldl.steps.is_empty() {
        lines.push(String::new());
        lines.push("| Drug | Set | Efficacy | LDL after |".to_string());
        lines.push("|---|---|---|---|".to_string());
        for step in &ldl.steps {
            lines.push(format!(
                "| {} | {} | {} | {:.2} |",
                step.drug,
                step.set,
                format_pct(step.efficacy * 100.0),
                step.ldl_after
            ));
        }
    }
    if !ldl.ignored.is_empty() {
        lines.push(String::new());
        lines.push(format!("Unknown drugs ignored: {}", ldl.ignored.join(", ")));
    }
    lines.push(String::new());
    lines.push(format!(
        "Injectables: {} (oral therapy reaches {}, threshold {:.1})",
        if injectable.eligible {
            "eligible"
        } else {
            "not indicated"
        },
        format_mmol(injectable.oral_ldl),
        injectable.threshold
    ));
    lines.join("\n")
}

pub fn ldl_summary(ldl: &LdlProjection, injectable: &InjectableEligibility) -> String {
    format!(
        "ldl {:.2} -> {:.2} mmol/L, injectables {}",
        ldl.baseline,
        ldl.projected,
        if injectable.eligible {
            "eligible"
        } else {
            "not indicated"
        }
    )
}

fn step_kind_label(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Intervention => "intervention",
        StepKind::Ldl => "LDL",
        StepKind::BloodPressure => "BP",
    }
}

pub fn reduction_markdown(result: &ReductionResult) -> String {
    let mut lines = vec![
        format!("## {} risk reduction", result.horizon.label()),
        String::new(),
        format!(
            "{} → {} (ARR {}, RRR {})",
            format_pct(result.baseline_risk),
            format_pct(result.final_risk),
            format_pp(result.arr),
            format_pct(result.rrr)
        ),
    ];
    if !result.steps.is_empty() {
        lines.push(String::new());
        lines.push("| Step | Kind | RRR | Remaining | Evidence |".to_string());
        lines.push("|---|---|---|---|---|".to_string());
        for step in &result.steps {
            let evidence = step
                .evidence
                .map(|e| format!("[{}]({})", e.trial, e.url))
                .unwrap_or_default();
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                step.label,
                step_kind_label(step.kind),
                format_pct(step.rrr),
                format_pct(step.remaining_risk),
                evidence
            ));
        }
    }
    if !result.ignored.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Unknown interventions ignored: {}",
            result.ignored.join(", ")
        ));
    }
    lines.join("\n")
}

pub fn reduction_summary(result: &ReductionResult) -> String {
    format!(
        "{} risk {} -> {} (ARR {}, RRR {})",
        result.horizon,
        format_pct(result.baseline_risk),
        format_pct(result.final_risk),
        format_pp(result.arr),
        format_pct(result.rrr)
    )
}

pub fn assessment_markdown(assessment: &Assessment) -> String {
    let profile = &assessment.profile;
    let mut sections = Vec::new();

    let mut header = vec![
        format!("# CVD risk assessment ({})", assessment.run_id),
        String::new(),
        format!(
            "{} y, {}, SBP {:.0} → {:.0} mmHg, LDL {}, vascular beds {}",
            profile.age,
            profile.sex,
            profile.sbp,
            profile.sbp_target,
            format_mmol(profile.ldl),
            profile.vascular_beds
        ),
    ];
    if let Some(bmi) = profile.bmi {
        header.push(format!("BMI {:.1} kg/m²", bmi));
    }
    sections.push(header.join("\n"));

    if !assessment.flags.is_empty() {
        let mut flags = vec!["## Flags".to_string(), String::new()];
        flags.extend(assessment.flags.iter().map(|f| format!("- {}", f.message())));
        sections.push(flags.join("\n"));
    }

    sections.push(risk_markdown(&assessment.risk));
    sections.push(ldl_markdown(&assessment.ldl, &assessment.injectable));
    sections.push(reduction_markdown(&assessment.reduction));

    let mut table = vec![
        "## All horizons".to_string(),
        String::new(),
        "| Horizon | Baseline | Final | ARR | RRR |".to_string(),
        "|---|---|---|---|---|".to_string(),
    ];
    for result in &assessment.by_horizon {
        table.push(format!(
            "| {} | {} | {} | {} | {} |",
            result.horizon.label(),
            format_pct(result.baseline_risk),
            format_pct(result.final_risk),
            format_pp(result.arr),
            format_pct(result.rrr)
        ));
    }
    sections.push(table.join("\n"));

    sections.push(format!(
        "_Config {} ({}, titration {})_",
        assessment.config.short_id(),
        assessment.config.summary.model,
        assessment.config.summary.titration
    ));

    sections.join("\n\n")
}

pub fn assessment_summary(assessment: &Assessment) -> String {
    let mut line = format!(
        "[{}] {}; ldl {:.2} mmol/L",
        assessment.run_id,
        reduction_summary(&assessment.reduction),
        assessment.ldl.projected
    );
    if assessment.has_flags() {
        line.push_str(&format!(", {} flag(s)", assessment.flags.len()));
    }
    line
}

pub fn catalog_markdown(listing: &CatalogListing) -> String {
    let mut lines = vec![
        "## Interventions".to_string(),
        String::new(),
        "| Name | ARR 5-yr | ARR lifetime |".to_string(),
        "|---|---|---|".to_string(),
    ];
    for record in &listing.interventions {
        lines.push(format!(
            "| {} | {} | {} |",
            record.name,
            format_pp(record.arr_5yr),
            format_pp(record.arr_lifetime)
        ));
    }
    lines.push(String::new());
    lines.push("## LDL drugs".to_string());
    lines.push(String::new());
    lines.push("| Drug | LDL reduction | Injectable |".to_string());
    lines.push("|---|---|---|".to_string());
    for record in &listing.drugs {
        lines.push(format!(
            "| {} | {} | {} |",
            record.name,
            format_pct(record.ldl_reduction_pct),
            if record.class.is_injectable() {
                "yes"
            } else {
                "no"
            }
        ));
    }
    lines.push(String::new());
    lines.push("## Evidence".to_string());
    lines.push(String::new());
    for reference in &listing.evidence {
        lines.push(format!(
            "- {}: [{}]({})",
            reference.subject, reference.trial, reference.url
        ));
    }
    lines.join("\n")
}

pub fn catalog_summary(listing: &CatalogListing) -> String {
    format!(
        "{} interventions, {} drugs, {} trial references",
        listing.interventions.len(),
        listing.drugs.len(),
        listing.evidence.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reduce;

    #[test]
    fn test_number_formats() {
        assert_eq!(format_pp(4.0), "4.0 pp");
        assert_eq!(format_pct(33.46), "33.5%");
        assert_eq!(format_pct(0.0), "0.0%");
    }

    #[test]
    fn test_reduction_rendering() {
        let result = reduce(20.0, &["Semaglutide"], Horizon::TenYear, 3.0, 3.0, 150.0, 120.0)
            .unwrap();
        let md = reduction_markdown(&result);
        assert!(md.starts_with("## 10-yr risk reduction"));
        assert!(md.contains("| Semaglutide | intervention |"));
        assert!(md.contains("| BP |"));

        let summary = reduction_summary(&result);
        assert!(summary.starts_with("10yr risk 20.0% -> "));
        assert!(!summary.contains('\n'));
    }

    #[test]
    fn test_catalog_listing() {
        let listing = CatalogListing::builtin();
        assert_eq!(listing.interventions.len(), 11);
        assert_eq!(listing.drugs.len(), 6);
        let md = catalog_markdown(&listing);
        assert!(md.contains("| PCSK9 inhibitor | 60.0% | yes |"));
        assert_eq!(
            catalog_summary(&listing),
            "11 interventions, 6 drugs, 8 trial references"
        );
    }

    #[test]
    fn test_risk_rendering() {
        let risk = RiskEstimate {
            risk_5yr: 18.5,
            risk_10yr: 33.5,
            risk_lifetime: 63.9,
            linear_predictor: 7.15465,
        };
        assert_eq!(
            risk_summary(&risk),
            "risk 5yr=18.5% 10yr=33.5% lifetime=63.9%"
        );
        assert!(risk_markdown(&risk).contains("| Lifetime | 63.9% |"));
    }
}
