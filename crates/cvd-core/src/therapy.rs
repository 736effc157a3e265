//! LDL projection under lipid-lowering therapy.
//!
//! Drugs stack multiplicatively: starting from the baseline LDL, each drug
//! leaves `1 - efficacy` of the current value. Pre-existing drugs apply first,
//! then newly added ones, each set in list order. The projection never drops
//! below [`LDL_FLOOR`].

use cvd_common::{Error, InputBounds, Result};
use cvd_config::{drug, DrugRecord, TitrationPolicy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lowest LDL (mmol/L) a projection may reach.
pub const LDL_FLOOR: f64 = 0.5;

/// Which therapy set a drug belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TherapySet {
    /// Drugs the patient already takes.
    PreExisting,
    /// Drugs being added or intensified.
    New,
}

impl TherapySet {
    pub fn as_str(&self) -> &'static str {
        match self {
            TherapySet::PreExisting => "pre-existing",
            TherapySet::New => "new",
        }
    }
}

impl std::fmt::Display for TherapySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated pair of disjoint drug lists.
///
/// Construction rejects a drug present in both sets, a drug repeated within
/// one set, and two statins within one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LdlTherapySelection {
    pre_existing: Vec<String>,
    new: Vec<String>,
}

impl LdlTherapySelection {
    pub fn new<P, N>(pre_existing: P, new: N) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let pre_existing: Vec<String> = pre_existing.into_iter().map(Into::into).collect();
        let new: Vec<String> = new.into_iter().map(Into::into).collect();

        check_set(&pre_existing, TherapySet::PreExisting)?;
        check_set(&new, TherapySet::New)?;

        if let Some(shared) = pre_existing.iter().find(|d| new.contains(*d)) {
            return Err(Error::TherapyConflict {
                drug: shared.clone(),
            });
        }

        Ok(Self { pre_existing, new })
    }

    /// Selection with no drugs.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn pre_existing(&self) -> &[String] {
        &self.pre_existing
    }

    pub fn new_drugs(&self) -> &[String] {
        &self.new
    }

    pub fn is_empty(&self) -> bool {
        self.pre_existing.is_empty() && self.new.is_empty()
    }

    /// Every drug in application order, tagged with its set.
    pub fn iter(&self) -> impl Iterator<Item = (TherapySet, &str)> {
        self.pre_existing
            .iter()
            .map(|d| (TherapySet::PreExisting, d.as_str()))
            .chain(self.new.iter().map(|d| (TherapySet::New, d.as_str())))
    }
}

fn check_set(drugs: &[String], set: TherapySet) -> Result<()> {
    for (i, name) in drugs.iter().enumerate() {
        if drugs[..i].contains(name) {
            return Err(Error::DuplicateTherapy {
                drug: name.clone(),
                set: set.as_str(),
            });
        }
    }

    let mut statins = drugs
        .iter()
        .filter(|name| drug(name).is_some_and(|d| d.class == cvd_config::DrugClass::Statin));
    if let (Some(first), Some(second)) = (statins.next(), statins.next()) {
        return Err(Error::MultipleStatins {
            set: set.as_str(),
            first: first.clone(),
            second: second.clone(),
        });
    }

    Ok(())
}

/// One drug's effect on the running LDL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LdlStep {
    pub drug: String,
    pub set: TherapySet,
    /// Fraction removed by this drug after titration weighting.
    pub efficacy: f64,
    /// LDL after this drug, before flooring (mmol/L).
    pub ldl_after: f64,
}

/// Projected LDL and how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LdlProjection {
    pub baseline: f64,
    /// Projected LDL, floored at 0.5 mmol/L.
    pub projected: f64,
    /// `baseline - projected`, never negative.
    pub delta: f64,
    pub titration: TitrationPolicy,
    pub steps: Vec<LdlStep>,
    /// Drug names absent from the efficacy table.
    #[serde(default)]
    pub ignored: Vec<String>,
}

fn weight_for(set: TherapySet, titration: TitrationPolicy) -> f64 {
    match set {
        TherapySet::PreExisting => 1.0,
        TherapySet::New => titration.new_drug_weight(),
    }
}

fn run_projection<'a>(
    baseline: f64,
    drugs: impl Iterator<Item = (TherapySet, &'a str)>,
    titration: TitrationPolicy,
    include: impl Fn(&DrugRecord) -> bool,
) -> LdlProjection {
    let mut ldl = baseline;
    let mut steps = Vec::new();
    let mut ignored = Vec::new();

    for (set, name) in drugs {
        let Some(record) = drug(name) else {
            debug!(drug = name, "unknown drug ignored");
            ignored.push(name.to_string());
            continue;
        };
        if !include(record) {
            continue;
        }
        let efficacy = record.efficacy() * weight_for(set, titration);
        ldl *= 1.0 - efficacy;
        steps.push(LdlStep {
            drug: record.name.to_string(),
            set,
            efficacy,
            ldl_after: ldl,
        });
    }

    let projected = ldl.max(LDL_FLOOR);
    LdlProjection {
        baseline,
        projected,
        delta: (baseline - projected).max(0.0),
        titration,
        steps,
        ignored,
    }
}

/// Project LDL for a validated selection under `titration`.
pub fn project_ldl_with(
    baseline_ldl: f64,
    selection: &LdlTherapySelection,
    titration: TitrationPolicy,
) -> Result<LdlProjection> {
    InputBounds::default().ldl.check("ldl", baseline_ldl)?;
    let projection = run_projection(baseline_ldl, selection.iter(), titration, |_| true);
    debug!(
        baseline = baseline_ldl,
        projected = projection.projected,
        %titration,
        "LDL projected"
    );
    Ok(projection)
}

/// Projected LDL (mmol/L) with every drug at full efficacy.
///
/// The two lists must be disjoint; unknown drug names are ignored.
pub fn project_ldl<S: AsRef<str>>(baseline_ldl: f64, pre_existing: &[S], new: &[S]) -> Result<f64> {
    let selection = LdlTherapySelection::new(
        pre_existing.iter().map(|d| d.as_ref().to_string()),
        new.iter().map(|d| d.as_ref().to_string()),
    )?;
    Ok(project_ldl_with(baseline_ldl, &selection, TitrationPolicy::Full)?.projected)
}

/// Whether injectable PCSK9-pathway therapy is indicated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InjectableEligibility {
    /// LDL reached with every selected oral drug (mmol/L).
    pub oral_ldl: f64,
    pub threshold: f64,
    pub eligible: bool,
}

/// Gate injectables on the LDL reached with every selected non-injectable drug.
///
/// Eligible only while that projection stays above `threshold`.
pub fn injectable_eligibility(
    baseline_ldl: f64,
    selection: &LdlTherapySelection,
    titration: TitrationPolicy,
    threshold: f64,
) -> InjectableEligibility {
    let oral = run_projection(baseline_ldl, selection.iter(), titration, |d| {
        !d.class.is_injectable()
    });
    InjectableEligibility {
        oral_ldl: oral.projected,
        threshold,
        eligible: oral.projected > threshold,
    }
}

/// Newly added injectables in `selection`.
pub fn new_injectables(selection: &LdlTherapySelection) -> Vec<&'static DrugRecord> {
    selection
        .new_drugs()
        .iter()
        .filter_map(|name| drug(name))
        .filter(|d| d.class.is_injectable())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATORVA: &str = "Atorvastatin 80 mg";
    const ROSUVA: &str = "Rosuvastatin 20 mg";
    const EZE: &str = "Ezetimibe 10 mg";

    #[test]
    fn test_single_statin_full_efficacy() {
        let ldl = project_ldl(3.5, &[] as &[&str], &[ATORVA]).unwrap();
        assert!((ldl - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_half_weight_titration() {
        let selection = LdlTherapySelection::new(Vec::<String>::new(), [ATORVA]).unwrap();
        let projection = project_ldl_with(3.5, &selection, TitrationPolicy::HalfWeight).unwrap();
        assert!((projection.projected - 2.625).abs() < 1e-12);
        assert_eq!(projection.titration, TitrationPolicy::HalfWeight);
    }

    #[test]
    fn test_half_weight_leaves_pre_existing_at_full() {
        let selection = LdlTherapySelection::new([ATORVA], Vec::<String>::new()).unwrap();
        let projection = project_ldl_with(3.5, &selection, TitrationPolicy::HalfWeight).unwrap();
        assert!((projection.projected - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_stacking_is_multiplicative() {
        let ldl = project_ldl(4.0, &[ATORVA], &[EZE]).unwrap();
        assert!((ldl - 4.0 * 0.5 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_floor() {
        let ldl = project_ldl(2.0, &[ROSUVA], &["PCSK9 inhibitor", "Ezetimibe 10 mg"]).unwrap();
        assert_eq!(ldl, LDL_FLOOR);
    }

    #[test]
    fn test_unknown_drug_ignored() {
        let selection = LdlTherapySelection::new(["Niacin"], [EZE]).unwrap();
        let projection = project_ldl_with(3.0, &selection, TitrationPolicy::Full).unwrap();
        assert_eq!(projection.ignored, vec!["Niacin".to_string()]);
        assert_eq!(projection.steps.len(), 1);
        assert!((projection.projected - 2.4).abs() < 1e-12);
    }

    #[test]
    fn test_no_drugs_keeps_baseline() {
        let projection =
            project_ldl_with(3.0, &LdlTherapySelection::none(), TitrationPolicy::Full).unwrap();
        assert_eq!(projection.projected, 3.0);
        assert_eq!(projection.delta, 0.0);
    }

    #[test]
    fn test_conflict_between_sets() {
        let err = LdlTherapySelection::new([EZE], [EZE]).unwrap_err();
        assert!(matches!(err, Error::TherapyConflict { .. }));
    }

    #[test]
    fn test_duplicate_in_set() {
        let err = LdlTherapySelection::new(Vec::<String>::new(), [EZE, EZE]).unwrap_err();
        assert!(matches!(err, Error::DuplicateTherapy { set: "new", .. }));
    }

    #[test]
    fn test_one_statin_per_set() {
        let err = LdlTherapySelection::new([ATORVA, ROSUVA], Vec::<String>::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MultipleStatins {
                set: "pre-existing",
                ..
            }
        ));
        // Switching statins across sets is allowed.
        assert!(LdlTherapySelection::new([ATORVA], [ROSUVA]).is_ok());
    }

    #[test]
    fn test_baseline_out_of_range() {
        assert!(project_ldl(7.5, &[] as &[&str], &[ATORVA]).is_err());
    }

    #[test]
    fn test_injectable_gate() {
        // 2.5 * 0.5 = 1.25 on oral therapy: at or below 1.8, not indicated.
        let selection = LdlTherapySelection::new([ATORVA], ["Inclisiran"]).unwrap();
        let gate = injectable_eligibility(2.5, &selection, TitrationPolicy::Full, 1.8);
        assert!((gate.oral_ldl - 1.25).abs() < 1e-12);
        assert!(!gate.eligible);

        // 5.0 * 0.5 = 2.5 stays above the threshold.
        let gate = injectable_eligibility(5.0, &selection, TitrationPolicy::Full, 1.8);
        assert!(gate.eligible);
        assert_eq!(new_injectables(&selection).len(), 1);
    }

    #[test]
    fn test_injectable_gate_counts_both_sets() {
        // Ezetimibe already taken, statin newly added: 3.0 * 0.8 * 0.5 = 1.2.
        let selection =
            LdlTherapySelection::new(["Ezetimibe 10 mg"], [ATORVA, "PCSK9 inhibitor"]).unwrap();
        let gate = injectable_eligibility(3.0, &selection, TitrationPolicy::Full, 1.8);
        assert!((gate.oral_ldl - 1.2).abs() < 1e-12);
        assert!(!gate.eligible);

        // Neither set alone reaches the threshold.
        let pre_only = LdlTherapySelection::new(["Ezetimibe 10 mg"], ["PCSK9 inhibitor"]).unwrap();
        assert!(injectable_eligibility(3.0, &pre_only, TitrationPolicy::Full, 1.8).eligible);
        let new_only = LdlTherapySelection::new(Vec::<String>::new(), [ATORVA]).unwrap();
        assert!(injectable_eligibility(4.0, &new_only, TitrationPolicy::Full, 1.8).eligible);
    }
}
