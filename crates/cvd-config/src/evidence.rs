//! Trial evidence behind the therapy and intervention effects.

use schemars::JsonSchema;
use serde::Serialize;

/// Outcome trial or meta-analysis supporting a therapy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TrialReference {
    /// Drug or intervention name, matching the catalog keys.
    pub subject: &'static str,
    pub trial: &'static str,
    pub url: &'static str,
}

static TRIALS: [TrialReference; 8] = [
    TrialReference {
        subject: "Atorvastatin 80 mg",
        trial: "CTT meta-analysis",
        url: "https://pubmed.ncbi.nlm.nih.gov/20167315/",
    },
    TrialReference {
        subject: "Rosuvastatin 20 mg",
        trial: "CTT meta-analysis",
        url: "https://pubmed.ncbi.nlm.nih.gov/20167315/",
    },
    TrialReference {
        subject: "Ezetimibe 10 mg",
        trial: "IMPROVE-IT",
        url: "https://pubmed.ncbi.nlm.nih.gov/26405142/",
    },
    TrialReference {
        subject: "Bempedoic acid",
        trial: "CLEAR Outcomes",
        url: "https://pubmed.ncbi.nlm.nih.gov/35338941/",
    },
    TrialReference {
        subject: "PCSK9 inhibitor",
        trial: "FOURIER",
        url: "https://pubmed.ncbi.nlm.nih.gov/28436927/",
    },
    TrialReference {
        subject: "Inclisiran",
        trial: "ORION-10",
        url: "https://pubmed.ncbi.nlm.nih.gov/32302303/",
    },
    TrialReference {
        subject: "Icosapent ethyl",
        trial: "REDUCE-IT",
        url: "https://pubmed.ncbi.nlm.nih.gov/31141850/",
    },
    TrialReference {
        subject: "Semaglutide",
        trial: "STEP",
        url: "https://pubmed.ncbi.nlm.nih.gov/34499685/",
    },
];

/// All trial references.
pub fn trials() -> &'static [TrialReference] {
    &TRIALS
}

/// Evidence for a drug or intervention, if any is recorded.
pub fn evidence_for(subject: &str) -> Option<&'static TrialReference> {
    TRIALS.iter().find(|t| t.subject == subject)
}
