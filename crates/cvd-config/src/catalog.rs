//! Static reference tables: the intervention catalog and the LDL drug table.
//!
//! Both tables are compiled into the binary, shared process-wide and never
//! mutated. Lookups are by exact name; callers treat unknown names as no-ops.

use cvd_common::Horizon;
use schemars::JsonSchema;
use serde::Serialize;

/// A named intervention with a fixed absolute risk reduction per horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct InterventionRecord {
    pub name: &'static str,
    /// Absolute risk reduction over the lifetime horizon (percentage points).
    pub arr_lifetime: f64,
    /// Absolute risk reduction over five years (percentage points).
    pub arr_5yr: f64,
}

impl InterventionRecord {
    /// ARR applied for `horizon`.
    ///
    /// There is no separate 10-year column: the 10-year horizon reuses the
    /// lifetime values.
    pub fn arr_for(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::FiveYear => self.arr_5yr,
            Horizon::TenYear | Horizon::Lifetime => self.arr_lifetime,
        }
    }
}

/// Catalog in composition order.
///
/// The ARR figures are fixed planning values chosen for this tool. They are
/// not taken from a trial table; `evidence_for` links only the subjects that
/// have a trial reference.
static INTERVENTIONS: [InterventionRecord; 11] = [
    InterventionRecord {
        name: "Smoking cessation",
        arr_lifetime: 8.0,
        arr_5yr: 2.5,
    },
    InterventionRecord {
        name: "Mediterranean diet",
        arr_lifetime: 5.0,
        arr_5yr: 1.5,
    },
    InterventionRecord {
        name: "Regular physical activity",
        arr_lifetime: 4.0,
        arr_5yr: 1.2,
    },
    InterventionRecord {
        name: "Weight reduction",
        arr_lifetime: 3.0,
        arr_5yr: 0.9,
    },
    InterventionRecord {
        name: "Alcohol moderation",
        arr_lifetime: 2.0,
        arr_5yr: 0.6,
    },
    InterventionRecord {
        name: "Semaglutide",
        arr_lifetime: 4.5,
        arr_5yr: 1.5,
    },
    InterventionRecord {
        name: "SGLT2 inhibitor",
        arr_lifetime: 3.5,
        arr_5yr: 1.2,
    },
    InterventionRecord {
        name: "Icosapent ethyl",
        arr_lifetime: 5.0,
        arr_5yr: 1.6,
    },
    InterventionRecord {
        name: "Colchicine 0.5 mg",
        arr_lifetime: 4.0,
        arr_5yr: 1.3,
    },
    InterventionRecord {
        name: "Antiplatelet therapy",
        arr_lifetime: 3.0,
        arr_5yr: 1.0,
    },
    InterventionRecord {
        name: "Influenza vaccination",
        arr_lifetime: 2.5,
        arr_5yr: 1.0,
    },
];

/// Read-only view over the built-in intervention table.
#[derive(Debug, Clone, Copy)]
pub struct InterventionCatalog {
    records: &'static [InterventionRecord],
}

impl Default for InterventionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl InterventionCatalog {
    /// The built-in 11-entry catalog.
    pub fn builtin() -> Self {
        Self {
            records: &INTERVENTIONS,
        }
    }

    /// Records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &'static InterventionRecord> {
        self.records.iter()
    }

    pub fn get(&self, name: &str) -> Option<&'static InterventionRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.records.iter().map(|r| r.name).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Pharmacological class of an LDL-lowering drug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DrugClass {
    Statin,
    CholesterolAbsorptionInhibitor,
    AtpCitrateLyaseInhibitor,
    Pcsk9Antibody,
    Pcsk9SmallInterferingRna,
}

impl DrugClass {
    /// Injectable PCSK9-pathway therapies, gated on LDL reached with oral therapy.
    pub fn is_injectable(&self) -> bool {
        matches!(
            self,
            DrugClass::Pcsk9Antibody | DrugClass::Pcsk9SmallInterferingRna
        )
    }
}

/// Entry of the drug-efficacy table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct DrugRecord {
    pub name: &'static str,
    /// Expected LDL-C reduction (percent).
    pub ldl_reduction_pct: f64,
    pub class: DrugClass,
}

impl DrugRecord {
    /// Fractional LDL reduction in `[0, 1]`.
    pub fn efficacy(&self) -> f64 {
        self.ldl_reduction_pct / 100.0
    }
}

static DRUGS: [DrugRecord; 6] = [
    DrugRecord {
        name: "Atorvastatin 80 mg",
        ldl_reduction_pct: 50.0,
        class: DrugClass::Statin,
    },
    DrugRecord {
        name: "Rosuvastatin 20 mg",
        ldl_reduction_pct: 55.0,
        class: DrugClass::Statin,
    },
    DrugRecord {
        name: "Ezetimibe 10 mg",
        ldl_reduction_pct: 20.0,
        class: DrugClass::CholesterolAbsorptionInhibitor,
    },
    DrugRecord {
        name: "Bempedoic acid",
        ldl_reduction_pct: 18.0,
        class: DrugClass::AtpCitrateLyaseInhibitor,
    },
    DrugRecord {
        name: "PCSK9 inhibitor",
        ldl_reduction_pct: 60.0,
        class: DrugClass::Pcsk9Antibody,
    },
    DrugRecord {
        name: "Inclisiran",
        ldl_reduction_pct: 55.0,
        class: DrugClass::Pcsk9SmallInterferingRna,
    },
];

/// All drugs in table order.
pub fn drugs() -> &'static [DrugRecord] {
    &DRUGS
}

/// Look up a drug by exact name.
pub fn drug(name: &str) -> Option<&'static DrugRecord> {
    DRUGS.iter().find(|d| d.name == name)
}
