//! CVD risk core - estimation and risk-reduction CLI
//!
//! The main entry point for cvd-core, handling:
//! - Baseline risk estimation from a patient profile
//! - LDL projection under lipid-lowering therapy
//! - Composition of risk reductions for a treatment plan
//! - Full assessments with clinical flags
//! - Configuration checks and schema export

use clap::{Args, Parser, Subcommand};
use cvd_common::{Horizon, OutputFormat, PatientProfile, Sex, SCHEMA_VERSION};
use cvd_core::assess::{assess, AssessmentRequest};
use cvd_core::config::{load_config, ConfigError, ConfigOptions, ResolvedConfig};
use cvd_core::engine::ReductionRequest;
use cvd_core::exit_codes::ExitCode;
use cvd_core::logging::{event_names, generate_run_id, init_logging, LogConfig, LogLevel};
use cvd_core::output::{self, CatalogListing};
use cvd_core::schema::{
    available_schemas, format_schema, generate_all_schemas, generate_schema, SchemaFormat,
};
use cvd_core::therapy::{
    injectable_eligibility, new_injectables, project_ldl_with, LdlTherapySelection,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error};

/// CVD risk core - cardiovascular risk estimation and risk-reduction planning
#[derive(Parser)]
#[command(name = "cvd-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory searched for coefficients.json and policy.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to a coefficients.json file
    #[arg(long, global = true)]
    coefficients: Option<PathBuf>,

    /// Path to a policy.json file
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate baseline risk over every horizon
    Risk(RiskArgs),

    /// Project LDL under lipid-lowering therapy
    Ldl(LdlArgs),

    /// Compose risk reductions for a baseline risk
    Reduce(ReduceArgs),

    /// Full assessment: risk, LDL, reductions and clinical flags
    Assess(AssessArgs),

    /// List interventions, drugs and trial evidence
    Catalog,

    /// Validate configuration
    Check,

    /// Print JSON Schema for input and output types
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Patient covariates, from a JSON file, flags, or both (flags win).
#[derive(Args, Debug)]
struct ProfileArgs {
    /// Patient profile JSON file
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Age in years (30-90)
    #[arg(long, required_unless_present = "profile")]
    age: Option<u32>,

    /// Sex (male/female)
    #[arg(long, required_unless_present = "profile")]
    sex: Option<Sex>,

    /// Systolic blood pressure (mmHg)
    #[arg(long, required_unless_present = "profile")]
    sbp: Option<f64>,

    /// Target systolic blood pressure (mmHg)
    #[arg(long)]
    sbp_target: Option<f64>,

    /// Total cholesterol (mmol/L)
    #[arg(long, required_unless_present = "profile")]
    total_cholesterol: Option<f64>,

    /// HDL-C (mmol/L)
    #[arg(long, required_unless_present = "profile")]
    hdl: Option<f64>,

    /// LDL-C (mmol/L)
    #[arg(long, required_unless_present = "profile")]
    ldl: Option<f64>,

    /// Triglycerides (mmol/L)
    #[arg(long, required_unless_present = "profile")]
    triglycerides: Option<f64>,

    /// HbA1c (%)
    #[arg(long, required_unless_present = "profile")]
    hba1c: Option<f64>,

    /// eGFR (mL/min/1.73m²)
    #[arg(long, required_unless_present = "profile")]
    egfr: Option<f64>,

    /// hs-CRP (mg/L)
    #[arg(long, required_unless_present = "profile")]
    crp: Option<f64>,

    /// Current smoker
    #[arg(long)]
    smoker: bool,

    /// Diabetes
    #[arg(long)]
    diabetes: bool,

    /// Established coronary artery disease
    #[arg(long)]
    coronary: bool,

    /// Established cerebrovascular disease
    #[arg(long)]
    cerebrovascular: bool,

    /// Established peripheral artery disease
    #[arg(long)]
    peripheral: bool,

    /// Weight (kg)
    #[arg(long)]
    weight: Option<f64>,

    /// Height (cm)
    #[arg(long)]
    height: Option<f64>,
}

impl ProfileArgs {
    fn build(&self) -> Result<PatientProfile, CommandError> {
        let mut profile = match &self.profile {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str(&raw).map_err(|e| {
                    cvd_common::Error::InvalidProfile(format!("{}: {}", path.display(), e))
                })?
            }
            None => PatientProfile::default(),
        };

        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(sex) = self.sex {
            profile.sex = sex;
        }
        if let Some(sbp) = self.sbp {
            profile.sbp = sbp;
        }
        if self.sbp_target.is_some() {
            profile.sbp_target = self.sbp_target;
        }
        if let Some(value) = self.total_cholesterol {
            profile.total_cholesterol = value;
        }
        if let Some(value) = self.hdl {
            profile.hdl = value;
        }
        if let Some(value) = self.ldl {
            profile.ldl = value;
        }
        if let Some(value) = self.triglycerides {
            profile.triglycerides = value;
        }
        if let Some(value) = self.hba1c {
            profile.hba1c = value;
        }
        if let Some(value) = self.egfr {
            profile.egfr = value;
        }
        if let Some(value) = self.crp {
            profile.crp = value;
        }
        profile.smoker |= self.smoker;
        profile.diabetes |= self.diabetes;
        profile.vascular.coronary |= self.coronary;
        profile.vascular.cerebrovascular |= self.cerebrovascular;
        profile.vascular.peripheral |= self.peripheral;
        if self.weight.is_some() {
            profile.weight_kg = self.weight;
        }
        if self.height.is_some() {
            profile.height_cm = self.height;
        }

        Ok(profile)
    }
}

#[derive(Args, Debug)]
struct TherapyArgs {
    /// Drug the patient already takes (repeatable)
    #[arg(long = "pre", value_name = "DRUG")]
    pre_existing: Vec<String>,

    /// Drug being added (repeatable)
    #[arg(long = "add", value_name = "DRUG")]
    added: Vec<String>,
}

impl TherapyArgs {
    fn selection(&self) -> Result<LdlTherapySelection, CommandError> {
        Ok(LdlTherapySelection::new(
            self.pre_existing.iter().cloned(),
            self.added.iter().cloned(),
        )?)
    }
}

#[derive(Args, Debug)]
struct RiskArgs {
    #[command(flatten)]
    profile: ProfileArgs,
}

#[derive(Args, Debug)]
struct LdlArgs {
    /// Baseline LDL-C (mmol/L)
    #[arg(long)]
    baseline: f64,

    #[command(flatten)]
    therapy: TherapyArgs,
}

#[derive(Args, Debug)]
struct ReduceArgs {
    /// Baseline risk for the chosen horizon (percent)
    #[arg(long)]
    baseline_risk: f64,

    /// Catalog intervention (repeatable)
    #[arg(long = "intervention", value_name = "NAME")]
    interventions: Vec<String>,

    #[arg(long, default_value = "10yr")]
    horizon: Horizon,

    /// LDL-C before treatment (mmol/L)
    #[arg(long)]
    ldl_baseline: f64,

    /// LDL-C after treatment (mmol/L); defaults to the baseline
    #[arg(long)]
    ldl_final: Option<f64>,

    /// Current systolic blood pressure (mmHg)
    #[arg(long)]
    sbp_current: f64,

    /// Target systolic blood pressure (mmHg); defaults to the current value
    #[arg(long)]
    sbp_target: Option<f64>,
}

#[derive(Args, Debug)]
struct AssessArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    #[command(flatten)]
    therapy: TherapyArgs,

    /// Catalog intervention (repeatable)
    #[arg(long = "intervention", value_name = "NAME")]
    interventions: Vec<String>,

    #[arg(long, default_value = "10yr")]
    horizon: Horizon,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name to print
    type_name: Option<String>,

    /// List available type names
    #[arg(long, conflicts_with_all = ["type_name", "all"])]
    list: bool,

    /// Print every schema
    #[arg(long, conflicts_with = "type_name")]
    all: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Core(#[from] cvd_common::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Args(String),
}

impl CommandError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CommandError::Core(err) => ExitCode::from(err),
            CommandError::Config(err) => ExitCode::from(err),
            CommandError::Args(_) => ExitCode::ArgsError,
        }
    }

    fn code(&self) -> u32 {
        match self {
            CommandError::Core(err) => err.code(),
            CommandError::Config(err) => err.code(),
            CommandError::Args(_) => 1,
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            CommandError::Core(err) => Some(err.hint()),
            CommandError::Config(_) => Some("Run 'cvd-core check' to validate configuration"),
            CommandError::Args(_) => None,
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::Core(err.into())
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        CommandError::Core(err.into())
    }
}

type CommandResult = Result<ExitCode, CommandError>;

// ============================================================================
// Entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = (cli.global.quiet || cli.global.verbose > 0)
        .then(|| LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet));
    init_logging(&LogConfig::from_env(cli_level, None));

    let run_id = generate_run_id();
    debug!(run_id = %run_id, event = event_names::RUN_STARTED, "cvd-core started");

    let global = &cli.global;
    let result = match &cli.command {
        Commands::Risk(args) => run_risk(global, args),
        Commands::Ldl(args) => run_ldl(global, args),
        Commands::Reduce(args) => run_reduce(global, args),
        Commands::Assess(args) => run_assess(global, args, &run_id),
        Commands::Catalog => run_catalog(global),
        Commands::Check => run_check(global, &run_id),
        Commands::Schema(args) => run_schema(args),
        Commands::Version => run_version(global),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(global, &run_id, &err),
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn load(global: &GlobalOpts) -> Result<ResolvedConfig, CommandError> {
    let options = ConfigOptions {
        config_dir: global.config.clone(),
        coefficients_path: global.coefficients.clone(),
        policy_path: global.policy.clone(),
    };
    Ok(load_config(&options)?)
}

/// Print `value` in the selected format.
fn emit<T: Serialize>(
    global: &GlobalOpts,
    value: &T,
    markdown: impl FnOnce() -> String,
    summary: impl FnOnce() -> String,
) -> Result<(), CommandError> {
    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Md => println!("{}", markdown()),
        OutputFormat::Summary => println!("{}", summary()),
    }
    Ok(())
}

fn run_risk(global: &GlobalOpts, args: &RiskArgs) -> CommandResult {
    let config = load(global)?;
    let profile = args.profile.build()?;
    let risk = config.risk_model().estimate(&profile)?;
    emit(
        global,
        &risk,
        || output::risk_markdown(&risk),
        || output::risk_summary(&risk),
    )?;
    Ok(ExitCode::Clean)
}

#[derive(Serialize)]
struct LdlReport {
    projection: cvd_core::LdlProjection,
    injectable: cvd_core::therapy::InjectableEligibility,
    /// Newly added injectables that are not indicated.
    not_indicated: Vec<&'static str>,
}

fn run_ldl(global: &GlobalOpts, args: &LdlArgs) -> CommandResult {
    let config = load(global)?;
    let policy = &config.policy;
    let selection = args.therapy.selection()?;

    let projection = project_ldl_with(args.baseline, &selection, policy.titration)?;
    let injectable = injectable_eligibility(
        args.baseline,
        &selection,
        policy.titration,
        policy.injectable_ldl_threshold,
    );
    let not_indicated: Vec<&'static str> = if injectable.eligible {
        Vec::new()
    } else {
        new_injectables(&selection).iter().map(|d| d.name).collect()
    };

    let report = LdlReport {
        projection,
        injectable,
        not_indicated,
    };
    emit(
        global,
        &report,
        || output::ldl_markdown(&report.projection, &report.injectable),
        || output::ldl_summary(&report.projection, &report.injectable),
    )?;
    Ok(ExitCode::for_flags(!report.not_indicated.is_empty()))
}

fn run_reduce(global: &GlobalOpts, args: &ReduceArgs) -> CommandResult {
    let config = load(global)?;
    let result = config.engine().reduce(&ReductionRequest {
        baseline_risk: args.baseline_risk,
        interventions: args.interventions.as_slice(),
        horizon: args.horizon,
        ldl_baseline: args.ldl_baseline,
        ldl_final: args.ldl_final.unwrap_or(args.ldl_baseline),
        sbp_current: args.sbp_current,
        sbp_target: args.sbp_target.unwrap_or(args.sbp_current),
    })?;
    emit(
        global,
        &result,
        || output::reduction_markdown(&result),
        || output::reduction_summary(&result),
    )?;
    Ok(ExitCode::Clean)
}

fn run_assess(global: &GlobalOpts, args: &AssessArgs, run_id: &str) -> CommandResult {
    let config = load(global)?;
    let request = AssessmentRequest {
        profile: args.profile.build()?,
        therapy: args.therapy.selection()?,
        interventions: args.interventions.clone(),
        horizon: args.horizon,
    };
    let assessment = assess(&request, &config, run_id)?;
    emit(
        global,
        &assessment,
        || output::assessment_markdown(&assessment),
        || output::assessment_summary(&assessment),
    )?;
    Ok(ExitCode::for_flags(assessment.has_flags()))
}

fn run_catalog(global: &GlobalOpts) -> CommandResult {
    let listing = CatalogListing::builtin();
    emit(
        global,
        &listing,
        || output::catalog_markdown(&listing),
        || output::catalog_summary(&listing),
    )?;
    Ok(ExitCode::Clean)
}

fn run_check(global: &GlobalOpts, run_id: &str) -> CommandResult {
    let (status, checks, exit_code) = match load(global) {
        Ok(config) => {
            let snapshot = &config.snapshot;
            let checks = vec![
                serde_json::json!({
                    "check": "coefficients",
                    "status": "ok",
                    "source": snapshot.coefficients_source,
                    "path": snapshot.coefficients_path,
                    "hash": snapshot.coefficients_hash,
                    "model": snapshot.summary.model,
                }),
                serde_json::json!({
                    "check": "policy",
                    "status": "ok",
                    "source": snapshot.policy_source,
                    "path": snapshot.policy_path,
                    "hash": snapshot.policy_hash,
                    "titration": snapshot.summary.titration,
                }),
            ];
            ("ok", checks, ExitCode::Clean)
        }
        Err(CommandError::Config(err)) => {
            let checks = vec![serde_json::json!({
                "check": "config",
                "status": "error",
                "code": err.code(),
                "error": err.to_string(),
            })];
            ("error", checks, ExitCode::from(&err))
        }
        Err(other) => return Err(other),
    };

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "status": status,
        "checks": checks,
    });

    emit(
        global,
        &response,
        || {
            let mut lines = vec!["# cvd-core check".to_string(), String::new()];
            for check in &checks {
                let name = check.get("check").and_then(|v| v.as_str()).unwrap_or("?");
                let state = check.get("status").and_then(|v| v.as_str()).unwrap_or("?");
                let symbol = if state == "ok" { "✓" } else { "✗" };
                lines.push(format!("{} {}: {}", symbol, name, state));
                if let Some(source) = check.get("source").and_then(|v| v.as_str()) {
                    lines.push(format!("  {}", source));
                }
                if let Some(error) = check.get("error").and_then(|v| v.as_str()) {
                    lines.push(format!("  Error: {}", error));
                }
            }
            lines.join("\n")
        },
        || format!("[{}] check: {}", run_id, status.to_uppercase()),
    )?;
    Ok(exit_code)
}

fn run_schema(args: &SchemaArgs) -> CommandResult {
    let format = if args.compact {
        SchemaFormat::JsonCompact
    } else {
        SchemaFormat::Json
    };

    if args.list {
        for (name, description) in available_schemas() {
            println!("{:<24} {}", name, description);
        }
        return Ok(ExitCode::Clean);
    }

    if args.all {
        let all = serde_json::to_value(generate_all_schemas())?;
        println!("{}", format_schema(&all, format)?);
        return Ok(ExitCode::Clean);
    }

    let Some(name) = &args.type_name else {
        return Err(CommandError::Args(
            "specify a type name, --list or --all".to_string(),
        ));
    };
    let schema = generate_schema(name)
        .ok_or_else(|| CommandError::Args(format!("unknown schema type: {}", name)))?;
    println!("{}", format_schema(&schema, format)?);
    Ok(ExitCode::Clean)
}

fn run_version(global: &GlobalOpts) -> CommandResult {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "cvd_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });
    emit(
        global,
        &version_info,
        || {
            format!(
                "cvd-core {}\nschema version: {}",
                env!("CARGO_PKG_VERSION"),
                SCHEMA_VERSION
            )
        },
        || format!("cvd-core {}", env!("CARGO_PKG_VERSION")),
    )?;
    Ok(ExitCode::Clean)
}

/// Report `err` on stderr and map it to an exit code.
fn output_error(global: &GlobalOpts, run_id: &str, err: &CommandError) -> ExitCode {
    let exit_code = err.exit_code();
    error!(
        run_id,
        code = err.code(),
        exit = %exit_code,
        event = event_names::COMMAND_FAILED,
        "{}",
        err
    );

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id,
                "status": "error",
                "exit_code": exit_code.code_name(),
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                    "hint": err.hint(),
                },
            });
            match serde_json::to_string_pretty(&response) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("error: {}", err),
            }
        }
        OutputFormat::Summary => eprintln!("[{}] error: {}", run_id, err),
        OutputFormat::Md => {
            eprintln!("# Error");
            eprintln!();
            eprintln!("{}", err);
            if let Some(hint) = err.hint() {
                eprintln!();
                eprintln!("Hint: {}", hint);
            }
        }
    }

    exit_code
}
