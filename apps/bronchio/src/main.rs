//! # Bronchio CLI
//!
//! Command-line entry point for the bronchiolitis pathway engine.
//!
//! Commands:
//! - `assess` - classify one set of observations and print the plan
//! - `wean` - check one wean step against the abort criteria
//! - `discharge` - check standard discharge readiness
//! - `policy` - print the effective policy
//! - `init-policy` - write a policy file from a preset
//! - `serve` - run the HTTP API

use bronchio::cli::{
    cmd_assess, cmd_discharge, cmd_init_policy, cmd_policy, cmd_wean, load_request, parse_tag,
};
use bronchio::config::{self, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use bronchio::error::{AppError, AppResult};
use bronchio_core::{
    ApnoeaLevel, AssessmentRequest, BehaviorState, DischargeObservationInput, DischargeRequest,
    EffortLevel, FeedingLevel, ObservationInput, PolicyConfig, RiskFactor, RiskInput,
    VitalSignsInput, WeanRequest,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser)]
#[command(name = "bronchio")]
#[command(about = "Bronchiolitis severity and management pathway calculator")]
#[command(version)]
struct Cli {
    /// Policy file (JSON). Overrides --preset.
    #[arg(long, global = true, env = "BRONCHIO_POLICY")]
    policy: Option<PathBuf>,

    /// Named policy preset (synthesis, combined-tier)
    #[arg(long, global = true, env = "BRONCHIO_PRESET")]
    preset: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one set of observations
    Assess {
        /// Read the whole request from a JSON file instead of flags
        #[arg(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        risk: RiskArgs,

        #[arg(long, value_parser = parse_tag::<EffortLevel>, required_unless_present = "input")]
        effort: Option<EffortLevel>,

        #[arg(long, value_parser = parse_tag::<BehaviorState>, required_unless_present = "input")]
        behavior: Option<BehaviorState>,

        #[arg(long, value_parser = parse_tag::<FeedingLevel>, required_unless_present = "input")]
        feeding: Option<FeedingLevel>,

        #[arg(long, value_parser = parse_tag::<ApnoeaLevel>, default_value = "none")]
        apnoea: ApnoeaLevel,

        /// Breaths per minute
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        respiratory_rate: Option<i64>,

        /// SpO2 in percent
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        spo2: Option<i64>,

        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Check one wean step
    Wean {
        #[arg(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        risk: RiskArgs,

        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        baseline_hr: Option<i64>,
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        baseline_rr: Option<i64>,
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        baseline_spo2: Option<i64>,

        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        current_hr: Option<i64>,
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        current_rr: Option<i64>,
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        current_spo2: Option<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Check standard discharge readiness
    Discharge {
        #[arg(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        risk: RiskArgs,

        /// Hours observed on ambient air
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        hours_on_air: Option<i64>,

        /// The ambient-air period included a sleep
        #[arg(long)]
        sleep_observed: bool,

        /// Lowest SpO2 recorded on ambient air
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        lowest_spo2: Option<i64>,

        /// Oral intake, percent of normal
        #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
        oral_intake: Option<i64>,

        #[arg(long)]
        json: bool,
    },
    /// Print the effective policy as JSON
    Policy,
    /// Write a policy file seeded from --preset (default: synthesis)
    InitPolicy {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "BRONCHIO_HOST", default_value = DEFAULT_HOST)]
        host: String,

        #[arg(long, env = "BRONCHIO_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Args)]
struct RiskArgs {
    /// Age in days (compared against the policy's age cutoff)
    #[arg(long)]
    age_days: Option<u32>,

    /// Mark the infant as high-risk by age when the age is not known
    #[arg(long)]
    high_risk_age: bool,

    /// Risk factor, repeatable (e.g. preterm, chronic-lung-disease)
    #[arg(long = "risk-factor", value_parser = parse_tag::<RiskFactor>)]
    risk_factors: Vec<RiskFactor>,
}

impl RiskArgs {
    fn into_input(self) -> RiskInput {
        RiskInput {
            age_days: self.age_days,
            high_risk_age: self.high_risk_age.then_some(true),
            risk_factors: self.risk_factors,
        }
    }
}

fn require<T>(value: Option<T>, flag: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::InvalidArgument(format!("missing --{flag}")))
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    config::init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        policy: policy_path,
        preset,
        command,
        ..
    } = cli;
    let load = || config::load_policy(policy_path.as_deref(), preset.as_deref());

    match command {
        Commands::Assess {
            input,
            risk,
            effort,
            behavior,
            feeding,
            apnoea,
            respiratory_rate,
            spo2,
            json,
        } => {
            let request = match input {
                Some(path) => load_request::<AssessmentRequest>(&path)?,
                None => AssessmentRequest {
                    risk: risk.into_input(),
                    observation: ObservationInput {
                        effort: require(effort, "effort")?,
                        behavior: require(behavior, "behavior")?,
                        feeding: require(feeding, "feeding")?,
                        apnoea,
                        respiratory_rate: require(respiratory_rate, "respiratory-rate")?,
                        oxygen_saturation: require(spo2, "spo2")?,
                    },
                },
            };
            cmd_assess(&load()?, &request, json)
        }

        Commands::Wean {
            input,
            risk,
            baseline_hr,
            baseline_rr,
            baseline_spo2,
            current_hr,
            current_rr,
            current_spo2,
            json,
        } => {
            let request = match input {
                Some(path) => load_request::<WeanRequest>(&path)?,
                None => WeanRequest {
                    risk: risk.into_input(),
                    baseline: VitalSignsInput {
                        heart_rate: require(baseline_hr, "baseline-hr")?,
                        respiratory_rate: require(baseline_rr, "baseline-rr")?,
                        oxygen_saturation: require(baseline_spo2, "baseline-spo2")?,
                    },
                    current: VitalSignsInput {
                        heart_rate: require(current_hr, "current-hr")?,
                        respiratory_rate: require(current_rr, "current-rr")?,
                        oxygen_saturation: require(current_spo2, "current-spo2")?,
                    },
                },
            };
            cmd_wean(&load()?, &request, json)
        }

        Commands::Discharge {
            input,
            risk,
            hours_on_air,
            sleep_observed,
            lowest_spo2,
            oral_intake,
            json,
        } => {
            let request = match input {
                Some(path) => load_request::<DischargeRequest>(&path)?,
                None => DischargeRequest {
                    risk: risk.into_input(),
                    observation: DischargeObservationInput {
                        hours_on_ambient_air: require(hours_on_air, "hours-on-air")?,
                        sleep_observed,
                        lowest_saturation_on_air: require(lowest_spo2, "lowest-spo2")?,
                        oral_intake_percent: require(oral_intake, "oral-intake")?,
                    },
                },
            };
            cmd_discharge(&load()?, &request, json)
        }

        Commands::Policy => cmd_policy(&load()?),

        Commands::InitPolicy { path, force } => {
            cmd_init_policy(&path, preset.as_deref().unwrap_or("synthesis"), force)
        }

        Commands::Serve { host, port } => {
            let addr = ServerConfig { host, port }.socket_addr()?;
            let policy = load()?;
            log_policy(&policy);
            bronchio::api::serve(addr, policy).await
        }
    }
}

fn log_policy(policy: &PolicyConfig) {
    tracing::info!(
        age_cutoff_days = policy.age_cutoff.days(),
        severity_model = ?policy.severity_model,
        severe_saturation_below = policy.severe_saturation_below,
        "policy loaded"
    );
}
