//! # CLI Commands
//!
//! Each `cmd_*` function backs one subcommand. Rendering is split out into
//! `render_*` functions that return the output string, so the commands stay
//! thin and the output can be tested without capturing stdout.

use crate::error::{AppError, AppResult};
use bronchio_core::{
    assess_request, evaluate_discharge_request, evaluate_wean_request, Assessment,
    AssessmentRequest, DischargeReport, DischargeRequest, PolicyConfig, WeanAbortReason,
    WeanOutcome, WeanReport, WeanRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

// =============================================================================
// INPUT HELPERS
// =============================================================================

/// Load a request object (assess, wean or discharge) from a JSON file.
pub fn load_request<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Parse a kebab-case enum tag from a command-line flag.
///
/// Used as a clap `value_parser` for engine enums, which carry serde names
/// but no `FromStr`.
pub fn parse_tag<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unrecognised value '{raw}'"))
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// =============================================================================
// ASSESS
// =============================================================================

/// Evaluate one assessment request.
pub fn evaluate_assessment(
    policy: &PolicyConfig,
    request: &AssessmentRequest,
) -> AppResult<Assessment> {
    let assessment = assess_request(request, policy)?;
    tracing::info!(
        threshold = assessment.threshold.value(),
        respiratory = assessment.severity.respiratory.as_str(),
        feeding = assessment.severity.feeding.as_str(),
        support = assessment.recommendation.respiratory_support.as_str(),
        hydration = assessment.recommendation.hydration_plan.as_str(),
        discharge = assessment.recommendation.discharge_path.as_str(),
        "assessment evaluated"
    );
    Ok(assessment)
}

pub fn render_assessment(assessment: &Assessment, json: bool) -> AppResult<String> {
    if json {
        to_json(assessment)
    } else {
        Ok(assessment.to_text())
    }
}

pub fn cmd_assess(policy: &PolicyConfig, request: &AssessmentRequest, json: bool) -> AppResult<()> {
    let assessment = evaluate_assessment(policy, request)?;
    println!("{}", render_assessment(&assessment, json)?);
    Ok(())
}

// =============================================================================
// WEAN
// =============================================================================

pub fn evaluate_wean(policy: &PolicyConfig, request: &WeanRequest) -> AppResult<WeanReport> {
    let report = evaluate_wean_request(request, policy)?;
    match &report.outcome {
        WeanOutcome::Continue => {
            tracing::info!(threshold = report.threshold.value(), "wean step tolerated");
        }
        WeanOutcome::Abort { reasons } => {
            tracing::warn!(
                threshold = report.threshold.value(),
                reasons = reasons.len(),
                "wean step failed, resume prior support"
            );
        }
    }
    Ok(report)
}

pub fn render_wean(report: &WeanReport, json: bool) -> AppResult<String> {
    if json {
        return to_json(report);
    }
    let mut out = String::new();
    out.push_str(&format!("Target SpO2: >= {}\n", report.threshold));
    match &report.outcome {
        WeanOutcome::Continue => out.push_str("Outcome: CONTINUE weaning\n"),
        WeanOutcome::Abort { reasons } => {
            out.push_str("Outcome: ABORT - resume previous support level\n");
            for reason in reasons {
                out.push_str(&format!("  - {}\n", describe_abort(reason)));
            }
        }
    }
    Ok(out)
}

fn describe_abort(reason: &WeanAbortReason) -> String {
    match reason {
        WeanAbortReason::HeartRateRise { by } => format!("heart rate rose by {by} bpm"),
        WeanAbortReason::RespiratoryRateRise { by } => {
            format!("respiratory rate rose by {by} breaths/min")
        }
        WeanAbortReason::Desaturation { saturation } => {
            format!("saturation fell to {saturation}%")
        }
    }
}

pub fn cmd_wean(policy: &PolicyConfig, request: &WeanRequest, json: bool) -> AppResult<()> {
    let report = evaluate_wean(policy, request)?;
    println!("{}", render_wean(&report, json)?);
    Ok(())
}

// =============================================================================
// DISCHARGE
// =============================================================================

pub fn evaluate_discharge(
    policy: &PolicyConfig,
    request: &DischargeRequest,
) -> AppResult<DischargeReport> {
    let report = evaluate_discharge_request(request, policy)?;
    tracing::info!(
        threshold = report.threshold.value(),
        ready = report.readiness.ready,
        unmet = report.readiness.unmet.len(),
        "discharge readiness evaluated"
    );
    Ok(report)
}

pub fn render_discharge(report: &DischargeReport, json: bool) -> AppResult<String> {
    if json {
        return to_json(report);
    }
    let mut out = String::new();
    out.push_str(&format!("Target SpO2: >= {}\n", report.threshold));
    if report.readiness.ready {
        out.push_str("Discharge: READY\n");
    } else {
        out.push_str("Discharge: NOT READY\n");
        for criterion in &report.readiness.unmet {
            out.push_str(&format!("  - unmet: {}\n", criterion.as_str()));
        }
    }
    Ok(out)
}

pub fn cmd_discharge(
    policy: &PolicyConfig,
    request: &DischargeRequest,
    json: bool,
) -> AppResult<()> {
    let report = evaluate_discharge(policy, request)?;
    println!("{}", render_discharge(&report, json)?);
    Ok(())
}

// =============================================================================
// POLICY
// =============================================================================

pub fn cmd_policy(policy: &PolicyConfig) -> AppResult<()> {
    println!("{}", to_json(policy)?);
    Ok(())
}

/// Write a policy file seeded from a preset.
pub fn cmd_init_policy(path: &Path, preset: &str, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::InvalidArgument(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }

    let policy = PolicyConfig::preset(preset)?.validated()?;
    std::fs::write(path, to_json(&policy)?)?;

    tracing::info!(path = %path.display(), preset, "policy file written");
    Ok(())
}
