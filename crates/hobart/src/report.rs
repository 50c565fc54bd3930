//! Result export.
//!
//! Pure value-to-text conversions: the full result as pretty JSON for the
//! persistence/event collaborators, and the decomposition tables as CSV for
//! spreadsheet review. The engine performs no I/O; where the bytes go is the
//! caller's business.

use hobart_model::VarResult;
use thiserror::Error;

/// Errors that can occur while exporting a result.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV writer produced invalid UTF-8 (should not happen).
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize a full result to pretty JSON.
pub fn to_json(result: &VarResult) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render the decomposition tables as CSV.
///
/// One section per table (component, marginal, incremental), each with a
/// header row, separated by blank lines.
pub fn decomposition_csv(result: &VarResult) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(["group_key", "var_amount", "percent_of_total", "intra_group_correlation"])?;
    for component in &result.component_var {
        writer.write_record([
            component.group_key.clone(),
            component.var_amount.to_string(),
            component.percent_of_total.to_string(),
            component.intra_group_correlation.to_string(),
        ])?;
    }
    writer.write_record(["", "", "", ""])?;

    writer.write_record(["position_id", "marginal_var", "contribution", "percent_contribution"])?;
    for marginal in &result.marginal_var {
        writer.write_record([
            marginal.position_id.clone(),
            marginal.marginal_var.to_string(),
            marginal.contribution.to_string(),
            marginal.percent_contribution.to_string(),
        ])?;
    }
    writer.write_record(["", "", "", ""])?;

    writer.write_record(["position_id", "incremental_var", "var_without", "var_with"])?;
    for incremental in &result.incremental_var {
        writer.write_record([
            incremental.position_id.clone(),
            incremental.incremental_var.to_string(),
            incremental.var_without.to_string(),
            incremental.var_with.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
    Ok(String::from_utf8(bytes)?)
}
