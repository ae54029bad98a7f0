//! Output formatting utilities for the CLI
//!
//! Provides breadcrumb and JSON formatting for response data, and tables
//! for method catalog listings.

use anyhow::Result;
use colored::*;
use serde_json::Value;
use storm_core::{render_breadcrumbs, ParamRequirement};

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Breadcrumbs,
    Json,
}

/// Format decoded response data
pub fn format_response(data: &Value, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Breadcrumbs => Ok(render_breadcrumbs(data)),
    }
}

/// Format the method catalog listing
pub fn format_methods(methods: &[(String, Vec<String>)], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let as_map: serde_json::Map<String, Value> = methods
                .iter()
                .map(|(group, names)| {
                    (
                        group.clone(),
                        Value::Array(names.iter().cloned().map(Value::String).collect()),
                    )
                })
                .collect();
            Ok(serde_json::to_string_pretty(&as_map)?)
        }
        OutputFormat::Breadcrumbs => {
            #[derive(Tabled)]
            struct MethodRow {
                #[tabled(rename = "Group")]
                group: String,
                #[tabled(rename = "Method")]
                method: String,
            }

            let mut rows = Vec::new();
            for (group, names) in methods {
                for name in names {
                    rows.push(MethodRow {
                        group: group.clone().cyan().to_string(),
                        method: name.clone(),
                    });
                }
            }

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Available Methods:".bold(), table))
        }
    }
}

/// Format parameter requirements for a method
pub fn format_method_params(
    method: &str,
    params: &[(String, ParamRequirement)],
    format: &OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let as_map: serde_json::Map<String, Value> = params
                .iter()
                .map(|(name, req)| (name.clone(), Value::String(req.to_string())))
                .collect();
            Ok(serde_json::to_string_pretty(&as_map)?)
        }
        OutputFormat::Breadcrumbs => {
            #[derive(Tabled)]
            struct ParamRow {
                #[tabled(rename = "Parameter")]
                name: String,
                #[tabled(rename = "Requirement")]
                requirement: String,
            }

            let rows: Vec<ParamRow> = params
                .iter()
                .map(|(name, req)| ParamRow {
                    name: name.clone().cyan().to_string(),
                    requirement: match req {
                        ParamRequirement::Required => req.to_string().red().to_string(),
                        ParamRequirement::Optional => req.to_string().green().to_string(),
                        ParamRequirement::RequiredIf(_) => req.to_string().yellow().to_string(),
                    },
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!(
                "{}\n{}",
                format!("Parameters for {}:", method).bold(),
                table
            ))
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
