//! Command execution handlers

use anyhow::Result;
use serde_json::Value;

use crate::client::StormClient;
use crate::config::CliConfig;
use crate::format::format_success;

use super::commands::*;

/// Parse a `key=value` parameter argument.
///
/// The value is kept as a string; the API coerces on its side.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), Value::String(value.to_string())))
        }
        _ => Err(anyhow::anyhow!(
            "Invalid parameter '{}'. Expected key=value",
            raw
        )),
    }
}

/// Handle call command
pub async fn handle_call(
    client: &mut StormClient,
    params: Vec<String>,
    format: &OutputFormat,
) -> Result<()> {
    for raw in &params {
        let (key, value) = parse_param(raw)?;
        client.add_param(key, value);
    }

    match format {
        OutputFormat::Json => {
            let data = client.request().await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        OutputFormat::Breadcrumbs => {
            let (_, rendered) = client.request_rendered().await?;
            print!("{}", rendered);
        }
    }

    Ok(())
}

/// Handle methods command
pub async fn handle_methods(client: &StormClient, format: &OutputFormat) -> Result<()> {
    let methods = client.list_methods().await?;
    let formatted = crate::format::format_methods(&methods, &format.into())?;
    println!("{}", formatted);

    Ok(())
}

/// Handle params command
pub async fn handle_params(client: &StormClient, method: &str, format: &OutputFormat) -> Result<()> {
    let params = client.list_method_params(Some(method)).await?;
    let formatted = crate::format::format_method_params(method, &params, &format.into())?;
    println!("{}", formatted);

    Ok(())
}

/// Handle config commands
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(current_config)?);
            }
            OutputFormat::Breadcrumbs => {
                println!("CLI Configuration:");
                println!("{:<20} Value", "Setting");
                println!("{}", "-".repeat(40));
                println!("{:<20} {}", "API URL", current_config.api_url);
                println!("{:<20} {}", "API Version", current_config.api_version);
                println!("{:<20} {}", "User", current_config.username);
                println!(
                    "{:<20} {}",
                    "Password",
                    if current_config.password.is_empty() {
                        "(unset)"
                    } else {
                        "********"
                    }
                );
                println!("{:<20} {}", "Output Format", current_config.output_format);
                println!("{:<20} {}", "Verbose", current_config.verbose);
                println!("{:<20} {}s", "Timeout", current_config.timeout);
            }
        },
        ConfigCommands::Set { key, value } => {
            let mut config = current_config.clone();
            let value_clone = value.clone();
            match key.as_str() {
                "api_url" => config.api_url = value,
                "api_version" => config.api_version = value,
                "username" => config.username = value,
                "password" => config.password = value,
                "output_format" => {
                    if ["breadcrumbs", "json"].contains(&value.as_str()) {
                        config.output_format = value;
                    } else {
                        return Err(anyhow::anyhow!(
                            "Invalid output format. Must be 'breadcrumbs' or 'json'"
                        ));
                    }
                }
                "verbose" => {
                    config.verbose = value.to_lowercase() == "true" || value == "1";
                }
                "timeout" => {
                    config.timeout = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid timeout value. Must be a number"))?;
                }
                _ => return Err(anyhow::anyhow!("Unknown config key: {}", key)),
            }

            config.save()?;
            println!("{}", format_success(&format!("Set {} = {}", key, value_clone)));
        }
        ConfigCommands::Reset => {
            let default_config = CliConfig::default();
            default_config.save()?;
            println!("{}", format_success("Configuration reset to defaults"));
        }
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        let (key, value) = parse_param("page_size=999").unwrap();
        assert_eq!(key, "page_size");
        assert_eq!(value, Value::String("999".to_string()));
    }

    #[test]
    fn test_parse_param_keeps_extra_equals() {
        let (key, value) = parse_param("notes=a=b").unwrap();
        assert_eq!(key, "notes");
        assert_eq!(value, Value::String("a=b".to_string()));
    }

    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("page_size").is_err());
        assert!(parse_param("=999").is_err());
    }
}
