//! Interactive session
//!
//! A menu-driven loop for exploring the API: switch methods, build up
//! parameters, execute requests, and browse the method catalog without
//! restarting the process. Rendered output can be mirrored to a log file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, Write};

use crate::client::StormClient;
use crate::format::format_success;

use super::commands::OutputFormat;

/// Active session log: rendered output is mirrored to this file.
struct SessionLog {
    filename: String,
    file: File,
}

impl SessionLog {
    fn open() -> Result<Self> {
        let filename = chrono::Local::now()
            .format("%H%M%S - %d%b%y.log")
            .to_string();
        let file = File::create(&filename)
            .with_context(|| format!("Failed to create log file {}", filename))?;

        Ok(Self { filename, file })
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.file
            .write_all(text.as_bytes())
            .context("Failed to write session log")
    }
}

/// Run the interactive session loop.
///
/// Reads menu choices from stdin until the user quits.
pub async fn run_shell(client: &mut StormClient, format: &OutputFormat) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut log: Option<SessionLog> = None;

    loop {
        let log_status = match &log {
            Some(log) => format!("(Currently Active: {})", log.filename),
            None => "(Currently Inactive)".to_string(),
        };

        println!();
        println!("Pick your poison...");
        println!(" 1. Change method (will clear all params)");
        println!(" 2. Add parameter");
        println!(" 3. List currently set parameters");
        println!(" 4. Clear ALL parameters");
        println!(" 5. Execute request and display");
        println!(" 6. Toggle logging {}", log_status);
        println!(" 7. List available methods");
        println!(" 8. List parameters for current method");
        println!(" 9. Remove a specific parameter");
        println!("10. Execute request and store under a key");
        println!("11. Display a stored request");
        println!("12. Remove a stored request");
        println!("13. Get me out of here");

        let choice = match prompt(&mut lines, "Enter a number: ")? {
            Some(line) => line,
            None => break, // stdin closed
        };

        match choice.trim().parse::<u32>() {
            Ok(1) => {
                if let Some(method) = prompt(&mut lines, "Enter your new method: ")? {
                    client.new_method(method.trim(), false);
                }
            }
            Ok(2) => {
                let key = prompt(&mut lines, "Enter the parameter: ")?;
                let value = prompt(&mut lines, "Enter the value: ")?;
                if let (Some(key), Some(value)) = (key, value) {
                    client.add_param(key.trim(), value.trim());
                }
            }
            Ok(3) => {
                if client.params().is_empty() {
                    println!("No parameters are currently set");
                } else {
                    println!("Currently set parameters:");
                    for (key, value) in client.params().iter() {
                        println!("{} => {}", key, scalar_display(value));
                    }
                }
            }
            Ok(4) => {
                client.clear_params();
                println!("{}", format_success("Cleared all parameters"));
            }
            Ok(5) => match client.request_rendered().await {
                Ok((data, rendered)) => {
                    let output = render_for(format, &data, &rendered)?;
                    if let Some(log) = log.as_mut() {
                        log.write(&client.debug_info())?;
                        log.write("\n")?;
                        log.write(&output)?;
                        log.write("\n\n")?;
                    }
                    print!("{}", output);
                }
                Err(e) => eprintln!("Error: {}", e),
            },
            Ok(6) => match log.take() {
                Some(old) => {
                    println!("{}", format_success(&format!("Closed log {}", old.filename)));
                }
                None => {
                    let new_log = SessionLog::open()?;
                    println!("{}", format_success(&format!("Logging to {}", new_log.filename)));
                    log = Some(new_log);
                }
            },
            Ok(7) => match client.list_methods().await {
                Ok(methods) => {
                    println!("Available methods:");
                    for (group, names) in &methods {
                        for name in names {
                            println!("{}/{}", group, name);
                        }
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            },
            Ok(8) => match client.list_method_params(None).await {
                Ok(params) => {
                    println!("Parameters for {}:", client.method());
                    for (name, req) in &params {
                        println!("{} => {}", name, req);
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            },
            Ok(9) => {
                if client.params().is_empty() {
                    println!("No parameters are currently set");
                    continue;
                }

                println!("Currently set parameters:");
                let keys: Vec<String> = client.params().iter().map(|(k, _)| k.clone()).collect();
                for (index, key) in keys.iter().enumerate() {
                    let value = client.params().get(key).cloned().unwrap_or_default();
                    println!("{}. {} => {}", index, key, scalar_display(&value));
                }

                let choice = prompt(
                    &mut lines,
                    "Enter the number of the parameter to remove (anything else cancels): ",
                )?;
                match choice.and_then(|c| c.trim().parse::<usize>().ok()) {
                    Some(index) if index < keys.len() => {
                        client.remove_param(&keys[index]);
                        println!("{}", format_success(&format!("Removed {}", keys[index])));
                    }
                    _ => println!("Not a valid choice. Canceling the operation."),
                }
            }
            Ok(10) => {
                if let Some(key) = prompt(&mut lines, "Enter the storage key: ")? {
                    match client.store_request(key.trim()).await {
                        Ok(stored) => {
                            if stored.overwritten.is_some() {
                                println!("Previous data under '{}' was overwritten", stored.key);
                            }
                            println!(
                                "{}",
                                format_success(&format!("Stored result under '{}'", stored.key))
                            );
                        }
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
            }
            Ok(11) => {
                show_stored_keys(client);
                if let Some(key) = prompt(&mut lines, "Enter the key to display: ")? {
                    match client.stored(key.trim()) {
                        Some(data) => {
                            print!("{}", storm_core::render_breadcrumbs(data));
                        }
                        None => println!("No stored request under '{}'", key.trim()),
                    }
                }
            }
            Ok(12) => {
                show_stored_keys(client);
                if let Some(key) = prompt(&mut lines, "Enter the key to remove: ")? {
                    if client.remove_stored(key.trim()) {
                        println!(
                            "{}",
                            format_success(&format!("Removed stored request '{}'", key.trim()))
                        );
                    } else {
                        println!("No stored request under '{}'", key.trim());
                    }
                }
            }
            Ok(13) => {
                println!();
                break;
            }
            _ => println!("Really? How about you enter a valid value?"),
        }
    }

    Ok(())
}

/// Prompt on stdout and read one line; `None` when stdin is exhausted.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    message: &str,
) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush().context("Failed to flush stdout")?;

    match lines.next() {
        Some(line) => Ok(Some(line.context("Failed to read stdin")?)),
        None => Ok(None),
    }
}

fn show_stored_keys(client: &StormClient) {
    let keys = client.stored_keys();
    if keys.is_empty() {
        println!("No stored requests");
    } else {
        println!("Stored request keys:");
        for key in keys {
            println!("- {}", key);
        }
    }
}

fn render_for(
    format: &OutputFormat,
    data: &serde_json::Value,
    rendered: &str,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(data)?)),
        OutputFormat::Breadcrumbs => Ok(rendered.to_string()),
    }
}

fn scalar_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
