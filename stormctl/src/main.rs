//! Storm CLI
//!
//! Command-line interface for the Storm on Demand cloud API.

use anyhow::Result;
use clap::Parser;
use stormctl::cli::{
    generate_completion, handle_call, handle_config, handle_methods, handle_params, run_shell, Cli,
    Commands, OutputFormat,
};
use stormctl::client::StormClient;
use stormctl::config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build configuration using priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();

    // Load config file (unless --no-config is specified)
    builder = builder.with_config_file(!cli.no_config)?;

    // Apply environment variable overrides
    builder = builder.with_env_overrides();

    // Apply CLI argument overrides (highest priority)
    if let Some(ref api_url) = cli.api_url {
        builder = builder.with_api_url(api_url)?;
    }
    if let Some(ref api_version) = cli.api_version {
        builder = builder.with_api_version(api_version);
    }
    if let Some(ref user) = cli.user {
        builder = builder.with_username(user);
    }
    if let Some(ref password) = cli.password {
        builder = builder.with_password(password);
    }
    if let Some(ref format) = cli.format {
        let format_str = match format {
            OutputFormat::Breadcrumbs => "breadcrumbs",
            OutputFormat::Json => "json",
        };
        builder = builder.with_output_format(format_str)?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Breadcrumbs,
    };

    // Initialize logging if verbose
    if config.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(
                "stormctl=debug,storm_core=debug",
            ))
            .with_writer(std::io::stderr)
            .init();

        eprintln!("API URL: {}", config.api_url);
        eprintln!("API version: {}", config.api_version);
        eprintln!("Output format: {:?}", output_format);
    }

    // The initial method depends on the command being run
    let initial_method = match &cli.command {
        Commands::Call { method, .. } => method.clone(),
        Commands::Params { method } => method.clone(),
        Commands::Shell { method } => match method {
            Some(method) => method.clone(),
            None => prompt_for_method()?,
        },
        _ => "storm/server/list".to_string(),
    };

    // Authenticated commands need credentials up front
    let needs_auth = matches!(cli.command, Commands::Call { .. } | Commands::Shell { .. });
    if needs_auth && config.username.is_empty() {
        eprintln!("Error: no API user configured.");
        eprintln!("Set STORM_USER/STORM_PASS, pass --user/--password,");
        eprintln!("or run: stormctl config set username <name>");
        std::process::exit(1);
    }

    let mut client = match StormClient::with_config(
        config.api_url.clone(),
        config.api_version.clone(),
        config.username.clone(),
        config.password.clone(),
        initial_method,
        config.timeout,
        3,
        std::time::Duration::from_millis(500),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to set up the API client: {}", e);
            std::process::exit(1);
        }
    };

    // Execute commands
    let result = match cli.command {
        Commands::Call { params, .. } => handle_call(&mut client, params, &output_format).await,
        Commands::Methods => handle_methods(&client, &output_format).await,
        Commands::Params { method } => handle_params(&client, &method, &output_format).await,
        Commands::Shell { .. } => run_shell(&mut client, &output_format).await,
        Commands::Config { command } => handle_config(command, &config, &output_format).await,
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if config.verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Ask for the initial method when `shell` is started without one.
fn prompt_for_method() -> Result<String> {
    use std::io::{BufRead, Write};

    print!("Initial method: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let method = line.trim().to_string();
    if method.is_empty() {
        return Err(anyhow::anyhow!("No method given"));
    }

    Ok(method)
}
