//! Storm CLI Library
//!
//! This library provides the core functionality for the `stormctl` tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::StormClient`] which provides
//! programmatic access to the Storm on Demand API. Configuration types are
//! also available via [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use stormctl::client::StormClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut client = StormClient::new("api_user", "api_pass", "storm/server/list")?;
//! client.add_param("page_size", "999");
//!
//! let listing = client.request().await?;
//! println!("{} servers", listing["item_count"]);
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the Storm on Demand API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

#[cfg(test)]
pub mod test_utils;
