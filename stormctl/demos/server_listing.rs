//! List every server on the account and print its domain and unique ID.
//!
//! Credentials come from STORM_USER / STORM_PASS.
//!
//! ```sh
//! STORM_USER=api_user STORM_PASS=api_pass cargo run --example server_listing
//! ```

use anyhow::{Context, Result};
use stormctl::client::StormClient;

#[tokio::main]
async fn main() -> Result<()> {
    let user = std::env::var("STORM_USER").context("STORM_USER is not set")?;
    let pass = std::env::var("STORM_PASS").context("STORM_PASS is not set")?;

    let mut storm = StormClient::new(user, pass, "storm/server/list")?;
    storm.add_param("page_size", "999");

    let results = storm.request().await?;

    if let Some(items) = results["items"].as_array() {
        for item in items {
            println!(
                "{} || {}",
                item["domain"].as_str().unwrap_or("-"),
                item["uniq_id"].as_str().unwrap_or("-"),
            );
        }
    }

    Ok(())
}
