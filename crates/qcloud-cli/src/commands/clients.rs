//! Clients command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use qcloud::ClientName;

use super::common::credential_source;

/// Execute the clients command.
pub async fn execute(credentials: Option<&Path>) -> Result<()> {
    let source = credential_source(credentials)?;
    let available = qcloud::list_available(&source).await;

    println!("{} Clients:\n", style("qcloud").cyan().bold());
    for client in ClientName::ALL {
        let ok = available.get(client.as_str()).copied().unwrap_or(false);
        if ok {
            println!("  {} {}", style("●").green(), style(client).bold());
        } else {
            println!(
                "  {} {} (not configured)",
                style("○").dim(),
                style(client).dim()
            );
            if client.needs_token() {
                println!("    Provide a token with --token or the credentials file");
            }
        }
    }
    println!();

    Ok(())
}
