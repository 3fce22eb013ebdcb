//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - one interface to quantum cloud providers",
        style("qcloud").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Clients:");
    for client in qcloud::ClientName::ALL {
        let credentials = if client.needs_token() {
            "token"
        } else {
            "none for local runs"
        };
        println!("  {:<14} {}", client.as_str(), style(credentials).dim());
    }
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
