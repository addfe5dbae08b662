use std::path::PathBuf;

use clap::{Parser, Subcommand};

use redirect_engine::config::{load_config, RedirectConfig};
use redirect_engine::redirect::rule::sanitize;
use redirect_engine::RequestContext;

#[derive(Parser)]
#[command(name = "redirect-cli")]
#[command(about = "Inspect redirect rules without running the server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "redirects.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a request URI (e.g. "/old-page?a=1") and print every stage
    Check { uri: String },
    /// Print the rules that survive sanitization, in evaluation order
    Rules,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    println!("{}", render(&cli.command, &config)?);
    Ok(())
}

/// Pretty JSON report for a command.
fn render(command: &Commands, config: &RedirectConfig) -> Result<String, Box<dyn std::error::Error>> {
    let report = match command {
        Commands::Check { uri } => {
            let engine = config.engine()?;
            serde_json::to_string_pretty(&engine.trace(&RequestContext::from_request_uri(uri)))?
        }
        Commands::Rules => serde_json::to_string_pretty(&sanitize(&config.redirects))?,
    };
    Ok(report)
}
