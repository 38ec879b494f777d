//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the configuration as TOML (usable as a config file)
    #[arg(long)]
    pub toml: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    #[serde(flatten)]
    pub config: Config,
}

/// Execute the config command
///
/// The backend password is always masked.
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let redacted = config.redacted();

    if args.toml {
        print!("{}", toml::to_string_pretty(&redacted)?);
        return Ok(());
    }

    let response = ConfigResponse {
        config_file: XdgDirs::new().config_file().to_string_lossy().into_owned(),
        config: redacted,
    };

    match format {
        OutputFormat::Human => {
            let backend = &response.config.backend;
            let search = &response.config.search;

            println!("{}", colors::label("Configuration:"));
            println!("  config_file: {}", colors::dim(&response.config_file));
            println!("  backend:");
            println!("    url: {}", colors::index(&backend.base_url()));
            println!(
                "    username: {}",
                backend.username.as_deref().unwrap_or("(none)")
            );
            if let Some(password) = &backend.password {
                println!("    password: {password}");
            }
            println!("    media_type: {}", backend.media_type());
            println!(
                "    request_timeout_sec: {}",
                colors::number(&backend.request_timeout_sec.to_string())
            );
            println!("  search:");
            println!(
                "    default_page_size: {}",
                colors::number(&search.default_page_size.to_string())
            );
            println!(
                "    default_slop: {}",
                colors::number(&search.default_slop.to_string())
            );
            println!(
                "    default_max_expansions: {}",
                colors::number(&search.default_max_expansions.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
