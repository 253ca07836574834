//! Configuration inspection.

use clap::{Args, Subcommand};

use keepsake_core::config::AppConfig;
use keepsake_core::result::AppResult;
use keepsake_database::connection::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);
            match format {
                OutputFormat::Json => output::print_item(&shown, format),
                OutputFormat::Table => {
                    println!("Database");
                    output::print_kv("url", &shown.database.url);
                    output::print_kv("max_connections", &shown.database.max_connections.to_string());
                    println!("Storage");
                    output::print_kv("root", &shown.storage.root);
                    output::print_kv("public_base_url", &shown.storage.public_base_url);
                    output::print_kv(
                        "max_upload_size_bytes",
                        &shown.storage.max_upload_size_bytes.to_string(),
                    );
                    println!("Book");
                    output::print_kv("default_layout", &shown.book.default_layout.to_string());
                    output::print_kv(
                        "mobile_breakpoint_px",
                        &shown.book.mobile_breakpoint_px.to_string(),
                    );
                    output::print_kv("group_order", &format!("{:?}", shown.book.group_order));
                    output::print_kv("reflow_settle_ms", &shown.book.reflow_settle_ms.to_string());
                    println!("Logging");
                    output::print_kv("level", &shown.logging.level);
                    output::print_kv("format", &shown.logging.format);
                }
            }
        }
    }
    Ok(())
}
