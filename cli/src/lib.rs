use std::path::PathBuf;

use clap::{Parser, Subcommand};
use utils::app_config::AppConfig;

mod commands;
mod input;

pub use input::PromptInput;

#[derive(Parser)]
#[command(name = "acl-audit", version)]
#[command(about = "Audit filesystem access-control lists into CSV reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file merged over the built-in defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory tree and export its permissions
    Scan {
        /// Directory to audit; prompted for when omitted
        path: Option<PathBuf>,

        /// Report objects whose ACL inherits from the parent
        #[arg(long)]
        include_inherited: bool,

        /// Report entries for the local SYSTEM account
        #[arg(long)]
        include_system: bool,

        /// Report entries for BUILTIN groups
        #[arg(long)]
        include_builtin: bool,

        /// Ask for the path and every inclusion rule on the terminal
        #[arg(short, long)]
        interactive: bool,

        /// Directory the CSV reports are written to
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// List the contents of a permissions report
    Report {
        /// Permissions CSV produced by `scan`
        csv: PathBuf,

        /// Show the entries of this audited path only
        #[arg(short, long)]
        path: Option<String>,

        /// Samba share root to map Windows paths onto
        #[arg(short, long, value_name = "DIR")]
        samba_base: Option<PathBuf>,
    },
}

pub async fn cli_match() -> utils::error::Result<()> {
    let cli = Cli::parse();

    // Overrides must land before the logger reads its level
    AppConfig::merge_config(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        AppConfig::set("log.level", level)?;
    }
    let _guard = utils::logger::setup_logging()?;

    match cli.command {
        Commands::Scan {
            path,
            include_inherited,
            include_system,
            include_builtin,
            interactive,
            output_dir,
        } => {
            commands::scan_cmd(commands::ScanArgs {
                path,
                include_inherited,
                include_system,
                include_builtin,
                interactive,
                output_dir,
            })
            .await?
        }
        Commands::Report {
            csv,
            path,
            samba_base,
        } => commands::report_cmd(csv, path, samba_base).await?,
    }

    Ok(())
}
