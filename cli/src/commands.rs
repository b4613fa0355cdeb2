use std::path::PathBuf;

use app::audit::{AuditRequest, Auditor, InputProvider};
use app::extract::ExtractOptions;
use app::progress::{ProgressConfig, ProgressManager};
use app::report::{to_samba_path, PermissionReport};
use utils::app_config::AppConfig;
use utils::error::{Error, Result};

use crate::input::PromptInput;

pub struct ScanArgs {
    pub path: Option<PathBuf>,
    pub include_inherited: bool,
    pub include_system: bool,
    pub include_builtin: bool,
    pub interactive: bool,
    pub output_dir: Option<PathBuf>,
}

/// Runs a blocking closure on tokio's blocking pool.
async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| Error::with_source("background task failed", Box::new(e)))?
}

pub async fn scan_cmd(args: ScanArgs) -> Result<()> {
    let config = AppConfig::fetch()?;

    // Config supplies defaults, flags can only switch rules on
    let options = ExtractOptions {
        include_inherited: args.include_inherited || config.scan.include_inherited,
        include_system: args.include_system || config.scan.include_system,
        include_builtin: args.include_builtin || config.scan.include_builtin,
    };

    let mut auditor = Auditor::from_config(&config);
    if let Some(dir) = args.output_dir {
        auditor = auditor.with_output_dir(dir);
    }

    let summary = blocking(move || {
        let request = match args.path {
            Some(root) if !args.interactive => AuditRequest { root, options },
            path => PromptInput::stdio(path, options).request()?,
        };

        let progress = ProgressManager::with_config(&ProgressConfig::all_enabled());
        auditor.run(&request, &progress)
    })
    .await?;

    match &summary.permissions_report {
        Some(path) => println!("Permissions exported to {}", path.display()),
        None => println!("No permissions found to export."),
    }
    if let Some(path) = &summary.skip_report {
        println!(
            "{} locations could not be audited, see {}",
            summary.skipped,
            path.display()
        );
    }

    Ok(())
}

pub async fn report_cmd(
    csv: PathBuf, path: Option<String>, samba_base: Option<PathBuf>,
) -> Result<()> {
    log::info!("Reading permissions report {}", csv.display());
    let report = blocking(move || PermissionReport::from_path(&csv)).await?;

    match path {
        None => {
            println!("Audited paths:");
            for (index, audited) in report.paths().enumerate() {
                let count = report.rows_for(audited).len();
                match &samba_base {
                    Some(base) => println!(
                        "{}. {} ({} entries) -> {}",
                        index + 1,
                        audited,
                        count,
                        to_samba_path(audited, base).display()
                    ),
                    None => println!("{}. {} ({} entries)", index + 1, audited, count),
                }
            }
        }
        Some(selected) => {
            let rows = report.rows_for(&selected);
            if rows.is_empty() {
                return Err(Error::new(format!(
                    "{} does not appear in the report",
                    selected
                )));
            }

            println!("Permissions for {}", selected);
            if let Some(base) = &samba_base {
                println!("Samba path: {}", to_samba_path(&selected, base).display());
            }
            for row in rows {
                println!(
                    "  {} {}: {} (inherited: {}, inheritance: {}, propagation: {})",
                    row.principal,
                    if row.access_control_type.is_empty() {
                        "Allow"
                    } else {
                        row.access_control_type.as_str()
                    },
                    row.permissions,
                    row.inherited,
                    row.inheritance_flags,
                    row.propagation_flags
                );
            }
        }
    }

    Ok(())
}
