use std::path::Path;
use tracing::info;

use airskill_config::AirskillConfig;
use airskill_core::AirskillError;
use airskill_ingest::IngestPipeline;

pub(super) async fn cmd_ingest(
    config: AirskillConfig,
    repo: &Path,
    group: Option<&str>,
    config_path: &Path,
) -> airskill_core::Result<()> {
    println!("Gathering repository context and distilling skills...");
    let outcome = match IngestPipeline::new(config).run(repo, group).await {
        Ok(outcome) => outcome,
        Err(AirskillError::Structural { message, excerpt }) => {
            eprintln!("Could not parse any skills; check the response format. Raw response:");
            eprintln!("{excerpt}");
            return Err(AirskillError::Structural { message, excerpt });
        }
        Err(e) => return Err(e),
    };

    println!("Parsed {} skills into group '{}':", outcome.written.len(), outcome.group);
    for path in &outcome.written {
        println!("  📝 {}", path.display());
    }

    println!("Rebuilding the manifest...");
    rebuild(config_path).await?;
    println!("✅ Done. New skill group: {} -> {}", outcome.group, outcome.index_link);
    Ok(())
}

/// Run `airskill build` as a child of the current executable.
async fn rebuild(config_path: &Path) -> airskill_core::Result<()> {
    let exe = std::env::current_exe()?;
    run_build(&exe, config_path).await
}

/// Run `<exe> build --config <config_path>`; a non-zero exit is an error.
async fn run_build(exe: &Path, config_path: &Path) -> airskill_core::Result<()> {
    info!(exe = ?exe, config = ?config_path, "running build");
    let status = tokio::process::Command::new(exe)
        .arg("build")
        .arg("--config")
        .arg(config_path)
        .status()
        .await
        .map_err(|e| AirskillError::io_at(exe, e))?;
    if !status.success() {
        return Err(AirskillError::Other(anyhow::anyhow!(
            "`airskill build` failed ({status})"
        )));
    }
    Ok(())
}
