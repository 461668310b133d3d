use airskill_config::AirskillConfig;
use airskill_discovery::{ProbeMode, ProbeOutcome, run_discovery};

pub(super) async fn cmd_discover(config: AirskillConfig, no_probe: bool) -> airskill_core::Result<i32> {
    let mode = if no_probe {
        ProbeMode::Off
    } else {
        ProbeMode::FromConfig
    };
    let outcome = run_discovery(&config, mode).await?;
    let report = &outcome.report;

    println!("Expected links (from the skills tree): {}", report.expected.len());
    if report.missing.is_empty() {
        println!("✅ PASS (manifest): every expected link appears in the manifest or a group index.");
    } else {
        eprintln!("❌ FAIL (manifest): the published text does not list these links:");
        for url in &report.missing {
            eprintln!("   {url}");
        }
    }
    if !report.generic_groups.is_empty() {
        eprintln!(
            "❌ FAIL (group summaries): generic summary on {}; an agent cannot tell what the group is for.",
            report.generic_groups.join(", ")
        );
    }

    match &report.probe {
        ProbeOutcome::Skipped(reason) => println!("   Probe skipped: {reason}"),
        ProbeOutcome::Failed(err) => eprintln!("⚠️  Probe error (advisory): {err}"),
        ProbeOutcome::Completed { found, missing, extra } => {
            println!("   Probe reported {} links", found.len());
            if !missing.is_empty() {
                eprintln!("⚠️  Probe missed {} expected links (advisory)", missing.len());
            }
            if !extra.is_empty() {
                eprintln!("⚠️  Probe reported {} links outside the skills tree (advisory)", extra.len());
            }
        }
    }

    println!(
        "Result written to: {} and {}",
        outcome.markdown.display(),
        outcome.csv.display()
    );
    Ok(outcome.exit_code())
}
