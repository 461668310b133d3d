use airskill_config::AirskillConfig;
use airskill_skills::{BuildReport, ManifestBuilder, SummarySource};

pub(super) async fn cmd_build(config: AirskillConfig) -> airskill_core::Result<()> {
    let report = ManifestBuilder::new(config).build().await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &BuildReport) {
    for group in &report.groups {
        let source = match group.source {
            SummarySource::Overview => "overview",
            SummarySource::Generated => "generated",
        };
        println!(
            "  📁 {} ({} skills, {} summary): {}",
            group.name, group.skills, source, group.summary
        );
    }
    println!(
        "✅ Built {} ({} root skills, {} groups)",
        report.output.display(),
        report.root_skills,
        report.groups.len()
    );
    if let Some(cname) = &report.cname {
        println!("   CNAME: {}", cname.display());
    }
}
