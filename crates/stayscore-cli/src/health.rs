//! Health command for validating configuration and bundled assets.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use stayscore_core::{LocaleRegistry, SkillConfig, VisualTemplates};

#[derive(Parser, Debug)]
pub struct HealthArgs {
    /// Suppress passing checks; print only warnings and failures
    #[arg(short, long)]
    pub quiet: bool,
}

/// Outcome of one check.
#[derive(Debug, PartialEq)]
enum Status {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug)]
struct Check {
    status: Status,
    message: String,
}

impl Check {
    fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

fn run_checks(config: &SkillConfig) -> Vec<Check> {
    let mut checks = Vec::new();

    match LocaleRegistry::from_config(&config.skill) {
        Ok(registry) => {
            let locales = registry.locales();
            if registry.default_bundle().is_some() {
                checks.push(Check::new(
                    Status::Pass,
                    format!("locale bundles: {}", locales.join(", ")),
                ));
            } else {
                checks.push(Check::new(
                    Status::Fail,
                    format!("no bundle for default locale {}", config.skill.default_locale),
                ));
            }
        }
        Err(e) => checks.push(Check::new(Status::Fail, format!("locale bundles: {e}"))),
    }

    match VisualTemplates::load() {
        Ok(_) => checks.push(Check::new(Status::Pass, "visual templates")),
        Err(e) => checks.push(Check::new(Status::Fail, format!("visual templates: {e}"))),
    }

    checks.extend(
        config
            .validate()
            .into_iter()
            .map(|w| Check::new(Status::Warn, w)),
    );
    checks
}

pub fn execute(config: &SkillConfig, args: HealthArgs) -> Result<()> {
    let checks = run_checks(config);

    for check in &checks {
        match check.status {
            Status::Pass if args.quiet => {}
            Status::Pass => println!("{} {}", "✓".green(), check.message),
            Status::Warn => println!("{} {}", "!".yellow(), check.message),
            Status::Fail => println!("{} {}", "✗".red(), check.message),
        }
    }

    let failures = checks.iter().filter(|c| c.status == Status::Fail).count();
    let warnings = checks.iter().filter(|c| c.status == Status::Warn).count();
    if failures > 0 {
        anyhow::bail!("{failures} health check(s) failed");
    }
    if warnings == 0 {
        println!("{}", "System OK".green().bold());
    } else {
        println!("{}", format!("System OK with {warnings} warning(s)").yellow());
    }
    Ok(())
}
