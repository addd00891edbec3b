//! `stayscore locale`: print a localized prompt.

use anyhow::{Context, Result};
use clap::Parser;
use stayscore_core::{LocaleRegistry, SkillConfig};
use std::fmt::Display;

#[derive(Parser, Debug)]
pub struct LocaleArgs {
    /// Translation key, e.g. WELCOME_PROMPT
    pub key: String,

    /// Values substituted into the prompt's placeholders
    pub args: Vec<String>,

    /// Locale tag (default: skill.default_locale)
    #[arg(short, long, value_name = "TAG")]
    pub locale: Option<String>,
}

fn render(registry: &LocaleRegistry, args: &LocaleArgs) -> String {
    let values: Vec<&dyn Display> = args.args.iter().map(|a| a as &dyn Display).collect();
    registry
        .translator(args.locale.as_deref())
        .translate(&args.key, &values)
}

pub fn execute(config: &SkillConfig, args: LocaleArgs) -> Result<()> {
    let registry =
        LocaleRegistry::from_config(&config.skill).context("Failed to load locale bundles")?;
    println!("{}", render(&registry, &args));
    Ok(())
}
