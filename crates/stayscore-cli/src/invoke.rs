//! One-shot invocation: envelope in, response envelope out.

use anyhow::{Context, Result};
use clap::Parser;
use stayscore_core::{Skill, SkillConfig};
use stayscore_proto::{RequestEnvelope, ResponseEnvelope};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

#[derive(Parser, Debug)]
pub struct InvokeArgs {
    /// Request envelope JSON file (default: stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print the response on a single line
    #[arg(long)]
    pub compact: bool,
}

pub async fn execute(config: SkillConfig, args: InvokeArgs) -> Result<()> {
    let envelope = read_envelope(args.file.as_deref()).await?;
    let response = run(config, envelope).await?;

    let out = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{out}");
    Ok(())
}

async fn read_envelope(path: Option<&Path>) -> Result<RequestEnvelope> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read request envelope from stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("Input is not a valid request envelope")
}

/// Answers one envelope and waits for any staff alerts it raised.
async fn run(config: SkillConfig, envelope: RequestEnvelope) -> Result<ResponseEnvelope> {
    let (skill, worker) = Skill::builder(config)
        .build()
        .context("Failed to build skill")?;
    let result = skill.invoke(envelope).await;

    drop(skill);
    worker.drain().await;

    result.context("Request was not handled")
}
