// floe/src/commands/score.rs
//
// USE CASE: score executed quality checks without a full validation run.

use anyhow::Context;
use std::path::PathBuf;

use floe_core::domain::quality::QualityScorer;
use floe_core::infrastructure::config::{load_governance_config, load_quality_results};

pub fn execute(results: PathBuf, project_dir: PathBuf, format: &str) -> anyhow::Result<bool> {
    let config = load_governance_config(&project_dir)
        .with_context(|| format!("Failed to load governance configuration from {:?}", project_dir))?;
    let checks = load_quality_results(&results).with_context(|| format!("Failed to load {:?}", results))?;

    let scorer = QualityScorer::new(config.scoring).context("Invalid scoring configuration")?;
    let score = scorer.score(&checks);
    let gates = scorer.gate(&score, "quality");

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        println!("Quality score: {:.1} ({} checks)", score.overall, score.checks);
        for (dimension, value) in &score.per_dimension {
            println!("  {:<14} {:>5.1}", dimension, value);
        }
        for warning in &score.warnings {
            eprintln!("warning: {}", warning);
        }
    }
    for gate in &gates {
        eprintln!("{}", gate);
    }

    Ok(gates.iter().all(|v| !v.is_error()))
}
