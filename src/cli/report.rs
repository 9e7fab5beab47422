use super::run::{build_pipeline, load_aws_config, load_or_default, RunError};
use crate::config::load_config;
use crate::pipeline::{PipelineError, PipelineOutcome};
use crate::resolver::NameResolver;
use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Setup(#[from] RunError),

    #[error("Log group mapping not found for '{category}' -> '{name}'")]
    MappingNotFound { category: String, name: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a report locally without authorization or publishing.
/// Writes to `output`, or to stdout when no path is given.
pub async fn report(
    config_path: Option<PathBuf>,
    category: &str,
    name: &str,
    output: Option<&Path>,
) -> Result<(), ReportError> {
    let config = load_or_default(config_path.as_deref())?;
    let sdk_config = load_aws_config(&config.aws).await;
    let pipeline = build_pipeline(&config, &sdk_config)?;

    let outcome = pipeline.run(category, name).await.inspect_err(|e| {
        if let Some(source) = e.source() {
            error!(error = %source, "Log retrieval failed");
        }
    })?;

    let report = match outcome {
        PipelineOutcome::MappingNotFound { category, name } => {
            return Err(ReportError::MappingNotFound { category, name });
        }
        PipelineOutcome::Rendered { report, .. } => report,
    };

    match output {
        Some(path) => {
            info!(path = %path.display(), events = report.entry_count, "Writing report");
            fs::write(path, report.into_bytes())?;
        }
        None => print!("{}", report.body),
    }

    Ok(())
}

/// Print the active mapping table, one row per line
pub fn mappings(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mappings = match config_path {
        Some(path) => load_config(&path)?.mappings,
        None => None,
    };
    let resolver = NameResolver::from_config(mappings.as_deref())?;

    for mapping in resolver.entries() {
        println!("{}\t{}\t{}", mapping.category, mapping.name, mapping.group);
    }

    Ok(())
}
