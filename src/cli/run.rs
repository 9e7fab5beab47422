use crate::auth::{AuthError, DuckDbUserDirectory, StaticUserDirectory, UserDirectory};
use crate::config::types::{AuthConfig, AwsConfig, Config};
use crate::config::{load_config, validate_for_serving, ConfigError};
use crate::fetch::{CloudWatchLogStore, LogFetcher};
use crate::pipeline::{ReportPipeline, ReportService};
use crate::publish::S3Publisher;
use crate::resolver::{NameResolver, ResolverError};
use crate::web::{run_server, AppState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(
        "config not found; searched ~/.config/logshare/config.yml and /etc/logshare/config.yml. \
         Use --config <path>, or run 'logshare config init' to generate one"
    )]
    ConfigNotFound,

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("mapping table error: {0}")]
    Resolver(#[from] ResolverError),

    #[error("user directory error: {0}")]
    Auth(#[from] AuthError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub async fn run(config_path: Option<PathBuf>) -> Result<(), RunError> {
    let config_path = config_path.ok_or(RunError::ConfigNotFound)?;
    serve(&config_path).await
}

/// Config for commands that can run without a file
pub(crate) fn load_or_default(config_path: Option<&Path>) -> Result<Config, RunError> {
    match config_path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(Config::default()),
    }
}

pub(crate) async fn load_aws_config(aws: &AwsConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = &aws.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &aws.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    loader.load().await
}

/// Resolver + CloudWatch fetcher + renderer, as configured
pub(crate) fn build_pipeline(
    config: &Config,
    sdk_config: &aws_config::SdkConfig,
) -> Result<ReportPipeline, RunError> {
    let resolver = NameResolver::from_config(config.mappings.as_deref())?;
    info!(mappings = resolver.entries().len(), "Mapping table loaded");

    let store = Arc::new(CloudWatchLogStore::from_sdk_config(sdk_config));
    let fetcher = LogFetcher::new(store, config.logs.max_pages);

    Ok(ReportPipeline::new(
        Arc::new(resolver),
        fetcher,
        config.logs.max_entries,
    ))
}

async fn build_directory(auth: &AuthConfig) -> Result<Arc<dyn UserDirectory>, RunError> {
    match auth {
        AuthConfig::Duckdb { path } => {
            info!(path = %path.display(), "Opening user directory");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let directory = DuckDbUserDirectory::open(path)?;
            directory.init_schema().await?;
            Ok(Arc::new(directory))
        }
        AuthConfig::Static { super_users } => {
            info!(super_users = super_users.len(), "Using static user directory");
            Ok(Arc::new(StaticUserDirectory::new(super_users.iter().copied())))
        }
    }
}

async fn serve(config_path: &Path) -> Result<(), RunError> {
    info!(config_path = %config_path.display(), "Loading configuration");
    let config = load_config(config_path)?;
    let (publish, auth) = validate_for_serving(&config)?;

    let sdk_config = load_aws_config(&config.aws).await;
    let pipeline = build_pipeline(&config, &sdk_config)?;
    let directory = build_directory(auth).await?;
    let publisher = Arc::new(S3Publisher::from_sdk_config(
        &sdk_config,
        config.aws.force_path_style,
    ));

    info!(bucket = %publish.bucket, prefix = %publish.key_prefix, "Publishing reports to S3");
    let service = ReportService::new(directory, pipeline, publisher, publish.clone());
    let state = AppState {
        service: Arc::new(service),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let web_config = config.web.clone();
    let mut web_handle = tokio::spawn(async move { run_server(state, web_config, shutdown_rx).await });

    info!("Service started, press Ctrl+C to shutdown");

    let finished = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
            None
        }
        result = &mut web_handle => Some(result),
    };

    let result = match finished {
        Some(result) => result,
        None => web_handle.await,
    };
    result??;

    info!("Shutdown complete");
    Ok(())
}
