use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser as _;
use hadith_api::config::ApiConfig;
use hadith_api::core::store::CatalogStore;
use hadith_api::server::ServerBuilder;
use hadith_api::storage::InMemoryCatalog;

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
struct Cli {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.bind`.
    #[arg(long)]
    bind: Option<String>,

    /// JSON dataset for the in-memory catalog, overrides `storage.dataset`.
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    hadith_api::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let config = load_config(&cli)?;
    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "catalog store ready");

    ServerBuilder::new()
        .with_shared_store(store)
        .with_config(config)
        .serve()
        .await
        .context("serve")
}

fn load_config(cli: &Cli) -> anyhow::Result<ApiConfig> {
    let config = match &cli.config {
        Some(path) => ApiConfig::from_yaml_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ApiConfig::default(),
    };

    let mut config = config
        .with_env_overrides(std::env::vars())
        .context("apply environment overrides")?;

    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(dataset) = &cli.dataset {
        config.storage.dataset = Some(dataset.clone());
    }

    config.validate().context("validate config")?;
    Ok(config)
}

async fn open_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn CatalogStore>> {
    if let Some(store) = open_database(config).await? {
        return Ok(store);
    }

    if let Some(path) = &config.storage.dataset {
        let catalog = InMemoryCatalog::from_json_file(path)
            .with_context(|| format!("load dataset {}", path.display()))?;
        return Ok(Arc::new(catalog));
    }

    tracing::warn!("no dataset configured, serving an empty catalog");
    Ok(Arc::new(InMemoryCatalog::default()))
}

#[cfg(feature = "mysql")]
async fn open_database(config: &ApiConfig) -> anyhow::Result<Option<Arc<dyn CatalogStore>>> {
    let Some(url) = &config.storage.database_url else {
        return Ok(None);
    };
    let catalog = hadith_api::storage::MysqlCatalog::connect(url)
        .await
        .context("connect to MySQL")?;
    Ok(Some(Arc::new(catalog)))
}

#[cfg(not(feature = "mysql"))]
async fn open_database(config: &ApiConfig) -> anyhow::Result<Option<Arc<dyn CatalogStore>>> {
    if config.storage.database_url.is_some() {
        tracing::warn!("database_url is set but the mysql feature is not enabled");
    }
    Ok(None)
}
