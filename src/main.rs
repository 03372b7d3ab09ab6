use task_crud_api::config::AppConfig;
use task_crud_api::infrastructure::RepositoryFactory;
use task_crud_api::logging::init_tracing;
use task_crud_api::routes::create_router;
use task_crud_api::server;
use task_crud_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the process environment
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::from_env()?;

    init_tracing(config.log_format);

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let task_repository = RepositoryFactory::new(config.repository.clone())
        .create()
        .await
        .map_err(|error| anyhow::anyhow!("Failed to initialize task store: {error}"))?;

    let state = AppState::new(task_repository, config.environment);

    server::serve(&config, create_router(state)).await
}
