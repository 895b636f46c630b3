use trivia_api::configuration::get_configuration;
use trivia_api::db;
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = get_configuration()?;
    let pool = db::establish_connection(&settings.database.path).await?;
    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;
    run_server(pool, &settings.application.address()).await
}
