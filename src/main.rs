use askpdf::db::{self, PgMetadataStore};
use askpdf::extract::PdfExtractor;
use askpdf::llm::provider::adapter_from_config;
use askpdf::models::AppState;
use askpdf::pipeline::Pipeline;
use askpdf::qa::AnswerGenerator;
use askpdf::storage::S3BlobStore;
use askpdf::{config::Config, routes::create_router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askpdf=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to database
    let pool = db::create_pool(&config.database).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    // Wire the pipeline: blob store, metadata store, extractor, generator
    let blobs = Arc::new(S3BlobStore::from_config(&config.storage)?);
    let metadata = Arc::new(PgMetadataStore::new(pool));
    let extractor = Arc::new(PdfExtractor::new(config.ocr.clone()));
    let adapter = adapter_from_config(&config.llm)?;
    let generator = AnswerGenerator::new(adapter, &config.llm);
    let pipeline = Arc::new(Pipeline::new(blobs, metadata, extractor, generator));

    // Create shared state
    let (events, _) = broadcast::channel(64);
    let state = AppState {
        config: config.clone(),
        pipeline,
        events,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
