use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::SystemClock;
use auth::TokenService;
use library_service::account::ports::AccountServicePort;
use library_service::account::service::AccountService;
use library_service::config::Config;
use library_service::inbound::http::router::create_router;
use library_service::outbound::repositories::InMemoryCredentialStore;
use library_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "library-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database_configured = config.database.url.is_some(),
        jwt_algorithm = %config.jwt.algorithm,
        jwt_expiration_minutes = config.jwt.expiration_minutes,
        demo_fallback = config.demo.enabled,
        "Configuration loaded"
    );

    let token_service = TokenService::new(&config.jwt.token_settings()?, Arc::new(SystemClock))?;
    let password_hasher = PasswordHasher::with_params(config.password.params())?;

    let mut authenticator = Authenticator::new(password_hasher, token_service)?;
    if let Some(account) = config.demo.account() {
        tracing::warn!(
            subject = %account.subject,
            "Demo fallback account enabled; do not use in production"
        );
        authenticator = authenticator.with_demo_fallback(account)?;
    }
    let authenticator = Arc::new(authenticator);

    let account_service: Arc<dyn AccountServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Arc::new(PostgresCredentialStore::new(pg_pool));
            Arc::new(AccountService::new(store, Arc::clone(&authenticator)))
        }
        None => {
            tracing::warn!("No database configured; credentials are kept in memory");
            let store = Arc::new(InMemoryCredentialStore::new());
            Arc::new(AccountService::new(store, Arc::clone(&authenticator)))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}
