use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lilac_api::{
    app,
    state::{AppState, AuthConfig},
};
use lilac_core::mailer::Mailer;
use lilac_core::repository::AccountRepository;
use lilac_holds::{HoldRepository, HoldSweeper};
use lilac_onboard::{BackfillWorkflow, OnboardingWorkflow};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lilac_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = lilac_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Lilac API on port {}", config.server.port);

    // Document store
    let db = lilac_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let accounts: Arc<dyn AccountRepository> =
        Arc::new(lilac_store::StoreAccountRepository::new(db.pool.clone()));
    let holds: Arc<dyn HoldRepository> =
        Arc::new(lilac_store::StoreHoldRepository::new(db.pool.clone()));

    // External collaborators
    let mailer: Arc<dyn Mailer> = Arc::new(
        lilac_store::SendGridMailer::new(&config.email).expect("Failed to build mail client"),
    );
    let events = Arc::new(
        lilac_store::EventProducer::new(&config.kafka.brokers)
            .expect("Failed to create Kafka producer"),
    );

    // Workflows
    let onboarding = Arc::new(OnboardingWorkflow::new(
        accounts.clone(),
        mailer,
        config.booking.base_url.clone(),
        config.email.from_address.clone(),
    ));
    let backfill = Arc::new(BackfillWorkflow::new(
        accounts.clone(),
        config.booking.base_url.clone(),
    ));
    let sweeper = Arc::new(HoldSweeper::new(holds).with_page_size(config.sweeper.page_size));

    // Background units of work
    tokio::spawn(lilac_api::scheduler::start_sweeper_loop(
        sweeper,
        Duration::from_secs(config.sweeper.interval_seconds),
        Duration::from_secs(config.sweeper.run_timeout_seconds),
    ));
    tokio::spawn(lilac_api::worker::start_onboarding_worker(
        config.kafka.brokers.clone(),
        config.kafka.group_id.clone(),
        config.kafka.accounts_topic.clone(),
        onboarding,
        events,
    ));

    let app_state = AppState {
        backfill,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
