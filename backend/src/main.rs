//! Football Lore Backend
//!
//! Story submissions, paid priority boosts and vote credits, persisted in flat JSON documents.

mod api;
mod config;
mod errors;
mod models;
mod payments;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use payments::{CheckoutPlanner, PaymentProvider, StripeCheckout};
use store::{CreditLedger, StoryStore, VoteService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub stories: Arc<StoryStore>,
    pub ledger: Arc<CreditLedger>,
    pub votes: VoteService,
    pub checkout: Arc<CheckoutPlanner>,
    pub payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    pub fn new(
        stories: Arc<StoryStore>,
        ledger: Arc<CreditLedger>,
        checkout: CheckoutPlanner,
        payments: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            votes: VoteService::new(stories.clone(), ledger.clone()),
            stories,
            ledger,
            checkout: Arc::new(checkout),
            payments,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Starting Football Lore Backend");
    tracing::info!("Stories path: {:?}", config.stories_path);
    tracing::info!("Credits path: {:?}", config.credits_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Checkout endpoints answer with a provider error until a key is configured
    if config.stripe_secret_key.is_none() {
        tracing::warn!("No payment provider key configured (STRIPE_SECRET_KEY). Checkout is disabled!");
    }

    // Open stores; an unreadable document stops startup instead of being overwritten later
    let stories = Arc::new(StoryStore::open(&config.stories_path).await?);
    let ledger = Arc::new(CreditLedger::open(&config.credits_path).await?);
    let story_count = stories.list_stories().await?.len();
    let account_count = ledger.account_count().await?;
    tracing::info!(
        "Loaded {} stories and {} credit accounts",
        story_count,
        account_count
    );

    let payments = Arc::new(StripeCheckout::new(
        &config.stripe_api_base,
        config.stripe_secret_key.clone(),
        config.payment_timeout,
    )?);

    // Create application state
    let state = AppState::new(
        stories,
        ledger,
        CheckoutPlanner::from_config(&config),
        payments,
    );

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // The frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Stories
        .route("/stories", get(api::list_stories))
        .route("/stories/{id}", get(api::get_story))
        .route("/submit-story", post(api::submit_story))
        // Vote credits
        .route("/vote-pack-status", get(api::vote_pack_status))
        .route("/add-vote-credits", post(api::add_vote_credits))
        .route("/use-vote-credit", post(api::use_vote_credit))
        // Checkout
        .route("/create-checkout-session", post(api::create_checkout_session))
        .route("/create-vote-pack-session", post(api::create_vote_pack_session));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
