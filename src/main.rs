//! tapvote - questionnaire API server.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tapvote::{
    config::Config,
    create_router,
    server::{AuthGate, RouterConfig, API_BASE},
    IdentityToolkitVerifier, QuestionnaireService, RealtimeDatabase,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    if config.check {
        run_check(config).await
    } else {
        run_serve(config).await
    }
}

// =============================================================================
// Serve
// =============================================================================

async fn run_serve(config: Config) -> ExitCode {
    let (database, verifier) = match build_collaborators(&config) {
        Ok(collaborators) => collaborators,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  Database: {}", database.base_url());
    info!("  Identity endpoint: {}", verifier.lookup_url());
    if config.database_secret.is_none() {
        warn!("  No database secret: store requests are subject to security rules");
    }

    // Reachability is informational only; requests fail individually with 500.
    match database.ping().await {
        Ok(()) => info!("  Database reachable"),
        Err(e) => warn!("  Database not reachable yet: {}", e),
    }

    let router_config = build_router_config(&config);
    let router = create_router(
        QuestionnaireService::new(database),
        AuthGate::new(verifier),
        router_config,
    );

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("tapvote server started on http://{}{}", addr, API_BASE);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Build the store and verifier clients from validated configuration.
fn build_collaborators(
    config: &Config,
) -> Result<(RealtimeDatabase, IdentityToolkitVerifier), String> {
    let database_url = config.database_url()?;
    let identity_endpoint = config.identity_endpoint()?;

    let client = reqwest::Client::new();
    let database =
        RealtimeDatabase::with_client(client.clone(), &database_url, config.database_secret.clone());
    let verifier =
        IdentityToolkitVerifier::with_client(client, &identity_endpoint, config.api_key.clone());

    Ok((database, verifier))
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tapvote=debug,tower_http=debug"
    } else {
        "tapvote=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Check
// =============================================================================

async fn run_check(config: Config) -> ExitCode {
    println!("tapvote configuration check");
    println!("═══════════════════════════");
    println!();

    let (database, verifier) = match build_collaborators(&config) {
        Ok(collaborators) => collaborators,
        Err(e) => {
            println!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("✓ Database: {}", database.base_url());
    println!("✓ Identity endpoint: {}", verifier.lookup_url());
    println!();

    print!("Testing database connection... ");
    match database.ping().await {
        Ok(()) => println!("✓ success"),
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            println!();
            println!("Please check:");
            println!("  - The database URL '{}' is correct", database.base_url());
            if config.database_secret.is_some() {
                println!("  - The database secret is valid");
            } else {
                println!("  - The security rules allow reading the root, or set DATABASE_SECRET");
            }
            return ExitCode::FAILURE;
        }
    }

    println!();
    println!("═══════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}
