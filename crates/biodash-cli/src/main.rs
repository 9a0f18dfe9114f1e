//! biodash command-line entry point

mod args;
mod formatter;

use anyhow::{Context, Result};
use args::{Cli, Command};
use biodash_catalog::{CatalogQuery, Dashboard, Role};
use biodash_core::DashConfig;
use biodash_server::create_router;
use biodash_session::{
    CONNECT_FAILED_MESSAGE, CONNECT_OK_MESSAGE, CreateRequest, InMemorySessionService,
    SessionService, attempt_connect, dashboard_for,
};
use biodash_store::{Store, store_for};
use clap::Parser;
use formatter::OutputFormatter;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    biodash_telemetry::init_telemetry("warn,biodash=info,tower_http=info");

    let code = match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    };

    biodash_telemetry::shutdown_telemetry();
    code
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    let store = store_for(config.database.backend);
    let out = OutputFormatter::new(cli.format);

    let text = match cli.command {
        Command::Serve { bind } => return serve(&config, store, bind).await,
        Command::Queries { role } => {
            let roles = match role {
                Some(role) => vec![role],
                None => Role::ALL.to_vec(),
            };
            out.format_catalog(&roles)?
        }
        Command::Connect => {
            connect(&config, store).await?;
            out.format_message(CONNECT_OK_MESSAGE)?
        }
        Command::Search { term } => {
            let dashboard = connect(&config, store).await?;
            out.format_result(&dashboard.search(&term).await?)?
        }
        Command::View {
            role,
            query,
            domains,
        } => {
            let query = CatalogQuery::resolve(role, &query)?;
            let dashboard = connect(&config, store).await?;
            out.format_view(&dashboard.run_query(query, &domains).await?)?
        }
        Command::Organisms => {
            let dashboard = connect(&config, store).await?;
            out.format_names(&dashboard.organism_names().await?)?
        }
        Command::Profile { name } => {
            let dashboard = connect(&config, store).await?;
            let profile = dashboard.organism_profile(&name).await?;
            out.format_view(&profile.into_view())?
        }
    };

    print!("{}", text);
    Ok(())
}

/// Run the connect attempt for a fresh session and hand back its dashboard
async fn connect(config: &DashConfig, store: Arc<dyn Store>) -> Result<Dashboard> {
    let sessions = InMemorySessionService::new();
    let session = sessions.create(&CreateRequest::default()).await?;

    if let Err(e) = attempt_connect(
        session.as_ref(),
        store.as_ref(),
        config.database.connection_parameters(),
    )
    .await
    {
        anyhow::bail!("{} ({})", CONNECT_FAILED_MESSAGE, e);
    }

    Ok(dashboard_for(session.as_ref(), store)?)
}

async fn serve(config: &DashConfig, store: Arc<dyn Store>, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.server.bind_address());
    let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
    let app = create_router(store, sessions, config.database.connection_parameters());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        address = %addr,
        backend = ?config.database.backend,
        "biodash API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
