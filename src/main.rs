use clap::Parser;
use cookmate::{
    api::{handlers::AppState, routes},
    assistant,
    cli::{commands, Cli, Commands},
    config::Settings,
    corpus, db,
    dietary::{tagger, DietaryLexicon, TaggingMode},
    ranking,
    utils::sanitize::clamp_limit,
    Error, Result,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cookmate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => serve(settings, port, host).await?,
        Commands::Migrate => migrate(settings).await?,
        Commands::Import { file } => import(settings, file).await?,
        Commands::Tag {
            dry,
            write,
            batch_size,
        } => tag(settings, TaggingMode::from_flags(dry, write), batch_size).await?,
        Commands::CheckTags { tag } => check_tags(settings, tag).await?,
        Commands::Ask { message } => ask(settings, message.join(" ")).await?,
        Commands::Match { items, limit } => match_pantry(settings, items, limit).await?,
    }

    Ok(())
}

/// Open the pool and bring the schema up to date
async fn open_store(settings: &Settings) -> Result<db::DbPool> {
    let pool = db::init_pool_with_config(&settings.database).await?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}

fn load_lexicon(settings: &Settings) -> Result<DietaryLexicon> {
    DietaryLexicon::load(settings.lexicon.path.as_deref())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Cookmate server");
    info!("Database: {}", settings.database.url);

    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    let lexicon = Arc::new(load_lexicon(&settings)?);

    let state = AppState {
        pool,
        lexicon,
        settings: settings.clone(),
    };

    let app = routes::create_router(state, &settings)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Cookmate Server");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  POST /api/assistant");
    println!("  POST /api/search/by-ingredients");
    println!("  GET  /api/tags");
    println!("  GET  /api/tags/counts");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn migrate(settings: Settings) -> Result<()> {
    info!("Running database migrations");

    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    println!("\u{2713} Database migrations completed successfully");
    Ok(())
}

async fn import(settings: Settings, file: PathBuf) -> Result<()> {
    let pool = open_store(&settings).await?;
    let report = corpus::import_file(&pool, &file).await?;
    commands::print_import_report(&report);
    Ok(())
}

async fn tag(settings: Settings, mode: TaggingMode, batch_size: Option<usize>) -> Result<()> {
    if mode == TaggingMode::Guidance {
        commands::print_tagging_guidance();
        return Ok(());
    }

    // Setup failures abort before anything is written
    let lexicon = load_lexicon(&settings)?;
    let pool = open_store(&settings).await?;
    let batch_size = batch_size.unwrap_or(settings.tagging.batch_size);

    match tagger::run(&pool, &lexicon, mode, batch_size).await {
        Ok(report) => {
            commands::print_tagging_report(&report);
            Ok(())
        }
        Err(e) => {
            if e.is_corpus_unavailable() {
                error!("Dietary tagging aborted, corpus unavailable: {}", e.log_safe());
            } else {
                error!("Dietary tagging aborted: {}", e.log_safe());
            }
            Err(e)
        }
    }
}

async fn check_tags(settings: Settings, tag: Option<String>) -> Result<()> {
    let pool = open_store(&settings).await?;
    commands::check_tags(&pool, tag.as_deref()).await
}

async fn ask(settings: Settings, message: String) -> Result<()> {
    let lexicon = load_lexicon(&settings)?;
    let pool = open_store(&settings).await?;

    let reply = assistant::suggest(&pool, &lexicon, &settings.assistant, &message).await?;
    commands::print_reply(&reply);
    Ok(())
}

async fn match_pantry(settings: Settings, items: Vec<String>, limit: Option<i64>) -> Result<()> {
    let pool = open_store(&settings).await?;

    let pantry: Vec<String> = items
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .take(settings.ranking.max_pantry_items)
        .collect();
    let limit = clamp_limit(
        limit,
        settings.ranking.default_limit,
        settings.ranking.max_limit,
    );

    let results = ranking::top_matches(&pool, &pantry, limit).await?;
    commands::print_matches(&results);
    Ok(())
}
