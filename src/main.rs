use actix_web::{middleware::Condition, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use clap::Parser;
use flexi_logger::{FileSpec, Logger, WriteMode};
use log::{info, warn};
use model_library::{
    cache::CatalogCache,
    cli::Cli,
    client::FeedClient,
    config_manager::ConfigManager,
    request_logger::RequestLogger,
    server::{self, AppState},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.create_config {
        ConfigManager::create_default_config(&cli.config)
            .map_err(|e| anyhow::anyhow!("Failed to create config file: {}", e))?;
        println!("Created default configuration file: {}", cli.config);
        return Ok(());
    }

    let mut config_manager = ConfigManager::new(&cli.config)
        .map_err(|e| anyhow::anyhow!("Failed to load config file {}: {}", cli.config, e))?;
    config_manager.merge_with_cli_args(&cli);
    if cli.debug && cli.log_level.is_none() {
        config_manager.get_config_mut().server.log_level = "debug".to_string();
    }

    if let Err(errors) = config_manager.validate_config() {
        for error in &errors {
            eprintln!("Configuration error: {error}");
        }
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }

    let effective_config = config_manager.get_effective_config();

    let mut logger = Logger::try_with_str(&effective_config.server.log_level)?
        .write_mode(WriteMode::BufferAndFlush);
    if cli.log_to_file {
        logger = logger.log_to_file(FileSpec::default());
    } else {
        logger = logger.log_to_stderr();
    }
    let _logger = logger.start()?;

    let whitelist = effective_config.whitelist();
    match &whitelist {
        Some(list) => info!("Showing {} whitelisted providers", list.len()),
        None => warn!("Provider whitelist disabled, showing every provider"),
    }

    let client = FeedClient::with_timeout(
        effective_config.catalog.upstream_url.clone(),
        effective_config.request_timeout(),
    )
    .context("Failed to build HTTP client")?;

    let state = web::Data::new(AppState {
        catalog: CatalogCache::new(client, whitelist, effective_config.revalidate()),
        base_url: effective_config.catalog.base_url.clone(),
        page_size: effective_config.catalog.page_size,
    });

    let addr = effective_config.bind_address();
    info!("Starting model library server...");
    info!("Server is running at http://{}", addr);
    info!("Configuration Summary:");
    info!("  - Upstream feed: {}", effective_config.catalog.upstream_url);
    info!("  - Revalidate after: {}s", effective_config.catalog.revalidate_seconds);
    info!("  - Page size: {}", effective_config.catalog.page_size);
    if cli.debug {
        info!("Debug mode enabled - requests will be logged");
    }

    let debug = cli.debug;
    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(debug, RequestLogger))
            .app_data(state.clone())
            .configure(server::configure)
            .default_service(web::to(HttpResponse::NotFound))
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {addr}"))?
    .run()
    .await
    .context("Failed to run HTTP server")
}
