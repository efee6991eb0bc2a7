mod cli;

use cinegate::config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use metrics_exporter_prometheus::PrometheusBuilder;

async fn serve(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting cinegate");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("Upstream: {}", config.upstream.api_url);

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    };

    cg_server::start(config, metrics).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cinegate=trace,cg_server=trace,cg_tmdb=trace,cg_cache=debug,cg_core=debug,tower_http=debug".to_string()
        } else {
            "cinegate=info,cg_server=info,cg_tmdb=info,cg_cache=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("cinegate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => println!("Validating config: {:?}", p),
        None => println!("No config file specified, checking default locations"),
    }

    let config = config::load_config_or_default(path)?;
    let warnings = config.validate();

    println!("✓ Configuration loaded");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Upstream: {}", config.upstream.api_url);
    println!(
        "  API key: {}",
        if config.upstream.api_key.is_empty() {
            "missing"
        } else {
            "set"
        }
    );
    println!(
        "  Cache TTL: {} days (reference data {} days)",
        config.cache.default_ttl_days, config.cache.reference_ttl_days
    );
    println!(
        "  Locale fallback: {} / {}",
        config.locale.default_language, config.locale.default_region
    );

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
