use anyhow::Result;
use clap::Parser;
use ddns_gateway::{api, config::Config};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "ddns-gateway")]
#[command(about = "A dyndns2-compatible gateway that updates Cloudflare DNS records")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration first (before logger init)
    let config = Config::load(&args.config)?;

    // Initialize logger with config log level (env var takes precedence)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.server.log_level),
    )
    .init();

    info!("Loading configuration from: {}", args.config);
    info!("Upstream API base: {}", config.cloudflare.api_base);

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create router
    let app = api::create_router(config);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);
    info!("DDNS endpoints: /nic/update, /update, /auth/dynamic.html");

    axum::serve(listener, app).await?;

    Ok(())
}
