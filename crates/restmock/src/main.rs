use anyhow::Context;
use clap::Parser;
use restmock::config::Config;
use restmock::rest::RouteRegistry;
use restmock::server::{self, MockServer};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "restmock", version, about = "Declarative REST mock server")]
struct Args {
    /// Configuration file (.json, otherwise YAML)
    #[arg(short, long, env = "RESTMOCK_CONFIG")]
    config: PathBuf,

    /// Listen port, overrides the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// Listen address, overrides the configuration file
    #[arg(long)]
    host: Option<IpAddr>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Compile the configuration, print the route table and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let table = config
        .compile()
        .with_context(|| format!("invalid configuration in {}", args.config.display()))?;

    if args.check {
        print!("{}", table);
        println!("{} routes OK", table.len());
        return Ok(());
    }

    let host = args.host.unwrap_or(config.listen.host);
    let port = args.port.unwrap_or(config.listen.port);

    info!(
        "Loaded {} routes from {}",
        table.len(),
        args.config.display()
    );
    let registry = Arc::new(RouteRegistry::new(table));
    let server = MockServer::bind(SocketAddr::new(host, port), Arc::clone(&registry)).await?;
    let shutdown_tx = server.shutdown_sender();

    if config.metrics.enabled {
        let metrics_addr = SocketAddr::new(host, config.metrics.port);
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = server::serve_metrics(metrics_addr, shutdown_rx).await {
                error!("Metrics endpoint failed: {:#}", e);
            }
        });
    }

    #[cfg(unix)]
    let _reload = server::spawn_reload_on_sighup(
        Arc::clone(&registry),
        args.config.clone(),
        shutdown_tx.subscribe(),
    )?;

    let serving = tokio::spawn(server.run());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
    serving.await.context("server task panicked")?;

    Ok(())
}
