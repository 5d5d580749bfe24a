use coin_gateway::infrastructure::config::GatewayConfig;
use coin_gateway::{Gateway, GatewayServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Coin Gateway - custodial multi-coin accounting gateway

USAGE:
    coin-gateway [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0, ignored with --config)
    PORT                Server port (default: 8080, ignored with --config)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults, no coins configured
    coin-gateway

    # Run with config file
    coin-gateway --config gateway.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coin_gateway=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let gateway = if let Some(path) = config_path {
        tracing::info!("loading configuration from: {}", path);
        let config = GatewayConfig::from_file(&path)?;
        tracing::info!("coins configured: {}", config.coins.len());
        tracing::info!("api users configured: {}", config.api_users.len());

        Gateway::from_config(config).await?
    } else {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        tracing::warn!("no --config given: starting with an empty coin list");
        Gateway::new(GatewayServerConfig { host, port }, String::new(), None)
    };

    tracing::info!("starting coin gateway");
    tracing::info!("REST API: http://{}:{}/", gateway.server.host, gateway.server.port);

    gateway.run().await
}
