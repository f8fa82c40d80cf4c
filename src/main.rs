use amora::{config::ServerConfig, context::AppContext, error::AmoraResult, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AmoraResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| "amora=debug,tower_http=debug".into());
    if config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    print_banner();

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
     _
    /_\  _ __  ___ _ _ __ _
   / _ \| '  \/ _ \ '_/ _` |
  /_/ \_\_|_|_\___/_| \__,_|

        Dating app backend v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
