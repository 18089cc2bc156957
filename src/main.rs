use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wumpbot::Game;
use wumpbot::infra::{Config, DefaultObserver, HttpConnection};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wumpbot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("WUMPUS_CONFIG").ok())
        .map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    tracing::info!(
        parallel = config.parallel,
        max_plan_length = config.max_plan_length,
        single_request = config.single_request,
        "Loaded configuration"
    );

    let connection = HttpConnection::new(config.act_url())?;
    let mut game = Game::new(connection, DefaultObserver, &config);
    game.run().await?;

    Ok(())
}
