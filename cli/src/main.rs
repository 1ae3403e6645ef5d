mod cli;
mod commands;
mod fetch_ui;
mod format;
mod output;

use clap::Parser;
use commands::AppContext;
use env_logger::Env;
use log::debug;
use std::sync::Arc;
use tagmarks::config::Config;
use tagmarks::error::Result;
use tagmarks::fetch::HttpMetadataSource;
use tagmarks::models::Owner;
use tagmarks::store::SqliteStore;
use tagmarks::sync::Reconciler;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if args.version {
        println!("tagmarks {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cfg = if let Some(config_path) = &args.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load()
    };

    let db_path = args.db.clone().unwrap_or_else(|| cfg.database_path());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Using database {}", db_path.display());

    let store = Arc::new(SqliteStore::open(&db_path)?);
    let owner = Owner::new(args.user.clone().unwrap_or_else(|| cfg.owner.clone()));

    let mut reconciler = Reconciler::new(store);
    reconciler.sign_in(owner).await?;

    let metadata = HttpMetadataSource::from_config(&cfg)?;
    let ctx = AppContext {
        reconciler: &reconciler,
        config: &cfg,
        metadata: &metadata,
        no_color: args.nc,
    };

    let result = cli::handle_args(args, &ctx).await;
    reconciler.sign_out();
    result
}
