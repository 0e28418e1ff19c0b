//! The `rule-server` binary: wires a `RuleStore` + `RuleEngine` behind the
//! thin HTTP veneer in [`router`], grounded in the teacher's
//! `agent_server::main` wiring shape (open storage, build config from
//! env, bind, serve). Business logic lives entirely in `rule-engine` and
//! its dependents; this binary only assembles and listens.

mod error;
mod event_source;
mod metrics;
mod router;

use router::AppState;
use rule_engine::{EngineConfig, RuleEngine};
use rule_store::RuleStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let db_path = std::env::var("RULE_ENGINE_DB_PATH").unwrap_or_else(|_| "rules.db".into());
    let store = RuleStore::open(db_path)?;
    let config = EngineConfig::from_env();
    let engine = Arc::new(RuleEngine::new(store, config));

    let (_event_tx, event_source) = event_source::event_channel(256);
    let consumer_engine = engine.clone();
    tokio::spawn(event_source::run_consumer(event_source, consumer_engine));

    let app = router::app(AppState::new(engine));
    let bind_addr = std::env::var("RULE_SERVER_BIND").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!(%bind_addr, "rule-server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
