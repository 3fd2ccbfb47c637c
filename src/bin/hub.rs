use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rxwatch::{
    actors::{alert::AlertHandle, scheduler::SchedulerHandle},
    aggregator::Aggregator,
    config::read_config_file,
    poller::Poller,
    sequencer::CommandScript,
    session::SshConnector,
    store::SnapshotStore,
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short, default_value = "config.json")]
    file: String,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("rxwatch", LevelFilter::TRACE),
        ("hub", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;
    info!(
        "monitoring {} switches, threshold {} dBm, every {}s",
        config.switches.len(),
        config.threshold,
        config.interval
    );

    let alerts = AlertHandle::spawn(config.alert_channels());

    let script = CommandScript::transceiver_dump();
    let connector = SshConnector::new(
        config.ssh.connect_timeout(),
        config.ssh.inactivity_timeout(script.duration()),
    );
    let aggregator = Aggregator::new(
        Arc::new(connector),
        script,
        config.ssh.read_deadline(),
        Arc::new(alerts.clone()),
    );

    let poller = Poller::new(
        aggregator,
        config.switches.clone(),
        config.threshold,
        SnapshotStore::new(),
    );

    #[cfg(feature = "api")]
    {
        use rxwatch::api::{ApiConfig, ApiState, spawn_api_server};

        let api_config = ApiConfig::from_settings(config.api.as_ref());
        spawn_api_server(api_config, ApiState::new(poller.clone()))
            .await
            .context("cannot start HTTP server")?;
    }

    let scheduler = SchedulerHandle::spawn(poller, config.poll_interval());

    tokio::signal::ctrl_c()
        .await
        .context("cannot listen for shutdown signal")?;
    info!("shutting down");

    scheduler.shutdown().await?;
    alerts.shutdown().await;

    Ok(())
}
