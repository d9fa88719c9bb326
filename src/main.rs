use std::io::Write;
use std::net::SocketAddrV4;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;

use fauxbridge::bridge::StateChange;
use fauxbridge::config;
use fauxbridge::error::ApiResult;
use fauxbridge::server::ServiceManager;
use fauxbridge::server::appstate::AppState;
use fauxbridge::server::http::HttpService;
use fauxbridge::server::ssdp::SsdpService;

/// Emulated Philips Hue bridge, for voice assistants speaking the v1 api
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file (yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: Utf8PathBuf,
}

/*
 * Formatter function to output in syslog format. This makes sense when running
 * as a service (where output might go to a log file, or the system journal)
 */
#[allow(clippy::match_same_arms)]
fn syslog_format(
    buf: &mut pretty_env_logger::env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    writeln!(
        buf,
        "<{}>{}: {}",
        match record.level() {
            log::Level::Error => 3,
            log::Level::Warn => 4,
            log::Level::Info => 6,
            log::Level::Debug => 7,
            log::Level::Trace => 7,
        },
        record.target(),
        record.args()
    )
}

fn init_logging() -> ApiResult<()> {
    /* Try to provide reasonable default filters, when RUST_LOG is not specified */
    const DEFAULT_LOG_FILTERS: &[&str] = &["debug"];

    let log_filters = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTERS.join(","));

    /* Detect if we need syslog or human-readable formatting */
    if std::env::var("SYSTEMD_EXEC_PID").is_ok_and(|pid| pid == std::process::id().to_string()) {
        Ok(pretty_env_logger::env_logger::builder()
            .format(syslog_format)
            .parse_filters(&log_filters)
            .try_init()?)
    } else {
        Ok(pretty_env_logger::formatted_timed_builder()
            .parse_filters(&log_filters)
            .try_init()?)
    }
}

fn log_state_change(change: &StateChange) {
    let state = &change.state;
    log::info!(
        "Light {} {:?} is now {}: bri={} hue={} sat={} ct={} mode={} color={}",
        change.index + 1,
        change.name,
        if state.on { "on" } else { "off" },
        state.bri,
        state.hue,
        state.sat,
        state.ct,
        state.colormode.as_str(),
        change.color,
    );
}

async fn build_tasks(appstate: &AppState, mgr: &mut ServiceManager) -> ApiResult<()> {
    let conf = appstate.config();

    appstate.bridge.lock().await.set_listener(log_state_change);

    let http = HttpService::new(
        SocketAddrV4::new(conf.bridge.ipaddress, conf.bridge.http_port),
        appstate.bridge.clone(),
        conf.http.max_clients,
        Duration::from_secs(conf.http.rx_timeout),
    );
    mgr.register("http", http);

    let ssdp = SsdpService::new(
        conf.ssdp.clone(),
        conf.bridge.ipaddress,
        appstate.bridge.clone(),
    );
    mgr.register("ssdp", ssdp);

    Ok(())
}

async fn run() -> ApiResult<()> {
    init_logging()?;

    let args = Args::parse();

    let config = config::parse(&args.config)?;
    log::debug!("Configuration loaded successfully");

    let appstate = AppState::from_config(config)?;

    let mut mgr = ServiceManager::new();
    build_tasks(&appstate, &mut mgr).await?;

    let shutdown = mgr.shutdown_handle();
    tokio::spawn(async move {
        if matches!(tokio::signal::ctrl_c().await, Ok(())) {
            log::warn!("Ctrl-C pressed, exiting..");
            shutdown.shutdown();
        }
    });

    mgr.join().await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        log::error!("Fauxbridge error: {err}");
        log::error!("Fatal error encountered, cannot continue.");
    }
}
