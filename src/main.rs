//! nomz
//!
//! Window swallowing for sway and i3: a window spawned from a launcher
//! (usually a terminal) takes the launcher's place in the layout, and the
//! launcher comes back when the window closes.
//!
//! Usage: `nomz <app_id>...`

mod config;
mod dispatch;
mod error;
mod ipc;
mod proc;
mod registry;
mod swallow;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use nomz_ipc::{Connection, EventType};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::proc::ProcFs;
use crate::registry::LauncherSet;
use crate::swallow::Swallower;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "nomz=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting nomz");

    let config = Config::from_env().context("Failed to load configuration")?;
    let launchers = LauncherSet::new(config.launchers);
    if launchers.is_empty() {
        warn!("No launcher app ids given, nothing will be swallowed");
    } else {
        info!("Launchers: {:?}", launchers.iter().collect::<Vec<_>>());
    }

    let procfs = ProcFs::new(&config.proc_root);
    info!("Reading process ancestry from {:?} ({:?})", procfs.root(), procfs.format());

    // Commands and events need separate sockets: a subscribed socket only carries events
    let wm = Connection::connect_to(&config.socket)
        .await
        .with_context(|| format!("Failed to connect to window manager at {:?}", config.socket))?;
    let events = Connection::connect_to(&config.socket)
        .await
        .with_context(|| format!("Failed to connect to window manager at {:?}", config.socket))?
        .subscribe(&[EventType::Window])
        .await
        .context("Failed to subscribe to window events")?;
    info!("Connected to window manager at {:?}", config.socket);

    let mut dispatcher = Dispatcher::new(events, wm, Swallower::new(launchers, procfs));

    // Handle SIGTERM and SIGINT
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        result = dispatcher.run() => {
            if let Err(e) = result {
                error!("Event stream failed: {}", e);
                return Err(e).context("Lost connection to window manager");
            }
        }
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("Received SIGINT, shutting down"),
    }

    Ok(())
}
