//! Configuration file watcher for hot reload.
//!
//! Every change event reloads, validates and rebuilds the route table.
//! Only a router that built cleanly is sent on; a broken edit leaves the
//! running table in place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::builder::build_router;
use crate::config::loader::{load_config, ConfigError};
use crate::http::handler::Action;
use crate::routing::Router;

/// Monitors the configuration file and emits rebuilt routers.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Router<Action>>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for rebuilt routers.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Router<Action>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = ?path, "Config file change detected, rebuilding routes");
                    match reload(&path) {
                        Ok(router) => {
                            if tx.send(router).is_err() {
                                tracing::debug!("Route table receiver dropped");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload routes; keeping current table");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Load, validate and build in one step.
pub fn reload(path: &Path) -> Result<Router<Action>, ConfigError> {
    let config = load_config(path)?;
    build_router(&config)
}
