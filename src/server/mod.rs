pub mod appstate;
pub mod http;
pub mod ssdp;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::error::{ApiError, ApiResult};

/// A long-running network service.
///
/// `start` acquires resources (sockets), `run` serves until it fails or the
/// manager asks every service to shut down, and `stop` releases them again.
#[async_trait]
pub trait Service: Send {
    async fn start(&mut self) -> ApiResult<()> {
        Ok(())
    }

    async fn run(&mut self) -> ApiResult<()>;

    async fn stop(&mut self) -> ApiResult<()> {
        Ok(())
    }
}

/// Sends the shutdown signal to every service of a [`ServiceManager`]
#[derive(Clone)]
pub struct ShutdownHandle(watch::Sender<bool>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        // no receivers left means nothing is running anyway
        let _ = self.0.send(true);
    }
}

pub struct ServiceManager {
    tasks: JoinSet<(String, ApiResult<()>)>,
    signal: watch::Sender<bool>,
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceManager {
    #[must_use]
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            tasks: JoinSet::new(),
            signal,
        }
    }

    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.signal.clone())
    }

    /// Spawn `svc` on the runtime, under `name`
    pub fn register(&mut self, name: impl Into<String>, mut svc: impl Service + 'static) {
        let name = name.into();
        let mut shutdown = self.signal.subscribe();

        self.tasks.spawn(async move {
            let res = async {
                log::debug!("Starting service {name}");
                svc.start().await?;

                tokio::select! {
                    res = svc.run() => res?,
                    _ = shutdown.changed() => log::debug!("Shutting down service {name}.."),
                }

                svc.stop().await
            }
            .await;

            (name, res)
        });
    }

    /// Wait for every service to end. The first failing service shuts down
    /// the rest, and its error is returned.
    pub async fn join(mut self) -> ApiResult<()> {
        let mut first_error: Option<ApiError> = None;

        while let Some(joined) = self.tasks.join_next().await {
            match joined? {
                (name, Ok(())) => log::info!("Service {name} stopped"),
                (name, Err(err)) => {
                    log::error!("Service {name} failed: {err}");
                    let _ = self.signal.send(true);
                    first_error.get_or_insert(err);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
