//! Task tracking and cooperative shutdown.
//!
//! Long-lived tasks subscribe to one broadcast channel; the `JoinSet` makes
//! sure teardown waits for all of them and surfaces the first failure.
use anyhow::Result;
use std::time::Duration;
use tokio::{sync::broadcast, task::JoinSet};

/// Cloneable trigger for a process-wide shutdown.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
    /// Ask every subscriber to stop. Safe to call more than once.
    pub fn signal(&self) {
        let _ = self.tx.send(());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

pub struct ActorSystem {
    joinset: JoinSet<Result<()>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorSystem {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);
        Self {
            joinset: JoinSet::new(),
            shutdown_tx,
        }
    }

    pub fn shutdown_notifier(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    pub fn track(&mut self, fut: impl std::future::Future<Output = Result<()>> + Send + 'static) {
        self.joinset.spawn(fut);
    }

    pub fn tracked(&self) -> usize {
        self.joinset.len()
    }

    /// Signal shutdown and wait for every tracked task.
    ///
    /// Tasks still running after `grace` are aborted. The first task error
    /// (or panic) is returned after all tasks are done.
    pub async fn graceful_shutdown(mut self, grace: Duration) -> Result<()> {
        let _ = self.shutdown_tx.send(());

        let mut first_err = None;
        let drained = tokio::time::timeout(grace, async {
            while let Some(res) = self.joinset.join_next().await {
                let outcome = res.map_err(anyhow::Error::from).and_then(|r| r);
                if let Err(e) = outcome {
                    tracing::error!(target = "folio-actors", error = ?e, "task failed during shutdown");
                    first_err.get_or_insert(e);
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                target = "folio-actors",
                remaining = self.joinset.len(),
                "shutdown grace period elapsed; aborting remaining tasks"
            );
            self.joinset.shutdown().await;
        }

        first_err.map_or(Ok(()), Err)
    }
}
