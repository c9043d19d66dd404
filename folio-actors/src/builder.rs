use crate::actor::{spawn_actor_reserved, spawn_actor_with_shutdown, Actor, Addr, Reserved};
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;
use std::any::Any;
use std::collections::HashMap;
use std::time::Duration;

/// Wires actors together and owns their tasks until shutdown.
pub struct Builder {
    sys: ActorSystem,
    // Typed addresses by name; downcast on lookup.
    addrs: HashMap<String, Box<dyn Any + Send + Sync>>,
    grace: Duration,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
            addrs: HashMap::new(),
            grace: Duration::from_secs(2),
        }
    }

    /// How long shutdown waits before aborting stragglers.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Reserve a mailbox and publish its `Addr` under `name`.
    pub fn reserve<A>(&mut self, name: &str, mailbox: usize) -> Reserved<A>
    where
        A: Actor,
        Addr<A>: Send + Sync,
    {
        let r = spawn_actor_reserved::<A>(name, mailbox);
        self.addrs.insert(name.to_string(), Box::new(r.addr()));
        r
    }

    /// Start a previously reserved actor and track its task.
    pub fn start_reserved<A: Actor>(&mut self, r: Reserved<A>, actor: A) -> &mut Self {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h = r.start_with_shutdown(actor, Some(shutdown_rx));
        self.sys.track(async move { h.task.await? });
        self
    }

    /// Spawn an actor right away and publish its `Addr` under `name`.
    pub fn spawn<A>(&mut self, name: &str, mailbox: usize, actor: A) -> &mut Self
    where
        A: Actor,
        Addr<A>: Send + Sync,
    {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h = spawn_actor_with_shutdown(actor, mailbox, Some(shutdown_rx));
        self.addrs.insert(name.to_string(), Box::new(h.addr.clone()));
        self.sys.track(async move { h.task.await? });
        self
    }

    /// Track a helper task (input readers, tickers) alongside the actors.
    pub fn track(
        &mut self,
        fut: impl std::future::Future<Output = Result<()>> + Send + 'static,
    ) -> &mut Self {
        self.sys.track(fut);
        self
    }

    /// Typed address published under `name`.
    pub fn addr<A: Actor>(&self, name: &str) -> Option<Addr<A>> {
        self.addrs
            .get(name)
            .and_then(|b| b.downcast_ref::<Addr<A>>().cloned())
    }

    pub async fn graceful_shutdown(self) -> Result<()> {
        self.sys.graceful_shutdown(self.grace).await
    }

    /// Block until CTRL-C or an internal shutdown signal, then tear down.
    pub async fn run_until_ctrl_c(mut self) -> Result<()> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(target = "folio-actors", "ctrl-c received");
            }
            _ = shutdown_rx.recv() => {
                tracing::info!(target = "folio-actors", "shutdown requested");
            }
        }
        // Published addresses keep mailboxes open; drop them first.
        self.addrs.clear();
        self.sys.graceful_shutdown(self.grace).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Context;
    use async_trait::async_trait;

    struct Sink;

    #[async_trait]
    impl Actor for Sink {
        type Msg = String;
        async fn handle(&mut self, _msg: String, _ctx: &mut Context<Self>) -> Result<()> {
            Ok(())
        }
    }

    struct Other;

    #[async_trait]
    impl Actor for Other {
        type Msg = u8;
        async fn handle(&mut self, _msg: u8, _ctx: &mut Context<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn addresses_are_typed_by_name() {
        let mut b = Builder::new();
        let r = b.reserve::<Sink>("tui:main", 4);
        b.start_reserved(r, Sink);

        assert!(b.addr::<Sink>("tui:main").is_some());
        assert!(b.addr::<Other>("tui:main").is_none());
        assert!(b.addr::<Sink>("missing").is_none());

        let sink = b.addr::<Sink>("tui:main").unwrap();
        sink.send("help".into()).await.unwrap();
        drop(sink);
        b.graceful_shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn internal_signal_ends_run_until_ctrl_c() {
        let mut b = Builder::new().with_grace(Duration::from_millis(200));
        b.spawn("other", 2, Other);
        let handle = b.shutdown_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.signal();
        });
        b.run_until_ctrl_c().await.unwrap();
    }
}
