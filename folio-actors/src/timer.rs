//! Cancellable timers that deliver messages to an actor.
//!
//! A [`ScheduledTask`] owns its tokio task. Cancelling (or dropping) the
//! handle guarantees the callback will not run afterwards, except for a
//! message that was already enqueued; receivers that care about that case
//! should tag messages with a generation and ignore stale ones.
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::actor::{Actor, Addr};

pub struct ScheduledTask {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Run `f` once after `delay`.
    pub fn once<F, Fut>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = time::sleep(delay) => {
                    if !token.is_cancelled() {
                        f().await;
                    }
                }
            }
        });
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Run `f` every `period`, starting one period from now. `f` returning
    /// `false` ends the schedule.
    pub fn every<F, Fut>(period: Duration, mut f: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if !f().await {
                            break;
                        }
                    }
                }
            }
        });
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Deliver `msg` to `addr` once after `delay`.
    pub fn send_after<A: Actor>(delay: Duration, addr: Addr<A>, msg: A::Msg) -> Self {
        Self::once(delay, move || async move {
            if addr.send(msg).await.is_err() {
                tracing::trace!(target = "folio-actors", "timer target closed before delivery");
            }
        })
    }

    /// Deliver a fresh message from `make` to `addr` every `period` until the
    /// mailbox closes. Ticks are dropped, not queued, while the mailbox is full.
    pub fn send_every<A, M>(period: Duration, addr: Addr<A>, make: M) -> Self
    where
        A: Actor,
        M: Fn() -> A::Msg + Send + Sync + 'static,
    {
        Self::every(period, move || {
            let _ = addr.try_send(make());
            std::future::ready(!addr.is_closed())
        })
    }

    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
