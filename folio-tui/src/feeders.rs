use crate::tui::{TuiActor, TuiMsg};
use anyhow::Result;
use crossterm::event;
use folio_actors::actor::Addr;
use folio_actors::system::ShutdownHandle;
use std::time::Duration;

const POLL: Duration = Duration::from_millis(100);

/// Forward terminal events to the TUI until shutdown or until its mailbox
/// closes. Each blocking read is bounded by `POLL` so the task notices
/// shutdown promptly.
pub async fn read_input(tui: Addr<TuiActor>, shutdown: ShutdownHandle) -> Result<()> {
    let mut shutdown_rx = shutdown.subscribe();
    loop {
        let polled = tokio::select! {
            _ = shutdown_rx.recv() => break,
            res = tokio::task::spawn_blocking(|| -> std::io::Result<Option<event::Event>> {
                if event::poll(POLL)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            }) => res?,
        };

        match polled {
            Ok(Some(ev)) => {
                if tui.send(TuiMsg::InputEvent(ev)).await.is_err() {
                    break;
                }
            }
            Ok(None) => {
                if tui.is_closed() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "terminal input failed");
                shutdown.signal();
                return Err(e.into());
            }
        }
    }
    tracing::debug!("input reader stopped");
    Ok(())
}
