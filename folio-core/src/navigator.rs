//! Opening URLs outside the terminal.
use folio_common::{FolioError, Result};
use std::process::Stdio;
use tokio::{process::Command, runtime::Handle, task::JoinHandle};
use url::Url;

/// Host capability for opening a URL in a new, unrelated context.
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Hands the URL to the platform opener as a detached child process.
///
/// The child gets no stdin/stdout/stderr from the terminal. Its exit is
/// collected by a background task on the current tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNavigator;

impl SystemNavigator {
    fn opener(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) -> Result<()> {
        check_scheme(url)?;
        spawn_reaped(Self::opener(url)).map(drop)
    }
}

/// Spawn `cmd` detached from the terminal and wait for it on a runtime task.
/// The returned handle finishes once the child has been reaped.
fn spawn_reaped(mut cmd: Command) -> Result<JoinHandle<()>> {
    let handle = Handle::try_current()
        .map_err(|_| FolioError::Navigation("no async runtime to run the opener".into()))?;
    let _rt = handle.enter();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| FolioError::Navigation(e.to_string()))?;
    let pid = child.id();
    tracing::debug!(?pid, "spawned url opener");
    Ok(handle.spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => {}
            Ok(status) => tracing::warn!(?pid, %status, "url opener exited unsuccessfully"),
            Err(e) => tracing::warn!(?pid, error = %e, "waiting on url opener failed"),
        }
    }))
}

/// Only absolute web URLs are handed to the opener.
pub fn check_scheme(raw: &str) -> Result<()> {
    let parsed = Url::parse(raw).map_err(|e| FolioError::Navigation(format!("invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FolioError::Navigation(format!(
            "unsupported URL scheme `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_schemes_are_accepted() {
        assert!(check_scheme("https://github.com/x").is_ok());
        assert!(check_scheme("HTTP://example.com").is_ok());
    }

    #[test]
    fn other_schemes_are_rejected_with_a_message() {
        let err = check_scheme("file:///etc/passwd").unwrap_err();
        assert_eq!(err.to_string(), "unsupported URL scheme `file`");
    }

    #[test]
    fn opener_needs_a_runtime() {
        let err = spawn_reaped(Command::new("true")).unwrap_err();
        assert_eq!(err.to_string(), "no async runtime to run the opener");
    }

    /// Children of this process that have exited but not been reaped.
    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        std::fs::read_dir("/proc")
            .unwrap()
            .filter_map(|e| std::fs::read_to_string(e.ok()?.path().join("stat")).ok())
            .filter(|stat| {
                // fields after the parenthesised command name: state, ppid, ...
                let rest = stat.rsplit_once(')').map(|(_, r)| r).unwrap_or("");
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(me.as_str())
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn opened_children_are_reaped() {
        for _ in 0..3 {
            let waiter = spawn_reaped(Command::new("true")).unwrap();
            tokio::time::timeout(std::time::Duration::from_secs(5), waiter)
                .await
                .unwrap()
                .unwrap();
        }
        assert_eq!(zombie_children(), 0);
    }

    #[tokio::test]
    async fn missing_opener_is_a_navigation_error() {
        let err = spawn_reaped(Command::new("/nonexistent/folio-opener")).unwrap_err();
        assert!(matches!(err, FolioError::Navigation(_)));
    }

    #[test]
    fn relative_urls_are_rejected() {
        let err = check_scheme("github.com/someone").unwrap_err();
        assert!(err.to_string().starts_with("invalid URL: "));
    }
}
