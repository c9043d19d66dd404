//! Domain core of the portfolio terminal.
//!
//! [`Terminal`] owns the session: it parses submitted lines, dispatches them
//! to the fixed [`Command`] set, records history and transcript, and drives
//! the welcome banner's [`TypingSequencer`]. It does no I/O of its own beyond
//! the [`Navigator`] and [`Clock`] it is given.
//!
//! ```rust
//! use folio_core::{Profile, Terminal, TypingTiming};
//!
//! let mut term = Terminal::new(Profile::default(), TypingTiming::default());
//! term.finish_typing();
//! term.submit("echo   hi   there");
//! let snap = term.snapshot();
//! let last = snap.entries.last().unwrap();
//! assert_eq!(last.command.as_deref(), Some("echo hi there"));
//! assert_eq!(last.lines, vec!["hi there"]);
//! ```

pub mod command;
pub mod dispatch;
pub mod history;
pub mod input;
pub mod navigator;
pub mod profile;
pub mod transcript;
pub mod typing;

pub use command::{Clock, Command, Registry, Response, SystemClock};
pub use dispatch::{Snapshot, SnapshotEntry, SubmitOutcome, Terminal, TerminalEvent, TypingStatus};
pub use history::HistoryLog;
pub use input::InputLine;
pub use navigator::{Navigator, SystemNavigator};
pub use profile::{Links, Profile};
pub use transcript::Transcript;
pub use typing::{Step, TypingSequencer, TypingTiming};
