//! The terminal session: dispatcher, recall, completion and the welcome run.
use std::time::Duration;

use tokio::sync::broadcast;

use crate::command::{parse_line, Clock, CommandEnv, Response, Registry, SystemClock};
use crate::history::HistoryLog;
use crate::input::InputLine;
use crate::navigator::{Navigator, SystemNavigator};
use crate::profile::Profile;
use crate::transcript::{EntryBody, Transcript};
use crate::typing::{Step, TypingSequencer, TypingTiming};

const EVENT_CAPACITY: usize = 64;

/// What [`Terminal::submit`] did with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank line; nothing recorded.
    Ignored,
    /// An entry was appended to the transcript.
    Appended,
    /// The transcript was reset and a new welcome run started.
    Cleared,
}

/// Change notifications for observers. Fetch a [`Snapshot`] to see the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Submitted(SubmitOutcome),
    InputChanged,
    Typing { generation: u64, step: Step },
    /// The welcome banner changed and typing started over.
    WelcomeRestarted { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingStatus {
    pub generation: u64,
    pub complete: bool,
    pub position: (usize, usize),
}

/// A transcript entry with its lines resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub command: Option<String>,
    pub lines: Vec<String>,
}

/// Everything a display surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// `user@host`
    pub identity: String,
    /// Directory as shown in the prompt.
    pub cwd: String,
    pub entries: Vec<SnapshotEntry>,
    pub input: String,
    /// Byte offset into `input`.
    pub cursor: usize,
    pub typing: TypingStatus,
}

impl Snapshot {
    /// `user@host:cwd$`
    pub fn prompt(&self) -> String {
        format!("{}:{}$", self.identity, self.cwd)
    }

    /// Plain-text rendering of the transcript, one prompt line per command.
    pub fn plain_lines(&self) -> Vec<String> {
        let prompt = self.prompt();
        let mut out = Vec::new();
        for entry in &self.entries {
            if let Some(cmd) = &entry.command {
                out.push(format!("{prompt} {cmd}"));
            }
            out.extend(entry.lines.iter().cloned());
        }
        out
    }
}

pub struct Terminal {
    registry: Registry,
    profile: Profile,
    clock: Box<dyn Clock>,
    navigator: Box<dyn Navigator>,
    transcript: Transcript,
    history: HistoryLog,
    input: InputLine,
    typing: TypingSequencer,
    events: broadcast::Sender<TerminalEvent>,
}

impl Terminal {
    /// A session with the system clock and navigator. The welcome run starts
    /// at `(0, 0)`; drive it with [`Terminal::tick_typing`].
    pub fn new(profile: Profile, timing: TypingTiming) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let typing = TypingSequencer::new(profile.welcome.clone(), timing);
        Self {
            registry: Registry::new(),
            profile,
            clock: Box::new(SystemClock),
            navigator: Box::new(SystemNavigator),
            transcript: Transcript::new(),
            history: HistoryLog::new(),
            input: InputLine::new(),
            typing,
            events,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Box::new(navigator);
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn typing(&self) -> &TypingSequencer {
        &self.typing
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TerminalEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: TerminalEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Run one line. The input buffer is emptied whatever the outcome.
    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        let outcome = self.dispatch(raw);
        self.input.clear();
        self.notify(TerminalEvent::Submitted(outcome));
        outcome
    }

    /// Submit whatever is in the input buffer.
    pub fn submit_pending(&mut self) -> SubmitOutcome {
        let raw = self.input.take();
        self.submit(&raw)
    }

    fn dispatch(&mut self, raw: &str) -> SubmitOutcome {
        let trimmed = raw.trim();
        let Some(line) = parse_line(trimmed) else {
            return SubmitOutcome::Ignored;
        };
        self.history.push(trimmed);
        let echo = line.echo();

        let Some(command) = self.registry.lookup(&line.name) else {
            tracing::info!(command = %line.name, known = false, "dispatching command");
            self.transcript.push_line(
                echo,
                format!(
                    "Command not found: {}. Type 'help' for available commands.",
                    line.name
                ),
            );
            return SubmitOutcome::Appended;
        };
        tracing::info!(command = command.name(), known = true, "dispatching command");

        let env = CommandEnv {
            profile: &self.profile,
            clock: self.clock.as_ref(),
        };
        match command.execute(&line.argument, &env) {
            Response::Text(lines) => {
                self.transcript.push(echo, lines);
                SubmitOutcome::Appended
            }
            Response::Link(url) => {
                let message = match self.navigator.open(&url) {
                    Ok(()) => format!("Opening {url} in a new tab..."),
                    Err(e) => {
                        tracing::warn!(%url, error = %e, "failed to open link");
                        format!("Failed to open {url}: {e}")
                    }
                };
                self.transcript.push_line(echo, message);
                SubmitOutcome::Appended
            }
            Response::Clear => {
                self.transcript.reset();
                self.typing.restart(self.profile.welcome.clone());
                SubmitOutcome::Cleared
            }
        }
    }

    /// Up arrow.
    pub fn recall_older(&mut self) {
        if let Some(line) = self.history.older() {
            self.input.set(line);
            self.notify(TerminalEvent::InputChanged);
        }
    }

    /// Down arrow.
    pub fn recall_newer(&mut self) {
        match self.history.newer() {
            Some(line) => self.input.set(line),
            None => self.input.clear(),
        }
        self.notify(TerminalEvent::InputChanged);
    }

    /// Tab. Replaces the buffer only on a single match; returns whether it did.
    pub fn complete(&mut self) -> bool {
        let matches = self.registry.completions(self.input.as_str());
        let [only] = matches[..] else {
            return false;
        };
        self.input.set(only);
        self.notify(TerminalEvent::InputChanged);
        true
    }

    /// Apply an edit to the input buffer.
    pub fn edit(&mut self, f: impl FnOnce(&mut InputLine)) {
        let before = self.input.clone();
        f(&mut self.input);
        if self.input != before {
            self.notify(TerminalEvent::InputChanged);
        }
    }

    /// Swap the welcome banner. A list equal to the current one leaves the run
    /// alone; otherwise typing restarts from `(0, 0)` and the caller must
    /// schedule ticks for the new generation. Returns whether it restarted.
    pub fn set_welcome(&mut self, lines: Vec<String>) -> bool {
        self.profile.welcome.clone_from(&lines);
        let restarted = self.typing.set_source(lines);
        if restarted {
            self.notify(TerminalEvent::WelcomeRestarted {
                generation: self.typing.generation(),
            });
        }
        restarted
    }

    /// Delay before the next tick of the current welcome run, if any.
    pub fn next_typing_delay(&self) -> Option<Duration> {
        self.typing.next_delay()
    }

    /// Advance the welcome run tagged `generation`. Ticks from an earlier run
    /// are ignored and return `None`; otherwise returns the next delay.
    pub fn tick_typing(&mut self, generation: u64) -> Option<Duration> {
        if generation != self.typing.generation() {
            tracing::trace!(
                stale = generation,
                current = self.typing.generation(),
                "ignoring stale typing tick"
            );
            return None;
        }
        let step = self.typing.tick();
        if step != Step::Idle {
            self.notify(TerminalEvent::Typing { generation, step });
        }
        self.typing.next_delay()
    }

    /// Reveal the rest of the welcome run at once.
    pub fn finish_typing(&mut self) {
        if self.typing.finish() > 0 {
            self.notify(TerminalEvent::Typing {
                generation: self.typing.generation(),
                step: Step::Completed,
            });
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let entries = self
            .transcript
            .entries()
            .iter()
            .map(|e| SnapshotEntry {
                command: e.command.clone(),
                lines: match &e.body {
                    EntryBody::Lines(lines) => lines.clone(),
                    EntryBody::Welcome => self.typing.lines().to_vec(),
                },
            })
            .collect();
        Snapshot {
            identity: self.profile.identity(),
            cwd: self.profile.cwd.clone(),
            entries,
            input: self.input.as_str().to_string(),
            cursor: self.input.cursor(),
            typing: TypingStatus {
                generation: self.typing.generation(),
                complete: self.typing.is_complete(),
                position: self.typing.position(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use folio_common::FolioError;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Vec<String>>>);

    impl Navigator for Recording {
        fn open(&self, url: &str) -> folio_common::Result<()> {
            self.0.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    struct Blocked;

    impl Navigator for Blocked {
        fn open(&self, _url: &str) -> folio_common::Result<()> {
            Err(FolioError::Navigation("popup blocked".into()))
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<FixedOffset> {
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2026, 10, 17, 12, 0, 0)
                .unwrap()
        }
    }

    fn terminal() -> (Terminal, Recording) {
        let nav = Recording::default();
        let t = Terminal::new(Profile::default(), TypingTiming::default())
            .with_clock(FixedClock)
            .with_navigator(nav.clone());
        (t, nav)
    }

    fn last_entry(t: &Terminal) -> SnapshotEntry {
        t.snapshot().entries.last().cloned().unwrap()
    }

    #[test]
    fn blank_lines_are_a_no_op() {
        let (mut t, _) = terminal();
        for raw in ["", "   ", "\t \n"] {
            assert_eq!(t.submit(raw), SubmitOutcome::Ignored);
        }
        assert!(t.history().is_empty());
        assert_eq!(t.transcript().len(), 1);
    }

    #[test]
    fn echoed_command_is_normalised() {
        let (mut t, _) = terminal();
        t.submit("  echo   hello    world  ");
        let entry = last_entry(&t);
        assert_eq!(entry.command.as_deref(), Some("echo hello world"));
        assert_eq!(entry.lines, vec!["hello world"]);
        assert_eq!(t.history().entries(), &["echo   hello    world"]);
    }

    #[test]
    fn unknown_command_gets_a_hint() {
        let (mut t, _) = terminal();
        assert_eq!(t.submit("HELP"), SubmitOutcome::Appended);
        assert_eq!(
            last_entry(&t).lines,
            vec!["Command not found: HELP. Type 'help' for available commands."]
        );
        assert_eq!(t.history().len(), 1);
    }

    #[test]
    fn text_commands_append_in_order() {
        let (mut t, _) = terminal();
        t.submit("whoami");
        t.submit("pwd");
        t.submit("date");
        let snap = t.snapshot();
        let lines: Vec<_> = snap.entries[1..].iter().map(|e| e.lines[0].as_str()).collect();
        assert_eq!(
            lines,
            ["guest", "/home/guest", "Sat Oct 17 2026 12:00:00 GMT+0000"]
        );
    }

    #[test]
    fn links_are_opened_and_confirmed() {
        let (mut t, nav) = terminal();
        t.submit("github");
        let url = Profile::default().links.github;
        assert_eq!(*nav.0.lock().unwrap(), vec![url.clone()]);
        assert_eq!(
            last_entry(&t).lines,
            vec![format!("Opening {url} in a new tab...")]
        );
    }

    #[test]
    fn navigation_failure_is_reported_in_the_transcript() {
        let mut t = Terminal::new(Profile::default(), TypingTiming::default()).with_navigator(Blocked);
        t.submit("cv");
        let line = &last_entry(&t).lines[0];
        assert!(line.starts_with("Failed to open "));
        assert!(line.contains(&Profile::default().links.cv));
        assert!(line.ends_with(": popup blocked"));
    }

    #[test]
    fn clear_resets_transcript_and_restarts_typing() {
        let (mut t, _) = terminal();
        t.finish_typing();
        t.submit("about");
        t.submit("ls");
        let before = t.typing().generation();

        assert_eq!(t.submit("clear"), SubmitOutcome::Cleared);
        let snap = t.snapshot();
        assert_eq!(snap.entries.len(), 1);
        assert_eq!(snap.entries[0].command, None);
        assert!(snap.entries[0].lines.is_empty());
        assert_eq!(snap.typing.position, (0, 0));
        assert_eq!(snap.typing.generation, before + 1);
        assert!(!snap.typing.complete);
        assert_eq!(t.history().entries(), &["about", "ls", "clear"]);
    }

    #[test]
    fn submit_always_empties_the_buffer() {
        let (mut t, _) = terminal();
        t.edit(|i| i.set("nope"));
        t.submit_pending();
        assert!(t.input().is_empty());
        t.edit(|i| i.set("   "));
        assert_eq!(t.submit_pending(), SubmitOutcome::Ignored);
        assert!(t.input().is_empty());
    }

    #[test]
    fn recall_walks_history() {
        let (mut t, _) = terminal();
        t.submit("a");
        t.submit("b");
        t.recall_older();
        assert_eq!(t.input().as_str(), "b");
        t.recall_older();
        assert_eq!(t.input().as_str(), "a");
        t.recall_older();
        assert_eq!(t.input().as_str(), "a");
        t.recall_newer();
        assert_eq!(t.input().as_str(), "b");
        t.recall_newer();
        assert_eq!(t.input().as_str(), "");
        assert_eq!(t.history().cursor(), None);
    }

    #[test]
    fn recall_older_with_empty_history_keeps_buffer() {
        let (mut t, _) = terminal();
        t.edit(|i| i.set("typed"));
        t.recall_older();
        assert_eq!(t.input().as_str(), "typed");
    }

    #[test]
    fn tab_completes_only_unique_prefixes() {
        let (mut t, _) = terminal();
        t.edit(|i| i.set("Wh"));
        assert!(t.complete());
        assert_eq!(t.input().as_str(), "whoami");

        t.edit(|i| i.set("c"));
        assert!(!t.complete());
        assert_eq!(t.input().as_str(), "c");

        t.edit(|i| i.clear());
        assert!(!t.complete());
        assert_eq!(t.input().as_str(), "");
    }

    #[test]
    fn welcome_entry_tracks_the_typing_run() {
        let (mut t, _) = terminal();
        t.submit("whoami");
        let g = t.typing().generation();
        t.tick_typing(g);
        t.tick_typing(g);
        let snap = t.snapshot();
        assert_eq!(snap.entries[0].lines, vec!["We"]);
        assert_eq!(snap.entries[1].lines, vec!["guest"]);

        t.finish_typing();
        assert_eq!(t.snapshot().entries[0].lines, Profile::default().welcome);
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let (mut t, _) = terminal();
        let old = t.typing().generation();
        t.submit("clear");
        assert_eq!(t.tick_typing(old), None);
        assert_eq!(t.typing().position(), (0, 0));
        assert!(t.tick_typing(old + 1).is_some());
        assert_eq!(t.typing().position(), (0, 1));
    }

    #[test]
    fn equal_welcome_keeps_the_run_new_welcome_restarts_it() {
        let (mut t, _) = terminal();
        t.tick_typing(0);
        assert!(!t.set_welcome(Profile::default().welcome));
        assert_eq!(t.typing().position(), (0, 1));

        assert!(t.set_welcome(vec!["hey".into()]));
        assert_eq!(t.typing().position(), (0, 0));
        assert_eq!(t.typing().generation(), 1);
        t.finish_typing();
        assert_eq!(t.snapshot().entries[0].lines, vec!["hey"]);

        t.submit("clear");
        t.finish_typing();
        assert_eq!(t.snapshot().entries[0].lines, vec!["hey"]);
    }

    #[test]
    fn subscribers_see_changes() {
        let (mut t, _) = terminal();
        let mut rx = t.subscribe();
        t.submit("ls");
        t.edit(|i| i.insert('x'));
        t.tick_typing(0);
        assert_eq!(
            rx.try_recv().unwrap(),
            TerminalEvent::Submitted(SubmitOutcome::Appended)
        );
        assert_eq!(rx.try_recv().unwrap(), TerminalEvent::InputChanged);
        assert_eq!(
            rx.try_recv().unwrap(),
            TerminalEvent::Typing {
                generation: 0,
                step: Step::Typed
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn plain_lines_render_prompts() {
        let (mut t, _) = terminal();
        t.finish_typing();
        t.submit("whoami");
        let lines = t.snapshot().plain_lines();
        assert_eq!(
            lines,
            vec![
                "Welcome to Valentino Farish Adrian portfolio!",
                "Type 'help' for available commands",
                "guest@portfolio:~$ whoami",
                "guest",
            ]
        );
    }
}
