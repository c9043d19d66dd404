use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, TimeZone};
use folio_common::FolioError;
use folio_core::{Clock, Navigator, Profile, SubmitOutcome, Terminal, TypingTiming};

struct Noon;

impl Clock for Noon {
    fn now(&self) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 2, 12, 30, 0)
            .unwrap()
    }
}

/// Opens the first URL, refuses the rest.
#[derive(Clone, Default)]
struct OnceOnly(Arc<Mutex<usize>>);

impl Navigator for OnceOnly {
    fn open(&self, _url: &str) -> folio_common::Result<()> {
        let mut n = self.0.lock().unwrap();
        *n += 1;
        if *n == 1 {
            Ok(())
        } else {
            Err(FolioError::Navigation("too many windows".into()))
        }
    }
}

fn session() -> Terminal {
    let profile = Profile {
        username: "visitor".into(),
        cwd: "/projects".into(),
        ..Profile::default()
    };
    Terminal::new(profile, TypingTiming::default())
        .with_clock(Noon)
        .with_navigator(OnceOnly::default())
}

#[test]
fn a_typical_visit() {
    let mut t = session();

    // Type while the banner is still being revealed.
    let generation = t.typing().generation();
    while let Some(_delay) = t.tick_typing(generation) {
        if t.typing().position().0 == 1 {
            break;
        }
    }

    for c in "wh".chars() {
        t.edit(|i| i.insert(c));
    }
    assert!(t.complete());
    assert_eq!(t.submit_pending(), SubmitOutcome::Appended);
    assert_eq!(t.submit("pwd"), SubmitOutcome::Appended);
    assert_eq!(t.submit("date"), SubmitOutcome::Appended);
    assert_eq!(t.submit("linkedin"), SubmitOutcome::Appended);
    assert_eq!(t.submit("github"), SubmitOutcome::Appended);
    assert_eq!(t.submit("sudo rm -rf /"), SubmitOutcome::Appended);

    let snap = t.snapshot();
    assert_eq!(snap.prompt(), "visitor@portfolio:/projects$");
    assert_eq!(snap.entries[0].lines, vec![Profile::default().welcome[0].clone()]);

    let outputs: Vec<_> = snap.entries[1..]
        .iter()
        .map(|e| (e.command.clone().unwrap(), e.lines[0].clone()))
        .collect();
    assert_eq!(outputs[0], ("whoami".into(), "visitor".into()));
    assert_eq!(outputs[1], ("pwd".into(), "/home/visitor/projects".into()));
    assert_eq!(outputs[2].1, "Fri Jan 02 2026 12:30:00 GMT-0500");
    assert!(outputs[3].1.starts_with("Opening https://www.linkedin.com/"));
    assert!(outputs[4].1.starts_with("Failed to open https://github.com/"));
    assert!(outputs[4].1.ends_with(": too many windows"));
    assert_eq!(
        outputs[5],
        (
            "sudo rm -rf /".into(),
            "Command not found: sudo. Type 'help' for available commands.".into()
        )
    );

    // Walk back to `date` and run it again from history.
    for _ in 0..4 {
        t.recall_older();
    }
    assert_eq!(t.input().as_str(), "date");
    t.submit_pending();
    assert_eq!(t.history().len(), 7);

    assert_eq!(t.submit("clear"), SubmitOutcome::Cleared);
    let snap = t.snapshot();
    assert_eq!(snap.entries.len(), 1);
    assert!(snap.entries[0].lines.is_empty());
    assert_eq!(t.history().len(), 8);

    t.finish_typing();
    assert_eq!(t.snapshot().plain_lines(), Profile::default().welcome);
}

#[test]
fn help_lists_every_other_command() {
    let mut t = session();
    t.submit("help");
    let snap = t.snapshot();
    let lines = &snap.entries[1].lines;
    assert_eq!(lines[0], "Available commands:");
    for name in t.registry().names().filter(|n| *n != "help") {
        assert!(
            lines.iter().any(|l| l.starts_with(&format!("{name:<10}- "))),
            "missing {name}"
        );
    }
}
