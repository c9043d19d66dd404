use anyhow::Result;
use folio_actors::builder::Builder;
use folio_config::{FolioConfig, ProfileConfig, TypingConfig};
use folio_core::{Profile, Terminal as Session, TypingTiming};
use folio_tui::{TuiActor, TuiOptions, read_input};
use std::time::Duration;

pub struct Tether {
    builder: Builder,
}

impl Tether {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
        }
    }
    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }
    pub async fn run(self) -> Result<()> {
        self.builder.run_until_ctrl_c().await
    }
}

/// Built-in profile with every configured field swapped in.
pub fn profile_from_config(cfg: &ProfileConfig) -> Profile {
    let mut p = Profile::default();
    let set = |slot: &mut String, v: &Option<String>| {
        if let Some(v) = v {
            slot.clone_from(v);
        }
    };
    set(&mut p.username, &cfg.username);
    set(&mut p.hostname, &cfg.hostname);
    set(&mut p.cwd, &cfg.cwd);
    set(&mut p.links.github, &cfg.links.github);
    set(&mut p.links.linkedin, &cfg.links.linkedin);
    set(&mut p.links.cv, &cfg.links.cv);

    let set_lines = |slot: &mut Vec<String>, v: &Option<Vec<String>>| {
        if let Some(v) = v {
            slot.clone_from(v);
        }
    };
    set_lines(&mut p.welcome, &cfg.welcome);
    set_lines(&mut p.about, &cfg.about);
    set_lines(&mut p.projects, &cfg.projects);
    set_lines(&mut p.skills, &cfg.skills);
    set_lines(&mut p.contact, &cfg.contact);
    set_lines(&mut p.listing, &cfg.listing);
    p
}

pub fn timing_from_config(cfg: &TypingConfig) -> TypingTiming {
    TypingTiming {
        char_delay: Duration::from_millis(cfg.char_delay_ms),
        line_pause_factor: cfg.line_pause_factor,
    }
}

pub fn session_from_config(cfg: &FolioConfig) -> Session {
    Session::new(
        profile_from_config(&cfg.profile),
        timing_from_config(&cfg.typing),
    )
}

/// Run `lines` without a screen and return the transcript as plain text.
/// The welcome banner is shown fully typed.
pub fn run_exec(mut session: Session, lines: &[String]) -> Vec<String> {
    session.finish_typing();
    for line in lines {
        session.submit(line);
    }
    // `clear` restarts the banner; show it settled.
    session.finish_typing();
    session.snapshot().plain_lines()
}

pub fn build_from_config(t: &mut Tether, cfg: &FolioConfig, session: Session) -> Result<()> {
    let b = t.builder_mut();
    let shutdown = b.shutdown_handle();

    let r_tui = b.reserve::<TuiActor>("tui:main", cfg.ui.mailbox);
    let tui_addr = r_tui.addr();
    let options = TuiOptions {
        frame: Duration::from_millis(cfg.ui.frame_ms),
    };
    let tui = TuiActor::new(session, options, shutdown.clone())?;
    b.start_reserved(r_tui, tui);
    b.track(read_input(tui_addr, shutdown));

    tracing::info!(mailbox = cfg.ui.mailbox, frame_ms = cfg.ui.frame_ms, "tui wired");
    Ok(())
}
