use crate::{
    transcript,
    view::{self, ViewSnap},
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    event::{Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_actors::{
    actor::{Actor, Addr, Context},
    system::ShutdownHandle,
    timer::ScheduledTask,
};
use folio_core::{InputLine, SubmitOutcome, Terminal as Session, TerminalEvent};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{
    io::{self, Stdout, Write},
    time::Duration,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

const PAGE: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct TuiOptions {
    /// Redraw period.
    pub frame: Duration,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(80),
        }
    }
}

pub enum TuiMsg {
    InputEvent(CtEvent),
    /// Redraw if anything changed.
    Frame,
    /// Advance the welcome run started as `generation`.
    TypingTick { generation: u64 },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Clear,
}

impl EditOp {
    fn apply(self, input: &mut InputLine) {
        match self {
            EditOp::Insert(ch) => input.insert(ch),
            EditOp::Backspace => input.backspace(),
            EditOp::Delete => input.delete(),
            EditOp::Left => input.left(),
            EditOp::Right => input.right(),
            EditOp::Home => input.home(),
            EditOp::End => input.end(),
            EditOp::Clear => input.clear(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Submit,
    Older,
    Newer,
    Complete,
    ScrollUp(usize),
    ScrollDown(usize),
    Edit(EditOp),
    Ignore,
}

fn key_action(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
            KeyAction::Quit
        }
        (KeyCode::Enter, _) => KeyAction::Submit,
        (KeyCode::Up, _) => KeyAction::Older,
        (KeyCode::Down, _) => KeyAction::Newer,
        (KeyCode::Tab, _) => KeyAction::Complete,
        (KeyCode::PageUp, _) => KeyAction::ScrollUp(PAGE),
        (KeyCode::PageDown, _) => KeyAction::ScrollDown(PAGE),
        (KeyCode::Left, _) => KeyAction::Edit(EditOp::Left),
        (KeyCode::Right, _) => KeyAction::Edit(EditOp::Right),
        (KeyCode::Home, _) => KeyAction::Edit(EditOp::Home),
        (KeyCode::End, _) => KeyAction::Edit(EditOp::End),
        (KeyCode::Backspace, _) => KeyAction::Edit(EditOp::Backspace),
        (KeyCode::Delete, _) => KeyAction::Edit(EditOp::Delete),
        (KeyCode::Esc, _) => KeyAction::Edit(EditOp::Clear),
        (KeyCode::Char(_), m) if m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            KeyAction::Ignore
        }
        (KeyCode::Char(ch), _) => KeyAction::Edit(EditOp::Insert(ch)),
        _ => KeyAction::Ignore,
    }
}

/// Raw mode plus alternate screen, left again when dropped.
struct RawScreen;

impl Drop for RawScreen {
    fn drop(&mut self) {
        leave_screen();
    }
}

/// Undone by [`TuiActor`] when it stops, or here if a later step fails.
fn setup_terminal() -> folio_common::Result<(Terminal<CrosstermBackend<Stdout>>, RawScreen)> {
    enable_raw_mode()?;
    let term = enter_screen(io::stdout(), leave_screen)?;
    Ok((term, RawScreen))
}

/// Runs `undo` when any step fails.
fn enter_screen<W: Write>(
    mut out: W,
    undo: impl FnOnce(),
) -> folio_common::Result<Terminal<CrosstermBackend<W>>> {
    let entered = (|| -> folio_common::Result<_> {
        execute!(out, EnterAlternateScreen)?;
        let mut term = Terminal::new(CrosstermBackend::new(out))?;
        term.clear()?;
        Ok(term)
    })();
    entered.inspect_err(|_| undo())
}

fn leave_screen() {
    disable_raw_mode().ok();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

pub struct TuiActor<B: Backend = CrosstermBackend<Stdout>> {
    session: Session,
    events: broadcast::Receiver<TerminalEvent>,

    // terminal
    term: Terminal<B>,
    options: TuiOptions,
    screen: Option<RawScreen>,

    // ui state
    scroll: usize, // from bottom
    dirty: bool,

    // timers
    typing_timer: Option<ScheduledTask>,
    frames: Option<ScheduledTask>,

    shutdown: ShutdownHandle,
}

impl TuiActor {
    /// Take over the controlling terminal.
    pub fn new(session: Session, options: TuiOptions, shutdown: ShutdownHandle) -> Result<Self> {
        let (term, screen) = setup_terminal()?;
        let mut tui = Self::with_terminal(session, options, shutdown, term);
        tui.screen = Some(screen);
        Ok(tui)
    }
}

impl<B: Backend> TuiActor<B> {
    /// Draw onto `term` without touching raw mode or the alternate screen.
    pub fn with_terminal(
        session: Session,
        options: TuiOptions,
        shutdown: ShutdownHandle,
        term: Terminal<B>,
    ) -> Self {
        let events = session.subscribe();
        Self {
            session,
            events,
            term,
            options,
            screen: None,
            scroll: 0,
            dirty: true,
            typing_timer: None,
            frames: None,
            shutdown,
        }
    }

    fn restore_terminal(&mut self) {
        if let Some(screen) = self.screen.take() {
            drop(screen);
            let _ = self.term.show_cursor();
        }
    }
}

impl<B: Backend + Send + 'static> TuiActor<B> {
    /// Replace any pending typing timer with one for the current run.
    fn schedule_typing(&mut self, me: Addr<Self>) {
        if let Some(mut old) = self.typing_timer.take() {
            old.cancel();
        }
        if let Some(delay) = self.session.next_typing_delay() {
            let generation = self.session.typing().generation();
            self.typing_timer = Some(ScheduledTask::send_after(
                delay,
                me,
                TuiMsg::TypingTick { generation },
            ));
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => self.dirty = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = self.session.snapshot();
        let view = ViewSnap {
            lines: transcript::from_snapshot(&snap),
            identity: snap.identity,
            cwd: snap.cwd,
            input: snap.input,
            input_cursor: snap.cursor,
            scroll: self.scroll,
            typing: !snap.typing.complete,
        };
        view::draw(&mut self.term, &view)
    }

    fn quit(&mut self, ctx: &mut Context<Self>) {
        tracing::info!("tui quitting");
        self.typing_timer = None;
        self.frames = None;
        self.restore_terminal();
        self.shutdown.signal();
        ctx.stop();
    }

    fn apply(&mut self, action: KeyAction, ctx: &mut Context<Self>) {
        match action {
            KeyAction::Quit => self.quit(ctx),
            KeyAction::Submit => {
                self.scroll = 0;
                self.dirty = true;
                if self.session.submit_pending() == SubmitOutcome::Cleared
                    && let Some(me) = ctx.addr()
                {
                    self.schedule_typing(me);
                }
            }
            KeyAction::Older => self.session.recall_older(),
            KeyAction::Newer => self.session.recall_newer(),
            KeyAction::Complete => {
                self.session.complete();
            }
            KeyAction::ScrollUp(n) => {
                self.scroll = self.scroll.saturating_add(n);
                self.dirty = true;
            }
            KeyAction::ScrollDown(n) => {
                self.scroll = self.scroll.saturating_sub(n);
                self.dirty = true;
            }
            KeyAction::Edit(op) => self.session.edit(|input| op.apply(input)),
            KeyAction::Ignore => {}
        }
    }
}

impl<B: Backend> Drop for TuiActor<B> {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}

#[async_trait]
impl<B: Backend + Send + 'static> Actor for TuiActor<B> {
    type Msg = TuiMsg;

    async fn started(&mut self, ctx: &mut Context<Self>) -> Result<()> {
        if let Some(me) = ctx.addr() {
            self.frames = Some(ScheduledTask::send_every(self.options.frame, me.clone(), || {
                TuiMsg::Frame
            }));
            self.schedule_typing(me);
        }
        tracing::info!(frame_ms = self.options.frame.as_millis() as u64, "tui started");
        self.draw()
    }

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(CtEvent::Key(k)) => self.apply(key_action(k), ctx),
            TuiMsg::InputEvent(CtEvent::Resize(..)) => self.dirty = true,
            TuiMsg::InputEvent(_) => {}
            TuiMsg::TypingTick { generation } => {
                if self.session.tick_typing(generation).is_some()
                    && let Some(me) = ctx.addr()
                {
                    self.schedule_typing(me);
                }
            }
            TuiMsg::Frame => {
                self.drain_events();
                if self.dirty && !ctx.is_stopping() {
                    self.draw()?;
                    self.dirty = false;
                }
            }
            TuiMsg::Shutdown => self.quit(ctx),
        }

        Ok(())
    }
}
