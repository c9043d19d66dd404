//! Character-by-character reveal of a list of lines.
//!
//! The sequencer is a pure state machine: the host asks for
//! [`TypingSequencer::next_delay`], waits that long, then calls
//! [`TypingSequencer::tick`]. Every restart bumps the generation so a host
//! can tag its timer messages and drop ones from an earlier run.
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTiming {
    pub char_delay: Duration,
    /// Pause after a finished line, as a multiple of `char_delay`.
    pub line_pause_factor: u32,
}

impl Default for TypingTiming {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(40),
            line_pause_factor: 20,
        }
    }
}

impl TypingTiming {
    pub fn line_pause(&self) -> Duration {
        self.char_delay * self.line_pause_factor
    }
}

/// What a single [`TypingSequencer::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Revealed one more character of the current line.
    Typed,
    /// Finished the pause and moved to the next line.
    NextLine,
    /// Finished the pause after the last line.
    Completed,
    /// Already complete; nothing changed.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSequencer {
    source: Vec<String>,
    /// Fully typed lines followed by the partial current line, if started.
    revealed: Vec<String>,
    line: usize,
    /// Chars revealed on the current line.
    chars: usize,
    /// Byte offset of the next char on the current line.
    offset: usize,
    complete: bool,
    generation: u64,
    timing: TypingTiming,
}

impl TypingSequencer {
    pub fn new(source: Vec<String>, timing: TypingTiming) -> Self {
        let complete = source.is_empty();
        let mut seq = Self {
            source,
            revealed: Vec::new(),
            line: 0,
            chars: 0,
            offset: 0,
            complete,
            generation: 0,
            timing,
        };
        if !complete {
            seq.enter_line();
        }
        seq
    }

    /// An empty line is fully typed the moment it becomes current.
    fn enter_line(&mut self) {
        if self.source[self.line].is_empty() {
            self.revealed.push(String::new());
        }
    }

    /// Start over from `(0, 0)`, even if `source` equals the current one.
    pub fn restart(&mut self, source: Vec<String>) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::new(source, self.timing)
        };
        tracing::debug!(generation, lines = self.source.len(), "typing run started");
    }

    /// Restart only when `source` differs by value. Returns whether it did.
    pub fn set_source(&mut self, source: Vec<String>) -> bool {
        if source == self.source {
            return false;
        }
        self.restart(source);
        true
    }

    pub fn source(&self) -> &[String] {
        &self.source
    }

    pub fn timing(&self) -> TypingTiming {
        self.timing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// `(line index, char index)` of the next character to reveal.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.chars)
    }

    /// The lines to display right now.
    pub fn lines(&self) -> &[String] {
        if self.complete {
            &self.source
        } else {
            &self.revealed
        }
    }

    fn current_line_done(&self) -> bool {
        self.offset >= self.source[self.line].len()
    }

    /// How long to wait before the next [`tick`](Self::tick); `None` once complete.
    pub fn next_delay(&self) -> Option<Duration> {
        if self.complete {
            None
        } else if self.current_line_done() {
            Some(self.timing.line_pause())
        } else {
            Some(self.timing.char_delay)
        }
    }

    pub fn tick(&mut self) -> Step {
        if self.complete {
            return Step::Idle;
        }

        let src = &self.source[self.line];
        if let Some(ch) = src[self.offset..].chars().next() {
            if self.revealed.len() == self.line {
                self.revealed.push(String::new());
            }
            self.revealed[self.line].push(ch);
            self.offset += ch.len_utf8();
            self.chars += 1;
            return Step::Typed;
        }

        // Line done and the pause has elapsed.
        if self.line + 1 < self.source.len() {
            self.line += 1;
            self.chars = 0;
            self.offset = 0;
            self.enter_line();
            Step::NextLine
        } else {
            self.complete = true;
            tracing::debug!(generation = self.generation, "typing run completed");
            Step::Completed
        }
    }

    /// Tick until complete. Returns the number of ticks taken.
    pub fn finish(&mut self) -> usize {
        let mut n = 0;
        while self.tick() != Step::Idle {
            n += 1;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(lines: &[&str]) -> TypingSequencer {
        TypingSequencer::new(
            lines.iter().map(|s| s.to_string()).collect(),
            TypingTiming::default(),
        )
    }

    #[test]
    fn empty_source_is_complete_immediately() {
        let mut s = seq(&[]);
        assert!(s.is_complete());
        assert_eq!(s.next_delay(), None);
        assert!(s.lines().is_empty());
        assert_eq!(s.tick(), Step::Idle);
    }

    #[test]
    fn reveals_one_char_per_tick_then_pauses() {
        let mut s = seq(&["ab", "c"]);
        assert!(s.lines().is_empty());
        assert_eq!(s.next_delay(), Some(Duration::from_millis(40)));

        assert_eq!(s.tick(), Step::Typed);
        assert_eq!(s.lines(), &["a"]);
        assert_eq!(s.tick(), Step::Typed);
        assert_eq!(s.lines(), &["ab"]);
        assert_eq!(s.position(), (0, 2));

        assert_eq!(s.next_delay(), Some(Duration::from_millis(800)));
        assert_eq!(s.tick(), Step::NextLine);
        assert_eq!(s.position(), (1, 0));
        assert_eq!(s.lines(), &["ab"]);

        assert_eq!(s.tick(), Step::Typed);
        assert_eq!(s.lines(), &["ab", "c"]);
        assert!(!s.is_complete());
        assert_eq!(s.tick(), Step::Completed);
        assert!(s.is_complete());
        assert_eq!(s.next_delay(), None);
    }

    #[test]
    fn empty_line_goes_straight_to_pause() {
        let mut s = seq(&["", "x"]);
        assert_eq!(s.lines(), &[""]);
        assert_eq!(s.next_delay(), Some(Duration::from_millis(800)));
        assert_eq!(s.tick(), Step::NextLine);
        assert_eq!(s.lines(), &[""]);
        assert_eq!(s.tick(), Step::Typed);
        assert_eq!(s.lines(), &["", "x"]);
    }

    #[test]
    fn empty_line_is_shown_for_its_whole_pause() {
        let mut s = seq(&["a", "", "b"]);
        assert_eq!(s.tick(), Step::Typed);
        assert_eq!(s.tick(), Step::NextLine);
        assert_eq!(s.position(), (1, 0));
        assert_eq!(s.lines(), &["a", ""]);
        assert_eq!(s.next_delay(), Some(s.timing().line_pause()));
        assert_eq!(s.tick(), Step::NextLine);
        assert_eq!(s.lines(), &["a", ""]);
        assert_eq!(s.tick(), Step::Typed);
        assert_eq!(s.lines(), &["a", "", "b"]);
    }

    #[test]
    fn pause_is_independent_of_line_length() {
        let timing = TypingTiming {
            char_delay: Duration::from_millis(5),
            line_pause_factor: 20,
        };
        let mut s = TypingSequencer::new(vec!["a".into(), "a much longer line".into()], timing);
        s.tick();
        assert_eq!(s.next_delay(), Some(Duration::from_millis(100)));
        while s.position().0 == 0 {
            s.tick();
        }
        while s.next_delay() == Some(Duration::from_millis(5)) {
            s.tick();
        }
        assert_eq!(s.next_delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn terminates_at_source_and_stays_there() {
        let mut s = seq(&["Welcome!", "", "Type 'help' ünïcode"]);
        let ticks = s.finish();
        let expected_chars: usize = s.source().iter().map(|l| l.chars().count()).sum();
        assert_eq!(ticks, expected_chars + s.source().len());
        assert_eq!(s.lines(), s.source());

        let frozen = s.clone();
        for _ in 0..5 {
            assert_eq!(s.tick(), Step::Idle);
        }
        assert_eq!(s, frozen);
    }

    #[test]
    fn every_tick_extends_a_prefix() {
        let mut s = seq(&["hello", "wörld", "", "!"]);
        let mut prev: Vec<String> = s.lines().to_vec();
        while !s.is_complete() {
            s.tick();
            let cur = s.lines().to_vec();
            assert!(cur.len() >= prev.len());
            for (i, line) in cur.iter().enumerate() {
                assert!(s.source()[i].starts_with(line.as_str()));
                if let Some(p) = prev.get(i) {
                    assert!(line.starts_with(p.as_str()));
                }
            }
            prev = cur;
        }
    }

    #[test]
    fn restart_resets_position_and_bumps_generation() {
        let mut s = seq(&["abc"]);
        s.tick();
        s.tick();
        let g = s.generation();
        s.restart(vec!["abc".into()]);
        assert_eq!(s.position(), (0, 0));
        assert!(s.lines().is_empty());
        assert_eq!(s.generation(), g + 1);
    }

    #[test]
    fn set_source_compares_by_value() {
        let mut s = seq(&["abc"]);
        s.tick();
        assert!(!s.set_source(vec!["abc".to_string()]));
        assert_eq!(s.position(), (0, 1));
        assert!(s.set_source(vec!["xyz".to_string()]));
        assert_eq!(s.position(), (0, 0));
    }
}
