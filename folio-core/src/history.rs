/// Submitted lines, oldest first, with an up/down recall cursor.
///
/// Entries are never deduplicated, trimmed, or edited after being pushed.
/// The cursor counts back from the newest entry: `Some(0)` is the newest,
/// `None` means no recall is in progress.
#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line and end any recall in progress.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
        self.cursor = None;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Step toward older entries, stopping at the oldest.
    ///
    /// Returns the recalled line, or `None` when there is no history (the
    /// cursor is left untouched in that case).
    pub fn older(&mut self) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;
        let next = match self.cursor {
            None => 0,
            Some(c) => (c + 1).min(last),
        };
        self.cursor = Some(next);
        Some(&self.entries[last - next])
    }

    /// Step toward newer entries. Stepping past the newest ends the recall
    /// and returns `None`, meaning the input should be emptied.
    pub fn newer(&mut self) -> Option<&str> {
        self.cursor = match self.cursor {
            Some(c) if c > 0 => Some(c - 1),
            _ => None,
        };
        let c = self.cursor?;
        Some(&self.entries[self.entries.len() - 1 - c])
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(lines: &[&str]) -> HistoryLog {
        let mut h = HistoryLog::new();
        for l in lines {
            h.push(*l);
        }
        h
    }

    #[test]
    fn up_up_up_down_down() {
        let mut h = log(&["a", "b"]);
        assert_eq!(h.older(), Some("b"));
        assert_eq!(h.older(), Some("a"));
        assert_eq!(h.older(), Some("a"));
        assert_eq!(h.newer(), Some("b"));
        assert_eq!(h.newer(), None);
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn older_on_empty_history_does_nothing() {
        let mut h = HistoryLog::new();
        assert_eq!(h.older(), None);
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn newer_without_recall_stays_idle() {
        let mut h = log(&["a"]);
        assert_eq!(h.newer(), None);
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn push_resets_recall_and_keeps_duplicates() {
        let mut h = log(&["ls", "ls"]);
        h.older();
        h.push("ls");
        assert_eq!(h.cursor(), None);
        assert_eq!(h.entries(), &["ls", "ls", "ls"]);
    }
}
