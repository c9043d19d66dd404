/// Where an entry's lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    Lines(Vec<String>),
    /// Mirrors the active typing run; resolved when a snapshot is taken.
    Welcome,
}

/// One turn of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    /// The echoed input; `None` for the welcome banner.
    pub command: Option<String>,
    pub body: EntryBody,
}

/// Append-only list of entries. Only [`Transcript::reset`] removes anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<OutputEntry>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A transcript holding only the welcome banner.
    pub fn new() -> Self {
        Self {
            entries: vec![OutputEntry {
                command: None,
                body: EntryBody::Welcome,
            }],
        }
    }

    pub fn push(&mut self, command: impl Into<String>, lines: Vec<String>) {
        self.entries.push(OutputEntry {
            command: Some(command.into()),
            body: EntryBody::Lines(lines),
        });
    }

    pub fn push_line(&mut self, command: impl Into<String>, line: impl Into<String>) {
        self.push(command, vec![line.into()]);
    }

    /// Drop everything and start again from a fresh welcome banner.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&OutputEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_welcome_only() {
        let t = Transcript::new();
        assert_eq!(t.len(), 1);
        assert_eq!(t.entries()[0].command, None);
        assert_eq!(t.entries()[0].body, EntryBody::Welcome);
    }

    #[test]
    fn reset_discards_appended_entries() {
        let mut t = Transcript::new();
        t.push_line("whoami", "guest");
        t.push("ls", vec!["a".into(), "b".into()]);
        assert_eq!(t.len(), 3);
        t.reset();
        assert_eq!(t, Transcript::new());
    }
}
