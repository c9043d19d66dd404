use crate::styles;
use folio_core::Snapshot;
use ratatui::style::Style;

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptLine {
    /// Spans drawn before `text` on the first wrapped row only.
    pub lead: Vec<(String, Style)>,
    pub text: String,
    pub style: Style,
}

impl TranscriptLine {
    pub fn new(text: String, style: Style) -> Self {
        Self {
            lead: Vec::new(),
            text,
            style,
        }
    }

    pub fn with_lead(mut self, lead: Vec<(String, Style)>) -> Self {
        self.lead = lead;
        self
    }

    pub fn lead_width(&self) -> usize {
        use unicode_width::UnicodeWidthStr;
        self.lead.iter().map(|(s, _)| s.width()).sum()
    }
}

/// `user@host:cwd$ ` as styled spans.
pub fn prompt_spans(identity: &str, cwd: &str) -> Vec<(String, Style)> {
    vec![
        (identity.to_string(), styles::user()),
        (":".to_string(), styles::punct()),
        (cwd.to_string(), styles::path()),
        ("$ ".to_string(), styles::punct()),
    ]
}

fn output_style(line: &str) -> Style {
    if line.starts_with("Command not found: ") || line.starts_with("Failed to open ") {
        styles::error()
    } else {
        styles::output()
    }
}

/// Flatten a snapshot into display rows, one blank row between entries.
pub fn from_snapshot(snap: &Snapshot) -> Vec<TranscriptLine> {
    let mut out = Vec::new();
    for (i, entry) in snap.entries.iter().enumerate() {
        if i > 0 {
            out.push(TranscriptLine::new(String::new(), styles::output()));
        }
        match &entry.command {
            Some(cmd) => {
                out.push(
                    TranscriptLine::new(cmd.clone(), styles::command())
                        .with_lead(prompt_spans(&snap.identity, &snap.cwd)),
                );
                out.extend(
                    entry
                        .lines
                        .iter()
                        .map(|l| TranscriptLine::new(l.clone(), output_style(l))),
                );
            }
            None => out.extend(
                entry
                    .lines
                    .iter()
                    .map(|l| TranscriptLine::new(l.clone(), styles::welcome())),
            ),
        }
    }
    out
}
