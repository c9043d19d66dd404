use crate::{styles, transcript::TranscriptLine};
use anyhow::Result;
use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

pub struct ViewSnap {
    pub identity: String,
    pub cwd: String,
    pub lines: Vec<TranscriptLine>,
    pub input: String,
    pub input_cursor: usize,
    pub scroll: usize,
    pub typing: bool,
}

pub fn draw<B: Backend>(term: &mut Terminal<B>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(styles::BACKGROUND)), area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        // Title bar
        let [red, yellow, green] = styles::buttons();
        let size = format!("bash - {}x{} ", area.width, area.height);
        let left = vec![
            Span::styled(" ●", red),
            Span::styled(" ●", yellow),
            Span::styled(" ●", green),
            Span::raw("  "),
            Span::styled(format!("{}: {}", snap.identity, snap.cwd), styles::title()),
        ];
        let used: usize = left.iter().map(|s| s.content.width()).sum();
        let pad = (area.width as usize).saturating_sub(used + size.width());
        let mut title = left;
        title.push(Span::raw(" ".repeat(pad)));
        title.push(Span::styled(size, styles::dim()));
        frame.render_widget(Paragraph::new(Line::from(title)), layout[0]);

        // Transcript window
        let visible_h = layout[1].height.saturating_sub(2) as usize;
        let content_width = layout[1].width.saturating_sub(2) as usize;
        let wrapped = wrap_transcript(&snap.lines, content_width);
        let total = wrapped.len();
        let scroll = snap.scroll.min(total.saturating_sub(visible_h));
        let start = total.saturating_sub(visible_h + scroll);
        let end = total.saturating_sub(scroll);

        let items: Vec<ListItem> = wrapped[start..end].iter().cloned().map(ListItem::new).collect();
        let block_title = if scroll > 0 {
            format!(" scrolled back {scroll} ")
        } else {
            String::new()
        };
        let body = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::dim())
                .title(block_title),
        );
        frame.render_widget(body, layout[1]);

        // Input line
        let mut spans: Vec<Span> = crate::transcript::prompt_spans(&snap.identity, &snap.cwd)
            .into_iter()
            .map(|(text, style)| Span::styled(text, style))
            .collect();
        let prompt_w: usize = spans.iter().map(|s| s.content.width()).sum();
        spans.push(Span::styled(snap.input.clone(), styles::command()));
        let input_box = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).border_style(styles::dim()));
        frame.render_widget(Clear, layout[2]);
        frame.render_widget(input_box, layout[2]);

        let caret_x = layout[2].x + 1 + prompt_w as u16 + visual_caret_col(&snap.input, snap.input_cursor);
        frame.set_cursor_position(Position {
            x: caret_x,
            y: layout[2].y + 1,
        });

        // Footer
        let status = if snap.typing { "typing..." } else { "" };
        let footer = Line::from(vec![
            Span::styled(format!(" folio v{}", env!("CARGO_PKG_VERSION")), styles::dim()),
            Span::raw("  "),
            Span::styled(status, styles::dim()),
            Span::raw("  "),
            Span::styled(chrono::Local::now().format("%-m/%-d/%Y").to_string(), styles::dim()),
        ]);
        frame.render_widget(Paragraph::new(footer), layout[3]);
    })?;

    Ok(())
}

fn visual_caret_col(input: &str, cursor: usize) -> u16 {
    UnicodeWidthStr::width(&input[..cursor]) as u16
}

/// Wrap each row to `width` columns. A row's lead spans go on its first
/// wrapped segment and narrow the width available to the text.
fn wrap_transcript(lines: &[TranscriptLine], width: usize) -> Vec<Line<'static>> {
    let effective_width = width.max(1);
    let mut out = Vec::new();

    for entry in lines {
        let lead: Vec<Span<'static>> = entry
            .lead
            .iter()
            .map(|(text, style)| Span::styled(text.clone(), *style))
            .collect();
        // Reserve the lead's columns on the first row only.
        let indent = " ".repeat(entry.lead_width());
        let options = textwrap::Options::new(effective_width).initial_indent(&indent);
        let segments = if entry.text.is_empty() {
            Vec::new()
        } else {
            wrap(&entry.text, options)
        };

        if segments.is_empty() {
            let mut spans = lead;
            spans.push(Span::styled(String::new(), entry.style));
            out.push(Line::from(spans));
            continue;
        }
        for (i, seg) in segments.into_iter().enumerate() {
            let mut spans = Vec::new();
            let text = if i == 0 {
                spans.extend(lead.iter().cloned());
                seg.strip_prefix(indent.as_str()).unwrap_or(seg.as_ref()).to_string()
            } else {
                seg.into_owned()
            };
            spans.push(Span::styled(text, entry.style));
            out.push(Line::from(spans));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn caret_column_counts_display_width() {
        assert_eq!(visual_caret_col("héllo", 3), 2);
        assert_eq!(visual_caret_col("日本", 3), 2);
        assert_eq!(visual_caret_col("", 0), 0);
    }

    #[test]
    fn long_rows_wrap_and_blank_rows_survive() {
        let lines = vec![
            TranscriptLine::new("one two three four".into(), styles::output()),
            TranscriptLine::new(String::new(), styles::output()),
        ];
        let wrapped = wrap_transcript(&lines, 9);
        let texts: Vec<_> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, vec!["one two", "three", "four", ""]);
    }

    #[test]
    fn lead_spans_only_on_the_first_segment() {
        let lead = crate::transcript::prompt_spans("g@p", "~");
        let row = TranscriptLine::new("echo aaaa bbbb".into(), styles::command()).with_lead(lead);
        let wrapped = wrap_transcript(&[row], 14);
        let texts: Vec<_> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, vec!["g@p:~$ echo", "aaaa bbbb"]);
    }
}
