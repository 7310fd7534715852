use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::controller::Presenter;
use crate::session::SessionSnapshot;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const LEGEND: &str = "(enter) start/stop / (space) pause / (l)anguage / (+/-) secs / (q)uit";

/// Presenter for the terminal: keeps the latest snapshot for the next draw
#[derive(Debug, Default)]
pub struct SnapshotCell {
    snapshot: SessionSnapshot,
    dirty: bool,
}

impl SnapshotCell {
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// True once per new snapshot
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Presenter for SnapshotCell {
    fn render(&mut self, snapshot: &SessionSnapshot) {
        if *snapshot != self.snapshot {
            self.snapshot = snapshot.clone();
            self.dirty = true;
        }
    }
}

impl Widget for &SessionSnapshot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let accent = if self.is_paused {
            Color::Yellow
        } else {
            Color::Magenta
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(0),
                Constraint::Length(2), // word
                Constraint::Length(2), // description
                Constraint::Length(1), // hint
                Constraint::Length(1), // padding
                Constraint::Length(1), // countdown
                Constraint::Length(1), // progress ring
                Constraint::Length(1), // stats
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ({})", self.language_label, self.language_code), bold_style),
            Span::styled(format!("  ·  every {}s", self.interval_secs), dim_style),
            Span::styled(
                self.next_interval_secs
                    .map(|n| format!(", next {n}s"))
                    .unwrap_or_default(),
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        let word_style = if self.is_running {
            bold_style.fg(accent)
        } else {
            bold_style
        };
        let fits = self.word.width() <= chunks[2].width as usize;
        Paragraph::new(Span::styled(self.word.as_str(), word_style))
            .alignment(if fits {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        if let Some(description) = &self.description {
            Paragraph::new(Span::styled(description.as_str(), italic_style))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled(self.hint.as_str(), dim_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let countdown = self
            .countdown_secs
            .map_or_else(|| "–".to_string(), |s| s.to_string());
        Paragraph::new(Span::styled(countdown, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        Gauge::default()
            .gauge_style(Style::default().fg(accent))
            .ratio(self.progress.clamp(0.0, 1.0))
            .label("")
            .render(chunks[7], buf);

        Paragraph::new(Span::styled(
            format!("{} words   {} rounds", self.words_shown, self.rounds),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);

        Paragraph::new(Span::styled(LEGEND, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[10], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(snapshot: &SessionSnapshot) -> String {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        snapshot.render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn idle_screen_shows_dash_countdown() {
        let snap = SessionSnapshot {
            word: "Ready?".into(),
            hint: "62 words loaded · Press start".into(),
            language_code: "EN".into(),
            language_label: "English".into(),
            ..SessionSnapshot::default()
        };
        let text = draw(&snap);
        assert!(text.contains("Ready?"));
        assert!(text.contains("English (EN)"));
        assert!(text.contains("62 words loaded"));
        assert!(text.contains("–"));
        assert!(text.contains("0 words   0 rounds"));
    }

    #[test]
    fn running_screen_shows_word_and_countdown() {
        let snap = SessionSnapshot {
            word: "thunder".into(),
            description: Some("A loud rumbling sound".into()),
            countdown_secs: Some(3),
            progress: 0.4,
            is_running: true,
            words_shown: 4,
            rounds: 1,
            ..SessionSnapshot::default()
        };
        let text = draw(&snap);
        assert!(text.contains("thunder"));
        assert!(text.contains("A loud rumbling sound"));
        assert!(text.contains("4 words   1 rounds"));
        assert!(text.lines().any(|l| l.trim() == "3"));
    }

    #[test]
    fn header_shows_queued_interval() {
        let snap = SessionSnapshot {
            word: "thunder".into(),
            is_running: true,
            interval_secs: 5,
            next_interval_secs: Some(2),
            language_code: "EN".into(),
            language_label: "English".into(),
            ..SessionSnapshot::default()
        };
        let text = draw(&snap);
        assert!(text.contains("every 5s, next 2s"));
    }

    #[test]
    fn snapshot_cell_tracks_changes() {
        let mut cell = SnapshotCell::default();
        let snap = SessionSnapshot {
            word: "echo".into(),
            ..SessionSnapshot::default()
        };

        cell.render(&snap);
        assert!(cell.take_dirty());
        assert!(!cell.take_dirty());

        cell.render(&snap);
        assert!(!cell.take_dirty(), "identical snapshot is not a change");
        assert_eq!(cell.snapshot().word, "echo");
    }
}
