//! Chat feed widget for the dripped studio activity.
//!
//! Shows the display log oldest first, newest at the bottom. Entries fade
//! with age, and a typing indicator sits under the last line while more
//! activity is still queued.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::state::{Agent, DisplayLog};

use super::colors::{agent_color, ACCENT, MUTED, TEXT};
use super::put_str;
use super::symbols::TYPING_DOT;

/// Widget for rendering the chat feed.
pub struct ChatFeedWidget<'a> {
    log: &'a DisplayLog,
    /// Seated agents, for coloring entries by seat
    agents: &'a [Agent],
    /// Agent whose entry is next in the backlog, shown while typing
    typing: Option<&'a str>,
    /// Maximum age in seconds before an entry is fully faded
    max_age: f32,
    unicode: bool,
    clock: f32,
}

impl<'a> ChatFeedWidget<'a> {
    pub fn new(log: &'a DisplayLog) -> Self {
        Self {
            log,
            agents: &[],
            typing: None,
            max_age: 60.0,
            unicode: true,
            clock: 0.0,
        }
    }

    pub fn agents(mut self, agents: &'a [Agent]) -> Self {
        self.agents = agents;
        self
    }

    pub fn typing(mut self, agent: Option<&'a str>) -> Self {
        self.typing = agent;
        self
    }

    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    pub fn clock(mut self, clock: f32) -> Self {
        self.clock = clock;
        self
    }

    /// Calculate the opacity for an entry based on its age.
    fn opacity_for_age(&self, age_seconds: f32) -> f32 {
        // Start fading after 10 seconds, never below 40%
        let fade_start = 10.0;
        if age_seconds < fade_start {
            1.0
        } else {
            let fade_progress = (age_seconds - fade_start) / (self.max_age - fade_start);
            (1.0 - fade_progress).clamp(0.4, 1.0)
        }
    }

    /// Apply opacity to a color.
    fn apply_opacity(color: Color, opacity: f32) -> Color {
        super::colors::dim_color(color, opacity)
    }
}

impl Widget for ChatFeedWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 4 {
            return;
        }

        let max_x = area.right() - 1;
        let mut y = area.y;

        let title_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        put_str(buf, area.x, y, " Studio Chat ", title_style, max_x);
        y += 1;

        // Reserve the last row for the typing indicator
        let reserved = u16::from(self.typing.is_some());
        let available_height = area.bottom().saturating_sub(y + reserved) as usize;

        if self.log.is_empty() {
            if available_height > 0 {
                let hint_style = Style::default().fg(MUTED);
                put_str(buf, area.x + 1, y, "Quiet in the studio...", hint_style, max_x);
            }
        } else {
            let entries: Vec<_> = self.log.entries().collect();
            let start_idx = entries.len().saturating_sub(available_height);

            for entry in &entries[start_idx..] {
                let opacity = self.opacity_for_age(entry.age_seconds());
                let seat = self
                    .agents
                    .iter()
                    .find(|a| a.id == entry.agent_id)
                    .map_or(0, |a| a.seat);
                let agent_style = Style::default()
                    .fg(Self::apply_opacity(agent_color(&entry.agent_id, seat), opacity))
                    .add_modifier(Modifier::BOLD);
                let time_style = Style::default().fg(Self::apply_opacity(MUTED, opacity));
                let msg_style = Style::default().fg(Self::apply_opacity(TEXT, opacity));

                // Format: "12:04:31 Agent  action: message"
                let mut x = area.x + 1;
                x = put_str(buf, x, y, &entry.captured_at.format("%H:%M:%S").to_string(), time_style, max_x);
                x = put_str(buf, x + 1, y, &entry.agent_id, agent_style, max_x);
                let line = if entry.message.is_empty() {
                    entry.action.clone()
                } else {
                    format!("{}: {}", entry.action, entry.message)
                };
                put_str(buf, x + 1, y, &line, msg_style, max_x);

                y += 1;
            }
        }

        if let Some(agent) = self.typing {
            let typing_y = area.bottom() - 1;
            if typing_y >= area.y + 1 {
                let dots = crate::animation::typing_dots(self.clock, 3.0);
                let dot = TYPING_DOT.render(self.unicode);
                let indicator: String = std::iter::repeat(dot).take(dots).collect();
                let style = Style::default().fg(MUTED).add_modifier(Modifier::ITALIC);
                let x = put_str(buf, area.x + 1, typing_y, &format!("{:<3}", indicator), style, max_x);
                put_str(buf, x + 1, typing_y, &format!("{} is typing", agent), style, max_x);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AgentStatusEvent;
    use crate::state::drip::DripScheduler;
    use crate::event::AgentStatus;

    fn screen_text(buf: &Buffer) -> Vec<String> {
        (buf.area.y..buf.area.bottom())
            .map(|y| {
                (buf.area.x..buf.area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    fn log_with(entries: &[(&str, &str, &str)], capacity: usize) -> DisplayLog {
        let mut drip = DripScheduler::new();
        let mut log = DisplayLog::new(capacity);
        for (agent, action, message) in entries {
            drip.enqueue(AgentStatusEvent::new(agent, &AgentStatus::new(*action, *message)));
            drip.tick(&mut log);
        }
        log
    }

    #[test]
    fn test_opacity_fades_with_floor() {
        let log = DisplayLog::default();
        let widget = ChatFeedWidget::new(&log);
        assert_eq!(widget.opacity_for_age(1.0), 1.0);
        assert!(widget.opacity_for_age(35.0) < 1.0);
        assert_eq!(widget.opacity_for_age(600.0), 0.4);
    }

    #[test]
    fn test_newest_entries_stay_visible() {
        let log = log_with(
            &[
                ("Artist", "Painting", "koi"),
                ("Curator", "Reviewing", "koi"),
                ("Manager", "Uploading", "koi"),
            ],
            8,
        );
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        ChatFeedWidget::new(&log).render(area, &mut buf);

        let rows = screen_text(&buf);
        assert!(rows[0].contains("Studio Chat"));
        assert!(rows[1].contains("Curator"));
        assert!(rows[2].contains("Manager"));
        assert!(rows[2].contains("Uploading: koi"));
    }

    #[test]
    fn test_typing_indicator_on_last_row() {
        let log = log_with(&[("Artist", "Painting", "koi")], 8);
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);
        ChatFeedWidget::new(&log)
            .typing(Some("Curator"))
            .unicode(false)
            .render(area, &mut buf);

        let rows = screen_text(&buf);
        assert!(rows[1].contains("Artist"));
        assert!(rows[3].contains("Curator is typing"));
    }

    #[test]
    fn test_empty_feed_hint() {
        let log = DisplayLog::default();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        ChatFeedWidget::new(&log).render(area, &mut buf);
        assert!(screen_text(&buf)[1].contains("Quiet in the studio"));
    }
}
