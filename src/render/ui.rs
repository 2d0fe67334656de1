use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::services::{NoticeLevel, Notification};

use super::colors::{dim_color, ACCENT, ERROR, MUTED, PRESENCE_COLORS, TEXT};
use super::symbols::LIVE_DOT;
use super::{put_str, DisplayMode};

/// Status bar at the bottom of the screen
pub struct StatusBar<'a> {
    connected: bool,
    /// Studio-wide stop is in effect
    asleep: bool,
    active: usize,
    total: usize,
    last_drop: Option<DateTime<Local>>,
    notification: Option<&'a Notification>,
    display_mode: DisplayMode,
    /// Seconds since start, drives the live heartbeat
    clock: f32,
    unicode: bool,
}

impl<'a> StatusBar<'a> {
    pub fn new(active: usize, total: usize) -> Self {
        Self {
            connected: false,
            asleep: false,
            active,
            total,
            last_drop: None,
            notification: None,
            display_mode: DisplayMode::default(),
            clock: 0.0,
            unicode: true,
        }
    }

    pub fn connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    pub fn asleep(mut self, asleep: bool) -> Self {
        self.asleep = asleep;
        self
    }

    pub fn last_drop(mut self, last_drop: Option<DateTime<Local>>) -> Self {
        self.last_drop = last_drop;
        self
    }

    pub fn notification(mut self, notification: Option<&'a Notification>) -> Self {
        self.notification = notification;
        self
    }

    pub fn display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn clock(mut self, clock: f32) -> Self {
        self.clock = clock;
        self
    }

    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height == 0 {
            return;
        }

        // Background
        let bg_style = Style::default().bg(Color::Rgb(25, 25, 35));
        for x in area.x..area.right() {
            buf[(x, area.y)].set_style(bg_style);
        }

        let max_x = area.right() - 1;
        let label_style = Style::default().fg(MUTED);
        let value_style = Style::default().fg(TEXT);
        let accent_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);

        let mut x = put_str(buf, area.x + 1, area.y, "◈ ATELIER", accent_style, max_x) + 2;

        // Connectivity, with a heartbeat while live
        let (dot_color, status_text) = if self.connected {
            let beat = crate::animation::heartbeat(self.clock, 50.0);
            (dim_color(PRESENCE_COLORS.active, 0.6 + 0.4 * beat), "LIVE")
        } else {
            (ERROR, "OFFLINE")
        };
        if x <= max_x {
            buf[(x, area.y)]
                .set_char(LIVE_DOT.render(self.unicode))
                .set_style(Style::default().fg(dot_color));
        }
        x = put_str(buf, x + 2, area.y, status_text, Style::default().fg(dot_color), max_x) + 2;

        let count_text = format!("Agents: {}/{}", self.active, self.total);
        x = put_str(buf, x, area.y, &count_text, value_style, max_x) + 2;

        if self.asleep {
            let asleep_style = Style::default().fg(PRESENCE_COLORS.sleeping).add_modifier(Modifier::BOLD);
            x = put_str(buf, x, area.y, "STUDIO ASLEEP", asleep_style, max_x) + 2;
        }

        let drop_text = match self.last_drop {
            Some(at) => format!("Last drop: {}", at.format("%H:%M")),
            None => "Last drop: --".to_string(),
        };
        x = put_str(buf, x, area.y, &drop_text, label_style, max_x) + 2;

        let mode_text = format!("[{}]", self.display_mode.name());
        x = put_str(buf, x, area.y, &mode_text, Style::default().fg(Color::Rgb(150, 200, 255)), max_x) + 2;

        // Right-aligned help hint
        let help_text = "w:wake s:stop ?:help";
        let help_x = area.right().saturating_sub(help_text.len() as u16 + 1);

        // Notification fills the gap before the hint
        if let Some(notice) = self.notification {
            let color = match notice.level {
                NoticeLevel::Info => Color::Rgb(255, 200, 80),
                NoticeLevel::Error => ERROR,
            };
            let end = help_x.saturating_sub(2).max(x);
            put_str(buf, x, area.y, &notice.text, Style::default().fg(color), end);
        }

        if help_x > x {
            put_str(buf, help_x, area.y, help_text, label_style, max_x);
        }
    }
}

/// Help overlay widget
pub struct HelpOverlay;

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Semi-transparent background
        let bg_style = Style::default().bg(Color::Rgb(20, 20, 30));
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                buf[(x, y)].set_style(bg_style);
            }
        }

        let box_width = 46u16.min(area.width);
        let box_height = 15u16.min(area.height);
        if box_width < 20 || box_height < 6 {
            return;
        }
        let box_x = area.x + (area.width - box_width) / 2;
        let box_y = area.y + (area.height - box_height) / 2;

        let box_bg = Style::default().bg(Color::Rgb(35, 35, 45));
        for y in box_y..box_y + box_height {
            for x in box_x..box_x + box_width {
                buf[(x, y)].set_char(' ').set_style(box_bg);
            }
        }

        // Draw border
        let border_style = Style::default().fg(ACCENT);
        let right = box_x + box_width - 1;
        let bottom = box_y + box_height - 1;
        for x in box_x..=right {
            buf[(x, box_y)].set_char('─').set_style(border_style);
            buf[(x, bottom)].set_char('─').set_style(border_style);
        }
        for y in box_y..=bottom {
            buf[(box_x, y)].set_char('│').set_style(border_style);
            buf[(right, y)].set_char('│').set_style(border_style);
        }
        buf[(box_x, box_y)].set_char('╭').set_style(border_style);
        buf[(right, box_y)].set_char('╮').set_style(border_style);
        buf[(box_x, bottom)].set_char('╰').set_style(border_style);
        buf[(right, bottom)].set_char('╯').set_style(border_style);

        let title = " Atelier Controls ";
        let title_x = box_x + (box_width.saturating_sub(title.len() as u16)) / 2;
        put_str(buf, title_x, box_y, title, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD), right);

        let key_style = Style::default()
            .fg(Color::Rgb(200, 200, 100))
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(TEXT);

        let controls = [
            ("q, Esc", "Quit"),
            ("w", "Wake the studio"),
            ("s", "Stop every agent"),
            ("g", "Reload the gallery"),
            ("m, Tab", "Cycle display mode"),
            ("1/2", "Office/Gallery"),
            ("j/k", "Scroll the gallery"),
            ("?", "Toggle this help"),
        ];

        let mut y = box_y + 2;
        for (key, desc) in controls {
            if y >= bottom - 1 {
                break;
            }
            put_str(buf, box_x + 3, y, key, key_style, right - 1);
            put_str(buf, box_x + 15, y, desc, desc_style, right - 1);
            y += 1;
        }

        let footer = "Press any key to close";
        let footer_x = box_x + (box_width.saturating_sub(footer.len() as u16)) / 2;
        put_str(buf, footer_x, bottom - 1, footer, Style::default().fg(MUTED), right - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_status_bar_offline_and_counts() {
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(2, 6).render(area, &mut buf);

        let text = row(&buf, 0);
        assert!(text.contains("OFFLINE"));
        assert!(text.contains("Agents: 2/6"));
        assert!(text.contains("Last drop: --"));
        assert!(text.contains("?:help"));
    }

    #[test]
    fn test_status_bar_shows_notification() {
        let area = Rect::new(0, 0, 160, 1);
        let mut buf = Buffer::empty(area);
        let notice = Notification::info("Studio is waking up");
        StatusBar::new(0, 6)
            .connected(true)
            .asleep(true)
            .notification(Some(&notice))
            .render(area, &mut buf);

        let text = row(&buf, 0);
        assert!(text.contains("LIVE"));
        assert!(text.contains("STUDIO ASLEEP"));
        assert!(text.contains("Studio is waking up"));
    }

    #[test]
    fn test_help_overlay_lists_controls() {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        HelpOverlay.render(area, &mut buf);

        let text: String = (0..24).map(|y| row(&buf, y)).collect();
        assert!(text.contains("Wake the studio"));
        assert!(text.contains("Press any key to close"));
    }
}
