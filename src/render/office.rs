//! The office floor: one card per agent, laid out in a grid.
//!
//! Active agents glow, bounce and speak through a bubble; sleeping agents
//! are drawn desaturated with no bubble.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::state::presence::Presence;
use crate::state::{roster, Agent};

use super::colors::{agent_color, dim_color, presence_tint, MUTED, PRESENCE_COLORS, TEXT};
use super::symbols::{AVATAR, SNORE};
use super::{put_str, wrap_text};

const CARD_MIN_WIDTH: u16 = 24;
const CARD_HEIGHT: u16 = 8;

/// Split `area` into card slots for `count` agents, row by row
pub fn card_grid(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 || area.width == 0 || area.height == 0 {
        return Vec::new();
    }

    let columns = (area.width / CARD_MIN_WIDTH).clamp(1, 3) as usize;
    let rows = count.div_ceil(columns);
    let card_width = area.width / columns as u16;
    let card_height = (area.height / rows as u16).clamp(1, CARD_HEIGHT);

    (0..count)
        .map(|i| {
            let col = (i % columns) as u16;
            let row = (i / columns) as u16;
            Rect::new(
                area.x + col * card_width,
                area.y + row * card_height,
                card_width,
                card_height,
            )
        })
        .filter(|r| r.bottom() <= area.bottom())
        .collect()
}

/// Widget for the whole office floor
pub struct OfficeWidget<'a> {
    agents: &'a [Agent],
    unicode: bool,
    /// Seconds since start, drives the sleeping breath
    clock: f32,
}

impl<'a> OfficeWidget<'a> {
    pub fn new(agents: &'a [Agent]) -> Self {
        Self {
            agents,
            unicode: true,
            clock: 0.0,
        }
    }

    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    pub fn clock(mut self, clock: f32) -> Self {
        self.clock = clock;
        self
    }
}

impl Widget for OfficeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (agent, slot) in self.agents.iter().zip(card_grid(area, self.agents.len())) {
            render_card(agent, slot, buf, self.unicode, self.clock);
        }
    }
}

fn render_card(agent: &Agent, area: Rect, buf: &mut Buffer, unicode: bool, clock: f32) {
    if area.width < 6 || area.height < 3 {
        return;
    }

    let base = agent_color(&agent.id, agent.seat);
    let brightness = match agent.presence {
        Presence::Active => agent.pulse_brightness(),
        Presence::Sleeping => 0.4 + 0.2 * (crate::animation::breathing(clock, 0.25) - 0.6) / 0.4,
    };
    let tint = presence_tint(base, agent.presence, brightness);
    let frame_style = Style::default().fg(match agent.presence {
        Presence::Active => dim_color(base, 0.7),
        Presence::Sleeping => dim_color(tint, 0.8),
    });

    // Card border
    let right = area.right() - 1;
    let bottom = area.bottom() - 1;
    for x in area.x..=right {
        buf[(x, area.y)].set_char('─').set_style(frame_style);
        buf[(x, bottom)].set_char('─').set_style(frame_style);
    }
    for y in area.y..=bottom {
        buf[(area.x, y)].set_char('│').set_style(frame_style);
        buf[(right, y)].set_char('│').set_style(frame_style);
    }
    buf[(area.x, area.y)].set_char('╭').set_style(frame_style);
    buf[(right, area.y)].set_char('╮').set_style(frame_style);
    buf[(area.x, bottom)].set_char('╰').set_style(frame_style);
    buf[(right, bottom)].set_char('╯').set_style(frame_style);

    let inner_x = area.x + 2;
    let max_x = right.saturating_sub(1);
    let mut y = area.y + 1;

    // Avatar line, lifted one row while bouncing
    let avatar_y = if agent.bounce() > 0 && y > area.y + 1 { y - 1 } else { y };
    let mut avatar_style = Style::default().fg(tint);
    if agent.presence.is_active() {
        avatar_style = avatar_style.add_modifier(Modifier::BOLD);
    }
    buf[(inner_x, avatar_y)]
        .set_char(AVATAR.get(agent.presence).render(unicode))
        .set_style(avatar_style);
    if !agent.presence.is_active() && inner_x + 1 <= max_x {
        buf[(inner_x + 1, area.y)]
            .set_char(SNORE.render(unicode))
            .set_style(Style::default().fg(MUTED));
    }

    let name_style = Style::default().fg(tint).add_modifier(Modifier::BOLD);
    put_str(buf, inner_x + 2, y, &agent.id, name_style, max_x);
    y += 1;

    if let Some(seat) = roster::find(&agent.id) {
        if y < bottom {
            let badge = if unicode {
                format!("{} {}", seat.emoji, seat.role)
            } else {
                seat.role.to_string()
            };
            put_str(buf, inner_x, y, &badge, Style::default().fg(MUTED), max_x);
            y += 1;
        }
    }

    if y < bottom {
        let action_style = Style::default().fg(PRESENCE_COLORS.get(agent.presence));
        put_str(buf, inner_x, y, &agent.status.action, action_style, max_x);
        y += 1;
    }

    // Speech bubble
    if agent.shows_bubble() && !agent.status.message.is_empty() {
        let width = max_x.saturating_sub(inner_x + 1) as usize;
        let bubble_style = Style::default().fg(TEXT);
        let quote_style = Style::default().fg(dim_color(base, 0.8));
        for line in wrap_text(&agent.status.message, width) {
            if y >= bottom {
                break;
            }
            buf[(inner_x, y)].set_char('▏').set_style(quote_style);
            put_str(buf, inner_x + 1, y, &line, bubble_style, max_x);
            y += 1;
        }
    }
}
