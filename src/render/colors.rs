//! Colors for the office view.
//!
//! Roster agents carry their own brand color; agents that show up without
//! one fall back to the Okabe-Ito colorblind-safe palette by seat. Sleeping
//! agents are drawn desaturated and dimmed so the active ones stand out.

use std::str::FromStr;

use palette::{Desaturate, Hsl, IntoColor, Srgb};
use ratatui::style::Color;

use crate::state::presence::Presence;
use crate::state::roster;

/// Okabe-Ito colorblind-safe palette (8 colors)
///
/// Reference: https://jfly.uni-koeln.de/color/
pub const FALLBACK_COLORS: [Color; 8] = [
    Color::Rgb(0, 114, 178),   // Blue
    Color::Rgb(230, 159, 0),   // Orange
    Color::Rgb(0, 158, 115),   // Bluish Green
    Color::Rgb(240, 228, 66),  // Yellow
    Color::Rgb(86, 180, 233),  // Sky Blue
    Color::Rgb(213, 94, 0),    // Vermillion
    Color::Rgb(204, 121, 167), // Reddish Purple
    Color::Rgb(136, 136, 136), // Gray
];

/// Colors for the two presence states
#[derive(Debug, Clone, Copy)]
pub struct PresenceColors {
    pub active: Color,
    pub sleeping: Color,
}

impl PresenceColors {
    pub fn get(&self, presence: Presence) -> Color {
        match presence {
            Presence::Active => self.active,
            Presence::Sleeping => self.sleeping,
        }
    }
}

pub const PRESENCE_COLORS: PresenceColors = PresenceColors {
    active: Color::Rgb(0, 200, 100),    // Green - working
    sleeping: Color::Rgb(100, 100, 100), // Gray - resting
};

/// Accent used by the logo, borders and titles
pub const ACCENT: Color = Color::Rgb(255, 0, 170);
pub const TEXT: Color = Color::Rgb(180, 180, 190);
pub const MUTED: Color = Color::Rgb(100, 100, 120);
pub const ERROR: Color = Color::Rgb(255, 80, 80);

/// Parse a `#rrggbb` string into a terminal color
pub fn parse_hex(hex: &str) -> Option<Color> {
    let rgb = Srgb::<u8>::from_str(hex).ok()?;
    Some(Color::Rgb(rgb.red, rgb.green, rgb.blue))
}

/// Base color of an agent: its roster color, or a palette color by seat
pub fn agent_color(agent_id: &str, seat: usize) -> Color {
    roster::find(agent_id)
        .and_then(|a| parse_hex(a.color))
        .unwrap_or(FALLBACK_COLORS[seat % FALLBACK_COLORS.len()])
}

/// Drain saturation from a color by `amount` (0.0 = unchanged, 1.0 = gray)
pub fn desaturate(color: Color, amount: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let hsl: Hsl = Srgb::new(r, g, b).into_format::<f32>().into_color();
            let rgb: Srgb = hsl.desaturate(amount.clamp(0.0, 1.0)).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color::Rgb(rgb.red, rgb.green, rgb.blue)
        }
        other => other,
    }
}

/// Dim a color by a factor (0.0 = black, 1.0 = unchanged)
///
/// For non-RGB colors, returns the original color unchanged.
pub fn dim_color(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * factor) as u8,
            (g as f32 * factor) as u8,
            (b as f32 * factor) as u8,
        ),
        other => other,
    }
}

/// Color an agent is drawn with for its presence and pulse brightness
pub fn presence_tint(base: Color, presence: Presence, brightness: f32) -> Color {
    match presence {
        Presence::Active => dim_color(base, brightness),
        Presence::Sleeping => dim_color(desaturate(base, 0.7), brightness),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_roster_colors() {
        assert_eq!(parse_hex("#ff00aa"), Some(Color::Rgb(255, 0, 170)));
        assert_eq!(parse_hex("#00f0ff"), Some(Color::Rgb(0, 240, 255)));
        assert_eq!(parse_hex("not a color"), None);
    }

    #[test]
    fn test_agent_color_uses_roster_then_seat() {
        assert_eq!(agent_color("Analyst", 5), Color::Rgb(255, 255, 0));
        assert_eq!(agent_color("Intern", 6), FALLBACK_COLORS[6]);
        assert_eq!(agent_color("Intern", 8), FALLBACK_COLORS[0]);
    }

    #[test]
    fn test_dim_color() {
        assert_eq!(dim_color(Color::Rgb(100, 200, 50), 0.5), Color::Rgb(50, 100, 25));
        assert_eq!(dim_color(Color::Blue, 0.5), Color::Blue);
    }

    #[test]
    fn test_full_desaturation_is_gray() {
        match desaturate(Color::Rgb(255, 0, 170), 1.0) {
            Color::Rgb(r, g, b) => {
                assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
            }
            other => panic!("unexpected color {:?}", other),
        }
    }

    #[test]
    fn test_presence_colors_get() {
        assert_eq!(PRESENCE_COLORS.get(Presence::Active), PRESENCE_COLORS.active);
        assert_eq!(PRESENCE_COLORS.get(Presence::Sleeping), PRESENCE_COLORS.sleeping);
    }
}
