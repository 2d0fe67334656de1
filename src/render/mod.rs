pub mod chat_feed;
pub mod colors;
pub mod display_mode;
pub mod gallery;
pub mod office;
pub mod symbols;
pub mod ui;

use ratatui::{buffer::Buffer, style::Style};

pub use chat_feed::ChatFeedWidget;
pub use display_mode::DisplayMode;
pub use gallery::GalleryWidget;
pub use office::OfficeWidget;
pub use symbols::detect_unicode;
pub use ui::{HelpOverlay, StatusBar};

/// Shorten `text` to at most `width` chars, ending in an ellipsis when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let head: String = text.chars().take(width - 3).collect();
    format!("{}...", head)
}

/// Draw `text` starting at (x, y) without passing column `max_x`.
///
/// Returns the column after the last drawn cell.
pub fn put_str(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style, max_x: u16) -> u16 {
    if x > max_x || !buf.area.contains((x, y).into()) {
        return x;
    }
    let width = (max_x - x + 1) as usize;
    let (end, _) = buf.set_stringn(x, y, truncate(text, width), width, style);
    end
}

/// Greedy word wrap; words wider than a line are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
