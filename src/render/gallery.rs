use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::Artwork;

use super::colors::{ACCENT, MUTED, TEXT};
use super::put_str;
use super::symbols::BULLET;

/// Rows one artwork takes, including the spacer
const ROWS_PER_ARTWORK: u16 = 4;

/// Scrollable list of past drops, newest first
pub struct GalleryWidget<'a> {
    artworks: &'a [Artwork],
    /// Index of the first artwork shown
    scroll: usize,
    loading: bool,
    unicode: bool,
}

impl<'a> GalleryWidget<'a> {
    pub fn new(artworks: &'a [Artwork]) -> Self {
        Self {
            artworks,
            scroll: 0,
            loading: false,
            unicode: true,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }
}

/// Clamp a scroll offset to the list length
pub fn clamp_scroll(scroll: usize, len: usize) -> usize {
    scroll.min(len.saturating_sub(1))
}

impl Widget for GalleryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 4 {
            return;
        }

        let max_x = area.right() - 1;
        let title_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        let title = format!(" Gallery ({} drops) ", self.artworks.len());
        put_str(buf, area.x, area.y, &title, title_style, max_x);

        if self.artworks.is_empty() {
            let text = if self.loading { "Loading gallery..." } else { "No drops yet..." };
            let x = area.x + area.width.saturating_sub(text.len() as u16) / 2;
            let y = area.y + area.height / 2;
            put_str(buf, x, y, text, Style::default().fg(MUTED), max_x);
            return;
        }

        let desc_style = Style::default().fg(TEXT).add_modifier(Modifier::BOLD);
        let meta_style = Style::default().fg(MUTED);
        let link_style = Style::default().fg(MUTED).add_modifier(Modifier::UNDERLINED);
        let bullet = BULLET.render(self.unicode);

        let start = clamp_scroll(self.scroll, self.artworks.len());
        let mut y = area.y + 2;
        for (i, artwork) in self.artworks.iter().enumerate().skip(start) {
            if y + ROWS_PER_ARTWORK - 1 > area.bottom() {
                break;
            }

            // Newest drop carries the highest number
            let number = self.artworks.len() - i;
            let description = if artwork.description.is_empty() {
                "Untitled"
            } else {
                artwork.description.as_str()
            };
            put_str(buf, area.x + 1, y, &format!("#{} {}", number, description), desc_style, max_x);

            let mut meta = artwork.date.clone();
            if let Some(price) = &artwork.price {
                meta = format!("{} {} {}", meta, bullet, price);
            }
            put_str(buf, area.x + 3, y + 1, &meta, meta_style, max_x);
            put_str(buf, area.x + 3, y + 2, &artwork.image, link_style, max_x);

            y += ROWS_PER_ARTWORK;
        }

        // Scroll hint when more artworks are below the fold
        let shown = ((area.height.saturating_sub(2)) / ROWS_PER_ARTWORK) as usize;
        if start + shown < self.artworks.len() {
            let hint = format!("{} more, j/k to scroll", self.artworks.len() - start - shown);
            let x = area.right().saturating_sub(hint.len() as u16 + 1);
            put_str(buf, x, area.y, &hint, meta_style, max_x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(description: &str, price: Option<&str>) -> Artwork {
        Artwork {
            image: format!("https://img/{}.png", description),
            description: description.to_string(),
            date: "2025-01-02".to_string(),
            price: price.map(str::to_string),
        }
    }

    fn screen_text(buf: &Buffer) -> Vec<String> {
        (buf.area.y..buf.area.bottom())
            .map(|y| {
                (buf.area.x..buf.area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_empty_gallery_text() {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        GalleryWidget::new(&[]).render(area, &mut buf);
        assert!(screen_text(&buf).iter().any(|r| r.contains("No drops yet...")));
    }

    #[test]
    fn test_lists_newest_first_with_price() {
        let artworks = vec![artwork("Koi", Some("0.01 ETH")), artwork("Sunset", None)];
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        GalleryWidget::new(&artworks).unicode(false).render(area, &mut buf);

        let rows = screen_text(&buf);
        assert!(rows[2].contains("#2 Koi"));
        assert!(rows[3].contains("2025-01-02 - 0.01 ETH"));
        assert!(rows[6].contains("#1 Sunset"));
    }

    #[test]
    fn test_clamp_scroll() {
        assert_eq!(clamp_scroll(10, 3), 2);
        assert_eq!(clamp_scroll(1, 3), 1);
        assert_eq!(clamp_scroll(5, 0), 0);
    }
}
