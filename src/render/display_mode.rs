//! Top-level views of the studio.
//!
//! - **Office**: agent avatars with their speech bubbles next to the chat feed
//! - **Gallery**: past drops, newest first

/// Which view fills the main area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Office,
    Gallery,
}

impl DisplayMode {
    /// Cycle to the next display mode.
    ///
    /// Order: Office -> Gallery -> Office
    pub fn cycle(&self) -> DisplayMode {
        match self {
            DisplayMode::Office => DisplayMode::Gallery,
            DisplayMode::Gallery => DisplayMode::Office,
        }
    }

    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            DisplayMode::Office => "Office",
            DisplayMode::Gallery => "Gallery",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mode_default() {
        assert_eq!(DisplayMode::default(), DisplayMode::Office);
    }

    #[test]
    fn test_cycle_order() {
        assert_eq!(DisplayMode::Office.cycle(), DisplayMode::Gallery);
        assert_eq!(DisplayMode::Gallery.cycle(), DisplayMode::Office);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(DisplayMode::Office.name(), "Office");
        assert_eq!(DisplayMode::Gallery.name(), "Gallery");
    }
}
