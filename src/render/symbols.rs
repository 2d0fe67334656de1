//! Symbol system with Unicode and ASCII fallbacks
//!
//! Every glyph the office draws has an ASCII stand-in for terminals that
//! cannot render the Unicode one.

use crate::state::presence::Presence;

/// Symbol with Unicode and ASCII fallback
#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    /// Unicode character for modern terminals
    pub unicode: char,
    /// ASCII fallback for limited terminals
    pub ascii: char,
}

impl Symbol {
    pub const fn new(unicode: char, ascii: char) -> Self {
        Self { unicode, ascii }
    }

    /// Render the appropriate character based on Unicode support
    pub fn render(&self, use_unicode: bool) -> char {
        if use_unicode {
            self.unicode
        } else {
            self.ascii
        }
    }
}

/// Avatar glyphs, one per presence
pub struct AvatarSymbols {
    pub active: Symbol,
    pub sleeping: Symbol,
}

impl AvatarSymbols {
    pub fn get(&self, presence: Presence) -> &Symbol {
        match presence {
            Presence::Active => &self.active,
            Presence::Sleeping => &self.sleeping,
        }
    }
}

pub const AVATAR: AvatarSymbols = AvatarSymbols {
    active: Symbol::new('\u{25C9}', '@'),   // U+25C9 Fisheye (◉)
    sleeping: Symbol::new('\u{25CC}', 'o'), // U+25CC Dotted Circle (◌)
};

/// Connectivity dot in the status bar
pub const LIVE_DOT: Symbol = Symbol::new('\u{25CF}', '*'); // U+25CF Black Circle (●)
/// Dots of the typing indicator
pub const TYPING_DOT: Symbol = Symbol::new('\u{2022}', '.'); // U+2022 Bullet (•)
/// Marks the sleeping "z" over resting avatars
pub const SNORE: Symbol = Symbol::new('\u{1DBB}', 'z'); // U+1DBB Modifier Small Z (ᶻ)
/// Separator between gallery fields
pub const BULLET: Symbol = Symbol::new('\u{00B7}', '-'); // U+00B7 Middle Dot (·)

/// Detect if the terminal supports Unicode characters
///
/// Checks environment variables for UTF-8 support indicators:
/// - LANG, LC_ALL and LC_CTYPE for a UTF-8 locale
/// - TERM_PROGRAM for known Unicode-capable terminals
pub fn detect_unicode() -> bool {
    for var in ["LC_ALL", "LC_CTYPE", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if value.to_lowercase().contains("utf") {
                return true;
            }
        }
    }

    if let Ok(term_program) = std::env::var("TERM_PROGRAM") {
        let unicode_terminals = [
            "iTerm.app",
            "Apple_Terminal",
            "vscode",
            "Hyper",
            "Alacritty",
            "kitty",
            "WezTerm",
        ];
        if unicode_terminals.iter().any(|t| term_program.contains(t)) {
            return true;
        }
    }

    if let Ok(term) = std::env::var("TERM") {
        let unicode_terms = ["xterm", "screen", "tmux", "rxvt"];
        if unicode_terms.iter().any(|t| term.contains(t)) {
            return true;
        }
    }

    false
}
