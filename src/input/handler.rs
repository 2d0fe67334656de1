use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Processed input events for the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Quit the application
    Quit,
    /// Ask the studio to wake up
    Wake,
    /// Ask the studio to stop every agent
    Stop,
    /// Re-fetch the gallery
    RefreshGallery,
    /// Cycle through display modes (Office -> Gallery)
    CycleDisplayMode,
    /// Set display mode to Office
    SetModeOffice,
    /// Set display mode to Gallery
    SetModeGallery,
    /// Scroll the current list up
    ScrollUp,
    /// Scroll the current list down
    ScrollDown,
    /// Toggle help overlay
    ToggleHelp,
    /// Close help (any key when help is shown)
    CloseHelp,
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// No event
    None,
}

/// Input handler for processing terminal events
pub struct InputHandler {
    help_visible: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self { help_visible: false }
    }

    /// Set help visibility state
    pub fn set_help_visible(&mut self, visible: bool) {
        self.help_visible = visible;
    }

    /// Translate a terminal event from the event stream
    pub fn map_event(&self, event: Event) -> InputEvent {
        match event {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => self.handle_key(key_event),
            Event::Resize(width, height) => InputEvent::Resize { width, height },
            _ => InputEvent::None,
        }
    }

    /// Handle keyboard input
    fn handle_key(&self, event: KeyEvent) -> InputEvent {
        // Ctrl+C always quits
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return InputEvent::Quit;
        }

        // If help is visible, any key closes it
        if self.help_visible {
            return InputEvent::CloseHelp;
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,

            // Studio controls
            KeyCode::Char('w') => InputEvent::Wake,
            KeyCode::Char('s') => InputEvent::Stop,
            KeyCode::Char('g') => InputEvent::RefreshGallery,

            // Display mode controls
            KeyCode::Char('m') | KeyCode::Tab => InputEvent::CycleDisplayMode,
            KeyCode::Char('1') => InputEvent::SetModeOffice,
            KeyCode::Char('2') => InputEvent::SetModeGallery,

            KeyCode::Up | KeyCode::Char('k') => InputEvent::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => InputEvent::ScrollDown,

            // Help
            KeyCode::Char('?') => InputEvent::ToggleHelp,

            _ => InputEvent::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
