use std::io::{self, Stdout};

use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, buffer::Buffer, layout::Rect, widgets::Widget, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use crate::animation::{AnimationLoop, FRAME_DURATION};
use crate::config::{AppConfig, SourceKind};
use crate::error::Result;
use crate::event::firebase::{self, OFFICE_STATUS_RECORD};
use crate::event::{create_event_queue, EventSender, FileWatcher};
use crate::input::{InputEvent, InputHandler};
use crate::render::gallery::clamp_scroll;
use crate::render::{
    detect_unicode, ChatFeedWidget, DisplayMode, GalleryWidget, HelpOverlay, OfficeWidget, StatusBar,
};
use crate::services::{
    fetch_gallery, http_client, Artwork, ControlAction, ControlClient, Notification, ServiceOutcome,
};
use crate::state::Session;

/// The loop's own error wins over any terminal cleanup failure
fn merge_teardown(result: Result<()>, cleanup: impl IntoIterator<Item = io::Result<()>>) -> Result<()> {
    let cleanup = cleanup.into_iter().collect::<io::Result<Vec<()>>>();
    result?;
    cleanup?;
    Ok(())
}

/// Service outcome buffer size
const OUTCOME_QUEUE_SIZE: usize = 16;

/// Below this width the chat feed moves under the office
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 90;

/// The running snapshot source; stops it when dropped
struct SourceTask {
    task: Option<JoinHandle<()>>,
    _watcher: Option<FileWatcher>,
}

impl SourceTask {
    fn task(handle: JoinHandle<()>) -> Self {
        Self {
            task: Some(handle),
            _watcher: None,
        }
    }

    fn watcher(watcher: FileWatcher) -> Self {
        Self {
            task: None,
            _watcher: Some(watcher),
        }
    }
}

impl Drop for SourceTask {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

/// Main application state, owned by the single actor loop
pub struct App {
    config: AppConfig,
    session: Session,
    http: reqwest::Client,
    input_handler: InputHandler,
    animation_loop: AnimationLoop,
    display_mode: DisplayMode,
    show_help: bool,
    running: bool,
    gallery: Vec<Artwork>,
    gallery_loading: bool,
    gallery_scroll: usize,
    notification: Option<Notification>,
    unicode: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            session: Session::new(config.log_capacity),
            http: http_client()?,
            input_handler: InputHandler::new(),
            animation_loop: AnimationLoop::new(),
            display_mode: DisplayMode::default(),
            show_help: false,
            running: true,
            gallery: Vec::new(),
            gallery_loading: false,
            gallery_scroll: 0,
            notification: None,
            unicode: detect_unicode(),
            config,
        })
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        // Every cleanup step runs, even when the loop or an earlier step failed
        let cleanup = [
            disable_raw_mode(),
            execute!(terminal.backend_mut(), LeaveAlternateScreen),
            terminal.show_cursor(),
        ];

        merge_teardown(result, cleanup)
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let (source_tx, mut source_rx) = create_event_queue();
        let _source = self.spawn_source(source_tx)?;

        let (outcome_tx, mut outcome_rx) = mpsc::channel(OUTCOME_QUEUE_SIZE);
        self.refresh_gallery(&outcome_tx);

        // First release happens one full interval after start
        let period = self.config.drip_interval;
        let mut drip = interval_at(Instant::now() + period, period);
        drip.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut frames = interval(FRAME_DURATION);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut terminal_events = EventStream::new();

        tracing::info!(
            source = ?self.config.source,
            drip_secs = period.as_secs(),
            log_capacity = self.session.log().capacity(),
            "studio monitor started"
        );

        while self.running {
            tokio::select! {
                Some(message) = source_rx.recv() => {
                    self.session.apply_source(message);
                }
                _ = drip.tick() => {
                    let outcome = self.session.tick();
                    if let Some(id) = outcome.released {
                        tracing::trace!(id, typing = outcome.typing, "released chat entry");
                    }
                }
                _ = frames.tick() => {
                    self.on_frame();
                    terminal.draw(|frame| self.render(frame.area(), frame.buffer_mut()))?;
                    self.animation_loop.frame_rendered();
                }
                maybe_event = terminal_events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event, &outcome_tx),
                    Some(Err(e)) => return Err(e.into()),
                    None => self.running = false,
                },
                Some(outcome) = outcome_rx.recv() => {
                    self.apply_outcome(outcome);
                }
            }
        }

        tracing::info!("studio monitor stopped");
        Ok(())
    }

    fn spawn_source(&self, tx: EventSender) -> Result<SourceTask> {
        let source = match &self.config.source {
            SourceKind::Demo => SourceTask::task(tokio::spawn(crate::demo::generate_demo_snapshots(tx))),
            SourceKind::File(path) => SourceTask::watcher(FileWatcher::spawn(path, tx)?),
            SourceKind::Stream => {
                let url = firebase::record_url(&self.config.endpoints.database_url, OFFICE_STATUS_RECORD);
                SourceTask::task(tokio::spawn(firebase::run_stream(
                    self.http.clone(),
                    url,
                    tx,
                    self.config.stream_timing,
                )))
            }
        };
        Ok(source)
    }

    /// Advance animations and drop stale notifications
    fn on_frame(&mut self) {
        let dt = self.animation_loop.delta_time();
        self.session.animate(dt);

        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(self.config.notice_ttl))
        {
            self.notification = None;
        }
    }

    fn handle_terminal_event(&mut self, event: Event, outcome_tx: &mpsc::Sender<ServiceOutcome>) {
        let input = self.input_handler.map_event(event);
        self.apply_input(input, outcome_tx);
    }

    fn apply_input(&mut self, input: InputEvent, outcome_tx: &mpsc::Sender<ServiceOutcome>) {
        match input {
            InputEvent::Quit => self.running = false,
            InputEvent::Wake => self.send_control(ControlAction::Wake, outcome_tx),
            InputEvent::Stop => self.send_control(ControlAction::Stop, outcome_tx),
            InputEvent::RefreshGallery => self.refresh_gallery(outcome_tx),
            InputEvent::CycleDisplayMode => self.display_mode = self.display_mode.cycle(),
            InputEvent::SetModeOffice => self.display_mode = DisplayMode::Office,
            InputEvent::SetModeGallery => self.display_mode = DisplayMode::Gallery,
            InputEvent::ScrollUp => self.gallery_scroll = self.gallery_scroll.saturating_sub(1),
            InputEvent::ScrollDown => {
                self.gallery_scroll = clamp_scroll(self.gallery_scroll + 1, self.gallery.len());
            }
            InputEvent::ToggleHelp => {
                self.show_help = !self.show_help;
                self.input_handler.set_help_visible(self.show_help);
            }
            InputEvent::CloseHelp => {
                self.show_help = false;
                self.input_handler.set_help_visible(false);
            }
            // The next frame redraws at the new size
            InputEvent::Resize { .. } | InputEvent::None => {}
        }
    }

    fn send_control(&mut self, action: ControlAction, outcome_tx: &mpsc::Sender<ServiceOutcome>) {
        self.notification = Some(Notification::info(format!("Asking the studio to {}...", action)));

        let client = ControlClient::new(self.http.clone(), self.config.endpoints.control_url.clone());
        let tx = outcome_tx.clone();
        tokio::spawn(async move {
            let notice = client.send(action).await;
            let _ = tx.send(ServiceOutcome::Notice(notice)).await;
        });
    }

    fn refresh_gallery(&mut self, outcome_tx: &mpsc::Sender<ServiceOutcome>) {
        self.gallery_loading = true;

        let client = self.http.clone();
        let url = self.config.endpoints.gallery_url.clone();
        let tx = outcome_tx.clone();
        tokio::spawn(async move {
            let artworks = fetch_gallery(&client, &url).await;
            let _ = tx.send(ServiceOutcome::Gallery(artworks)).await;
        });
    }

    fn apply_outcome(&mut self, outcome: ServiceOutcome) {
        match outcome {
            ServiceOutcome::Gallery(artworks) => {
                self.gallery = artworks;
                self.gallery_loading = false;
                self.gallery_scroll = clamp_scroll(self.gallery_scroll, self.gallery.len());
            }
            ServiceOutcome::Notice(notice) => self.notification = Some(notice),
        }
    }

    /// Render the whole screen: main view, status bar, then overlays
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }

        let main_area = Rect::new(area.x, area.y, area.width, area.height - 1);
        let status_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        let clock = self.animation_loop.clock();

        match self.display_mode {
            DisplayMode::Office => {
                let (office_area, feed_area) = split_office(main_area);
                OfficeWidget::new(self.session.agents())
                    .unicode(self.unicode)
                    .clock(clock)
                    .render(office_area, buf);

                let drip = self.session.drip();
                let typing = if drip.is_typing() {
                    drip.pending().next().map(|p| p.event.agent_id.as_str())
                } else {
                    None
                };
                ChatFeedWidget::new(self.session.log())
                    .agents(self.session.agents())
                    .typing(typing)
                    .unicode(self.unicode)
                    .clock(clock)
                    .render(feed_area, buf);
            }
            DisplayMode::Gallery => {
                GalleryWidget::new(&self.gallery)
                    .scroll(self.gallery_scroll)
                    .loading(self.gallery_loading)
                    .unicode(self.unicode)
                    .render(main_area, buf);
            }
        }

        StatusBar::new(self.session.active_count(), self.session.agents().len())
            .connected(self.session.is_connected())
            .asleep(!self.session.system().is_awake())
            .last_drop(self.session.last_drop())
            .notification(self.notification.as_ref())
            .display_mode(self.display_mode)
            .clock(clock)
            .unicode(self.unicode)
            .render(status_area, buf);

        if self.show_help {
            HelpOverlay.render(area, buf);
        }
    }
}

/// Office on the left and chat feed on the right, or stacked when narrow
fn split_office(area: Rect) -> (Rect, Rect) {
    if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        let feed_width = (area.width * 2 / 5).clamp(36, 64);
        let office_width = area.width - feed_width;
        (
            Rect::new(area.x, area.y, office_width, area.height),
            Rect::new(area.x + office_width + 1, area.y, feed_width - 1, area.height),
        )
    } else {
        let feed_height = (area.height / 3).max(4).min(area.height);
        let office_height = area.height - feed_height;
        (
            Rect::new(area.x, area.y, area.width, office_height),
            Rect::new(area.x, area.y + office_height, area.width, feed_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtelierError;
    use crate::event::{AgentStatus, Snapshot};

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    fn screen_text(buf: &Buffer) -> String {
        (buf.area.y..buf.area.bottom())
            .map(|y| {
                (buf.area.x..buf.area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_teardown_keeps_the_loop_error() {
        let broken = || io::Error::new(io::ErrorKind::Other, "tty gone");

        let looped = Err(AtelierError::InvalidInput("loop".into()));
        let merged = merge_teardown(looped, [Err(broken()), Ok(()), Err(broken())]);
        assert!(matches!(merged, Err(AtelierError::InvalidInput(_))));

        let merged = merge_teardown(Ok(()), [Ok(()), Err(broken()), Ok(())]);
        assert!(matches!(merged, Err(AtelierError::Io(_))));

        assert!(merge_teardown(Ok(()), [Ok(()), Ok(()), Ok(())]).is_ok());
    }

    #[test]
    fn test_split_office_side_by_side_and_stacked() {
        let (office, feed) = split_office(Rect::new(0, 0, 120, 30));
        assert_eq!(office.width, 72);
        assert_eq!(feed.x, 73);
        assert_eq!(office.height, feed.height);

        let (office, feed) = split_office(Rect::new(0, 0, 60, 30));
        assert_eq!(office.width, 60);
        assert_eq!(feed.y, office.bottom());
        assert_eq!(office.height + feed.height, 30);
    }

    #[test]
    fn test_help_and_mode_keys() {
        let mut app = app();
        let (tx, _rx) = mpsc::channel(1);

        app.apply_input(InputEvent::ToggleHelp, &tx);
        assert!(app.show_help);
        app.apply_input(InputEvent::CloseHelp, &tx);
        assert!(!app.show_help);

        app.apply_input(InputEvent::CycleDisplayMode, &tx);
        assert_eq!(app.display_mode, DisplayMode::Gallery);
        app.apply_input(InputEvent::SetModeOffice, &tx);
        assert_eq!(app.display_mode, DisplayMode::Office);

        app.apply_input(InputEvent::Quit, &tx);
        assert!(!app.running);
    }

    #[test]
    fn test_gallery_outcome_clamps_scroll() {
        let mut app = app();
        app.gallery_scroll = 9;
        app.gallery_loading = true;
        let artwork = Artwork {
            image: "https://img/1.png".into(),
            description: "Koi".into(),
            date: "2025-01-01".into(),
            price: None,
        };
        app.apply_outcome(ServiceOutcome::Gallery(vec![artwork.clone(), artwork]));
        assert!(!app.gallery_loading);
        assert_eq!(app.gallery_scroll, 1);

        app.apply_outcome(ServiceOutcome::Notice(Notification::error("boom")));
        assert_eq!(app.notification.as_ref().map(|n| n.text.as_str()), Some("boom"));
    }

    #[test]
    fn test_render_office_with_status_bar() {
        let mut app = app();
        let snapshot: Snapshot = [("Artist".to_string(), AgentStatus::new("Painting", "Layering glow"))]
            .into_iter()
            .collect();
        app.session.ingest(snapshot);

        let area = Rect::new(0, 0, 140, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        let text = screen_text(&buf);
        assert!(text.contains("Studio Chat"));
        assert!(text.contains("Layering glow"));
        assert!(text.contains("Agents: 1/6"));
    }
}
