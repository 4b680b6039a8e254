//! Terminal front-end for a single image view.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::time::interval;
use tracing::{debug, info};

use crate::infrastructure::image::ImageFetchCache;
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::widgets::{ImagePreview, ImageView};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const NO_URL_TITLE: &str = "(no url)";

/// Mounts an [`ImageView`] and redraws it until the user quits.
pub struct App {
    cache: Arc<ImageFetchCache>,
    view: ImageView,
    title: String,
    running: bool,
}

impl App {
    /// Creates the app for one URL.
    #[must_use]
    pub fn new(url: Option<reqwest::Url>, cache: Arc<ImageFetchCache>) -> Self {
        let title = url
            .as_ref()
            .map_or_else(|| NO_URL_TITLE.to_string(), ToString::to_string);
        Self {
            view: ImageView::new(url, cache.clone()),
            cache,
            title,
            running: true,
        }
    }

    /// The mounted view.
    #[must_use]
    pub const fn view(&self) -> &ImageView {
        &self.view
    }

    /// Runs the event loop.
    ///
    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut poll_interval = interval(POLL_INTERVAL);

        self.view.mount();
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                _ = poll_interval.tick() => {
                    if self.view.poll_resolved() {
                        terminal.draw(|frame| self.render(frame))?;
                    }
                }

                Some(Ok(event)) = terminal_events.next() => {
                    self.handle_terminal_event(&event);
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.view.unmount();
        info!("Application exiting normally");
        Ok(())
    }

    /// Applies a terminal event to the app state.
    pub fn handle_terminal_event(&mut self, event: &Event) {
        let Event::Key(key) = event else {
            return;
        };

        match EventHandler::handle_key(key) {
            EventResult::Exit => self.running = false,
            EventResult::Reload => self.reload(),
            EventResult::Continue => {}
        }
    }

    fn reload(&mut self) {
        debug!(title = %self.title, "Remounting image view");
        let url = self.view.url().cloned();
        self.view = ImageView::new(url, self.cache.clone());
        self.view.mount();
    }

    fn render(&self, frame: &mut Frame) {
        let title = self.title.as_str();
        let preview = self.view.render(
            || ImagePreview::Placeholder { title },
            |image| ImagePreview::Image { title, image },
            |reason| ImagePreview::Error { title, reason },
        );
        frame.render_widget(preview, frame.area());
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("title", &self.title)
            .field("view", &self.view)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    async fn app_for(url: Option<&str>) -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let cache = ImageFetchCache::with_defaults(dir.path().join("images"), None)
            .await
            .unwrap();
        let url = url.map(|u| reqwest::Url::parse(u).unwrap());
        (App::new(url, Arc::new(cache)), dir)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_title_without_url() {
        let (app, _dir) = app_for(None).await;
        assert_eq!(app.title, NO_URL_TITLE);
    }

    #[tokio::test]
    async fn test_quit_key_stops_loop() {
        let (mut app, _dir) = app_for(None).await;
        app.handle_terminal_event(&key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_reload_mounts_fresh_view() {
        let (mut app, _dir) = app_for(None).await;
        app.view.mount();
        app.view.resolve().await;
        assert!(app.view().phase().is_failed());

        app.handle_terminal_event(&key(KeyCode::Char('r')));

        assert!(app.view().is_loading());
        assert!(app.view().url().is_none());
    }
}
