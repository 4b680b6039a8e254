//! Remote image display shell.
//!
//! An [`ImageView`] owns at most one in-flight lookup. It starts in
//! [`ImagePhase::Placeholder`] and moves once, when that lookup finishes, to
//! either [`ImagePhase::Loaded`] or [`ImagePhase::Failed`].

use std::sync::Arc;

use futures_util::FutureExt;
use reqwest::Url;
use tokio::task::coop::unconstrained;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, trace};

use crate::domain::entities::LoadedImage;
use crate::domain::errors::{FetchError, FetchResult};
use crate::infrastructure::image::ImageFetchCache;

type LookupOutcome = FetchResult<Option<LoadedImage>>;

/// Display state of an [`ImageView`].
#[derive(Debug, Clone, Default)]
pub enum ImagePhase {
    /// No lookup has resolved yet.
    #[default]
    Placeholder,
    /// The lookup produced an image.
    Loaded(LoadedImage),
    /// The lookup produced no image. `None` when there was no URL.
    Failed(Option<FetchError>),
}

impl ImagePhase {
    /// Returns true once a lookup has resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Placeholder)
    }

    /// Returns true if an image is available.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Returns true if the lookup ended without an image.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    fn from_outcome(outcome: LookupOutcome) -> Self {
        match outcome {
            Ok(Some(image)) => Self::Loaded(image),
            Ok(None) => Self::Failed(None),
            Err(e) => Self::Failed(Some(e)),
        }
    }
}

/// Shows a placeholder, then an image or an error view, for one URL.
pub struct ImageView {
    url: Option<Url>,
    cache: Arc<ImageFetchCache>,
    phase: ImagePhase,
    task: Option<JoinHandle<LookupOutcome>>,
}

impl ImageView {
    /// Creates an unmounted view in the placeholder phase.
    #[must_use]
    pub const fn new(url: Option<Url>, cache: Arc<ImageFetchCache>) -> Self {
        Self {
            url,
            cache,
            phase: ImagePhase::Placeholder,
            task: None,
        }
    }

    /// The URL this view displays.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Current display phase.
    #[must_use]
    pub const fn phase(&self) -> &ImagePhase {
        &self.phase
    }

    /// Returns true while a lookup task is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    /// Starts the lookup unless a value is already held or one is running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        if self.phase.is_resolved() {
            trace!(url = ?self.url, "Image already resolved, skipping lookup");
            return;
        }
        if self.task.is_some() {
            return;
        }

        let cache = self.cache.clone();
        let url = self.url.clone();
        debug!(url = ?url, "Mounting image view");
        self.task = Some(tokio::spawn(async move { cache.get(url.as_ref()).await }));
    }

    /// Applies the lookup result if the task has finished. Never blocks.
    ///
    /// Returns true if the phase changed.
    pub fn poll_resolved(&mut self) -> bool {
        let Some(task) = self.task.as_mut() else {
            return false;
        };
        if !task.is_finished() {
            return false;
        }

        // A finished handle can still report Pending once the caller's coop
        // budget is spent, so poll it outside the budget and keep it on a miss.
        let Some(joined) = unconstrained(task).now_or_never() else {
            return false;
        };
        self.task = None;
        self.apply(joined);
        true
    }

    /// Waits for the pending lookup, if any, and returns the resulting phase.
    ///
    /// The task stays owned by the view until it completes, so dropping this
    /// future early leaves the lookup running and still abortable.
    pub async fn resolve(&mut self) -> &ImagePhase {
        if let Some(task) = self.task.as_mut() {
            let joined = task.await;
            self.task = None;
            self.apply(joined);
        }
        &self.phase
    }

    /// Abandons the pending lookup. The in-flight request is dropped.
    pub fn unmount(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(url = ?self.url, "Cancelled image load");
        }
    }

    /// Produces the view for the current phase using exactly one callback.
    pub fn render<'a, V>(
        &'a self,
        placeholder: impl FnOnce() -> V,
        image: impl FnOnce(&'a LoadedImage) -> V,
        error: impl FnOnce(Option<&'a FetchError>) -> V,
    ) -> V {
        match &self.phase {
            ImagePhase::Placeholder => placeholder(),
            ImagePhase::Loaded(loaded) => image(loaded),
            ImagePhase::Failed(reason) => error(reason.as_ref()),
        }
    }

    fn apply(&mut self, joined: Result<LookupOutcome, JoinError>) {
        match joined {
            Ok(outcome) => {
                self.phase = ImagePhase::from_outcome(outcome);
                debug!(url = ?self.url, loaded = self.phase.is_loaded(), "Image view resolved");
            }
            Err(e) if e.is_cancelled() => {
                trace!(url = ?self.url, "Image load was cancelled");
            }
            Err(e) => {
                error!(url = ?self.url, error = %e, "Image load task panicked");
                self.phase = ImagePhase::Failed(None);
            }
        }
    }
}

impl Drop for ImageView {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for ImageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageView")
            .field("url", &self.url)
            .field("phase", &self.phase)
            .field("loading", &self.task.is_some())
            .finish_non_exhaustive()
    }
}
