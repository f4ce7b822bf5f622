//! Visitor capability and the crawl stop signal

use crate::crawler::parser::Page;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop signal shared between the controller and whoever may end a crawl
///
/// Clones share the same flag. The controller checks it at the top of every
/// iteration and right after each `on_visit` call; an in-flight fetch is never
/// interrupted.
#[derive(Debug, Clone)]
pub struct CrawlControl {
    running: Arc<AtomicBool>,
}

impl CrawlControl {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Requests that the crawl stop after the current step
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            tracing::info!("The web crawler is stopping...");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for CrawlControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-site behavior plugged into the crawl loop
pub trait Visitor {
    /// Called once for every fetched page the visitor is allowed to see
    ///
    /// Call `control.stop()` to end the crawl; links on this page are then not
    /// followed.
    fn on_visit(&mut self, page: &Page, control: &CrawlControl);

    /// Secondary link predicate, applied after the crawler's own link filter
    fn should_visit(&self, _url: &str) -> bool {
        true
    }
}

/// Lets a `&mut V` be handed to the controller while the caller keeps ownership
impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn on_visit(&mut self, page: &Page, control: &CrawlControl) {
        (**self).on_visit(page, control)
    }

    fn should_visit(&self, url: &str) -> bool {
        (**self).should_visit(url)
    }
}
