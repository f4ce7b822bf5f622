//! URL frontier: the crawl queue plus the record of visited URLs
//!
//! A URL moves through three stages: enqueued, dequeued (and marked visited at
//! that moment), then terminal. Because visiting is recorded at dequeue time, a
//! URL whose fetch later fails is never queued again.

use crate::FrontierError;
use std::collections::{HashSet, VecDeque};

/// FIFO queue of pending URLs that guarantees each URL is handed out at most once
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be crawled, in discovery order
    pending: VecDeque<String>,

    /// Mirror of `pending` for constant time membership checks
    queued: HashSet<String>,

    /// URLs that have already been dequeued
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier pre-loaded with the seed URLs, in order
    ///
    /// # Arguments
    ///
    /// * `seeds` - Seed URLs; duplicates are queued once
    ///
    /// # Returns
    ///
    /// * `Ok(Frontier)` - Frontier with every distinct seed pending
    /// * `Err(FrontierError::InvalidArgument)` - A seed was empty
    pub fn with_seeds<I, S>(seeds: I) -> Result<Self, FrontierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frontier = Self::new();
        for seed in seeds {
            frontier.add_url(seed.as_ref())?;
        }
        Ok(frontier)
    }

    /// Appends a URL to the queue unless it is already pending or visited
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to queue, compared by exact string equality
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The URL was queued, or was already known and ignored
    /// * `Err(FrontierError::InvalidArgument)` - `url` is empty
    pub fn add_url(&mut self, url: &str) -> Result<(), FrontierError> {
        if url.is_empty() {
            return Err(FrontierError::InvalidArgument(
                "url cannot be empty".to_string(),
            ));
        }

        if self.visited.contains(url) || self.queued.contains(url) {
            tracing::debug!("Url already in queue: {}", url);
            return Ok(());
        }

        self.queued.insert(url.to_string());
        self.pending.push_back(url.to_string());
        tracing::debug!("Url added to queue: {}", url);

        Ok(())
    }

    /// Removes the oldest pending URL and marks it visited
    ///
    /// # Returns
    ///
    /// * `Some(url)` - The next URL to fetch; it will never be handed out again
    /// * `None` - Nothing is pending
    pub fn next_url(&mut self) -> Option<String> {
        let url = self.pending.pop_front()?;
        self.queued.remove(&url);
        self.visited.insert(url.clone());
        Some(url)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }
}
