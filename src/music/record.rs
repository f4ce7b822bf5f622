use chrono::{DateTime, Utc};
use std::fmt;

/// Song/project data scraped from a single music page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicRecord {
    /// Location of the page the data came from
    pub url: String,

    /// Name of the song or project
    pub project: Option<String>,

    pub artist: Option<String>,

    /// Publication date of the article, close to the release date
    pub date: Option<String>,

    pub scraped_at: DateTime<Utc>,
}

impl fmt::Display for MusicRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MusicRecord [url={}, project={}, artist={}, date={}]",
            self.url,
            self.project.as_deref().unwrap_or("?"),
            self.artist.as_deref().unwrap_or("?"),
            self.date.as_deref().unwrap_or("?")
        )
    }
}
