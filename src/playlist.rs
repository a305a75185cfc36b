use async_trait::async_trait;
use log::{debug, info, warn};

use crate::clients::{
    entities::{ChartEntry, ChartSnapshot},
    errors::Result,
};

/// Every playlist name starts with this, followed by ` - {year}`
pub const PLAYLIST_NAME_PREFIX: &str = "Billboard 100";

/// The remote operations needed to turn a chart into a playlist
#[async_trait]
pub trait PlaylistService {
    /// Make sure the service holds a usable access token. May prompt the user.
    async fn authorize(&self) -> Result<()>;
    /// Id of the account the playlists are created for
    async fn current_user_id(&self) -> Result<String>;
    /// Id of the best matching track, `None` when the search comes back empty
    async fn search_track(&self, query: &str) -> Result<Option<String>>;
    /// Create a playlist and return its id
    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String>;
    /// Append tracks in the given order
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;
}

/// Whether a chart entry was found on the streaming service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Track id of the top search hit
    Resolved(String),
    /// Why the entry was left out
    Unresolved(String),
}

/// A chart entry together with its lookup result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackResolution {
    /// The chart row that was looked up
    pub entry: ChartEntry,
    /// What the search returned
    pub outcome: Resolution,
}

impl TrackResolution {
    /// The track id, if the entry was found
    pub fn track_id(&self) -> Option<&str> {
        match &self.outcome {
            Resolution::Resolved(id) => Some(id),
            Resolution::Unresolved(_) => None,
        }
    }
}

/// The playlist that gets created: its name, visibility and tracks in chart order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    /// `Billboard 100 - {year}`
    pub name: String,
    /// Always `false`
    pub public: bool,
    /// Resolved ids, misses removed
    pub track_ids: Vec<String>,
}

impl PlaylistRequest {
    /// Build the request for a year from the resolved entries
    pub fn new(year: &str, resolutions: &[TrackResolution]) -> Self {
        PlaylistRequest {
            name: playlist_name(year),
            public: false,
            track_ids: resolutions
                .iter()
                .filter_map(TrackResolution::track_id)
                .map(str::to_string)
                .collect(),
        }
    }
}

/// `Billboard 100 - {year}`
pub fn playlist_name(year: &str) -> String {
    format!("{PLAYLIST_NAME_PREFIX} - {year}")
}

/// Outcome of one successful `build_playlist` call
#[derive(Debug, Clone)]
pub struct PlaylistReport {
    /// Id assigned by the service
    pub playlist_id: String,
    /// What was sent to the service
    pub request: PlaylistRequest,
    /// One per chart entry, in chart order
    pub resolutions: Vec<TrackResolution>,
}

impl PlaylistReport {
    /// Entries that were left out of the playlist
    pub fn unresolved(&self) -> impl Iterator<Item = &TrackResolution> {
        self.resolutions
            .iter()
            .filter(|r| matches!(r.outcome, Resolution::Unresolved(_)))
    }
}

/// Creates one private playlist per chart on a [`PlaylistService`]
pub struct PlaylistBuilder<S> {
    service: S,
}

impl<S: PlaylistService> PlaylistBuilder<S> {
    /// Wrap a service; nothing is contacted until [`Self::build_playlist`]
    pub fn new(service: S) -> Self {
        PlaylistBuilder { service }
    }

    /// The service playlists are created on
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Authorize, resolve every entry, then create and fill the playlist.
    ///
    /// Entries without a search hit are skipped. Any other failure aborts the
    /// remaining steps, leaving an already created playlist in place.
    pub async fn build_playlist(&self, entries: &ChartSnapshot, year: &str) -> Result<PlaylistReport> {
        info!("Authorizing streaming service ...");
        self.service.authorize().await?;
        let user_id = self.service.current_user_id().await?;
        debug!("Building playlist for user {user_id}");

        let mut resolutions = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            resolutions.push(self.resolve(entry).await?);
        }

        let request = PlaylistRequest::new(year, &resolutions);
        info!(
            "Resolved {} of {} chart entries",
            request.track_ids.len(),
            entries.len()
        );

        let playlist_id = self
            .service
            .create_playlist(&user_id, &request.name, request.public)
            .await?;
        info!("Created playlist '{}' ({playlist_id})", request.name);

        if !request.track_ids.is_empty() {
            self.service.add_tracks(&playlist_id, &request.track_ids).await?;
        }

        Ok(PlaylistReport {
            playlist_id,
            request,
            resolutions,
        })
    }

    async fn resolve(&self, entry: &ChartEntry) -> Result<TrackResolution> {
        let outcome = match self.service.search_track(&entry.search_query()).await? {
            Some(id) => Resolution::Resolved(id),
            None => {
                warn!(
                    "Could not find {} by {} on Spotify.",
                    entry.title, entry.artist
                );
                Resolution::Unresolved(format!("no search result for '{}'", entry.search_query()))
            }
        };
        Ok(TrackResolution {
            entry: entry.clone(),
            outcome,
        })
    }
}
