//! Hot100 - Billboard Hot 100 charts as private Spotify playlists
//!
//! This library scrapes the Billboard Hot 100 for a date and rebuilds it as a
//! private playlist named `Billboard 100 - <year>` on a streaming service.

/// Client modules for interacting with external services
pub mod clients;
mod macros;
/// Track resolution and playlist creation
pub mod playlist;
/// Per-date orchestration of chart fetching and playlist creation
pub mod runner;

pub use playlist::{PlaylistBuilder, PlaylistService};
