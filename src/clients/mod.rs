/// Billboard chart page fetching and parsing
pub mod billboard;
/// Chart dates, entries and snapshots
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Spotify API client
pub mod spotify;

pub use billboard::{ChartExtractor, ChartPageParser, HotHundredParser};
pub use spotify::{SpotifyClient, SpotifySettings};
