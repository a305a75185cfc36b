use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use crate::{
    clients::errors::{Error, Result},
    playlist::PlaylistService,
};
use rspotify::{
    AuthCodeSpotify, Config, Credentials, OAuth,
    model::{PlayableId, PlaylistId, SearchResult, SearchType, TrackId, UserId},
    prelude::*,
    scopes,
};

// Spotify rejects larger batches on the add-items endpoint
const MAX_ITEMS_PER_REQUEST: usize = 100;

/// Everything needed to talk to the Spotify Web API on behalf of one account
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    /// Application client id and secret
    pub credentials: Credentials,
    /// Redirect URI and scopes for the authorization-code flow
    pub oauth: OAuth,
    /// Account the playlists are expected to land in, checked when the user is resolved
    pub username: Option<String>,
    /// File the access token is cached in between runs
    pub token_cache_path: PathBuf,
}

impl SpotifySettings {
    /// Read settings from the environment (and a `.env` file if the caller loaded one).
    ///
    /// Client id, secret and redirect URI use rspotify's `RSPOTIFY_*` variables.
    pub fn from_env() -> Result<Self> {
        let token_cache_path = match std::env::var("HOT100_TOKEN_CACHE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_token_cache_path(),
        };
        let username = std::env::var("SPOTIFY_USERNAME")
            .ok()
            .filter(|name| !name.trim().is_empty());
        Self::from_parts(
            Credentials::from_env(),
            OAuth::from_env(scopes!("playlist-modify-private")),
            username,
            token_cache_path,
        )
    }

    fn from_parts(
        credentials: Option<Credentials>,
        oauth: Option<OAuth>,
        username: Option<String>,
        token_cache_path: PathBuf,
    ) -> Result<Self> {
        let credentials = credentials
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify credentials in environment variables. Check README.md for details.".into()))?;
        let oauth = oauth
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify OAuth configuration in environment variables. Check README.md for details.".into()))?;
        Ok(SpotifySettings {
            credentials,
            oauth,
            username,
            token_cache_path,
        })
    }
}

fn default_token_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
        .join(".hot100_token_cache")
}

// SPOTIFY_USERNAME is optional; when set, the authorized account has to be that user
fn check_username(actual: &str, expected: Option<&str>) -> Result<()> {
    match expected {
        Some(expected) if expected != actual => Err(Error::AuthError(format!(
            "authorized as '{actual}' but SPOTIFY_USERNAME is '{expected}'"
        ))),
        _ => Ok(()),
    }
}

/// [`PlaylistService`] backed by the Spotify Web API
pub struct SpotifyClient {
    /// Underlying rspotify client, holding the token and its cache settings
    pub spotify: AuthCodeSpotify,
    username: Option<String>,
}

impl SpotifyClient {
    /// Build a client from settings. No request is made until [`PlaylistService::authorize`].
    pub fn new(settings: SpotifySettings) -> Self {
        debug!("Spotify token cache at {:?}", settings.token_cache_path);

        let spotify = AuthCodeSpotify::with_config(
            settings.credentials,
            settings.oauth,
            Config {
                token_cached: true,
                token_refreshing: true,
                cache_path: settings.token_cache_path,
                ..Default::default()
            },
        );

        SpotifyClient {
            spotify,
            username: settings.username,
        }
    }

    /// Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        Ok(Self::new(SpotifySettings::from_env()?))
    }
}

#[async_trait]
impl PlaylistService for SpotifyClient {
    // Uses the cached token when it is still valid, otherwise prompts on the terminal.
    // This function requires the `cli` feature enabled.
    async fn authorize(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self
            .spotify
            .get_authorize_url(true)
            .map_err(|e| Error::AuthError(e.to_string()))?;
        self.spotify
            .prompt_for_token(&url)
            .await
            .map_err(|e| Error::AuthError(e.to_string()))?;
        Ok(())
    }

    async fn current_user_id(&self) -> Result<String> {
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        check_username(user.id.id(), self.username.as_deref())?;
        Ok(user.id.id().to_string())
    }

    async fn search_track(&self, query: &str) -> Result<Option<String>> {
        let result = self
            .spotify
            .search(query, SearchType::Track, None, None, Some(1), None)
            .await?;
        match result {
            SearchResult::Tracks(page) => Ok(page
                .items
                .into_iter()
                .next()
                .and_then(|track| track.id)
                .map(|id| id.id().to_string())),
            _ => Err(Error::ParseError(format!(
                "track search for '{query}' returned a non-track result"
            ))),
        }
    }

    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String> {
        let user_id = UserId::from_id(user_id)?;
        let playlist = self
            .spotify
            .user_playlist_create(user_id, name, Some(public), None, None)
            .await?;
        Ok(playlist.id.id().to_string())
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let playlist_id = PlaylistId::from_id(playlist_id)?;
        for chunk in track_ids.chunks(MAX_ITEMS_PER_REQUEST) {
            let items = chunk
                .iter()
                .map(|id| TrackId::from_id(id.as_str()).map(PlayableId::Track))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            debug!("Adding {} tracks to playlist {}", items.len(), playlist_id.id());
            self.spotify
                .playlist_add_items(playlist_id.clone(), items, None)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth() -> OAuth {
        OAuth {
            redirect_uri: "http://127.0.0.1:8888/callback".into(),
            scopes: scopes!("playlist-modify-private"),
            ..Default::default()
        }
    }

    fn settings() -> SpotifySettings {
        SpotifySettings::from_parts(
            Some(Credentials::new("client", "secret")),
            Some(oauth()),
            None,
            PathBuf::from("/tmp/hot100-test-token"),
        )
        .unwrap()
    }

    #[test]
    fn client_requests_private_playlist_scope_and_caches_token() {
        let client = SpotifyClient::new(settings());
        assert!(client.spotify.oauth.scopes.contains("playlist-modify-private"));
        assert_eq!(client.spotify.oauth.redirect_uri, "http://127.0.0.1:8888/callback");
        assert_eq!(client.spotify.creds.id, "client");
        assert!(client.spotify.config.token_cached);
        assert_eq!(
            client.spotify.config.cache_path,
            PathBuf::from("/tmp/hot100-test-token")
        );
    }

    #[test]
    fn authorize_url_forces_dialog() {
        let client = SpotifyClient::new(settings());
        let url = client.spotify.get_authorize_url(true).unwrap();
        assert!(url.contains("show_dialog=true"));
        assert!(url.contains("client_id=client"));
    }

    #[test]
    fn missing_credentials_are_a_configuration_error() {
        let err = SpotifySettings::from_parts(None, Some(oauth()), None, PathBuf::new()).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(msg) if msg.contains("credentials")));
    }

    #[test]
    fn missing_oauth_settings_are_a_configuration_error() {
        let err = SpotifySettings::from_parts(
            Some(Credentials::new("client", "secret")),
            None,
            None,
            PathBuf::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(msg) if msg.contains("OAuth")));
    }

    #[test]
    fn username_check_only_applies_when_configured() {
        assert!(check_username("listener", None).is_ok());
        assert!(check_username("listener", Some("listener")).is_ok());
        assert!(matches!(
            check_username("listener", Some("someone-else")),
            Err(Error::AuthError(_))
        ));
    }

    #[test]
    fn default_token_cache_lives_in_cache_dir() {
        assert!(
            default_token_cache_path()
                .to_string_lossy()
                .ends_with(".hot100_token_cache")
        );
    }
}
