use log::{debug, info};

use crate::{
    clients::{
        ChartExtractor, SpotifyClient,
        entities::{ChartDate, ChartSnapshot},
        errors::Result,
    },
    playlist::{PlaylistBuilder, PlaylistReport, PlaylistService},
};

/// Configuration for the [`Runner`]: where charts come from and where playlists go
pub struct Config<S = SpotifyClient> {
    /// Fetches and parses chart pages
    pub chart: ChartExtractor,
    /// Turns charts into playlists
    pub builder: PlaylistBuilder<S>,
}

impl Config {
    /// Build both clients from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        Ok(Config {
            chart: ChartExtractor::try_default()?,
            builder: PlaylistBuilder::new(SpotifyClient::try_default()?),
        })
    }
}

/// Runs the scrape-then-publish sequence for each requested date
pub struct Runner<S = SpotifyClient> {
    config: Config<S>,
}

impl<S: PlaylistService> Runner<S> {
    /// Wrap a configuration; nothing runs until [`Self::run`]
    pub fn new(config: Config<S>) -> Self {
        Runner { config }
    }

    /// Process dates one after another. The first error ends the run.
    pub async fn run(&self, dates: &[ChartDate]) -> Result<Vec<PlaylistReport>> {
        let mut reports = Vec::with_capacity(dates.len());
        for date in dates {
            reports.push(self.process_date(date).await?);
        }
        info!("Created {} playlists", reports.len());
        Ok(reports)
    }

    /// Fetch the chart for one date and publish it
    pub async fn process_date(&self, date: &ChartDate) -> Result<PlaylistReport> {
        info!("Fetching Billboard Hot 100 for {date} ...");
        let snapshot = self.config.chart.fetch_chart(date).await?;
        self.publish(&snapshot).await
    }

    /// Turn an already fetched chart into a playlist labelled with its year
    pub async fn publish(&self, snapshot: &ChartSnapshot) -> Result<PlaylistReport> {
        let year = snapshot.date.year().to_string();
        debug!("Publishing {} entries for {year}", snapshot.len());
        let report = self.config.builder.build_playlist(snapshot, &year).await?;
        info!(
            "Playlist '{}' ready with {} tracks, {} not found",
            report.request.name,
            report.request.track_ids.len(),
            report.unresolved().count()
        );
        Ok(report)
    }
}
