use std::time::Duration;

use log::debug;
use scraper::{ElementRef, Html};

use crate::{
    clients::{
        entities::{CHART_SIZE, ChartDate, ChartEntry, ChartSnapshot},
        errors::{Error, Result},
    },
    selector,
};

/// Hot 100 chart pages live below this URL, one per `YYYY-MM-DD/`
pub const DEFAULT_CHART_URL: &str = "https://www.billboard.com/charts/hot-100";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
// billboard.com rejects reqwest's default user agent
const USER_AGENT: &str = "Mozilla/5.0";

/// Strategy for turning a chart page into ranked entries.
///
/// The page layout is not a stable contract, so each layout gets its own parser.
pub trait ChartPageParser {
    /// Extract the ranked entries from a chart page
    fn parse(&self, html: &str) -> Result<Vec<ChartEntry>>;
}

/// Parser for the current Hot 100 layout: every chart row is an `li` holding an
/// `h3.c-title` with the song title and a sibling `span` with the artist.
#[derive(Debug, Default, Clone, Copy)]
pub struct HotHundredParser;

impl ChartPageParser for HotHundredParser {
    fn parse(&self, html: &str) -> Result<Vec<ChartEntry>> {
        let document = Html::parse_document(html);
        let titles: Vec<ElementRef> = document
            .select(selector!("li h3.c-title"))
            .take(CHART_SIZE)
            .collect();

        if titles.len() < CHART_SIZE {
            return Err(Error::ParseError(format!(
                "chart page has {} titles, expected {CHART_SIZE}",
                titles.len()
            )));
        }

        titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| parse_entry(i + 1, title))
            .collect()
    }
}

fn parse_entry(rank: usize, title: ElementRef) -> Result<ChartEntry> {
    let artist = title
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| parent.select(selector!("span")).next())
        .ok_or_else(|| Error::ParseError(format!("no artist element for rank {rank}")))?;

    let title = element_text(title);
    let artist = element_text(artist);
    if title.is_empty() || artist.is_empty() {
        return Err(Error::ParseError(format!(
            "empty title or artist for rank {rank}"
        )));
    }
    Ok(ChartEntry {
        rank,
        title,
        artist,
    })
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Downloads a chart page for a date and hands it to a [`ChartPageParser`]
pub struct ChartExtractor<P = HotHundredParser> {
    http: reqwest::Client,
    base_url: String,
    parser: P,
}

impl ChartExtractor<HotHundredParser> {
    /// Extractor for `HOT100_CHART_URL`, or billboard.com when unset
    pub fn try_default() -> Result<Self> {
        let base_url =
            std::env::var("HOT100_CHART_URL").unwrap_or_else(|_| DEFAULT_CHART_URL.to_string());
        Self::new(base_url, HotHundredParser)
    }
}

impl<P: ChartPageParser> ChartExtractor<P> {
    /// Extractor for chart pages under `base_url`
    pub fn new(base_url: impl Into<String>, parser: P) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ChartExtractor {
            http,
            base_url: base_url.into(),
            parser,
        })
    }

    /// URL of the chart page for `date`
    pub fn chart_url(&self, date: &ChartDate) -> String {
        format!("{}/{date}/", self.base_url.trim_end_matches('/'))
    }

    /// Download the chart page for `date` and parse it. No retry.
    pub async fn fetch_chart(&self, date: &ChartDate) -> Result<ChartSnapshot> {
        let url = self.chart_url(date);
        debug!("Fetching chart page {url}");
        let html = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let entries = self.parser.parse(&html)?;
        debug!("Parsed {} entries from {url}", entries.len());
        Ok(ChartSnapshot::new(*date, entries))
    }
}
