//! Google Trends interest-over-time provider.
//!
//! Google Trends has no official API. The web front-end talks to two JSON
//! endpoints: `explore` hands out a signed widget request for a keyword and
//! timeframe, and `widgetdata/multiline` turns that widget into the weekly
//! (or daily) interest series. Both responses are prefixed with an anti-JSON
//! guard (`)]}'`) that has to be stripped before parsing.
//!
//! The client performs no retries and no rate limiting of its own; the
//! collector owns that policy.

use super::provider::{Observation, TrendsError, TrendsProvider};
use crate::domain::TimeWindow;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://trends.google.com";
const TIMESERIES_WIDGET_ID: &str = "TIMESERIES";

/// `explore` response: only the widget list matters.
#[derive(Debug, Deserialize)]
struct ExploreResponse {
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    #[serde(default)]
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Option<serde_json::Value>,
}

/// `widgetdata/multiline` response.
#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: TimelineContainer,
}

#[derive(Debug, Deserialize)]
struct TimelineContainer {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<f64>,
}

/// Connection settings for [`GoogleTrendsClient`].
#[derive(Debug, Clone)]
pub struct GoogleTrendsConfig {
    /// Interface language, e.g. `en-US`.
    pub language: String,
    /// Timezone offset in minutes, as the web UI sends it (360 = US Central).
    pub tz_offset: i32,
    pub timeout: Duration,
    pub base_url: String,
}

impl Default for GoogleTrendsConfig {
    fn default() -> Self {
        Self {
            language: "en-US".into(),
            tz_offset: 360,
            timeout: Duration::from_secs(30),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

/// Live Google Trends provider.
///
/// Holds a single cookie-carrying session that is reused for every request.
pub struct GoogleTrendsClient {
    client: reqwest::blocking::Client,
    config: GoogleTrendsConfig,
    session_ready: AtomicBool,
}

impl GoogleTrendsClient {
    pub fn new(config: GoogleTrendsConfig) -> Result<Self, TrendsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| TrendsError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            session_ready: AtomicBool::new(false),
        })
    }

    /// Visit the front page once so the session carries Google's cookies;
    /// the JSON endpoints reject cookieless requests with 429.
    fn ensure_session(&self, geo: &str) -> Result<(), TrendsError> {
        if self.session_ready.load(Ordering::Relaxed) {
            return Ok(());
        }
        let url = format!("{}/trends/explore", self.config.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("geo", geo)])
            .send()
            .map_err(map_transport_error)?;
        check_status(resp.status(), "session")?;
        self.session_ready.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn get_text(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, TrendsError> {
        let url = format!("{}/trends/api/{endpoint}", self.config.base_url);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(map_transport_error)?;
        check_status(resp.status(), endpoint)?;
        resp.text().map_err(|e| {
            TrendsError::ResponseFormatChanged(format!("unreadable {endpoint} body: {e}"))
        })
    }

    /// Build the `req` payload for the explore endpoint.
    fn explore_request(subject: &str, window: &TimeWindow, geo: &str) -> String {
        serde_json::json!({
            "comparisonItem": [{
                "keyword": subject,
                "time": window.timeframe(),
                "geo": geo,
            }],
            "category": 0,
            "property": "",
        })
        .to_string()
    }
}

impl TrendsProvider for GoogleTrendsClient {
    fn name(&self) -> &str {
        "google_trends"
    }

    fn fetch(
        &self,
        subject: &str,
        window: &TimeWindow,
        geo: &str,
    ) -> Result<Vec<Observation>, TrendsError> {
        self.ensure_session(geo)?;

        let tz = self.config.tz_offset.to_string();
        let explore = self.get_text(
            "explore",
            &[
                ("hl", self.config.language.clone()),
                ("tz", tz.clone()),
                ("req", Self::explore_request(subject, window, geo)),
            ],
        )?;
        let (request, token) = parse_timeseries_widget(&explore)?;

        let multiline = self.get_text(
            "widgetdata/multiline",
            &[
                ("hl", self.config.language.clone()),
                ("tz", tz),
                ("req", request),
                ("token", token),
            ],
        )?;
        let observations = parse_timeline(&multiline)?;
        debug!(
            subject,
            window = %window,
            points = observations.len(),
            "fetched interest series"
        );
        Ok(observations)
    }
}

fn map_transport_error(e: reqwest::Error) -> TrendsError {
    if e.is_connect() || e.is_timeout() {
        TrendsError::NetworkUnreachable(e.to_string())
    } else {
        TrendsError::Other(e.to_string())
    }
}

fn check_status(status: reqwest::StatusCode, endpoint: &str) -> Result<(), TrendsError> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TrendsError::RateLimited);
    }
    if !status.is_success() {
        return Err(TrendsError::HttpStatus {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
        });
    }
    Ok(())
}

/// Drop the anti-JSON guard that precedes every response body.
fn strip_guard(body: &str) -> Result<&str, TrendsError> {
    body.find('{')
        .map(|i| &body[i..])
        .ok_or_else(|| TrendsError::ResponseFormatChanged("no JSON object in response".into()))
}

/// Extract the TIMESERIES widget's request payload and token.
fn parse_timeseries_widget(body: &str) -> Result<(String, String), TrendsError> {
    let explore: ExploreResponse = serde_json::from_str(strip_guard(body)?)
        .map_err(|e| TrendsError::ResponseFormatChanged(format!("explore: {e}")))?;

    let widget = explore
        .widgets
        .into_iter()
        .find(|w| w.id == TIMESERIES_WIDGET_ID)
        .ok_or_else(|| TrendsError::ResponseFormatChanged("no TIMESERIES widget".into()))?;

    match (widget.request, widget.token) {
        (Some(request), Some(token)) => Ok((request.to_string(), token)),
        _ => Err(TrendsError::ResponseFormatChanged(
            "TIMESERIES widget without request/token".into(),
        )),
    }
}

/// Parse the multiline timeline into observations.
fn parse_timeline(body: &str) -> Result<Vec<Observation>, TrendsError> {
    let resp: MultilineResponse = serde_json::from_str(strip_guard(body)?)
        .map_err(|e| TrendsError::ResponseFormatChanged(format!("multiline: {e}")))?;

    let mut observations = Vec::with_capacity(resp.default.timeline_data.len());
    for point in resp.default.timeline_data {
        let ts: i64 = point.time.parse().map_err(|_| {
            TrendsError::ResponseFormatChanged(format!("invalid timestamp: {}", point.time))
        })?;
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| TrendsError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        // Single keyword per request, so the first value is the subject's column.
        let Some(&score) = point.value.first() else {
            continue;
        };
        observations.push(Observation { date, score });
    }
    Ok(observations)
}
