//! HTTP retrieval of raw shift charts and season schedules.
//!
//! A single [`ShiftClient`] owns one connection pool; create it once and
//! pass it to every call instead of building a client per request.

use std::fmt;
use std::time::Duration;

use ice_core::{GameId, GameIdError, RawShift};
use serde::Deserialize;
use thiserror::Error;

/// Default request timeout for API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SHIFT_API_URL: &str = "https://api.nhle.com/stats/rest/en";
pub const DEFAULT_SCHEDULE_API_URL: &str = "https://statsapi.web.nhl.com/api/v1";

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A configured base URL was unusable.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("API returned status {status} for {url}")]
    Status { status: u16, url: String },
    /// The requested season has no shift data or cannot be encoded.
    #[error(transparent)]
    InvalidSeason(#[from] GameIdError),
    /// Failed to parse response.
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// Base URLs and timeout for the provider endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub shift_api_url: String,
    pub schedule_api_url: String,
    pub timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            shift_api_url: DEFAULT_SHIFT_API_URL.to_string(),
            schedule_api_url: DEFAULT_SCHEDULE_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Shift chart and schedule client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct ShiftClient {
    http: reqwest::Client,
    shift_base: String,
    schedule_base: String,
}

impl fmt::Debug for ShiftClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShiftClient")
            .field("shift_base", &self.shift_base)
            .field("schedule_base", &self.schedule_base)
            .finish_non_exhaustive()
    }
}

impl ShiftClient {
    /// Creates a new client for the given endpoints.
    pub fn new(endpoints: &Endpoints) -> Result<Self, ApiError> {
        let shift_base = normalize_base(&endpoints.shift_api_url)?;
        let schedule_base = normalize_base(&endpoints.schedule_api_url)?;

        let http = reqwest::Client::builder()
            .timeout(endpoints.timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            shift_base,
            schedule_base,
        })
    }

    /// Fetches the raw shift chart of one game.
    ///
    /// A game without published shifts yields an empty list.
    pub async fn game_shifts(&self, game_id: GameId) -> Result<Vec<RawShift>, ApiError> {
        let url = format!("{}/shiftcharts", self.shift_base);
        let body = self
            .get_text(&url, &[("cayenneExp", format!("gameId={game_id}"))])
            .await?;

        let shifts = ice_core::parse_raw_shifts(&body).map_err(|err| ApiError::InvalidResponse {
            url,
            message: err.to_string(),
        })?;
        tracing::debug!(game_id = %game_id, records = shifts.len(), "fetched shift chart");
        Ok(shifts)
    }

    /// Fetches the number of regular-season games in a season.
    ///
    /// The season is validated before any request is made.
    pub async fn season_game_count(&self, season: u32) -> Result<u32, ApiError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Schedule {
            total_games: u32,
        }

        ice_core::validate_season(season)?;

        let url = format!("{}/schedule", self.schedule_base);
        let body = self
            .get_text(
                &url,
                &[
                    ("season", format!("{season}{}", season + 1)),
                    ("gameType", "R".to_string()),
                ],
            )
            .await?;

        let schedule: Schedule =
            serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse {
                url,
                message: err.to_string(),
            })?;
        Ok(schedule.total_games)
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

fn normalize_base(url: &str) -> Result<String, ApiError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidBaseUrl {
            url: url.to_string(),
            reason: "URL cannot be empty",
        });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::InvalidBaseUrl {
            url: url.to_string(),
            reason: "URL must start with http:// or https://",
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ShiftClient {
        ShiftClient::new(&Endpoints {
            shift_api_url: server.uri(),
            schedule_api_url: format!("{}/", server.uri()),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let endpoints = Endpoints {
            shift_api_url: "  ".to_string(),
            ..Endpoints::default()
        };
        assert!(matches!(
            ShiftClient::new(&endpoints),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let endpoints = Endpoints {
            schedule_api_url: "statsapi.web.nhl.com/api/v1".to_string(),
            ..Endpoints::default()
        };
        assert!(matches!(
            ShiftClient::new(&endpoints),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(
            normalize_base("https://example.com/api/").unwrap(),
            "https://example.com/api"
        );
    }

    #[tokio::test]
    async fn test_fetches_game_shifts() {
        let server = MockServer::start().await;
        let body = r#"{"data":[{"gameId":2013020001,"playerId":8471214,"startTime":"00:00","period":1,"endTime":"00:45","duration":"00:45","teamId":15,"teamName":"Washington Capitals"}],"total":1}"#;

        Mock::given(method("GET"))
            .and(path("/shiftcharts"))
            .and(query_param("cayenneExp", "gameId=2013020001"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let shifts = client_for(&server)
            .game_shifts(GameId::from_raw(2_013_020_001))
            .await
            .unwrap();
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].team_id, Some(15));
    }

    #[tokio::test]
    async fn test_game_without_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shiftcharts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[],"total":0}"#))
            .mount(&server)
            .await;

        let shifts = client_for(&server)
            .game_shifts(GameId::from_raw(2_013_020_002))
            .await
            .unwrap();
        assert!(shifts.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shiftcharts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .game_shifts(GameId::from_raw(2_013_020_003))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetches_season_game_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .and(query_param("season", "20132014"))
            .and(query_param("gameType", "R"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"totalGames":1230,"dates":[]}"#),
            )
            .mount(&server)
            .await;

        let count = client_for(&server).season_game_count(2013).await.unwrap();
        assert_eq!(count, 1230);
    }

    #[tokio::test]
    async fn test_unsupported_seasons_fail_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"totalGames":1}"#))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for season in [2009, u32::MAX] {
            let err = client.season_game_count(season).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidSeason(_)), "{season}: {err}");
        }
    }

    #[tokio::test]
    async fn test_malformed_schedule_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .season_game_count(2013)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }
}
