use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::TitleLookup;
use super::errors::TitleError;

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

/// Looks up a video title through the YouTube Data API
pub struct YoutubeTitleLookup {
    client: reqwest::Client,
    api_key: String,
    video_id: String,
}

impl YoutubeTitleLookup {
    pub fn new(api_key: impl Into<String>, video_id: impl Into<String>) -> Result<Self, TitleError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| TitleError::Client(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            video_id: video_id.into(),
        })
    }

    fn request_url(&self) -> Result<Url, TitleError> {
        Url::parse_with_params(
            VIDEOS_ENDPOINT,
            &[
                ("part", "snippet"),
                ("id", self.video_id.as_str()),
                ("key", self.api_key.as_str()),
            ],
        )
        .map_err(|e| TitleError::Client(e.to_string()))
    }

    fn request_error(&self, message: impl ToString) -> TitleError {
        TitleError::Request {
            video_id: self.video_id.clone(),
            message: message.to_string(),
        }
    }
}

fn first_title(response: VideoListResponse, video_id: &str) -> Result<String, TitleError> {
    response
        .items
        .into_iter()
        .next()
        .map(|video| video.snippet.title)
        .ok_or_else(|| TitleError::NoVideo(video_id.to_string()))
}

#[async_trait]
impl TitleLookup for YoutubeTitleLookup {
    #[tracing::instrument(skip(self), fields(video_id = %self.video_id))]
    async fn display_title(&self) -> Result<String, TitleError> {
        let response = self
            .client
            .get(self.request_url()?)
            .send()
            .await
            .map_err(|e| self.request_error(e.without_url()))?
            .error_for_status()
            .map_err(|e| self.request_error(e.without_url()))?;

        let videos: VideoListResponse = response
            .json()
            .await
            .map_err(|e| self.request_error(e.without_url()))?;
        first_title(videos, &self.video_id)
    }
}
