use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TitleError {
    #[error("Can not create title lookup client: {0}")]
    Client(String),

    #[error("Can not get video (videoId = {video_id}): {message}")]
    Request { video_id: String, message: String },

    #[error("No video (videoId = {0})")]
    NoVideo(String),
}
