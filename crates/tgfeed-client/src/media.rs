//! Video sending: the `sendVideo` method and its request builder.

use crate::api::{ApiResponse, BotApi};
use serde_json::{Map, Value};
use tgfeed_core::error::TgfeedError;
use tgfeed_core::update::Message;

/// Where the video payload comes from.
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Re-send a file the platform already stores, by file id.
    FileId(String),
    /// Upload new bytes under the given file name.
    Upload { file_name: String, bytes: Vec<u8> },
}

/// Request for the `sendVideo` method.
///
/// Immutable once built; setters consume and return the value. The
/// required chat id and video source are constructor arguments, so an
/// unaddressed request cannot be expressed.
#[derive(Debug, Clone)]
pub struct SendVideo {
    chat_id: i64,
    video: VideoSource,
    duration: Option<i64>,
    caption: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    disable_notification: bool,
    reply_to_message_id: Option<i64>,
}

impl SendVideo {
    pub fn from_file_id(chat_id: i64, file_id: impl Into<String>) -> Self {
        Self::new(chat_id, VideoSource::FileId(file_id.into()))
    }

    pub fn from_bytes(chat_id: i64, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(
            chat_id,
            VideoSource::Upload {
                file_name: file_name.into(),
                bytes,
            },
        )
    }

    fn new(chat_id: i64, video: VideoSource) -> Self {
        Self {
            chat_id,
            video,
            duration: None,
            caption: None,
            width: None,
            height: None,
            disable_notification: false,
            reply_to_message_id: None,
        }
    }

    /// Duration in seconds.
    pub fn duration(mut self, seconds: i64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn width(mut self, width: i64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: i64) -> Self {
        self.height = Some(height);
        self
    }

    /// Deliver without a notification sound.
    pub fn disable_notification(mut self) -> Self {
        self.disable_notification = true;
        self
    }

    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }

    /// Method parameters shared by the JSON and multipart transports.
    /// The video payload itself is attached per transport.
    pub(crate) fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("chat_id".into(), self.chat_id.into());
        if let Some(duration) = self.duration {
            params.insert("duration".into(), duration.into());
        }
        if let Some(ref caption) = self.caption {
            params.insert("caption".into(), caption.as_str().into());
        }
        if let Some(width) = self.width {
            params.insert("width".into(), width.into());
        }
        if let Some(height) = self.height {
            params.insert("height".into(), height.into());
        }
        if self.disable_notification {
            params.insert("disable_notification".into(), true.into());
        }
        if let Some(reply_to) = self.reply_to_message_id {
            params.insert("reply_to_message_id".into(), reply_to.into());
        }
        params
    }
}

impl BotApi {
    /// Send a video and answer the message the platform created for it.
    ///
    /// File-id re-sends go as a JSON body; uploads go as multipart with
    /// the same parameters as form fields.
    pub async fn send_video(&self, request: SendVideo) -> Result<Message, TgfeedError> {
        let url = format!("{}/sendVideo", self.base_url);
        let params = request.params();

        let resp = match request.video {
            VideoSource::FileId(file_id) => {
                let mut body = params;
                body.insert("video".into(), file_id.into());
                self.client
                    .post(&url)
                    .json(&Value::Object(body))
                    .send()
                    .await
                    .map_err(|e| TgfeedError::Transport(format!("sendVideo failed: {e}")))?
            }
            VideoSource::Upload { file_name, bytes } => {
                let part = reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("video/mp4")
                    .map_err(|e| TgfeedError::Transport(format!("sendVideo mime error: {e}")))?;

                let mut form = reqwest::multipart::Form::new().part("video", part);
                for (key, value) in params {
                    let text = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    form = form.text(key, text);
                }

                self.client
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(|e| TgfeedError::Transport(format!("sendVideo failed: {e}")))?
            }
        };

        let envelope: ApiResponse<Message> = resp
            .json()
            .await
            .map_err(|e| TgfeedError::Transport(format!("sendVideo parse failed: {e}")))?;
        envelope.into_result("sendVideo")
    }
}
