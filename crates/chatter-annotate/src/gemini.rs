//! Gemini `generateContent` client.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;
use crate::Result;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used for audio transcription.
const AUDIO_MODEL: &str = "gemini-3-flash-preview";

/// Model used for video analysis.
const VIDEO_MODEL: &str = "gemini-3-pro-preview";

const TRANSCRIBE_PROMPT: &str =
    "Transcribe this audio file exactly as spoken. Return only the transcript text.";

const VIDEO_PROMPT: &str = "Analyze this video.\n\
     1. Provide a full transcript of speech if available.\n\
     2. Provide a short summary (3-5 sentences) of the visual and audio content.\n\n\
     Return the result in JSON format: { \"transcript\": \"...\", \"summary\": \"...\" }";

/// Result of analyzing a video message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoAnalysis {
    pub transcript: String,
    pub summary: String,
}

/// Client for the Gemini REST API.
#[derive(Debug)]
pub struct GeminiAnnotator {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiAnnotator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| AnnotateError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    // ------------------------------------------------------------------
    // Raw calls
    // ------------------------------------------------------------------

    /// Transcribe an audio clip.
    pub async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        let request = GenerateContentRequest::inline_media(audio, mime_type, TRANSCRIBE_PROMPT);
        let response = self.generate(AUDIO_MODEL, &request).await?;

        response
            .first_text()
            .map(str::to_owned)
            .ok_or_else(|| AnnotateError::BadResponse("no text part in candidate".into()))
    }

    /// Extract a transcript and a short summary from a video clip.
    pub async fn analyze_video(&self, video: &[u8], mime_type: &str) -> Result<VideoAnalysis> {
        let request = GenerateContentRequest::inline_media(video, mime_type, VIDEO_PROMPT)
            .with_json_response();
        let response = self.generate(VIDEO_MODEL, &request).await?;

        let text = response
            .first_text()
            .ok_or_else(|| AnnotateError::BadResponse("no text part in candidate".into()))?;
        Ok(parse_video_analysis(text))
    }

    // ------------------------------------------------------------------
    // Degrading wrappers
    // ------------------------------------------------------------------

    /// Like [`transcribe`](Self::transcribe), but failures degrade to
    /// placeholder text instead of propagating.
    pub async fn transcribe_or_placeholder(&self, audio: &[u8], mime_type: &str) -> String {
        match self.transcribe(audio, mime_type).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "audio transcription failed");
                "Error transcribing audio.".to_string()
            }
        }
    }

    /// Like [`analyze_video`](Self::analyze_video), but failures degrade to
    /// placeholder text instead of propagating.
    pub async fn analyze_video_or_placeholder(
        &self,
        video: &[u8],
        mime_type: &str,
    ) -> VideoAnalysis {
        match self.analyze_video(video, mime_type).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "video analysis failed");
                VideoAnalysis {
                    transcript: "Error".to_string(),
                    summary: "Error analyzing video.".to_string(),
                }
            }
        }
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{API_BASE}/{model}:generateContent");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// One content turn: the media bytes inline, then the instruction text.
    fn inline_media(data: &[u8], mime_type: &str, prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: STANDARD.encode(data),
                        }),
                    },
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                ],
            }],
            generation_config: None,
        }
    }

    fn with_json_response(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
        });
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Parse the model's JSON answer, degrading gracefully when the model
/// ignored the JSON instruction.
fn parse_video_analysis(text: &str) -> VideoAnalysis {
    #[derive(Deserialize)]
    struct Answer {
        transcript: Option<String>,
        summary: Option<String>,
    }

    match serde_json::from_str::<Answer>(text) {
        Ok(answer) => VideoAnalysis {
            transcript: answer
                .transcript
                .unwrap_or_else(|| "No transcript available.".to_string()),
            summary: answer
                .summary
                .unwrap_or_else(|| "No summary available.".to_string()),
        },
        Err(_) => VideoAnalysis {
            transcript: text.to_string(),
            summary: "Could not parse JSON response.".to_string(),
        },
    }
}
