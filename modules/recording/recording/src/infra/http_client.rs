//! `reqwest` client for the medical transcription and report API.
//!
//! Endpoints, relative to `base_url`:
//! - `POST transcriptions`: multipart body with a single `file` part
//! - `POST reports`: JSON body `{ "transcription": ..., "template"?: ..., "language"?: ... }`

use std::time::Duration;

use async_trait::async_trait;
use modkit::SecurityCtx;
use recording_sdk::{AudioFile, MedicalApi, MedicalError, Report, ReportOptions, Transcription};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::RecordingConfig;

const USER_HEADER: &str = "x-scribe-user";
const MAX_ERROR_BODY: usize = 512;

pub struct MedicalHttpClient {
    client: reqwest::Client,
    transcriptions_url: Url,
    reports_url: Url,
    api_key: Option<String>,
    max_upload_bytes: usize,
    allowed_content_types: Vec<String>,
}

#[derive(Serialize)]
struct ReportRequest<'a> {
    transcription: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

impl MedicalHttpClient {
    /// # Errors
    /// Fails when `base_url` does not parse or the HTTP client cannot be built.
    pub fn new(config: &RecordingConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&with_trailing_slash(&config.base_url))
            .map_err(|e| anyhow::anyhow!("invalid medical API base_url '{}': {e}", config.base_url))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            transcriptions_url: base.join("transcriptions")?,
            reports_url: base.join("reports")?,
            api_key: config.api_key.clone(),
            max_upload_bytes: config.max_upload_bytes,
            allowed_content_types: config
                .allowed_content_types
                .iter()
                .map(|ct| ct.to_ascii_lowercase())
                .collect(),
        })
    }

    fn check_audio(&self, audio: &AudioFile) -> Result<mime::Mime, MedicalError> {
        if audio.bytes.is_empty() {
            return Err(MedicalError::EmptyAudio);
        }
        if audio.bytes.len() > self.max_upload_bytes {
            return Err(MedicalError::UnsupportedMedia(format!(
                "{} bytes exceeds the {} byte limit",
                audio.bytes.len(),
                self.max_upload_bytes
            )));
        }

        let parsed: mime::Mime = audio
            .content_type
            .parse()
            .map_err(|_| MedicalError::UnsupportedMedia(audio.content_type.clone()))?;
        let essence = parsed.essence_str().to_ascii_lowercase();
        if parsed.type_() != mime::AUDIO
            || !self.allowed_content_types.iter().any(|ct| *ct == essence)
        {
            return Err(MedicalError::UnsupportedMedia(audio.content_type.clone()));
        }
        Ok(parsed)
    }

    fn request(&self, url: &Url, ctx: &SecurityCtx) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .post(url.clone())
            .header(USER_HEADER, ctx.subject_id().to_string());
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl MedicalApi for MedicalHttpClient {
    async fn transcribe_audio(
        &self,
        ctx: &SecurityCtx,
        audio: AudioFile,
    ) -> Result<Transcription, MedicalError> {
        let content_type = self.check_audio(&audio)?;
        debug!(
            file_name = %audio.file_name,
            size = audio.bytes.len(),
            content_type = %content_type,
            "uploading audio for transcription"
        );

        let part = Part::bytes(audio.bytes.to_vec())
            .file_name(audio.file_name)
            .mime_str(content_type.as_ref())
            .map_err(|e| MedicalError::UnsupportedMedia(e.to_string()))?;
        let form = Form::new().part("file", part);

        let builder = self.request(&self.transcriptions_url, ctx).multipart(form);
        send(builder, "transcription").await
    }

    async fn generate_report(
        &self,
        ctx: &SecurityCtx,
        transcription: &Transcription,
        options: ReportOptions,
    ) -> Result<Report, MedicalError> {
        let body = ReportRequest {
            transcription: &transcription.text,
            template: options.template.as_deref(),
            language: options
                .language
                .as_deref()
                .or(transcription.language.as_deref()),
        };
        let builder = self.request(&self.reports_url, ctx).json(&body);
        send(builder, "report").await
    }
}

async fn send<T: serde::de::DeserializeOwned>(
    builder: reqwest::RequestBuilder,
    what: &'static str,
) -> Result<T, MedicalError> {
    let response = builder.send().await.map_err(|e| {
        error!(error = %e, what, "medical API request failed");
        MedicalError::Transport(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), what, "medical API returned an error");
        return Err(MedicalError::Upstream {
            status: status.as_u16(),
            message: truncate(body.trim(), MAX_ERROR_BODY),
        });
    }

    response.json::<T>().await.map_err(|e| {
        error!(error = %e, what, "medical API response did not decode");
        MedicalError::InvalidResponse(e.to_string())
    })
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_owned()
    } else {
        format!("{url}/")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
