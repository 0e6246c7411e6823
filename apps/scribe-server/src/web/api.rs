//! JSON endpoints.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use modkit::MenuItem;
use modkit::menu::sort_by_order;
use recording_sdk::{
    AudioFile, MedicalApiService, MedicalError, Report, ReportOptions, Transcription,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::{session, signed_in};
use crate::state::AppState;

pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(Serialize)]
pub struct Menus {
    pub main: Vec<MenuItem>,
    pub settings: Vec<MenuItem>,
}

/// Both menus, ordered, with labels translated for `?lang=` or `Accept-Language`.
pub async fn menus(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Menus> {
    let locale = session::locale(query.get("lang").map(String::as_str), &headers);
    let locale = locale
        .as_deref()
        .unwrap_or_else(|| state.manager.default_locale());
    let components = state.manager.components();
    let translations = components.translations();

    let localize = |mut items: Vec<MenuItem>| {
        sort_by_order(&mut items);
        for item in &mut items {
            item.label = translations.t(locale, &item.label).to_owned();
        }
        items
    };

    Json(Menus {
        main: localize(components.menus()),
        settings: localize(components.menu_settings()),
    })
}

#[derive(Debug, Serialize)]
pub struct RecordingResponse {
    pub transcription: Transcription,
    pub report: Report,
    pub transcription_ms: u64,
    pub report_ms: u64,
}

/// `multipart/form-data` with an `audio` file part and optional `template`
/// and `language` text parts.
pub async fn create_recording(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let user = match signed_in(&state, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return json_error(StatusCode::UNAUTHORIZED, "not signed in"),
        Err(err) => {
            warn!(error = %err, "recording upload without auth service");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
    };
    let medical = match state.manager.components().require_service::<MedicalApiService>() {
        Ok(medical) => medical,
        Err(err) => {
            warn!(error = %err, "recording upload without medical API");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
    };

    let (audio, options) = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    info!(
        user_id = %user.user.id,
        file_name = %audio.file_name,
        size = audio.bytes.len(),
        "processing recording"
    );

    match medical
        .process_audio_and_generate_report(&user.security_ctx(), audio, options)
        .await
    {
        Ok(done) => Json(RecordingResponse {
            transcription: done.transcription,
            report: done.report,
            transcription_ms: millis(done.transcription_time),
            report_ms: millis(done.report_time),
        })
        .into_response(),
        Err(err) => {
            warn!(error = %err, "recording processing failed");
            json_error(medical_status(&err), &err.to_string())
        }
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<(AudioFile, ReportOptions), Response> {
    let mut audio = None;
    let mut options = ReportOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "audio" => {
                let file_name = field.file_name().unwrap_or("recording").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                audio = Some(AudioFile::new(file_name, content_type, bytes));
            }
            "template" | "language" => {
                let value = field.text().await.map_err(IntoResponse::into_response)?;
                let value = value.trim();
                if !value.is_empty() {
                    options = if name == "template" {
                        options.template(value)
                    } else {
                        options.language(value)
                    };
                }
            }
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| json_error(StatusCode::BAD_REQUEST, "missing 'audio' part"))?;
    Ok((audio, options))
}

fn medical_status(err: &MedicalError) -> StatusCode {
    match err {
        MedicalError::EmptyAudio => StatusCode::BAD_REQUEST,
        MedicalError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        MedicalError::Upstream { .. }
        | MedicalError::Transport(_)
        | MedicalError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
