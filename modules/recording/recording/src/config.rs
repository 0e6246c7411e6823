use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RecordingConfig {
    /// Base URL of the medical API, e.g. `https://medical.example.com/v1/`.
    pub base_url: String,
    /// Sent as a bearer token when set.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Accepted MIME essences (`type/subtype`, parameters ignored).
    pub allowed_content_types: Vec<String>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090/".to_owned(),
            api_key: None,
            timeout_secs: 120,
            max_upload_bytes: 25 * 1024 * 1024,
            allowed_content_types: ["audio/webm", "audio/ogg", "audio/wav", "audio/mpeg", "audio/mp4"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}
