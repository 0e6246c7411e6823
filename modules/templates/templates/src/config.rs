use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TemplatesConfig {
    pub max_name_length: usize,
    pub max_content_length: usize,
    /// Upper bound applied to `PageRequest::limit`.
    pub max_page_size: usize,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            max_name_length: 120,
            max_content_length: 64 * 1024,
            max_page_size: 100,
        }
    }
}
