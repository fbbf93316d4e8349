//! Request bodies.

use serde::Deserialize;

/// Body shared by the call, task and stream endpoints.
///
/// Missing fields deserialize as empty and are rejected by the handlers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiRequest {
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub content: String,
}

impl AiRequest {
    /// Name of the first required field that is missing or blank.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.function.trim().is_empty() {
            Some("function")
        } else if self.content.trim().is_empty() {
            Some("content")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_reported_in_order() {
        let req: AiRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.missing_field(), Some("function"));

        let req: AiRequest = serde_json::from_str(r#"{"function":"summarize","content":" "}"#).unwrap();
        assert_eq!(req.missing_field(), Some("content"));

        let req: AiRequest = serde_json::from_str(r#"{"function":"summarize","content":"x"}"#).unwrap();
        assert_eq!(req.missing_field(), None);
    }
}
