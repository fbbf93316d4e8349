//! Function registry and prompt building.
//!
//! A "function" is a named capability (translation, summarization, ...)
//! backed by a fixed instruction template. The registry is built once at
//! startup and shared read-only afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while resolving a function or building its prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// No function with this name is registered.
    #[error("Unsupported function: {0}")]
    Unsupported(String),

    /// The content to process is empty or whitespace-only.
    #[error("Content must not be empty")]
    EmptyContent,
}

/// Public view of a registered function, as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub description: String,
}

/// A registry entry: public metadata plus the provider instruction.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    name: String,
    description: String,
    instruction: String,
}

impl FunctionSpec {
    /// Create a new function entry.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Render the provider prompt for `content`.
    #[must_use]
    pub fn render(&self, content: &str) -> String {
        format!("{}\n{}", self.instruction, content)
    }
}

/// Name of the Chinese-to-English translation function.
pub const TRANSLATE_ZH_TO_EN: &str = "translate_zh_to_en";
/// Name of the English-to-Chinese translation function.
pub const TRANSLATE_EN_TO_ZH: &str = "translate_en_to_zh";
/// Name of the summarization function.
pub const SUMMARIZE: &str = "summarize";

/// Ordered, immutable set of supported functions.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    entries: Vec<FunctionSpec>,
}

impl FunctionRegistry {
    /// Build a registry from explicit entries.
    ///
    /// Later entries with a duplicate name are ignored so lookups stay
    /// unambiguous.
    pub fn new(entries: impl IntoIterator<Item = FunctionSpec>) -> Self {
        let mut unique: Vec<FunctionSpec> = Vec::new();
        for entry in entries {
            if unique.iter().any(|e| e.name == entry.name) {
                tracing::warn!(function = %entry.name, "Duplicate function ignored");
                continue;
            }
            unique.push(entry);
        }
        Self { entries: unique }
    }

    /// The built-in translation and summarization functions.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new([
            FunctionSpec::new(
                TRANSLATE_ZH_TO_EN,
                "中文翻译成英文",
                "请将以下中文翻译成英文，保持原意准确，只回答我翻译的内容：",
            ),
            FunctionSpec::new(
                TRANSLATE_EN_TO_ZH,
                "英文翻译成中文",
                "请将以下英文翻译成中文，保持原意准确，只回答我翻译的内容：",
            ),
            FunctionSpec::new(
                SUMMARIZE,
                "文本总结",
                "请简要总结以下内容的核心观点，控制在原长度的10%以内：",
            ),
        ])
    }

    /// Look up a function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FunctionSpec> {
        self.entries.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Public listing, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<Function> {
        self.entries
            .iter()
            .map(|e| Function {
                name: e.name.clone(),
                description: e.description.clone(),
            })
            .collect()
    }

    /// Validate a request and build the provider prompt.
    pub fn build_prompt(&self, name: &str, content: &str) -> Result<String, FunctionError> {
        let spec = self
            .get(name)
            .ok_or_else(|| FunctionError::Unsupported(name.to_string()))?;
        if content.trim().is_empty() {
            return Err(FunctionError::EmptyContent);
        }
        Ok(spec.render(content))
    }
}
