use std::collections::BTreeSet;

use super::ModelIdentifier;

/// Text-capable models offered for document chat.
pub const DEFAULT_TEXT_MODELS: &[&str] = &["llama3.1:latest", "codegemma:latest"];
/// Vision-capable models offered for image chat.
pub const DEFAULT_VISION_MODELS: &[&str] = &["bakllava:latest", "llava:latest"];

/// Which model family a session needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Text,
    Vision,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Text => "text",
            Capability::Vision => "vision",
        }
    }
}

/// The set of model identifiers the application is willing to present,
/// independent of what the server reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    permitted: BTreeSet<ModelIdentifier>,
}

impl AllowList {
    /// Blank names are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let permitted = names
            .into_iter()
            .filter_map(|n| ModelIdentifier::new(n.as_ref()).ok())
            .collect();
        Self { permitted }
    }

    pub fn text_default() -> Self {
        Self::new(DEFAULT_TEXT_MODELS)
    }

    pub fn vision_default() -> Self {
        Self::new(DEFAULT_VISION_MODELS)
    }

    pub fn permitted(&self) -> &BTreeSet<ModelIdentifier> {
        &self.permitted
    }

    pub fn contains(&self, model: &ModelIdentifier) -> bool {
        self.permitted.contains(model)
    }
}

/// Result of checking an allow-list against the server's installed models.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAvailability {
    /// Permitted and installed: selectable right now.
    pub allowed: BTreeSet<ModelIdentifier>,
    /// Permitted but not installed: candidates for a pull.
    pub missing: BTreeSet<ModelIdentifier>,
}

impl ModelAvailability {
    pub fn has_allowed(&self) -> bool {
        !self.allowed.is_empty()
    }

    pub fn first_allowed(&self) -> Option<&ModelIdentifier> {
        self.allowed.iter().next()
    }
}
