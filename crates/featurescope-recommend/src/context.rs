//! Request context for recommendations

use serde::{Deserialize, Serialize};

/// What the caller is looking at when asking for recommendations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    /// Feature id (or pattern id/alias) under the cursor
    pub current_feature: String,
    /// Editor language id of the document
    pub document_language: String,
    /// Optional project kind (`react`, `vue`, ...)
    #[serde(default)]
    pub project_type: Option<String>,
}

impl RecommendationContext {
    /// Context without a project type
    pub fn new(current_feature: impl Into<String>, document_language: impl Into<String>) -> Self {
        Self {
            current_feature: current_feature.into(),
            document_language: document_language.into(),
            project_type: None,
        }
    }

    /// Set the project type
    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }
}
