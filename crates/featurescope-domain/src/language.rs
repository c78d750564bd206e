//! Language families used to scope pattern detection

use serde::{Deserialize, Serialize};

/// Broad family of an editor language id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    /// Stylesheets and their preprocessors
    Css,
    /// JavaScript, TypeScript and JSX variants
    Js,
    /// Markup and single-file component formats that embed both
    Html,
    /// Anything else; detection is not restricted
    Other,
}

impl LanguageFamily {
    /// Classify an editor language id (case-insensitive)
    pub fn from_language_id(language_id: &str) -> Self {
        match language_id.trim().to_ascii_lowercase().as_str() {
            "css" | "scss" | "sass" | "less" | "stylus" | "postcss" => LanguageFamily::Css,
            "javascript" | "typescript" | "javascriptreact" | "typescriptreact" | "js" | "ts"
            | "jsx" | "tsx" | "mjs" | "cjs" => LanguageFamily::Js,
            "html" | "htm" | "xhtml" | "vue" | "svelte" | "astro" => LanguageFamily::Html,
            _ => LanguageFamily::Other,
        }
    }
}
