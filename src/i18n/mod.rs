//! Translation collaborator.
//!
//! The console only consumes translations: a `T(key, fallback)` function and
//! a registry reporting the current language and loaded catalogs. `Catalog`
//! is a registry that can be installed and filled after the controller has
//! been constructed, so readiness can be observed while it loads.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

/// Message keys used by the settings controller, with English fallbacks.
pub mod keys {
    pub const SAVING: (&str, &str) = ("saving", "Saving...");
    pub const SETTINGS_SAVED: (&str, &str) = (
        "settings_saved",
        "Settings saved! The configuration file was updated; restart the service for changes to take effect.",
    );
    pub const SAVE_FAILED: (&str, &str) = ("save_failed", "Save failed");
    pub const NO_ORIGINAL_CONFIG: (&str, &str) =
        ("no_original_config", "There is no original configuration to restore");
    pub const SETTINGS_RESET: (&str, &str) =
        ("settings_reset", "Settings have been reset to their initial values");
    pub const TOKEN_GENERATED: (&str, &str) = (
        "token_generated",
        "Token generated! Remember to save the settings.",
    );
    pub const TOKEN_GENERATE_FAILED: (&str, &str) =
        ("token_generate_failed", "Failed to generate token");
    pub const NO_TOKEN_TO_COPY: (&str, &str) = (
        "no_token_to_copy",
        "There is no token to copy, generate one first",
    );
    pub const TOKEN_COPIED: (&str, &str) = ("token_copied", "Token copied to clipboard");
    pub const COPY_FAILED_MANUAL: (&str, &str) =
        ("copy_failed_manual", "Copy failed, please copy it manually");

    /// Shown untranslated: it is raised when the translator is missing.
    pub const SYSTEM_NOT_READY: &str = "The system is not ready yet, please try again later";

    pub const ALL: [(&str, &str); 10] = [
        SAVING,
        SETTINGS_SAVED,
        SAVE_FAILED,
        NO_ORIGINAL_CONFIG,
        SETTINGS_RESET,
        TOKEN_GENERATED,
        TOKEN_GENERATE_FAILED,
        NO_TOKEN_TO_COPY,
        TOKEN_COPIED,
        COPY_FAILED_MANUAL,
    ];
}

/// Translation function plus registry.
pub trait I18n: Send + Sync {
    /// Whether the translation function is available at all.
    fn is_installed(&self) -> bool;

    /// Localized string for `key`, or `fallback` when there is none.
    fn translate(&self, key: &str, fallback: &str) -> String;

    /// Language code -> (key -> string).
    fn all_translations(&self) -> HashMap<String, HashMap<String, String>>;

    /// Currently selected language code.
    fn language(&self) -> String;

    /// Number of translations loaded for `language`.
    fn translation_count(&self, language: &str) -> usize {
        self.all_translations().get(language).map_or(0, HashMap::len)
    }
}

/// Translate a `(key, fallback)` pair from [`keys`].
pub fn t(i18n: &dyn I18n, entry: (&str, &str)) -> String {
    i18n.translate(entry.0, entry.1)
}

#[derive(Debug, Clone, Default)]
struct CatalogState {
    installed: bool,
    language: String,
    translations: HashMap<String, HashMap<String, String>>,
}

/// Lock-free translation registry.
#[derive(Debug)]
pub struct Catalog {
    state: ArcSwap<CatalogState>,
}

impl Catalog {
    /// A registry for `language` with nothing installed or loaded yet.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            state: ArcSwap::from_pointee(CatalogState {
                language: language.into(),
                ..CatalogState::default()
            }),
        }
    }

    /// An installed registry with the built-in English messages loaded.
    pub fn english() -> Self {
        let catalog = Self::new("en");
        catalog.insert_language(
            "en",
            keys::ALL
                .iter()
                .map(|(key, text)| (key.to_string(), text.to_string()))
                .collect(),
        );
        catalog.install();
        catalog
    }

    /// Make the translation function available.
    pub fn install(&self) {
        self.update(|state| state.installed = true);
    }

    pub fn set_language(&self, language: impl Into<String>) {
        let language = language.into();
        self.update(move |state| state.language = language.clone());
    }

    /// Replace the catalog for `language`.
    pub fn insert_language(&self, language: &str, entries: HashMap<String, String>) {
        self.update(|state| {
            state.translations.insert(language.to_string(), entries.clone());
        });
    }

    /// Load a JSON object of key -> string as the catalog for `language`.
    pub fn load_json(&self, language: &str, path: &Path) -> Result<usize, CatalogError> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        let count = entries.len();
        self.insert_language(language, entries);
        tracing::debug!(language, count, path = ?path, "Translation catalog loaded");
        Ok(count)
    }

    fn update<F>(&self, f: F)
    where
        F: Fn(&mut CatalogState),
    {
        self.state.rcu(|current| {
            let mut next = CatalogState::clone(current);
            f(&mut next);
            Arc::new(next)
        });
    }
}

impl I18n for Catalog {
    fn is_installed(&self) -> bool {
        self.state.load().installed
    }

    fn translate(&self, key: &str, fallback: &str) -> String {
        let state = self.state.load();
        state
            .translations
            .get(&state.language)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }

    fn all_translations(&self) -> HashMap<String, HashMap<String, String>> {
        self.state.load().translations.clone()
    }

    fn language(&self) -> String {
        self.state.load().language.clone()
    }

    fn translation_count(&self, language: &str) -> usize {
        self.state.load().translations.get(language).map_or(0, HashMap::len)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_falls_back() {
        let catalog = Catalog::new("zh-CN");
        catalog.insert_language(
            "zh-CN",
            HashMap::from([("saving".to_string(), "保存中...".to_string())]),
        );

        assert_eq!(catalog.translate("saving", "Saving..."), "保存中...");
        assert_eq!(catalog.translate("missing", "Fallback"), "Fallback");

        catalog.set_language("fr");
        assert_eq!(catalog.translate("saving", "Saving..."), "Saving...");
    }

    #[test]
    fn test_install_and_counts() {
        let catalog = Catalog::new("en");
        assert!(!catalog.is_installed());
        assert_eq!(catalog.translation_count("en"), 0);

        catalog.install();
        catalog.insert_language("en", HashMap::from([("a".into(), "b".into())]));

        assert!(catalog.is_installed());
        assert_eq!(catalog.translation_count("en"), 1);
        assert_eq!(catalog.all_translations()["en"]["a"], "b");
    }

    #[test]
    fn test_english_catalog_is_ready() {
        let catalog = Catalog::english();
        assert!(catalog.is_installed());
        assert_eq!(catalog.language(), "en");
        assert_eq!(catalog.translation_count("en"), keys::ALL.len());
        assert_eq!(t(&catalog, keys::SAVE_FAILED), "Save failed");
    }

    #[test]
    fn test_load_json_catalog() {
        let path = std::env::temp_dir().join(format!("settings-catalog-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"token_copied": "令牌已复制到剪贴板"}"#).unwrap();

        let catalog = Catalog::new("zh-CN");
        assert_eq!(catalog.load_json("zh-CN", &path).unwrap(), 1);
        assert_eq!(t(&catalog, keys::TOKEN_COPIED), "令牌已复制到剪贴板");

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
