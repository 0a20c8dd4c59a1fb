//! Translation tables for tip keys

use std::collections::HashMap;
use std::path::Path;

use crate::content;
use crate::errors::Result;

/// Renders a tip key in the active locale. Must not fail: an untranslated
/// key comes back unchanged.
pub trait Localizer: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    tables: HashMap<String, HashMap<String, String>>,
    active: String,
    fallback: String,
}

impl LocaleCatalog {
    pub fn new(active: impl Into<String>, fallback: impl Into<String>) -> Self {
        let (active, fallback): (String, String) = (active.into(), fallback.into());
        Self {
            tables: HashMap::new(),
            active: language_tag(&active),
            fallback: language_tag(&fallback),
        }
    }

    /// Built-in English texts, with `active` as the active locale
    pub fn builtin(active: impl Into<String>, fallback: impl Into<String>) -> Self {
        let mut catalog = Self::new(active, fallback);
        catalog.extend(
            "en",
            content::builtin_tip_texts().map(|(key, text)| (key.to_string(), text.to_string())),
        );
        catalog
    }

    /// Use a device locale such as "en-US" or "kn_IN"; only the language is kept
    pub fn with_device_locale(mut self, device_locale: &str) -> Self {
        self.active = language_tag(device_locale);
        self
    }

    pub fn extend<I>(&mut self, locale: &str, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.tables
            .entry(language_tag(locale))
            .or_default()
            .extend(entries);
    }

    /// Merge a flat `{"key": "text"}` JSON table for `locale`
    pub fn load_json_str(&mut self, locale: &str, raw: &str) -> Result<()> {
        let entries: HashMap<String, String> = serde_json::from_str(raw)?;
        tracing::debug!(locale, keys = entries.len(), "loaded translations");
        self.extend(locale, entries);
        Ok(())
    }

    pub fn load_json_file(&mut self, locale: &str, path: impl AsRef<Path>) -> Result<()> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        self.load_json_str(locale, &raw)
    }

    pub fn active_locale(&self) -> &str {
        &self.active
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&String> {
        self.tables.get(locale).and_then(|table| table.get(key))
    }
}

impl Localizer for LocaleCatalog {
    fn translate(&self, key: &str) -> String {
        self.lookup(&self.active, key)
            .or_else(|| self.lookup(&self.fallback, key))
            .cloned()
            .unwrap_or_else(|| {
                tracing::debug!(key, locale = %self.active, "untranslated key");
                key.to_string()
            })
    }
}

fn language_tag(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
