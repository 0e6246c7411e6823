//! Localization bundles and the merged translation table.
//!
//! Each feature module contributes a `LangBundle` under its module key. The
//! manager merges all bundles into one `TranslationTable` where strings are
//! addressed as `"<module>:<key>"`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Locale code such as `en` or `fr`.
pub type LocaleCode = String;

/// Flat `key -> string` mapping for one locale.
pub type Messages = BTreeMap<String, String>;

pub const DEFAULT_LOCALE: &str = "en";

/// Per-module localization bundle: `locale -> messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LangBundle {
    locales: HashMap<LocaleCode, Messages>,
}

impl LangBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) the messages of one locale.
    #[must_use]
    pub fn locale<I, K, V>(mut self, locale: &str, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entry = self.locales.entry(locale.to_owned()).or_default();
        entry.extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn messages(&self, locale: &str) -> Option<&Messages> {
        self.locales.get(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.values().all(BTreeMap::is_empty)
    }
}

/// All bundles merged: `locale -> module key -> messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    default_locale: LocaleCode,
    entries: HashMap<LocaleCode, HashMap<String, Messages>>,
}

impl TranslationTable {
    #[must_use]
    pub fn new(default_locale: impl Into<LocaleCode>) -> Self {
        Self {
            default_locale: default_locale.into(),
            entries: HashMap::new(),
        }
    }

    /// Build a table from `(module key, bundle)` pairs.
    pub fn from_bundles<'a, I>(default_locale: impl Into<LocaleCode>, bundles: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a LangBundle)>,
    {
        let mut table = Self::new(default_locale);
        for (module, bundle) in bundles {
            table.merge(module, bundle);
        }
        table
    }

    /// Merge one module bundle; keys already present for the module are overwritten.
    pub fn merge(&mut self, module: &str, bundle: &LangBundle) {
        for (locale, messages) in &bundle.locales {
            self.entries
                .entry(locale.clone())
                .or_default()
                .entry(module.to_owned())
                .or_default()
                .extend(messages.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Sorted list of locales with at least one module bundle.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Look up `"<module>:<key>"` in `locale`, falling back to the default locale.
    #[must_use]
    pub fn translate(&self, locale: &str, key: &str) -> Option<&str> {
        let (module, key) = key.split_once(':')?;
        self.lookup(locale, module, key)
            .or_else(|| self.lookup(&self.default_locale, module, key))
    }

    /// Like `translate` but returns the key itself when nothing matches.
    #[must_use]
    pub fn t<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        self.translate(locale, key).unwrap_or(key)
    }

    fn lookup(&self, locale: &str, module: &str, key: &str) -> Option<&str> {
        self.entries
            .get(locale)?
            .get(module)?
            .get(key)
            .map(String::as_str)
    }
}
