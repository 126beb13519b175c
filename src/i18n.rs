use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/folio_i18n_generated.rs"));
}

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum Locale {
    #[default]
    System,
    Tag(String),
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("system") {
            return Self::System;
        }
        Self::Tag(value.trim().to_string())
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

/// Resolves user-visible strings from the catalogs compiled out of `locales/`.
#[derive(Clone)]
pub struct I18nManager {
    catalog: Arc<Catalog>,
    locale: Arc<RwLock<Locale>>,
}

impl Default for I18nManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for I18nManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18nManager")
            .field("locale", &self.locale())
            .field("resolved", &self.resolved_locale())
            .finish()
    }
}

impl I18nManager {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(Catalog::load()),
            locale: Arc::new(RwLock::new(Locale::System)),
        }
    }

    pub fn with_locale(locale: impl Into<Locale>) -> Self {
        let manager = Self::new();
        manager.set_locale(locale);
        manager
    }

    pub fn locale(&self) -> Locale {
        match self.locale.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_locale(&self, locale: impl Into<Locale>) {
        let locale = locale.into();
        tracing::debug!(?locale, "switching message locale");
        match self.locale.write() {
            Ok(mut guard) => *guard = locale,
            Err(poisoned) => *poisoned.into_inner() = locale,
        }
    }

    pub fn default_locale(&self) -> &'static str {
        self.catalog.default_locale
    }

    pub fn resolved_locale(&self) -> &'static str {
        self.catalog
            .resolve_locale(self.requested_locale().as_deref())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns the translation for `key`, or the key itself when no catalog
    /// (including the default one) defines it.
    pub fn t(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = self.lookup(key).unwrap_or(key);
        if params.is_empty() {
            return template.to_string();
        }
        format_template(template, params)
    }

    fn requested_locale(&self) -> Option<String> {
        match self.locale() {
            Locale::System => system_locale(),
            Locale::Tag(tag) => Some(tag),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        let resolved = self.resolved_locale();
        self.catalog
            .lookup(resolved, key)
            .or_else(|| self.catalog.lookup(self.catalog.default_locale, key))
    }
}

#[cfg(feature = "i18n")]
fn system_locale() -> Option<String> {
    sys_locale::get_locale()
}

#[cfg(not(feature = "i18n"))]
fn system_locale() -> Option<String> {
    None
}

type LocaleTable = (&'static str, &'static [(&'static str, &'static str)]);

struct Catalog {
    default_locale: &'static str,
    entries: HashMap<&'static str, HashMap<&'static str, &'static str>>,
    by_normalized_tag: HashMap<String, &'static str>,
    by_language: HashMap<String, &'static str>,
}

impl Catalog {
    fn load() -> Self {
        Self::from_tables(generated::DEFAULT_LOCALE, generated::LOCALES)
    }

    fn from_tables(default_locale: &'static str, locales: &'static [LocaleTable]) -> Self {
        let mut entries = HashMap::new();
        let mut by_normalized_tag = HashMap::new();
        let mut by_language = HashMap::new();
        let mut ambiguous = HashSet::new();

        for (locale, pairs) in locales.iter().copied() {
            let normalized = normalize_locale_tag(locale);
            by_normalized_tag.insert(normalized.clone(), locale);

            let language = language_of(&normalized);
            match by_language.get(&language) {
                Some(existing) if *existing != locale => {
                    ambiguous.insert(language);
                }
                Some(_) => {}
                None => {
                    by_language.insert(language, locale);
                }
            }

            entries.insert(locale, pairs.iter().copied().collect::<HashMap<_, _>>());
        }

        // `en` must not pick between `en-US` and `en-GB` arbitrarily.
        for language in ambiguous {
            by_language.remove(&language);
        }

        if !entries.contains_key(default_locale) {
            entries.insert(default_locale, HashMap::new());
            let normalized = normalize_locale_tag(default_locale);
            by_language
                .entry(language_of(&normalized))
                .or_insert(default_locale);
            by_normalized_tag.insert(normalized, default_locale);
        }

        Self {
            default_locale,
            entries,
            by_normalized_tag,
            by_language,
        }
    }

    fn resolve_locale(&self, requested: Option<&str>) -> &'static str {
        let Some(requested) = requested else {
            return self.default_locale;
        };

        let normalized = normalize_locale_tag(requested);
        if let Some(locale) = self.by_normalized_tag.get(&normalized) {
            return locale;
        }
        if let Some(locale) = self.by_language.get(&language_of(&normalized)) {
            return locale;
        }
        self.default_locale
    }

    fn lookup(&self, locale: &'static str, key: &str) -> Option<&'static str> {
        self.entries
            .get(locale)
            .and_then(|pairs| pairs.get(key).copied())
    }
}

fn language_of(normalized: &str) -> String {
    normalized.split('-').next().unwrap_or_default().to_string()
}

/// `zh_CN.UTF-8`, `zh-cn` and `ZH-CN@pinyin` all normalize to `zh-cn`.
fn normalize_locale_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    let without_encoding = trimmed.split('.').next().unwrap_or(trimmed);
    let without_variant = without_encoding
        .split('@')
        .next()
        .unwrap_or(without_encoding);
    without_variant
        .replace('_', "-")
        .split('-')
        .filter(|segment| !segment.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn format_template(template: &str, params: &[(&str, &str)]) -> String {
    let values = params.iter().copied().collect::<HashMap<&str, &str>>();
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            output.push_str(&rest[open..]);
            return output;
        };

        let token = &after_open[..close];
        match values.get(token) {
            Some(value) => output.push_str(value),
            None => output.push_str(&rest[open..open + close + 2]),
        }
        rest = &after_open[close + 1..];
    }

    output.push_str(rest);
    output
}
