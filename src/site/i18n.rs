use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use regex::Regex;
use serde_json::Value;

use crate::{config::SiteConfig, core::error::ScoutError};

/// Translation table for one locale.
#[derive(Debug, Clone)]
pub struct Dictionary {
    pub locale: String,
    entries: Value,
}

impl Dictionary {
    pub fn from_json(locale: &str, raw: &str) -> Result<Self, ScoutError> {
        let entries: Value = serde_json::from_str(raw)
            .map_err(|e| ScoutError::Locale(format!("{locale}: {e}")))?;
        if !entries.is_object() {
            return Err(ScoutError::Locale(format!(
                "{locale}: dictionary root must be an object"
            )));
        }
        Ok(Self {
            locale: locale.to_string(),
            entries,
        })
    }

    /// Look up a dotted key such as `nav.pricing`.
    pub fn get(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.entries, |node, part| node.get(part))
            .and_then(Value::as_str)
    }

    /// Look up `key` and substitute `{name}` placeholders.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> Option<String> {
        let template = self.get(key)?;
        Some(args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        }))
    }

    pub fn entries(&self) -> &Value {
        &self.entries
    }
}

pub struct DictionaryProvider {
    dir: PathBuf,
    locales: Vec<String>,
    default_locale: String,
    code_pattern: Regex,
    cache: Mutex<HashMap<String, Arc<Dictionary>>>,
}

impl DictionaryProvider {
    pub fn new(
        dir: &Path,
        locales: Vec<String>,
        default_locale: String,
    ) -> Result<Self, ScoutError> {
        if !locales.contains(&default_locale) {
            return Err(ScoutError::Config(format!(
                "default locale {default_locale} is not supported"
            )));
        }
        let code_pattern = Regex::new(r"^[A-Za-z]{2,3}(?:[-_][A-Za-z0-9]{2,8})*$")
            .map_err(|e| ScoutError::Config(e.to_string()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            locales,
            default_locale,
            code_pattern,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn from_config(site: &SiteConfig) -> Result<Self, ScoutError> {
        Self::new(
            Path::new(&site.dictionaries_dir),
            site.locales.clone(),
            site.default_locale.clone(),
        )
    }

    pub fn supported_locales(&self) -> &[String] {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Map a requested code onto a supported locale, falling back to the default.
    pub fn resolve_locale(&self, code: &str) -> &str {
        let code = code.trim();
        if !self.code_pattern.is_match(code) {
            return &self.default_locale;
        }
        let lang = code.split(['-', '_']).next().unwrap_or(code);
        self.locales
            .iter()
            .find(|l| l.eq_ignore_ascii_case(code))
            .or_else(|| self.locales.iter().find(|l| l.eq_ignore_ascii_case(lang)))
            .map(String::as_str)
            .unwrap_or(self.default_locale.as_str())
    }

    pub fn dictionary(&self, code: &str) -> Result<Arc<Dictionary>, ScoutError> {
        let locale = self.resolve_locale(code).to_string();
        if let Some(dict) = self.cached(&locale) {
            return Ok(dict);
        }

        let path = self.dir.join(format!("{locale}.json"));
        let raw = fs::read_to_string(&path)
            .map_err(|e| ScoutError::Locale(format!("{}: {e}", path.display())))?;
        let dict = Arc::new(Dictionary::from_json(&locale, &raw)?);
        tracing::debug!("loaded dictionary {} from {}", locale, path.display());

        let mut cache = self.cache.lock().map_err(|_| ScoutError::Unknown)?;
        Ok(cache.entry(locale).or_insert(dict).clone())
    }

    fn cached(&self, locale: &str) -> Option<Arc<Dictionary>> {
        let cache = self.cache.lock().ok()?;
        cache.get(locale).cloned()
    }
}
