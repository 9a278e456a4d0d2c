//! Translation adapter contract and the two stock adapters.
//!
//! Every user-visible string goes through [`Translator::translate`]. Unknown
//! keys resolve to the key itself, so configurations written with plain
//! display text work with an empty catalog.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;
use thiserror::Error;

/// Substitution parameters for `{name}` placeholders.
pub type Params = BTreeMap<String, String>;

/// Resolves a translation key, substituting `params` into the result.
pub trait Translator {
    fn translate(&self, key: &str, params: Option<&Params>) -> String;

    fn t(&self, key: &str) -> String {
        self.translate(key, None)
    }
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(&self, key: &str, params: Option<&Params>) -> String {
        (**self).translate(key, params)
    }
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(&self, key: &str, params: Option<&Params>) -> String {
        (**self).translate(key, params)
    }
}

/// Message source supplied by the host application.
pub trait TranslationProvider {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl TranslationProvider for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl TranslationProvider for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("a host translation provider is required; use create_basic_translation_adapter instead")]
    MissingProvider,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// Replaces every `{name}` with `params[name]`. Placeholders without a
/// parameter are left verbatim.
pub fn substitute_params(template: &str, params: &Params) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn resolve(template: &str, params: Option<&Params>) -> String {
    match params {
        Some(params) => substitute_params(template, params),
        None => template.to_string(),
    }
}

/// Adapter that treats configuration strings as display text, optionally
/// backed by an injected catalog.
#[derive(Debug, Clone, Default)]
pub struct BasicTranslator {
    catalog: BTreeMap<String, String>,
}

impl BasicTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: BTreeMap<String, String>) -> Self {
        Self { catalog }
    }
}

impl Translator for BasicTranslator {
    fn translate(&self, key: &str, params: Option<&Params>) -> String {
        let template = self.catalog.get(key).map(String::as_str).unwrap_or(key);
        resolve(template, params)
    }
}

/// Adapter deferring to a host [`TranslationProvider`], falling back to the
/// key for messages the provider does not know.
#[derive(Debug, Clone)]
pub struct HostTranslator<P> {
    provider: P,
}

impl<P: TranslationProvider> HostTranslator<P> {
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: TranslationProvider> Translator for HostTranslator<P> {
    fn translate(&self, key: &str, params: Option<&Params>) -> String {
        match self.provider.lookup(key) {
            Some(template) => resolve(&template, params),
            None => {
                tracing::debug!(key, "translation missing, using key");
                resolve(key, params)
            }
        }
    }
}

pub fn create_basic_translation_adapter() -> BasicTranslator {
    BasicTranslator::new()
}

/// Builds a host-backed adapter. A missing provider is a configuration error
/// reported here rather than at render time.
pub fn create_host_translation_adapter<P: TranslationProvider>(
    provider: Option<P>,
) -> Result<HostTranslator<P>, TranslationError> {
    provider
        .map(|provider| HostTranslator { provider })
        .ok_or(TranslationError::MissingProvider)
}

/// Flattens a nested message document into dotted keys:
/// `{"form": {"title": "Hi"}}` becomes `form.title -> Hi`. Non-string leaves
/// are rendered with their JSON text.
pub fn flatten_messages(messages: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(messages, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(child, path, out);
            }
        }
        Value::String(text) if !prefix.is_empty() => {
            out.insert(prefix, text.clone());
        }
        Value::Null => {}
        other if !prefix.is_empty() => {
            out.insert(prefix, other.to_string());
        }
        _ => {}
    }
}

/// Convenience for building [`Params`] from literal pairs.
pub fn params<K, V, I>(pairs: I) -> Params
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
