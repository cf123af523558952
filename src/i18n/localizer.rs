use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, Visitor};
use std::fmt::{self, Display};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::i18n::cache::StringCache;
use crate::i18n::culture::Culture;

#[derive(Debug, Error)]
pub enum LocalizeError {
    #[error("No resource file for culture {culture} at {path}")]
    MissingResource { culture: String, path: PathBuf },

    #[error("Failed to read resource file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed resource file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String lookup over per-culture JSON resource files.
///
/// One flat document per culture at `<resources_dir>/<basename>.<tag>.json`.
/// Lookups go cache first, then a single-pass scan of the document; a
/// culture without a resource file falls back to the default culture.
pub struct JsonLocalizer {
    resources_dir: PathBuf,
    basename: String,
    default_culture: Culture,
    cache: Arc<dyn StringCache>,
    file_scans: AtomicU64,
}

impl JsonLocalizer {
    pub fn new(
        resources_dir: impl Into<PathBuf>,
        basename: impl Into<String>,
        default_culture: Culture,
        cache: Arc<dyn StringCache>,
    ) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            basename: basename.into(),
            default_culture,
            cache,
            file_scans: AtomicU64::new(0),
        }
    }

    pub fn resource_path(&self, culture: &Culture) -> PathBuf {
        self.resources_dir
            .join(format!("{}.{}.json", self.basename, culture.name()))
    }

    /// Number of resource-file scans performed since startup. Cache hits do
    /// not scan, so this directly reflects cache effectiveness.
    pub fn file_scans(&self) -> u64 {
        self.file_scans.load(Ordering::Relaxed)
    }

    /// Look `key` up for `active`, falling back to the default culture when
    /// `active` has no resource file. The fallback is written through to
    /// `active` so later lookups in the same request skip the retry.
    ///
    /// `Ok(None)` means the key (or both resource files) is absent; `Err`
    /// is reserved for IO and parse failures.
    pub fn get_string(
        &self,
        active: &mut Culture,
        key: &str,
    ) -> Result<Option<String>, LocalizeError> {
        let mut path = self.resource_path(active);
        if !path.exists() {
            *active = self.default_culture.clone();
            path = self.resource_path(active);
            if !path.exists() {
                return Ok(None);
            }
        }

        let cache_key = format!("locale_{}_{}", active.name(), key);
        match self.cache.get(&cache_key) {
            Ok(Some(value)) if !value.is_empty() => return Ok(Some(value)),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, key = %cache_key, "cache read failed, scanning resource file");
            }
        }

        let result = self.scan_for_key(&path, key)?;
        if let Some(value) = &result {
            if !value.is_empty() {
                if let Err(err) = self.cache.set(&cache_key, value) {
                    tracing::warn!(error = %err, key = %cache_key, "cache write failed, value not cached");
                }
            }
        }
        Ok(result)
    }

    /// Look `key` up and apply positional substitution ("{0}", "{1}", ...)
    /// with the supplied arguments. An unresolved key comes back verbatim
    /// as the not-found sentinel.
    pub fn get_formatted(
        &self,
        active: &mut Culture,
        key: &str,
        args: &[&dyn Display],
    ) -> Result<String, LocalizeError> {
        match self.get_string(active, key)? {
            Some(template) => Ok(format_positional(&template, args)),
            None => Ok(key.to_string()),
        }
    }

    /// Every entry of `active`'s resource document, in document order.
    ///
    /// Unlike single-key lookup there is no default-culture fallback here,
    /// and the cache is neither consulted nor populated.
    pub fn get_all_strings(
        &self,
        active: &Culture,
    ) -> Result<Vec<(String, String)>, LocalizeError> {
        let path = self.resource_path(active);
        if !path.exists() {
            return Err(LocalizeError::MissingResource {
                culture: active.name().to_string(),
                path,
            });
        }

        self.file_scans.fetch_add(1, Ordering::Relaxed);
        let file = File::open(&path).map_err(|source| LocalizeError::Io {
            path: path.clone(),
            source,
        })?;
        let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));
        let entries = AllEntries
            .deserialize(&mut deserializer)
            .map_err(|source| LocalizeError::Parse {
                path: path.clone(),
                source,
            })?;
        deserializer
            .end()
            .map_err(|source| LocalizeError::Parse { path, source })?;
        Ok(entries)
    }

    fn scan_for_key(&self, path: &Path, key: &str) -> Result<Option<String>, LocalizeError> {
        if key.is_empty() {
            return Ok(None);
        }

        self.file_scans.fetch_add(1, Ordering::Relaxed);
        let file = File::open(path).map_err(|source| LocalizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));
        let value = FirstValueFor(key)
            .deserialize(&mut deserializer)
            .map_err(|source| LocalizeError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        deserializer.end().map_err(|source| LocalizeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(value)
    }
}

/// Single-pass scan of a flat resource document: walks the top-level map in
/// order and keeps the value of the first entry whose key matches exactly.
/// Remaining entries are drained without buffering.
struct FirstValueFor<'a>(&'a str);

impl<'de> DeserializeSeed<'de> for FirstValueFor<'_> {
    type Value = Option<String>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for FirstValueFor<'_> {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a flat object of string values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        while let Some(entry_key) = map.next_key::<String>()? {
            if found.is_none() && entry_key == self.0 {
                found = Some(map.next_value::<String>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(found)
    }
}

/// Collects every (key, value) pair of a flat document, preserving document
/// order and duplicates.
struct AllEntries;

impl<'de> DeserializeSeed<'de> for AllEntries {
    type Value = Vec<(String, String)>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for AllEntries {
    type Value = Vec<(String, String)>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a flat object of string values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            entries.push((key, value));
        }
        Ok(entries)
    }
}

/// Positional template substitution: "{0}", "{1}", ... are replaced by the
/// corresponding argument; "{{" and "}}" escape literal braces. Placeholders
/// without a matching argument are left untouched.
fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut index = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        index.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if !index.is_empty() && chars.peek() == Some(&'}') {
                    chars.next();
                    match index.parse::<usize>().ok().and_then(|i| args.get(i)) {
                        Some(arg) => out.push_str(&arg.to_string()),
                        None => {
                            out.push('{');
                            out.push_str(&index);
                            out.push('}');
                        }
                    }
                } else {
                    out.push('{');
                    out.push_str(&index);
                }
            }
            other => out.push(other),
        }
    }

    out
}
