use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A canonical culture tag such as "en-US" or "de-DE".
///
/// Parsing goes through `unic_langid`, which canonicalizes letter case, so
/// two cultures parsed from differently-cased tags compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Culture {
    id: LanguageIdentifier,
    name: String,
}

impl Culture {
    /// The canonical tag, e.g. "en-US".
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for Culture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: LanguageIdentifier = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid culture tag: {}", s))?;
        let name = id.to_string();
        Ok(Culture { id, name })
    }
}

/// The universe of cultures the application accepts, loaded once at startup.
pub struct CultureSet {
    default: Culture,
    supported: Vec<Culture>,
}

impl CultureSet {
    /// Build the set from the configured default and ordered supported list.
    /// The default culture is always part of the universe, whether or not
    /// the supported list names it.
    pub fn new(default: Culture, supported: Vec<Culture>) -> Self {
        let mut supported = supported;
        if !supported.contains(&default) {
            supported.insert(0, default.clone());
        }
        Self { default, supported }
    }

    pub fn default_culture(&self) -> &Culture {
        &self.default
    }

    pub fn supported(&self) -> &[Culture] {
        &self.supported
    }

    /// Resolve an Accept-Language style preference list to a supported
    /// culture.
    ///
    /// Only the first comma-separated entry is considered; its quality
    /// weight, if any, is dropped rather than negotiated. Returns `None`
    /// for empty, malformed, or unsupported tags so the caller stays on
    /// whatever culture is already in effect.
    pub fn resolve(&self, header: &str) -> Option<Culture> {
        let first = header.split(',').next().unwrap_or("").trim();
        let first = first.split(';').next().unwrap_or("").trim();

        let tag = expand_bare_language(first);
        if tag.is_empty() {
            return None;
        }

        let id: LanguageIdentifier = tag.parse().ok()?;
        self.supported.iter().find(|culture| culture.id == id).cloned()
    }
}

/// Widen a bare two-letter language code by duplicating the uppercased code
/// as the region: "de" becomes "de-DE", "en" becomes "en-EN" — even though
/// en-EN is not a real tag. Kept as-is so existing clients keep landing on
/// the same resource files.
fn expand_bare_language(tag: &str) -> Cow<'_, str> {
    if tag.len() == 2 {
        Cow::Owned(format!("{}-{}", tag, tag.to_uppercase()))
    } else {
        Cow::Borrowed(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn culture(tag: &str) -> Culture {
        tag.parse().unwrap()
    }

    fn test_set() -> CultureSet {
        CultureSet::new(
            culture("en-US"),
            vec![culture("en-US"), culture("de-DE"), culture("tr-TR")],
        )
    }

    #[test]
    fn expands_bare_language_codes_literally() {
        assert_eq!(expand_bare_language("de"), "de-DE");
        assert_eq!(expand_bare_language("fr"), "fr-FR");
        assert_eq!(expand_bare_language("en"), "en-EN");
        assert_eq!(expand_bare_language("en-US"), "en-US");
        assert_eq!(expand_bare_language(""), "");
    }

    #[test]
    fn resolves_exact_supported_tag() {
        let resolved = test_set().resolve("de-DE").unwrap();
        assert_eq!(resolved.name(), "de-DE");
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let set = test_set();
        assert_eq!(set.resolve("EN-us").unwrap().name(), "en-US");
        assert_eq!(set.resolve("TR-TR").unwrap().name(), "tr-TR");
    }

    #[test]
    fn takes_only_the_first_entry() {
        let set = test_set();
        assert_eq!(set.resolve("de-DE,en-US;q=0.8").unwrap().name(), "de-DE");
        // The second entry is never consulted, even when the first fails.
        assert!(set.resolve("xx-XX,en-US").is_none());
    }

    #[test]
    fn strips_quality_weight_from_first_entry() {
        let set = test_set();
        assert_eq!(set.resolve("en-US;q=0.9,de-DE").unwrap().name(), "en-US");
    }

    #[test]
    fn expanded_bare_code_must_still_be_supported() {
        let set = test_set();
        // "de" -> "de-DE", which is supported.
        assert_eq!(set.resolve("de,en;q=0.5").unwrap().name(), "de-DE");
        // "en" -> "en-EN", which is not.
        assert!(set.resolve("en,de;q=0.5").is_none());
    }

    #[test]
    fn rejects_unknown_and_malformed_tags() {
        let set = test_set();
        assert!(set.resolve("xx-XX").is_none());
        assert!(set.resolve("not a tag").is_none());
        assert!(set.resolve("").is_none());
        assert!(set.resolve("   ").is_none());
    }

    #[test]
    fn default_is_always_part_of_the_universe() {
        let set = CultureSet::new(culture("en-US"), vec![culture("de-DE")]);
        assert_eq!(set.resolve("en-US").unwrap().name(), "en-US");
        assert_eq!(set.supported().len(), 2);
    }
}
