//! Locale negotiation.
//!
//! Turns client hints (an explicit `lang` query parameter and the
//! `Accept-Language` header) into a canonical language tag such as `en-US`
//! plus a two-letter region code used for region-specific upstream data.
//!
//! Resolution never fails: anything that does not parse as a language tag
//! degrades to the configured fallback.

use serde::{Deserialize, Serialize};

use crate::config::LocaleConfig;

/// Language used when the client supplies nothing usable.
pub const DEFAULT_LANGUAGE: &str = "en-US";
/// Region used when no region can be derived from the language tag.
pub const DEFAULT_REGION: &str = "US";

/// A language tag that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unresolvable language tag '{tag}': {reason}")]
pub struct LocaleUnresolvable {
    pub tag: String,
    pub reason: &'static str,
}

impl LocaleUnresolvable {
    fn new(tag: &str, reason: &'static str) -> Self {
        Self {
            tag: tag.to_string(),
            reason,
        }
    }
}

/// A resolved language tag and its region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// Canonical language tag, e.g. `en-US`.
    pub language: String,
    /// Upper-case two-letter region code, e.g. `US`.
    pub region: String,
}

impl Locale {
    /// Resolve from client hints using the built-in `en-US` / `US` fallbacks.
    pub fn resolve(explicit: Option<&str>, accept_language: Option<&str>) -> Self {
        Self::resolve_with(explicit, accept_language, &LocaleConfig::default())
    }

    /// Resolve from client hints using configured fallbacks.
    pub fn resolve_with(
        explicit: Option<&str>,
        accept_language: Option<&str>,
        fallbacks: &LocaleConfig,
    ) -> Self {
        let language = resolve_language(explicit, accept_language, &fallbacks.default_language);
        let region = resolve_region(&language, &fallbacks.default_region);
        Self { language, region }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.into(),
            region: DEFAULT_REGION.into(),
        }
    }
}

/// Pick the language tag to use for upstream requests.
///
/// `explicit` wins when non-blank; otherwise the first entry of the
/// `Accept-Language` header (quality parameters stripped) is used; otherwise
/// `fallback`. The chosen token is returned in canonical case, or `fallback`
/// if it is not a valid tag.
pub fn resolve_language(explicit: Option<&str>, accept_language: Option<&str>, fallback: &str) -> String {
    let candidate = explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| accept_language.and_then(first_accept_token));

    let Some(candidate) = candidate else {
        return fallback.to_string();
    };

    match canonicalize(candidate) {
        Ok(tag) => tag,
        Err(e) => {
            tracing::debug!(error = %e, fallback, "Falling back to default language");
            fallback.to_string()
        }
    }
}

/// Derive the two-letter region for a language tag.
///
/// A two-letter region subtag wins (`en-GB` → `GB`). Without one, languages
/// with a single primary territory map through a static table (`ja` → `JP`).
/// Anything else yields `fallback`.
pub fn resolve_region(language_tag: &str, fallback: &str) -> String {
    let mut subtags = language_tag.split('-').filter(|s| !s.is_empty());
    let Some(language) = subtags.next() else {
        return fallback.to_string();
    };

    if let Some(region) = subtags.find(|s| s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic())) {
        return region.to_ascii_uppercase();
    }

    match primary_territory(&language.to_ascii_lowercase()) {
        Some(region) => region.to_string(),
        None => fallback.to_string(),
    }
}

/// First language range of an `Accept-Language` value, e.g.
/// `"en-US,en;q=0.9"` → `"en-US"`.
fn first_accept_token(header: &str) -> Option<&str> {
    header
        .split(',')
        .next()
        .and_then(|range| range.split(';').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Validate a BCP 47 style tag (language, optional script, optional region,
/// optional variants) and return it in canonical case.
pub fn canonicalize(tag: &str) -> Result<String, LocaleUnresolvable> {
    let mut subtags = tag.trim().split('-');

    let language = subtags.next().unwrap_or_default();
    let len = language.len();
    if !((2..=3).contains(&len) || (5..=8).contains(&len))
        || !language.bytes().all(|b| b.is_ascii_alphabetic())
    {
        return Err(LocaleUnresolvable::new(tag, "invalid primary language subtag"));
    }

    let mut out = language.to_ascii_lowercase();
    // 0 = after language, 1 = after script, 2 = after region, 3 = in variants
    let mut stage = 0u8;

    for subtag in subtags {
        let len = subtag.len();
        let alpha = subtag.bytes().all(|b| b.is_ascii_alphabetic());
        let digit = subtag.bytes().all(|b| b.is_ascii_digit());
        let alnum = subtag.bytes().all(|b| b.is_ascii_alphanumeric());

        out.push('-');
        if stage < 1 && len == 4 && alpha {
            let mut chars = subtag.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(&chars.as_str().to_ascii_lowercase());
            }
            stage = 1;
        } else if stage < 2 && ((len == 2 && alpha) || (len == 3 && digit)) {
            out.push_str(&subtag.to_ascii_uppercase());
            stage = 2;
        } else if alnum
            && ((5..=8).contains(&len)
                || (len == 4 && subtag.as_bytes()[0].is_ascii_digit()))
        {
            out.push_str(&subtag.to_ascii_lowercase());
            stage = 3;
        } else {
            return Err(LocaleUnresolvable::new(tag, "unexpected subtag"));
        }
    }

    Ok(out)
}

/// Languages whose audience is concentrated in one territory. Languages with
/// several large markets (en, es, pt, ar, zh, ...) are deliberately absent.
fn primary_territory(language: &str) -> Option<&'static str> {
    let region = match language {
        "bg" => "BG",
        "cs" => "CZ",
        "da" => "DK",
        "de" => "DE",
        "el" => "GR",
        "et" => "EE",
        "fa" => "IR",
        "fi" => "FI",
        "fr" => "FR",
        "he" => "IL",
        "hi" => "IN",
        "hr" => "HR",
        "hu" => "HU",
        "id" => "ID",
        "is" => "IS",
        "it" => "IT",
        "ja" => "JP",
        "ka" => "GE",
        "ko" => "KR",
        "lt" => "LT",
        "lv" => "LV",
        "ms" => "MY",
        "nb" | "nn" | "no" => "NO",
        "nl" => "NL",
        "pl" => "PL",
        "ro" => "RO",
        "ru" => "RU",
        "sk" => "SK",
        "sl" => "SI",
        "sv" => "SE",
        "th" => "TH",
        "tr" => "TR",
        "uk" => "UA",
        "vi" => "VN",
        _ => return None,
    };
    Some(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accept_header_first_range() {
        assert_eq!(resolve_language(None, Some("en-US,en;q=0.9"), "en-US"), "en-US");
        assert_eq!(resolve_language(None, Some("de-DE;q=0.8, fr"), "en-US"), "de-DE");
    }

    #[test]
    fn explicit_wins_over_header() {
        assert_eq!(resolve_language(Some("fr-FR"), Some("de-DE"), "en-US"), "fr-FR");
        assert_eq!(resolve_language(Some("fr-FR"), None, "en-US"), "fr-FR");
    }

    #[test]
    fn nothing_supplied_uses_fallback() {
        assert_eq!(resolve_language(None, None, "en-US"), "en-US");
    }

    #[test]
    fn blank_explicit_defers_to_header() {
        assert_eq!(resolve_language(Some("  "), Some("it-IT"), "en-US"), "it-IT");
    }

    #[test]
    fn invalid_explicit_uses_fallback() {
        assert_eq!(resolve_language(Some("not a tag"), Some("de-DE"), "en-US"), "en-US");
        assert_eq!(resolve_language(None, Some("*"), "en-US"), "en-US");
        assert_eq!(resolve_language(None, Some(",en"), "en-US"), "en-US");
    }

    #[test]
    fn canonical_case() {
        assert_eq!(resolve_language(Some("EN-us"), None, "en-US"), "en-US");
        assert_eq!(canonicalize("zh-hant-tw").unwrap(), "zh-Hant-TW");
        assert_eq!(canonicalize("es-419").unwrap(), "es-419");
        assert_eq!(canonicalize("de-CH-1996").unwrap(), "de-CH-1996");
    }

    #[test]
    fn canonicalize_rejects_garbage() {
        assert!(canonicalize("").is_err());
        assert!(canonicalize("e").is_err());
        assert!(canonicalize("en-").is_err());
        assert!(canonicalize("en-US-US").is_err());
        assert!(canonicalize("en_US").is_err());
        assert!(canonicalize("12-US").is_err());
    }

    #[test]
    fn region_from_subtag() {
        assert_eq!(resolve_region("en-US", "US"), "US");
        assert_eq!(resolve_region("en-gb", "US"), "GB");
        assert_eq!(resolve_region("zh-Hant-TW", "US"), "TW");
    }

    #[test]
    fn region_without_subtag_or_table_match_falls_back() {
        assert_eq!(resolve_region("en", "US"), "US");
        assert_eq!(resolve_region("en", "CA"), "CA");
        assert_eq!(resolve_region("es-419", "MX"), "MX");
        assert_eq!(resolve_region("", "US"), "US");
    }

    #[test]
    fn region_from_table() {
        assert_eq!(resolve_region("ja", "US"), "JP");
        assert_eq!(resolve_region("SV", "US"), "SE");
    }

    #[test]
    fn locale_resolve_composes() {
        let locale = Locale::resolve(None, Some("pt-BR,pt;q=0.9"));
        assert_eq!(locale.language, "pt-BR");
        assert_eq!(locale.region, "BR");

        let locale = Locale::resolve(Some("ko"), None);
        assert_eq!(locale.language, "ko");
        assert_eq!(locale.region, "KR");

        assert_eq!(Locale::resolve(None, None), Locale::default());
    }

    #[test]
    fn locale_uses_configured_fallbacks() {
        let fallbacks = LocaleConfig {
            default_language: "en-GB".into(),
            default_region: "GB".into(),
        };
        let locale = Locale::resolve_with(Some("???"), None, &fallbacks);
        assert_eq!(locale.language, "en-GB");
        assert_eq!(locale.region, "GB");
    }

    proptest! {
        #[test]
        fn resolution_is_deterministic(explicit in proptest::option::of(".{0,16}"), header in proptest::option::of(".{0,32}")) {
            let a = Locale::resolve(explicit.as_deref(), header.as_deref());
            let b = Locale::resolve(explicit.as_deref(), header.as_deref());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn region_is_two_uppercase_letters(tag in "[a-zA-Z]{2,3}(-[a-zA-Z]{2})?") {
            let region = resolve_region(&tag, "US");
            prop_assert_eq!(region.len(), 2);
            prop_assert!(region.bytes().all(|b| b.is_ascii_uppercase()));
        }

        #[test]
        fn resolved_language_is_valid_or_fallback(input in ".{0,24}") {
            let tag = resolve_language(Some(&input), None, "en-US");
            prop_assert!(tag == "en-US" || canonicalize(&tag).as_deref() == Ok(tag.as_str()));
        }
    }
}
