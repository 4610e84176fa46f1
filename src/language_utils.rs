use isolang::Language;

/// Language utilities for BCP-47 style language tags
///
/// Tags arrive from documents, user settings and the process environment in
/// many shapes (`en`, `en_US`, `EN-us`, `en-US-u-va-posix`, `eng`). Everything
/// downstream only needs two things: the lower-case primary language subtag
/// (for pattern lookup and script handling) and a canonical tag for display.

/// Base languages written without spaces between words
const NON_SPACE_DELIMITED: &[&str] = &["ja", "zh", "th", "lo", "km", "my"];

/// Fallback when neither a tag nor a usable system locale is available
pub const DEFAULT_LANGUAGE_TAG: &str = "en";

/// Map ISO 639-2/B bibliographic codes to their ISO 639-2/T form
fn part2b_to_part2t(code: &str) -> &str {
    match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => code,
    }
}

/// Split a raw tag into subtags, accepting `_` as a separator
fn subtags(tag: &str) -> Vec<String> {
    tag.trim()
        .replace('_', "-")
        .split('-')
        .map(str::to_string)
        .collect()
}

/// Validate and lower-case a primary language subtag
fn primary_language(subtag: &str) -> Option<String> {
    let len = subtag.len();
    if !(2..=8).contains(&len) || len == 4 || !subtag.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let lower = subtag.to_ascii_lowercase();
    if lower == "und" {
        return None;
    }
    Some(lower)
}

/// Extract the base language of a tag, e.g. `en-US-u-va-posix` -> `en`
///
/// Three-letter ISO 639-2 codes that have a two-letter equivalent are folded
/// to it (`eng` -> `en`, `ger` -> `de`) so every spelling of a language shares
/// one cache entry. Returns `None` for blank, malformed or `und` tags.
pub fn base_language(tag: &str) -> Option<String> {
    let parts = subtags(tag);
    let primary = primary_language(parts.first()?)?;

    if primary.len() == 3 {
        let part2t = part2b_to_part2t(&primary);
        if let Some(code) = Language::from_639_3(part2t).and_then(|lang| lang.to_639_1()) {
            return Some(code.to_string());
        }
    }

    Some(primary)
}

/// Canonicalize a tag's casing, e.g. `zh_hant_tw` -> `zh-Hant-TW`
///
/// Subtags after the first ill-formed one are dropped. Extension and
/// private-use sequences (after a singleton) are kept lower-case.
pub fn canonical_tag(tag: &str) -> Option<String> {
    let parts = subtags(tag);
    let mut canonical = vec![primary_language(parts.first()?)?];
    let mut in_extension = false;

    for part in parts.iter().skip(1) {
        if part.is_empty() || part.len() > 8 || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            break;
        }
        if in_extension {
            canonical.push(part.to_ascii_lowercase());
            continue;
        }
        let is_alpha = part.chars().all(|c| c.is_ascii_alphabetic());
        let is_digit = part.chars().all(|c| c.is_ascii_digit());
        let formatted = match part.len() {
            1 => {
                in_extension = true;
                part.to_ascii_lowercase()
            }
            2 if is_alpha => part.to_ascii_uppercase(),
            3 if is_digit => part.clone(),
            4 if is_alpha => {
                let lower = part.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => lower,
                }
            }
            _ => part.to_ascii_lowercase(),
        };
        canonical.push(formatted);
    }

    Some(canonical.join("-"))
}

/// Whether the language separates words with spaces
pub fn is_space_delimited(tag: &str) -> bool {
    match base_language(tag) {
        Some(base) => !NON_SPACE_DELIMITED.contains(&base.as_str()),
        None => true,
    }
}

/// Derive a language tag from POSIX locale variables, looked up via `lookup`
///
/// `LC_ALL` wins over `LC_MESSAGES` which wins over `LANG`. Encoding and
/// modifier suffixes are stripped (`de_AT.UTF-8@euro` -> `de-AT`); the `C` and
/// `POSIX` locales carry no language and are skipped.
pub fn system_locale_tag_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| lookup(key))
        .find_map(|value| {
            let locale = value.split(['.', '@']).next().unwrap_or_default();
            if locale.is_empty() || locale == "C" || locale == "POSIX" {
                return None;
            }
            canonical_tag(locale)
        })
}

/// The process locale as a language tag, defaulting to `en`
pub fn system_locale_tag() -> String {
    system_locale_tag_from(|key| std::env::var(key).ok())
        .unwrap_or_else(|| DEFAULT_LANGUAGE_TAG.to_string())
}

/// Resolve the tag text should be processed under
///
/// A blank or invalid tag means "auto" and falls back to the system locale.
pub fn effective_language_tag(tag: Option<&str>) -> String {
    tag.and_then(canonical_tag)
        .unwrap_or_else(system_locale_tag)
}

/// Get the English language name for a tag, if the base language is known
pub fn get_language_name(tag: &str) -> Option<String> {
    let base = base_language(tag)?;
    let language = match base.len() {
        2 => Language::from_639_1(&base),
        _ => Language::from_639_3(part2b_to_part2t(&base)),
    }?;
    Some(language.to_name().to_string())
}

/// Picks the language a text should be read in
///
/// Candidates are tried in priority order: the language declared by the
/// document, the user's configured default, then the device locale.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    /// Whether a language declared by the document itself is trusted
    auto_detect_from_document: bool,
}

impl LanguageResolver {
    pub fn new(auto_detect_from_document: bool) -> Self {
        Self { auto_detect_from_document }
    }

    /// Return the first candidate that names a language, canonicalized
    pub fn resolve(
        &self,
        document_tag: Option<&str>,
        user_default: Option<&str>,
        device_locale: Option<&str>,
    ) -> Option<String> {
        let document_tag = document_tag.filter(|_| self.auto_detect_from_document);
        [document_tag, user_default, device_locale]
            .into_iter()
            .flatten()
            .find_map(canonical_tag)
    }
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::new(true)
    }
}
