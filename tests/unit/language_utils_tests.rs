/*!
 * Tests for language tag utilities
 */

use stutter::language_utils::{
    LanguageResolver, base_language, canonical_tag, effective_language_tag, get_language_name,
    is_space_delimited, system_locale_tag_from,
};

/// Test canonical casing of tags
#[test]
fn test_canonical_tag_withMixedCase_shouldCanonicalize() {
    assert_eq!(canonical_tag("EN_us").as_deref(), Some("en-US"));
    assert_eq!(canonical_tag("zh_hant_tw").as_deref(), Some("zh-Hant-TW"));
    assert_eq!(canonical_tag("es-419").as_deref(), Some("es-419"));
    assert_eq!(canonical_tag("und"), None);
    assert_eq!(canonical_tag(""), None);
}

/// Test that all spellings of a language share a base
#[test]
fn test_base_language_withVariants_shouldAgree() {
    for tag in ["de", "de-DE", "de_AT", "ger", "deu"] {
        assert_eq!(base_language(tag).as_deref(), Some("de"), "tag {}", tag);
    }
}

/// Test which languages are read without spaces
#[test]
fn test_is_space_delimited_shouldRecognizeContinuousScripts() {
    assert!(!is_space_delimited("ja-JP"));
    assert!(!is_space_delimited("zh-Hans"));
    assert!(!is_space_delimited("th"));
    assert!(is_space_delimited("en"));
    assert!(is_space_delimited("ar"));
    assert!(is_space_delimited(""));
}

/// Test locale variable precedence and suffix stripping
#[test]
fn test_system_locale_tag_from_withPosixVariables_shouldPreferLcAll() {
    let env = |key: &str| match key {
        "LC_ALL" => Some("C".to_string()),
        "LC_MESSAGES" => Some("de_AT.UTF-8@euro".to_string()),
        "LANG" => Some("en_US.UTF-8".to_string()),
        _ => None,
    };
    assert_eq!(system_locale_tag_from(env).as_deref(), Some("de-AT"));
    assert_eq!(system_locale_tag_from(|_| None), None);
}

/// Test that explicit tags win over the locale
#[test]
fn test_effective_language_tag_withExplicitTag_shouldCanonicalize() {
    assert_eq!(effective_language_tag(Some("fr_ca")), "fr-CA");
    assert!(!effective_language_tag(None).is_empty());
}

/// Test English language names
#[test]
fn test_get_language_name_shouldUseIsoNames() {
    assert_eq!(get_language_name("en-GB").as_deref(), Some("English"));
    assert_eq!(get_language_name("ger").as_deref(), Some("German"));
    assert_eq!(get_language_name("qq"), None);
}

/// Test resolution priority
#[test]
fn test_language_resolver_withCandidates_shouldFollowPriority() {
    let resolver = LanguageResolver::new(true);
    assert_eq!(
        resolver.resolve(Some("it"), Some("en"), Some("de-DE")).as_deref(),
        Some("it")
    );
    assert_eq!(
        resolver.resolve(Some(" "), Some("en"), Some("de-DE")).as_deref(),
        Some("en")
    );
    assert_eq!(resolver.resolve(None, None, Some("de_de")).as_deref(), Some("de-DE"));
    assert_eq!(resolver.resolve(None, None, None), None);

    let resolver = LanguageResolver::new(false);
    assert_eq!(
        resolver.resolve(Some("it"), None, Some("de-DE")).as_deref(),
        Some("de-DE")
    );
}
