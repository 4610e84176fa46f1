/*!
 * Tests for hyphenation pattern loading from disk
 */

use anyhow::Result;
use std::sync::Arc;
use stutter::hyphenation::{DirectoryPatterns, LayeredPatterns, PatternHyphenator, PatternRepository};

use crate::common;

/// Test that a pattern directory adds a language the binary does not bundle
#[test]
fn test_repository_withPatternDirectory_shouldLoadExtraLanguage() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_patterns(temp_dir.path())?;

    let repository = PatternRepository::new(Box::new(LayeredPatterns::with_directory(Some(
        temp_dir.path().to_path_buf(),
    ))));

    let set = repository.load(Some("it-IT")).expect("Italian patterns should load");
    assert_eq!(set.min_left(), 2);
    assert_eq!(set.min_right(), 2);
    assert_eq!(set.hyphenation_points("tavolino", Some("it")), vec![2, 4, 6]);

    // Bundled languages are still found behind the directory
    assert!(repository.load(Some("en")).is_some());
    Ok(())
}

/// Test that the directory alone has no fallback
#[test]
fn test_directory_patterns_withMissingFile_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let repository = PatternRepository::new(Box::new(DirectoryPatterns::new(temp_dir.path())));

    assert!(repository.load(Some("en")).is_none());
    assert!(repository.load(Some("en-GB")).is_none());
    let (hits, misses, _) = repository.stats();
    assert_eq!((hits, misses), (1, 1));
    Ok(())
}

/// Test that loaded patterns drive the splitter
#[test]
fn test_hyphenator_withDirectoryPatterns_shouldSplitAtSyllables() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_patterns(temp_dir.path())?;
    let repository = PatternRepository::new(Box::new(DirectoryPatterns::new(temp_dir.path())));
    let hyphenator = PatternHyphenator::new(Arc::new(repository));

    assert!(hyphenator.hyphenator_for(Some("it")).is_pattern_based());
    assert_eq!(hyphenator.split("tavolino", Some("it"), 5), vec!["tavo", "lino"]);
    assert_eq!(hyphenator.split("tavolino", Some("xx"), 5), vec!["tavol", "ino"]);
    Ok(())
}

/// Test that a file without patterns counts as unsupported
#[test]
fn test_repository_withEmptyPatternFile_shouldFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "hyph-es.tex", "% nothing here\n\\patterns{\n}\n")?;
    let repository = PatternRepository::new(Box::new(DirectoryPatterns::new(temp_dir.path())));

    assert!(repository.load(Some("es")).is_none());
    assert_eq!(repository.len(), 1);
    Ok(())
}
