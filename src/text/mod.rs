//! Text repositories
//!
//! A text repository turns transient slices of the input into shared
//! `Arc<str>` values. Caching implementations return the same instance
//! for equal text, so names and whitespace that repeat thousands of
//! times in a large document share one allocation.

mod cache;

pub use cache::LimitedSizeCacheTextRepository;

use std::fmt::Debug;
use std::sync::Arc;

use crate::config::TextRepositoryConfig;
use crate::definitions::html::{STANDARD_ATTRIBUTE_NAMES, STANDARD_ELEMENTS};

/// Source of shared text values, usable from many threads at once.
pub trait TextRepository: Send + Sync + Debug {
    /// Text equal to `text`.
    fn get_text(&self, text: &str) -> Arc<str>;

    /// Text equal to `buffer[offset..offset + len]`.
    ///
    /// # Panics
    /// If the range lies outside `buffer`.
    fn get_text_from_buffer(&self, buffer: &[char], offset: usize, len: usize) -> Arc<str>;

    /// Text equal to the concatenation of `fragments`, compared without
    /// building the concatenation first.
    fn get_text_concat(&self, fragments: &[&str]) -> Arc<str>;
}

/// Repository that never caches: every call allocates a new value.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCacheTextRepository;

impl TextRepository for NoCacheTextRepository {
    fn get_text(&self, text: &str) -> Arc<str> {
        Arc::from(text)
    }

    fn get_text_from_buffer(&self, buffer: &[char], offset: usize, len: usize) -> Arc<str> {
        buffer[offset..offset + len].iter().collect::<String>().into()
    }

    fn get_text_concat(&self, fragments: &[&str]) -> Arc<str> {
        fragments.concat().into()
    }
}

/// Longest run of spaces after a newline kept as a seed text.
const MAX_SEED_SPACES: usize = 20;
/// Longest run of tabs after a newline kept as a seed text.
const MAX_SEED_TABS: usize = 10;

/// Builds text repositories from configuration.
pub struct TextRepositories;

impl TextRepositories {
    /// Build the repository described by `config`.
    pub fn create(config: &TextRepositoryConfig) -> Arc<dyn TextRepository> {
        if !config.cache_enabled {
            return Arc::new(NoCacheTextRepository);
        }
        if config.seed_standard_texts {
            Arc::new(LimitedSizeCacheTextRepository::with_unremovable(
                config.max_size_chars(),
                Self::standard_unremovable_texts(),
            ))
        } else {
            Arc::new(LimitedSizeCacheTextRepository::new(config.max_size_chars()))
        }
    }

    /// Texts that appear in nearly every HTML document: standard element
    /// and attribute names plus common indentation runs.
    pub fn standard_unremovable_texts() -> Vec<String> {
        let mut texts: Vec<String> = STANDARD_ELEMENTS
            .iter()
            .map(|(name, _)| name.to_string())
            .chain(STANDARD_ATTRIBUTE_NAMES.iter().map(|name| name.to_string()))
            .collect();
        texts.extend([" ", "\t", "\n", "\r\n"].map(String::from));
        for newline in ["\n", "\r\n"] {
            texts.extend((1..=MAX_SEED_SPACES).map(|n| format!("{newline}{}", " ".repeat(n))));
            texts.extend((1..=MAX_SEED_TABS).map(|n| format!("{newline}{}", "\t".repeat(n))));
        }
        texts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cache_allocates_each_time() {
        let repo = NoCacheTextRepository;
        let a = repo.get_text("div");
        let b = repo.get_text("div");
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(&*repo.get_text_concat(&["a", "b"]), "ab");
    }

    #[test]
    fn test_seeded_repository_keeps_standard_names() {
        let repo = TextRepositories::create(&TextRepositoryConfig::default());
        let div = repo.get_text("div");
        assert!(Arc::ptr_eq(&div, &repo.get_text("div")));
        let indent = repo.get_text("\n    ");
        assert!(Arc::ptr_eq(&indent, &repo.get_text_concat(&["\n", "    "])));
    }

    #[test]
    fn test_disabled_cache() {
        let config = TextRepositoryConfig::default().with_cache_enabled(false);
        let repo = TextRepositories::create(&config);
        assert!(!Arc::ptr_eq(&repo.get_text("x"), &repo.get_text("x")));
    }

    #[test]
    fn test_seed_texts_cover_vocabulary() {
        let texts = TextRepositories::standard_unremovable_texts();
        assert!(texts.iter().any(|t| t == "\n\t\t"));
        assert!(texts.iter().any(|t| t == "textarea"));
        assert!(texts.iter().any(|t| t == "onclick"));
    }
}
