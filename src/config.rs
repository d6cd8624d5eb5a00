//! Parser and cache configuration
//!
//! Plain typed settings with defaults; building one is cheap and every
//! field can be overridden with the `with_*` methods.

/// Default text cache budget: 10 MiB of character storage.
pub const DEFAULT_TEXT_CACHE_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Default hard cap on the number of element/attribute definitions kept
/// by each registry.
pub const DEFAULT_REGISTRY_MAX_SIZE: usize = 1000;

/// Default number of compiled markup selectors kept in the LRU cache.
pub const DEFAULT_SELECTOR_CACHE_SIZE: usize = 256;

/// Markup dialect being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateMode {
    /// HTML: case-insensitive names, void and raw-text elements, optional end tags
    #[default]
    Html,
    /// XML: case-sensitive names, every element is normal
    Xml,
}

impl TemplateMode {
    #[inline]
    pub fn is_html(self) -> bool {
        matches!(self, TemplateMode::Html)
    }

    /// Element and attribute names are case-sensitive in XML only.
    #[inline]
    pub fn default_case_sensitive(self) -> bool {
        !self.is_html()
    }
}

/// What the parser does about missing and mismatched close tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementBalancing {
    /// Report close tags exactly as written, never synthesize events
    NoBalancing,
    /// Auto-close elements whose end tag is implied, report stray close
    /// tags as unmatched
    #[default]
    AutoClose,
}

/// Text repository settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRepositoryConfig {
    /// Intern texts in a bounded cache (otherwise every request allocates)
    pub cache_enabled: bool,
    /// Cache budget in bytes; characters are accounted at two bytes each
    pub max_size_bytes: usize,
    /// Pre-load standard element/attribute names and whitespace runs as
    /// entries that are never evicted
    pub seed_standard_texts: bool,
}

impl Default for TextRepositoryConfig {
    fn default() -> Self {
        TextRepositoryConfig {
            cache_enabled: true,
            max_size_bytes: DEFAULT_TEXT_CACHE_MAX_BYTES,
            seed_standard_texts: true,
        }
    }
}

impl TextRepositoryConfig {
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_max_size_bytes(mut self, max_size_bytes: usize) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_seed_standard_texts(mut self, seed: bool) -> Self {
        self.seed_standard_texts = seed;
        self
    }

    /// Budget expressed in characters.
    #[inline]
    pub fn max_size_chars(&self) -> usize {
        self.max_size_bytes / 2
    }
}

/// Everything a [`MarkupParser`](crate::parser::MarkupParser) needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    pub mode: TemplateMode,
    /// Compare element/attribute names respecting case
    pub case_sensitive: bool,
    pub element_balancing: ElementBalancing,
    /// Handle `<!--/*/ ... /*/-->` and `<!--/* ... */-->` comment blocks
    pub comment_blocks: bool,
    /// Hard cap for each definition registry
    pub registry_max_size: usize,
    /// Capacity of the compiled selector cache
    pub selector_cache_size: usize,
    pub text_repository: TextRepositoryConfig,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig::html()
    }
}

impl ParseConfig {
    /// Defaults for a mode: case sensitivity follows the mode.
    pub fn for_mode(mode: TemplateMode) -> Self {
        ParseConfig {
            mode,
            case_sensitive: mode.default_case_sensitive(),
            element_balancing: ElementBalancing::AutoClose,
            comment_blocks: true,
            registry_max_size: DEFAULT_REGISTRY_MAX_SIZE,
            selector_cache_size: DEFAULT_SELECTOR_CACHE_SIZE,
            text_repository: TextRepositoryConfig::default(),
        }
    }

    pub fn html() -> Self {
        Self::for_mode(TemplateMode::Html)
    }

    pub fn xml() -> Self {
        Self::for_mode(TemplateMode::Xml)
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_element_balancing(mut self, balancing: ElementBalancing) -> Self {
        self.element_balancing = balancing;
        self
    }

    pub fn with_comment_blocks(mut self, enabled: bool) -> Self {
        self.comment_blocks = enabled;
        self
    }

    pub fn with_registry_max_size(mut self, max_size: usize) -> Self {
        self.registry_max_size = max_size;
        self
    }

    pub fn with_selector_cache_size(mut self, size: usize) -> Self {
        self.selector_cache_size = size;
        self
    }

    pub fn with_text_repository(mut self, config: TextRepositoryConfig) -> Self {
        self.text_repository = config;
        self
    }
}
