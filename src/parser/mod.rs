//! Markup parser
//!
//! [`MarkupParser`] is the entry point: it turns a document into the
//! ordered event stream described in [`crate::sax`].
//!
//! A parser holds only configuration and shared resources, so one
//! instance can parse any number of documents, from any number of
//! threads at once. Everything that belongs to a single document lives in
//! a session created per call.
//!
//! ## Processing order per token
//!
//! 1. prototype-only comment blocks are unwrapped and parsed in place
//! 2. element and attribute names are resolved to shared definitions
//! 3. implied and explicit element ends are balanced against the stack
//!    of open elements
//! 4. the events run through the pipeline stages (parser-level comment
//!    removal) to the caller's handler
//! 5. handler directives are applied to the tokenizer

mod balance;
pub mod comments;
pub mod injection;
mod session;

use std::io::Read;
use std::sync::Arc;

use crate::config::ParseConfig;
use crate::decoupled::{DecoupledLogicInjector, DecoupledTemplateLogic};
use crate::definitions::{AttributeDefinitions, ElementDefinitions};
use crate::error::Result;
use crate::reader::read_document;
use crate::sax::{CollectedEvent, EventCollector, MarkupHandler, MarkupStage};
use crate::select::SelectorCache;
use crate::text::{TextRepositories, TextRepository};

pub use comments::ParserLevelCommentFilter;
pub use injection::{ElementStart, InjectionHook};
use session::ParseSession;

/// Registries and caches shared by every parse of a parser.
///
/// Cloning is cheap: clones share the same underlying resources, so
/// parsers built from clones intern into the same repositories.
#[derive(Debug, Clone)]
pub struct ParserResources {
    pub elements: Arc<ElementDefinitions>,
    pub attributes: Arc<AttributeDefinitions>,
    pub texts: Arc<dyn TextRepository>,
    pub selectors: Arc<SelectorCache>,
}

impl ParserResources {
    pub fn new(config: &ParseConfig) -> Self {
        ParserResources {
            elements: Arc::new(ElementDefinitions::with_max_size(config.registry_max_size)),
            attributes: Arc::new(AttributeDefinitions::with_max_size(config.registry_max_size)),
            texts: TextRepositories::create(&config.text_repository),
            selectors: Arc::new(SelectorCache::new(config.selector_cache_size)),
        }
    }
}

/// Streaming markup parser.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    pub(crate) config: ParseConfig,
    pub(crate) resources: ParserResources,
}

impl MarkupParser {
    pub fn new(config: ParseConfig) -> Self {
        let resources = ParserResources::new(&config);
        MarkupParser { config, resources }
    }

    /// Parser using resources shared with other parsers.
    pub fn with_resources(config: ParseConfig, resources: ParserResources) -> Self {
        MarkupParser { config, resources }
    }

    /// HTML parser with default settings.
    pub fn html() -> Self {
        Self::new(ParseConfig::html())
    }

    /// XML parser with default settings.
    pub fn xml() -> Self {
        Self::new(ParseConfig::xml())
    }

    #[inline]
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    #[inline]
    pub fn resources(&self) -> &ParserResources {
        &self.resources
    }

    /// Parse `input`, reporting events to `handler`. `document` names the
    /// input in events and errors.
    pub fn parse<H: MarkupHandler>(&self, document: &str, input: &str, handler: H) -> Result<()> {
        self.run(document, input, None, handler)
    }

    /// Read everything from `reader` as UTF-8 and parse it.
    pub fn parse_reader<R: Read, H: MarkupHandler>(&self, document: &str, reader: R, handler: H) -> Result<()> {
        let input = read_document(document, reader)?;
        self.parse(document, &input, handler)
    }

    /// Parse `input`, adding the attributes `logic` assigns to the
    /// elements its selectors match.
    pub fn parse_with_logic<H: MarkupHandler>(
        &self,
        document: &str,
        input: &str,
        logic: &DecoupledTemplateLogic,
        handler: H,
    ) -> Result<()> {
        if !logic.has_injected_attributes() {
            return self.parse(document, input, handler);
        }
        let injector = DecoupledLogicInjector::new(logic, &self.resources.selectors, self.config.case_sensitive)?;
        self.run(document, input, Some(Box::new(injector)), handler)
    }

    /// Parse `input` with a custom injection hook.
    pub fn parse_with_hook<'p, H: MarkupHandler>(
        &'p self,
        document: &str,
        input: &str,
        hook: Box<dyn InjectionHook + 'p>,
        handler: H,
    ) -> Result<()> {
        self.run(document, input, Some(hook), handler)
    }

    /// Parse `input` and return every event it produced.
    pub fn collect(&self, document: &str, input: &str) -> Result<Vec<CollectedEvent>> {
        let mut collector = EventCollector::new(Arc::clone(&self.resources.texts));
        self.parse(document, input, &mut collector)?;
        Ok(collector.into_events())
    }

    fn stages(&self) -> Vec<Box<dyn MarkupStage>> {
        let mut stages: Vec<Box<dyn MarkupStage>> = Vec::with_capacity(1);
        if self.config.comment_blocks {
            stages.push(Box::new(ParserLevelCommentFilter::new()));
        }
        stages
    }

    fn run<'p, H: MarkupHandler>(
        &'p self,
        document: &str,
        input: &str,
        hook: Option<Box<dyn InjectionHook + 'p>>,
        handler: H,
    ) -> Result<()> {
        ParseSession::new(self, document, self.stages(), hook, handler).run(input)
    }
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::html()
    }
}
