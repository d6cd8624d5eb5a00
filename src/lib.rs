//! RustyMarkup - streaming HTML/XML markup parsing for template engines
//!
//! Layers, bottom up:
//! - `util::text`: case-aware comparison and hashing of character sequences
//! - `text`: interning repositories (bounded FIFO cache)
//! - `definitions`: shared element/attribute definition registries
//! - `core`: scanner, positions and the pull tokenizer
//! - `sax`: handler contract, events, pipelines, collector
//! - `parser`: balancing, comment blocks, attribute injection
//! - `select` / `decoupled`: markup selectors and decoupled template logic
//! - `strategy`: parsing many documents in parallel
//!
//! ```
//! use rustymarkup::{MarkupParser, EventCollector};
//!
//! let parser = MarkupParser::html();
//! let mut collector = EventCollector::new(parser.resources().texts.clone());
//! parser.parse("index.html", "<ul><li>A<li>B</ul>", &mut collector).unwrap();
//! assert_eq!(collector.summary()[6], "AutoCloseElementStart(li)");
//! ```

pub mod config;
pub mod core;
pub mod decoupled;
pub mod definitions;
pub mod error;
pub mod parser;
pub mod reader;
pub mod sax;
pub mod select;
pub mod strategy;
pub mod text;
pub mod util;

pub use config::{ElementBalancing, ParseConfig, TemplateMode, TextRepositoryConfig};
pub use crate::core::{Position, QuoteStyle, TagAttribute};
pub use decoupled::{DecoupledLogicBuilder, DecoupledTemplateLogic, InjectedAttribute};
pub use definitions::{AttributeDefinition, AttributeDefinitions, ElementDefinition, ElementDefinitions, ElementType};
pub use error::{MarkupError, Result};
pub use parser::{InjectionHook, MarkupParser, ParserResources};
pub use sax::{
    CollectedEvent, Directive, EventCollector, MarkupEvent, MarkupHandler, MarkupStage, OwnedMarkupEvent, Pipeline,
};
pub use select::{MarkupSelector, SelectorMatch};
pub use text::{TextRepositories, TextRepository};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Memory Statistics
// ============================================================================

/// Heap statistics, available with the `memory_tracking` feature (all
/// zero otherwise).
pub mod memory {
    #[cfg(feature = "memory_tracking")]
    use std::sync::atomic::Ordering;

    #[cfg(feature = "memory_tracking")]
    use super::tracking::{ALLOCATED, PEAK_ALLOCATED};

    /// Bytes currently allocated.
    #[cfg(feature = "memory_tracking")]
    pub fn allocated() -> usize {
        ALLOCATED.load(Ordering::SeqCst)
    }

    /// Highest allocation seen since start or the last reset.
    #[cfg(feature = "memory_tracking")]
    pub fn peak() -> usize {
        PEAK_ALLOCATED.load(Ordering::SeqCst)
    }

    /// Restart peak tracking from the current allocation; returns
    /// `(current, previous peak)`.
    #[cfg(feature = "memory_tracking")]
    pub fn reset() -> (usize, usize) {
        let current = ALLOCATED.load(Ordering::SeqCst);
        let peak = PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
        (current, peak)
    }

    #[cfg(not(feature = "memory_tracking"))]
    pub fn allocated() -> usize {
        0
    }

    #[cfg(not(feature = "memory_tracking"))]
    pub fn peak() -> usize {
        0
    }

    #[cfg(not(feature = "memory_tracking"))]
    pub fn reset() -> (usize, usize) {
        (0, 0)
    }
}

// ============================================================================
// Convenience Entry Points
// ============================================================================

/// Parse an HTML document with default settings and return its events.
pub fn parse_events(document: &str, input: &str) -> Result<Vec<CollectedEvent>> {
    MarkupParser::html().collect(document, input)
}

/// Parse an XML document with default settings and return its events.
pub fn parse_xml_events(document: &str, input: &str) -> Result<Vec<CollectedEvent>> {
    MarkupParser::xml().collect(document, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        let events = parse_events("t", "<p>x").unwrap();
        assert_eq!(events.len(), 7);
        assert!(matches!(events[0].event, OwnedMarkupEvent::DocumentStart));
        let xml = parse_xml_events("t", "<P></p>").unwrap();
        assert_eq!(xml[3].event.to_string(), "UnmatchedCloseElementStart(p)");
    }

    #[cfg(feature = "memory_tracking")]
    #[test]
    fn test_memory_tracking_counts_live_allocations() {
        let buffer = vec![0u8; 1 << 20];
        assert!(memory::allocated() >= buffer.len());
        let (current, peak) = memory::reset();
        assert!(current >= buffer.len());
        assert!(peak >= buffer.len());
        assert!(memory::peak() >= buffer.len());
        drop(buffer);
    }

    #[cfg(not(feature = "memory_tracking"))]
    #[test]
    fn test_memory_stats_are_zero_without_tracking() {
        let _buffer = vec![0u8; 1 << 20];
        assert_eq!(memory::allocated(), 0);
        assert_eq!(memory::peak(), 0);
        assert_eq!(memory::reset(), (0, 0));
    }
}
