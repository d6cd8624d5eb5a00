//! Event-based markup handling
//!
//! ## Architecture
//!
//! The parser turns tokens into [`MarkupEvent`]s and routes them through
//! an ordered list of stages to the caller's handler:
//!
//! ```text
//! Tokenizer ---> MarkupParser ---> [MarkupStage...] ---> MarkupHandler
//!                                                            |
//!                                                            v
//!                                          EventCollector -> CollectedEvent[]
//! ```
//!
//! ## Event Types
//!
//! - `DocumentStart` / `DocumentEnd`
//! - `XmlDeclaration`, `DocType`, `ProcessingInstruction` (interned)
//! - `Text`, `Comment`, `CData`
//! - `Attribute`, `InnerWhitespace`
//! - `StandaloneElement*`, `OpenElement*`, `CloseElement*`
//! - `AutoCloseElement*` (synthesized closes), `UnmatchedCloseElement*`
//!   (stray close tags)
//!
//! Element and attribute events carry the shared definition from the
//! registries plus the name exactly as written.

pub mod collector;
pub mod events;
pub mod handler;
pub mod pipeline;

pub use collector::EventCollector;
pub use events::{
    CollectedEvent, DocType, MarkupEvent, OwnedAttribute, OwnedMarkupEvent, ProcessingInstruction,
    XmlDeclaration,
};
pub use handler::{AttributeEvent, Directive, ElementTag, HandleResult, MarkupHandler};
pub use pipeline::{Downstream, MarkupStage, Pipeline};
