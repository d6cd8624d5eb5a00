//! Attribute injection seam
//!
//! An [`InjectionHook`] is told about every element the parser starts and
//! every open element it ends, and may add attributes to an element after
//! the ones written in the source. Decoupled template logic is applied
//! through this seam.

use crate::core::TagPart;
use crate::decoupled::InjectedAttribute;
use crate::definitions::ElementDefinition;

/// Element being started, as seen by an injection hook.
#[derive(Debug, Clone, Copy)]
pub struct ElementStart<'e> {
    pub definition: &'e ElementDefinition,
    /// Name as written
    pub name: &'e str,
    /// Whitespace and attributes as written
    pub parts: &'e [TagPart<'e>],
    /// No matching end will be reported (void or minimized element)
    pub standalone: bool,
}

/// Per-parse receiver of element starts and ends.
pub trait InjectionHook {
    /// Attributes to add to `element`, after its own.
    fn element_start(&mut self, element: &ElementStart<'_>) -> Vec<InjectedAttribute>;

    /// An open (non-standalone) element was ended, by its own end tag or
    /// implicitly. `level` is its nesting level among the open elements,
    /// 1 being the outermost; it is the innermost one unless balancing is
    /// off.
    fn element_end(&mut self, level: usize);
}
