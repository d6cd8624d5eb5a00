//! Applying decoupled logic during a parse

use std::sync::Arc;

use super::{DecoupledTemplateLogic, InjectedAttribute};
use crate::error::Result;
use crate::parser::{ElementStart, InjectionHook};
use crate::select::{ElementView, MarkupSelector, SelectorCache, SelectorState, SiblingCounts};

/// Matching state of one open element, one entry per rule.
#[derive(Debug, Clone)]
struct Frame {
    states: Vec<SelectorState>,
    /// Children seen so far
    siblings: Vec<SiblingCounts>,
}

impl Frame {
    fn new(states: Vec<SelectorState>) -> Self {
        let siblings = vec![SiblingCounts::default(); states.len()];
        Frame { states, siblings }
    }
}

/// Injection hook that adds the attributes of every selector matching an
/// element. Attributes are added in selector order, and are added even
/// when the element already has an attribute with the same name.
pub struct DecoupledLogicInjector<'l> {
    case_sensitive: bool,
    rules: Vec<(Arc<MarkupSelector>, &'l [InjectedAttribute])>,
    /// One frame for each open element, the document first
    frames: Vec<Frame>,
}

impl<'l> DecoupledLogicInjector<'l> {
    /// Compile the selectors of `logic` through `selectors`.
    pub fn new(logic: &'l DecoupledTemplateLogic, selectors: &SelectorCache, case_sensitive: bool) -> Result<Self> {
        let rules = logic
            .entries()
            .map(|(selector, attributes)| Ok((selectors.get_or_compile(selector)?, attributes)))
            .collect::<Result<Vec<_>>>()?;
        let root = Frame::new(vec![SelectorState::ROOT; rules.len()]);
        Ok(DecoupledLogicInjector {
            case_sensitive,
            rules,
            frames: vec![root],
        })
    }

    /// Open elements being tracked, not counting the document.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

impl InjectionHook for DecoupledLogicInjector<'_> {
    fn element_start(&mut self, element: &ElementStart<'_>) -> Vec<InjectedAttribute> {
        let view = ElementView::new(element.name, element.parts);
        let Some(parent) = self.frames.last_mut() else {
            return Vec::new();
        };

        let mut injected = Vec::new();
        let mut states = Vec::with_capacity(self.rules.len());
        let rules = self.rules.iter().zip(&parent.states).zip(&mut parent.siblings);
        for (((selector, attributes), &parent_state), siblings) in rules {
            let state = selector.advance(parent_state, siblings, &view, self.case_sensitive);
            if selector.is_match(state) {
                log::trace!("Selector \"{}\" matched element \"{}\"", selector.source(), element.name);
                injected.extend(attributes.iter().cloned());
            }
            states.push(state);
        }

        if !element.standalone {
            self.frames.push(Frame::new(states));
        }
        injected
    }

    fn element_end(&mut self, level: usize) {
        if level > 0 && level < self.frames.len() {
            self.frames.remove(level);
        }
    }
}
