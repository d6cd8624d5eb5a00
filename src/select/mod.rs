//! Markup selectors
//!
//! A small path language for picking elements while parsing:
//!
//! ```text
//! //div                  any div
//! /html/body             body child of the root html element
//! //ul//li.item          li with class "item" anywhere below a ul
//! //*#main               any element with id "main"
//! //a[href^='http' and @target='_blank']
//! //table#users/tr[0]    first tr child of the users table
//! ```
//!
//! Steps are separated by `/` (child) or `//` (descendant). A selector not
//! starting with `/` matches at any depth. Each step has a name (or `*`)
//! and any number of `#id`, `.class` and `[...]` attribute conditions. A
//! child step may end with a zero-based index `[n]`, counting only the
//! siblings that pass the rest of the step.
//!
//! Matching is streaming: each open element keeps a [`SelectorState`]
//! derived from its parent's, plus [`SiblingCounts`] for its children, so
//! no tree is ever built.

mod cache;
mod parse;

pub use cache::SelectorCache;

use std::fmt;

use crate::core::TagPart;
use crate::util::text;

/// Outcome of testing an element against a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMatch {
    Matches,
    DoesNotMatch,
    /// Depends on attributes not known yet
    MightMatch,
}

impl SelectorMatch {
    #[inline]
    pub fn is_match(self) -> bool {
        self == SelectorMatch::Matches
    }

    /// Combine conditions that must all hold.
    #[inline]
    fn and(self, other: SelectorMatch) -> SelectorMatch {
        match (self, other) {
            (SelectorMatch::DoesNotMatch, _) | (_, SelectorMatch::DoesNotMatch) => SelectorMatch::DoesNotMatch,
            (SelectorMatch::Matches, SelectorMatch::Matches) => SelectorMatch::Matches,
            _ => SelectorMatch::MightMatch,
        }
    }

    #[inline]
    fn from_bool(matches: bool) -> SelectorMatch {
        if matches {
            SelectorMatch::Matches
        } else {
            SelectorMatch::DoesNotMatch
        }
    }
}

/// How a step relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/`
    Child,
    /// `//`
    Descendant,
}

/// Comparison in an attribute condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    Exists,
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
    Contains,
    /// Whitespace-separated token list contains the value (`.class`)
    HasToken,
}

impl AttributeOperator {
    fn symbol(self) -> &'static str {
        match self {
            AttributeOperator::Exists => "",
            AttributeOperator::Equals => "=",
            AttributeOperator::NotEquals => "!=",
            AttributeOperator::StartsWith => "^=",
            AttributeOperator::EndsWith => "$=",
            AttributeOperator::Contains => "*=",
            AttributeOperator::HasToken => "~=",
        }
    }
}

/// One attribute condition of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCondition {
    pub name: String,
    pub operator: AttributeOperator,
    pub value: String,
}

impl AttributeCondition {
    fn test(&self, attribute: Option<Option<&str>>) -> bool {
        let Some(value) = attribute else {
            return self.operator == AttributeOperator::NotEquals;
        };
        let value = value.unwrap_or("");
        let expected = self.value.as_str();
        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => value == expected,
            AttributeOperator::NotEquals => value != expected,
            AttributeOperator::StartsWith => value.starts_with(expected),
            AttributeOperator::EndsWith => value.ends_with(expected),
            AttributeOperator::Contains => value.contains(expected),
            AttributeOperator::HasToken => value.split_ascii_whitespace().any(|token| token == expected),
        }
    }
}

/// Element test of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTest {
    /// `None` for `*` or a step with conditions only
    pub name: Option<String>,
    pub conditions: Vec<AttributeCondition>,
    /// Zero-based position among the siblings passing the rest of the test
    pub index: Option<usize>,
}

impl NodeTest {
    /// Test an element. With `complete == false` the attribute list may
    /// still grow, so failed conditions give `MightMatch`.
    pub fn test(&self, element: &ElementView<'_>, case_sensitive: bool) -> SelectorMatch {
        if let Some(name) = &self.name {
            if !text::equals(case_sensitive, name.as_str(), element.name) {
                return SelectorMatch::DoesNotMatch;
            }
        }
        self.conditions.iter().fold(SelectorMatch::Matches, |result, condition| {
            let outcome = match element.attribute(&condition.name, case_sensitive) {
                None if !element.complete => SelectorMatch::MightMatch,
                attribute => SelectorMatch::from_bool(condition.test(attribute)),
            };
            result.and(outcome)
        })
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or("*"))?;
        for condition in &self.conditions {
            match condition.operator {
                AttributeOperator::Exists => write!(f, "[{}]", condition.name)?,
                operator => write!(f, "[{}{}'{}']", condition.name, operator.symbol(), condition.value)?,
            }
        }
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

/// One `/` or `//` separated part of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStep {
    pub axis: Axis,
    pub test: NodeTest,
}

/// Element as seen by selector matching.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    pub name: &'a str,
    pub parts: &'a [TagPart<'a>],
    /// All attributes of the element are in `parts`
    pub complete: bool,
}

impl<'a> ElementView<'a> {
    pub fn new(name: &'a str, parts: &'a [TagPart<'a>]) -> Self {
        ElementView { name, parts, complete: true }
    }

    /// `Some(value)` when the attribute is present; the inner `None` is a
    /// valueless attribute.
    fn attribute(&self, name: &str, case_sensitive: bool) -> Option<Option<&'a str>> {
        self.parts.iter().find_map(|part| match part {
            TagPart::Attribute(attribute) if text::equals(case_sensitive, attribute.name, name) => {
                Some(attribute.value)
            }
            _ => None,
        })
    }
}

/// Matching progress at one element: bit `k` set means the first `k`
/// steps are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorState {
    /// Prefixes matched ending exactly at this element
    exact: u64,
    /// Prefixes matched at this element or any ancestor
    carried: u64,
}

impl SelectorState {
    /// State of the document itself, above the root element.
    pub const ROOT: SelectorState = SelectorState { exact: 1, carried: 1 };
}

impl Default for SelectorState {
    fn default() -> Self {
        SelectorState::ROOT
    }
}

/// Children of one element seen so far: per step, how many passed that
/// step's test. Only steps with an index are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiblingCounts(Vec<usize>);

impl SiblingCounts {
    #[inline]
    fn get(&self, step: usize) -> usize {
        self.0.get(step).copied().unwrap_or(0)
    }

    /// Count one more sibling for `step`, returning its position.
    fn next(&mut self, step: usize) -> usize {
        if self.0.len() <= step {
            self.0.resize(step + 1, 0);
        }
        let position = self.0[step];
        self.0[step] += 1;
        position
    }
}

/// Most steps a selector may have.
pub const MAX_STEPS: usize = 63;

/// A compiled selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSelector {
    source: String,
    steps: Vec<SelectorStep>,
}

impl MarkupSelector {
    /// Compile `selector`.
    pub fn parse(selector: &str) -> crate::error::Result<MarkupSelector> {
        let steps = parse::parse_steps(selector)?;
        Ok(MarkupSelector {
            source: selector.to_string(),
            steps,
        })
    }

    /// Selector as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn steps(&self) -> &[SelectorStep] {
        &self.steps
    }

    /// Move from a parent's state to the state of `element`. `siblings`
    /// belongs to the parent and is updated for the elements before
    /// `element` in it.
    pub fn advance(
        &self,
        parent: SelectorState,
        siblings: &mut SiblingCounts,
        element: &ElementView<'_>,
        case_sensitive: bool,
    ) -> SelectorState {
        let mut exact = 0u64;
        for (k, step) in self.steps.iter().enumerate() {
            let available = match step.axis {
                Axis::Child => parent.exact,
                Axis::Descendant => parent.carried,
            };
            if available & (1 << k) == 0 || !step.test.test(element, case_sensitive).is_match() {
                continue;
            }
            if let Some(index) = step.test.index {
                if siblings.next(k) != index {
                    continue;
                }
            }
            exact |= 1 << (k + 1);
        }
        SelectorState {
            exact,
            carried: parent.carried | exact,
        }
    }

    /// Whether a state reached through [`advance`](Self::advance) is a
    /// full match.
    #[inline]
    pub fn is_match(&self, state: SelectorState) -> bool {
        state.exact & (1 << self.steps.len()) != 0
    }

    /// Test `element`, child of an element in `parent` state, without
    /// computing its state or counting it among `siblings`.
    pub fn matches(
        &self,
        parent: SelectorState,
        siblings: &SiblingCounts,
        element: &ElementView<'_>,
        case_sensitive: bool,
    ) -> SelectorMatch {
        let Some(last) = self.steps.len().checked_sub(1) else {
            return SelectorMatch::DoesNotMatch;
        };
        let step = &self.steps[last];
        let available = match step.axis {
            Axis::Child => parent.exact,
            Axis::Descendant => parent.carried,
        };
        if available & (1 << last) == 0 {
            return SelectorMatch::DoesNotMatch;
        }
        match step.test.index {
            Some(index) if siblings.get(last) != index => SelectorMatch::DoesNotMatch,
            _ => step.test.test(element, case_sensitive),
        }
    }
}

impl fmt::Display for MarkupSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            let axis = match step.axis {
                Axis::Child => "/",
                Axis::Descendant => "//",
            };
            write!(f, "{axis}{}", step.test)?;
        }
        Ok(())
    }
}
