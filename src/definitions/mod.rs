//! Element and attribute definitions
//!
//! Every element or attribute name seen by the parser resolves to a shared
//! definition instance. Resolution goes through a registry that:
//! - starts from the read-only standard HTML vocabulary (no locking)
//! - remembers other names in a bounded map behind a `RwLock`
//! - folds case when names are not case-sensitive, so `DIV` and `div`
//!   resolve to the same instance
//!
//! Once a registry holds its maximum number of entries, new names are
//! still classified but a fresh definition is built for every request.

pub mod html;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::DEFAULT_REGISTRY_MAX_SIZE;

/// Content model of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Regular element with markup content
    Normal,
    /// Never has content or an end tag (`br`, `img`)
    Void,
    /// Content is raw text, not markup (`script`, `style`)
    RawText,
    /// Content is text that may contain character references (`textarea`, `title`)
    EscapableRawText,
}

/// Classification of one element name.
#[derive(Debug, PartialEq, Eq)]
pub struct ElementDefinition {
    name: Box<str>,
    element_type: ElementType,
    standard: bool,
}

impl ElementDefinition {
    pub fn new(name: &str, element_type: ElementType) -> Self {
        ElementDefinition {
            name: name.into(),
            element_type,
            standard: false,
        }
    }

    /// Normalized name (lower-case unless case-sensitive).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Part of the standard HTML vocabulary.
    #[inline]
    pub fn is_standard(&self) -> bool {
        self.standard
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.element_type == ElementType::Void
    }

    /// Content is read as text up to the matching end tag.
    #[inline]
    pub fn has_raw_text_content(&self) -> bool {
        matches!(
            self.element_type,
            ElementType::RawText | ElementType::EscapableRawText
        )
    }
}

impl fmt::Display for ElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Classification of one attribute name.
#[derive(Debug, PartialEq, Eq)]
pub struct AttributeDefinition {
    name: Box<str>,
    boolean: bool,
    standard: bool,
}

impl AttributeDefinition {
    pub fn new(name: &str) -> Self {
        AttributeDefinition {
            name: name.into(),
            boolean: html::is_boolean_attribute(name),
            standard: false,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTML boolean attribute (`checked`, `disabled`, ...).
    #[inline]
    pub fn is_boolean(&self) -> bool {
        self.boolean
    }

    #[inline]
    pub fn is_standard(&self) -> bool {
        self.standard
    }
}

impl fmt::Display for AttributeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Bounded, thread-safe name -> definition map over a fixed standard set.
struct DefinitionRegistry<D> {
    kind: &'static str,
    standard: HashMap<Box<str>, Arc<D>>,
    custom: RwLock<HashMap<Box<str>, Arc<D>>>,
    max_size: usize,
    full_reported: AtomicBool,
}

impl<D> DefinitionRegistry<D> {
    fn new(kind: &'static str, standard: Vec<D>, name_of: fn(&D) -> &str, max_size: usize) -> Self {
        let standard = standard
            .into_iter()
            .map(|definition| (Box::from(name_of(&definition)), Arc::new(definition)))
            .collect();
        DefinitionRegistry {
            kind,
            standard,
            custom: RwLock::new(HashMap::new()),
            max_size,
            full_reported: AtomicBool::new(false),
        }
    }

    fn len(&self) -> usize {
        self.standard.len() + self.custom.read().len()
    }

    #[inline]
    fn find(&self, name: &str) -> Option<Arc<D>> {
        if let Some(definition) = self.standard.get(name) {
            return Some(Arc::clone(definition));
        }
        self.custom.read().get(name).cloned()
    }

    fn for_name(&self, case_sensitive: bool, name: &str, build: impl FnOnce(&str) -> D) -> Arc<D> {
        // Case-insensitive lookups only ever see lower-case keys, so names
        // stored by case-sensitive lookups cannot shadow them
        let normalized = if !case_sensitive && name.chars().any(char::is_uppercase) {
            Cow::Owned(name.to_lowercase())
        } else {
            Cow::Borrowed(name)
        };
        if let Some(definition) = self.find(&normalized) {
            return definition;
        }

        let mut custom = self.custom.write();
        // Another thread may have stored it while we waited for the lock
        if let Some(definition) = custom.get(&*normalized) {
            return Arc::clone(definition);
        }

        let definition = Arc::new(build(&normalized));
        if self.standard.len() + custom.len() >= self.max_size {
            if !self.full_reported.swap(true, Ordering::Relaxed) {
                log::debug!(
                    "{} definition registry reached its maximum size of {}, new names will not be cached",
                    self.kind,
                    self.max_size
                );
            }
            return definition;
        }
        custom.insert(normalized.into_owned().into_boxed_str(), Arc::clone(&definition));
        definition
    }
}

/// Registry of element definitions.
pub struct ElementDefinitions {
    registry: DefinitionRegistry<ElementDefinition>,
}

impl ElementDefinitions {
    /// Registry over the standard HTML elements with the default size cap.
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_REGISTRY_MAX_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        let standard = html::STANDARD_ELEMENTS
            .iter()
            .map(|&(name, element_type)| ElementDefinition {
                name: name.into(),
                element_type,
                standard: true,
            })
            .collect();
        ElementDefinitions {
            registry: DefinitionRegistry::new("Element", standard, ElementDefinition::name, max_size),
        }
    }

    /// Resolve an element name. Unknown names are `Normal`.
    pub fn for_name(&self, case_sensitive: bool, name: &str) -> Arc<ElementDefinition> {
        self.registry.for_name(case_sensitive, name, |normalized| {
            ElementDefinition::new(normalized, ElementType::Normal)
        })
    }

    /// Number of definitions currently held, standard ones included.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_size(&self) -> usize {
        self.registry.max_size
    }

    pub fn all_standard_names(&self) -> impl Iterator<Item = &'static str> {
        html::STANDARD_ELEMENTS.iter().map(|(name, _)| *name)
    }
}

impl Default for ElementDefinitions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ElementDefinitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDefinitions")
            .field("len", &self.len())
            .field("max_size", &self.max_size())
            .finish()
    }
}

/// Registry of attribute definitions.
pub struct AttributeDefinitions {
    registry: DefinitionRegistry<AttributeDefinition>,
}

impl AttributeDefinitions {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_REGISTRY_MAX_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        let standard = html::STANDARD_ATTRIBUTE_NAMES
            .iter()
            .map(|&name| AttributeDefinition {
                name: name.into(),
                boolean: html::is_boolean_attribute(name),
                standard: true,
            })
            .collect();
        AttributeDefinitions {
            registry: DefinitionRegistry::new("Attribute", standard, AttributeDefinition::name, max_size),
        }
    }

    /// Resolve an attribute name.
    pub fn for_name(&self, case_sensitive: bool, name: &str) -> Arc<AttributeDefinition> {
        self.registry
            .for_name(case_sensitive, name, AttributeDefinition::new)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_size(&self) -> usize {
        self.registry.max_size
    }

    pub fn all_standard_names(&self) -> impl Iterator<Item = &'static str> {
        html::STANDARD_ATTRIBUTE_NAMES.iter().copied()
    }
}

impl Default for AttributeDefinitions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AttributeDefinitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDefinitions")
            .field("len", &self.len())
            .field("max_size", &self.max_size())
            .finish()
    }
}
