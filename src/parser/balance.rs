//! HTML element balancing rules
//!
//! Opening some HTML elements implies the end of others: a new `<li>`
//! ends the previous `<li>`, a `<div>` ends an open `<p>`. Each rule
//! lists the elements the opener closes and the ancestors at which the
//! search for them stops.

use std::sync::Arc;

use crate::definitions::ElementDefinition;

/// Implied-close rule for one opening element.
#[derive(Debug)]
pub(crate) struct AutoCloseRule {
    pub closes: &'static [&'static str],
    pub limits: &'static [&'static str],
}

/// Elements that keep an open `<p>` out of reach.
const P_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "th", "template",
];

const CLOSES_P: AutoCloseRule = AutoCloseRule { closes: &["p"], limits: P_SCOPE };

const LI: AutoCloseRule = AutoCloseRule {
    closes: &["li"],
    limits: &["ul", "ol", "menu"],
};

const DT_DD: AutoCloseRule = AutoCloseRule {
    closes: &["dt", "dd"],
    limits: &["dl"],
};

const OPTION: AutoCloseRule = AutoCloseRule {
    closes: &["option"],
    limits: &["select", "datalist", "optgroup"],
};

const OPTGROUP: AutoCloseRule = AutoCloseRule {
    closes: &["option", "optgroup"],
    limits: &["select"],
};

const TR: AutoCloseRule = AutoCloseRule {
    closes: &["tr", "td", "th"],
    limits: &["table", "thead", "tbody", "tfoot"],
};

const TD_TH: AutoCloseRule = AutoCloseRule {
    closes: &["td", "th"],
    limits: &["tr", "table"],
};

const TABLE_SECTION: AutoCloseRule = AutoCloseRule {
    closes: &["thead", "tbody", "tfoot", "tr", "td", "th", "colgroup", "caption"],
    limits: &["table"],
};

const COLGROUP: AutoCloseRule = AutoCloseRule {
    closes: &["colgroup", "caption"],
    limits: &["table"],
};

const RB_RTC: AutoCloseRule = AutoCloseRule {
    closes: &["rb", "rt", "rtc", "rp"],
    limits: &["ruby"],
};

const RT_RP: AutoCloseRule = AutoCloseRule {
    closes: &["rb", "rt", "rp"],
    limits: &["ruby", "rtc"],
};

const BODY: AutoCloseRule = AutoCloseRule {
    closes: &["head"],
    limits: &["html"],
};

/// Rule for an opening element, by normalized name.
pub(crate) fn auto_close_rule(name: &str) -> Option<&'static AutoCloseRule> {
    let rule = match name {
        "li" => &LI,
        "dt" | "dd" => &DT_DD,
        "option" => &OPTION,
        "optgroup" => &OPTGROUP,
        "tr" => &TR,
        "td" | "th" => &TD_TH,
        "thead" | "tbody" | "tfoot" => &TABLE_SECTION,
        "colgroup" => &COLGROUP,
        "rb" | "rtc" => &RB_RTC,
        "rt" | "rp" => &RT_RP,
        "body" => &BODY,
        "address" | "article" | "aside" | "blockquote" | "details" | "dialog" | "div" | "dl"
        | "fieldset" | "figcaption" | "figure" | "footer" | "form" | "h1" | "h2" | "h3" | "h4"
        | "h5" | "h6" | "header" | "hgroup" | "hr" | "main" | "menu" | "nav" | "ol" | "p"
        | "pre" | "section" | "table" | "ul" => &CLOSES_P,
        _ => return None,
    };
    Some(rule)
}

/// Element left open, waiting for its end tag.
#[derive(Debug, Clone)]
pub(crate) struct OpenElement<'i> {
    pub definition: Arc<ElementDefinition>,
    pub name: &'i str,
}

/// Stack of open elements.
#[derive(Debug, Default)]
pub(crate) struct ElementStack<'i> {
    open: Vec<OpenElement<'i>>,
}

impl<'i> ElementStack<'i> {
    pub fn new() -> Self {
        ElementStack { open: Vec::with_capacity(32) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn push(&mut self, definition: Arc<ElementDefinition>, name: &'i str) {
        self.open.push(OpenElement { definition, name });
    }

    #[inline]
    pub fn pop(&mut self) -> Option<OpenElement<'i>> {
        self.open.pop()
    }

    /// Index of the innermost open element with this definition.
    pub fn find(&self, definition: &ElementDefinition) -> Option<usize> {
        self.open
            .iter()
            .rposition(|open| open.definition.name() == definition.name())
    }

    /// Index of the element an opener with `rule` implicitly closes, if
    /// one is reachable before a limiting ancestor.
    pub fn find_implied_close(&self, rule: &AutoCloseRule) -> Option<usize> {
        for (index, open) in self.open.iter().enumerate().rev() {
            let name = open.definition.name();
            if rule.closes.contains(&name) {
                return Some(index);
            }
            if rule.limits.contains(&name) {
                return None;
            }
        }
        None
    }

    /// Drop the element at `index` without touching the ones above it.
    pub fn remove(&mut self, index: usize) -> OpenElement<'i> {
        self.open.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::ElementDefinitions;

    fn stack<'i>(elements: &ElementDefinitions, names: &[&'i str]) -> ElementStack<'i> {
        let mut stack = ElementStack::new();
        for name in names {
            stack.push(elements.for_name(false, name), name);
        }
        stack
    }

    #[test]
    fn test_li_closes_sibling_li() {
        let elements = ElementDefinitions::new();
        let rule = auto_close_rule("li").unwrap();
        assert_eq!(stack(&elements, &["ul", "li"]).find_implied_close(rule), Some(1));
        assert_eq!(stack(&elements, &["ul", "li", "span"]).find_implied_close(rule), Some(1));
        // A nested list shields the outer item
        assert_eq!(stack(&elements, &["ul", "li", "ol"]).find_implied_close(rule), None);
    }

    #[test]
    fn test_block_closes_p_within_scope() {
        let elements = ElementDefinitions::new();
        let rule = auto_close_rule("div").unwrap();
        assert_eq!(stack(&elements, &["body", "p", "em"]).find_implied_close(rule), Some(1));
        assert_eq!(stack(&elements, &["p", "table", "td"]).find_implied_close(rule), None);
        assert!(auto_close_rule("span").is_none());
    }

    #[test]
    fn test_find_innermost() {
        let elements = ElementDefinitions::new();
        let stack = stack(&elements, &["div", "p", "DIV", "b"]);
        assert_eq!(stack.find(&elements.for_name(false, "div")), Some(2));
        assert_eq!(stack.find(&elements.for_name(false, "i")), None);
    }
}
