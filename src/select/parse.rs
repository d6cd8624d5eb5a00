//! Selector syntax

use super::{AttributeCondition, AttributeOperator, Axis, NodeTest, SelectorStep, MAX_STEPS};
use crate::error::{MarkupError, Result};

/// Characters ending a name, id or class.
#[inline]
fn is_delimiter(c: char) -> bool {
    matches!(c, '/' | '#' | '.' | '[') || c.is_whitespace()
}

struct SelectorParser<'s> {
    source: &'s str,
    rest: &'s str,
}

impl<'s> SelectorParser<'s> {
    fn error(&self, message: impl Into<String>) -> MarkupError {
        MarkupError::invalid_selector(self.source, message)
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'s str {
        let end = self.rest.find(|c: char| !keep(c)).unwrap_or(self.rest.len());
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        taken
    }

    fn steps(&mut self) -> Result<Vec<SelectorStep>> {
        let mut steps = Vec::new();
        while !self.rest.is_empty() {
            let axis = if let Some(rest) = self.rest.strip_prefix("//") {
                self.rest = rest;
                Axis::Descendant
            } else if let Some(rest) = self.rest.strip_prefix('/') {
                self.rest = rest;
                Axis::Child
            } else if steps.is_empty() {
                Axis::Descendant
            } else {
                return Err(self.error(format!("unexpected \"{}\"", self.rest)));
            };
            let test = self.node_test()?;
            if test.index.is_some() && axis == Axis::Descendant {
                return Err(self.error("an index needs a \"/\" step, not \"//\""));
            }
            steps.push(SelectorStep { axis, test });
        }
        if steps.is_empty() {
            return Err(self.error("selector is empty"));
        }
        if steps.len() > MAX_STEPS {
            return Err(self.error(format!("more than {MAX_STEPS} steps")));
        }
        Ok(steps)
    }

    fn node_test(&mut self) -> Result<NodeTest> {
        let name = self.take_while(|c| !is_delimiter(c));
        let mut conditions = Vec::new();
        let mut index = None;
        loop {
            if index.is_some() && self.rest.starts_with(['#', '.', '[']) {
                return Err(self.error("an index must be the last condition of a step"));
            }
            if let Some(rest) = self.rest.strip_prefix('#') {
                self.rest = rest;
                conditions.push(self.shorthand("id", AttributeOperator::Equals)?);
            } else if let Some(rest) = self.rest.strip_prefix('.') {
                self.rest = rest;
                conditions.push(self.shorthand("class", AttributeOperator::HasToken)?);
            } else if let Some(rest) = self.rest.strip_prefix('[') {
                self.rest = rest;
                self.bracket(&mut conditions, &mut index)?;
            } else {
                break;
            }
        }

        if name.is_empty() && conditions.is_empty() && index.is_none() {
            return Err(self.error("empty step"));
        }
        if let Some(c) = self.rest.chars().next().filter(|c| c.is_whitespace()) {
            return Err(self.error(format!("unexpected {c:?} after \"{name}\"")));
        }
        let name = match name {
            "" | "*" => None,
            name => Some(name.to_string()),
        };
        Ok(NodeTest { name, conditions, index })
    }

    fn shorthand(&mut self, attribute: &str, operator: AttributeOperator) -> Result<AttributeCondition> {
        let value = self.take_while(|c| !is_delimiter(c));
        if value.is_empty() {
            return Err(self.error(format!("missing {attribute} value")));
        }
        Ok(AttributeCondition {
            name: attribute.to_string(),
            operator,
            value: value.to_string(),
        })
    }

    /// Conditions up to the closing `]`, joined by `and`, or an index.
    fn bracket(&mut self, conditions: &mut Vec<AttributeCondition>, index: &mut Option<usize>) -> Result<()> {
        let mut quote = None;
        let close = self.rest.char_indices().find_map(|(i, c)| match (quote, c) {
            (None, '\'' | '"') => {
                quote = Some(c);
                None
            }
            (Some(q), c) if c == q => {
                quote = None;
                None
            }
            (None, ']') => Some(i),
            _ => None,
        });
        let Some(close) = close else {
            return Err(self.error("unclosed \"[\""));
        };
        let body = &self.rest[..close];
        self.rest = &self.rest[close + 1..];

        let trimmed = body.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let position = trimmed
                .parse()
                .map_err(|_| self.error(format!("index {trimmed} is out of range")))?;
            *index = Some(position);
            return Ok(());
        }

        for condition in split_and(body) {
            conditions.push(self.condition(condition.trim())?);
        }
        Ok(())
    }

    fn condition(&self, condition: &str) -> Result<AttributeCondition> {
        if condition.is_empty() {
            return Err(self.error("empty condition"));
        }
        let condition = condition.strip_prefix('@').unwrap_or(condition);
        let name_end = condition
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
            .unwrap_or(condition.len());
        let (name, rest) = condition.split_at(name_end);
        if name.is_empty() {
            return Err(self.error(format!("no attribute name in \"{condition}\"")));
        }
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(AttributeCondition {
                name: name.to_string(),
                operator: AttributeOperator::Exists,
                value: String::new(),
            });
        }

        let (operator, value) = [
            ("!=", AttributeOperator::NotEquals),
            ("^=", AttributeOperator::StartsWith),
            ("$=", AttributeOperator::EndsWith),
            ("*=", AttributeOperator::Contains),
            ("=", AttributeOperator::Equals),
        ]
        .into_iter()
        .find_map(|(symbol, operator)| rest.strip_prefix(symbol).map(|value| (operator, value)))
        .ok_or_else(|| self.error(format!("unknown operator in \"{condition}\"")))?;

        Ok(AttributeCondition {
            name: name.to_string(),
            operator,
            value: self.value(value.trim())?.to_string(),
        })
    }

    fn value<'v>(&self, value: &'v str) -> Result<&'v str> {
        match value.chars().next() {
            Some(q @ ('\'' | '"')) => value
                .strip_prefix(q)
                .and_then(|v| v.strip_suffix(q))
                .ok_or_else(|| self.error(format!("unterminated value {value}"))),
            Some(_) => Ok(value),
            None => Err(self.error("missing value")),
        }
    }
}

/// Split on ` and ` outside quotes.
fn split_and(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote = None;
    let mut start = 0;
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'\'' || b == b'"' => quote = Some(b),
            None if b.is_ascii_whitespace() && body[i + 1..].starts_with("and") => {
                let after = i + 4;
                if bytes.get(after).is_some_and(|b| b.is_ascii_whitespace()) {
                    parts.push(&body[start..i]);
                    start = after + 1;
                    i = after;
                }
            }
            None => {}
        }
        i += 1;
    }
    parts.push(&body[start..]);
    parts
}

pub(super) fn parse_steps(selector: &str) -> Result<Vec<SelectorStep>> {
    let mut parser = SelectorParser {
        source: selector,
        rest: selector.trim(),
    };
    parser.steps()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_and_conditions() {
        let steps = parse_steps("/html//div#main.wide[data-x = \"a b\" and @hidden]").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].axis, Axis::Child);
        assert_eq!(steps[0].test.name.as_deref(), Some("html"));
        assert_eq!(steps[1].axis, Axis::Descendant);

        let conditions = &steps[1].test.conditions;
        assert_eq!(conditions.len(), 4);
        assert_eq!(conditions[0].operator, AttributeOperator::Equals);
        assert_eq!(conditions[0].value, "main");
        assert_eq!(conditions[1].operator, AttributeOperator::HasToken);
        assert_eq!(conditions[2].name, "data-x");
        assert_eq!(conditions[2].value, "a b");
        assert_eq!(conditions[3].name, "hidden");
        assert_eq!(conditions[3].operator, AttributeOperator::Exists);
    }

    #[test]
    fn test_wildcard_and_bare_values() {
        let steps = parse_steps("//*[type=text]").unwrap();
        assert_eq!(steps[0].test.name, None);
        assert_eq!(steps[0].test.conditions[0].value, "text");
    }

    #[test]
    fn test_split_and_respects_quotes() {
        assert_eq!(split_and("a='x and y' and b"), vec!["a='x and y'", "b"]);
        assert_eq!(split_and("brand"), vec!["brand"]);
    }

    #[test]
    fn test_index_ends_a_child_step() {
        let steps = parse_steps("//#usersTable/tr[ 0 ]").unwrap();
        assert_eq!(steps[1].axis, Axis::Child);
        assert_eq!(steps[1].test.index, Some(0));
        assert!(steps[1].test.conditions.is_empty());
        assert_eq!(steps[0].test.index, None);

        let steps = parse_steps("/ul/li[class='x'][3]").unwrap();
        assert_eq!(steps[1].test.conditions.len(), 1);
        assert_eq!(steps[1].test.index, Some(3));
    }

    #[test]
    fn test_rejects_invalid() {
        for selector in [
            "",
            "//",
            "div[",
            "div[a~'x']",
            "div span",
            "a//#",
            "[a='x]",
            "div[1]",
            "//li[0]",
            "/li[0][1]",
            "/li[0].x",
            "/li[99999999999999999999999]",
        ] {
            assert!(parse_steps(selector).is_err(), "{selector:?}");
        }
    }
}
