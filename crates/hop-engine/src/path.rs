//! Path expressions.
//!
//! A deliberately small XPath subset: a sequence of child (`/`) or descendant
//! (`//`) steps, each naming a tag (or `*`) and carrying optional attribute
//! predicates.
//!
//! ```text
//! //div[@class='yuRUbf']//a[@href]
//! //div[@aria-level='2']
//! /html/body//textarea[@name="q"]
//! ```
//!
//! Matching is evaluated bottom-up from a candidate element, so a provider can
//! walk its tree in document order and test each element without ever
//! producing duplicates.

use std::fmt;
use std::str::FromStr;

use crate::document::Document;
use crate::error::{EngineError, EngineResult};

// =============================================================================
// Types
// =============================================================================

/// Relationship between a step and the step before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/` - direct child.
    Child,
    /// `//` - any descendant.
    Descendant,
}

/// `[@name]` or `[@name='value']`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPredicate {
    pub name: String,
    pub value: Option<String>,
}

/// One location step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    /// Lowercased tag name; `None` for `*`.
    pub name: Option<String>,
    pub predicates: Vec<AttrPredicate>,
}

impl Step {
    /// Whether the element itself satisfies this step's name and predicates.
    fn accepts<D: Document>(&self, doc: &D, el: &D::Element) -> bool {
        if let Some(name) = &self.name {
            if !doc.tag_name(el).eq_ignore_ascii_case(name) {
                return false;
            }
        }
        self.predicates
            .iter()
            .all(|pred| match (doc.attribute(el, &pred.name), &pred.value) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            })
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    source: String,
    steps: Vec<Step>,
}

impl PathExpr {
    /// Parse a path expression.
    pub fn parse(source: &str) -> EngineResult<Self> {
        Parser::new(source).parse()
    }

    /// The steps, first to last.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The text this expression was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `el` is selected by this expression.
    pub fn matches<D: Document>(&self, doc: &D, el: &D::Element) -> bool {
        self.match_step(doc, self.steps.len() - 1, el)
    }

    fn match_step<D: Document>(&self, doc: &D, i: usize, el: &D::Element) -> bool {
        let step = &self.steps[i];
        if !step.accepts(doc, el) {
            return false;
        }

        match (i, step.axis) {
            // First step is anchored at the document: `/x` must be a top-level element.
            (0, Axis::Child) => doc.parent(el).is_none(),
            (0, Axis::Descendant) => true,
            (_, Axis::Child) => doc
                .parent(el)
                .is_some_and(|parent| self.match_step(doc, i - 1, &parent)),
            (_, Axis::Descendant) => {
                let mut ancestor = doc.parent(el);
                while let Some(current) = ancestor {
                    if self.match_step(doc, i - 1, &current) {
                        return true;
                    }
                    ancestor = doc.parent(&current);
                }
                false
            }
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for PathExpr {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse(mut self) -> EngineResult<PathExpr> {
        let mut steps = Vec::new();

        self.skip_ws();
        while !self.at_end() {
            let axis = if self.eat("//") {
                Axis::Descendant
            } else if self.eat("/") {
                Axis::Child
            } else {
                return Err(self.error("expected '/' or '//'"));
            };

            let name = if self.eat("*") {
                None
            } else {
                Some(self.ident()?.to_ascii_lowercase())
            };

            let mut predicates = Vec::new();
            while self.eat("[") {
                predicates.push(self.predicate()?);
            }

            steps.push(Step {
                axis,
                name,
                predicates,
            });
            self.skip_ws();
        }

        if steps.is_empty() {
            return Err(self.error("empty path"));
        }

        Ok(PathExpr {
            source: self.src.to_string(),
            steps,
        })
    }

    /// Parse the remainder of a predicate after its opening `[`.
    fn predicate(&mut self) -> EngineResult<AttrPredicate> {
        self.skip_ws();
        self.expect("@")?;
        let name = self.ident()?;
        self.skip_ws();

        let value = if self.eat("=") {
            self.skip_ws();
            Some(self.quoted()?)
        } else {
            None
        };

        self.skip_ws();
        self.expect("]")?;
        Ok(AttrPredicate { name, value })
    }

    fn ident(&mut self) -> EngineResult<String> {
        let rest = &self.src[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a name"));
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    fn quoted(&mut self) -> EngineResult<String> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a quoted value")),
        };
        let start = self.pos + 1;
        match self.src[start..].find(quote) {
            Some(len) => {
                self.pos = start + len + 1;
                Ok(self.src[start..start + len].to_string())
            }
            None => Err(self.error("unterminated string")),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.src[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> EngineResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", token)))
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn error(&self, message: &str) -> EngineError {
        EngineError::InvalidPath {
            path: self.src.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    #[test]
    fn test_parse_result_path() {
        let path = PathExpr::parse("//div[@class='yuRUbf']//a[@href]").unwrap();
        let steps = path.steps();
        assert_eq!(steps.len(), 2);

        assert_eq!(steps[0].axis, Axis::Descendant);
        assert_eq!(steps[0].name.as_deref(), Some("div"));
        assert_eq!(
            steps[0].predicates,
            vec![AttrPredicate {
                name: "class".to_string(),
                value: Some("yuRUbf".to_string()),
            }]
        );

        assert_eq!(steps[1].name.as_deref(), Some("a"));
        assert_eq!(steps[1].predicates[0].value, None);
        assert_eq!(path.to_string(), "//div[@class='yuRUbf']//a[@href]");
    }

    #[test]
    fn test_parse_child_axis_wildcard_and_double_quotes() {
        let path = PathExpr::parse(r#"/HTML/*//textarea[ @name = "q" ]"#).unwrap();
        let steps = path.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].axis, Axis::Child);
        assert_eq!(steps[0].name.as_deref(), Some("html"));
        assert_eq!(steps[1].name, None);
        assert_eq!(steps[2].predicates[0].value.as_deref(), Some("q"));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "div", "//", "//a[href]", "//a[@href='x", "//a[@href", "//a]"] {
            let err = PathExpr::parse(bad).unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidPath { .. }),
                "expected parse error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_error_position() {
        match PathExpr::parse("//a[@href='x").unwrap_err() {
            EngineError::InvalidPath { position, .. } => assert_eq!(position, 10),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_matches_descendant_and_child() {
        let mut doc = MemoryDocument::new();
        let html = doc.append(None, "html", &[]);
        let body = doc.append(Some(html), "body", &[]);
        let result = doc.append(Some(body), "div", &[("class", "yuRUbf")]);
        let wrapper = doc.append(Some(result), "span", &[]);
        let link = doc.append(Some(wrapper), "a", &[("href", "https://a.example/")]);
        let bare = doc.append(Some(wrapper), "a", &[]);
        let outside = doc.append(Some(body), "a", &[("href", "https://b.example/")]);

        let results = PathExpr::parse("//div[@class='yuRUbf']//a[@href]").unwrap();
        assert!(results.matches(&doc, &link));
        assert!(!results.matches(&doc, &bare));
        assert!(!results.matches(&doc, &outside));

        let direct = PathExpr::parse("//div[@class='yuRUbf']/a").unwrap();
        assert!(!direct.matches(&doc, &link));

        let anchored = PathExpr::parse("/html/body/a").unwrap();
        assert!(anchored.matches(&doc, &outside));
        assert!(!PathExpr::parse("/body/a").unwrap().matches(&doc, &outside));
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let mut doc = MemoryDocument::new();
        let div = doc.append(None, "DIV", &[("aria-level", "2")]);
        assert!(PathExpr::parse("//div[@aria-level='2']")
            .unwrap()
            .matches(&doc, &div));
        assert!(!PathExpr::parse("//div[@aria-level='3']")
            .unwrap()
            .matches(&doc, &div));
    }
}
