#![forbid(unsafe_code)]

//! The CSS selector subset understood by headless hosts.
//!
//! Browser hosts hand selectors straight to `querySelectorAll`; the in-memory
//! host matches them with [`Selector`]. The subset covers what page behaviors
//! need:
//!
//! - type selectors (`a`, `section`)
//! - `#id` and `.class` (compoundable: `.accordion-item.active`)
//! - attribute presence `[data-target]`, equality `[href="#contact"]` and
//!   prefix `[href^="tel:"]`
//! - the descendant combinator (whitespace)
//!
//! Anything else is rejected at parse time so configuration errors surface
//! during validation instead of as silent non-matches.

use crate::error::BehaviorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub matcher: AttrMatch,
}

/// One compound selector: every part must match the same element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrSelector>,
}

/// The element facts a compound is matched against.
pub trait SelectorSubject {
    fn tag(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl Compound {
    #[must_use]
    pub fn matches<S: SelectorSubject + ?Sized>(&self, subject: &S) -> bool {
        if let Some(tag) = &self.tag {
            if !subject.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if subject.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| subject.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|attr| {
            let Some(value) = subject.attribute(&attr.name) else {
                return false;
            };
            match &attr.matcher {
                AttrMatch::Exists => true,
                AttrMatch::Equals(expected) => value == expected,
                AttrMatch::Prefix(prefix) => value.starts_with(prefix.as_str()),
            }
        })
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }
}

/// A parsed descendant-combinator chain, outermost ancestor first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, BehaviorError> {
        let err = |reason| BehaviorError::Selector {
            selector: source.to_owned(),
            reason,
        };
        let mut parser = Parser {
            chars: source.trim().chars().peekable(),
        };
        let mut parts = Vec::new();
        loop {
            parser.skip_whitespace();
            if parser.chars.peek().is_none() {
                break;
            }
            let compound = parser.compound().map_err(err)?;
            if compound.is_empty() {
                return Err(err("unexpected character"));
            }
            parts.push(compound);
        }
        if parts.is_empty() {
            return Err(err("empty selector"));
        }
        Ok(Self { parts })
    }

    /// The compound that must match the element itself.
    #[must_use]
    pub fn subject(&self) -> &Compound {
        // `parse` guarantees at least one part.
        &self.parts[self.parts.len() - 1]
    }

    /// Match `subject` with its ancestors given innermost first.
    ///
    /// Greedy right-to-left matching is exact for descendant-only chains.
    pub fn matches<'a, S, I>(&self, subject: &S, ancestors: I) -> bool
    where
        S: SelectorSubject + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        if !self.subject().matches(subject) {
            return false;
        }
        let mut pending = self.parts[..self.parts.len() - 1].iter().rev().peekable();
        for ancestor in ancestors {
            let Some(next) = pending.peek() else {
                break;
            };
            if next.matches(ancestor) {
                pending.next();
            }
        }
        pending.peek().is_none()
    }
}

impl core::str::FromStr for Selector {
    type Err = BehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Parser<'a> {
    chars: core::iter::Peekable<core::str::Chars<'a>>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn ident(&mut self) -> Result<String, &'static str> {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        if out.is_empty() {
            Err("expected identifier")
        } else {
            Ok(out)
        }
    }

    fn compound(&mut self) -> Result<Compound, &'static str> {
        let mut compound = Compound::default();
        if self.chars.peek().is_some_and(|&c| is_ident_char(c)) {
            compound.tag = Some(self.ident()?);
        }
        while let Some(&c) = self.chars.peek() {
            match c {
                '#' => {
                    self.chars.next();
                    if compound.id.is_some() {
                        return Err("duplicate id");
                    }
                    compound.id = Some(self.ident()?);
                }
                '.' => {
                    self.chars.next();
                    compound.classes.push(self.ident()?);
                }
                '[' => {
                    self.chars.next();
                    compound.attrs.push(self.attribute()?);
                }
                c if c.is_whitespace() => break,
                _ => return Err("unsupported selector syntax"),
            }
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrSelector, &'static str> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        let matcher = match self.chars.next() {
            Some(']') => return Ok(AttrSelector { name, matcher: AttrMatch::Exists }),
            Some('=') => AttrMatch::Equals(self.attr_value()?),
            Some('^') => {
                if self.chars.next() != Some('=') {
                    return Err("unsupported attribute operator");
                }
                AttrMatch::Prefix(self.attr_value()?)
            }
            Some(_) => return Err("unsupported attribute operator"),
            None => return Err("unterminated attribute selector"),
        };
        self.skip_whitespace();
        if self.chars.next() != Some(']') {
            return Err("unterminated attribute selector");
        }
        Ok(AttrSelector { name, matcher })
    }

    fn attr_value(&mut self) -> Result<String, &'static str> {
        self.skip_whitespace();
        match self.chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                let mut out = String::new();
                loop {
                    match self.chars.next() {
                        Some(c) if c == quote => return Ok(out),
                        Some(c) => out.push(c),
                        None => return Err("unterminated string"),
                    }
                }
            }
            _ => self.ident(),
        }
    }
}
