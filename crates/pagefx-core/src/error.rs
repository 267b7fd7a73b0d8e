#![forbid(unsafe_code)]

//! Error type shared by every behavior.
//!
//! Most absences are expected (a page may not ship a mobile menu) and are
//! handled at setup time by skipping the component. The variants here are
//! what remains: failures of an individual operation that the dispatcher
//! logs and swallows so one component never disables another.

use crate::tree::ElementRef;

/// Behavior-layer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    /// A required element for a component is not in the tree.
    MissingElement {
        role: &'static str,
        selector: String,
    },
    /// Navigation target section id does not resolve.
    MissingSection(String),
    /// An accordion item's `data-target` does not resolve to a content element.
    MissingAccordionContent(String),
    /// The handle does not belong to the host's handle table.
    UnknownElement(ElementRef),
    /// Selector outside the supported subset.
    Selector {
        selector: String,
        reason: &'static str,
    },
    /// Invalid or unparsable configuration.
    Config(String),
}

impl core::fmt::Display for BehaviorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingElement { role, selector } => {
                write!(f, "missing {role} element ({selector})")
            }
            Self::MissingSection(id) => write!(f, "target section not found: {id}"),
            Self::MissingAccordionContent(target) => {
                write!(f, "accordion content not found for target: {target}")
            }
            Self::UnknownElement(el) => write!(f, "unknown element handle {}", el.index()),
            Self::Selector { selector, reason } => {
                write!(f, "unsupported selector {selector:?}: {reason}")
            }
            Self::Config(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for BehaviorError {}
