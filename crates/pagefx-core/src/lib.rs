#![forbid(unsafe_code)]

//! `pagefx-core` holds the behavior layer of a single-page site, independent
//! of any browser binding.
//!
//! Design goals:
//! - **Host-driven**: the embedding environment pushes events
//!   ([`page::PageEvent`]) and advances a monotonic clock explicitly.
//! - **Explicit state**: each behavior owns its state (open panel, menu flag,
//!   fade latch, pending debounce) and writes it through to marker classes.
//! - **Isolated failures**: a missing element disables one behavior, never
//!   the page.
//!
//! The host seam is [`tree::PresentationTree`] + [`tree::Viewport`].
//! `pagefx-web` implements it over `web-sys`; [`memory::MemoryPage`]
//! implements it in memory for tests and headless replay.

pub mod accordion;
pub mod config;
pub mod error;
pub mod fade_in;
pub mod hero_fade;
pub mod memory;
pub mod mobile_menu;
pub mod motion;
pub mod navigator;
pub mod page;
pub mod phone;
pub mod resize;
pub mod selector;
pub mod subscription;
pub mod timing;
pub mod tree;

pub use config::BehaviorConfig;
pub use error::BehaviorError;
pub use page::{DispatchOutcome, PageBehaviors, PageEvent};
pub use tree::{ElementRef, Host, PresentationTree, Viewport};
