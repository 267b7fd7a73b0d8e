#![forbid(unsafe_code)]

//! Browser adapter for the pagefx page behaviors.
//!
//! On `wasm32` the module start function wires [`pagefx_core::PageBehaviors`]
//! to the live document: click, scroll and resize listeners, an
//! `IntersectionObserver` for section fade-in, one timeout for debounced
//! work, and animation frames for the hero fade. Logging goes to the browser
//! console through `tracing`.
//!
//! JavaScript surface:
//!
//! - module start: initialize with the default configuration,
//! - `startWithConfig(json)`: restart with a JSON configuration document,
//! - `teardown()`: release every registration,
//! - `isRunning()`.
//!
//! On other targets only the startup helpers in [`boot`] are compiled.

pub mod boot;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::DomHost;
#[cfg(target_arch = "wasm32")]
pub use wasm::{is_running, start, start_with_config, teardown};
