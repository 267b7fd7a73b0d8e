#![forbid(unsafe_code)]

//! Browser-independent startup helpers.
//!
//! These are compiled on every target so the startup rules are tested
//! natively; the `wasm32` runtime calls them with values read from the DOM.

use core::time::Duration;

use pagefx_core::{BehaviorConfig, BehaviorError};

pub use pagefx_core::motion::REDUCED_MOTION_QUERY;

/// `document.readyState`, reduced to what startup cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// Unknown values are treated as fully loaded.
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state {
            "loading" => Self::Loading,
            "interactive" => Self::Interactive,
            _ => Self::Complete,
        }
    }

    /// Whether behaviors may be initialized right away instead of on
    /// `DOMContentLoaded`.
    #[must_use]
    pub const fn can_init(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Resolve the startup configuration.
///
/// `None` or a blank document yields the defaults.
pub fn load_config(json: Option<&str>) -> Result<BehaviorConfig, BehaviorError> {
    match json.map(str::trim).filter(|doc| !doc.is_empty()) {
        Some(doc) => BehaviorConfig::from_json_str(doc),
        None => Ok(BehaviorConfig::default()),
    }
}

/// `setTimeout` delay for a deadline, rounded up to whole milliseconds.
#[must_use]
pub fn timeout_ms(deadline: Duration, now: Duration) -> i32 {
    let micros = deadline.saturating_sub(now).as_micros();
    i32::try_from(micros.div_ceil(1_000)).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_loading_defers_init() {
        assert!(!ReadyState::parse("loading").can_init());
        assert!(ReadyState::parse("interactive").can_init());
        assert!(ReadyState::parse("complete").can_init());
        assert_eq!(ReadyState::parse("prerender"), ReadyState::Complete);
    }

    #[test]
    fn blank_config_means_defaults() {
        assert_eq!(load_config(None).unwrap(), BehaviorConfig::default());
        assert_eq!(load_config(Some("  ")).unwrap(), BehaviorConfig::default());
    }

    #[test]
    fn partial_json_overrides_one_field() {
        let config = load_config(Some(r#"{"hero": {"threshold_px": 320.0}}"#)).unwrap();
        assert_eq!(config.hero.threshold_px, 320.0);
        assert_eq!(config.timing, BehaviorConfig::default().timing);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = load_config(Some("{ not json")).unwrap_err();
        assert!(matches!(err, BehaviorError::Config(_)), "{err}");
        let err = load_config(Some(r#"{"fade_in": {"threshold": 3.0}}"#)).unwrap_err();
        assert!(err.to_string().contains("fade_in.threshold"), "{err}");
    }

    #[test]
    fn timeout_rounds_up_and_saturates() {
        let ms = Duration::from_millis;
        assert_eq!(timeout_ms(ms(250), ms(0)), 250);
        assert_eq!(timeout_ms(ms(250), ms(300)), 0);
        assert_eq!(timeout_ms(Duration::from_micros(1_001), Duration::ZERO), 2);
        assert_eq!(timeout_ms(Duration::MAX, Duration::ZERO), i32::MAX);
    }
}
