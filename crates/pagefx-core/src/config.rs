#![forbid(unsafe_code)]

//! Behavior configuration as data.
//!
//! [`BehaviorConfig`] collects every element name, geometry constant and
//! timing window used by the page behaviors. Defaults reproduce the shipped
//! site exactly, so `BehaviorConfig::default()` needs no document at all.
//!
//! # Loading
//!
//! ```toml
//! [navigation]
//! top_padding = 24.0
//!
//! [[navigation.bindings]]
//! selector = ".hero-book-now-btn"
//! target = "contact"
//! mode = "top"
//!
//! [timing]
//! resize_debounce_ms = 300
//! ```
//!
//! ```rust,ignore
//! let config = BehaviorConfig::from_toml_str(source)?;
//! ```
//!
//! Partial documents are fine: missing tables and fields keep their defaults.

use core::time::Duration;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};

use crate::error::BehaviorError;
use crate::navigator::{NavBinding, Positioning};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct BehaviorConfig {
    pub elements: ElementNames,
    pub navigation: NavigationConfig,
    pub fade_in: FadeInConfig,
    pub hero: HeroConfig,
    pub timing: TimingConfig,
}

/// Element ids, selectors and attribute names the page markup provides.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct ElementNames {
    /// Id of the fixed header.
    pub header_id: String,
    /// Id of the navigation drawer.
    pub nav_id: String,
    pub menu_toggle: String,
    /// Links inside the drawer that close it.
    pub nav_link: String,
    pub accordion_header: String,
    /// Attribute on the accordion item naming its content element id.
    pub accordion_target_attr: String,
    pub hero_title: String,
    pub phone_cta: String,
    pub phone_links: String,
}

impl Default for ElementNames {
    fn default() -> Self {
        Self {
            header_id: "main-header".into(),
            nav_id: "main-nav".into(),
            menu_toggle: ".mobile-menu-toggle".into(),
            nav_link: ".nav-link".into(),
            accordion_header: ".accordion-header".into(),
            accordion_target_attr: "data-target".into(),
            hero_title: ".hero-title-overlay".into(),
            phone_cta: ".cta-phone-button".into(),
            phone_links: r#"a[href^="tel:"]"#.into(),
        }
    }
}

/// Scroll navigator geometry and click bindings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct NavigationConfig {
    /// Header height assumed when the header element is absent.
    pub fallback_header_height: f64,
    /// Breathing room above a section in `top`/`default` mode.
    pub top_padding: f64,
    /// Added back after centering a section in `center` mode.
    pub center_correction: f64,
    pub bindings: Vec<NavBinding>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            fallback_header_height: 122.5,
            top_padding: 20.0,
            center_correction: 50.0,
            bindings: vec![
                NavBinding::new(r##"a[href="#dr-leung"]"##, "dr-leung", Positioning::Default),
                NavBinding::new(r##"a[href="#contact"]"##, "contact", Positioning::Center),
                NavBinding::new(".hero-book-now-btn", "contact", Positioning::Top),
            ],
        }
    }
}

/// Intersection-driven fade-in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct FadeInConfig {
    pub sections: Vec<String>,
    /// Visible fraction required to count as intersecting.
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport.
    pub bottom_margin_px: f64,
}

impl Default for FadeInConfig {
    fn default() -> Self {
        Self {
            sections: vec![
                ".dr-leung-section".into(),
                ".first-visit-section".into(),
                ".location-section".into(),
                ".contact-section".into(),
            ],
            threshold: 0.1,
            bottom_margin_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct HeroConfig {
    /// Scroll offset past which the hero title fades out.
    pub threshold_px: f64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self { threshold_px: 200.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct TimingConfig {
    pub resize_debounce_ms: u64,
    /// Minimum spacing between scroll-driven frames.
    pub scroll_frame_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 250,
            scroll_frame_ms: 16,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    #[must_use]
    pub const fn scroll_frame(&self) -> Duration {
        Duration::from_millis(self.scroll_frame_ms)
    }
}

fn check_length(name: &str, value: f64) -> Result<(), BehaviorError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BehaviorError::Config(format!(
            "{name} must be a finite non-negative length, got {value}"
        )))
    }
}

// Selector syntax is checked by the host at query time.
fn check_non_empty(name: &str, value: &str) -> Result<(), BehaviorError> {
    if value.trim().is_empty() {
        Err(BehaviorError::Config(format!("{name} must not be empty")))
    } else {
        Ok(())
    }
}

impl BehaviorConfig {
    /// Reject values no page could mean.
    pub fn validate(&self) -> Result<(), BehaviorError> {
        let e = &self.elements;
        check_non_empty("elements.header_id", &e.header_id)?;
        check_non_empty("elements.nav_id", &e.nav_id)?;
        check_non_empty("elements.accordion_target_attr", &e.accordion_target_attr)?;
        for (name, selector) in [
            ("elements.menu_toggle", &e.menu_toggle),
            ("elements.nav_link", &e.nav_link),
            ("elements.accordion_header", &e.accordion_header),
            ("elements.hero_title", &e.hero_title),
            ("elements.phone_cta", &e.phone_cta),
            ("elements.phone_links", &e.phone_links),
        ] {
            check_non_empty(name, selector)?;
        }

        let n = &self.navigation;
        check_length("navigation.fallback_header_height", n.fallback_header_height)?;
        check_length("navigation.top_padding", n.top_padding)?;
        if !n.center_correction.is_finite() {
            return Err(BehaviorError::Config(
                "navigation.center_correction must be finite".into(),
            ));
        }
        for binding in &n.bindings {
            check_non_empty("navigation.bindings.selector", &binding.selector)?;
            check_non_empty("navigation.bindings.target", &binding.target)?;
        }

        let f = &self.fade_in;
        for section in &f.sections {
            check_non_empty("fade_in.sections", section)?;
        }
        if !(f.threshold.is_finite() && (0.0..=1.0).contains(&f.threshold)) {
            return Err(BehaviorError::Config(format!(
                "fade_in.threshold must be within 0..=1, got {}",
                f.threshold
            )));
        }
        check_length("fade_in.bottom_margin_px", f.bottom_margin_px)?;
        check_length("hero.threshold_px", self.hero.threshold_px)?;
        Ok(())
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, BehaviorError> {
        let config: Self =
            toml::from_str(s).map_err(|err| BehaviorError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, BehaviorError> {
        let config: Self =
            serde_json::from_str(s).map_err(|err| BehaviorError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "config-files")]
    pub fn to_toml_string(&self) -> Result<String, BehaviorError> {
        toml::to_string_pretty(self).map_err(|err| BehaviorError::Config(err.to_string()))
    }
}
