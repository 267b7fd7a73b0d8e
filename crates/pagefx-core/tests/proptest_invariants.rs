#![forbid(unsafe_code)]

//! Property-based invariant tests for the page behaviors.
//!
//! 1. Scroll offsets are never negative, whatever the geometry.
//! 2. At most one accordion panel is open after any click sequence.
//! 3. Clicking the same header twice restores the previous state.
//! 4. The hero marker only changes when the scroll offset crosses the threshold.
//! 5. A burst of resizes fires exactly one recompute, `wait` after the last.
//! 6. Revealed sections never lose their marker.

mod common;

use core::time::Duration;

use pagefx_core::accordion::ACTIVE_CLASS;
use pagefx_core::fade_in::{IntersectionEntry, VISIBLE_CLASS};
use pagefx_core::hero_fade::FADE_OUT_CLASS;
use pagefx_core::navigator::{Positioning, ScrollMath};
use pagefx_core::timing::Debouncer;
use pagefx_core::{BehaviorConfig, PageBehaviors, PageEvent, PresentationTree};
use proptest::prelude::*;

use common::site;

// ── Strategies ────────────────────────────────────────────────────────────

fn positioning_strategy() -> impl Strategy<Value = Positioning> {
    prop_oneof![
        Just(Positioning::Top),
        Just(Positioning::Center),
        Just(Positioning::Default),
    ]
}

fn geometry_strategy() -> impl Strategy<Value = ScrollMath> {
    (
        -2_000.0f64..=20_000.0, // target_top
        0.0f64..=5_000.0,       // target_height
        0.0f64..=400.0,         // header_height
        0.0f64..=3_000.0,       // viewport_height
    )
        .prop_map(|(top, height, header, viewport)| ScrollMath {
            target_top: top,
            target_height: height,
            header_height: header,
            viewport_height: viewport,
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Offsets are clamped at zero
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offset_is_never_negative(
        math in geometry_strategy(),
        mode in positioning_strategy(),
        padding in 0.0f64..=100.0,
        correction in -200.0f64..=200.0,
    ) {
        let offset = math.offset(mode, padding, correction);
        prop_assert!(offset >= 0.0, "offset {offset} for {math:?} {mode:?}");
        prop_assert!(offset.is_finite());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2-3. Accordion mutual exclusion and involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn at_most_one_panel_open(clicks in proptest::collection::vec(0usize..3, 0..40)) {
        let mut s = site();
        let mut behaviors = PageBehaviors::init(&mut s.page, &BehaviorConfig::default(), false);
        for i in clicks {
            let header = s.accordion_headers[i];
            behaviors.dispatch(&mut s.page, PageEvent::Click(header), Duration::ZERO);

            let open: Vec<usize> = (0..3)
                .filter(|&p| s.page.has_class(s.accordion_items[p], ACTIVE_CLASS))
                .collect();
            prop_assert!(open.len() <= 1, "open panels: {open:?}");
            prop_assert_eq!(open.first().copied(), behaviors.accordion().open_panel());
        }
    }

    #[test]
    fn double_click_is_identity(
        prefix in proptest::collection::vec(0usize..3, 0..10),
        panel in 0usize..3,
    ) {
        let mut s = site();
        let mut behaviors = PageBehaviors::init(&mut s.page, &BehaviorConfig::default(), false);
        for i in prefix {
            let header = s.accordion_headers[i];
            behaviors.dispatch(&mut s.page, PageEvent::Click(header), Duration::ZERO);
        }
        let before = behaviors.accordion().open_panel();
        // Closing and reopening only round-trips when the panel was the open one
        // or nothing was open.
        prop_assume!(before.is_none() || before == Some(panel));

        let header = s.accordion_headers[panel];
        behaviors.dispatch(&mut s.page, PageEvent::Click(header), Duration::ZERO);
        behaviors.dispatch(&mut s.page, PageEvent::Click(header), Duration::ZERO);
        prop_assert_eq!(behaviors.accordion().open_panel(), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Hero fade hysteresis
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hero_marker_tracks_threshold_side(offsets in proptest::collection::vec(0.0f64..=600.0, 1..30)) {
        let mut s = site();
        let mut behaviors = PageBehaviors::init(&mut s.page, &BehaviorConfig::default(), false);
        let threshold = BehaviorConfig::default().hero.threshold_px;

        for (i, y) in offsets.into_iter().enumerate() {
            // Frames far enough apart that the throttle never drops one.
            let now = Duration::from_millis(i as u64 * 100);
            s.page.set_scroll_y(y);
            let outcome = behaviors.dispatch(&mut s.page, PageEvent::Scroll, now);
            prop_assert!(outcome.request_frame);
            behaviors.dispatch(&mut s.page, PageEvent::AnimationFrame, now);

            let faded = s.page.has_class(s.hero_title, FADE_OUT_CLASS);
            prop_assert_eq!(faded, y > threshold, "offset {}", y);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Debounce coalescing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn burst_fires_once_after_last_trigger(
        gaps in proptest::collection::vec(0u64..250, 1..20),
    ) {
        let wait = Duration::from_millis(250);
        let mut debouncer = Debouncer::new(wait);
        let mut now = Duration::ZERO;
        let mut fired = 0;
        for gap in gaps {
            now += Duration::from_millis(gap);
            if debouncer.poll(now) {
                fired += 1;
            }
            debouncer.trigger(now);
        }
        let last = now;
        prop_assert_eq!(fired, 0);
        prop_assert!(!debouncer.poll(last + wait - Duration::from_millis(1)));
        prop_assert!(debouncer.poll(last + wait));
        prop_assert!(!debouncer.poll(last + wait * 4));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Fade-in is one-way
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn revealed_sections_stay_visible(
        batches in proptest::collection::vec(proptest::collection::vec((0usize..4, any::<bool>()), 0..6), 0..12),
    ) {
        let mut s = site();
        let mut behaviors = PageBehaviors::init(&mut s.page, &BehaviorConfig::default(), false);
        let mut seen = [false; 4];

        for batch in batches {
            let entries: Vec<IntersectionEntry> = batch
                .iter()
                .map(|&(i, is_intersecting)| IntersectionEntry {
                    target: s.sections[i],
                    is_intersecting,
                })
                .collect();
            for &(i, hit) in &batch {
                seen[i] |= hit;
            }
            behaviors.dispatch(&mut s.page, PageEvent::Intersection(entries), Duration::ZERO);

            for (i, &section) in s.sections.iter().enumerate() {
                prop_assert_eq!(s.page.has_class(section, VISIBLE_CLASS), seen[i]);
            }
        }
    }
}
