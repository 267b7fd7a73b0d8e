#![forbid(unsafe_code)]

//! End-to-end behavior of `PageBehaviors` against the practice site fixture.
//!
//! Run:
//!   cargo test -p pagefx-core --test page_lifecycle

mod common;

use core::time::Duration;

use pagefx_core::accordion::ACTIVE_CLASS;
use pagefx_core::fade_in::{CANDIDATE_CLASS, VISIBLE_CLASS};
use pagefx_core::hero_fade::FADE_OUT_CLASS;
use pagefx_core::motion::REDUCED_MOTION_CLASS;
use pagefx_core::page::LOADED_CLASS;
use pagefx_core::resize::HEADER_HEIGHT_PROPERTY;
use pagefx_core::tree::{ScrollBehavior, ScrollRequest};
use pagefx_core::{
    BehaviorConfig, DispatchOutcome, ElementRef, PageBehaviors, PageEvent, PresentationTree,
};
use pretty_assertions::assert_eq;

use common::{Site, site, site_without_menu};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn init(site: &mut Site, reduced: bool) -> PageBehaviors {
    PageBehaviors::init(&mut site.page, &BehaviorConfig::default(), reduced)
}

fn click(site: &mut Site, behaviors: &mut PageBehaviors, el: ElementRef) -> DispatchOutcome {
    behaviors.dispatch(&mut site.page, PageEvent::Click(el), Duration::ZERO)
}

#[test]
fn init_wires_every_behavior() {
    let mut s = site();
    let behaviors = init(&mut s, false);

    let body = s.page.body_ref();
    assert!(s.page.has_class(body, LOADED_CLASS));
    assert!(!s.page.has_class(body, REDUCED_MOTION_CLASS));
    assert_eq!(s.page.root_style(HEADER_HEIGHT_PROPERTY), Some("120px"));
    for &section in &s.sections {
        assert!(s.page.has_class(section, CANDIDATE_CLASS));
    }
    assert!(behaviors.mobile_menu().is_some());
    assert!(behaviors.hero_fade().is_some());
    assert_eq!(behaviors.accordion().len(), 3);

    let mut expected = vec![s.nav_dr, s.nav_contact, s.book_now, s.toggle.unwrap()];
    expected.extend(&s.accordion_headers);
    expected.extend([s.phone_cta, s.phone_link]);
    assert_eq!(behaviors.click_targets(), expected);
}

#[test]
fn navigation_modes_land_where_expected() {
    let mut s = site();
    let mut behaviors = init(&mut s, false);

    let contact = s.nav_contact;
    let outcome = click(&mut s, &mut behaviors, contact);
    assert!(outcome.handled && outcome.prevent_default);

    let dr = s.nav_dr;
    click(&mut s, &mut behaviors, dr);
    let book = s.book_now;
    click(&mut s, &mut behaviors, book);

    let smooth = |top| ScrollRequest {
        top,
        behavior: ScrollBehavior::Smooth,
    };
    assert_eq!(
        s.page.scroll_log(),
        &[
            // 3200 - 120 - (800 - 500) / 2 + 50
            smooth(2_980.0),
            // 700 - 120 - 20
            smooth(560.0),
            // 3200 - 120 - 20
            smooth(3_060.0),
        ]
    );
}

#[test]
fn menu_link_navigates_and_closes_drawer() {
    let mut s = site();
    let mut behaviors = init(&mut s, false);
    let toggle = s.toggle.unwrap();
    let nav = s.nav.unwrap();

    click(&mut s, &mut behaviors, toggle);
    assert!(s.page.has_class(toggle, ACTIVE_CLASS));
    assert!(s.page.has_class(nav, ACTIVE_CLASS));

    let link = s.nav_contact;
    click(&mut s, &mut behaviors, link);
    assert!(!s.page.has_class(toggle, ACTIVE_CLASS));
    assert!(!s.page.has_class(nav, ACTIVE_CLASS));
    assert!(!behaviors.mobile_menu().unwrap().is_open());
    assert_eq!(s.page.scroll_log().len(), 1);
}

#[test]
fn accordion_keeps_a_single_open_panel() {
    let mut s = site();
    let mut behaviors = init(&mut s, false);
    let h = s.accordion_headers.clone();

    for &header in &[h[0], h[1], h[1], h[2], h[0]] {
        click(&mut s, &mut behaviors, header);
        let open = s
            .accordion_items
            .iter()
            .filter(|&&item| s.page.has_class(item, ACTIVE_CLASS))
            .count();
        assert!(open <= 1, "{open} panels open");
    }
    assert_eq!(behaviors.accordion().open_panel(), Some(0));
    assert_eq!(s.page.style(s.accordion_contents[0], "max-height"), Some("180px"));
    assert_eq!(s.page.style(s.accordion_contents[2], "max-height"), Some("0"));
}

#[test]
fn hero_fade_is_frame_driven_with_hysteresis() {
    let mut s = site();
    let mut behaviors = init(&mut s, false);
    assert!(behaviors.wants_scroll());

    let step = |s: &mut Site, behaviors: &mut PageBehaviors, y: f64, t: u64| {
        s.page.set_scroll_y(y);
        let outcome = behaviors.dispatch(&mut s.page, PageEvent::Scroll, ms(t));
        if outcome.request_frame {
            behaviors.dispatch(&mut s.page, PageEvent::AnimationFrame, ms(t));
        }
        outcome.request_frame
    };

    assert!(step(&mut s, &mut behaviors, 300.0, 0));
    assert!(s.page.has_class(s.hero_title, FADE_OUT_CLASS));

    // Inside the frame interval: no frame, marker unchanged even below threshold.
    assert!(!step(&mut s, &mut behaviors, 100.0, 8));
    assert!(s.page.has_class(s.hero_title, FADE_OUT_CLASS));

    assert!(step(&mut s, &mut behaviors, 100.0, 40));
    assert!(!s.page.has_class(s.hero_title, FADE_OUT_CLASS));
    assert!(!behaviors.hero_fade().unwrap().is_faded());
}

#[test]
fn reduced_motion_never_animates() {
    let mut s = site();
    let mut behaviors = init(&mut s, true);
    assert!(s.page.has_class(s.page.body_ref(), REDUCED_MOTION_CLASS));
    assert_eq!(s.page.root_style("scroll-behavior"), Some("auto"));
    assert!(behaviors.hero_fade().is_none());

    for el in [s.nav_contact, s.nav_dr, s.book_now] {
        click(&mut s, &mut behaviors, el);
    }
    assert_eq!(s.page.scroll_log().len(), 3);
    assert!(
        s.page
            .scroll_log()
            .iter()
            .all(|r| r.behavior == ScrollBehavior::Immediate)
    );

    s.page.set_scroll_y(900.0);
    let outcome = behaviors.dispatch(&mut s.page, PageEvent::Scroll, ms(0));
    assert!(!outcome.request_frame);
    assert!(!s.page.has_class(s.hero_title, FADE_OUT_CLASS));
}

#[test]
fn resize_burst_recomputes_once() {
    let mut s = site();
    let mut behaviors = init(&mut s, false);
    let first = s.accordion_headers[1];
    click(&mut s, &mut behaviors, first);

    for t in [0, 50, 100, 150, 200] {
        behaviors.dispatch(&mut s.page, PageEvent::Resize, ms(t));
        assert!(behaviors.advance(&mut s.page, ms(t)).is_none());
    }
    assert_eq!(behaviors.next_deadline(), Some(ms(450)));

    s.page.resize_element(s.header, 90.0, 90.0).unwrap();
    s.page.resize_element(s.accordion_contents[1], 0.0, 410.0).unwrap();

    assert!(behaviors.advance(&mut s.page, ms(449)).is_none());
    let reflow = behaviors.advance(&mut s.page, ms(450)).unwrap();
    assert_eq!(reflow.panels_refreshed, 1);
    assert_eq!(reflow.header_height, Some(90.0));
    assert_eq!(behaviors.resize().recomputes(), 1);
    assert_eq!(behaviors.next_deadline(), None);
    assert_eq!(s.page.root_style(HEADER_HEIGHT_PROPERTY), Some("90px"));
    assert_eq!(s.page.style(s.accordion_contents[1], "max-height"), Some("410px"));
}

#[test]
fn sections_fade_in_once_seen() {
    let mut s = site();
    let mut behaviors = init(&mut s, false);

    let entries = behaviors.fade_in().sample(&s.page);
    behaviors.dispatch(&mut s.page, PageEvent::Intersection(entries), ms(0));
    assert!(s.sections.iter().all(|&el| !s.page.has_class(el, VISIBLE_CLASS)));

    s.page.set_scroll_y(500.0);
    let entries = behaviors.fade_in().sample(&s.page);
    let outcome = behaviors.dispatch(&mut s.page, PageEvent::Intersection(entries), ms(0));
    assert!(outcome.handled);
    assert!(s.page.has_class(s.sections[0], VISIBLE_CLASS));

    s.page.set_scroll_y(0.0);
    let entries = behaviors.fade_in().sample(&s.page);
    behaviors.dispatch(&mut s.page, PageEvent::Intersection(entries), ms(0));
    assert!(s.page.has_class(s.sections[0], VISIBLE_CLASS));
}

#[test]
fn missing_menu_leaves_other_behaviors_working() {
    let mut s = site_without_menu();
    let mut behaviors = init(&mut s, false);
    assert!(behaviors.mobile_menu().is_none());

    let link = s.nav_contact;
    let outcome = click(&mut s, &mut behaviors, link);
    assert!(outcome.prevent_default);
    assert_eq!(s.page.scroll_log().len(), 1);

    let header = s.accordion_headers[2];
    click(&mut s, &mut behaviors, header);
    assert!(s.page.has_class(s.accordion_items[2], ACTIVE_CLASS));
    assert!(s.page.has_class(s.page.body_ref(), LOADED_CLASS));
}

#[test]
fn missing_navigation_target_is_contained() {
    let mut s = site();
    let mut config = BehaviorConfig::default();
    config.navigation.bindings[0].target = "gone".into();
    let mut behaviors = PageBehaviors::init(&mut s.page, &config, false);

    let dr = s.nav_dr;
    let outcome = click(&mut s, &mut behaviors, dr);
    assert!(outcome.handled);
    assert!(s.page.scroll_log().is_empty());

    // The same click still reaches the menu and later clicks still work.
    let header = s.accordion_headers[0];
    click(&mut s, &mut behaviors, header);
    assert!(s.page.has_class(s.accordion_items[0], ACTIVE_CLASS));
}

#[test]
fn contact_section_is_reachable_from_its_id() {
    let s = site();
    assert_eq!(s.page.element_by_id("contact"), Some(s.contact));
}
