#![forbid(unsafe_code)]

//! Page entry point.
//!
//! [`PageBehaviors::init`] runs once the presentation tree is ready and sets
//! up every behavior in a fixed order. After that the host drives it:
//!
//! - push events with [`PageBehaviors::dispatch`] (clicks carry the element
//!   the listener was attached to, see [`PageBehaviors::click_targets`]),
//! - request an animation frame when an outcome asks for one and deliver
//!   [`PageEvent::AnimationFrame`],
//! - arm a timer for [`PageBehaviors::next_deadline`] and call
//!   [`PageBehaviors::advance`] when it fires.
//!
//! A failing behavior is logged and does not affect the others.

use core::time::Duration;

use tracing::{debug, info, warn};

use crate::accordion::Accordion;
use crate::config::BehaviorConfig;
use crate::error::BehaviorError;
use crate::fade_in::{FadeInObserver, IntersectionEntry};
use crate::hero_fade::HeroFade;
use crate::mobile_menu::MobileMenu;
use crate::motion::{MotionPolicy, apply_motion_guard};
use crate::navigator::{NavBindings, ScrollNavigator};
use crate::phone::PhoneLinks;
use crate::resize::{Reflow, ResizeHandler, update_header_offset};
use crate::subscription::Subscription;
use crate::tree::{ElementRef, Host, PresentationTree};

/// Body marker added once initialization completes.
pub const LOADED_CLASS: &str = "loaded";

/// Host-dispatched events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A click on a registered element.
    Click(ElementRef),
    Scroll,
    Resize,
    AnimationFrame,
    Intersection(Vec<IntersectionEntry>),
}

/// What the host should do after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// Some behavior consumed the event.
    pub handled: bool,
    /// Suppress the element's default action (anchor navigation).
    pub prevent_default: bool,
    /// Schedule one [`PageEvent::AnimationFrame`].
    pub request_frame: bool,
}

fn report(component: &'static str, err: &BehaviorError) {
    warn!(component, %err, "behavior failed");
}

fn probe_sticky_header<T: PresentationTree + ?Sized>(tree: &T, header_id: &str) {
    if tree.element_by_id(header_id).is_some() {
        debug!(header_id, "sticky header active (fixed height)");
    }
}

/// Every page behavior, wired.
#[derive(Debug)]
pub struct PageBehaviors {
    motion: MotionPolicy,
    navigator: ScrollNavigator,
    nav_bindings: NavBindings,
    menu: Option<MobileMenu>,
    fade_in: FadeInObserver,
    hero: Option<HeroFade>,
    accordion: Accordion,
    resize: ResizeHandler,
    phones: PhoneLinks,
    subscriptions: Vec<Subscription>,
    torn_down: bool,
}

impl PageBehaviors {
    /// Set up every behavior against a ready tree.
    pub fn init<H: Host + ?Sized>(
        host: &mut H,
        config: &BehaviorConfig,
        prefers_reduced_motion: bool,
    ) -> Self {
        let names = &config.elements;
        let motion = apply_motion_guard(host, prefers_reduced_motion);
        probe_sticky_header(host, &names.header_id);

        let navigator = ScrollNavigator::new(&names.header_id, &config.navigation, motion);
        let nav_bindings = NavBindings::discover(host, &config.navigation.bindings);

        let menu = MobileMenu::discover(host, &names.menu_toggle, &names.nav_id, &names.nav_link);

        let fade_in = FadeInObserver::discover(host, &config.fade_in);
        let hero = HeroFade::discover(
            host,
            &names.hero_title,
            config.hero.threshold_px,
            config.timing.scroll_frame(),
            motion,
        );

        let accordion = Accordion::discover(host, &names.accordion_header, &names.accordion_target_attr);
        let resize = ResizeHandler::new(&names.header_id, config.timing.resize_debounce());
        let phones = PhoneLinks::discover(host, &names.phone_links, &names.phone_cta);

        update_header_offset(host, &names.header_id);
        if let Some(body) = host.body() {
            host.add_class(body, LOADED_CLASS);
        }
        info!(
            reduced_motion = motion.is_reduced(),
            menu = menu.is_some(),
            hero = hero.is_some(),
            panels = accordion.len(),
            sections = fade_in.targets().len(),
            "page behaviors initialized"
        );

        Self {
            motion,
            navigator,
            nav_bindings,
            menu,
            fade_in,
            hero,
            accordion,
            resize,
            phones,
            subscriptions: Vec::new(),
            torn_down: false,
        }
    }

    #[must_use]
    pub const fn motion(&self) -> MotionPolicy {
        self.motion
    }

    #[must_use]
    pub const fn navigator(&self) -> &ScrollNavigator {
        &self.navigator
    }

    #[must_use]
    pub const fn accordion(&self) -> &Accordion {
        &self.accordion
    }

    #[must_use]
    pub const fn mobile_menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    #[must_use]
    pub const fn hero_fade(&self) -> Option<&HeroFade> {
        self.hero.as_ref()
    }

    #[must_use]
    pub const fn fade_in(&self) -> &FadeInObserver {
        &self.fade_in
    }

    pub fn fade_in_mut(&mut self) -> &mut FadeInObserver {
        &mut self.fade_in
    }

    #[must_use]
    pub const fn resize(&self) -> &ResizeHandler {
        &self.resize
    }

    /// Whether the host should listen for scroll events at all.
    #[must_use]
    pub const fn wants_scroll(&self) -> bool {
        self.hero.is_some()
    }

    /// Elements that need a click listener, deduplicated, in wiring order.
    #[must_use]
    pub fn click_targets(&self) -> Vec<ElementRef> {
        let menu = self.menu.iter().flat_map(|m| {
            std::iter::once(m.toggle_element()).chain(m.links().iter().copied())
        });
        let mut out: Vec<ElementRef> = Vec::new();
        for el in self
            .nav_bindings
            .elements()
            .chain(menu)
            .chain(self.accordion.headers())
            .chain(self.phones.elements())
        {
            if !out.contains(&el) {
                out.push(el);
            }
        }
        out
    }

    /// Keep a host registration alive until teardown.
    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Deliver one event.
    pub fn dispatch<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: PageEvent,
        now: Duration,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        if self.torn_down {
            return outcome;
        }
        match event {
            PageEvent::Click(el) => self.click(host, el, &mut outcome),
            PageEvent::Scroll => {
                if let Some(hero) = self.hero.as_mut() {
                    outcome.handled = true;
                    outcome.request_frame = hero.on_scroll(now);
                }
            }
            PageEvent::AnimationFrame => {
                if let Some(hero) = self.hero.as_mut() {
                    let scroll_y = host.scroll_y();
                    outcome.handled = hero.on_frame(host, scroll_y).is_some();
                }
            }
            PageEvent::Resize => {
                self.resize.on_resize(now);
                outcome.handled = true;
            }
            PageEvent::Intersection(entries) => {
                outcome.handled = self.fade_in.on_entries(host, &entries) > 0;
            }
        }
        outcome
    }

    fn click<H: Host + ?Sized>(&mut self, host: &mut H, el: ElementRef, outcome: &mut DispatchOutcome) {
        if let Some(result) = self.nav_bindings.on_click(host, &self.navigator, el) {
            outcome.handled = true;
            outcome.prevent_default = true;
            if let Err(err) = result {
                report("navigation", &err);
            }
        }
        if let Some(menu) = self.menu.as_mut() {
            outcome.handled |= menu.on_click(host, el).is_some();
        }
        if let Some(result) = self.accordion.on_header_click(host, el) {
            outcome.handled = true;
            if let Err(err) = result {
                report("accordion", &err);
            }
        }
        outcome.handled |= self.phones.on_click(el);
    }

    /// Fire deferred work that is due at `now`.
    pub fn advance<H: Host + ?Sized>(&mut self, host: &mut H, now: Duration) -> Option<Reflow> {
        if self.torn_down {
            return None;
        }
        self.resize.poll(host, &self.accordion, now)
    }

    /// Earliest instant at which [`PageBehaviors::advance`] has work.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.resize.deadline()
    }

    /// Release every host registration and cancel deferred work.
    ///
    /// Marker classes stay as they are; later events are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.fade_in.unobserve_all();
        while let Some(subscription) = self.subscriptions.pop() {
            subscription.cancel();
        }
        self.resize.cancel();
        self.torn_down = true;
        info!("page behaviors torn down");
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementTemplate, MemoryPage};

    fn minimal() -> MemoryPage {
        let mut page = MemoryPage::new(800.0);
        let body = page.body_ref();
        page.append(body, ElementTemplate::new("header").id("main-header").height(110.0));
        page
    }

    #[test]
    fn init_marks_body_loaded_and_publishes_header() {
        let mut page = minimal();
        let behaviors = PageBehaviors::init(&mut page, &BehaviorConfig::default(), false);
        assert!(page.has_class(page.body_ref(), LOADED_CLASS));
        assert_eq!(page.root_style("--header-height"), Some("110px"));
        assert_eq!(behaviors.motion(), MotionPolicy::Full);
        assert!(behaviors.click_targets().is_empty());
        assert!(!behaviors.wants_scroll());
    }

    #[test]
    fn unknown_clicks_are_unhandled() {
        let mut page = minimal();
        let mut behaviors = PageBehaviors::init(&mut page, &BehaviorConfig::default(), false);
        let body = page.body_ref();
        let outcome = behaviors.dispatch(&mut page, PageEvent::Click(body), Duration::ZERO);
        assert_eq!(outcome, DispatchOutcome::default());
    }

    #[test]
    fn teardown_silences_events_and_releases_holds() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut page = minimal();
        let mut behaviors = PageBehaviors::init(&mut page, &BehaviorConfig::default(), false);
        let released = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let counter = Rc::clone(&released);
            behaviors.hold(Subscription::new("listener", move || counter.set(counter.get() + 1)));
        }
        behaviors.dispatch(&mut page, PageEvent::Resize, Duration::ZERO);
        behaviors.teardown();
        assert_eq!(released.get(), 2);
        assert_eq!(behaviors.next_deadline(), None);
        let outcome = behaviors.dispatch(&mut page, PageEvent::Resize, Duration::ZERO);
        assert!(!outcome.handled);
        assert!(behaviors.advance(&mut page, Duration::from_secs(5)).is_none());
    }
}
