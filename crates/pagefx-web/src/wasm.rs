#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and the browser event loop glue.
//!
//! The runtime owns a [`DomHost`] and the [`PageBehaviors`] built on it.
//! Every DOM registration (listeners, the intersection observer, the timer
//! and frame callbacks) is wrapped in a [`Subscription`] held by the page,
//! so [`teardown`] releases all of them. Callbacks only hold a weak
//! reference to the runtime.
//!
//! Only compiled on `wasm32` targets.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use pagefx_core::fade_in::IntersectionEntry;
use pagefx_core::subscription::Subscription;
use pagefx_core::{BehaviorConfig, DispatchOutcome, PageBehaviors, PageEvent};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, ErrorEvent, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit,
};
use web_time::Instant;

use crate::boot::{REDUCED_MOTION_QUERY, ReadyState, load_config, timeout_ms};
use crate::console::{install_logging, install_panic_hook};
use crate::dom::DomHost;

thread_local! {
    static CURRENT: RefCell<Option<Shared>> = const { RefCell::new(None) };
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

type Shared = Rc<RefCell<Runtime>>;

struct Runtime {
    host: DomHost,
    page: PageBehaviors,
    epoch: Instant,
    timer: Option<i32>,
    frame: Option<i32>,
    timer_fn: Option<Function>,
    frame_fn: Option<Function>,
}

impl Runtime {
    fn dispatch(&mut self, event: PageEvent) -> DispatchOutcome {
        let now = self.epoch.elapsed();
        let outcome = self.page.dispatch(&mut self.host, event, now);
        if outcome.request_frame {
            self.request_frame();
        }
        self.arm_timer();
        outcome
    }

    fn request_frame(&mut self) {
        if self.frame.is_some() {
            return;
        }
        let Some(frame_fn) = self.frame_fn.as_ref() else {
            return;
        };
        match self.host.window().request_animation_frame(frame_fn) {
            Ok(handle) => self.frame = Some(handle),
            Err(err) => warn!(error = ?err, "requestAnimationFrame failed"),
        }
    }

    /// Point the single timeout at the page's next deadline.
    fn arm_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.host.window().clear_timeout_with_handle(handle);
        }
        let (Some(deadline), Some(timer_fn)) = (self.page.next_deadline(), self.timer_fn.as_ref())
        else {
            return;
        };
        let delay = timeout_ms(deadline, self.epoch.elapsed());
        match self
            .host
            .window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(timer_fn, delay)
        {
            Ok(handle) => self.timer = Some(handle),
            Err(err) => warn!(error = ?err, "setTimeout failed"),
        }
    }

    fn on_timer(&mut self) {
        self.timer = None;
        let now = self.epoch.elapsed();
        if let Some(reflow) = self.page.advance(&mut self.host, now) {
            debug!(?reflow, "reflow applied");
        }
        self.arm_timer();
    }

    fn on_frame(&mut self) {
        self.frame = None;
        self.dispatch(PageEvent::AnimationFrame);
    }

    fn teardown(&mut self) {
        let window = self.host.window().clone();
        if let Some(handle) = self.timer.take() {
            window.clear_timeout_with_handle(handle);
        }
        if let Some(handle) = self.frame.take() {
            let _ = window.cancel_animation_frame(handle);
        }
        self.timer_fn = None;
        self.frame_fn = None;
        self.page.teardown();
    }
}

/// Run `f` on the runtime unless it is gone or already borrowed.
fn with_runtime<R>(weak: &Weak<RefCell<Runtime>>, f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    let shared = weak.upgrade()?;
    let Ok(mut runtime) = shared.try_borrow_mut() else {
        debug!("re-entrant callback skipped");
        return None;
    };
    Some(f(&mut runtime))
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<Subscription, JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    let target = target.clone();
    Ok(Subscription::new(kind, move || {
        let _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        drop(closure);
    }))
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

fn install_scheduler(shared: &Shared) {
    let weak = Rc::downgrade(shared);
    let timer = Closure::<dyn FnMut()>::new(move || {
        with_runtime(&weak, Runtime::on_timer);
    });
    let weak = Rc::downgrade(shared);
    let frame = Closure::<dyn FnMut()>::new(move || {
        with_runtime(&weak, Runtime::on_frame);
    });

    let mut runtime = shared.borrow_mut();
    runtime.timer_fn = Some(timer.as_ref().unchecked_ref::<Function>().clone());
    runtime.frame_fn = Some(frame.as_ref().unchecked_ref::<Function>().clone());
    runtime.page.hold(Subscription::new("timer", move || drop(timer)));
    runtime.page.hold(Subscription::new("animation-frame", move || drop(frame)));
}

fn wire_clicks(shared: &Shared) -> Result<usize, JsValue> {
    let mut runtime = shared.borrow_mut();
    let mut wired = 0;
    for el in runtime.page.click_targets() {
        let Ok(element) = runtime.host.element(el) else {
            continue;
        };
        let weak = Rc::downgrade(shared);
        let subscription = listen(&element, "click", false, move |event| {
            let outcome = with_runtime(&weak, |rt| rt.dispatch(PageEvent::Click(el)));
            if outcome.is_some_and(|o| o.prevent_default) {
                event.prevent_default();
            }
        })?;
        runtime.page.hold(subscription);
        wired += 1;
    }
    Ok(wired)
}

fn wire_window(shared: &Shared) -> Result<(), JsValue> {
    let mut runtime = shared.borrow_mut();
    let window = runtime.host.window().clone();

    if runtime.page.wants_scroll() {
        let weak = Rc::downgrade(shared);
        let scroll = listen(&window, "scroll", true, move |_| {
            with_runtime(&weak, |rt| rt.dispatch(PageEvent::Scroll));
        })?;
        runtime.page.hold(scroll);
    }

    let weak = Rc::downgrade(shared);
    let resize = listen(&window, "resize", true, move |_| {
        with_runtime(&weak, |rt| rt.dispatch(PageEvent::Resize));
    })?;
    runtime.page.hold(resize);

    let errors = listen(&window, "error", false, |event| {
        let message = event
            .dyn_ref::<ErrorEvent>()
            .map_or_else(|| String::from("unknown error"), ErrorEvent::message);
        warn!(%message, "uncaught page error");
    })?;
    runtime.page.hold(errors);
    Ok(())
}

fn observe_sections(shared: &Shared) -> Result<(), JsValue> {
    let mut runtime = shared.borrow_mut();
    let fade_in = runtime.page.fade_in();
    let options = fade_in.options();
    let targets: Vec<_> = fade_in
        .targets()
        .iter()
        .filter_map(|&el| runtime.host.element(el).ok())
        .collect();
    if targets.is_empty() {
        return Ok(());
    }

    let weak = Rc::downgrade(shared);
    let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
        with_runtime(&weak, |rt| {
            let batch = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| IntersectionEntry {
                    target: rt.host.intern(entry.target()),
                    is_intersecting: entry.is_intersecting(),
                })
                .collect();
            rt.dispatch(PageEvent::Intersection(batch));
        });
    });

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin());
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for target in &targets {
        observer.observe(target);
    }
    debug!(sections = targets.len(), margin = %options.root_margin(), "intersection observer attached");

    runtime
        .page
        .fade_in_mut()
        .attach(Subscription::new("intersection-observer", move || {
            observer.disconnect();
            drop(callback);
        }));
    Ok(())
}

fn boot(config: &BehaviorConfig) -> Result<Shared, JsValue> {
    let mut host = DomHost::from_global()?;
    let prefers_reduced_motion = host
        .window()
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    let page = PageBehaviors::init(&mut host, config, prefers_reduced_motion);

    let shared = Rc::new(RefCell::new(Runtime {
        host,
        page,
        epoch: Instant::now(),
        timer: None,
        frame: None,
        timer_fn: None,
        frame_fn: None,
    }));
    install_scheduler(&shared);
    match wire_clicks(&shared) {
        Ok(wired) => debug!(wired, "click listeners attached"),
        Err(err) => warn!(error = ?err, "click wiring failed"),
    }
    if let Err(err) = wire_window(&shared) {
        warn!(error = ?err, "window wiring failed");
    }
    if let Err(err) = observe_sections(&shared) {
        warn!(error = ?err, "intersection observer unavailable");
    }
    Ok(shared)
}

fn install(shared: Shared) {
    CURRENT.with(|current| {
        if let Some(previous) = current.borrow_mut().replace(shared) {
            previous.borrow_mut().teardown();
        }
    });
}

/// Initialize now, or once `DOMContentLoaded` fires while the document is
/// still loading.
fn boot_when_ready(config: BehaviorConfig) -> Result<(), JsValue> {
    let host = DomHost::from_global()?;
    let state = ReadyState::parse(&host.document().ready_state());
    if state.can_init() {
        install(boot(&config)?);
        return Ok(());
    }

    let generation = GENERATION.with(Cell::get);
    let callback = Closure::once_into_js(move || {
        if GENERATION.with(Cell::get) != generation {
            return;
        }
        match boot(&config) {
            Ok(shared) => install(shared),
            Err(err) => warn!(error = ?err, "deferred init failed"),
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    host.document()
        .add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            callback.unchecked_ref(),
            &options,
        )?;
    debug!("waiting for DOMContentLoaded");
    Ok(())
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// Module entry point: installs the panic hook and console logging, then
/// starts the page behaviors with the default configuration.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    install_logging();
    boot_when_ready(BehaviorConfig::default())
}

/// Restart the page behaviors with a JSON configuration document.
///
/// Fields missing from the document keep their defaults. An invalid
/// document leaves the running behaviors untouched.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    let config = load_config(Some(json)).map_err(|err| JsValue::from_str(&err.to_string()))?;
    teardown();
    boot_when_ready(config)
}

/// Release every listener, observer and timer. Marker classes stay as they
/// are.
#[wasm_bindgen]
pub fn teardown() {
    GENERATION.with(|g| g.set(g.get().wrapping_add(1)));
    let current = CURRENT.with(|current| current.borrow_mut().take());
    if let Some(shared) = current {
        shared.borrow_mut().teardown();
        info!("page runtime released");
    }
}

/// Whether behaviors are currently wired to the document.
#[wasm_bindgen(js_name = isRunning)]
pub fn is_running() -> bool {
    CURRENT.with(|current| current.borrow().is_some())
}
