// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! WebAssembly bindings for the search box.
//!
//! This is the browser-facing API. It looks up the input and results
//! container, builds one controller, and wires DOM events into it:
//!
//! ```js
//! const box = new SearchBox({ endpoint: "/api/search", debounceMs: 250 });
//! box.attach();       // binds listeners
//! box.isVisible();    // false until results arrive
//! box.detach();       // removes listeners, cancels timer + request
//! ```
//!
//! The controller lives in an `Rc<RefCell<..>>` owned by the `SearchBox`.
//! Timers, fetch continuations and listeners only hold `Weak` references, so
//! dropping the box (or calling `detach`) tears everything down.

use crate::config::WidgetConfig;
use crate::controller::SearchController;
use crate::debounce::{Scheduler, Ticket};
use crate::error::{FetchError, WidgetError};
use crate::panel::View;
use crate::render::Markup;
use crate::request::{CancelHandle, RequestId, Transport};
use crate::types::Key;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AbortController, Document, DomException, Element, Event, EventTarget, HtmlElement,
    HtmlInputElement, KeyboardEvent, Node, RequestInit, Response, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

type Controller = SearchController<DomScheduler, FetchTransport, DomView>;
type Owner = Weak<RefCell<Controller>>;

/// Install the panic hook when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();
}

fn to_js(err: WidgetError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn dom_error(value: JsValue) -> WidgetError {
    WidgetError::Dom(js_message(&value))
}

fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Run `f` against the controller if it is still alive and not mid-step.
fn with_controller<R>(owner: &Owner, f: impl FnOnce(&mut Controller) -> R) -> Option<R> {
    let shared = owner.upgrade()?;
    let Ok(mut controller) = shared.try_borrow_mut() else {
        trace!("controller busy, event dropped");
        return None;
    };
    Some(f(&mut controller))
}

// ============================================================================
// SCHEDULER: setTimeout / clearTimeout
// ============================================================================

struct Timer {
    ticket: Ticket,
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

struct DomScheduler {
    window: Window,
    owner: Owner,
    timer: Option<Timer>,
}

impl DomScheduler {
    fn new(window: Window, owner: Owner) -> Self {
        Self {
            window,
            owner,
            timer: None,
        }
    }

    fn clear(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.window.clear_timeout_with_handle(timer.id);
        }
    }
}

impl Scheduler for DomScheduler {
    fn schedule(&mut self, ticket: Ticket, delay: Duration) {
        self.clear();
        let owner = self.owner.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            with_controller(&owner, |c| c.on_debounce_elapsed(ticket));
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(id) => {
                self.timer = Some(Timer {
                    ticket,
                    id,
                    _callback: callback,
                })
            }
            Err(e) => warn!(error = %js_message(&e), "setTimeout failed"),
        }
    }

    fn cancel(&mut self, ticket: Ticket) {
        if self.timer.as_ref().is_some_and(|t| t.ticket == ticket) {
            self.clear();
        }
    }
}

impl Drop for DomScheduler {
    fn drop(&mut self) {
        self.clear();
    }
}

// ============================================================================
// TRANSPORT: fetch + AbortController
// ============================================================================

struct AbortHandle(Option<AbortController>);

impl CancelHandle for AbortHandle {
    fn cancel(&self) {
        if let Some(controller) = &self.0 {
            controller.abort();
        }
    }
}

struct FetchTransport {
    window: Window,
    owner: Owner,
}

impl Transport for FetchTransport {
    type Handle = AbortHandle;

    fn fetch(&mut self, id: RequestId, url: &str) -> AbortHandle {
        let abort = AbortController::new().ok();
        let init = RequestInit::new();
        init.set_method("GET");
        if let Some(abort) = &abort {
            init.set_signal(Some(&abort.signal()));
        }
        let promise = self.window.fetch_with_str_and_init(url, &init);
        let owner = self.owner.clone();
        spawn_local(async move {
            let result = read_body(promise).await;
            with_controller(&owner, |c| c.on_response(id, result));
        });
        AbortHandle(abort)
    }
}

async fn read_body(promise: js_sys::Promise) -> Result<String, FetchError> {
    let response: Response = JsFuture::from(promise)
        .await
        .map_err(fetch_error)?
        .dyn_into()
        .map_err(fetch_error)?;
    if !response.ok() {
        debug!(status = response.status(), "search endpoint returned an error status");
    }
    let text = JsFuture::from(response.text().map_err(fetch_error)?)
        .await
        .map_err(fetch_error)?;
    Ok(text.as_string().unwrap_or_default())
}

fn fetch_error(value: JsValue) -> FetchError {
    match value.dyn_ref::<DomException>() {
        Some(e) if e.name() == "AbortError" => FetchError::Aborted,
        _ => FetchError::Network(js_message(&value)),
    }
}

// ============================================================================
// VIEW: DOM mutations
// ============================================================================

struct DomView {
    document: Document,
    input: HtmlInputElement,
    results: HtmlElement,
    active_class: String,
    highlight_class: String,
    smooth_scroll: bool,
}

impl DomView {
    fn item(&self, index: Option<usize>) -> Option<Element> {
        let selector = format!("[data-index=\"{}\"]", index?);
        self.results.query_selector(&selector).ok().flatten()
    }
}

impl View for DomView {
    fn render(&mut self, markup: &Markup) {
        self.results.set_inner_html(markup.as_str());
    }

    fn clear(&mut self) {
        self.results.set_inner_html("");
    }

    fn set_visible(&mut self, visible: bool) {
        if let Some(root) = self.document.document_element() {
            let _ = root
                .class_list()
                .toggle_with_force(&self.active_class, visible);
        }
        let expanded = if visible { "true" } else { "false" };
        let _ = self.results.set_attribute("aria-expanded", expanded);
    }

    fn set_highlight(&mut self, previous: Option<usize>, current: Option<usize>) {
        if let Some(el) = self.item(previous) {
            let _ = el.class_list().remove_1(&self.highlight_class);
            let _ = el.set_attribute("aria-selected", "false");
        }
        if let Some(el) = self.item(current) {
            let _ = el.class_list().add_1(&self.highlight_class);
            let _ = el.set_attribute("aria-selected", "true");
        }
    }

    fn scroll_into_view(&mut self, index: usize) {
        if let Some(el) = self.item(Some(index)) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(if self.smooth_scroll {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            });
            options.set_block(ScrollLogicalPosition::Nearest);
            el.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn scroll_to_top(&mut self) {
        self.results.set_scroll_top(0);
    }

    fn clear_input(&mut self) {
        self.input.set_value("");
    }

    fn blur_input(&mut self) {
        let _ = self.input.blur();
    }

    fn navigate(&mut self, url: &str) {
        if let Some(window) = self.document.default_view() {
            if let Err(e) = window.location().set_href(url) {
                warn!(error = %js_message(&e), "navigation failed");
            }
        }
    }
}

/// Whether the browser understands `scroll-behavior: smooth`.
fn supports_smooth_scroll(document: &Document) -> bool {
    document
        .document_element()
        .and_then(|root| root.dyn_into::<HtmlElement>().ok())
        .map(|root| {
            js_sys::Reflect::has(&root.style(), &JsValue::from_str("scrollBehavior"))
                .unwrap_or(false)
        })
        .unwrap_or(false)
}

// ============================================================================
// LISTENERS
// ============================================================================

/// An event listener that removes itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        kind: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, WidgetError> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// One pending `requestAnimationFrame` for hover updates.
struct AnimationFrame {
    window: Window,
    pending: Cell<Option<i32>>,
    callback: Closure<dyn FnMut()>,
}

impl AnimationFrame {
    fn new(window: Window, owner: Owner) -> Rc<Self> {
        Rc::new_cyclic(|me: &Weak<AnimationFrame>| {
            let me = me.clone();
            let callback = Closure::<dyn FnMut()>::new(move || {
                if let Some(frame) = me.upgrade() {
                    frame.pending.set(None);
                }
                with_controller(&owner, |c| c.on_animation_frame());
            });
            AnimationFrame {
                window,
                pending: Cell::new(None),
                callback,
            }
        })
    }

    fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending.set(Some(id)),
            Err(e) => debug!(error = %js_message(&e), "requestAnimationFrame failed"),
        }
    }

    fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

/// Everything that exists only while attached.
struct Attached {
    controller: Rc<RefCell<Controller>>,
    frame: Rc<AnimationFrame>,
    listeners: Vec<Listener>,
}

impl Drop for Attached {
    fn drop(&mut self) {
        self.listeners.clear();
        self.frame.cancel();
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.dismiss();
            controller.shutdown();
        }
    }
}

fn element<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T, WidgetError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WidgetError::MissingElement { id: id.to_string() })?
        .dyn_into::<T>()
        .map_err(|_| WidgetError::WrongElementType {
            id: id.to_string(),
            expected,
        })
}

fn attach(config: &WidgetConfig) -> Result<Attached, WidgetError> {
    let window = web_sys::window().ok_or(WidgetError::NoWindow)?;
    let document = window.document().ok_or(WidgetError::NoWindow)?;
    let input: HtmlInputElement = element(&document, &config.input_id, "an <input>")?;
    let results: HtmlElement = element(&document, &config.results_id, "an HTML element")?;

    let mut config = config.clone();
    if config.version.is_none() {
        config.version = input.get_attribute("data-docs-version");
    }

    let view = DomView {
        document: document.clone(),
        input: input.clone(),
        results: results.clone(),
        active_class: config.active_class.clone(),
        highlight_class: config.highlight_class.clone(),
        smooth_scroll: supports_smooth_scroll(&document),
    };
    let controller = Rc::new_cyclic(|owner: &Owner| {
        RefCell::new(SearchController::new(
            &config,
            DomScheduler::new(window.clone(), owner.clone()),
            FetchTransport {
                window: window.clone(),
                owner: owner.clone(),
            },
            view,
        ))
    });
    let owner = Rc::downgrade(&controller);
    let frame = AnimationFrame::new(window.clone(), owner.clone());

    let mut listeners = Vec::with_capacity(5);

    listeners.push(Listener::new(&input, "input", {
        let owner = owner.clone();
        let input = input.clone();
        move |_| {
            let raw = input.value();
            with_controller(&owner, |c| c.on_input(&raw));
        }
    })?);

    listeners.push(Listener::new(&input, "keydown", {
        let owner = owner.clone();
        move |event: Event| {
            let Some(key) = event
                .dyn_ref::<KeyboardEvent>()
                .map(|e| Key::from_keyboard(&e.key(), e.is_composing()))
            else {
                return;
            };
            if with_controller(&owner, |c| c.on_key(key)) == Some(true) {
                event.prevent_default();
            }
        }
    })?);

    listeners.push(Listener::new(&input, "focus", {
        let owner = owner.clone();
        move |_| {
            with_controller(&owner, |c| c.on_focus());
        }
    })?);

    listeners.push(Listener::new(&results, "pointerover", {
        let owner = owner.clone();
        let frame = Rc::clone(&frame);
        move |event: Event| {
            let Some(index) = hovered_index(&event) else {
                return;
            };
            if with_controller(&owner, |c| c.on_pointer_enter(index)) == Some(true) {
                frame.request();
            }
        }
    })?);

    listeners.push(Listener::new(&document, "pointerdown", {
        let owner = owner.clone();
        let input = input.clone();
        let results = results.clone();
        move |event: Event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside = target
                .as_ref()
                .is_some_and(|node| input.contains(Some(node)) || results.contains(Some(node)));
            if inside {
                return;
            }
            if with_controller(&owner, |c| c.on_pointer_down_outside()) == Some(true) {
                event.prevent_default();
            }
        }
    })?);

    Ok(Attached {
        controller,
        frame,
        listeners,
    })
}

/// `data-index` of the result item under the pointer.
fn hovered_index(event: &Event) -> Option<usize> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let item = target.closest("[data-index]").ok()??;
    item.get_attribute("data-index")?.parse().ok()
}

// ============================================================================
// JS API
// ============================================================================

/// Search box bound to an input and a results container.
#[wasm_bindgen]
pub struct SearchBox {
    config: WidgetConfig,
    attached: Option<Attached>,
}

#[wasm_bindgen]
impl SearchBox {
    /// Create a search box. `options` is an optional object of camelCase
    /// `WidgetConfig` fields; anything omitted keeps its default.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<SearchBox, JsValue> {
        let config: WidgetConfig = if options.is_undefined() || options.is_null() {
            WidgetConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| to_js(WidgetError::InvalidOptions(e.to_string())))?
        };
        config.validate().map_err(to_js)?;
        Ok(SearchBox {
            config,
            attached: None,
        })
    }

    /// Find the elements and start listening.
    #[wasm_bindgen]
    pub fn attach(&mut self) -> Result<(), JsValue> {
        if self.attached.is_some() {
            return Err(to_js(WidgetError::AlreadyAttached));
        }
        let attached = attach(&self.config).map_err(to_js)?;
        web_sys::console::debug_1(&JsValue::from_str(&format!(
            "search box attached to #{}",
            self.config.input_id
        )));
        self.attached = Some(attached);
        Ok(())
    }

    /// Remove every listener and cancel the pending timer and request.
    #[wasm_bindgen]
    pub fn detach(&mut self) {
        if self.attached.take().is_some() {
            web_sys::console::debug_1(&JsValue::from_str("search box detached"));
        }
    }

    /// Hide the results, keeping them for the next focus.
    #[wasm_bindgen]
    pub fn dismiss(&self) {
        if let Some(attached) = &self.attached {
            with_controller(&Rc::downgrade(&attached.controller), |c| c.dismiss());
        }
    }

    #[wasm_bindgen(js_name = "isVisible")]
    pub fn is_visible(&self) -> bool {
        self.attached
            .as_ref()
            .and_then(|a| a.controller.try_borrow().ok().map(|c| c.is_visible()))
            .unwrap_or(false)
    }

    /// Last query that was sent, if any.
    #[wasm_bindgen(js_name = "lastQuery")]
    pub fn last_query(&self) -> Option<String> {
        let attached = self.attached.as_ref()?;
        let controller = attached.controller.try_borrow().ok()?;
        controller.last_query().map(|q| q.as_str().to_string())
    }
}
