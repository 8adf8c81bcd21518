// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `web-sys` implementation of [`Document`] and the declarative bindings.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use hashbrown::HashMap;
use js_sys::Function;
use kurbo::{Point, Rect};
use smallvec::SmallVec;
use understory_dragdrop::{
    ClassList, Document, DragDrop, DragDropError, DragEventsOptions, DragZoneOptions,
    DropZoneOptions, ElementTree, GeometryProbe, GestureConfig, GestureState, PointerButton,
    PointerEvent, Probe, SourceId, ZoneId, class,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::{Closure, WasmClosure};
use web_sys::{Element, Event, EventTarget, HtmlElement, MouseEvent, Window};

use crate::deferred::Deferred;
use crate::visual::VisualConfig;

type MouseHandler = Closure<dyn FnMut(MouseEvent)>;

fn function<T: WasmClosure + ?Sized>(closure: &Closure<T>) -> &Function {
    closure.as_ref().unchecked_ref()
}

fn apply_style(element: &Element, declarations: &[(&'static str, String)]) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let style = html.style();
        for (property, value) in declarations {
            let _ = style.set_property(property, value);
        }
    }
}

/// Buttons, inputs and textareas. An element that cannot be matched against
/// a selector is not an input control.
pub fn is_input_control(element: &Element) -> bool {
    element.matches("button, input, textarea").unwrap_or(false)
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

fn pointer(event: &MouseEvent, button: PointerButton) -> PointerEvent {
    PointerEvent::at(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        button,
    )
    .with_page(Point::new(
        f64::from(event.page_x()),
        f64::from(event.page_y()),
    ))
}

/// The button a `mousedown`/`mouseup` is about.
fn changed_button(event: &MouseEvent) -> PointerButton {
    match event.button() {
        0 => PointerButton::Primary,
        1 => PointerButton::Auxiliary,
        2 => PointerButton::Secondary,
        n => PointerButton::Other(u16::try_from(n).unwrap_or(u16::MAX)),
    }
}

/// The button held during a `mousemove`; primary wins.
fn held_button(event: &MouseEvent) -> PointerButton {
    let buttons = event.buttons();
    if buttons & 1 != 0 {
        PointerButton::Primary
    } else if buttons & 2 != 0 {
        PointerButton::Secondary
    } else if buttons & 4 != 0 {
        PointerButton::Auxiliary
    } else {
        PointerButton::None
    }
}

/// Event listeners attached to one target; removed on drop.
#[derive(Debug)]
pub struct Listening {
    target: EventTarget,
    entries: SmallVec<[(&'static str, Function); 3]>,
}

impl Listening {
    fn on(target: &EventTarget) -> Self {
        Self {
            target: target.clone(),
            entries: SmallVec::new(),
        }
    }

    fn listen(mut self, kind: &'static str, callback: &Function) -> Self {
        let _ = self.target.add_event_listener_with_callback(kind, callback);
        self.entries.push((kind, callback.clone()));
        self
    }
}

impl Drop for Listening {
    fn drop(&mut self) {
        for (kind, callback) in &self.entries {
            let _ = self
                .target
                .remove_event_listener_with_callback(kind, callback);
        }
    }
}

/// An element the adapter inserted, with its listeners. Removed on drop.
#[derive(Debug)]
struct Inserted {
    element: Element,
    listening: Listening,
}

impl Drop for Inserted {
    fn drop(&mut self) {
        self.element.remove();
    }
}

/// The drag proxy. `None` when it could not be created.
#[derive(Debug)]
pub struct Proxy(Option<Inserted>);

/// The capture overlay. `None` when it could not be created.
#[derive(Debug)]
pub struct Overlay(Option<Inserted>);

/// A pending poll tick; cleared on drop.
#[derive(Debug)]
pub struct Timer {
    window: Window,
    handle: Option<i32>,
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Proxy content used instead of cloning the drag source.
///
/// The content is rendered into a fresh `div` appended to the body.
#[derive(Clone)]
pub enum ProxyTemplate {
    /// Markup assigned to the container's `innerHTML`.
    Html(String),
    /// Called with the container and the drag source to fill the container.
    Render(Rc<dyn Fn(&Element, &Element) -> Result<(), JsValue>>),
}

impl fmt::Debug for ProxyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html(markup) => f.debug_tuple("Html").field(markup).finish(),
            Self::Render(_) => f.write_str("Render(..)"),
        }
    }
}

impl ProxyTemplate {
    fn render(&self, container: &Element, source: &Element) -> Result<(), JsValue> {
        match self {
            Self::Html(markup) => {
                container.set_inner_html(markup);
                Ok(())
            }
            Self::Render(render) => render(container, source),
        }
    }
}

/// The JS callbacks of one drag source, alive from registration until the
/// event after its disposal.
struct SourceHooks {
    attached: Option<Listening>,
    press: MouseHandler,
    armed_move: MouseHandler,
    armed_release: MouseHandler,
    overlay_move: MouseHandler,
    overlay_release: MouseHandler,
    tick: Closure<dyn FnMut()>,
    select: Closure<dyn FnMut(Event)>,
}

impl SourceHooks {
    fn new<D: 'static>(shared: &Weak<Shared<D>>, id: SourceId) -> Self {
        let ticker = shared.clone();
        Self {
            attached: None,
            press: mouse(shared, move |state, event| {
                state
                    .engine
                    .press(&mut state.host, id, &pointer(event, changed_button(event)))
            }),
            armed_move: mouse(shared, move |state, event| {
                let target = event_element(event);
                state.engine.source_move(
                    &mut state.host,
                    id,
                    &pointer(event, held_button(event)),
                    target.as_ref(),
                )
            }),
            armed_release: mouse(shared, move |state, _| {
                state.engine.source_release(&mut state.host, id)
            }),
            overlay_move: mouse(shared, move |state, event| {
                event.stop_propagation();
                event.prevent_default();
                state
                    .engine
                    .overlay_move(&mut state.host, id, &pointer(event, held_button(event)))
            }),
            overlay_release: mouse(shared, move |state, event| {
                event.stop_propagation();
                event.prevent_default();
                state.engine.overlay_release(
                    &mut state.host,
                    id,
                    &pointer(event, changed_button(event)),
                )
            }),
            tick: Closure::new(move || {
                route(&ticker, |state| state.engine.tick(&mut state.host, id));
            }),
            select: Closure::new(|event: Event| {
                if !event_element(&event).is_some_and(|el| is_input_control(&el)) {
                    event.stop_propagation();
                    event.prevent_default();
                }
            }),
        }
    }
}

/// [`Document`] over the browser DOM.
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
    visual: VisualConfig,
    hooks: HashMap<SourceId, SourceHooks>,
    retired: Vec<SourceHooks>,
    selection: Option<Listening>,
    block_select: Closure<dyn FnMut(Event)>,
}

impl fmt::Debug for WebDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDocument")
            .field("visual", &self.visual)
            .field("sources", &self.hooks.len())
            .field("retired", &self.retired.len())
            .field("selection_suppressed", &self.selection.is_some())
            .finish_non_exhaustive()
    }
}

impl WebDocument {
    /// A document over the global `window`.
    pub fn new(visual: VisualConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            window,
            document,
            visual,
            hooks: HashMap::new(),
            retired: Vec::new(),
            selection: None,
            block_select: Closure::new(|event: Event| {
                event.stop_propagation();
                event.prevent_default();
            }),
        })
    }

    fn attach(&mut self, id: SourceId, element: &Element, mut hooks: SourceHooks) {
        hooks.attached = Some(
            Listening::on(element)
                .listen("mousedown", function(&hooks.press))
                .listen("selectstart", function(&hooks.select)),
        );
        self.hooks.insert(id, hooks);
    }

    /// Unhook a source. Its closures may be running right now, so they are
    /// freed on the next event instead.
    fn detach(&mut self, id: SourceId) {
        if let Some(mut hooks) = self.hooks.remove(&id) {
            hooks.attached = None;
            self.retired.push(hooks);
        }
    }

    fn sweep(&mut self) {
        self.retired.clear();
    }

    fn body(&self) -> Result<HtmlElement, JsValue> {
        self.document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))
    }

    fn build_proxy(
        &self,
        source: &Element,
        template: Option<&ProxyTemplate>,
    ) -> Result<Inserted, JsValue> {
        let element = match template {
            Some(template) => {
                let container = self.document.create_element("div")?;
                template.render(&container, source)?;
                self.body()?.append_child(&container)?;
                container
            }
            None => {
                let clone = source
                    .clone_node_with_deep(true)?
                    .dyn_into::<Element>()
                    .map_err(JsValue::from)?;
                if let Some(parent) = source.parent_node() {
                    parent.append_child(&clone)?;
                }
                if let Some(computed) = self.window.get_computed_style(source)? {
                    let width = computed.get_property_value("width")?;
                    let height = computed.get_property_value("height")?;
                    apply_style(&clone, &self.visual.clone_sizing(width, height));
                }
                clone
            }
        };
        element.class_list().add_1(class::DRAG_ELEMENT)?;
        apply_style(&element, &self.visual.proxy_base());
        let listening = Listening::on(&element).listen("selectstart", function(&self.block_select));
        Ok(Inserted { element, listening })
    }

    fn build_overlay(&self, source: SourceId) -> Result<Inserted, JsValue> {
        let element = self.document.create_element("div")?;
        element.class_list().add_1(class::DRAG_OVERLAY)?;
        element.set_attribute("unselectable", "on")?;
        apply_style(&element, &self.visual.overlay());
        let mut listening =
            Listening::on(&element).listen("selectstart", function(&self.block_select));
        if let Some(hooks) = self.hooks.get(&source) {
            listening = listening
                .listen("mousemove", function(&hooks.overlay_move))
                .listen("mouseup", function(&hooks.overlay_release));
        }
        self.body()?.append_child(&element)?;
        Ok(Inserted { element, listening })
    }
}

impl GeometryProbe<Element> for WebDocument {
    fn probe(&self, element: &Element) -> Probe {
        let display = self
            .window
            .get_computed_style(element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("display").ok());
        if display.as_deref() == Some("none") {
            return Probe::Hidden;
        }
        let bounds = element.get_bounding_client_rect();
        let (width, height) = match element.dyn_ref::<HtmlElement>() {
            Some(html) => (
                f64::from(html.offset_width()),
                f64::from(html.offset_height()),
            ),
            None => (bounds.width(), bounds.height()),
        };
        Probe::Visible(Rect::new(
            bounds.left(),
            bounds.top(),
            bounds.left() + width,
            bounds.top() + height,
        ))
    }
}

impl ClassList<Element> for WebDocument {
    fn set_class(&mut self, element: &Element, class: &str, on: bool) {
        let _ = element.class_list().toggle_with_force(class, on);
    }
}

impl ElementTree<Element> for WebDocument {
    fn closest(&self, element: &Element, class: &str) -> Option<Element> {
        element.closest(&format!(".{class}")).ok().flatten()
    }
}

impl Document<Element> for WebDocument {
    type Template = ProxyTemplate;
    type Listeners = Listening;
    type Proxy = Proxy;
    type Overlay = Overlay;
    type Timer = Timer;

    #[allow(
        clippy::cast_possible_truncation,
        reason = "elementFromPoint takes f32 CSS pixels."
    )]
    fn element_from_point(&self, at: Point) -> Option<Element> {
        self.document.element_from_point(at.x as f32, at.y as f32)
    }

    fn is_input_control(&self, element: &Element) -> bool {
        is_input_control(element)
    }

    fn arm(&mut self, source: SourceId, element: &Element) -> Listening {
        let listening = Listening::on(element);
        match self.hooks.get(&source) {
            Some(hooks) => listening
                .listen("mousemove", function(&hooks.armed_move))
                .listen("mouseup", function(&hooks.armed_release))
                .listen("mouseleave", function(&hooks.armed_release)),
            None => listening,
        }
    }

    fn create_proxy(&mut self, element: &Element, template: Option<&ProxyTemplate>) -> Proxy {
        match self.build_proxy(element, template) {
            Ok(inserted) => Proxy(Some(inserted)),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(err = ?_err, "drag proxy could not be created");
                Proxy(None)
            }
        }
    }

    fn move_proxy(&mut self, proxy: &Proxy, at: Point) {
        if let Some(inserted) = &proxy.0 {
            apply_style(&inserted.element, &VisualConfig::proxy_at(at));
        }
    }

    fn create_overlay(&mut self, source: SourceId) -> Overlay {
        match self.build_overlay(source) {
            Ok(inserted) => Overlay(Some(inserted)),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(err = ?_err, "drag overlay could not be created");
                Overlay(None)
            }
        }
    }

    fn set_overlay_rejected(&mut self, overlay: &Overlay, rejected: bool) {
        if let Some(inserted) = &overlay.0 {
            let _ = inserted
                .element
                .class_list()
                .toggle_with_force(class::DROP_REJECTED, rejected);
            let cursor = String::from(VisualConfig::overlay_cursor(rejected));
            apply_style(&inserted.element, &[("cursor", cursor)]);
        }
    }

    fn schedule_tick(&mut self, source: SourceId, interval_ms: u32) -> Timer {
        let handle = self.hooks.get(&source).and_then(|hooks| {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    function(&hooks.tick),
                    i32::try_from(interval_ms).unwrap_or(i32::MAX),
                )
                .ok()
        });
        Timer {
            window: self.window.clone(),
            handle,
        }
    }

    fn suppress_selection(&mut self, on: bool) {
        if on && self.selection.is_none() {
            self.selection = Some(
                Listening::on(&self.document).listen("selectstart", function(&self.block_select)),
            );
        } else if !on {
            self.selection = None;
        }
    }
}

struct State<D: 'static> {
    engine: DragDrop<Element, D, WebDocument>,
    host: WebDocument,
}

type Shared<D> = Deferred<State<D>>;

fn report<T>(result: Result<T, DragDropError>) {
    if let Err(_err) = result {
        #[cfg(feature = "tracing")]
        tracing::warn!(err = %_err, "drag and drop event failed");
    }
}

/// Run one engine call for a browser event. Events arriving while the
/// engine is busy with another event are dropped.
fn route<D: 'static>(
    shared: &Weak<Shared<D>>,
    f: impl FnOnce(&mut State<D>) -> Result<GestureState, DragDropError>,
) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let outcome = shared.dispatch(|state| {
        state.host.sweep();
        f(state)
    });
    match outcome {
        Some(result) => report(result),
        None => {
            #[cfg(feature = "tracing")]
            tracing::trace!("event dropped: engine busy");
        }
    }
}

fn mouse<D: 'static>(
    shared: &Weak<Shared<D>>,
    mut f: impl FnMut(&mut State<D>, &MouseEvent) -> Result<GestureState, DragDropError> + 'static,
) -> MouseHandler {
    let shared = shared.clone();
    Closure::new(move |event: MouseEvent| route(&shared, |state| f(state, &event)))
}

/// Keeps one behavior attached to an element; dropping it detaches the
/// behavior, the way a disposal callback would.
pub struct Binding {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("attached", &self.dispose.is_some())
            .finish()
    }
}

impl Binding {
    fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Detach now.
    pub fn dispose(self) {}

    /// Keep the behavior for the lifetime of the page.
    pub fn forget(mut self) {
        self.dispose = None;
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

/// Declarative drag and drop over the browser DOM.
///
/// Each attachment method mirrors one binding: [`drop_zone`](Self::drop_zone),
/// [`drag_events`](Self::drag_events) and [`drag_zone`](Self::drag_zone).
/// They may be called from inside any drag and drop callback; the change is
/// applied once the current event has been handled.
///
/// Browser events raised synchronously from inside a callback (for example a
/// `mouseleave` caused by removing or moving the pointer's element in
/// `dragEnd` or a drop action) arrive while the engine is busy and are
/// dropped. With the `tracing` feature they are logged at `trace` level.
pub struct DragDropWeb<D: 'static> {
    shared: Rc<Shared<D>>,
}

impl<D: 'static> fmt::Debug for DragDropWeb<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropWeb")
            .field("busy", &self.shared.is_busy())
            .field("pending", &self.shared.pending())
            .finish_non_exhaustive()
    }
}

impl<D: 'static> Clone for DragDropWeb<D> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<D: 'static> DragDropWeb<D> {
    /// Drag and drop on the global document.
    pub fn new(config: GestureConfig, visual: VisualConfig) -> Result<Self, JsValue> {
        let host = WebDocument::new(visual)?;
        Ok(Self {
            shared: Rc::new(Deferred::new(State {
                engine: DragDrop::new(config),
                host,
            })),
        })
    }

    /// Make `element` a drop zone with `context` as its zone data.
    pub fn drop_zone(
        &self,
        element: Element,
        context: D,
        options: DropZoneOptions<Element, D>,
    ) -> Binding {
        let slot: Rc<Cell<Option<ZoneId>>> = Rc::default();
        let created = slot.clone();
        self.shared.apply(move |state| {
            let id = state
                .engine
                .add_drop_zone(&mut state.host, element, context, options);
            created.set(Some(id));
        });
        self.zone_binding(slot)
    }

    /// Make `element` an event zone. Zone data is `options.data`, else `context`.
    pub fn drag_events(
        &self,
        element: Element,
        context: D,
        options: DragEventsOptions<Element, D>,
    ) -> Binding {
        let slot: Rc<Cell<Option<ZoneId>>> = Rc::default();
        let created = slot.clone();
        self.shared.apply(move |state| {
            let id = state.engine.add_event_zone(element, context, options);
            created.set(Some(id));
        });
        self.zone_binding(slot)
    }

    /// Make `element` a drag source. Dragged data is `options.data`, else
    /// `context`.
    pub fn drag_zone(
        &self,
        element: Element,
        context: D,
        options: DragZoneOptions<Element, D, ProxyTemplate>,
    ) -> Binding {
        let slot: Rc<Cell<Option<SourceId>>> = Rc::default();
        let created = slot.clone();
        let weak = Rc::downgrade(&self.shared);
        self.shared.apply(move |state| {
            let id = state
                .engine
                .add_drag_source(&mut state.host, element.clone(), context, options);
            state.host.attach(id, &element, SourceHooks::new(&weak, id));
            created.set(Some(id));
        });

        let weak = Rc::downgrade(&self.shared);
        Binding::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.apply(move |state| {
                if let Some(id) = slot.take() {
                    report(state.engine.remove_drag_source(&mut state.host, id));
                    state.host.detach(id);
                }
            });
        })
    }

    fn zone_binding(&self, slot: Rc<Cell<Option<ZoneId>>>) -> Binding {
        let weak = Rc::downgrade(&self.shared);
        Binding::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.apply(move |state| {
                if let Some(id) = slot.take() {
                    report(state.engine.remove_zone(&mut state.host, id));
                }
            });
        })
    }
}
