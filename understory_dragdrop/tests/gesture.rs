// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture-level tests for `understory_dragdrop`.
//!
//! A scripted page stands in for the document: elements are numbers with
//! boxes, parents and classes, and every transient resource (listeners,
//! proxy, overlay, tick) logs its creation and its removal. The tests drive
//! [`DragDrop`] with raw pointer samples and check the lifecycle through
//! that log.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dragdrop::{
    ClassList, Document, DragDrop, DragDropError, DragZoneOptions, DropZoneOptions, ElementTree,
    GeometryProbe, GestureState, PointerButton, PointerEvent, Probe, SourceId, ZoneId, class,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Pushes `remove <what>` when dropped.
#[derive(Debug)]
struct Scoped {
    what: &'static str,
    log: Log,
}

impl Drop for Scoped {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("remove {}", self.what));
    }
}

#[derive(Default)]
struct Page {
    log: Log,
    boxes: HashMap<u32, Rect>,
    parents: HashMap<u32, u32>,
    classes: HashSet<(u32, String)>,
    inputs: HashSet<u32>,
    suppressed: bool,
    overlay_rejected: bool,
}

impl Page {
    fn with_box(mut self, el: u32, rect: Rect) -> Self {
        self.boxes.insert(el, rect);
        self
    }

    fn has(&self, el: u32, class: &str) -> bool {
        self.classes.contains(&(el, String::from(class)))
    }

    fn scoped(&self, what: &'static str) -> Scoped {
        self.log.borrow_mut().push(format!("create {what}"));
        Scoped {
            what,
            log: self.log.clone(),
        }
    }

    fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn count(&self, entry: &str) -> usize {
        self.log.borrow().iter().filter(|e| *e == entry).count()
    }

    fn position(&self, entry: &str) -> Option<usize> {
        self.log.borrow().iter().position(|e| e == entry)
    }
}

impl GeometryProbe<u32> for Page {
    fn probe(&self, element: &u32) -> Probe {
        match self.boxes.get(element) {
            Some(rect) => Probe::Visible(*rect),
            None => Probe::Hidden,
        }
    }
}

impl ClassList<u32> for Page {
    fn set_class(&mut self, element: &u32, class: &str, on: bool) {
        let key = (*element, String::from(class));
        if on {
            self.classes.insert(key);
        } else {
            self.classes.remove(&key);
        }
    }
}

impl ElementTree<u32> for Page {
    fn closest(&self, element: &u32, class: &str) -> Option<u32> {
        let mut cur = Some(*element);
        while let Some(el) = cur {
            if self.has(el, class) {
                return Some(el);
            }
            cur = self.parents.get(&el).copied();
        }
        None
    }
}

impl Document<u32> for Page {
    type Template = &'static str;
    type Listeners = Scoped;
    type Proxy = Scoped;
    type Overlay = Scoped;
    type Timer = Scoped;

    fn element_from_point(&self, at: Point) -> Option<u32> {
        // Smallest box wins, which makes nested boxes behave like children.
        self.boxes
            .iter()
            .filter(|(_, r)| r.x0 <= at.x && at.x <= r.x1 && r.y0 <= at.y && at.y <= r.y1)
            .min_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
            .map(|(el, _)| *el)
    }

    fn is_input_control(&self, element: &u32) -> bool {
        self.inputs.contains(element)
    }

    fn arm(&mut self, _: SourceId, _: &u32) -> Scoped {
        self.scoped("listeners")
    }

    fn create_proxy(&mut self, element: &u32, template: Option<&&'static str>) -> Scoped {
        match template {
            Some(t) => self.log.borrow_mut().push(format!("render {t}")),
            None => self.log.borrow_mut().push(format!("clone {element}")),
        }
        self.scoped("proxy")
    }

    fn move_proxy(&mut self, _: &Scoped, at: Point) {
        self.log
            .borrow_mut()
            .push(format!("proxy at {},{}", at.x, at.y));
    }

    fn create_overlay(&mut self, _: SourceId) -> Scoped {
        self.scoped("overlay")
    }

    fn set_overlay_rejected(&mut self, _: &Scoped, rejected: bool) {
        self.overlay_rejected = rejected;
        self.log
            .borrow_mut()
            .push(format!("overlay rejected {rejected}"));
    }

    fn schedule_tick(&mut self, _: SourceId, _: u32) -> Scoped {
        self.scoped("timer")
    }

    fn suppress_selection(&mut self, on: bool) {
        self.suppressed = on;
    }
}

type Engine = DragDrop<u32, &'static str, Page>;

const SOURCE: u32 = 1;
const ZONE: u32 = 10;

fn press(x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(x, y, PointerButton::Primary)
}

fn hover(x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(x, y, PointerButton::None)
}

fn page() -> Page {
    Page::default()
        .with_box(SOURCE, Rect::new(0.0, 0.0, 50.0, 50.0))
        .with_box(ZONE, Rect::new(200.0, 200.0, 300.0, 300.0))
}

/// A drag source on "cards" whose callbacks log into the page log.
fn add_source(engine: &mut Engine, host: &mut Page) -> SourceId {
    let start_log = host.log.clone();
    let end_log = host.log.clone();
    let options = DragZoneOptions::new("cards")
        .with_drag_start(move |data: &&str, _: &PointerEvent| {
            start_log.borrow_mut().push(format!("start {data}"));
            true
        })
        .with_drag_end(move |data: &&str, _: &PointerEvent, target: Option<&u32>| {
            end_log.borrow_mut().push(format!("end {data} {target:?}"));
        });
    engine.add_drag_source(host, SOURCE, "ace", options)
}

/// A drop zone accepting "cards" whose drop action logs into the page log.
fn add_zone(engine: &mut Engine, host: &mut Page) -> ZoneId {
    let log = host.log.clone();
    let options = DropZoneOptions::new()
        .accepts("cards")
        .with_drop(move |dragged: &&str, zone: &&str| {
            log.borrow_mut().push(format!("drop {dragged} on {zone}"));
        });
    engine.add_drop_zone(host, ZONE, "pile", options)
}

/// Press inside the source and move far enough to start dragging.
fn start_dragging(engine: &mut Engine, host: &mut Page, id: SourceId) {
    assert_eq!(engine.press(host, id, &press(10.0, 10.0)), Ok(GestureState::Armed));
    assert_eq!(
        engine.source_move(host, id, &press(40.0, 10.0), Some(&SOURCE)),
        Ok(GestureState::Dragging)
    );
}

#[test]
fn registration_marks_elements() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    add_zone(&mut engine, &mut host);

    assert!(host.has(SOURCE, class::DRAGGABLE));
    assert!(host.has(SOURCE, class::DRAG_ZONE));
    assert!(host.has(ZONE, class::DROP_ZONE));
    assert!(engine.registry().has_channel("cards"));
    assert_eq!(engine.state(id), Some(GestureState::Idle));
}

#[test]
fn release_below_threshold_never_drags() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);

    engine.press(&mut host, id, &press(10.0, 10.0)).unwrap();
    assert!(host.suppressed);
    assert_eq!(engine.in_flight(), Some(id));

    // About 7 px away: still armed.
    let state = engine
        .source_move(&mut host, id, &press(15.0, 15.0), Some(&SOURCE))
        .unwrap();
    assert_eq!(state, GestureState::Armed);

    assert_eq!(engine.source_release(&mut host, id), Ok(GestureState::Idle));
    assert_eq!(host.entries(), ["create listeners", "remove listeners"]);
    assert!(!host.suppressed);
    assert_eq!(engine.in_flight(), None);
}

#[test]
fn exactly_the_drag_distance_does_not_start() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);

    engine.press(&mut host, id, &press(10.0, 10.0)).unwrap();
    let state = engine
        .source_move(&mut host, id, &press(20.0, 10.0), Some(&SOURCE))
        .unwrap();
    assert_eq!(state, GestureState::Armed);
    let state = engine
        .source_move(&mut host, id, &press(20.5, 10.0), Some(&SOURCE))
        .unwrap();
    assert_eq!(state, GestureState::Dragging);
}

#[test]
fn threshold_is_measured_in_page_coordinates() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);

    let down = press(10.0, 10.0).with_page(Point::new(10.0, 510.0));
    engine.press(&mut host, id, &down).unwrap();
    // The viewport scrolled under a still pointer: client moved, page did not.
    let scrolled = press(10.0, 40.0).with_page(Point::new(10.0, 510.0));
    let state = engine
        .source_move(&mut host, id, &scrolled, Some(&SOURCE))
        .unwrap();
    assert_eq!(state, GestureState::Armed);
}

#[test]
fn non_primary_press_is_ignored() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);

    let right = PointerEvent::at(10.0, 10.0, PointerButton::Secondary);
    assert_eq!(engine.press(&mut host, id, &right), Ok(GestureState::Idle));
    assert!(host.entries().is_empty());
    assert!(!host.suppressed);
}

#[test]
fn crossing_threshold_starts_drag_with_visuals() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    assert_eq!(
        host.entries(),
        [
            "create listeners",
            "remove listeners",
            "start ace",
            "clone 1",
            "create proxy",
            "proxy at 10,10",
            "create overlay",
            "create timer",
        ]
    );
    assert_eq!(engine.state(id), Some(GestureState::Dragging));
    assert!(host.suppressed);
}

#[test]
fn template_is_rendered_instead_of_clone() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = engine.add_drag_source(
        &mut host,
        SOURCE,
        "ace",
        DragZoneOptions::new("cards").with_template("card-proxy"),
    );
    start_dragging(&mut engine, &mut host, id);
    assert!(host.position("render card-proxy").is_some());
    assert!(host.position("clone 1").is_none());
}

#[test]
fn drag_start_veto_ends_gesture_without_visuals() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = engine.add_drag_source(
        &mut host,
        SOURCE,
        "ace",
        DragZoneOptions::new("cards").with_drag_start(|_: &&str, _: &PointerEvent| false),
    );

    engine.press(&mut host, id, &press(10.0, 10.0)).unwrap();
    let state = engine
        .source_move(&mut host, id, &press(40.0, 10.0), Some(&SOURCE))
        .unwrap();
    assert_eq!(state, GestureState::Idle);
    assert_eq!(host.entries(), ["create listeners", "remove listeners"]);
    assert!(!host.suppressed);
    assert_eq!(engine.in_flight(), None);
}

#[test]
fn input_controls_never_start_a_drag() {
    let mut host = page();
    host.inputs.insert(2);
    host.parents.insert(2, SOURCE);
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);

    engine.press(&mut host, id, &press(10.0, 10.0)).unwrap();
    let state = engine
        .source_move(&mut host, id, &press(45.0, 45.0), Some(&2))
        .unwrap();
    assert_eq!(state, GestureState::Armed);
    assert_eq!(host.count("create proxy"), 0);
}

#[test]
fn second_press_while_in_flight_is_refused() {
    let mut host = page();
    let mut engine = Engine::default();
    let a = add_source(&mut engine, &mut host);
    let b = engine.add_drag_source(&mut host, 2, "king", DragZoneOptions::new("cards"));

    engine.press(&mut host, a, &press(10.0, 10.0)).unwrap();
    assert_eq!(
        engine.press(&mut host, b, &press(10.0, 10.0)),
        Err(DragDropError::GestureInFlight { owner: a })
    );
    assert_eq!(engine.state(b), Some(GestureState::Idle));

    engine.source_release(&mut host, a).unwrap();
    assert_eq!(engine.press(&mut host, b, &press(10.0, 10.0)), Ok(GestureState::Armed));
}

#[test]
fn drop_on_active_zone_runs_drop_after_drag_end() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    let zone = add_zone(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    assert!(engine.registry().zone(zone).unwrap().is_active());
    assert!(host.has(ZONE, class::DRAG_OVER));

    let state = engine
        .overlay_release(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    assert_eq!(state, GestureState::Idle);

    assert_eq!(host.count("drop ace on pile"), 1);
    let end = host.position("end ace Some(10)").expect("dragEnd ran");
    let dropped = host.position("drop ace on pile").unwrap();
    assert!(end < dropped, "dragEnd precedes the drop action");

    let overlay_gone = host.position("remove overlay").unwrap();
    assert!(overlay_gone < end, "visuals are gone before resolution");

    assert!(!host.has(ZONE, class::DRAG_OVER));
    assert!(!engine.registry().zone(zone).unwrap().is_inside());
    assert!(!host.suppressed);
    assert_eq!(engine.in_flight(), None);
}

#[test]
fn drop_on_child_of_zone_resolves_to_zone() {
    let mut host = page().with_box(11, Rect::new(240.0, 240.0, 260.0, 260.0));
    host.parents.insert(11, ZONE);
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    add_zone(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    engine
        .overlay_release(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    assert!(host.position("end ace Some(11)").is_some());
    assert_eq!(host.count("drop ace on pile"), 1);
}

#[test]
fn detached_inner_zone_no_longer_captures_the_drop() {
    let mut host = page().with_box(11, Rect::new(240.0, 240.0, 260.0, 260.0));
    host.parents.insert(11, ZONE);
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    add_zone(&mut engine, &mut host);
    let inner = engine.add_drop_zone(
        &mut host,
        11,
        "inner",
        DropZoneOptions::new().accepts("cards"),
    );
    engine.remove_zone(&mut host, inner).unwrap();
    assert!(!host.has(11, class::DROP_ZONE));

    start_dragging(&mut engine, &mut host, id);
    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    engine
        .overlay_release(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    assert_eq!(host.count("drop ace on pile"), 1);
}

#[test]
fn release_outside_zones_ends_without_drop() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    add_zone(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(500.0, 500.0))
        .unwrap();
    engine
        .overlay_release(&mut host, id, &press(500.0, 500.0))
        .unwrap();
    assert!(host.position("end ace None").is_some());
    assert_eq!(host.count("drop ace on pile"), 0);
}

#[test]
fn button_loss_cancels_once() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    add_zone(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    let state = engine
        .overlay_move(&mut host, id, &hover(260.0, 260.0))
        .unwrap();
    assert_eq!(state, GestureState::Idle);

    assert_eq!(host.count("remove proxy"), 1);
    assert_eq!(host.count("remove overlay"), 1);
    assert_eq!(host.count("end ace None"), 1);
    assert_eq!(host.count("drop ace on pile"), 0);
    assert!(!host.suppressed);

    // Late events for the finished gesture are inert.
    assert_eq!(
        engine.overlay_release(&mut host, id, &press(250.0, 250.0)),
        Ok(GestureState::Idle)
    );
    assert_eq!(host.count("remove proxy"), 1);
    assert_eq!(host.count("drop ace on pile"), 0);
}

#[test]
fn every_move_reschedules_the_tick() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    engine.overlay_move(&mut host, id, &press(60.0, 60.0)).unwrap();
    engine.overlay_move(&mut host, id, &press(70.0, 70.0)).unwrap();
    assert_eq!(host.count("create timer"), 3);
    assert_eq!(host.count("remove timer"), 2);
    assert!(host.position("proxy at 70,70").is_some());
}

#[test]
fn tick_replays_last_sample_against_new_layout() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    let zone = add_zone(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(120.0, 120.0))
        .unwrap();
    assert!(!engine.registry().zone(zone).unwrap().is_inside());

    // The zone slides under the resting pointer.
    host.boxes.insert(ZONE, Rect::new(100.0, 100.0, 150.0, 150.0));
    assert_eq!(engine.tick(&mut host, id), Ok(GestureState::Dragging));
    assert!(engine.registry().zone(zone).unwrap().is_active());
    assert!(host.has(ZONE, class::DRAG_OVER));
}

#[test]
fn hidden_zone_is_never_inside() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    let zone = add_zone(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    let shown = host.boxes.remove(&ZONE).unwrap();
    engine.tick(&mut host, id).unwrap();
    assert!(!engine.registry().zone(zone).unwrap().is_inside());
    assert!(!host.has(ZONE, class::DRAG_OVER));

    host.boxes.insert(ZONE, shown);
    engine.tick(&mut host, id).unwrap();
    assert!(engine.registry().zone(zone).unwrap().is_active());
}

#[test]
fn overlay_reflects_rejection_changes_only() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    engine.add_drop_zone(
        &mut host,
        ZONE,
        "locked",
        DropZoneOptions::new()
            .accepts("cards")
            .with_drag_enter(|_, _, _| false),
    );
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    assert!(host.overlay_rejected);
    assert!(host.has(ZONE, class::DROP_REJECTED));
    assert!(!host.has(ZONE, class::DRAG_OVER));

    engine
        .overlay_move(&mut host, id, &press(260.0, 260.0))
        .unwrap();
    assert_eq!(host.count("overlay rejected true"), 1);

    engine
        .overlay_move(&mut host, id, &press(500.0, 500.0))
        .unwrap();
    assert!(!host.overlay_rejected);
    assert_eq!(host.count("overlay rejected false"), 1);
    assert!(!host.has(ZONE, class::DROP_REJECTED));
}

#[test]
fn rejected_zone_does_not_receive_drop() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    let log = host.log.clone();
    engine.add_drop_zone(
        &mut host,
        ZONE,
        "locked",
        DropZoneOptions::new()
            .accepts("cards")
            .with_drag_enter(|_, _, _| false)
            .with_drop(move |_: &&str, _: &&str| log.borrow_mut().push("drop".into())),
    );
    start_dragging(&mut engine, &mut host, id);

    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    engine
        .overlay_release(&mut host, id, &press(250.0, 250.0))
        .unwrap();
    assert_eq!(host.count("drop"), 0);
    assert!(host.position("end ace Some(10)").is_some());
}

#[test]
fn removing_source_mid_drag_tears_down() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    start_dragging(&mut engine, &mut host, id);

    assert_eq!(engine.remove_drag_source(&mut host, id), Ok(()));
    assert_eq!(host.count("remove timer"), 1);
    assert_eq!(host.count("remove proxy"), 1);
    assert_eq!(host.count("remove overlay"), 1);
    assert_eq!(host.count("end ace None"), 1);
    assert!(!host.suppressed);
    assert_eq!(engine.in_flight(), None);
    assert_eq!(engine.state(id), None);
    assert_eq!(
        engine.tick(&mut host, id),
        Err(DragDropError::UnknownSource(id))
    );
}

#[test]
fn removing_armed_source_releases_listeners() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    engine.press(&mut host, id, &press(10.0, 10.0)).unwrap();

    engine.remove_drag_source(&mut host, id).unwrap();
    assert_eq!(host.entries(), ["create listeners", "remove listeners"]);
    assert!(!host.suppressed);
    assert!(!host.has(SOURCE, class::DRAGGABLE));
    assert!(!host.has(SOURCE, class::DRAG_ZONE));
}

#[test]
fn armed_move_without_button_disarms() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    engine.press(&mut host, id, &press(10.0, 10.0)).unwrap();

    // The mouseup was never seen; the pointer now hovers past the threshold.
    assert_eq!(
        engine.source_move(&mut host, id, &hover(40.0, 10.0), Some(&SOURCE)),
        Ok(GestureState::Idle)
    );
    assert_eq!(host.entries(), ["create listeners", "remove listeners"]);
    assert_eq!(host.count("start ace"), 0);
    assert_eq!(engine.in_flight(), None);
    assert!(!host.suppressed);

    assert_eq!(
        engine.press(&mut host, id, &press(10.0, 10.0)),
        Ok(GestureState::Armed)
    );
}

#[test]
fn removing_zone_mid_drag_leaves_it() {
    let mut host = page();
    let mut engine = Engine::default();
    let id = add_source(&mut engine, &mut host);
    let log = host.log.clone();
    let zone = engine.add_drop_zone(
        &mut host,
        ZONE,
        "pile",
        DropZoneOptions::new().accepts("cards").with_drag_leave(
            move |event, _: &&str| log.borrow_mut().push(format!("leave {}", event.is_some())),
        ),
    );
    start_dragging(&mut engine, &mut host, id);
    engine
        .overlay_move(&mut host, id, &press(250.0, 250.0))
        .unwrap();

    assert!(host.has(ZONE, class::DRAG_OVER));

    engine.remove_zone(&mut host, zone).unwrap();
    assert_eq!(host.count("leave false"), 1);
    assert!(!host.has(ZONE, class::DRAG_OVER));
    assert!(!host.has(ZONE, class::DROP_REJECTED));
    assert!(!host.has(ZONE, class::DROP_ZONE));

    // The drag carries on without the zone.
    assert_eq!(
        engine.overlay_move(&mut host, id, &press(255.0, 255.0)),
        Ok(GestureState::Dragging)
    );
    engine
        .overlay_release(&mut host, id, &press(255.0, 255.0))
        .unwrap();
    assert_eq!(host.count("leave false"), 1);
}
