//! The room view mounted on a headless viewport, driven by key presses.
//!
//! Run with: cargo test --test room_interaction

use std::cell::RefCell;
use std::rc::Rc;
use virtual_lab::catalog::Catalog;
use virtual_lab::math::Vec3;
use virtual_lab::stage::RoomScene;
use virtual_lab::view::{FrameLoop, RoomOptions, RoomView, SceneFrame, Viewport};

#[derive(Default)]
struct Log {
    renders: usize,
    releases: usize,
}

/// Records calls instead of drawing.
struct HeadlessViewport(Rc<RefCell<Log>>);

impl Viewport for HeadlessViewport {
    fn size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn render(&mut self, _frame: &SceneFrame<'_>) {
        self.0.borrow_mut().renders += 1;
    }

    fn release(&mut self) {
        self.0.borrow_mut().releases += 1;
    }
}

struct Harness {
    frame_loop: FrameLoop<RoomView, HeadlessViewport>,
    picked: Rc<RefCell<Vec<String>>>,
    log: Rc<RefCell<Log>>,
    catalog_len: usize,
}

fn mount(options: RoomOptions) -> Harness {
    let experiments = Catalog::builtin().unwrap().experiments().to_vec();
    let catalog_len = experiments.len();
    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&picked);
    let view = RoomView::new(experiments, options, move |e| sink.borrow_mut().push(e.id.clone()));
    let log = Rc::new(RefCell::new(Log::default()));
    Harness {
        frame_loop: FrameLoop::mount(view, HeadlessViewport(Rc::clone(&log))),
        picked,
        log,
        catalog_len,
    }
}

#[test]
fn interact_at_table_center_selects() {
    let mut h = mount(RoomOptions::default());
    h.frame_loop.view_mut().place_character(RoomScene::TABLE_POSITION);
    h.frame_loop.key_down("E");

    let expected = h.frame_loop.view().selected().id.clone();
    assert_eq!(*h.picked.borrow(), vec![expected]);
}

#[test]
fn interact_outside_radius_never_selects() {
    let mut h = mount(RoomOptions::default());
    let table = RoomScene::TABLE_POSITION;

    for offset in [Vec3::new(8.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 9.5), Vec3::new(-6.0, 0.0, 6.0)] {
        h.frame_loop.view_mut().place_character(table + offset);
        h.frame_loop.key_down("e");
        h.frame_loop.key_up("e");
        h.frame_loop.tick();
    }
    assert!(h.picked.borrow().is_empty());
}

#[test]
fn held_key_fires_once() {
    let mut h = mount(RoomOptions::default());
    h.frame_loop.view_mut().place_character(RoomScene::TABLE_POSITION);
    h.frame_loop.key_down("e");
    h.frame_loop.key_down("e");
    assert_eq!(h.picked.borrow().len(), 1);
}

#[test]
fn cycling_wraps_over_the_catalog() {
    let mut h = mount(RoomOptions::default());
    let start = h.frame_loop.view().selected_index();

    for _ in 0..h.catalog_len {
        h.frame_loop.key_down("r");
        h.frame_loop.key_up("r");
    }
    assert_eq!(h.frame_loop.view().selected_index(), start);

    h.frame_loop.key_down("q");
    assert_eq!(h.frame_loop.view().selected_index(), h.catalog_len - 1);
}

#[test]
fn one_render_per_tick_and_single_release() {
    let mut h = mount(RoomOptions::default());
    for _ in 0..5 {
        assert!(h.frame_loop.tick());
    }
    assert_eq!(h.log.borrow().renders, 5);

    h.frame_loop.teardown();
    h.frame_loop.teardown();
    assert!(!h.frame_loop.tick());
    assert_eq!(h.log.borrow().renders, 5);

    drop(h.frame_loop);
    assert_eq!(h.log.borrow().releases, 1);
}

#[test]
fn walking_stays_inside_the_floor_bound() {
    let mut h = mount(RoomOptions::default());
    h.frame_loop.key_down("w");
    for _ in 0..1000 {
        h.frame_loop.tick();
    }
    let position = h.frame_loop.view().character_position();
    assert!(position.x.abs() <= 20.0 && position.z.abs() <= 20.0);
    assert!(position.z < RoomScene::CHARACTER_START.z);
}
