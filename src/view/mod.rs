//! Per-frame driver for mounted 3D views
//!
//! A [`FrameLoop`] owns one [`View`] (scene state plus its update rule) and
//! one [`Viewport`] (the surface it is drawn into). Input is latched into an
//! [`InputState`] as it arrives and only read during [`FrameLoop::tick`],
//! which advances the clock, updates the view and renders exactly once.

mod room;
mod table;

pub use room::{RoomOptions, RoomView};
pub use table::TableView;

use crate::input::InputState;
use crate::props::{PropRegistry, FRAME_STEP};
use crate::render::Camera;
use crate::scene::{Environment, SceneGraph};
use log::{debug, info};

/// Everything a viewport needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneFrame<'a> {
    pub graph: &'a SceneGraph,
    pub props: &'a PropRegistry,
    pub camera: &'a Camera,
    pub environment: &'a Environment,
}

/// Scene state that advances once per frame.
pub trait View {
    fn name(&self) -> &'static str;

    fn camera_mut(&mut self) -> &mut Camera;

    /// Discrete key press, already lowercased. Must not move anything.
    fn on_key_down(&mut self, _key: &str) {}

    /// Advances the scene to `time` seconds since mount.
    fn update(&mut self, time: f32, input: &mut InputState);

    fn frame(&self) -> SceneFrame<'_>;
}

/// Drawing surface a view is mounted on.
pub trait Viewport {
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, frame: &SceneFrame<'_>);

    /// Frees surface-side resources. Called exactly once per viewport.
    fn release(&mut self);
}

/// A mounted view and the surface it renders to.
pub struct FrameLoop<V: View, P: Viewport> {
    view: V,
    viewport: P,
    input: InputState,
    time: f32,
    frames: u64,
    alive: bool,
}

impl<V: View, P: Viewport> FrameLoop<V, P> {
    pub fn mount(mut view: V, viewport: P) -> Self {
        let (width, height) = viewport.size();
        view.camera_mut().fit(width, height);
        info!("mounted {} view at {}x{}", view.name(), width, height);
        Self {
            view,
            viewport,
            input: InputState::new(),
            time: 0.0,
            frames: 0,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn viewport(&self) -> &P {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut P {
        &mut self.viewport
    }

    pub fn key_down(&mut self, key: &str) {
        if !self.alive {
            return;
        }
        if self.input.key_down(key) {
            self.view.on_key_down(&key.to_lowercase());
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if self.alive {
            self.input.key_up(key);
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.alive {
            self.input.pointer_down(x, y);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.alive {
            self.input.pointer_move(x, y);
        }
    }

    pub fn pointer_up(&mut self) {
        if self.alive {
            self.input.pointer_up();
        }
    }

    /// Releases every latched key, e.g. when focus moves elsewhere.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Runs one frame. Returns `false` once torn down, which tells the host
    /// to stop scheduling frames.
    pub fn tick(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.time += FRAME_STEP;
        self.view.update(self.time, &mut self.input);
        self.viewport.render(&self.view.frame());
        self.frames += 1;
        true
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.alive || width == 0 || height == 0 {
            return;
        }
        debug!("{} view resized to {}x{}", self.view.name(), width, height);
        self.viewport.resize(width, height);
        self.view.camera_mut().fit(width, height);
    }

    /// Stops the loop and releases the viewport. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.input.clear();
        self.viewport.release();
        info!(
            "tore down {} view after {} frames",
            self.view.name(),
            self.frames
        );
    }
}

impl<V: View, P: Viewport> Drop for FrameLoop<V, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counters shared between a [`CountingViewport`] and the test body.
    #[derive(Debug, Default)]
    pub struct Counters {
        pub renders: Cell<u32>,
        pub releases: Cell<u32>,
        pub resizes: Cell<u32>,
        pub last_props: Cell<usize>,
    }

    pub struct CountingViewport {
        pub size: (u32, u32),
        pub counters: Rc<Counters>,
    }

    impl CountingViewport {
        pub fn new() -> (Self, Rc<Counters>) {
            let counters = Rc::new(Counters::default());
            (
                Self {
                    size: (800, 600),
                    counters: Rc::clone(&counters),
                },
                counters,
            )
        }
    }

    impl Viewport for CountingViewport {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.counters.resizes.set(self.counters.resizes.get() + 1);
        }

        fn render(&mut self, frame: &SceneFrame<'_>) {
            self.counters.renders.set(self.counters.renders.get() + 1);
            self.counters.last_props.set(frame.props.len());
        }

        fn release(&mut self) {
            self.counters.releases.set(self.counters.releases.get() + 1);
        }
    }
}
