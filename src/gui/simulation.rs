use nalgebra::Point3;

use super::canvas::Canvas;
use super::controller::Controller;
use crate::consts::{BACKGROUND_COLOR, CURSOR_RADIUS, SELECT_COLOR};
use crate::orrery::Orrery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Done,
}

/// Drives the orrery one tick per frame, at whatever rate the canvas paces
/// `present` to. Motion is per tick, not per second, so a slow frame makes
/// everything move slower rather than jump ahead.
pub struct Simulation<C: Canvas> {
    orrery: Orrery,
    canvas: C,
    controller: Controller,
    state: RunState,
    frame: u64,
}

impl<C: Canvas> Simulation<C> {
    pub fn new(orrery: Orrery, canvas: C) -> Self {
        Simulation {
            orrery,
            canvas,
            controller: Controller::new(),
            state: RunState::Running,
            frame: 0,
        }
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of frames that have been presented so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn run(&mut self) {
        while self.state == RunState::Running {
            self.step();
        }
        match self.controller.measured_fps() {
            Some(fps) => log::info!("Stopped after {} frames ({:.1} fps)", self.frame, fps),
            None => log::info!("Stopped after {} frames", self.frame),
        }
    }

    pub fn step(&mut self) {
        self.process_user_input();
        if self.state == RunState::Done {
            return;
        }

        self.orrery.tick();
        self.render();

        if !self.canvas.present() {
            self.state = RunState::Done;
        }
        self.frame += 1;
        self.controller.frame_presented();
    }

    fn process_user_input(&mut self) {
        // Every queued event gets handled, even after a close request
        for event in self.canvas.poll_events() {
            if self.controller.process_event(event, &mut self.orrery) == RunState::Done {
                self.state = RunState::Done;
            }
        }
    }

    fn render(&mut self) {
        self.canvas.clear(&Point3::from(BACKGROUND_COLOR));

        // Selections go underneath every body
        for body in self.orrery.bodies() {
            body.render_selection(&mut self.canvas);
        }
        for body in self.orrery.bodies() {
            body.render(&mut self.canvas);
        }

        if let Some(cursor) = self.canvas.cursor_position() {
            self.canvas
                .draw_circle(&cursor, CURSOR_RADIUS, &Point3::from(SELECT_COLOR));
        }
    }
}
