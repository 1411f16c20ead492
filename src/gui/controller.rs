use std::time::{Duration, Instant};

use super::canvas::InputEvent;
use super::simulation::RunState;
use crate::consts::FRAME_RATE;
use crate::orrery::Orrery;

pub struct Controller {
    frame_rate: FrameRateMonitor,
}

/// Measures the frame rate actually achieved, once per window of about a second,
/// and reports it next to the rate the loop is paced at.
pub struct FrameRateMonitor {
    target: u64,
    window: Duration,
    window_start: Instant,
    frames: u32,
    measured: Option<f64>,
}

impl FrameRateMonitor {
    pub fn new(target: u64, window: Duration) -> Self {
        FrameRateMonitor {
            target,
            window,
            window_start: Instant::now(),
            frames: 0,
            measured: None,
        }
    }

    /// Frames per second over the last complete window, if one has finished yet.
    pub fn measured(&self) -> Option<f64> {
        self.measured
    }

    pub fn frame_presented(&mut self) {
        self.frame_presented_at(Instant::now());
    }

    fn frame_presented_at(&mut self, now: Instant) {
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return;
        }

        let fps = self.frames as f64 / elapsed.as_secs_f64();
        // Bodies move per frame, so a slow loop means a slow orrery
        if fps < 0.9 * self.target as f64 {
            log::debug!("Running behind at {:.1} of {} fps", fps, self.target);
        } else {
            log::debug!("Running at {:.1} fps", fps);
        }

        self.measured = Some(fps);
        self.window_start = now;
        self.frames = 0;
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            frame_rate: FrameRateMonitor::new(FRAME_RATE, Duration::from_secs(1)),
        }
    }

    pub fn process_event(&mut self, event: InputEvent, orrery: &mut Orrery) -> RunState {
        match event {
            InputEvent::CloseRequested => {
                log::debug!("Close requested");
                RunState::Done
            }
            InputEvent::LeftClick(position) => {
                orrery.toggle_selection_at(&position);
                RunState::Running
            }
        }
    }

    pub fn measured_fps(&self) -> Option<f64> {
        self.frame_rate.measured()
    }

    pub fn frame_presented(&mut self) {
        self.frame_rate.frame_presented()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Controller::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::Point2;

    #[test]
    fn test_close_finishes() {
        let mut controller = Controller::new();
        let mut orrery = Orrery::new(Point2::new(0.0, 0.0));

        assert_eq!(
            controller.process_event(InputEvent::CloseRequested, &mut orrery),
            RunState::Done
        );
        assert_eq!(
            controller.process_event(InputEvent::LeftClick(Point2::new(1.0, 2.0)), &mut orrery),
            RunState::Running
        );
    }

    #[test]
    fn test_frame_rate_needs_a_full_window() {
        let mut monitor = FrameRateMonitor::new(30, Duration::from_secs(1));
        let start = monitor.window_start;

        for i in 1..30 {
            monitor.frame_presented_at(start + Duration::from_millis(i * 33));
        }
        assert_eq!(monitor.measured(), None);
    }

    #[test]
    fn test_frame_rate_is_measured_per_window() {
        let mut monitor = FrameRateMonitor::new(30, Duration::from_secs(1));
        let start = monitor.window_start;

        // 30 frames in the first second
        for i in 1..=30 {
            monitor.frame_presented_at(start + Duration::from_millis(i * 1000 / 30));
        }
        assert_relative_eq!(monitor.measured().unwrap(), 30.0, epsilon = 1e-9);

        // then only 10 in the next two seconds
        let second = start + Duration::from_secs(1);
        for i in 1..=10 {
            monitor.frame_presented_at(second + Duration::from_millis(i * 200));
        }
        assert_relative_eq!(monitor.measured().unwrap(), 5.0, epsilon = 1e-9);
    }
}
