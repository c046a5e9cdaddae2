//! Explicit driver for the per-frame tick.
//!
//! The host scheduler (a display-refresh callback, a repaint request, a test
//! loop) calls [`FrameLoop::frame`] once per signal. Stopping is explicit:
//! any clone of the [`StopHandle`] cancels the loop, and every later frame
//! only repaints the frozen particle set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cgmath::Vector2;
use rand::Rng;

use crate::ParticleField;
use crate::surface::DrawSurface;

#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        if !self.0.swap(true, Ordering::Relaxed) {
            log::info!("frame loop stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    Stopped,
}

pub struct FrameLoop<R> {
    field: ParticleField,
    rng: R,
    stop: StopHandle,
    frames: u64,
}

impl<R: Rng> FrameLoop<R> {
    pub fn new(field: ParticleField, rng: R) -> Self {
        Self {
            field,
            rng,
            stop: StopHandle::default(),
            frames: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Number of frames that actually ticked the field.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn set_pointer(&mut self, pointer: Option<Vector2<f64>>) {
        self.field.set_pointer(pointer);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.field.resize(width, height);
    }

    /// One scheduler signal.
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStatus {
        if self.stop.is_stopped() {
            self.field.draw(surface);
            return FrameStatus::Stopped;
        }

        self.field.tick(surface, &mut self.rng);
        self.frames += 1;
        FrameStatus::Running
    }

    /// Drives up to `frames` frames back to back, returning how many ran.
    pub fn run_for<S: DrawSurface + ?Sized>(&mut self, frames: u64, surface: &mut S) -> u64 {
        let mut ran = 0;
        while ran < frames && self.frame(surface) == FrameStatus::Running {
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{NullSurface, Rgba};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn frame_loop() -> FrameLoop<StdRng> {
        let mut field = ParticleField::default();
        field.resize(320.0, 240.0);
        FrameLoop::new(field, StdRng::seed_from_u64(42))
    }

    #[test]
    fn frames_tick_the_field_until_stopped() {
        let mut driver = frame_loop();

        assert_eq!(driver.frame(&mut NullSurface), FrameStatus::Running);
        assert_eq!(driver.frame(&mut NullSurface), FrameStatus::Running);
        assert_eq!(driver.field().len(), 2);

        driver.stop_handle().stop();

        assert_eq!(driver.frame(&mut NullSurface), FrameStatus::Stopped);
        assert_eq!(driver.field().len(), 2);
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn run_for_stops_early_when_cancelled() {
        let mut driver = frame_loop();
        let handle = driver.stop_handle();

        assert_eq!(driver.run_for(10, &mut NullSurface), 10);

        handle.stop();
        assert!(driver.is_stopped());
        assert_eq!(driver.run_for(10, &mut NullSurface), 0);
        assert_eq!(driver.frames(), 10);
    }

    #[derive(Default)]
    struct Tally {
        clears: usize,
        circles: usize,
    }

    impl DrawSurface for Tally {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn fill_circle(&mut self, _center: Vector2<f32>, _radius: f32, _color: Rgba, _opacity: f32) {
            self.circles += 1;
        }
    }

    #[test]
    fn stopped_frames_repaint_the_frozen_set() {
        let mut driver = frame_loop();
        driver.run_for(5, &mut NullSurface);
        let frozen = driver.field().particles().to_vec();

        driver.stop_handle().stop();
        let mut surface = Tally::default();
        assert_eq!(driver.frame(&mut surface), FrameStatus::Stopped);
        assert_eq!(driver.frame(&mut surface), FrameStatus::Stopped);

        assert_eq!(surface.clears, 2);
        assert_eq!(surface.circles, 2 * frozen.len());
        assert_eq!(driver.field().particles(), frozen.as_slice());
        assert_eq!(driver.frames(), 5);
    }

    #[test]
    fn stop_is_idempotent() {
        let handle = StopHandle::default();
        let other = handle.clone();

        handle.stop();
        other.stop();

        assert!(handle.is_stopped());
        assert!(other.is_stopped());
    }

    #[test]
    fn pointer_and_resize_reach_the_field() {
        let mut driver = frame_loop();

        driver.resize(800.0, 600.0);
        driver.set_pointer(Some(cgmath::vec2(1.0, 2.0)));

        assert_eq!(driver.field().bounds(), (800.0, 600.0));
        assert_eq!(driver.field().pointer(), Some(cgmath::vec2(1.0, 2.0)));
    }
}
