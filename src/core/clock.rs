use std::time::Instant;

pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Longest frame step handed to animation, so a stall does not fling the camera.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame clock: delta time per tick plus a once-per-second FPS average.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    frame_count: u32,
    fps_timer: f32,
    fps: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frame_count: 0,
            fps_timer: 0.0,
            fps: 0.0,
        }
    }

    /// Seconds since the previous tick, capped at [`MAX_FRAME_DELTA`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.record_frame(delta);
        delta.min(MAX_FRAME_DELTA)
    }

    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
        self.frame_count = 0;
        self.fps_timer = 0.0;
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    fn record_frame(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_timer += delta;
        if self.fps_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_timer;
            log::trace!("fps: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
