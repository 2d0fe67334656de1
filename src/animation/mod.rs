pub mod pulse;

pub use pulse::{breathing, heartbeat, typing_dots};

use std::time::{Duration, Instant};

/// Target frame rate
pub const TARGET_FPS: u32 = 30;

/// Frame duration for target FPS
pub const FRAME_DURATION: Duration = Duration::from_millis(1000 / TARGET_FPS as u64);

/// Animation loop state
pub struct AnimationLoop {
    started: Instant,
    last_frame: Instant,
}

impl AnimationLoop {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
        }
    }

    /// Get delta time since last frame
    pub fn delta_time(&self) -> f32 {
        self.last_frame.elapsed().as_secs_f32()
    }

    /// Seconds since the loop started, the clock for time-based animations
    pub fn clock(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Mark frame as rendered
    pub fn frame_rendered(&mut self) {
        self.last_frame = Instant::now();
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration_matches_target() {
        assert_eq!(FRAME_DURATION, Duration::from_millis(33));
    }

    #[test]
    fn test_delta_time_resets_after_frame() {
        let mut animation = AnimationLoop::new();
        std::thread::sleep(Duration::from_millis(5));
        assert!(animation.delta_time() >= 0.005);
        animation.frame_rendered();
        assert!(animation.delta_time() < 0.005);
        assert!(animation.clock() >= 0.005);
    }
}
