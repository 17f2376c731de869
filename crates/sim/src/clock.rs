/// Fixed-timestep accumulator.
///
/// Frame times are clamped to `max_frame` so a long stall produces a bounded
/// burst of ticks instead of a runaway catch-up.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_frame: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_frame: f32) -> Self {
        Self {
            step,
            max_frame,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Leftover time not yet consumed by a tick.
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Feed one frame's elapsed time and return how many ticks to run.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        let frame = if frame_time.is_nan() {
            0.0
        } else {
            frame_time.clamp(0.0, self.max_frame)
        };
        self.accumulator += frame;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }
}
