//=========================================================================
// Game Time
//=========================================================================
//
// Frame timing handed to every update: the last frame's duration and the
// running total since the game started.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== GameTime ============================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameTime {
    elapsed: Duration,
    total: Duration,
    frame: u64,
}

impl GameTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single frame of `elapsed` duration (test and tooling helper).
    pub fn from_elapsed(elapsed: Duration) -> Self {
        let mut time = Self::new();
        time.advance(elapsed);
        time
    }

    /// Moves to the next frame.
    pub fn advance(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
        self.total += elapsed;
        self.frame += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Last frame's duration in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn total_ms(&self) -> f64 {
        self.total.as_secs_f64() * 1000.0
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

//=========================================================================
// Tests
//=========================================================================
