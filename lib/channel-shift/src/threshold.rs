//! Per-channel offsets.

use rand::Rng;

pub const MIN_THRESHOLD: i32 = 5;
pub const MAX_THRESHOLD: i32 = 20;

/// Source of channel offsets.
///
/// Production code draws from the thread-local RNG. Tests plug in
/// [`FixedThresholds`] to get a reproducible output.
pub trait ThresholdSource: Send + Sync {
    /// Offsets for one image.
    fn draw(&self) -> Thresholds;
}

/// Uniform offsets in `[MIN_THRESHOLD, MAX_THRESHOLD]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomThresholds;

impl ThresholdSource for RandomThresholds {
    /// Red, green and blue are drawn independently, in that order.
    fn draw(&self) -> Thresholds {
        let mut rng = rand::rng();
        Thresholds {
            red: rng.random_range(MIN_THRESHOLD..=MAX_THRESHOLD),
            green: rng.random_range(MIN_THRESHOLD..=MAX_THRESHOLD),
            blue: rng.random_range(MIN_THRESHOLD..=MAX_THRESHOLD),
        }
    }
}

/// Always yields the same triple.
#[derive(Debug, Clone, Copy)]
pub struct FixedThresholds(pub Thresholds);

impl ThresholdSource for FixedThresholds {
    fn draw(&self) -> Thresholds {
        self.0
    }
}

/// Offsets used for one image. The blue offset is applied negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl Thresholds {
    pub fn new(red: i32, green: i32, blue: i32) -> Self {
        Self { red, green, blue }
    }
}
