//! Numeric bounds with clamp and interval snapping
//!
//! The same rule applies no matter where a new value comes from: code,
//! the query API, a UI control, or a persisted file.

/// Bounds for whole-number options.
///
/// With `enforce` set, values are clamped into `[min, max]`; without it
/// the bounds are advisory hints for UI controls and `apply` only snaps.
/// A non-zero `step` snaps values to the nearest interval boundary
/// counted from `min`, rounding ties up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub enforce: bool,
}

impl IntBounds {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            step: 0,
            enforce: true,
        }
    }

    /// Snap values to multiples of `step` from `min`
    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Make the bounds advisory: UI hints only, no clamping on set
    pub fn advisory(mut self) -> Self {
        self.enforce = false;
        self
    }

    /// Apply clamp and snap to a raw value.
    ///
    /// Snapping can push a value one interval past the range edge, so a
    /// snapped value is clamped again afterwards.
    pub fn apply(&self, mut value: i64) -> i64 {
        if self.enforce {
            value = value.clamp(self.min, self.max);
        }
        if self.step != 0 {
            // widened so advisory bounds with extreme min/step cannot
            // overflow the remainder arithmetic
            let min = self.min as i128;
            let step = self.step as i128;
            let mut wide = value as i128;
            let remainder = (wide - min) % step;
            wide = wide - remainder + if remainder * 2 >= step { step } else { 0 };
            value = wide.clamp(min, self.max as i128) as i64;
        }
        value
    }
}

/// Bounds for floating-point options, same semantics as [`IntBounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub enforce: bool,
}

impl FloatBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: 0.0,
            enforce: true,
        }
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn advisory(mut self) -> Self {
        self.enforce = false;
        self
    }

    pub fn apply(&self, mut value: f64) -> f64 {
        if self.enforce {
            value = value.clamp(self.min, self.max);
        }
        if self.step != 0.0 {
            let remainder = (value - self.min) % self.step;
            value = value - remainder + if remainder * 2.0 >= self.step { self.step } else { 0.0 };
            value = value.clamp(self.min, self.max);
        }
        value
    }
}
