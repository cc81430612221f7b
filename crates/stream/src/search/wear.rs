//! Single-precision wear arithmetic.
//!
//! Wear values are single precision in the data this tool consumes, so every
//! intermediate step of the computation must round to the nearest
//! representable 32-bit float before feeding the next step. The evaluator
//! works in `f32` directly, which rounds identically after each native
//! operation; normalization divides in `f64` and narrows once so the raw
//! sample keeps its full entered precision until the division lands.

use serde::Serialize;

/// Round a double-precision value to the nearest representable 32-bit float.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_f32(value: f64) -> f32 {
	value as f32
}

/// Half-open wear interval `[min, max)` stored at single precision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WearRange {
	/// Lower bound, inclusive.
	pub min: f32,
	/// Upper bound, exclusive.
	pub max: f32,
}

impl WearRange {
	/// Build a range from double-precision bounds, narrowing each once.
	#[must_use]
	pub fn new(min: f64, max: f64) -> Self {
		Self {
			min: round_f32(min),
			max: round_f32(max),
		}
	}

	/// Width of the interval as a single-precision difference.
	#[must_use]
	pub fn span(&self) -> f32 {
		self.max - self.min
	}
}

/// Rescale a raw sample into `[0, 1]` relative to its source range.
///
/// The quotient is computed in double precision and narrowed once, then
/// clamped. A degenerate span (zero or negative width) maps to `0.0` rather
/// than erroring; such ranges occur for items whose wear never varies.
#[must_use]
pub fn normalize(raw: f64, range: WearRange) -> f32 {
	let span = f64::from(range.max) - f64::from(range.min);
	if span <= 0.0 {
		return 0.0;
	}
	round_f32((raw - f64::from(range.min)) / span).clamp(0.0, 1.0)
}

/// Reduce normalized fractions to a single wear value inside `target`.
///
/// Each arithmetic step is a native `f32` operation and therefore rounds to
/// the nearest representable 32-bit float before the next step: running sum,
/// division by the subset size, scaling by the target span, and the final
/// offset. The result is not clamped; rounding may push it marginally past
/// the target bounds and consumers accept that.
///
/// `values` must be non-empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn evaluate(values: &[f32], target: WearRange) -> f32 {
	let mut sum = 0.0f32;
	for value in values {
		sum += value;
	}
	let average = sum / values.len() as f32;
	target.min + average * target.span()
}

/// How an evaluated wear value relates to the desired value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchKind {
	/// Outside the window and not exact.
	None,
	/// Inside the tolerance window.
	Tolerance,
	/// Satisfied the exact rule; may simultaneously sit inside the window.
	Exact,
}

impl MatchKind {
	/// Whether the value should be reported at all.
	#[must_use]
	pub fn is_match(self) -> bool {
		!matches!(self, MatchKind::None)
	}
}

/// Classify `value` against the desired wear and tolerance window.
///
/// Rules, in priority order:
/// - exact when `value` equals `desired` narrowed to `f32`, or, with a zero
///   `specificity`, when truncating `value` to as many decimal digits as
///   `desired` carries reproduces `desired`. The truncation rule exists
///   because users enter targets with fewer digits than the engine computes;
///   it is deliberately permissive and must stay that way.
/// - tolerance when `desired <= value <= desired + specificity`, compared in
///   double precision against the narrowed desired value. A reversed or
///   negative window simply never matches.
///
/// Exactness is a display classification on top of the window test, not a
/// replacement for it.
#[must_use]
pub fn classify(value: f32, desired: f64, specificity: f64) -> MatchKind {
	let desired_f32 = round_f32(desired);
	let exact = value == desired_f32
		|| (specificity == 0.0
			&& truncate_decimals(f64::from(value), count_decimals(desired)) == desired);
	if exact {
		return MatchKind::Exact;
	}
	let value = f64::from(value);
	if value >= f64::from(desired_f32) && value <= f64::from(desired_f32) + specificity {
		MatchKind::Tolerance
	} else {
		MatchKind::None
	}
}

/// Truncate toward zero to `digits` decimal places.
///
/// Non-negative scaled values floor, negative ones ceil; the asymmetry keeps
/// truncation a strict drop of trailing digits for either sign.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn truncate_decimals(value: f64, digits: u32) -> f64 {
	let multiplier = 10f64.powi(digits as i32);
	let scaled = value * multiplier;
	let truncated = if scaled < 0.0 {
		scaled.ceil()
	} else {
		scaled.floor()
	};
	truncated / multiplier
}

/// Count the decimal digits in the shortest decimal rendering of `value`.
///
/// Integral values count as zero digits regardless of how they render.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn count_decimals(value: f64) -> u32 {
	if value.fract() == 0.0 {
		return 0;
	}
	let rendered = value.to_string();
	match rendered.split_once('.') {
		Some((_, decimals)) => decimals.len() as u32,
		None => 0,
	}
}
