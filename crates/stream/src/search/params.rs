use thiserror::Error;

use super::wear::WearRange;

/// Inputs that define a single combination search run.
#[derive(Clone, Copy, Debug)]
pub struct SearchParameters {
	/// Target wear interval the evaluated average is scaled into.
	pub target_range: WearRange,
	/// Wear value being hunted for, exactly as entered.
	pub desired: f64,
	/// Width of the tolerance window added on top of `desired`.
	pub specificity: f64,
	/// Number of samples combined per candidate subset.
	pub subset_size: usize,
}

/// Validation failure reported to the caller before a run begins.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ParameterError {
	/// A numeric field held NaN or an infinity.
	#[error("{field} must be a finite number")]
	NotFinite {
		/// Which field was rejected.
		field: &'static str,
	},
	/// The target interval is empty or reversed.
	#[error("minimum wear {min} must be below maximum wear {max}")]
	EmptyTargetRange {
		/// Offending lower bound.
		min: f32,
		/// Offending upper bound.
		max: f32,
	},
	/// A subset of zero samples has nothing to average.
	#[error("subset size must be at least 1")]
	ZeroSubsetSize,
	/// Fewer usable samples than the subset size.
	#[error("subset size {subset_size} exceeds the {available} usable samples")]
	NotEnoughSamples {
		/// Requested subset size.
		subset_size: usize,
		/// Samples actually supplied.
		available: usize,
	},
	/// A negative window has no tolerance semantics.
	#[error("specificity {specificity} must not be negative")]
	NegativeSpecificity {
		/// Offending value.
		specificity: f64,
	},
}

impl SearchParameters {
	/// Check every parameter eagerly against the supplied sample count.
	///
	/// All recoverable conditions are rejected here, before enumeration;
	/// nothing fails validation mid-run.
	pub fn validate(&self, sample_count: usize) -> Result<(), ParameterError> {
		let fields = [
			("minimum wear", f64::from(self.target_range.min)),
			("maximum wear", f64::from(self.target_range.max)),
			("desired wear", self.desired),
			("specificity", self.specificity),
		];
		for (field, value) in fields {
			if !value.is_finite() {
				return Err(ParameterError::NotFinite { field });
			}
		}
		if self.target_range.min >= self.target_range.max {
			return Err(ParameterError::EmptyTargetRange {
				min: self.target_range.min,
				max: self.target_range.max,
			});
		}
		if self.specificity < 0.0 {
			return Err(ParameterError::NegativeSpecificity {
				specificity: self.specificity,
			});
		}
		if self.subset_size == 0 {
			return Err(ParameterError::ZeroSubsetSize);
		}
		if self.subset_size > sample_count {
			return Err(ParameterError::NotEnoughSamples {
				subset_size: self.subset_size,
				available: sample_count,
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params() -> SearchParameters {
		SearchParameters {
			target_range: WearRange::new(0.0, 0.8),
			desired: 0.15,
			specificity: 0.0,
			subset_size: 5,
		}
	}

	#[test]
	fn accepts_sane_parameters() {
		assert_eq!(params().validate(10), Ok(()));
	}

	#[test]
	fn rejects_non_finite_bounds() {
		let mut bad = params();
		bad.target_range.max = f32::NAN;
		assert_eq!(
			bad.validate(10),
			Err(ParameterError::NotFinite {
				field: "maximum wear"
			})
		);

		let mut bad = params();
		bad.desired = f64::INFINITY;
		assert_eq!(
			bad.validate(10),
			Err(ParameterError::NotFinite {
				field: "desired wear"
			})
		);
	}

	#[test]
	fn rejects_reversed_target_range() {
		let mut bad = params();
		bad.target_range = WearRange::new(0.5, 0.5);
		assert!(matches!(
			bad.validate(10),
			Err(ParameterError::EmptyTargetRange { .. })
		));
	}

	#[test]
	fn rejects_zero_subset_size() {
		let mut bad = params();
		bad.subset_size = 0;
		assert_eq!(bad.validate(10), Err(ParameterError::ZeroSubsetSize));
	}

	#[test]
	fn rejects_undersized_sample_lists() {
		assert_eq!(
			params().validate(4),
			Err(ParameterError::NotEnoughSamples {
				subset_size: 5,
				available: 4,
			})
		);
	}

	#[test]
	fn rejects_negative_specificity() {
		let mut bad = params();
		bad.specificity = -0.01;
		assert!(matches!(
			bad.validate(10),
			Err(ParameterError::NegativeSpecificity { .. })
		));
	}
}
