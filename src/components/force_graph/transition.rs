//! Timed opacity transition applied to the chart surface once it is drawn.

/// Symmetric cubic easing: slow start, fast middle, slow end.
fn cubic_in_out(t: f64) -> f64 {
	if t <= 0.5 {
		4.0 * t * t * t
	} else {
		let u = 2.0 - 2.0 * t;
		1.0 - u * u * u / 2.0
	}
}

/// Fades the surface from nearly transparent to opaque.
#[derive(Clone, Debug)]
pub struct FadeIn {
	/// Starting opacity. Kept above zero so the surface still lays out.
	pub from: f64,
	/// Final opacity.
	pub to: f64,
	/// Duration in milliseconds.
	pub duration_ms: f64,
}

impl Default for FadeIn {
	fn default() -> Self {
		Self {
			from: 1e-6,
			to: 1.0,
			duration_ms: 1000.0,
		}
	}
}

impl FadeIn {
	/// Opacity `elapsed_ms` after the transition started.
	pub fn opacity_at(&self, elapsed_ms: f64) -> f64 {
		if self.is_done(elapsed_ms) {
			return self.to;
		}
		let t = (elapsed_ms / self.duration_ms).max(0.0);
		self.from + (self.to - self.from) * cubic_in_out(t)
	}

	/// Whether the transition has reached its final opacity.
	pub fn is_done(&self, elapsed_ms: f64) -> bool {
		elapsed_ms >= self.duration_ms
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_nearly_invisible_and_ends_opaque() {
		let fade = FadeIn::default();
		assert_eq!(fade.opacity_at(0.0), 1e-6);
		assert_eq!(fade.opacity_at(1000.0), 1.0);
		assert_eq!(fade.opacity_at(5000.0), 1.0);
		assert!(!fade.is_done(999.0));
		assert!(fade.is_done(1000.0));
	}

	#[test]
	fn is_monotone_and_symmetric() {
		let fade = FadeIn::default();
		let mut last = fade.opacity_at(0.0);
		for ms in (10..=1000).step_by(10) {
			let opacity = fade.opacity_at(ms as f64);
			assert!(opacity >= last, "opacity dropped at {ms}ms");
			last = opacity;
		}
		let mid = fade.opacity_at(500.0);
		assert!((mid - (1e-6 + (1.0 - 1e-6) * 0.5)).abs() < 1e-12);
	}

	#[test]
	fn zero_duration_jumps_to_target() {
		let fade = FadeIn {
			duration_ms: 0.0,
			..FadeIn::default()
		};
		assert_eq!(fade.opacity_at(0.0), 1.0);
	}
}
