//! Periodic (wrap-around) linear interpolation.

use crate::error::{PrepError, Result};

/// A known sample on a circular domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Position on the domain, reduced into `[0, period)`.
    pub position: f64,
    pub value: f64,
}

/// Linear interpolation over anchors on a circular domain of length `period`.
///
/// Queries between the last and first anchor blend across the wrap point, so
/// the value just after the period boundary mixes the final and initial
/// samples instead of clamping to either.
///
/// # Examples
///
/// ```
/// use demand_prep::interp::PeriodicInterpolator;
///
/// // Anchors at 90 and 270 on a 360-unit circle.
/// let interp = PeriodicInterpolator::new(&[(90.0, 1.0), (270.0, 3.0)], 360.0)?;
/// assert_eq!(interp.value_at(180.0), 2.0);
/// assert_eq!(interp.value_at(0.0), 2.0); // wraps from 270 through 360 to 90
/// # Ok::<(), demand_prep::error::PrepError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PeriodicInterpolator {
    anchors: Vec<Anchor>,
    period: f64,
}

impl PeriodicInterpolator {
    /// Builds an interpolator from `(position, value)` pairs.
    ///
    /// Positions are reduced modulo `period` and sorted; input order does not
    /// matter.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Interpolation`] if `period` is not positive and
    /// finite, no anchors are given, or two anchors share a position; and
    /// [`PrepError::NonFinite`] if any position or value is NaN/infinite.
    pub fn new(points: &[(f64, f64)], period: f64) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(PrepError::Interpolation(format!(
                "period must be positive and finite, got {period}"
            )));
        }
        if points.is_empty() {
            return Err(PrepError::Interpolation("at least one anchor is required".into()));
        }

        let mut anchors = Vec::with_capacity(points.len());
        for &(position, value) in points {
            if !position.is_finite() {
                return Err(PrepError::NonFinite {
                    context: "anchor position".into(),
                    value: position,
                });
            }
            if !value.is_finite() {
                return Err(PrepError::NonFinite {
                    context: format!("anchor value at position {position}"),
                    value,
                });
            }
            anchors.push(Anchor {
                position: position.rem_euclid(period),
                value,
            });
        }
        anchors.sort_by(|a, b| a.position.total_cmp(&b.position));

        if let Some(pair) = anchors.windows(2).find(|w| w[0].position == w[1].position) {
            return Err(PrepError::Interpolation(format!(
                "duplicate anchor position {}",
                pair[0].position
            )));
        }

        Ok(Self { anchors, period })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Anchors sorted by reduced position.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Interpolated value at `x`; any real `x` is accepted and reduced
    /// modulo the period.
    pub fn value_at(&self, x: f64) -> f64 {
        let x = x.rem_euclid(self.period);
        let n = self.anchors.len();

        // First anchor strictly after x; the one before it (cyclically) is the left neighbour.
        let next_idx = self.anchors.partition_point(|a| a.position <= x) % n;
        let prev_idx = (next_idx + n - 1) % n;
        let prev = self.anchors[prev_idx];
        let next = self.anchors[next_idx];

        let mut gap = (next.position - prev.position).rem_euclid(self.period);
        if gap == 0.0 {
            // single anchor: the whole circle is one segment
            gap = self.period;
        }
        let offset = (x - prev.position).rem_euclid(self.period);
        if offset == 0.0 {
            return prev.value;
        }
        prev.value + (next.value - prev.value) * (offset / gap)
    }
}
