//! # Curve Sampler
//!
//! Turns a [`Curve`] description into data-space samples. Sampling is a pure
//! function of the curve: [`CurveSamples`] is a cloneable iterator, so the
//! bounds pass and the painter can each walk the same sequence independently.

use glam::DVec2;

use crate::model::{Curve, CurveType};

/// Iterator over the `(x, y)` samples of a curve, in increasing `x`.
///
/// `x` steps from `x_range.min` to `x_range.max` inclusive. Each `x` is derived
/// from its index rather than by accumulation, so the last sample lands on
/// `max` exactly. Samples outside the function's domain (or with a non-finite
/// result) are skipped.
#[derive(Clone, Debug)]
pub struct CurveSamples {
    curve_type: CurveType,
    coefficient: f64,
    ln_base: f64,
    base: f64,
    min: f64,
    step: f64,
    count: usize,
    next: usize,
}

impl CurveSamples {
    pub fn new(curve: &Curve) -> Self {
        let min = curve.x_range.min;
        let max = curve.x_range.max;
        let span = max - min;
        let (count, step) = if curve.points <= 1 || span == 0.0 || !span.is_finite() {
            (1, 0.0)
        } else {
            (curve.points, span / (curve.points - 1) as f64)
        };
        let base = curve.base_or_default();
        Self {
            curve_type: curve.curve_type,
            coefficient: curve.coefficient_or_default(),
            ln_base: base.ln(),
            base,
            min,
            step,
            count,
            next: 0,
        }
    }

    /// Evaluates the curve at `x`, or `None` outside its domain.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let y = match self.curve_type {
            CurveType::Linear => self.coefficient * x,
            CurveType::Quadratic => self.coefficient * x * x,
            CurveType::Logarithm => {
                if x <= 0.0 {
                    return None;
                }
                self.coefficient * x.ln() / self.ln_base
            }
            CurveType::Exponential => self.coefficient * self.base.powf(x),
        };
        y.is_finite().then_some(y)
    }

    /// Splits the samples into contiguous runs; a skipped sample ends a run.
    pub fn runs(&self) -> Vec<Vec<DVec2>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for i in 0..self.count {
            let x = self.x_at(i);
            match self.evaluate(x) {
                Some(y) => current.push(DVec2::new(x, y)),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    fn x_at(&self, i: usize) -> f64 {
        self.min + self.step * i as f64
    }
}

impl Iterator for CurveSamples {
    type Item = DVec2;

    fn next(&mut self) -> Option<DVec2> {
        while self.next < self.count {
            let x = self.x_at(self.next);
            self.next += 1;
            if let Some(y) = self.evaluate(x) {
                return Some(DVec2::new(x, y));
            }
        }
        None
    }
}

/// Samples `curve` using its own sample count.
pub fn sample(curve: &Curve) -> CurveSamples {
    CurveSamples::new(curve)
}
