use serde::{Deserialize, Serialize};

/// A country indicator sampled at irregular years.
///
/// Lookups return the exact value when the year is present, interpolate
/// linearly between the two surrounding samples, and clamp to the nearest
/// endpoint outside the covered range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearSeries {
    points: Vec<(i32, f64)>,
}

impl YearSeries {
    pub fn new(mut points: Vec<(i32, f64)>) -> Self {
        points.sort_by_key(|&(year, _)| year);
        points.dedup_by_key(|&mut (year, _)| year);
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn value_at(&self, year: i32) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        match self.points.binary_search_by_key(&year, |&(y, _)| y) {
            Ok(i) => Some(self.points[i].1),
            Err(0) => Some(self.points[0].1),
            Err(i) if i == self.points.len() => Some(self.points[i - 1].1),
            Err(i) => {
                let (y0, v0) = self.points[i - 1];
                let (y1, v1) = self.points[i];
                let ratio = f64::from(year - y0) / f64::from(y1 - y0);
                Some(v0 + ratio * (v1 - v0))
            }
        }
    }

    pub fn value_or(&self, year: i32, default: f64) -> f64 {
        self.value_at(year).unwrap_or(default)
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<(i32, f64)> {
        self.points.last().copied()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        match (self.points.first(), self.points.last()) {
            (Some(&(min, _)), Some(&(max, _))) => Some((min, max)),
            _ => None,
        }
    }
}
