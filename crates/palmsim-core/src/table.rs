//! Sorted (x, y) lookup table with linear interpolation/extrapolation.

use std::collections::HashMap;

/// A tabulated function, stored as points sorted ascending by `x`.
///
/// `val(x)` interpolates linearly between the two bracketing points, or
/// extrapolates linearly using the two nearest end points when `x` falls
/// outside the stored range. A single-point table returns that point's `y`
/// for every `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    points: Vec<(f64, f64)>,
}

impl Table {
    /// Build a table from an unordered mapping of x -> y, sorting by x.
    pub fn from_map(points: HashMap<i64, f64>) -> Result<Self, crate::Error> {
        Self::try_new(points.into_iter().map(|(x, y)| (x as f64, y)))
    }

    /// Build a table from any iterator of (x, y) pairs.
    pub fn try_new(
        points: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self, crate::Error> {
        let mut points: Vec<(f64, f64)> = points.into_iter().collect();
        if points.is_empty() {
            return Err(crate::Error::Quadrature("empty lookup table".into()));
        }
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("NaN in table x"));
        Ok(Table { points })
    }

    /// Evaluate the table at `x` by linear interpolation/extrapolation.
    pub fn val(&self, x: f64) -> f64 {
        if self.points.len() == 1 {
            return self.points[0].1;
        }
        if x <= self.points[0].0 {
            return Self::lerp(self.points[0], self.points[1], x);
        }
        if x >= self.points[self.points.len() - 1].0 {
            let n = self.points.len();
            return Self::lerp(self.points[n - 2], self.points[n - 1], x);
        }
        // Bracket x between consecutive stored points.
        for w in self.points.windows(2) {
            let (lo, hi) = (w[0], w[1]);
            if x >= lo.0 && x <= hi.0 {
                return Self::lerp(lo, hi, x);
            }
        }
        unreachable!("x={x} not bracketed despite range checks")
    }

    fn lerp(lo: (f64, f64), hi: (f64, f64), x: f64) -> f64 {
        if (hi.0 - lo.0).abs() < f64::EPSILON {
            return lo.1;
        }
        let t = (x - lo.0) / (hi.0 - lo.0);
        lo.1 + t * (hi.1 - lo.1)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// Parse the `x1:y1;x2:y2;...` table encoding used by the init file.
pub fn parse_table_literal(s: &str) -> Result<Table, crate::Error> {
    let mut pts = Vec::new();
    for pair in s.split(';').filter(|p| !p.trim().is_empty()) {
        let (x_str, y_str) = pair.split_once(':').ok_or_else(|| {
            crate::Error::Input(format!("malformed table entry '{pair}', expected x:y"))
        })?;
        let x: f64 = x_str
            .trim()
            .parse()
            .map_err(|_| crate::Error::Input(format!("bad table x value '{x_str}'")))?;
        let y: f64 = y_str
            .trim()
            .parse()
            .map_err(|_| crate::Error::Input(format!("bad table y value '{y_str}'")))?;
        pts.push((x, y));
    }
    Table::try_new(pts)
}
