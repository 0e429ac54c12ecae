use crate::error::{SimulationError, SimulationResult};
use itertools::Itertools;
use nalgebra::{Vector2, Vector3};

const MIN_WINDOW: f64 = 1e-9;

/// A course as a polyline. `x`/`y` are horizontal miles, `z` is elevation
/// in miles, so grade is a plain rise-over-run ratio.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    points: Vec<Vector3<f64>>,
    /// Cumulative horizontal distance at each point.
    cumulative: Vec<f64>,
    length: f64,
    markers: Vec<f64>,
}

impl Route {
    pub fn new(name: String, points: Vec<Vector3<f64>>) -> SimulationResult<Self> {
        if points.len() < 2 {
            return Err(SimulationError::configuration(format!(
                "route '{}' needs at least two points",
                name
            )));
        }

        if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite())) {
            return Err(SimulationError::configuration(format!(
                "route '{}' has a non-finite point",
                name
            )));
        }

        let mut cumulative = Vec::with_capacity(points.len());
        cumulative.push(0.0);

        for (from, to) in points.iter().tuple_windows() {
            let step = Self::horizontal(to) - Self::horizontal(from);
            let last = cumulative.last().copied().unwrap_or(0.0);
            cumulative.push(last + step.norm());
        }

        let length = cumulative.last().copied().unwrap_or(0.0);

        if length <= 0.0 {
            return Err(SimulationError::configuration(format!(
                "route '{}' has zero length",
                name
            )));
        }

        Ok(Route {
            name,
            points,
            cumulative,
            length,
            markers: Vec::new(),
        })
    }

    /// Straight course of `length` miles climbing at a constant `grade`.
    pub fn straight(name: &str, length: f64, grade: f64) -> SimulationResult<Self> {
        Self::new(
            name.to_string(),
            vec![Vector3::zeros(), Vector3::new(length, 0.0, length * grade)],
        )
    }

    /// Attaches race opportunity markers. Stored sorted and de-duplicated;
    /// each must sit strictly inside the course.
    pub fn with_markers(mut self, markers: Vec<f64>) -> SimulationResult<Self> {
        if let Some(bad) = markers
            .iter()
            .find(|&&m| !(m.is_finite() && m > 0.0 && m < self.length))
        {
            return Err(SimulationError::configuration(format!(
                "opportunity marker {} is outside route '{}' (length {:.3})",
                bad, self.name, self.length
            )));
        }

        self.markers = markers
            .into_iter()
            .sorted_by(|a, b| a.total_cmp(b))
            .dedup()
            .collect();

        Ok(self)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn markers(&self) -> &[f64] {
        &self.markers
    }

    /// Elevation at a cumulative distance, clamped to the course ends.
    pub fn elevation_at(&self, distance: f64) -> f64 {
        let distance = distance.clamp(0.0, self.length);
        let index = self
            .cumulative
            .partition_point(|&d| d <= distance)
            .clamp(1, self.points.len() - 1);

        let (start, end) = (self.cumulative[index - 1], self.cumulative[index]);
        let (from, to) = (&self.points[index - 1], &self.points[index]);

        if end - start <= 0.0 {
            return to.z;
        }

        let t = (distance - start) / (end - start);
        from.z + (to.z - from.z) * t
    }

    /// Mean grade over a window centred on `distance`, clamped to the course.
    pub fn grade_at(&self, distance: f64, window: f64) -> f64 {
        let half = window.max(MIN_WINDOW) / 2.0;
        let low = (distance - half).clamp(0.0, self.length);
        let high = (distance + half).clamp(0.0, self.length);

        if high - low < MIN_WINDOW {
            return 0.0;
        }

        (self.elevation_at(high) - self.elevation_at(low)) / (high - low)
    }

    /// Grade for a distance that may exceed one lap; used by workouts that
    /// loop the course.
    pub fn grade_at_lap(&self, distance: f64, window: f64) -> f64 {
        self.grade_at(distance.rem_euclid(self.length), window)
    }

    /// Length-weighted mean uphill grade. Downhills do not offset climbs.
    pub fn difficulty(&self) -> f64 {
        let climbing: f64 = self
            .points
            .iter()
            .zip(self.cumulative.iter())
            .tuple_windows()
            .map(|((from, d0), (to, d1))| {
                let run = d1 - d0;
                if run <= 0.0 {
                    0.0
                } else {
                    (to.z - from.z).max(0.0)
                }
            })
            .sum();

        climbing / self.length
    }

    #[inline]
    fn horizontal(point: &Vector3<f64>) -> Vector2<f64> {
        Vector2::new(point.x, point.y)
    }
}
