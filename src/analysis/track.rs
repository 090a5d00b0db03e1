//! Driven path and tightest corner radius

use serde::Serialize;

use crate::config::MonitorConfig;
use crate::types::TelemetrySample;

/// Triangles with a smaller area are treated as collinear.
const MIN_TRIANGLE_AREA: f32 = 0.1;

/// A recorded point on the driven line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TrackPoint {
    pub x: f32,
    pub z: f32,
    pub speed_kmh: f32,
}

/// The tightest corner seen so far, located at the middle point of its triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TightestCorner {
    pub radius: f32,
    pub x: f32,
    pub z: f32,
}

/// Records the driven line on valid laps and estimates corner radii.
#[derive(Debug, Clone, Default)]
pub struct TrackRecorder {
    config: MonitorConfig,
    path: Vec<TrackPoint>,
    distance: f32,
    tightest: Option<TightestCorner>,
}

impl TrackRecorder {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn update(&mut self, sample: &TelemetrySample) {
        if !sample.is_playing() || sample.speed < 1.0 || sample.in_pit() || sample.lap_invalidated {
            return;
        }
        let Some((x, z)) = sample.world_position_xz() else {
            return;
        };
        let point = TrackPoint { x, z, speed_kmh: sample.speed_kmh() };

        let Some(last) = self.path.last() else {
            self.path.push(point);
            return;
        };
        let step = (x - last.x).hypot(z - last.z);
        if step < self.config.track_point_spacing {
            return;
        }

        self.path.push(point);
        self.distance += step;
        if let [.., a, b, c] = self.path.as_slice() {
            self.measure_corner(*a, *b, *c);
        }
    }

    fn measure_corner(&mut self, a: TrackPoint, b: TrackPoint, c: TrackPoint) {
        let Some(radius) = circumradius(a, b, c) else {
            return;
        };
        if radius >= self.config.max_corner_radius {
            return;
        }
        if self.tightest.is_none_or(|t| radius < t.radius) {
            self.tightest = Some(TightestCorner { radius, x: b.x, z: b.z });
        }
    }

    pub fn path(&self) -> &[TrackPoint] {
        &self.path
    }

    /// Distance along the recorded path in metres.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn tightest_corner(&self) -> Option<TightestCorner> {
        self.tightest
    }

    pub fn reset(&mut self) {
        self.path.clear();
        self.distance = 0.0;
        self.tightest = None;
    }
}

/// Radius of the circle through three points, `None` when they are collinear.
fn circumradius(a: TrackPoint, b: TrackPoint, c: TrackPoint) -> Option<f32> {
    let ab = (b.x - a.x).hypot(b.z - a.z);
    let bc = (c.x - b.x).hypot(c.z - b.z);
    let ca = (a.x - c.x).hypot(a.z - c.z);
    let area = 0.5 * (a.x * (b.z - c.z) + b.x * (c.z - a.z) + c.x * (a.z - b.z)).abs();
    (area > MIN_TRIANGLE_AREA).then(|| ab * bc * ca / (4.0 * area))
}
