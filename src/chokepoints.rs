// ===========================================================================
// Maritime chokepoints and their metric buffers
// ===========================================================================
use crate::coord_conversion::lat_lng_to_web_merc;
use geo::line_measures::Distance;
use geo::{BoundingRect, Euclidean, Line, LineString, Point};
use std::collections::BTreeSet;

/// (name, lat, lon)
const MARITIME_CHOKEPOINTS: [(&str, f64, f64); 12] = [
    ("Suez Canal", 30.5852, 32.2654),
    ("Panama Canal", 9.0765, -79.6957),
    ("Strait of Hormuz", 26.5667, 56.2500),
    ("Bab el-Mandeb", 12.5833, 43.3333),
    ("Strait of Malacca", 4.1667, 99.5000),
    ("Bosphorus", 41.1167, 29.0833),
    ("Dardanelles", 40.0167, 26.2167),
    ("Strait of Gibraltar", 35.9500, -5.6000),
    ("English Channel", 50.0, -0.5),
    ("Danish Straits", 55.5, 11.0),
    ("Lombok Strait", -8.7667, 115.7167),
    ("Sunda Strait", -5.9167, 105.8833),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Chokepoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub buffer_radius_km: f64,
}

/// Disk around a chokepoint in Web Mercator meters.
#[derive(Debug, Clone)]
struct ChokepointBuffer {
    center: Point,
    radius_m: f64,
}

impl ChokepointBuffer {
    fn intersects(&self, metric_line: &LineString) -> bool {
        let Some(rect) = metric_line.bounding_rect() else {
            return false;
        };
        let (cx, cy) = self.center.x_y();
        // cheap reject before walking segments
        if cx < rect.min().x - self.radius_m
            || cx > rect.max().x + self.radius_m
            || cy < rect.min().y - self.radius_m
            || cy > rect.max().y + self.radius_m
        {
            return false;
        }

        if metric_line.0.len() == 1 {
            return Euclidean.distance(&self.center, &Point::from(metric_line.0[0])) <= self.radius_m;
        }
        metric_line
            .lines()
            .any(|segment: Line| Euclidean.distance(&self.center, &segment) <= self.radius_m)
    }
}

#[derive(Debug, Clone)]
pub struct ChokepointRegistry {
    chokepoints: Vec<Chokepoint>,
    buffers: Vec<ChokepointBuffer>,
}

impl ChokepointRegistry {
    /// The twelve straits and canals tracked on world shipping lanes.
    pub fn maritime_defaults(buffer_radius_km: f64) -> Self {
        Self::new(
            MARITIME_CHOKEPOINTS
                .iter()
                .map(|&(name, lat, lon)| Chokepoint {
                    name: name.to_string(),
                    lat,
                    lon,
                    buffer_radius_km,
                })
                .collect(),
        )
    }

    pub fn new(chokepoints: Vec<Chokepoint>) -> Self {
        let buffers = chokepoints
            .iter()
            .map(|cp| {
                let (x, y) = lat_lng_to_web_merc(cp.lon, cp.lat);
                ChokepointBuffer {
                    center: Point::new(x, y),
                    radius_m: cp.buffer_radius_km * 1000.0,
                }
            })
            .collect();
        Self {
            chokepoints,
            buffers,
        }
    }

    pub fn chokepoints(&self) -> &[Chokepoint] {
        &self.chokepoints
    }

    pub fn len(&self) -> usize {
        self.chokepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chokepoints.is_empty()
    }

    /// Names of every chokepoint whose buffer the Web Mercator polyline touches.
    pub fn tag(&self, metric_line: &LineString) -> BTreeSet<String> {
        self.chokepoints
            .iter()
            .zip(&self.buffers)
            .filter(|(_, buffer)| buffer.intersects(metric_line))
            .map(|(cp, _)| cp.name.clone())
            .collect()
    }
}
