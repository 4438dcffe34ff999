use crate::coord_conversion::{line_to_lat_lng, line_to_web_merc};
use geo::{Coord, Euclidean, Length, LineInterpolatePoint, LineString};

/// Cut a lon/lat polyline into `pieces` parts of equal Web Mercator length.
///
/// Cut points are interpolated on the metric polyline. The last piece always
/// ends on the input's final vertex so consecutive pieces share endpoints.
pub fn split_equal_length(line: &LineString, pieces: usize) -> Vec<LineString> {
    if pieces <= 1 || line.0.len() < 2 {
        return vec![line.clone()];
    }

    let metric = line_to_web_merc(line);
    // distance along the line at each vertex
    let mut cumulative = Vec::with_capacity(metric.0.len());
    cumulative.push(0.0);
    for segment in metric.lines() {
        let walked = cumulative[cumulative.len() - 1] + Euclidean.length(&segment);
        cumulative.push(walked);
    }
    let total = cumulative[cumulative.len() - 1];
    if total <= 0.0 {
        return vec![line.clone()];
    }

    let step = total / pieces as f64;
    (0..pieces)
        .map(|i| {
            let start = i as f64 * step;
            let end = if i == pieces - 1 { total } else { (i + 1) as f64 * step };
            line_to_lat_lng(&LineString::new(substring(&metric, &cumulative, start, end)))
        })
        .collect()
}

fn cut_point(metric: &LineString, fraction: f64) -> Coord {
    metric
        .line_interpolate_point(fraction.clamp(0.0, 1.0))
        .map(|p| p.0)
        .unwrap_or(metric.0[0])
}

fn substring(metric: &LineString, cumulative: &[f64], start: f64, end: f64) -> Vec<Coord> {
    let total = cumulative[cumulative.len() - 1];
    let mut piece = vec![cut_point(metric, start / total)];
    for (c, &d) in metric.0.iter().zip(cumulative) {
        if d > start && d < end {
            piece.push(*c);
        }
    }
    if end >= total {
        piece.push(metric.0[metric.0.len() - 1]);
    } else {
        piece.push(cut_point(metric, end / total));
    }
    piece
}
