//! Greedy chaining of track segments into centreline polylines.
//!
//! Tracks are stored in an arena and indexed by their quantised
//! endpoints. Each chain starts at the first unvisited track and grows
//! forward from its end, then backward from its start, always taking the
//! first unvisited track of equal width that shares the endpoint.

use std::collections::HashMap;

use pcbkit_core::{Point, Track};

const WIDTH_EPS: f64 = 1e-9;

/// A chained centreline.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub width: f64,
    /// The chain returned to its first point. The closing point is not
    /// repeated.
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Start,
    End,
}

type GridKey = (i64, i64);

fn quantize(p: Point, grid: f64) -> GridKey {
    ((p.x / grid).round() as i64, (p.y / grid).round() as i64)
}

struct EndpointIndex<'a> {
    tracks: &'a [Track],
    grid: f64,
    index: HashMap<GridKey, Vec<(usize, End)>>,
    visited: Vec<bool>,
}

impl<'a> EndpointIndex<'a> {
    fn new(tracks: &'a [Track], grid: f64) -> Self {
        let mut index: HashMap<GridKey, Vec<(usize, End)>> = HashMap::new();
        for (id, t) in tracks.iter().enumerate() {
            index
                .entry(quantize(t.start, grid))
                .or_default()
                .push((id, End::Start));
            index
                .entry(quantize(t.end, grid))
                .or_default()
                .push((id, End::End));
        }
        Self {
            tracks,
            grid,
            index,
            visited: vec![false; tracks.len()],
        }
    }

    /// Take the first unvisited same-width track touching `at` and return
    /// its far endpoint.
    fn take_next(&mut self, at: Point, width: f64) -> Option<Point> {
        let candidates = self.index.get(&quantize(at, self.grid))?;
        let (id, end) = candidates.iter().copied().find(|(id, _)| {
            !self.visited[*id] && (self.tracks[*id].width - width).abs() < WIDTH_EPS
        })?;
        self.visited[id] = true;
        let track = &self.tracks[id];
        Some(match end {
            End::Start => track.end,
            End::End => track.start,
        })
    }

    fn extend(&mut self, mut at: Point, width: f64) -> Vec<Point> {
        let mut points = Vec::new();
        while let Some(next) = self.take_next(at, width) {
            points.push(next);
            at = next;
        }
        points
    }
}

/// Chain tracks into polylines. Zero-length tracks are skipped.
pub fn chain_tracks(tracks: &[Track], grid: f64) -> Vec<Polyline> {
    let usable: Vec<Track> = tracks
        .iter()
        .copied()
        .filter(|t| t.start.is_finite() && t.end.is_finite())
        .filter(|t| quantize(t.start, grid) != quantize(t.end, grid))
        .collect();

    let mut index = EndpointIndex::new(&usable, grid);
    let mut chains = Vec::new();

    for seed in 0..usable.len() {
        if index.visited[seed] {
            continue;
        }
        index.visited[seed] = true;
        let track = usable[seed];

        let forward = index.extend(track.end, track.width);
        let backward = index.extend(track.start, track.width);

        let mut points: Vec<Point> = backward.into_iter().rev().collect();
        points.push(track.start);
        points.push(track.end);
        points.extend(forward);

        let closed = points.len() > 3
            && quantize(points[0], grid) == quantize(points[points.len() - 1], grid);
        if closed {
            points.pop();
        }

        chains.push(Polyline {
            points,
            width: track.width,
            closed,
        });
    }

    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(a: (f64, f64), b: (f64, f64), w: f64) -> Track {
        Track::new(a.into(), b.into(), w)
    }

    #[test]
    fn test_chains_connected_segments() {
        let tracks = [
            t((0.0, 0.0), (1.0, 0.0), 0.2),
            t((2.0, 1.0), (1.0, 0.0), 0.2),
            t((2.0, 1.0), (3.0, 1.0), 0.2),
        ];
        let chains = chain_tracks(&tracks, 0.001);
        assert_eq!(chains.len(), 1);
        assert_eq!(
            chains[0].points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(2.0, 1.0),
                Point::new(3.0, 1.0)
            ]
        );
        assert!(!chains[0].closed);
    }

    #[test]
    fn test_extends_backwards_from_seed() {
        let tracks = [
            t((1.0, 0.0), (2.0, 0.0), 0.2),
            t((0.0, 0.0), (1.0, 0.0), 0.2),
        ];
        let chains = chain_tracks(&tracks, 0.001);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(chains[0].points.last(), Some(&Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_quantised_endpoints_join() {
        let tracks = [
            t((0.0, 0.0), (1.0, 0.0), 0.2),
            t((1.0002, 0.0001), (1.0, 1.0), 0.2),
        ];
        assert_eq!(chain_tracks(&tracks, 0.001).len(), 1);
        assert_eq!(chain_tracks(&tracks, 0.0001).len(), 2);
    }

    #[test]
    fn test_width_change_breaks_chain() {
        let tracks = [
            t((0.0, 0.0), (1.0, 0.0), 0.2),
            t((1.0, 0.0), (2.0, 0.0), 0.5),
        ];
        let chains = chain_tracks(&tracks, 0.001);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[1].width, 0.5);
    }

    #[test]
    fn test_closed_loop() {
        let tracks = [
            t((0.0, 0.0), (1.0, 0.0), 0.1),
            t((1.0, 0.0), (1.0, 1.0), 0.1),
            t((1.0, 1.0), (0.0, 1.0), 0.1),
            t((0.0, 1.0), (0.0, 0.0), 0.1),
        ];
        let chains = chain_tracks(&tracks, 0.001);
        assert_eq!(chains.len(), 1);
        assert!(chains[0].closed);
        assert_eq!(chains[0].points.len(), 4);
    }

    #[test]
    fn test_zero_length_tracks_skipped() {
        let tracks = [t((1.0, 1.0), (1.0, 1.0), 0.2)];
        assert!(chain_tracks(&tracks, 0.001).is_empty());
    }
}
