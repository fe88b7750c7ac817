//! Rolling time-series buffer for the win-probability stream
//!
//! Append-only, ordered by timestamp, with a fixed-duration eviction
//! window. Eviction runs on every append so the retained set always
//! satisfies `t >= now - window`.

use std::collections::VecDeque;

use serde::Deserialize;

/// Default retention window (18 minutes, ms)
pub const WINDOW_MS: f64 = 18.0 * 60.0 * 1000.0;

/// Game event attached to a series point
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GameEvent {
    pub label: String,
}

/// One sample of the win-probability / pressure stream
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SeriesPoint {
    /// Timestamp, ms
    pub t: f64,
    /// Win probability, 0-1
    pub wp: f32,
    /// Situational pressure, 0-1
    pub pressure: f32,
    #[serde(default)]
    pub event: Option<GameEvent>,
}

/// Time-windowed sample store feeding the stream renderer
pub struct RollingSeriesBuffer {
    points: VecDeque<SeriesPoint>,
    window_ms: f64,
}

impl RollingSeriesBuffer {
    pub fn new() -> Self {
        Self::with_window(WINDOW_MS)
    }

    pub fn with_window(window_ms: f64) -> Self {
        Self {
            points: VecDeque::new(),
            window_ms,
        }
    }

    /// Append a point and evict everything older than the window.
    ///
    /// Points that would break timestamp ordering are dropped; the feed
    /// occasionally replays on reconnect.
    pub fn append(&mut self, point: SeriesPoint, now_ms: f64) {
        if let Some(last) = self.points.back() {
            if point.t < last.t {
                log::debug!("dropping out-of-order point t={}", point.t);
                return;
            }
        }

        self.points.push_back(point);

        let cutoff = now_ms - self.window_ms;
        while matches!(self.points.front(), Some(p) if p.t < cutoff) {
            self.points.pop_front();
        }
    }

    /// Min/max timestamp of the retained set; `None` when empty, in which
    /// case the renderer skips every data-dependent layer
    pub fn domain(&self) -> Option<(f64, f64)> {
        match (self.points.front(), self.points.back()) {
            (Some(first), Some(last)) => Some((first.t, last.t)),
            _ => None,
        }
    }

    /// Most recent point, for the value readout
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }
}

impl Default for RollingSeriesBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(t: f64) -> SeriesPoint {
        SeriesPoint {
            t,
            wp: 0.5,
            pressure: 0.2,
            event: None,
        }
    }

    const MINUTE: f64 = 60.0 * 1000.0;

    #[test]
    fn test_window_eviction() {
        // Points at 0, 5, 10 minutes; appending at 20 minutes with an
        // 18-minute window evicts only the t=0 point
        let mut buffer = RollingSeriesBuffer::new();
        buffer.append(point(0.0), 0.0);
        buffer.append(point(5.0 * MINUTE), 5.0 * MINUTE);
        buffer.append(point(10.0 * MINUTE), 10.0 * MINUTE);

        buffer.append(point(20.0 * MINUTE), 20.0 * MINUTE);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.domain(), Some((5.0 * MINUTE, 20.0 * MINUTE)));
    }

    #[test]
    fn test_retained_points_satisfy_window_after_every_append() {
        let mut buffer = RollingSeriesBuffer::with_window(100.0);
        for i in 0..50 {
            let t = i as f64 * 17.0;
            buffer.append(point(t), t);

            for p in buffer.iter() {
                assert!(p.t >= t - 100.0);
            }
        }
    }

    #[test]
    fn test_timestamps_monotonic_after_any_append_sequence() {
        let mut buffer = RollingSeriesBuffer::with_window(1000.0);
        for t in [5.0, 1.0, 9.0, 9.0, 3.0, 12.0] {
            buffer.append(point(t), t);

            let times: Vec<f64> = buffer.iter().map(|p| p.t).collect();
            for pair in times.windows(2) {
                assert!(pair[0] <= pair[1]);
            }
        }
        assert_eq!(buffer.len(), 4); // 5, 9, 9, 12
    }

    #[test]
    fn test_empty_buffer_has_no_domain() {
        let buffer = RollingSeriesBuffer::new();
        assert_eq!(buffer.domain(), None);
        assert!(buffer.latest().is_none());
    }

    #[test]
    fn test_latest_tracks_newest_point() {
        let mut buffer = RollingSeriesBuffer::new();
        buffer.append(point(1.0), 1.0);
        buffer.append(point(2.0), 2.0);
        assert_eq!(buffer.latest().unwrap().t, 2.0);
    }

    #[test]
    fn test_deserialize_feed_payload() {
        let json = r#"{"t": 1000.0, "wp": 0.62, "pressure": 0.8,
                       "event": {"label": "TIMEOUT"}}"#;
        let p: SeriesPoint = serde_json::from_str(json).unwrap();
        assert_eq!(p.wp, 0.62);
        assert_eq!(p.event.unwrap().label, "TIMEOUT");

        // Event field is optional
        let bare: SeriesPoint =
            serde_json::from_str(r#"{"t": 1.0, "wp": 0.5, "pressure": 0.1}"#).unwrap();
        assert!(bare.event.is_none());
    }
}
