//! Element detection and cursor-snap (§4.5).

use std::time::{Duration, Instant};

/// Axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn is_zero_area(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    /// Distance from `(x, y)` to the nearest edge; zero when inside.
    fn distance_to_edge(&self, x: i32, y: i32) -> f64 {
        if self.contains(x, y) {
            return 0.0;
        }
        let dx = (self.x - x).max(x - (self.x + self.w)).max(0);
        let dy = (self.y - y).max(y - (self.y + self.h)).max(0);
        ((dx * dx + dy * dy) as f64).sqrt()
    }
}

/// One element in the UI hierarchy at a queried point.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInfo {
    pub rect: Rect,
    pub name: String,
    pub role: String,
    /// Nesting depth; greater means more deeply nested (used for snap
    /// tie-breaking — innermost wins).
    pub depth: u32,
}

/// Platform element-detection adapter.
pub trait ElementDetector: Send + Sync {
    /// The deepest UI element containing `(x, y)`, if any.
    fn detect_element(&self, x: i32, y: i32) -> Option<ElementInfo>;

    /// The full ancestor chain at `(x, y)`, deepest first, capped at
    /// `max` entries, skipping zero-area elements.
    fn detect_elements(&self, x: i32, y: i32, max: usize) -> Vec<ElementInfo>;
}

/// No elements anywhere; the default/testable backend.
pub struct NullElementDetector;

impl ElementDetector for NullElementDetector {
    fn detect_element(&self, _x: i32, _y: i32) -> Option<ElementInfo> {
        None
    }

    fn detect_elements(&self, _x: i32, _y: i32, _max: usize) -> Vec<ElementInfo> {
        Vec::new()
    }
}

/// Resolves the platform element detector at build time; see
/// [`crate::capture::create_platform_capture_backend`] for the pattern.
pub fn create_platform_element_detector() -> Box<dyn ElementDetector> {
    Box::new(NullElementDetector)
}

const SNAP_MOVE_THRESHOLD: i32 = 5;
const SNAP_CACHE_TTL: Duration = Duration::from_millis(100);
const DEFAULT_SNAP_DISTANCE: f64 = 8.0;

struct SnapCache {
    cursor: (i32, i32),
    fetched_at: Instant,
    chain: Vec<ElementInfo>,
}

/// Caches the most recent element chain keyed by cursor position;
/// `try_snap` picks the element with the smallest edge distance, ties
/// broken by greater depth (innermost wins).
pub struct SnapEngine {
    detector: Box<dyn ElementDetector>,
    snap_distance: f64,
    cache: Option<SnapCache>,
}

impl SnapEngine {
    pub fn new(detector: Box<dyn ElementDetector>) -> Self {
        Self {
            detector,
            snap_distance: DEFAULT_SNAP_DISTANCE,
            cache: None,
        }
    }

    pub fn with_snap_distance(detector: Box<dyn ElementDetector>, snap_distance: f64) -> Self {
        Self {
            detector,
            snap_distance,
            cache: None,
        }
    }

    /// Direct pass-through to the underlying detector, bypassing the snap
    /// cache — used by `Context::detect_element`, which is a separate
    /// operation from `try_snap` (§4.5).
    pub fn detect_element(&self, x: i32, y: i32) -> Option<ElementInfo> {
        self.detector.detect_element(x, y)
    }

    pub fn detect_elements(&self, x: i32, y: i32, max: usize) -> Vec<ElementInfo> {
        self.detector.detect_elements(x, y, max)
    }

    fn chain_for(&mut self, x: i32, y: i32) -> &[ElementInfo] {
        let needs_refresh = match &self.cache {
            None => true,
            Some(cache) => {
                let moved = (cache.cursor.0 - x).abs() > SNAP_MOVE_THRESHOLD
                    || (cache.cursor.1 - y).abs() > SNAP_MOVE_THRESHOLD;
                let expired = cache.fetched_at.elapsed() > SNAP_CACHE_TTL;
                moved || expired
            }
        };
        if needs_refresh {
            let chain = self
                .detector
                .detect_elements(x, y, usize::MAX)
                .into_iter()
                .filter(|e| !e.rect.is_zero_area())
                .collect();
            self.cache = Some(SnapCache {
                cursor: (x, y),
                fetched_at: Instant::now(),
                chain,
            });
        }
        &self.cache.as_ref().unwrap().chain
    }

    /// The rect of the element closest to `(x, y)`, if within
    /// `snap_distance`; ties broken by greater depth.
    pub fn try_snap(&mut self, x: i32, y: i32) -> Option<Rect> {
        self.try_snap_with_distance(x, y, self.snap_distance)
    }

    /// Same as [`Self::try_snap`] but with a caller-supplied distance,
    /// leaving the engine's own `snap_distance` untouched — used by the
    /// one-shot snap-to-element call, which takes its distance as an
    /// argument rather than reading it from stored state.
    pub fn try_snap_with_distance(&mut self, x: i32, y: i32, snap_distance: f64) -> Option<Rect> {
        let chain = self.chain_for(x, y);
        let mut best: Option<(&ElementInfo, f64)> = None;
        for element in chain {
            let dist = element.rect.distance_to_edge(x, y);
            match best {
                None => best = Some((element, dist)),
                Some((current, current_dist)) => {
                    if dist < current_dist
                        || (dist == current_dist && element.depth > current.depth)
                    {
                        best = Some((element, dist));
                    }
                }
            }
        }
        best.and_then(|(element, dist)| {
            if dist <= snap_distance {
                Some(element.rect)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDetector(Vec<ElementInfo>);
    impl ElementDetector for FixedDetector {
        fn detect_element(&self, x: i32, y: i32) -> Option<ElementInfo> {
            self.detect_elements(x, y, 1).into_iter().next()
        }
        fn detect_elements(&self, _x: i32, _y: i32, max: usize) -> Vec<ElementInfo> {
            self.0.iter().take(max).cloned().collect()
        }
    }

    fn element(rect: Rect, depth: u32) -> ElementInfo {
        ElementInfo { rect, name: "e".into(), role: "button".into(), depth }
    }

    #[test]
    fn snaps_within_distance_and_prefers_deeper_on_tie() {
        let outer = element(Rect { x: 0, y: 0, w: 100, h: 100 }, 0);
        let inner = element(Rect { x: 10, y: 10, w: 20, h: 20 }, 1);
        let detector = FixedDetector(vec![outer, inner]);
        let mut snap = SnapEngine::new(Box::new(detector));
        let rect = snap.try_snap(10, 10).unwrap();
        assert_eq!(rect, Rect { x: 10, y: 10, w: 20, h: 20 });
    }

    #[test]
    fn no_snap_beyond_distance() {
        let far = element(Rect { x: 200, y: 200, w: 20, h: 20 }, 0);
        let mut snap = SnapEngine::new(Box::new(FixedDetector(vec![far])));
        assert!(snap.try_snap(0, 0).is_none());
    }

    #[test]
    fn zero_area_elements_are_skipped() {
        let zero = element(Rect { x: 0, y: 0, w: 0, h: 10 }, 0);
        let mut snap = SnapEngine::new(Box::new(FixedDetector(vec![zero])));
        assert!(snap.try_snap(0, 0).is_none());
    }

    #[test]
    fn null_detector_reports_nothing() {
        let detector = NullElementDetector;
        assert!(detector.detect_element(0, 0).is_none());
        assert!(detector.detect_elements(0, 0, 10).is_empty());
    }
}
