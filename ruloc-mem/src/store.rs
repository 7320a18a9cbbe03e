use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use nalgebra::Isometry3;
use ruloc::{Error, LookupTime, TransformStore};
use tracing::debug;

const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// A transform between two named frames at one instant.
///
/// `transform` maps data expressed in `source_frame` into `target_frame`.
#[derive(Clone, Debug)]
pub struct StampedTransform {
    pub transform: Isometry3<f64>,
    pub stamp: SystemTime,
    pub target_frame: String,
    pub source_frame: String,
}

/// Stamp-ordered transform history for one frame pair.
#[derive(Debug)]
struct HistoryBuffer {
    transforms: VecDeque<StampedTransform>,
    max_capacity: usize,
}

impl HistoryBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            transforms: VecDeque::with_capacity(capacity),
            max_capacity: capacity,
        }
    }

    fn insert(&mut self, transform: StampedTransform) {
        let pos = self
            .transforms
            .partition_point(|t| t.stamp <= transform.stamp);

        self.transforms.insert(pos, transform);

        while self.transforms.len() > self.max_capacity {
            self.transforms.pop_front();
        }
    }

    fn latest(&self) -> Option<&StampedTransform> {
        self.transforms.back()
    }

    /// The record closest to `time`, if it lies within `tolerance` of it.
    fn closest_within(&self, time: SystemTime, tolerance: Duration) -> Option<&StampedTransform> {
        let pos = self.transforms.partition_point(|t| t.stamp <= time);
        let before = pos.checked_sub(1).and_then(|p| self.transforms.get(p));
        let after = self.transforms.get(pos);

        let closest = match (before, after) {
            (Some(b), Some(a)) => {
                if offset_between(time, b.stamp) <= offset_between(time, a.stamp) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (before, after) => before.or(after),
        };

        closest.filter(|t| offset_between(time, t.stamp) <= tolerance)
    }
}

fn offset_between(a: SystemTime, b: SystemTime) -> Duration {
    match a.duration_since(b) {
        Ok(offset) => offset,
        Err(e) => e.duration(),
    }
}

/// In-memory, time-indexed transform store.
///
/// Histories are kept per exact frame pair; the store neither walks a
/// frame tree nor inverts pairs. Exact-time lookups return the nearest
/// record within the tolerance window, without interpolation; `Latest`
/// lookups return the most recent record regardless of its age. Each
/// pair keeps a bounded history, evicting the oldest records first.
#[derive(Debug)]
pub struct MemoryTransformStore {
    buffers: RwLock<HashMap<(String, String), HistoryBuffer>>,
    history_capacity: usize,
}

impl MemoryTransformStore {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            buffers: RwLock::new(HashMap::new()),
            history_capacity: capacity,
        }
    }

    /// Record a transform in the history of its frame pair.
    pub fn insert(&self, transform: StampedTransform) {
        debug!(
            "Recording transform {} -> {}",
            transform.source_frame, transform.target_frame
        );
        let key = (
            transform.target_frame.clone(),
            transform.source_frame.clone(),
        );
        let mut buffers = self.buffers.write().unwrap();
        buffers
            .entry(key)
            .or_insert_with(|| HistoryBuffer::with_capacity(self.history_capacity))
            .insert(transform);
    }
}

impl Default for MemoryTransformStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStore for MemoryTransformStore {
    fn can_transform(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: LookupTime,
        tolerance: Duration,
    ) -> bool {
        let buffers = self.buffers.read().unwrap();
        let Some(buffer) = buffers.get(&(target_frame.to_owned(), source_frame.to_owned())) else {
            return false;
        };
        match time {
            LookupTime::Latest => buffer.latest().is_some(),
            LookupTime::At(time) => buffer.closest_within(time, tolerance).is_some(),
        }
    }

    fn transform(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: LookupTime,
        tolerance: Duration,
    ) -> Result<Isometry3<f64>, Error> {
        let buffers = self.buffers.read().unwrap();
        let buffer = buffers
            .get(&(target_frame.to_owned(), source_frame.to_owned()))
            .ok_or_else(|| Error::UnknownFramePair {
                target: target_frame.to_owned(),
                source: source_frame.to_owned(),
            })?;

        let found = match time {
            LookupTime::Latest => buffer.latest(),
            LookupTime::At(time) => buffer.closest_within(time, tolerance),
        };

        found
            .map(|t| t.transform)
            .ok_or_else(|| Error::TransformTimeNotAvailable {
                target: target_frame.to_owned(),
                source: source_frame.to_owned(),
            })
    }
}
