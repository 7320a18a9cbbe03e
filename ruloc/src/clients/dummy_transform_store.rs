use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use nalgebra::Isometry3;

use crate::error::Error;
use crate::traits::{LookupTime, TransformStore};

/// One recorded store query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
    pub target_frame: String,
    pub source_frame: String,
    pub time: LookupTime,
}

/// Dummy TransformStore for debug or tests.
///
/// Holds at most one stamped transform per frame pair and records every
/// query, so tests can assert which lookups a caller issued. Exact-time
/// queries succeed only when the stored stamp lies within the tolerance
/// of the requested instant; `Latest` queries succeed whenever the pair
/// exists.
#[derive(Debug, Default)]
pub struct DummyTransformStore {
    transforms: HashMap<(String, String), (Isometry3<f64>, SystemTime)>,
    lookups: Mutex<Vec<Lookup>>,
}

impl DummyTransformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        target_frame: &str,
        source_frame: &str,
        transform: Isometry3<f64>,
        stamp: SystemTime,
    ) {
        self.transforms.insert(
            (target_frame.to_owned(), source_frame.to_owned()),
            (transform, stamp),
        );
    }

    /// All queries issued so far, in order.
    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().unwrap().clone()
    }

    fn record(&self, target_frame: &str, source_frame: &str, time: LookupTime) {
        self.lookups.lock().unwrap().push(Lookup {
            target_frame: target_frame.to_owned(),
            source_frame: source_frame.to_owned(),
            time,
        });
    }

    fn entry(&self, target_frame: &str, source_frame: &str) -> Option<&(Isometry3<f64>, SystemTime)> {
        self.transforms
            .get(&(target_frame.to_owned(), source_frame.to_owned()))
    }

    fn within_tolerance(stamp: SystemTime, time: SystemTime, tolerance: Duration) -> bool {
        let offset = match time.duration_since(stamp) {
            Ok(offset) => offset,
            Err(e) => e.duration(),
        };
        offset <= tolerance
    }
}

impl TransformStore for DummyTransformStore {
    fn can_transform(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: LookupTime,
        tolerance: Duration,
    ) -> bool {
        self.record(target_frame, source_frame, time);
        match (self.entry(target_frame, source_frame), time) {
            (None, _) => false,
            (Some(_), LookupTime::Latest) => true,
            (Some((_, stamp)), LookupTime::At(time)) => {
                Self::within_tolerance(*stamp, time, tolerance)
            }
        }
    }

    fn transform(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: LookupTime,
        tolerance: Duration,
    ) -> Result<Isometry3<f64>, Error> {
        self.record(target_frame, source_frame, time);
        let (transform, stamp) =
            self.entry(target_frame, source_frame)
                .ok_or_else(|| Error::UnknownFramePair {
                    target: target_frame.to_owned(),
                    source: source_frame.to_owned(),
                })?;
        match time {
            LookupTime::Latest => Ok(*transform),
            LookupTime::At(time) if Self::within_tolerance(*stamp, time, tolerance) => {
                Ok(*transform)
            }
            LookupTime::At(_) => Err(Error::TransformTimeNotAvailable {
                target: target_frame.to_owned(),
                source: source_frame.to_owned(),
            }),
        }
    }
}
