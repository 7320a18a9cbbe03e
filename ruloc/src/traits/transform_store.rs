use std::time::{Duration, SystemTime};

use auto_impl::auto_impl;
use nalgebra::Isometry3;

use crate::error::Error;

/// The instant a transform is requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupTime {
    /// The transform closest to this instant, within the caller's tolerance.
    At(SystemTime),
    /// The most recent transform the store holds for the pair.
    Latest,
}

impl From<SystemTime> for LookupTime {
    fn from(time: SystemTime) -> Self {
        Self::At(time)
    }
}

/// Read-only access to a time-indexed history of transforms between named
/// coordinate frames.
///
/// `transform` returns the transform that maps data expressed in
/// `source_frame` into `target_frame`. Implementations convert internal
/// failures into [`Error`]; no panic crosses this boundary.
#[auto_impl(Box, Arc)]
pub trait TransformStore: Send + Sync {
    fn can_transform(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: LookupTime,
        tolerance: Duration,
    ) -> bool;

    fn transform(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: LookupTime,
        tolerance: Duration,
    ) -> Result<Isometry3<f64>, Error>;
}
