use std::sync::Arc;
use std::time::{Duration, SystemTime};

use nalgebra::Isometry3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;
use crate::traits::{LookupTime, TransformStore};
use crate::utils::{WarnThrottle, DEFAULT_WARN_PERIOD};

/// Throttle site of the stale-fallback warning.
pub const STALE_TRANSFORM_SITE: &str = "ruloc::resolver::stale_transform";
/// Throttle site of the resolution-failure warning.
pub const TRANSFORM_UNAVAILABLE_SITE: &str = "ruloc::resolver::transform_unavailable";

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct FrameResolverConfig {
    /// Minimum interval between repeated warnings from one site, in seconds.
    #[serde(default = "default_warn_period_secs")]
    pub warn_period_secs: f64,
}

fn default_warn_period_secs() -> f64 {
    DEFAULT_WARN_PERIOD.as_secs_f64()
}

impl Default for FrameResolverConfig {
    fn default() -> Self {
        Self {
            warn_period_secs: default_warn_period_secs(),
        }
    }
}

/// Build a FrameResolver interactively.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use ruloc::{DummyTransformStore, FrameResolverBuilder};
///
/// let resolver = FrameResolverBuilder::new()
///     .warn_period(Duration::from_secs(5))
///     .finalize(DummyTransformStore::new());
/// ```
#[derive(Clone, Debug)]
pub struct FrameResolverBuilder {
    warn_period: Duration,
}

impl FrameResolverBuilder {
    pub fn new() -> Self {
        Self {
            warn_period: DEFAULT_WARN_PERIOD,
        }
    }

    /// Set the minimum interval between repeated warnings from one site.
    pub fn warn_period(mut self, period: Duration) -> Self {
        self.warn_period = period;
        self
    }

    /// Convert builder into FrameResolver finally.
    pub fn finalize<S>(self, store: S) -> FrameResolver<S>
    where
        S: TransformStore,
    {
        FrameResolver {
            store,
            throttle: Arc::new(WarnThrottle::new(self.warn_period)),
        }
    }
}

impl Default for FrameResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the transform between two named frames at a requested
/// instant, falling back to the latest available transform when the
/// store holds nothing near that time.
///
/// Resolution failure is a recoverable outcome: the caller decides
/// whether to skip the cycle or retry later. Staleness is reported only
/// through rate-limited warnings, never through the returned value.
#[derive(Debug)]
pub struct FrameResolver<S> {
    store: S,
    throttle: Arc<WarnThrottle>,
}

impl<S> FrameResolver<S>
where
    S: TransformStore,
{
    pub fn new(store: S) -> Self {
        Self::with_throttle(store, Arc::new(WarnThrottle::default()))
    }

    /// Create a resolver sharing an existing throttle, so several
    /// resolvers keep the once-per-period warning contract together.
    pub fn with_throttle(store: S, throttle: Arc<WarnThrottle>) -> Self {
        Self { store, throttle }
    }

    pub fn new_from_config(store: S, config: FrameResolverConfig) -> Self {
        Self::with_throttle(
            store,
            Arc::new(WarnThrottle::new(Duration::from_secs_f64(
                config.warn_period_secs,
            ))),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn throttle(&self) -> &Arc<WarnThrottle> {
        &self.throttle
    }

    /// Resolve with zero tolerance, for callers with no tolerance
    /// preference.
    pub fn resolve(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: SystemTime,
        silent: bool,
    ) -> Result<Isometry3<f64>, Error> {
        self.resolve_with_tolerance(target_frame, source_frame, time, Duration::ZERO, silent)
    }

    /// Resolve the transform mapping `source_frame` into `target_frame`
    /// at `time`, searching the store within `tolerance` of it.
    ///
    /// `silent` suppresses the warnings without affecting the result.
    pub fn resolve_with_tolerance(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: SystemTime,
        tolerance: Duration,
        silent: bool,
    ) -> Result<Isometry3<f64>, Error> {
        // Relating a frame to itself can fail when the tree isn't being
        // broadcast (e.g. replayed or partial data). Nothing needs
        // transforming, so return identity.
        if target_frame == source_frame {
            return Ok(Isometry3::identity());
        }

        // First try the data at the requested time.
        if self
            .store
            .can_transform(target_frame, source_frame, LookupTime::At(time), tolerance)
        {
            match self
                .store
                .transform(target_frame, source_frame, LookupTime::At(time), tolerance)
            {
                Ok(transform) => return Ok(transform),
                Err(e) => {
                    // Try the latest available transform instead, below.
                    debug!("Exact-time lookup {source_frame} -> {target_frame} failed ({e})");
                }
            }
        }

        // The transforms that are available may not be close enough
        // temporally to be used. Use the latest available transform.
        if self
            .store
            .can_transform(target_frame, source_frame, LookupTime::Latest, tolerance)
        {
            match self
                .store
                .transform(target_frame, source_frame, LookupTime::Latest, tolerance)
            {
                Ok(transform) => {
                    if !silent && self.throttle.allow(STALE_TRANSFORM_SITE) {
                        warn!(
                            "Transform from {source_frame} to {target_frame} was unavailable \
                             for the time requested. Using latest instead."
                        );
                    }
                    return Ok(transform);
                }
                Err(e) => {
                    if !silent && self.throttle.allow(TRANSFORM_UNAVAILABLE_SITE) {
                        warn!(
                            "Could not obtain transform from {source_frame} to {target_frame}. \
                             Error was {e}"
                        );
                    }
                }
            }
        } else if !silent && self.throttle.allow(TRANSFORM_UNAVAILABLE_SITE) {
            warn!("Could not obtain transform from {source_frame} to {target_frame}");
        }

        Err(Error::TransformUnavailable {
            target: target_frame.to_owned(),
            source: source_frame.to_owned(),
        })
    }
}
