use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use nalgebra::{Isometry3, Translation3, UnitQuaternion};

/// Default minimum interval between repeated emissions from one site.
pub const DEFAULT_WARN_PERIOD: Duration = Duration::from_secs(3);

/// Rate limiter for diagnostic emission, keyed by call site.
///
/// Each site is admitted at most once per period. The limiter is meant to
/// be shared (e.g. inside an `Arc`) by every thread that resolves frames,
/// so the once-per-period contract holds process-wide.
#[derive(Debug)]
pub struct WarnThrottle {
    period: Duration,
    last_emission: Mutex<HashMap<&'static str, Instant>>,
}

impl WarnThrottle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_emission: Mutex::new(HashMap::new()),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true if `site` may emit now, recording the emission.
    ///
    /// A denied call does not refresh the window; the site is admitted
    /// again once a full period has elapsed since the last admission.
    pub fn allow(&self, site: &'static str) -> bool {
        let now = Instant::now();
        let mut last_emission = self.last_emission.lock().unwrap();
        match last_emission.get(site) {
            Some(last) if now.duration_since(*last) < self.period => false,
            _ => {
                last_emission.insert(site, now);
                true
            }
        }
    }
}

impl Default for WarnThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_WARN_PERIOD)
    }
}

/// Displays a translation as its three components.
#[derive(Debug)]
pub struct DisplayTranslation<'a>(pub &'a Translation3<f64>);

impl fmt::Display for DisplayTranslation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let translation = self.0;
        write!(f, "({} {} {})", translation.x, translation.y, translation.z)
    }
}

/// Displays a rotation as its roll/pitch/yaw decomposition.
#[derive(Debug)]
pub struct DisplayRotation<'a>(pub &'a UnitQuaternion<f64>);

impl fmt::Display for DisplayRotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (roll, pitch, yaw) = self.0.euler_angles();
        write!(f, "({roll}, {pitch}, {yaw})")
    }
}

/// Displays a transform as its origin plus roll/pitch/yaw.
///
/// # Examples
///
/// ```
/// use ruloc::{DisplayTransform, Isometry3};
///
/// let identity = Isometry3::identity();
/// assert_eq!(
///     format!("{}", DisplayTransform(&identity)),
///     "Origin: (0 0 0) Rotation (RPY): (0, 0, 0)"
/// );
/// ```
#[derive(Debug)]
pub struct DisplayTransform<'a>(pub &'a Isometry3<f64>);

impl fmt::Display for DisplayTransform<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Origin: {} Rotation (RPY): {}",
            DisplayTranslation(&self.0.translation),
            DisplayRotation(&self.0.rotation),
        )
    }
}
