use std::time::{Duration, SystemTime};

use assert_approx_eq::assert_approx_eq;
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use ruloc::{FrameResolver, LookupTime, TransformStore};
use ruloc_mem::{MemoryTransformStore, StampedTransform};

const TARGET_FRAME: &str = "odom";
const SOURCE_FRAME: &str = "base_link";

const TOLERANCE: Duration = Duration::from_millis(100);

fn at(secs: f64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs_f64(secs)
}

fn stamped(stamp: SystemTime, x: f64, yaw: f64) -> StampedTransform {
    StampedTransform {
        transform: Isometry3::from_parts(
            Translation3::new(x, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        ),
        stamp,
        target_frame: TARGET_FRAME.to_owned(),
        source_frame: SOURCE_FRAME.to_owned(),
    }
}

#[test]
fn resolves_the_stored_relation_at_the_requested_time() {
    let store = MemoryTransformStore::new();
    store.insert(stamped(at(10.0), 1.5, 0.3));

    let resolver = FrameResolver::new(store);
    let transform = resolver
        .resolve_with_tolerance(TARGET_FRAME, SOURCE_FRAME, at(10.0), TOLERANCE, false)
        .unwrap();

    assert_approx_eq!(transform.translation.x, 1.5);
    assert_approx_eq!(ruloc::yaw(&transform.rotation), 0.3);
}

#[test]
fn falls_back_to_the_latest_relation_when_publication_stops() {
    let store = MemoryTransformStore::new();
    store.insert(stamped(at(10.0), 1.5, 0.3));

    // Nothing was published past 10.0; a query at 10.5 with a 0.1 s
    // tolerance must substitute the 10.0 relation.
    let resolver = FrameResolver::new(store);
    let transform = resolver
        .resolve_with_tolerance(TARGET_FRAME, SOURCE_FRAME, at(10.5), TOLERANCE, false)
        .unwrap();

    assert_approx_eq!(transform.translation.x, 1.5);
    assert_approx_eq!(ruloc::yaw(&transform.rotation), 0.3);
}

#[test]
fn nearest_record_within_tolerance_wins() {
    let store = MemoryTransformStore::new();
    store.insert(stamped(at(10.0), 1.0, 0.0));
    store.insert(stamped(at(10.2), 2.0, 0.0));

    let transform = store
        .transform(
            TARGET_FRAME,
            SOURCE_FRAME,
            LookupTime::At(at(10.05)),
            TOLERANCE,
        )
        .unwrap();
    assert_approx_eq!(transform.translation.x, 1.0);

    let transform = store
        .transform(
            TARGET_FRAME,
            SOURCE_FRAME,
            LookupTime::At(at(10.15)),
            TOLERANCE,
        )
        .unwrap();
    assert_approx_eq!(transform.translation.x, 2.0);
}

#[test]
fn latest_ignores_the_requested_tolerance() {
    let store = MemoryTransformStore::new();
    store.insert(stamped(at(10.0), 1.0, 0.0));
    store.insert(stamped(at(12.0), 2.0, 0.0));

    assert!(store.can_transform(TARGET_FRAME, SOURCE_FRAME, LookupTime::Latest, Duration::ZERO));
    let transform = store
        .transform(
            TARGET_FRAME,
            SOURCE_FRAME,
            LookupTime::Latest,
            Duration::ZERO,
        )
        .unwrap();
    assert_approx_eq!(transform.translation.x, 2.0);
}

#[test]
fn unknown_pairs_are_not_resolvable() {
    let store = MemoryTransformStore::new();
    store.insert(stamped(at(10.0), 1.0, 0.0));

    assert!(!store.can_transform("map", SOURCE_FRAME, LookupTime::Latest, TOLERANCE));
    assert!(store
        .transform("map", SOURCE_FRAME, LookupTime::Latest, TOLERANCE)
        .is_err());

    // pairs are directional; the inverse is not derived
    assert!(!store.can_transform(SOURCE_FRAME, TARGET_FRAME, LookupTime::Latest, TOLERANCE));
}

#[test]
fn bounded_history_drops_the_oldest_records() {
    let store = MemoryTransformStore::with_history_capacity(2);
    store.insert(stamped(at(10.0), 1.0, 0.0));
    store.insert(stamped(at(11.0), 2.0, 0.0));
    store.insert(stamped(at(12.0), 3.0, 0.0));

    // the 10.0 record was evicted
    assert!(!store.can_transform(
        TARGET_FRAME,
        SOURCE_FRAME,
        LookupTime::At(at(10.0)),
        Duration::ZERO,
    ));
    assert!(store.can_transform(
        TARGET_FRAME,
        SOURCE_FRAME,
        LookupTime::At(at(11.0)),
        Duration::ZERO,
    ));
}
