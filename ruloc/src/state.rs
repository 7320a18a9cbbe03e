use nalgebra::{DVector, Isometry3, Translation3, UnitQuaternion};

/// Index of each member within the filter state vector.
///
/// The index-to-meaning binding is fixed; filters, measurement models,
/// and the conversions below all rely on it and it is never reordered.
pub const STATE_MEMBER_X: usize = 0;
pub const STATE_MEMBER_Y: usize = 1;
pub const STATE_MEMBER_Z: usize = 2;
pub const STATE_MEMBER_ROLL: usize = 3;
pub const STATE_MEMBER_PITCH: usize = 4;
pub const STATE_MEMBER_YAW: usize = 5;
pub const STATE_MEMBER_VX: usize = 6;
pub const STATE_MEMBER_VY: usize = 7;
pub const STATE_MEMBER_VZ: usize = 8;
pub const STATE_MEMBER_VROLL: usize = 9;
pub const STATE_MEMBER_VPITCH: usize = 10;
pub const STATE_MEMBER_VYAW: usize = 11;
pub const STATE_MEMBER_AX: usize = 12;
pub const STATE_MEMBER_AY: usize = 13;
pub const STATE_MEMBER_AZ: usize = 14;

pub const POSE_SIZE: usize = 6;
pub const TWIST_SIZE: usize = 6;
pub const ACCELERATION_SIZE: usize = 3;
pub const STATE_SIZE: usize = 15;

/// Builds the rigid transform described by the pose members of `state`.
///
/// The orientation is composed from the roll/pitch/yaw members as roll
/// about X, then pitch about Y, then yaw about Z. Angles are used as-is;
/// wrap-around is the caller's responsibility.
pub fn state_to_isometry(state: &DVector<f64>) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(
            state[STATE_MEMBER_X],
            state[STATE_MEMBER_Y],
            state[STATE_MEMBER_Z],
        ),
        UnitQuaternion::from_euler_angles(
            state[STATE_MEMBER_ROLL],
            state[STATE_MEMBER_PITCH],
            state[STATE_MEMBER_YAW],
        ),
    )
}

/// Writes the pose members of `state` from a rigid transform.
///
/// The Euler decomposition matches the convention of
/// [`state_to_isometry`]. Near pitch = ±90° roll and yaw couple (gimbal
/// lock) and the decomposition is no longer unique; the written triple
/// still reproduces the same rotation.
pub fn isometry_to_state(isometry: &Isometry3<f64>, state: &mut DVector<f64>) {
    state[STATE_MEMBER_X] = isometry.translation.x;
    state[STATE_MEMBER_Y] = isometry.translation.y;
    state[STATE_MEMBER_Z] = isometry.translation.z;

    let (roll, pitch, yaw) = isometry.rotation.euler_angles();
    state[STATE_MEMBER_ROLL] = roll;
    state[STATE_MEMBER_PITCH] = pitch;
    state[STATE_MEMBER_YAW] = yaw;
}

/// Extracts the yaw component of a rotation.
///
/// # Examples
///
/// ```
/// use assert_approx_eq::assert_approx_eq;
/// use nalgebra::UnitQuaternion;
///
/// let rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, 1.5);
/// assert_approx_eq!(ruloc::yaw(&rotation), 1.5);
/// ```
pub fn yaw(rotation: &UnitQuaternion<f64>) -> f64 {
    rotation.euler_angles().2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_layout() {
        assert_eq!(STATE_MEMBER_X, 0);
        assert_eq!(STATE_MEMBER_YAW, POSE_SIZE - 1);
        assert_eq!(STATE_MEMBER_AZ, STATE_SIZE - 1);
        assert_eq!(POSE_SIZE + TWIST_SIZE + ACCELERATION_SIZE, STATE_SIZE);
    }

    #[test]
    fn test_state_to_isometry_reads_pose_members_only() {
        let mut state = DVector::zeros(STATE_SIZE);
        state[STATE_MEMBER_X] = 1.0;
        state[STATE_MEMBER_Y] = -2.0;
        state[STATE_MEMBER_Z] = 0.5;
        // twist members must not leak into the pose
        state[STATE_MEMBER_VX] = 100.0;
        state[STATE_MEMBER_VYAW] = 100.0;

        let isometry = state_to_isometry(&state);
        assert_eq!(isometry.translation.x, 1.0);
        assert_eq!(isometry.translation.y, -2.0);
        assert_eq!(isometry.translation.z, 0.5);
        assert_eq!(isometry.rotation, UnitQuaternion::identity());
    }
}
