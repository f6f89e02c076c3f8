//! Navigation: waypoint catalog, attitude, and the status readouts the
//! helm panel shows.

use serde::{Deserialize, Serialize};

/// Plottable waypoints, in route order.
pub const WAYPOINTS: [&str; 4] = ["DEPARTURE", "LAGRANGE L4", "EUROPA APPROACH", "EUROPA ORBIT"];

/// Pitch/roll within this many degrees reads as aligned.
pub const ALIGNED_TOLERANCE_DEG: f32 = 5.0;
/// Pitch/roll beyond this many degrees reads as tumbling.
pub const TUMBLE_LIMIT_DEG: f32 = 30.0;

pub fn waypoint_name(index: usize) -> Option<&'static str> {
    WAYPOINTS.get(index).copied()
}

/// Attitude axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    Yaw,
    Pitch,
    Roll,
}

/// Ship attitude in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Heading, [0, 360).
    pub yaw: f32,
    /// Nose up/down, [-90, 90].
    pub pitch: f32,
    /// Bank, [-180, 180).
    pub roll: f32,
}

impl Orientation {
    /// Set one axis, normalizing the value into its range.
    pub fn set(&mut self, axis: Axis, value: f32) {
        let value = if value.is_finite() { value } else { 0.0 };
        match axis {
            Axis::Yaw => self.yaw = value.rem_euclid(360.0),
            Axis::Pitch => self.pitch = value.clamp(-90.0, 90.0),
            Axis::Roll => self.roll = (value + 180.0).rem_euclid(360.0) - 180.0,
        }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Yaw => self.yaw,
            Axis::Pitch => self.pitch,
            Axis::Roll => self.roll,
        }
    }
}

/// Long-range sensor readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorStatus {
    Offline,
    Degraded,
    Nominal,
}

pub fn sensor_status(bus_b_online: bool, nav_core_repaired: bool) -> SensorStatus {
    if !bus_b_online {
        SensorStatus::Offline
    } else if !nav_core_repaired {
        SensorStatus::Degraded
    } else {
        SensorStatus::Nominal
    }
}

/// Attitude stability readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriftStatus {
    Aligned,
    Drifting,
    Tumbling,
}

pub fn drift_status(orientation: &Orientation) -> DriftStatus {
    let worst = orientation.pitch.abs().max(orientation.roll.abs());
    if worst <= ALIGNED_TOLERANCE_DEG {
        DriftStatus::Aligned
    } else if worst <= TUMBLE_LIMIT_DEG {
        DriftStatus::Drifting
    } else {
        DriftStatus::Tumbling
    }
}

/// Route readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStatus {
    NoRoute,
    Plotted,
    Locked,
    OffCourse,
}

pub fn route_status(nav_core_repaired: bool, course_locked: bool, drift: DriftStatus) -> RouteStatus {
    if !nav_core_repaired {
        RouteStatus::NoRoute
    } else if course_locked && drift == DriftStatus::Tumbling {
        RouteStatus::OffCourse
    } else if course_locked {
        RouteStatus::Locked
    } else {
        RouteStatus::Plotted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_lookup() {
        assert_eq!(waypoint_name(0), Some("DEPARTURE"));
        assert_eq!(waypoint_name(3), Some("EUROPA ORBIT"));
        assert_eq!(waypoint_name(4), None);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut o = Orientation::default();
        o.set(Axis::Yaw, 370.0);
        assert!((o.yaw - 10.0).abs() < 1e-4);
        o.set(Axis::Yaw, -90.0);
        assert!((o.yaw - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_clamps() {
        let mut o = Orientation::default();
        o.set(Axis::Pitch, 120.0);
        assert_eq!(o.pitch, 90.0);
        o.set(Axis::Pitch, -120.0);
        assert_eq!(o.pitch, -90.0);
    }

    #[test]
    fn test_roll_wraps_signed() {
        let mut o = Orientation::default();
        o.set(Axis::Roll, 190.0);
        assert!((o.roll + 170.0).abs() < 1e-4);
        o.set(Axis::Roll, 180.0);
        assert!((o.roll + 180.0).abs() < 1e-4);
        o.set(Axis::Roll, -45.0);
        assert!((o.get(Axis::Roll) + 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_input_zeroes_axis() {
        let mut o = Orientation::default();
        o.set(Axis::Pitch, f32::NAN);
        assert_eq!(o.pitch, 0.0);
    }

    #[test]
    fn test_drift_tiers() {
        let mut o = Orientation::default();
        assert_eq!(drift_status(&o), DriftStatus::Aligned);
        o.set(Axis::Pitch, 12.0);
        assert_eq!(drift_status(&o), DriftStatus::Drifting);
        o.set(Axis::Roll, -60.0);
        assert_eq!(drift_status(&o), DriftStatus::Tumbling);
    }

    #[test]
    fn test_sensor_status() {
        assert_eq!(sensor_status(false, true), SensorStatus::Offline);
        assert_eq!(sensor_status(true, false), SensorStatus::Degraded);
        assert_eq!(sensor_status(true, true), SensorStatus::Nominal);
    }

    #[test]
    fn test_route_status() {
        assert_eq!(route_status(false, true, DriftStatus::Aligned), RouteStatus::NoRoute);
        assert_eq!(route_status(true, false, DriftStatus::Tumbling), RouteStatus::Plotted);
        assert_eq!(route_status(true, true, DriftStatus::Drifting), RouteStatus::Locked);
        assert_eq!(route_status(true, true, DriftStatus::Tumbling), RouteStatus::OffCourse);
    }
}
