//! Navigation system: nav core, waypoints, course lock, comms and attitude.

use deadhand_logic::navigation::{
    drift_status, route_status, sensor_status, waypoint_name, Axis, DriftStatus, RouteStatus,
    SensorStatus,
};

use crate::engine::ConsoleEngine;
use crate::intent::Rejection;
use crate::terminal::Severity;

impl ConsoleEngine {
    pub(crate) fn repair_nav_core(&mut self) -> Result<(), Rejection> {
        if !self.ship.buses.bus_b_online {
            return Err(Rejection::NavRepairNeedsBus);
        }
        let nav = &mut self.ship.navigation;
        nav.nav_core_repaired = !nav.nav_core_repaired;
        if nav.nav_core_repaired {
            self.emit(Severity::Ok, "NAV core repaired: routing available");
        } else {
            self.emit(Severity::Warn, "NAV core taken offline");
        }
        Ok(())
    }

    pub(crate) fn select_waypoint(&mut self, index: usize) -> Result<(), Rejection> {
        let nav = &self.ship.navigation;
        if !nav.nav_core_repaired {
            return Err(Rejection::NavCoreOffline);
        }
        let name = waypoint_name(index).ok_or(Rejection::UnknownWaypoint(index))?;
        if nav.course_locked {
            let locked = waypoint_name(nav.selected_waypoint).unwrap_or("?");
            return Err(Rejection::CourseLocked(locked));
        }
        self.ship.navigation.selected_waypoint = index;
        self.emit(Severity::Info, format!("Waypoint selected: {name}"));
        Ok(())
    }

    pub(crate) fn lock_course(&mut self) -> Result<(), Rejection> {
        let nav = &self.ship.navigation;
        if !nav.nav_core_repaired {
            return Err(Rejection::NavCoreOffline);
        }
        if nav.course_locked {
            return Err(Rejection::AlreadyLocked);
        }
        let name = waypoint_name(nav.selected_waypoint).unwrap_or("?");
        self.ship.navigation.course_locked = true;
        self.emit(Severity::Ok, format!("Course locked to {name}"));
        Ok(())
    }

    pub(crate) fn toggle_comms(&mut self) -> Result<(), Rejection> {
        if !self.ship.buses.bus_b_online {
            return Err(Rejection::BusBOffline);
        }
        if !self.ship.navigation.nav_core_repaired {
            return Err(Rejection::CommsNeedNavCore);
        }
        let nav = &mut self.ship.navigation;
        nav.comms_partial_online = !nav.comms_partial_online;
        if nav.comms_partial_online {
            self.emit(Severity::Ok, "COMMS partial uplink established");
        } else {
            self.emit(Severity::Warn, "COMMS offline");
        }
        Ok(())
    }

    pub(crate) fn set_orientation(&mut self, axis: Axis, value: f32) -> Result<(), Rejection> {
        let orientation = &mut self.ship.navigation.orientation;
        orientation.set(axis, value);
        log::debug!("{axis:?} set to {}", orientation.get(axis));
        Ok(())
    }

    pub fn sensor_status(&self) -> SensorStatus {
        sensor_status(self.ship.buses.bus_b_online, self.ship.navigation.nav_core_repaired)
    }

    pub fn drift_status(&self) -> DriftStatus {
        drift_status(&self.ship.navigation.orientation)
    }

    pub fn route_status(&self) -> RouteStatus {
        let nav = &self.ship.navigation;
        route_status(nav.nav_core_repaired, nav.course_locked, self.drift_status())
    }
}
