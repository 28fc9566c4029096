mod inverse_kinematic;
mod motion_profile;
mod pivot;
mod scheduler_thread;

use arm_common::config::ArmConfig;
use arm_control::state::RobotState;

/// Upper bound on ticks for any maneuver in these tests.
pub const MAX_TICKS: usize = 10_000;

/// Robot with the default configuration at the origin.
pub fn default_state() -> RobotState {
    RobotState::from_config(&ArmConfig::default())
}

/// Tick until every axis settles. Returns the number of ticks taken.
pub fn run_until_idle(state: &mut RobotState) -> usize {
    for ticks in 1..=MAX_TICKS {
        state.tick();
        if !state.is_moving() {
            return ticks;
        }
    }
    panic!("robot still moving after {MAX_TICKS} ticks");
}
