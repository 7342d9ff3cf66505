use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use crate::engine::core::error::{StateMachine, WalkthroughError};

/// Ordered, non-empty list of targets. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath(Vec<Vec3>);

impl WaypointPath {
    pub fn new(points: Vec<Vec3>) -> Result<Self, WalkthroughError> {
        if points.is_empty() {
            return Err(WalkthroughError::EmptyPath);
        }
        Ok(Self(points))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.0.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarPhase {
    Idle,
    Walking,
    Sitting,
}

impl AvatarPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walking => "Walking",
            Self::Sitting => "Sitting",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StepSettings {
    pub step: f32,
    pub tolerance: f32,
    pub turn_smoothing: f32,
    /// Pose snapped to on arrival so the sit clip lines up.
    pub seat: Option<(Vec3, f32)>,
}

/// What one tick changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowEvent {
    /// Waypoint `index` was reached and the next one targeted.
    Reached(usize),
    /// The last waypoint was reached. Emitted once per run.
    Seated,
}

/// Walks an avatar through a [`WaypointPath`] and ends seated.
#[derive(Debug, Clone)]
pub struct PathFollower {
    path: WaypointPath,
    position: Vec3,
    facing: f32,
    index: usize,
    phase: AvatarPhase,
}

impl PathFollower {
    pub fn new(points: Vec<Vec3>, position: Vec3, facing: f32) -> Result<Self, WalkthroughError> {
        Ok(Self {
            path: WaypointPath::new(points)?,
            position,
            facing,
            index: 0,
            phase: AvatarPhase::Idle,
        })
    }

    pub fn start(&mut self) -> Result<(), WalkthroughError> {
        if self.phase != AvatarPhase::Idle {
            return Err(WalkthroughError::invalid(
                StateMachine::Avatar,
                self.phase.name(),
                "start",
            ));
        }
        self.phase = AvatarPhase::Walking;
        self.index = 0;
        Ok(())
    }

    pub fn tick(&mut self, settings: &StepSettings) -> Option<FollowEvent> {
        if self.phase != AvatarPhase::Walking {
            return None;
        }
        let target = self.path.get(self.index)?;

        let offset = target - self.position;
        let distance = offset.length();
        let direction = offset.normalize_or_zero();

        // Never overshoot: the last step lands on the waypoint.
        self.position += direction * settings.step.min(distance);
        if direction != Vec3::ZERO {
            let desired = direction.x.atan2(direction.z);
            self.facing = lerp_angle(self.facing, desired, settings.turn_smoothing);
        }

        // Landing exactly on the waypoint arrives even with a zero tolerance.
        if self.position.distance(target) > settings.tolerance {
            return None;
        }

        self.index += 1;
        if self.index < self.path.len() {
            return Some(FollowEvent::Reached(self.index - 1));
        }

        self.phase = AvatarPhase::Sitting;
        if let Some((seat_position, seat_facing)) = settings.seat {
            self.position = seat_position;
            self.facing = seat_facing;
        }
        Some(FollowEvent::Seated)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> AvatarPhase {
        self.phase
    }
}

/// Lerp along the shorter arc between two angles.
fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = (to - from + PI).rem_euclid(TAU) - PI;
    from + delta * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> StepSettings {
        StepSettings {
            step: 1.3,
            tolerance: 1.0,
            turn_smoothing: 0.1,
            seat: None,
        }
    }

    fn run_to_end(follower: &mut PathFollower, settings: &StepSettings) -> (usize, Vec<FollowEvent>) {
        let mut events = Vec::new();
        let mut last_index = follower.index();
        for tick in 1..10_000 {
            if let Some(event) = follower.tick(settings) {
                events.push(event);
            }
            assert!(follower.index() >= last_index, "index went backwards");
            last_index = follower.index();
            if follower.phase() == AvatarPhase::Sitting {
                return (tick, events);
            }
        }
        panic!("path following did not terminate");
    }

    #[test]
    fn empty_path_fails_fast() {
        let result = PathFollower::new(Vec::new(), Vec3::ZERO, 0.0);
        assert!(matches!(result, Err(WalkthroughError::EmptyPath)));
    }

    #[test]
    fn walks_every_waypoint_and_sits_once() {
        let points = vec![
            Vec3::new(-24.9, -12.5, 0.0),
            Vec3::new(0.0, -8.5, 9.0),
            Vec3::new(3.0, -8.5, 9.0),
        ];
        let mut follower = PathFollower::new(points, Vec3::new(-240.0, -12.5, 15.0), 0.0).unwrap();
        follower.start().unwrap();

        let (_, events) = run_to_end(&mut follower, &settings());

        assert_eq!(
            events,
            vec![FollowEvent::Reached(0), FollowEvent::Reached(1), FollowEvent::Seated]
        );
        assert_eq!(follower.index(), 3);
        assert_eq!(follower.tick(&settings()), None);
        assert_eq!(follower.phase(), AvatarPhase::Sitting);
    }

    #[test]
    fn terminates_when_step_exceeds_twice_the_tolerance() {
        let coarse = StepSettings {
            step: 7.0,
            tolerance: 0.01,
            ..settings()
        };
        let mut follower = PathFollower::new(vec![Vec3::new(10.0, 0.0, 3.0)], Vec3::ZERO, 0.0).unwrap();
        follower.start().unwrap();

        let (ticks, _) = run_to_end(&mut follower, &coarse);
        assert!(ticks <= 3);
    }

    #[test]
    fn exact_landing_arrives_with_zero_tolerance() {
        let exact = StepSettings {
            step: 1.0,
            tolerance: 0.0,
            ..settings()
        };
        let mut follower = PathFollower::new(vec![Vec3::X, Vec3::X * 2.0], Vec3::ZERO, 0.0).unwrap();
        follower.start().unwrap();

        assert_eq!(follower.tick(&exact), Some(FollowEvent::Reached(0)));
        assert_eq!(follower.tick(&exact), Some(FollowEvent::Seated));
    }

    #[test]
    fn start_only_from_idle() {
        let mut follower = PathFollower::new(vec![Vec3::X * 0.5], Vec3::ZERO, 0.0).unwrap();
        assert!(follower.start().is_ok());
        assert!(follower.start().is_err());

        follower.tick(&settings());
        assert_eq!(follower.phase(), AvatarPhase::Sitting);
        assert!(matches!(
            follower.start(),
            Err(WalkthroughError::InvalidStateTransition { from: "Sitting", .. })
        ));
    }

    #[test]
    fn idle_avatar_does_not_move() {
        let mut follower = PathFollower::new(vec![Vec3::X * 10.0], Vec3::ZERO, 0.0).unwrap();
        assert_eq!(follower.tick(&settings()), None);
        assert_eq!(follower.position(), Vec3::ZERO);
    }

    #[test]
    fn facing_turns_gradually() {
        let mut follower = PathFollower::new(vec![Vec3::X * 100.0], Vec3::ZERO, 0.0).unwrap();
        follower.start().unwrap();
        follower.tick(&settings());

        let target = std::f32::consts::FRAC_PI_2;
        assert!(follower.facing() > 0.0);
        assert!(follower.facing() < target * 0.2);
    }

    #[test]
    fn seat_pose_is_applied_on_arrival() {
        let seated = StepSettings {
            seat: Some((Vec3::new(0.0, -10.2, 14.5), PI)),
            ..settings()
        };
        let mut follower = PathFollower::new(vec![Vec3::Z * 0.5], Vec3::ZERO, 0.0).unwrap();
        follower.start().unwrap();

        assert_eq!(follower.tick(&seated), Some(FollowEvent::Seated));
        assert_eq!(follower.position(), Vec3::new(0.0, -10.2, 14.5));
        assert_eq!(follower.facing(), PI);
    }

    #[test]
    fn angle_lerp_takes_the_short_way() {
        let halfway = lerp_angle(3.0, -3.0, 0.5);
        assert!(halfway.abs() > 3.0, "went through zero: {halfway}");
    }
}
