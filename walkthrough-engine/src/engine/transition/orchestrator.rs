use bevy::prelude::*;

use crate::engine::core::config::TransitionConfig;
use crate::engine::core::error::{StateMachine, WalkthroughError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    Running,
    Complete,
}

impl TransitionPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Complete => "Complete",
        }
    }
}

/// Teleport progress, advanced a fixed step per frame rather than by
/// elapsed time.
#[derive(Resource, Debug, Clone, Default)]
pub struct Transition {
    progress: f32,
    portal_intensity: f32,
    phase: TransitionPhase,
}

impl Transition {
    pub fn trigger(&mut self) -> Result<(), WalkthroughError> {
        if self.phase != TransitionPhase::Idle {
            return Err(WalkthroughError::invalid(
                StateMachine::Transition,
                self.phase.name(),
                "trigger",
            ));
        }
        self.phase = TransitionPhase::Running;
        Ok(())
    }

    /// Returns `true` on the single tick that completes the transition.
    pub fn tick(&mut self, config: &TransitionConfig) -> bool {
        if self.phase != TransitionPhase::Running {
            return false;
        }

        self.progress = (self.progress + config.progress_step.max(0.0)).min(1.0);
        self.portal_intensity = if config.intensity_threshold > 0.0 {
            (self.progress / config.intensity_threshold).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if self.progress >= 1.0 {
            self.phase = TransitionPhase::Complete;
            return true;
        }
        false
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn portal_intensity(&self) -> f32 {
        self.portal_intensity
    }

    /// Uniform scale of the portal sphere.
    pub fn effect_scale(&self, config: &TransitionConfig) -> f32 {
        config.effect_start_scale
            + (config.effect_end_scale - config.effect_start_scale) * self.progress
    }

    /// Opacity of the full-screen flash, fading out as the sphere grows.
    pub fn flash_opacity(&self, config: &TransitionConfig) -> f32 {
        if config.effect_end_scale <= 0.0 {
            return 0.0;
        }
        (1.0 - self.effect_scale(config) / config.effect_end_scale).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotone_and_lands_on_one() {
        let config = TransitionConfig::default();
        let mut transition = Transition::default();
        transition.trigger().unwrap();

        let mut completions = 0;
        let mut last = 0.0;
        for _ in 0..1_000 {
            if transition.tick(&config) {
                completions += 1;
            }
            assert!(transition.progress() >= last);
            last = transition.progress();
        }

        assert_eq!(completions, 1);
        assert_eq!(transition.progress(), 1.0);
        assert_eq!(transition.phase(), TransitionPhase::Complete);
    }

    #[test]
    fn retrigger_is_a_no_op() {
        let config = TransitionConfig::default();
        let mut transition = Transition::default();
        transition.trigger().unwrap();
        transition.tick(&config);
        let progress = transition.progress();

        assert!(transition.trigger().is_err());
        assert_eq!(transition.progress(), progress);
        assert_eq!(transition.phase(), TransitionPhase::Running);

        while !transition.tick(&config) {}
        assert!(matches!(
            transition.trigger(),
            Err(WalkthroughError::InvalidStateTransition { from: "Complete", .. })
        ));
    }

    #[test]
    fn idle_transition_does_not_advance() {
        let mut transition = Transition::default();
        assert!(!transition.tick(&TransitionConfig::default()));
        assert_eq!(transition.progress(), 0.0);
    }

    #[test]
    fn intensity_saturates_at_threshold() {
        let config = TransitionConfig {
            progress_step: 0.25,
            intensity_threshold: 0.5,
            ..TransitionConfig::default()
        };
        let mut transition = Transition::default();
        transition.trigger().unwrap();

        transition.tick(&config);
        assert_eq!(transition.portal_intensity(), 0.5);
        transition.tick(&config);
        assert_eq!(transition.portal_intensity(), 1.0);
        transition.tick(&config);
        assert_eq!(transition.portal_intensity(), 1.0);
    }

    #[test]
    fn effect_grows_while_flash_fades() {
        let config = TransitionConfig::default();
        let mut transition = Transition::default();
        assert_eq!(transition.effect_scale(&config), 5.0);
        assert_eq!(transition.flash_opacity(&config), 0.5);

        transition.trigger().unwrap();
        while !transition.tick(&config) {}
        assert_eq!(transition.effect_scale(&config), 10.0);
        assert_eq!(transition.flash_opacity(&config), 0.0);
    }
}
