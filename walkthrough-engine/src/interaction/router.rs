use std::time::Duration;

use bevy::prelude::*;

use super::ExhibitTag;

/// A resolved pointer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub entity: Entity,
    pub tag: ExhibitTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Miss,
    Single(Target),
    Double(Target),
}

impl ClickOutcome {
    /// Every resolved click gets the acknowledgment cue, misses never do.
    pub fn acknowledged(&self) -> bool {
        !matches!(self, Self::Miss)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Entered(Target),
    Left,
    Unchanged,
}

/// What a click does to the clicked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickEffect {
    Activate,
    Deactivate,
    OpenInfo,
    Nothing,
}

/// Hover tracking and single/double click classification.
#[derive(Resource, Debug, Default)]
pub struct InteractionRouter {
    last_click: Option<(Entity, Duration)>,
    hovered: Option<Target>,
}

impl InteractionRouter {
    /// A double click is two clicks on the same toggle-capable entity less
    /// than `window` apart. The pairing resets after each double.
    pub fn click(&mut self, hit: Option<Target>, now: Duration, window: Duration) -> ClickOutcome {
        let Some(target) = hit else {
            self.last_click = None;
            return ClickOutcome::Miss;
        };

        let paired = self.last_click.is_some_and(|(entity, at)| {
            entity == target.entity && now.saturating_sub(at) < window
        });

        if paired && target.tag.is_toggle_capable() {
            self.last_click = None;
            ClickOutcome::Double(target)
        } else {
            self.last_click = Some((target.entity, now));
            ClickOutcome::Single(target)
        }
    }

    pub fn hover(&mut self, hit: Option<Target>) -> HoverChange {
        if hit == self.hovered {
            return HoverChange::Unchanged;
        }
        self.hovered = hit;
        match hit {
            Some(target) => HoverChange::Entered(target),
            None => HoverChange::Left,
        }
    }
}

/// Decide what a click does. The toggle wins over opening info, so a double
/// click never opens a panel.
pub fn click_effect(outcome: &ClickOutcome, active: bool, has_info: bool) -> ClickEffect {
    match outcome {
        ClickOutcome::Miss => ClickEffect::Nothing,
        ClickOutcome::Double(_) if active => ClickEffect::Deactivate,
        ClickOutcome::Double(_) => ClickEffect::Activate,
        ClickOutcome::Single(target) if target.tag.is_toggle_capable() && !active => {
            ClickEffect::Activate
        }
        ClickOutcome::Single(_) if has_info => ClickEffect::OpenInfo,
        ClickOutcome::Single(_) => ClickEffect::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    fn screen() -> Target {
        Target {
            entity: Entity::from_raw(10),
            tag: ExhibitTag::CertificateScreen,
        }
    }

    fn trophy() -> Target {
        Target {
            entity: Entity::from_raw(11),
            tag: ExhibitTag::Trophy,
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// Apply successive clicks to a screen's active flag.
    fn run_clicks(times: &[u64], mut active: bool) -> bool {
        let mut router = InteractionRouter::default();
        for &at in times {
            let outcome = router.click(Some(screen()), ms(at), WINDOW);
            match click_effect(&outcome, active, false) {
                ClickEffect::Activate => active = true,
                ClickEffect::Deactivate => active = false,
                ClickEffect::OpenInfo | ClickEffect::Nothing => {}
            }
        }
        active
    }

    #[test]
    fn double_click_within_window_toggles_off() {
        assert!(!run_clicks(&[1_000, 1_200], true));
    }

    #[test]
    fn clicks_500ms_apart_leave_active_entity_alone() {
        assert!(run_clicks(&[1_000, 1_500], true));
    }

    #[test]
    fn second_click_at_the_window_edge_is_single() {
        assert!(!run_clicks(&[1_000, 1_299], true));
        assert!(run_clicks(&[1_000, 1_300], true));

        let mut router = InteractionRouter::default();
        router.click(Some(screen()), ms(0), WINDOW);
        assert!(matches!(router.click(Some(screen()), ms(300), WINDOW), ClickOutcome::Single(_)));
    }

    #[test]
    fn single_click_activates_inactive_screen() {
        assert!(run_clicks(&[1_000], false));
    }

    #[test]
    fn double_click_pairing_resets() {
        let mut router = InteractionRouter::default();
        router.click(Some(screen()), ms(0), WINDOW);
        assert!(matches!(router.click(Some(screen()), ms(100), WINDOW), ClickOutcome::Double(_)));
        assert!(matches!(router.click(Some(screen()), ms(200), WINDOW), ClickOutcome::Single(_)));
    }

    #[test]
    fn clicks_on_different_entities_are_singles() {
        let mut router = InteractionRouter::default();
        router.click(Some(trophy()), ms(0), WINDOW);
        assert!(matches!(router.click(Some(screen()), ms(50), WINDOW), ClickOutcome::Single(_)));
    }

    #[test]
    fn non_toggle_entities_never_double() {
        let mut router = InteractionRouter::default();
        router.click(Some(trophy()), ms(0), WINDOW);
        let outcome = router.click(Some(trophy()), ms(100), WINDOW);
        assert_eq!(outcome, ClickOutcome::Single(trophy()));
        assert_eq!(click_effect(&outcome, false, true), ClickEffect::OpenInfo);
    }

    #[test]
    fn miss_is_not_acknowledged_and_breaks_pairing() {
        let mut router = InteractionRouter::default();
        router.click(Some(screen()), ms(0), WINDOW);
        let miss = router.click(None, ms(50), WINDOW);
        assert!(!miss.acknowledged());
        assert!(matches!(router.click(Some(screen()), ms(100), WINDOW), ClickOutcome::Single(_)));
    }

    #[test]
    fn hover_reports_changes_only() {
        let mut router = InteractionRouter::default();
        assert_eq!(router.hover(Some(trophy())), HoverChange::Entered(trophy()));
        assert_eq!(router.hover(Some(trophy())), HoverChange::Unchanged);
        assert_eq!(router.hover(None), HoverChange::Left);
        assert_eq!(router.hover(None), HoverChange::Unchanged);
    }
}
