use std::time::Duration;

use bevy::prelude::*;

use super::router::Target;
use crate::engine::core::scheduler::{ActionHandle, SceneScope};
use crate::engine::core::session::{SessionAction, SessionScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    /// Follows the pointer, hidden when it leaves.
    Hover,
    /// Opened by a click, stays until dismissed or timed out.
    Pinned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShownInfo {
    pub target: Target,
    pub mode: PanelMode,
}

/// Which exhibit the info panel shows, if any.
#[derive(Resource, Debug, Default)]
pub struct InfoPanel {
    shown: Option<ShownInfo>,
    dismiss: Option<ActionHandle>,
}

impl InfoPanel {
    pub fn shown(&self) -> Option<ShownInfo> {
        self.shown
    }

    /// Pin the panel and (re)arm its auto-dismiss.
    pub fn show_pinned(
        &mut self,
        target: Target,
        scheduler: &mut SessionScheduler,
        auto_dismiss: Duration,
    ) {
        if let Some(handle) = self.dismiss.take() {
            scheduler.cancel(handle);
        }
        self.dismiss = Some(scheduler.schedule(
            "info auto-dismiss",
            SceneScope::Exhibit,
            auto_dismiss,
            SessionAction::DismissInfo,
        ));
        self.shown = Some(ShownInfo {
            target,
            mode: PanelMode::Pinned,
        });
    }

    /// Returns `false` when a pinned panel keeps the hover from showing.
    pub fn show_hover(&mut self, target: Target) -> bool {
        if self.is_pinned() {
            return false;
        }
        self.shown = Some(ShownInfo {
            target,
            mode: PanelMode::Hover,
        });
        true
    }

    /// Hide a hover panel. Pinned panels stay.
    pub fn hover_ended(&mut self) -> bool {
        if self.shown.is_some_and(|shown| shown.mode == PanelMode::Hover) {
            self.shown = None;
            return true;
        }
        false
    }

    /// Hide whatever is shown. Hiding a hidden panel does nothing.
    pub fn hide(&mut self, scheduler: &mut SessionScheduler) -> bool {
        if let Some(handle) = self.dismiss.take() {
            scheduler.cancel(handle);
        }
        self.shown.take().is_some()
    }

    /// The auto-dismiss fired. Its handle is already spent.
    pub fn auto_dismissed(&mut self) -> bool {
        self.dismiss = None;
        self.shown.take().is_some()
    }

    fn is_pinned(&self) -> bool {
        self.shown.is_some_and(|shown| shown.mode == PanelMode::Pinned)
    }
}

/// Top-left corner of the panel. Below the anchor in the top half of the
/// viewport, above it otherwise, centred horizontally and kept `margin`
/// away from every edge.
pub fn place_info_panel(anchor: Vec2, viewport: Vec2, size: Vec2, margin: f32) -> Vec2 {
    let top = if anchor.y < viewport.y * 0.5 {
        anchor.y + margin
    } else {
        anchor.y - size.y - margin
    };
    let left = anchor.x - size.x * 0.5;

    let max = (viewport - size - Vec2::splat(margin)).max(Vec2::splat(margin));
    Vec2::new(left, top).clamp(Vec2::splat(margin), max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::ExhibitTag;

    fn target() -> Target {
        Target {
            entity: Entity::from_raw(5),
            tag: ExhibitTag::Desk,
        }
    }

    #[test]
    fn pinned_panel_auto_dismisses() {
        let mut scheduler = SessionScheduler::default();
        let mut panel = InfoPanel::default();
        panel.show_pinned(target(), &mut scheduler, Duration::from_secs(10));

        assert!(scheduler.tick(Duration::from_secs(9)).is_empty());
        assert_eq!(
            scheduler.tick(Duration::from_secs(1)),
            vec![SessionAction::DismissInfo]
        );
        assert!(panel.auto_dismissed());
        assert_eq!(panel.shown(), None);
    }

    #[test]
    fn repinning_rearms_a_single_timer() {
        let mut scheduler = SessionScheduler::default();
        let mut panel = InfoPanel::default();
        panel.show_pinned(target(), &mut scheduler, Duration::from_secs(10));
        scheduler.tick(Duration::from_secs(5));
        panel.show_pinned(target(), &mut scheduler, Duration::from_secs(10));

        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.tick(Duration::from_secs(6)).is_empty());
    }

    #[test]
    fn hide_is_idempotent_and_cancels_dismissal() {
        let mut scheduler = SessionScheduler::default();
        let mut panel = InfoPanel::default();
        panel.show_pinned(target(), &mut scheduler, Duration::from_secs(10));

        assert!(panel.hide(&mut scheduler));
        assert!(!panel.hide(&mut scheduler));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn hover_never_replaces_pinned() {
        let mut scheduler = SessionScheduler::default();
        let mut panel = InfoPanel::default();
        panel.show_pinned(target(), &mut scheduler, Duration::from_secs(10));

        assert!(!panel.show_hover(target()));
        assert!(!panel.hover_ended());
        assert_eq!(panel.shown().map(|s| s.mode), Some(PanelMode::Pinned));
    }

    #[test]
    fn hover_panel_hides_on_leave() {
        let mut panel = InfoPanel::default();
        assert!(panel.show_hover(target()));
        assert!(panel.hover_ended());
        assert_eq!(panel.shown(), None);
    }

    #[test]
    fn panel_goes_below_anchor_in_top_half() {
        let viewport = Vec2::new(1000.0, 800.0);
        let size = Vec2::new(300.0, 200.0);
        let placed = place_info_panel(Vec2::new(500.0, 100.0), viewport, size, 20.0);
        assert_eq!(placed, Vec2::new(350.0, 120.0));
    }

    #[test]
    fn panel_goes_above_anchor_in_bottom_half() {
        let viewport = Vec2::new(1000.0, 800.0);
        let size = Vec2::new(300.0, 200.0);
        let placed = place_info_panel(Vec2::new(500.0, 600.0), viewport, size, 20.0);
        assert_eq!(placed, Vec2::new(350.0, 380.0));
    }

    #[test]
    fn panel_is_clamped_inside_margins() {
        let viewport = Vec2::new(1000.0, 800.0);
        let size = Vec2::new(300.0, 200.0);
        let placed = place_info_panel(Vec2::new(10.0, 790.0), viewport, size, 20.0);
        assert_eq!(placed, Vec2::new(20.0, 570.0));

        let placed = place_info_panel(Vec2::new(995.0, 5.0), viewport, size, 20.0);
        assert_eq!(placed, Vec2::new(680.0, 25.0));
    }
}
