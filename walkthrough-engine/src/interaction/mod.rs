//! Pointer interaction with the exhibit room.
//!
//! Hits are resolved against [`PickBounds`](ray::PickBounds) boxes, walked up
//! to the entity carrying an [`InteractiveTag`], then classified by the
//! [`InteractionRouter`](router::InteractionRouter) into hover, single and
//! double clicks.

/// Certificate screen carousel state machine.
pub mod carousel;

/// Info panel visibility, auto-dismiss and placement.
pub mod info;

/// Bevy systems turning mouse input into interaction events.
pub mod pointer;

/// Oriented-box ray intersection.
pub mod ray;

/// Nearest-hit and tag resolution.
pub mod resolver;

/// Hover tracking and click classification.
pub mod router;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of things in the exhibit room that react to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhibitTag {
    Trophy,
    Desk,
    Bookshelf,
    Chamber,
    Cap,
    Linkedin,
    Github,
    CertificateScreen,
}

impl ExhibitTag {
    /// Toggle-capable entities have an active flag flipped by double click.
    pub fn is_toggle_capable(self) -> bool {
        matches!(self, Self::CertificateScreen)
    }
}

/// Registered on the root entity of each interactive exhibit at spawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveTag(pub ExhibitTag);

/// Written whenever the info panel appears or disappears.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum InfoPanelEvent {
    Shown {
        entity: Entity,
        tag: ExhibitTag,
        /// Screen position the panel is placed around (logical pixels).
        anchor: Vec2,
    },
    Hidden,
}
