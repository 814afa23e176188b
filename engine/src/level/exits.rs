//! Exit-trigger scanning beneath the avatar.
//!
//! Once per tick while the transition controller is idle, one ray is cast
//! straight down from just above the avatar's feet against each valid exit
//! trigger's collider. The nearest hit wins. A trigger missing any of its
//! four names is never selectable, even when it is geometrically nearer.
//!
//! The detector caches the selected trigger's names between ticks: "begin
//! transition" is reported only when the destination level *changes*, so
//! standing on the same exit (including right after a transition or a failed
//! load) does not re-fire until the avatar leaves every trigger and the
//! cache clears.

use glam::Vec3;
use log::debug;

use crate::level::{Level, ObjectId};
use crate::physics::{CollisionProbe, ProbeHit};

const DOWN: Vec3 = Vec3::NEG_Y;

/// Scans exit triggers and edge-detects destination changes.
#[derive(Debug, Default)]
pub struct ExitDetector {
    dest_level: Option<String>,
    dest_marker: Option<String>,
    exit_marker: Option<String>,
}

impl ExitDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination level of the currently selected trigger, if any.
    pub fn dest_level(&self) -> Option<&str> {
        self.dest_level.as_deref()
    }

    /// Destination marker of the currently selected trigger, if any.
    pub fn dest_marker(&self) -> Option<&str> {
        self.dest_marker.as_deref()
    }

    /// Exit marker of the currently selected trigger, if any.
    pub fn exit_marker(&self) -> Option<&str> {
        self.exit_marker.as_deref()
    }

    /// Scan the level's exit triggers with a ray from `ray_origin` straight
    /// down. Returns true when a transition should begin.
    pub fn scan(&mut self, level: &Level, probe: &dyn CollisionProbe, ray_origin: Vec3) -> bool {
        let mut queued = false;

        let mut closest: Option<usize> = None;
        let mut closest_dist = f32::INFINITY;

        for (i, exit) in level.exits.iter().enumerate() {
            let Some(collider_name) = exit.collider_name() else {
                continue; // invalid collider name
            };
            let Some(collider) = level.find_collider(collider_name) else {
                continue; // no collider with that name
            };

            let hit: ProbeHit =
                probe.cast(level, ray_origin, DOWN, &[ObjectId::Collider(collider)], false);
            if hit.missed() {
                continue;
            }

            if exit.dest_level().is_none() {
                continue; // invalid dest level name
            }
            if exit.dest_marker().is_none() {
                continue; // invalid dest entry name
            }
            if exit.exit_marker().is_none() {
                continue; // invalid exit marker name
            }

            if hit.distance < closest_dist {
                closest_dist = hit.distance;
                closest = Some(i);
            }
        }

        if let Some(i) = closest {
            let exit = &level.exits[i];

            let new_dest = exit.dest_level().unwrap_or_default();
            if self.dest_level.as_deref() != Some(new_dest) {
                self.dest_level = Some(new_dest.to_string());
                queued = true;
                debug!("exit trigger selected: dest `{new_dest}`");
            }

            let new_marker = exit.dest_marker().unwrap_or_default();
            if self.dest_marker.as_deref() != Some(new_marker) {
                self.dest_marker = Some(new_marker.to_string());
            }

            let new_exit_marker = exit.exit_marker().unwrap_or_default();
            if self.exit_marker.as_deref() != Some(new_exit_marker) {
                self.exit_marker = Some(new_exit_marker.to_string());
            }
        } else {
            self.dest_level = None;
            self.dest_marker = None;
            self.exit_marker = None;
        }

        queued
    }
}
