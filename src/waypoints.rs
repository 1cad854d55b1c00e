// Marker identity to board position lookup.
use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One configured marker and the question it unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointMapping {
    pub marker: String,
    pub question_id: u32,
}

impl WaypointMapping {
    pub fn new(marker: impl Into<String>, question_id: u32) -> Self {
        Self {
            marker: marker.into(),
            question_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    pub marker: String,
    pub board_index: usize,
    pub question_id: u32,
}

/// The circular board. `waypoints[i]` sits at board position `i`.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaypointRegistry {
    waypoints: Vec<Waypoint>,
    by_marker: HashMap<String, usize>,
    by_question: HashMap<u32, usize>,
}

/// Markers compare trimmed and case-insensitively.
pub(crate) fn marker_key(marker: &str) -> String {
    marker.trim().to_lowercase()
}

impl WaypointRegistry {
    pub fn from_mappings<'a>(mappings: impl IntoIterator<Item = &'a WaypointMapping>) -> Self {
        let mut registry = Self::default();
        registry.build(mappings);
        registry
    }

    /// Rebuild every lookup from scratch.
    ///
    /// Blank markers are skipped. A repeated marker keeps the board position of
    /// its first appearance but takes the question link of its last one.
    pub fn build<'a>(&mut self, mappings: impl IntoIterator<Item = &'a WaypointMapping>) {
        self.waypoints.clear();
        self.by_marker.clear();
        self.by_question.clear();

        for mapping in mappings {
            let trimmed = mapping.marker.trim();
            if trimmed.is_empty() {
                continue;
            }

            let key = marker_key(trimmed);
            let index = match self.by_marker.get(&key) {
                Some(&existing) => {
                    warn!("Marker '{trimmed}' is configured more than once; the last entry wins.");
                    let stale = self.waypoints[existing].question_id;
                    if self.by_question.get(&stale) == Some(&existing) {
                        self.by_question.remove(&stale);
                    }
                    self.waypoints[existing] = Waypoint {
                        marker: trimmed.to_string(),
                        board_index: existing,
                        question_id: mapping.question_id,
                    };
                    existing
                }
                None => {
                    let index = self.waypoints.len();
                    self.waypoints.push(Waypoint {
                        marker: trimmed.to_string(),
                        board_index: index,
                        question_id: mapping.question_id,
                    });
                    self.by_marker.insert(key, index);
                    index
                }
            };
            self.by_question.insert(mapping.question_id, index);
        }
    }

    pub fn index_of(&self, marker: &str) -> Option<usize> {
        self.by_marker.get(&marker_key(marker)).copied()
    }

    pub fn get(&self, board_index: usize) -> Option<&Waypoint> {
        self.waypoints.get(board_index)
    }

    pub fn find(&self, marker: &str) -> Option<&Waypoint> {
        self.index_of(marker).and_then(|index| self.get(index))
    }

    pub fn by_question_id(&self, question_id: u32) -> Option<&Waypoint> {
        self.by_question
            .get(&question_id)
            .and_then(|&index| self.get(index))
    }

    pub fn count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings(pairs: &[(&str, u32)]) -> Vec<WaypointMapping> {
        pairs
            .iter()
            .map(|(marker, id)| WaypointMapping::new(*marker, *id))
            .collect()
    }

    #[test]
    fn assigns_board_indices_in_insertion_order() {
        let registry = WaypointRegistry::from_mappings(&mappings(&[
            ("casa-1", 10),
            ("casa-2", 20),
            ("casa-3", 30),
        ]));

        assert_eq!(registry.count(), 3);
        assert_eq!(registry.index_of("casa-1"), Some(0));
        assert_eq!(registry.index_of("casa-3"), Some(2));
        assert_eq!(registry.by_question_id(20).map(|w| w.board_index), Some(1));
    }

    #[test]
    fn unknown_marker_is_not_found() {
        let registry = WaypointRegistry::from_mappings(&mappings(&[("casa-1", 1)]));
        assert_eq!(registry.index_of("missing"), None);
        assert!(registry.get(5).is_none());
    }

    #[test]
    fn blank_markers_are_skipped() {
        let registry =
            WaypointRegistry::from_mappings(&mappings(&[("  ", 1), ("", 2), ("casa-1", 3)]));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.index_of("casa-1"), Some(0));
    }

    #[test]
    fn markers_match_trimmed_and_case_insensitive() {
        let registry = WaypointRegistry::from_mappings(&mappings(&[(" Casa-1 ", 1)]));
        assert_eq!(registry.index_of("casa-1"), Some(0));
        assert_eq!(registry.index_of("CASA-1"), Some(0));
        assert_eq!(registry.get(0).map(|w| w.marker.as_str()), Some("Casa-1"));
    }

    #[test]
    fn duplicate_marker_last_link_wins() {
        let registry = WaypointRegistry::from_mappings(&mappings(&[
            ("casa-1", 1),
            ("casa-2", 2),
            ("casa-1", 7),
        ]));

        assert_eq!(registry.count(), 2);
        let waypoint = registry.find("casa-1").unwrap();
        assert_eq!(waypoint.board_index, 0);
        assert_eq!(waypoint.question_id, 7);
        assert!(registry.by_question_id(1).is_none());
        assert_eq!(registry.by_question_id(7).map(|w| w.board_index), Some(0));
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut registry = WaypointRegistry::from_mappings(&mappings(&[("a", 1), ("b", 2)]));
        registry.build(&mappings(&[("c", 3)]));

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.index_of("a"), None);
        assert_eq!(registry.index_of("c"), Some(0));
    }
}
