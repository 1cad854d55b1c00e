//! Scavenger hunt quiz engine for a physical board of AR markers.
//!
//! [`SequenceEngine`](sequence::SequenceEngine) is plain data and can be driven
//! directly. [`HuntPlugin`] wires it into a Bevy app: marker sightings arrive
//! as [`tracking::MarkerDetected`] messages, answers as
//! [`quiz::AnswerSelected`], and every state change leaves as a
//! [`sequence::SequenceEvent`].
use std::path::PathBuf;

use bevy::prelude::*;

pub mod config;
pub mod error;
pub mod feedback;
pub mod pose;
pub mod questions;
pub mod quiz;
pub mod sequence;
pub mod tracking;
pub mod waypoints;

use config::{DataDir, GameConfig};
use pose::PoseGate;
use questions::QuestionBank;
use questions::loader::QuestionLoadPlugin;
use quiz::QuizPlugin;
use sequence::SequenceEngine;
use tracking::TrackingPlugin;
use waypoints::WaypointRegistry;

/// Frame order for the hunt systems in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuntSet {
    /// Finished question loads are applied.
    Load,
    /// Tracking input reaches the engine.
    Input,
    /// Answers, timers and holds.
    Quiz,
    /// Engine events go out as messages.
    Flush,
}

pub struct HuntPlugin {
    /// Where `appconfig.json` and the question files live.
    pub data_dir: PathBuf,
}

impl Default for HuntPlugin {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
        }
    }
}

impl Plugin for HuntPlugin {
    fn build(&self, app: &mut App) {
        let config = GameConfig::load(&self.data_dir);
        let registry = WaypointRegistry::from_mappings(&config.waypoints);
        if registry.is_empty() {
            warn!("No waypoints configured; every marker will be ignored.");
        }

        app.insert_resource(DataDir(self.data_dir.clone()))
            .insert_resource(PoseGate::new(
                config.max_marker_distance,
                config.max_angle_deviation,
            ))
            .insert_resource(SequenceEngine::new(
                registry,
                QuestionBank::default(),
                config.auto_reset_on_sequence_end,
            ))
            .insert_resource(config)
            .configure_sets(
                Update,
                (HuntSet::Load, HuntSet::Input, HuntSet::Quiz, HuntSet::Flush).chain(),
            )
            .add_plugins((QuestionLoadPlugin, TrackingPlugin, QuizPlugin));
    }
}
