// Keyboard stand-in for the camera: digit keys show markers, Space hides them.
use bevy::prelude::*;
use waypoint_quest::config::GameConfig;
use waypoint_quest::feedback::is_portuguese;
use waypoint_quest::pose::MarkerPose;
use waypoint_quest::questions::loader::LanguageChanged;
use waypoint_quest::quiz::ResetRequested;
use waypoint_quest::sequence::SequenceEngine;
use waypoint_quest::tracking::{MarkerDetected, MarkerLost, SetTrackingActive, TrackingActive};

pub struct SimulatorPlugin;

impl Plugin for SimulatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (show_markers, hide_markers, session_keys).before(waypoint_quest::HuntSet::Input),
        );
    }
}

const MARKER_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Camera held one metre above the tile, looking straight down.
fn overhead_pose() -> MarkerPose {
    MarkerPose {
        viewer: Vec3::Y,
        marker: Vec3::ZERO,
        marker_forward: Vec3::Z,
    }
}

fn show_markers(
    keys: Res<ButtonInput<KeyCode>>,
    engine: Res<SequenceEngine>,
    mut detected: MessageWriter<MarkerDetected>,
) {
    for (index, key) in MARKER_KEYS.iter().enumerate() {
        if !keys.just_pressed(*key) {
            continue;
        }
        let Some(waypoint) = engine.registry().get(index) else {
            debug!("No waypoint on tile {}.", index + 1);
            continue;
        };
        detected.write(MarkerDetected {
            marker: waypoint.marker.clone(),
            pose: overhead_pose(),
        });
    }
}

fn hide_markers(
    keys: Res<ButtonInput<KeyCode>>,
    engine: Res<SequenceEngine>,
    mut lost: MessageWriter<MarkerLost>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    for waypoint in engine.registry().iter() {
        lost.write(MarkerLost {
            marker: waypoint.marker.clone(),
        });
    }
}

fn session_keys(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    tracking: Res<TrackingActive>,
    mut resets: MessageWriter<ResetRequested>,
    mut languages: MessageWriter<LanguageChanged>,
    mut toggles: MessageWriter<SetTrackingActive>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        resets.write(ResetRequested);
    }
    if keys.just_pressed(KeyCode::KeyL) {
        let next = if is_portuguese(&config.language) { "en" } else { "pt" };
        languages.write(LanguageChanged(next.to_string()));
    }
    if keys.just_pressed(KeyCode::KeyT) {
        toggles.write(SetTrackingActive(!tracking.0));
    }
}
