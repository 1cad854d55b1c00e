// Marker sightings from the AR layer, filtered by the pose gate and fed to the engine.
use bevy::prelude::*;

use crate::HuntSet;
use crate::pose::{MarkerPose, PoseGate};
use crate::sequence::{SequenceEngine, SequenceEvent};

pub struct TrackingPlugin;

impl Plugin for TrackingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackingActive>()
            .add_message::<MarkerDetected>()
            .add_message::<MarkerLost>()
            .add_message::<SetTrackingActive>()
            .add_message::<SequenceEvent>()
            .add_systems(
                Update,
                (toggle_tracking, forget_lost_markers, accept_sightings)
                    .chain()
                    .in_set(HuntSet::Input),
            )
            .add_systems(Update, flush_sequence_events.in_set(HuntSet::Flush));
    }
}

/// A marker is being tracked at `pose`.
#[derive(Message, Debug, Clone)]
pub struct MarkerDetected {
    pub marker: String,
    pub pose: MarkerPose,
}

#[derive(Message, Debug, Clone)]
pub struct MarkerLost {
    pub marker: String,
}

/// Turn the detection subsystem on or off. Turning it off drops the session.
#[derive(Message, Debug, Clone, Copy)]
pub struct SetTrackingActive(pub bool);

#[derive(Resource, Debug)]
pub struct TrackingActive(pub bool);

impl Default for TrackingActive {
    fn default() -> Self {
        Self(true)
    }
}

fn toggle_tracking(
    mut toggles: MessageReader<SetTrackingActive>,
    mut active: ResMut<TrackingActive>,
    mut engine: ResMut<SequenceEngine>,
) {
    for SetTrackingActive(enabled) in toggles.read() {
        if active.0 == *enabled {
            continue;
        }
        active.0 = *enabled;
        if *enabled {
            info!("Marker tracking enabled.");
        } else {
            info!("Marker tracking disabled; session cleared.");
            engine.deactivate();
        }
    }
}

fn forget_lost_markers(mut lost: MessageReader<MarkerLost>, mut engine: ResMut<SequenceEngine>) {
    for MarkerLost { marker } in lost.read() {
        engine.marker_lost(marker);
    }
}

fn accept_sightings(
    mut sightings: MessageReader<MarkerDetected>,
    active: Res<TrackingActive>,
    gate: Res<PoseGate>,
    mut engine: ResMut<SequenceEngine>,
) {
    for sighting in sightings.read() {
        if !active.0 {
            continue;
        }

        let verdict = gate.evaluate(&sighting.pose);
        if !verdict.accepted {
            debug!(
                "Marker '{}' out of range: {:.2}m, {:.1} deg off.",
                sighting.marker, verdict.distance, verdict.angle_deviation
            );
            continue;
        }

        engine.accept_detection(&sighting.marker);
    }
}

fn flush_sequence_events(
    mut engine: ResMut<SequenceEngine>,
    mut events: MessageWriter<SequenceEvent>,
) {
    for event in engine.drain_events() {
        events.write(event);
    }
}
