// Distance and viewing-angle gate for marker sightings.
use bevy::prelude::*;

/// Below this the viewer is treated as standing on the marker.
const NEGLIGIBLE_DISTANCE: f32 = 1e-5;

/// Limits a sighting must satisfy. Non-positive values disable a check.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PoseGate {
    pub max_distance: f32,
    pub max_angle_deviation: f32,
}

/// Where the viewer and the marker are when a marker is seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPose {
    pub viewer: Vec3,
    pub marker: Vec3,
    pub marker_forward: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseVerdict {
    pub accepted: bool,
    pub distance: f32,
    /// Degrees between the marker's forward axis and the marker-to-viewer direction.
    pub angle_to_normal: f32,
    /// `|90 - angle_to_normal|` in degrees.
    pub angle_deviation: f32,
}

impl PoseGate {
    pub fn new(max_distance: f32, max_angle_deviation: f32) -> Self {
        Self {
            max_distance,
            max_angle_deviation,
        }
    }

    pub fn evaluate(&self, pose: &MarkerPose) -> PoseVerdict {
        evaluate(
            pose.viewer,
            pose.marker,
            pose.marker_forward,
            self.max_distance,
            self.max_angle_deviation,
        )
    }
}

pub fn evaluate(
    viewer: Vec3,
    marker: Vec3,
    marker_forward: Vec3,
    max_distance: f32,
    max_angle_deviation: f32,
) -> PoseVerdict {
    let to_viewer = viewer - marker;
    let distance = to_viewer.length();

    if distance < NEGLIGIBLE_DISTANCE {
        return PoseVerdict {
            accepted: max_angle_deviation <= 0.0,
            distance,
            angle_to_normal: 0.0,
            angle_deviation: 90.0,
        };
    }

    // The forward axis lies along the marker surface, so 90 degrees is face-on.
    let angle_to_normal = if marker_forward.length_squared() > 0.0 {
        marker_forward.angle_between(to_viewer).to_degrees()
    } else {
        0.0
    };
    let angle_deviation = (90.0 - angle_to_normal).abs();

    let too_far = max_distance > 0.0 && distance > max_distance;
    let too_oblique = max_angle_deviation > 0.0 && angle_deviation > max_angle_deviation;

    PoseVerdict {
        accepted: !too_far && !too_oblique,
        distance,
        angle_to_normal,
        angle_deviation,
    }
}
