// Desktop kiosk for the waypoint hunt
mod kiosk;

use bevy::prelude::*;
use kiosk::KioskPlugin;
use waypoint_quest::HuntPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Waypoint Quest".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((HuntPlugin::default(), KioskPlugin))
        .run();
}
