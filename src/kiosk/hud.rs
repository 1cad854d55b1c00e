// Status bar: what to do next, the last marker seen, and laps.
use bevy::prelude::*;
use waypoint_quest::config::GameConfig;
use waypoint_quest::feedback::{is_portuguese, tracking_hint};
use waypoint_quest::sequence::{SequenceEngine, SequenceEvent};
use waypoint_quest::tracking::TrackingActive;

use super::Screen;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastMarker>()
            .add_systems(Startup, spawn_hud)
            .add_systems(Update, (remember_last_marker, update_hud).chain())
            .add_systems(OnEnter(Screen::GameOver), spawn_game_over);
    }
}

#[derive(Resource, Default)]
struct LastMarker(String);

#[derive(Component)]
enum HudLine {
    Hint,
    Status,
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(6.0),
            padding: UiRect::all(Val::Px(16.0)),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                HudLine::Hint,
                Text::new(""),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                HudLine::Status,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
            ));
        });
}

fn remember_last_marker(mut events: MessageReader<SequenceEvent>, mut last: ResMut<LastMarker>) {
    for event in events.read() {
        match event {
            SequenceEvent::LastMarkerNameChanged(name) => last.0 = name.clone(),
            SequenceEvent::SequenceReset => last.0.clear(),
            _ => {}
        }
    }
}

fn update_hud(
    engine: Res<SequenceEngine>,
    config: Res<GameConfig>,
    tracking: Res<TrackingActive>,
    last: Res<LastMarker>,
    mut lines: Query<(&HudLine, &mut Text)>,
) {
    let pt = is_portuguese(&config.language);
    for (line, mut text) in &mut lines {
        text.0 = match line {
            HudLine::Hint if !tracking.0 => {
                let paused = if pt { "Rastreamento pausado" } else { "Tracking paused" };
                paused.to_string()
            }
            HudLine::Hint => tracking_hint(&engine, &config.language),
            HudLine::Status => {
                let marker = if last.0.is_empty() { "-" } else { last.0.as_str() };
                if pt {
                    format!(
                        "Marcador: {marker}  |  Voltas: {}  |  {}",
                        engine.laps_completed(),
                        config.language
                    )
                } else {
                    format!(
                        "Marker: {marker}  |  Laps: {}  |  {}",
                        engine.laps_completed(),
                        config.language
                    )
                }
            }
        };
    }
}

fn spawn_game_over(mut commands: Commands, config: Res<GameConfig>) {
    let (title, subtitle) = if is_portuguese(&config.language) {
        ("Fim de jogo!", "Você concluiu o percurso!")
    } else {
        ("Game over!", "You have finished the route!")
    };

    commands
        .spawn((
            DespawnOnExit(Screen::GameOver),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.9)),
            GlobalZIndex(200),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new(subtitle),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
            ));
        });
}
