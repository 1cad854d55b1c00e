// Full-screen card showing how far the player moves after a round.
use bevy::prelude::*;
use waypoint_quest::config::GameConfig;
use waypoint_quest::feedback::{self, Tone};
use waypoint_quest::quiz::QuizResolved;

pub struct FeedbackCardPlugin;

impl Plugin for FeedbackCardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (spawn_card, fade_card).chain());
    }
}

const FADE_IN: f32 = 0.1;
const FADE_OUT: f32 = 0.4;

#[derive(Component)]
struct CardRoot {
    elapsed: f32,
    total: f32,
    base: Color,
}

#[derive(Component)]
struct CardText;

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Correct => Color::srgb(0.1, 0.45, 0.2),
        Tone::Wrong => Color::srgb(0.55, 0.12, 0.12),
        Tone::Inactive => Color::srgb(0.35, 0.35, 0.35),
    }
}

fn spawn_card(
    mut commands: Commands,
    mut resolved: MessageReader<QuizResolved>,
    config: Res<GameConfig>,
    cards: Query<Entity, With<CardRoot>>,
) {
    let Some(round) = resolved.read().last() else {
        return;
    };
    for entity in &cards {
        commands.entity(entity).despawn();
    }

    let view = feedback::present(round.delta, round.elapsed, &config.language);
    let base = tone_color(view.tone);
    commands
        .spawn((
            CardRoot {
                elapsed: 0.0,
                total: config.feedback_display_duration.max(FADE_IN + FADE_OUT),
                base,
            },
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(8.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(base.with_alpha(0.0)),
            GlobalZIndex(100),
        ))
        .with_children(|parent| {
            parent.spawn((
                CardText,
                Text::new(view.headline),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
            ));
            for (i, line) in view.movement.into_iter().enumerate() {
                // The step count is the big line.
                let font_size = if i == 1 { 96.0 } else { 40.0 };
                parent.spawn((
                    CardText,
                    Text::new(line),
                    TextFont {
                        font_size,
                        ..default()
                    },
                    TextColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
                ));
            }
        });
}

fn fade_card(
    mut commands: Commands,
    time: Res<Time>,
    mut cards: Query<(Entity, &mut CardRoot, &mut BackgroundColor)>,
    mut texts: Query<&mut TextColor, With<CardText>>,
) {
    for (entity, mut card, mut bg) in &mut cards {
        card.elapsed += time.delta_secs();
        let t = card.elapsed;
        if t >= card.total {
            commands.entity(entity).despawn();
            continue;
        }

        let alpha = if t < FADE_IN {
            t / FADE_IN
        } else if t < card.total - FADE_OUT {
            1.0
        } else {
            (card.total - t) / FADE_OUT
        };

        bg.0 = card.base.with_alpha(alpha * 0.95);
        for mut color in &mut texts {
            color.0 = Color::srgba(1.0, 1.0, 1.0, alpha);
        }
    }
}
