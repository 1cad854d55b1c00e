// The open question with one button per answer and a countdown.
use bevy::prelude::*;
use waypoint_quest::config::GameConfig;
use waypoint_quest::questions::Question;
use waypoint_quest::quiz::{AnswerSelected, QuizRound};
use waypoint_quest::sequence::{SequenceEngine, SequenceEvent};

use super::{HOVERED_BUTTON, IDLE_BORDER, NORMAL_BUTTON, PRESSED_BUTTON, Screen};

pub struct QuizPanelPlugin;

impl Plugin for QuizPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Question), open_panel)
            .add_systems(
                Update,
                (refresh_panel, button_visuals, button_actions, update_countdown)
                    .chain()
                    .run_if(in_state(Screen::Question)),
            );
    }
}

#[derive(Component)]
struct PanelRoot;

#[derive(Component)]
struct AnswerButton(usize);

#[derive(Component)]
struct Countdown;

fn open_panel(mut commands: Commands, engine: Res<SequenceEngine>) {
    if let Some(question) = engine.current_question() {
        spawn_panel(&mut commands, question);
    }
}

/// Redraw when the open question is re-announced, e.g. in another language.
fn refresh_panel(
    mut commands: Commands,
    mut events: MessageReader<SequenceEvent>,
    panels: Query<Entity, With<PanelRoot>>,
) {
    let Some(question) = events.read().fold(None, |latest, event| match event {
        SequenceEvent::QuestionChanged(Some(question)) => Some(question),
        _ => latest,
    }) else {
        return;
    };
    for entity in &panels {
        commands.entity(entity).despawn();
    }
    spawn_panel(&mut commands, question);
}

fn spawn_panel(commands: &mut Commands, question: &Question) {
    commands
        .spawn((
            PanelRoot,
            DespawnOnExit(Screen::Question),
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
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            GlobalZIndex(50),
        ))
        .with_children(|parent| {
            parent.spawn((
                Countdown,
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
            ));

            parent.spawn((
                Text::new(question.prompt.as_str()),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    max_width: Val::Px(720.0),
                    ..default()
                },
            ));

            if !question.description.is_empty() {
                parent.spawn((
                    Text::new(question.description.as_str()),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::srgba(0.8, 0.8, 0.8, 1.0)),
                    Node {
                        max_width: Val::Px(720.0),
                        ..default()
                    },
                ));
            }

            for (index, answer) in question.answers.iter().enumerate() {
                spawn_answer_button(parent, index, &answer.text);
            }
        });
}

fn spawn_answer_button(parent: &mut ChildSpawnerCommands, index: usize, label: &str) {
    parent
        .spawn((
            AnswerButton(index),
            Button,
            Node {
                width: Val::Px(480.0),
                min_height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                ..default()
            },
            BorderColor::all(IDLE_BORDER),
            BackgroundColor(NORMAL_BUTTON),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn button_visuals(
    mut query: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<AnswerButton>),
    >,
) {
    for (interaction, mut bg, mut border) in &mut query {
        let (fill, edge) = match *interaction {
            Interaction::Pressed => (PRESSED_BUTTON, Color::WHITE),
            Interaction::Hovered => (HOVERED_BUTTON, Color::WHITE),
            Interaction::None => (NORMAL_BUTTON, IDLE_BORDER),
        };
        *bg = fill.into();
        *border = BorderColor::all(edge);
    }
}

fn button_actions(
    query: Query<(&Interaction, &AnswerButton), Changed<Interaction>>,
    mut answers: MessageWriter<AnswerSelected>,
) {
    for (interaction, button) in &query {
        if *interaction == Interaction::Pressed {
            answers.write(AnswerSelected(button.0));
        }
    }
}

fn update_countdown(
    round: Res<QuizRound>,
    config: Res<GameConfig>,
    mut texts: Query<&mut Text, With<Countdown>>,
) {
    if config.max_question_time <= 0.0 {
        return;
    }
    let remaining = round.remaining(config.max_question_time).ceil();
    for mut text in &mut texts {
        text.0 = format!("{remaining:.0}s");
    }
}
