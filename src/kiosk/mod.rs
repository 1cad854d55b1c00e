// Desktop stand-in for the AR kiosk: screens, camera, and the UI plugins.
mod feedback_card;
mod hud;
mod quiz_panel;
mod simulator;

use bevy::prelude::*;
use waypoint_quest::sequence::{SequenceEngine, SequenceEvent};

use feedback_card::FeedbackCardPlugin;
use hud::HudPlugin;
use quiz_panel::QuizPanelPlugin;
use simulator::SimulatorPlugin;

/// Which screen the kiosk is showing.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum Screen {
    #[default]
    Tracking,
    Question,
    GameOver,
}

pub struct KioskPlugin;

impl Plugin for KioskPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Screen>()
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, follow_sequence)
            .add_plugins((HudPlugin, QuizPanelPlugin, FeedbackCardPlugin, SimulatorPlugin));
    }
}

const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.35, 0.35);
const IDLE_BORDER: Color = Color::srgba(1.0, 1.0, 1.0, 0.3);

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn follow_sequence(
    mut events: MessageReader<SequenceEvent>,
    engine: Res<SequenceEngine>,
    screen: Res<State<Screen>>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    let mut target = *screen.get();
    for event in events.read() {
        target = match event {
            SequenceEvent::QuestionChanged(Some(_)) => Screen::Question,
            SequenceEvent::QuestionChanged(None) if target == Screen::Question => Screen::Tracking,
            SequenceEvent::GameOver => Screen::GameOver,
            SequenceEvent::SequenceReset => Screen::Tracking,
            _ => target,
        };
    }
    // The engine can drop a question without a reset, e.g. when tracking stops.
    if target == Screen::Question && !engine.is_awaiting_answer() {
        target = Screen::Tracking;
    }
    if target != *screen.get() {
        next_screen.set(target);
    }
}
