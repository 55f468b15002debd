// Bevy 0.16 text API uses components: Text, TextFont, TextColor, Node for UI text.
use bevy::prelude::*;

use crate::core::system::system_order::PresentationSet;
use crate::gameplay::session::{GameEnded, GameOutcome, RestartRequested, ScoreChanged};

#[derive(Component, Debug)]
pub struct ScoreText;

#[derive(Component, Debug)]
pub struct EndPanel;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_score_text).add_systems(
            Update,
            (update_score_text, show_end_panel, hide_end_panel_on_restart)
                .chain()
                .in_set(PresentationSet),
        );
    }
}

pub fn score_label(score: u64) -> String {
    format!("Score: {score}")
}

pub fn end_panel_text(outcome: GameOutcome, final_score: u64) -> String {
    let headline = match outcome {
        GameOutcome::Victory => "You Win!",
        GameOutcome::Defeat => "Game Over!",
    };
    format!("{headline}\nScore: {final_score}\nPress R to restart")
}

fn spawn_score_text(mut commands: Commands) {
    commands.spawn((
        Text::new(score_label(0)),
        TextFont {
            font_size: 28.0,
            ..Default::default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(14.0),
            ..Default::default()
        },
        ScoreText,
    ));
}

fn update_score_text(
    mut changed: EventReader<ScoreChanged>,
    mut q_text: Query<&mut Text, With<ScoreText>>,
) {
    let Some(ev) = changed.read().last() else {
        return;
    };
    if let Ok(mut text) = q_text.single_mut() {
        text.0 = score_label(ev.score);
    }
}

fn show_end_panel(
    mut commands: Commands,
    mut ended: EventReader<GameEnded>,
    panels: Query<(), With<EndPanel>>,
) {
    let Some(ev) = ended.read().last().copied() else {
        return;
    };
    if !panels.is_empty() {
        return;
    }
    let accent = match ev.outcome {
        GameOutcome::Victory => Color::srgb(0.45, 1.0, 0.55),
        GameOutcome::Defeat => Color::srgb(1.0, 0.45, 0.4),
    };
    commands
        .spawn((
            EndPanel,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..Default::default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(end_panel_text(ev.outcome, ev.final_score)),
                TextFont {
                    font_size: 42.0,
                    ..Default::default()
                },
                TextColor(accent),
                TextLayout::new_with_justify(JustifyText::Center),
            ));
        });
}

fn hide_end_panel_on_restart(
    mut commands: Commands,
    mut restarts: EventReader<RestartRequested>,
    panels: Query<Entity, With<EndPanel>>,
) {
    if restarts.read().last().is_none() {
        return;
    }
    for e in panels.iter() {
        commands.entity(e).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_panel_names_outcome_and_score() {
        let win = end_panel_text(GameOutcome::Victory, 2048);
        assert!(win.starts_with("You Win!\nScore: 2048"));
        let lose = end_panel_text(GameOutcome::Defeat, 12);
        assert!(lose.starts_with("Game Over!\nScore: 12"));
    }

    #[test]
    fn panel_follows_game_end_and_restart() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_event::<ScoreChanged>()
            .add_event::<GameEnded>()
            .add_event::<RestartRequested>();
        app.add_plugins(HudPlugin);
        app.update();

        app.world_mut().send_event(ScoreChanged { score: 36 });
        app.update();
        let mut q = app.world_mut().query_filtered::<&Text, With<ScoreText>>();
        assert_eq!(q.single(app.world()).unwrap().0, "Score: 36");

        app.world_mut().send_event(GameEnded {
            outcome: GameOutcome::Defeat,
            final_score: 36,
        });
        app.update();
        let mut panels = app.world_mut().query_filtered::<Entity, With<EndPanel>>();
        assert_eq!(panels.iter(app.world()).count(), 1);

        app.world_mut().send_event(RestartRequested);
        app.update();
        assert_eq!(panels.iter(app.world()).count(), 0);
    }
}
