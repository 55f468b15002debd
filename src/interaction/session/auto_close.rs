use crate::core::config::GameConfig;
use crate::gameplay::session::Session;
use bevy::prelude::*;

#[derive(Resource, Deref, DerefMut)]
struct AutoCloseTimer(Timer);

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_autoclose)
            .add_systems(Update, check_autoclose);
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Res<GameConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(seconds = secs, "AutoClose: will exit after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

// Real time, so a paused (ended) session still closes.
fn check_autoclose(
    time: Res<Time<Real>>,
    mut timer: Option<ResMut<AutoCloseTimer>>,
    session: Option<Res<Session>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if let Some(t) = timer.as_mut() {
        if t.finished() {
            return;
        }
        t.tick(time.delta());
        if t.finished() {
            if let Some(s) = session.as_deref() {
                info!(
                    target: "session",
                    "AutoClose summary: score={} outcome={:?} dwell={:.2}",
                    s.score(),
                    s.outcome(),
                    s.dwell_timer()
                );
            }
            info!("AutoClose: timer finished, requesting app exit");
            ev_exit.write(AppExit::Success);
        }
    }
}
