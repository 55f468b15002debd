//! Fire-and-forget merge / throw feedback: a particle burst tinted with the merged tier,
//! plus optional sound clips. Nothing here feeds back into the simulation.

use bevy::prelude::*;
use rand::Rng;

use crate::core::config::GameConfig;
use crate::core::system::system_order::PresentationSet;
use crate::gameplay::drop::CubeReleased;
use crate::gameplay::merge::CubeMerged;
use crate::rendering::materials::materials::CubeTierMaterials;

pub const BURST_PARTICLES: usize = 14;
/// Bursts are skipped once this many particles are alive.
pub const MAX_PARTICLES: usize = 256;
const PARTICLE_LIFE_SECS: f32 = 0.6;
const PARTICLE_Z: f32 = 5.0;

#[derive(Component, Debug, Clone, Copy)]
pub struct Particle {
    pub vel: Vec2,
    /// 1 at spawn, 0 when it disappears.
    pub life: f32,
    pub size: f32,
}

#[derive(Resource, Debug, Clone)]
struct ParticleMesh(Handle<Mesh>);

/// Loaded clips; `None` when the clip is not configured.
#[derive(Resource, Debug, Default, Clone)]
pub struct EffectAudio {
    pub merge: Option<Handle<AudioSource>>,
    pub throw: Option<Handle<AudioSource>>,
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectAudio>()
            .add_systems(Startup, setup_effects)
            .add_systems(
                Update,
                (spawn_merge_bursts, play_throw_sound, advance_particles)
                    .chain()
                    .in_set(PresentationSet),
            );
    }
}

fn setup_effects(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    assets: Option<Res<AssetServer>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut audio: ResMut<EffectAudio>,
) {
    commands.insert_resource(ParticleMesh(meshes.add(Rectangle::new(1.0, 1.0))));
    let Some(assets) = assets else {
        return;
    };
    audio.merge = cfg.audio.merge_clip.as_ref().map(|p| assets.load(p.clone()));
    audio.throw = cfg.audio.throw_clip.as_ref().map(|p| assets.load(p.clone()));
}

fn play_clip(commands: &mut Commands, clip: Option<&Handle<AudioSource>>) {
    if let Some(clip) = clip {
        commands.spawn((AudioPlayer::new(clip.clone()), PlaybackSettings::DESPAWN));
    }
}

fn spawn_merge_bursts(
    mut commands: Commands,
    mut merged: EventReader<CubeMerged>,
    cfg: Res<GameConfig>,
    audio: Res<EffectAudio>,
    mesh: Option<Res<ParticleMesh>>,
    tiers: Option<Res<CubeTierMaterials>>,
    alive: Query<(), With<Particle>>,
) {
    let (Some(mesh), Some(tiers)) = (mesh, tiers) else {
        merged.clear();
        return;
    };
    let mut budget = MAX_PARTICLES.saturating_sub(alive.iter().count());
    let mut rng = rand::thread_rng();
    for ev in merged.read() {
        play_clip(&mut commands, audio.merge.as_ref());
        let Some(material) = tiers.material_for(ev.level) else {
            continue;
        };
        let size = (cfg.cubes.size * 0.16).max(2.0);
        for _ in 0..BURST_PARTICLES.min(budget) {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(80.0..220.0);
            commands.spawn((
                Particle {
                    vel: Vec2::from_angle(angle) * speed,
                    life: 1.0,
                    size,
                },
                Mesh2d(mesh.0.clone()),
                MeshMaterial2d(material.clone()),
                Transform::from_translation(ev.position.extend(PARTICLE_Z))
                    .with_scale(Vec3::splat(size)),
            ));
        }
        budget = budget.saturating_sub(BURST_PARTICLES);
    }
}

fn play_throw_sound(
    mut commands: Commands,
    mut released: EventReader<CubeReleased>,
    audio: Res<EffectAudio>,
) {
    for _ in released.read() {
        play_clip(&mut commands, audio.throw.as_ref());
    }
}

fn advance_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut Particle, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut p, mut tf) in particles.iter_mut() {
        p.life -= dt / PARTICLE_LIFE_SECS;
        if p.life <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        p.vel *= 1.0 - (dt * 3.0).min(1.0);
        tf.translation += (p.vel * dt).extend(0.0);
        tf.scale = Vec3::splat(p.size * p.life);
    }
}
