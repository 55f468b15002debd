use bevy::prelude::*;

use crate::core::components::{Cube, CubeLabel};
use crate::core::config::GameConfig;
use crate::core::system::system_order::PresentationSet;
use crate::physics::rapier::arena::ArenaWall;
use crate::physics::zones::OverflowZone;
use crate::rendering::palette::palette::{
    label_color_for, tier_colors, OVERFLOW_LINE_COLOR, WALL_COLOR,
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct CubeMaterialsInitSet;

/// One material per configured tier, indexed by level.
#[derive(Resource, Debug, Clone)]
pub struct CubeTierMaterials {
    handles: Vec<Handle<ColorMaterial>>,
    colors: Vec<Color>,
}

impl CubeTierMaterials {
    pub fn new(handles: Vec<Handle<ColorMaterial>>, colors: Vec<Color>) -> Self {
        Self { handles, colors }
    }

    /// Material for `level`; out-of-range levels use tier 0.
    pub fn material_for(&self, level: u32) -> Option<&Handle<ColorMaterial>> {
        self.handles
            .get(level as usize)
            .or_else(|| self.handles.first())
    }

    pub fn color_for(&self, level: u32) -> Color {
        self.colors
            .get(level as usize)
            .or_else(|| self.colors.first())
            .copied()
            .unwrap_or(Color::WHITE)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Square mesh sized to `cubes.size`, shared by every cube.
#[derive(Resource, Debug, Clone)]
pub struct CubeMesh(pub Handle<Mesh>);

pub struct MaterialsPlugin;

impl Plugin for MaterialsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_cube_materials.in_set(CubeMaterialsInitSet))
            .add_systems(
                Update,
                (
                    rebuild_tier_materials.run_if(resource_changed::<GameConfig>),
                    attach_cube_visuals,
                    retint_changed_cubes,
                    attach_arena_visuals,
                )
                    .chain()
                    .in_set(PresentationSet),
            );
    }
}

fn build_tier_materials(
    cfg: &GameConfig,
    materials: &mut Assets<ColorMaterial>,
) -> CubeTierMaterials {
    let colors = tier_colors(&cfg.cubes);
    let handles = colors.iter().map(|c| materials.add(*c)).collect();
    CubeTierMaterials::new(handles, colors)
}

fn setup_cube_materials(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if cfg.cubes.tier_colors.is_empty() {
        warn!(target: "config", "no tier colors configured; using a single fallback tier");
    }
    let tiers = build_tier_materials(&cfg, &mut materials);
    info!(target: "config", "built {} cube tier materials", tiers.len());
    commands.insert_resource(tiers);
    let size = cfg.cubes.size;
    commands.insert_resource(CubeMesh(meshes.add(Rectangle::new(size, size))));
}

fn rebuild_tier_materials(
    cfg: Res<GameConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    tiers: Option<ResMut<CubeTierMaterials>>,
    mut cubes: Query<(&Cube, &mut MeshMaterial2d<ColorMaterial>)>,
) {
    let Some(mut tiers) = tiers else {
        return;
    };
    let rebuilt = build_tier_materials(&cfg, &mut materials);
    if rebuilt.colors == tiers.colors {
        return;
    }
    *tiers = rebuilt;
    for (cube, mut mat) in cubes.iter_mut() {
        if let Some(h) = tiers.material_for(cube.level()) {
            mat.0 = h.clone();
        }
    }
}

fn cube_label_text(cube: &Cube) -> Text2d {
    Text2d::new(cube.value().to_string())
}

fn label_font_size(cfg: &GameConfig, cube: &Cube) -> f32 {
    let digits = cube.value().to_string().len().max(2) as f32;
    (cfg.cubes.size * 1.4 / digits).clamp(8.0, cfg.cubes.size * 0.6)
}

fn attach_cube_visuals(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    tiers: Option<Res<CubeTierMaterials>>,
    mesh: Option<Res<CubeMesh>>,
    new_cubes: Query<(Entity, &Cube), Added<Cube>>,
) {
    let (Some(tiers), Some(mesh)) = (tiers, mesh) else {
        return;
    };
    for (entity, cube) in new_cubes.iter() {
        let Some(material) = tiers.material_for(cube.level()) else {
            continue;
        };
        let label_color = label_color_for(tiers.color_for(cube.level()));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh.0.clone()), MeshMaterial2d(material.clone())))
            .with_children(|parent| {
                parent.spawn((
                    CubeLabel,
                    cube_label_text(cube),
                    TextFont {
                        font_size: label_font_size(&cfg, cube),
                        ..default()
                    },
                    TextColor(label_color),
                    Transform::from_xyz(0.0, 0.0, 1.0),
                ));
            });
    }
}

/// Level changes (merges) re-derive the tier material and the label.
fn retint_changed_cubes(
    cfg: Res<GameConfig>,
    tiers: Option<Res<CubeTierMaterials>>,
    mut cubes: Query<(&Cube, &mut MeshMaterial2d<ColorMaterial>), Changed<Cube>>,
    changed: Query<&Cube, Changed<Cube>>,
    mut labels: Query<(&ChildOf, &mut Text2d, &mut TextFont, &mut TextColor), With<CubeLabel>>,
) {
    let Some(tiers) = tiers else {
        return;
    };
    for (cube, mut mat) in cubes.iter_mut() {
        if cube.is_destroyed() {
            continue;
        }
        if let Some(h) = tiers.material_for(cube.level()) {
            if mat.0 != *h {
                mat.0 = h.clone();
            }
        }
    }
    for (child_of, mut text, mut font, mut color) in labels.iter_mut() {
        let Ok(cube) = changed.get(child_of.parent()) else {
            continue;
        };
        *text = cube_label_text(cube);
        font.font_size = label_font_size(&cfg, cube);
        color.0 = label_color_for(tiers.color_for(cube.level()));
    }
}

fn attach_arena_visuals(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    walls: Query<(Entity, &ArenaWall), Added<ArenaWall>>,
    overflow: Query<Entity, Added<OverflowZone>>,
) {
    for (entity, wall) in walls.iter() {
        commands.entity(entity).insert((
            Mesh2d(meshes.add(Rectangle::new(wall.size.x, wall.size.y))),
            MeshMaterial2d(materials.add(WALL_COLOR)),
        ));
    }
    for entity in overflow.iter() {
        let band = cfg.arena.overflow_zone_height.max(1.0);
        commands.entity(entity).insert((
            Mesh2d(meshes.add(Rectangle::new(cfg.arena.width, band))),
            MeshMaterial2d(materials.add(OVERFLOW_LINE_COLOR)),
            Visibility::Visible,
        ));
    }
}
