//! # Solar System
//!
//! A sun with five planets and three moons. Every body is a sphere node that spins about
//! its own axis; children inherit the spin of their parent, which carries them around it
//! in orbit.

use anyhow::Context;
use cgmath::Vector3;
use std::f32::consts::{PI, TAU};

use crate::{
    config::{AppConfig, CameraConfig},
    exercise::Exercise,
    gfx::{
        geometry::generate_sphere,
        scene::{GeometryUploader, NodeId, SceneGraph, Spin, Transform, TransformOrder},
    },
};

const SPHERE_SLICES: u32 = 10;
const SPHERE_LAYERS: u32 = 10;

/// Parameters of one celestial body.
#[derive(Debug, Clone, Copy)]
struct Body {
    name: &'static str,
    /// Index into [`BODIES`]; `None` for the sun.
    parent: Option<usize>,
    offset: [f32; 2],
    scale: f32,
    axis: [f32; 3],
    /// Revolutions per second
    frequency: f32,
    color: [f32; 3],
}

const fn body(
    name: &'static str,
    parent: Option<usize>,
    offset: [f32; 2],
    scale: f32,
    axis: [f32; 3],
    frequency: f32,
    color: [f32; 3],
) -> Body {
    Body {
        name,
        parent,
        offset,
        scale,
        axis,
        frequency,
        color,
    }
}

// Parents always precede their children.
#[rustfmt::skip]
const BODIES: [Body; 9] = [
    body("sun",        None,    [0.0, 0.0],  1.0,  [0.0, 1.0, 0.0],    0.0, [1.0, 1.0, 0.0]),
    body("planet1",    Some(0), [10.0, 0.0], 0.35, [0.0, 0.0, -1.0],   0.1, [1.0, 0.0, 0.0]),
    body("planet1.moon", Some(1), [5.0, 0.0], 0.5, [0.0, 1.0, 1.0],    1.0, [0.5, 0.5, 1.0]),
    body("planet2",    Some(0), [20.0, 0.0], 0.25, [0.0, 0.2, 1.0],    0.2, [0.0, 0.0, 1.0]),
    body("planet3",    Some(0), [25.0, 0.0], 0.3,  [0.0, 1.0, 1.0],    0.1, [1.0, 1.0, 1.0]),
    body("planet4",    Some(0), [30.0, 0.0], 0.2,  [0.0, -0.2, -1.0],  0.4, [0.5, 0.0, 1.0]),
    body("planet5",    Some(0), [50.0, 0.0], 0.8,  [0.0, -0.001, 1.0], 0.1, [0.0, 1.0, 1.0]),
    body("planet5.moon1", Some(6), [7.0, 0.0], 0.5, [0.0, 0.0, 1.0],   0.2, [1.0, 0.5, 0.0]),
    body("planet5.moon2", Some(6), [0.0, 5.0], 0.35, [0.0, 0.2, 1.0],  0.8, [0.0, 1.0, 0.5]),
];

#[derive(Debug, Default)]
pub struct SolarSystem {
    scene: Option<SceneGraph>,
    nodes: Vec<(&'static str, NodeId)>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node of the body called `name` ("sun", "planet3", "planet5.moon1", ...).
    pub fn body_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(body, _)| *body == name)
            .map(|&(_, id)| id)
    }
}

impl Exercise for SolarSystem {
    fn config(&self) -> AppConfig {
        AppConfig::default()
            .with_title("Solar System")
            .with_camera(
                CameraConfig::default()
                    .with_position(-15.0, 3.2, 9.3)
                    .with_orientation(146.5, 9.0),
            )
    }

    fn build(&mut self, uploader: &mut dyn GeometryUploader) -> anyhow::Result<()> {
        let mut scene = SceneGraph::new(TransformOrder::RotateScaleTranslate);
        let mut ids: Vec<NodeId> = Vec::with_capacity(BODIES.len());

        for body in &BODIES {
            let [r, g, b] = body.color;
            let mut geometry = generate_sphere(SPHERE_SLICES, SPHERE_LAYERS, [r, g, b, 1.0])
                .with_lighting(body.parent.is_some());
            geometry.label = body.name.to_owned();
            let mesh = uploader
                .upload(&geometry)
                .with_context(|| format!("uploading {}", body.name))?;

            let id = match body.parent {
                None => scene.root(),
                Some(parent) => {
                    let id = scene.create_node();
                    scene.add_child(ids[parent], id)?;
                    id
                }
            };

            let node = scene
                .node_mut(id)
                .with_context(|| format!("missing node for {}", body.name))?;
            node.mesh = Some(mesh);
            node.transform = Transform::identity()
                .with_translation(body.offset[0], body.offset[1], 0.0)
                .with_scale(body.scale);
            if body.parent.is_none() {
                node.transform = node.transform.with_rotation(PI / 2.0, 0.0, 0.0);
            }
            let [x, y, z] = body.axis;
            node.spin = Some(Spin::new(Vector3::new(x, y, z), TAU * body.frequency));

            ids.push(id);
        }

        scene.initialize_matrices()?;
        log::info!("solar system ready: {} bodies", scene.len());

        self.nodes = BODIES.iter().map(|body| body.name).zip(ids).collect();
        self.scene = Some(scene);
        Ok(())
    }

    fn update(&mut self, dt: f32) -> anyhow::Result<()> {
        if let Some(scene) = self.scene.as_mut() {
            scene.update_scene(dt)?;
        }
        Ok(())
    }

    fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{
        build_local_matrix, draw_scene, mesh::RecordingUploader, DrawList, MatrixStack,
    };
    use cgmath::SquareMatrix;

    fn built() -> (SolarSystem, RecordingUploader) {
        let mut solar = SolarSystem::new();
        let mut uploader = RecordingUploader::default();
        solar.build(&mut uploader).unwrap();
        (solar, uploader)
    }

    #[test]
    fn builds_nine_bodies_with_moons_under_their_planets() {
        let (solar, uploader) = built();
        let scene = solar.scene().unwrap();
        assert_eq!(scene.len(), 9);
        assert_eq!(uploader.uploads.len(), 9);

        let sun = solar.body_node("sun").unwrap();
        let planet5 = solar.body_node("planet5").unwrap();
        assert_eq!(sun, scene.root());
        assert_eq!(scene.children(sun).len(), 5);
        assert_eq!(scene.children(planet5).len(), 2);
        assert_eq!(scene.depth(solar.body_node("planet5.moon2").unwrap()), 2);
        let moon = solar.body_node("planet1.moon").unwrap();
        assert_eq!(scene.parent(moon), solar.body_node("planet1"));
    }

    #[test]
    fn only_the_sun_is_unlit() {
        let (_, uploader) = built();
        let unlit: Vec<_> = uploader
            .uploads
            .iter()
            .filter(|g| !g.lit)
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(unlit, vec!["sun"]);
    }

    #[test]
    fn update_leaves_the_sun_still_and_spins_planets() {
        let (mut solar, _) = built();
        let sun = solar.body_node("sun").unwrap();
        let planet = solar.body_node("planet2").unwrap();
        let before_sun = solar.scene().unwrap().node(sun).unwrap().matrix();
        let before_planet = solar.scene().unwrap().node(planet).unwrap().matrix();

        solar.update(0.5).unwrap();

        let scene = solar.scene().unwrap();
        assert_eq!(scene.node(sun).unwrap().matrix(), before_sun);
        assert_ne!(scene.node(planet).unwrap().matrix(), before_planet);
    }

    #[test]
    fn initial_matrices_use_rotate_scale_translate() {
        let (solar, _) = built();
        let scene = solar.scene().unwrap();
        let id = solar.body_node("planet1").unwrap();
        let node = scene.node(id).unwrap();
        assert_eq!(
            node.matrix(),
            build_local_matrix(&node.transform, TransformOrder::RotateScaleTranslate)
        );
    }

    #[test]
    fn every_body_is_drawn_once() {
        let (solar, _) = built();
        let mut stack = MatrixStack::new();
        let mut draws = DrawList::new();
        draw_scene(solar.scene().unwrap(), &mut stack, cgmath::Matrix4::identity(), &mut draws)
            .unwrap();
        assert_eq!(draws.len(), 9);
        assert!(stack.is_empty());
    }

    #[test]
    fn update_before_build_is_a_no_op() {
        let mut solar = SolarSystem::new();
        solar.update(1.0).unwrap();
        assert!(solar.scene().is_none());
    }
}
