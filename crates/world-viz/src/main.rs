use macroquad::prelude::*;
use nalgebra::{Isometry3, Point3, Vector3};
use world_tree::{align_to_ground, WorldTree};
use world_viz::navigator::draw_bounds;
use world_viz::{generate_level, to_vec3, MeshBackend, MeshHandle, OrbitCamera, TreeNavigator, VizConfig};

fn load_config() -> VizConfig {
    let Some(path) = std::env::args().nth(1) else {
        return VizConfig::default();
    };
    match VizConfig::load(&path) {
        Ok(config) => {
            log::info!("loaded config from {}", path);
            config
        }
        Err(err) => {
            log::error!("{}; using defaults", err);
            VizConfig::default()
        }
    }
}

fn build_world(config: &VizConfig, backend: &mut MeshBackend) -> WorldTree<MeshHandle> {
    let triangles = generate_level(&config.terrain);
    log::info!("generated {} triangles", triangles.len());

    let mut tree = match WorldTree::with_config(config.tree) {
        Ok(tree) => tree,
        Err(err) => {
            log::error!("{}; using default tree settings", err);
            WorldTree::new()
        }
    };
    let built = tree
        .add_triangles(&triangles)
        .and_then(|()| tree.build(backend));
    if let Err(err) = built {
        log::error!("failed to build world: {}", err);
    }
    tree
}

/// Pose of the walker circling the level.
fn walker_pose(time: f32, radius: f32) -> Isometry3<f32> {
    let angle = time * 0.3;
    let position = Vector3::new(radius * angle.cos(), 100.0, radius * angle.sin());
    // Face along the circle.
    let heading = Vector3::y() * (-angle);
    Isometry3::new(position, heading)
}

fn draw_walker(tree: &WorldTree<MeshHandle>, pose: &Isometry3<f32>) {
    let min = Point3::new(-0.8, 0.0, -1.2);
    let max = Point3::new(0.8, 1.0, 1.2);
    let Some(alignment) = align_to_ground(tree, pose, &min, &max) else {
        return;
    };

    let placed = alignment.apply(pose);
    let origin = Point3::from(placed.translation.vector);
    let axes = [
        (Vector3::x(), RED),
        (Vector3::y() * 2.0, GREEN),
        (Vector3::z(), BLUE),
    ];
    for (axis, color) in axes {
        let tip = origin + placed.rotation * axis;
        draw_line_3d(to_vec3(&origin), to_vec3(&tip), color);
    }
    draw_sphere(to_vec3(&origin), 0.3, None, WHITE);
}

#[macroquad::main("World Tree")]
async fn main() {
    env_logger::init();

    let config = load_config();
    let mut backend = MeshBackend::new();
    let mut tree = build_world(&config, &mut backend);
    log::info!(
        "world tree: {} nodes, {} leaves, {} batches",
        tree.node_count(),
        tree.leaf_count(),
        tree.batch_count()
    );

    let mut camera = OrbitCamera::from_config(&config.camera).with_zoom(4.0, 5.0, 300.0);
    let mut navigator = TreeNavigator::new();
    let mut exploring = false;
    let mut show_leaves = false;
    let mut picked: Option<Point3<f32>> = None;
    let walker_radius = config.terrain.half_size() * 0.6;

    loop {
        camera.update();
        if is_key_pressed(KeyCode::N) {
            exploring = !exploring;
        }
        if is_key_pressed(KeyCode::B) {
            show_leaves = !show_leaves;
        }
        if is_key_pressed(KeyCode::G) {
            tree.clear(&mut backend);
            tree = build_world(&config, &mut backend);
            navigator.go_root();
        }
        if exploring {
            navigator.update(&tree);
        }
        if is_mouse_button_pressed(MouseButton::Right) {
            picked = camera.mouse_ray().and_then(|ray| tree.first_hit(&ray));
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        if exploring {
            navigator.render(&tree, &backend);
        } else {
            let frustum = camera.frustum();
            for leaf in tree.visible_leaves(&frustum) {
                for batch in leaf.batches() {
                    backend.draw(batch.handle());
                }
                if show_leaves {
                    draw_bounds(leaf, DARKGRAY);
                }
            }
        }

        if let Some(hit) = picked {
            draw_sphere(to_vec3(&hit), 0.25, None, YELLOW);
        }
        draw_walker(&tree, &walker_pose(get_time() as f32, walker_radius));

        set_default_camera();

        let stats = tree.last_render_stats();
        draw_text(
            &format!(
                "World: {} triangles | {} nodes | {} leaves | {} batches",
                tree.triangle_count(),
                tree.node_count(),
                tree.leaf_count(),
                tree.batch_count()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        if exploring {
            navigator.draw_ui(&tree, 50.0);
        } else {
            draw_text(
                &format!(
                    "Visible: {} leaves, {} triangles",
                    stats.nodes_rendered, stats.triangles_rendered
                ),
                10.0,
                45.0,
                18.0,
                GRAY,
            );
        }
        if let Some(hit) = picked {
            draw_text(
                &format!("Picked: ({:.2}, {:.2}, {:.2})", hit.x, hit.y, hit.z),
                10.0,
                135.0,
                16.0,
                YELLOW,
            );
        }

        draw_text(
            "Drag to rotate, scroll to zoom, right click to pick | [N]avigate [B]oxes [G] rebuild",
            10.0,
            155.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
