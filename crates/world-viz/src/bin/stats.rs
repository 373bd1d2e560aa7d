//! Builds the generated level without a window and reports tree statistics.

use std::time::Instant;

use nalgebra::{Point3, Vector3};
use world_tree::{NullBackend, Ray3, WorldTree};
use world_viz::{generate_level, VizConfig};

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match VizConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        },
        None => VizConfig::default(),
    };

    let triangles = generate_level(&config.terrain);
    println!("Generated {} triangles", triangles.len());

    let mut backend = NullBackend::new();
    let mut tree = match WorldTree::with_config(config.tree) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    if let Err(err) = tree.add_triangles(&triangles).and_then(|()| tree.build(&mut backend)) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
    println!("Built in {:?}", start.elapsed());
    println!(
        "{} nodes, {} leaves, {} batches",
        tree.node_count(),
        tree.leaf_count(),
        tree.batch_count()
    );

    let depths: Vec<u16> = tree.leaves().map(|leaf| leaf.depth()).collect();
    let deepest = depths.iter().copied().max().unwrap_or(0);
    let largest = tree
        .leaves()
        .map(|leaf| leaf.triangles().len())
        .max()
        .unwrap_or(0);
    println!("Deepest leaf: {}, largest leaf: {} triangles", deepest, largest);

    // Sample the ground along the x axis.
    let half = config.terrain.half_size();
    let start = Instant::now();
    let samples = 64;
    let mut hits = 0;
    for i in 0..samples {
        let x = -half + (i as f32 + 0.5) * (2.0 * half / samples as f32);
        let ray = Ray3::new(Point3::new(x, 100.0, 0.37), -Vector3::y());
        if tree.first_hit(&ray).is_some() {
            hits += 1;
        }
    }
    println!("{}/{} ground rays hit in {:?}", hits, samples, start.elapsed());

    tree.clear(&mut backend);
}
