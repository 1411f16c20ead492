use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use rust_orbits::assets::load_scene_images;
use rust_orbits::consts::{CAPTION, FRAME_RATE, IMAGES_DIR, SCREEN_SIZE};
use rust_orbits::file::read_file;
use rust_orbits::gui::{Canvas, KissCanvas, Simulation};
use rust_orbits::orrery::Orrery;

#[derive(Debug, Parser)]
#[command(about = "Planets and moons that orbit each other and spin; click one to select it")]
struct Args {
    /// Scene description: a body count, then one line per body
    scene: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let env = Env::default()
        .filter_or("ORBITS_LOG", "info")
        .write_style_or("ORBITS_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let args = Args::parse();

    // Everything that can go wrong with the input happens before the window opens
    let scene = read_file(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    log::info!(
        "Loaded {} bodies from {}",
        scene.bodies.len(),
        args.scene.display()
    );
    let images = load_scene_images(&scene, Path::new(IMAGES_DIR))
        .context("Failed to load sprite images")?;

    let mut canvas = KissCanvas::new(CAPTION, SCREEN_SIZE, FRAME_RATE);
    let sprites: Vec<_> = images.iter().map(|image| canvas.add_sprite(image)).collect();
    let orrery = Orrery::from_scene(&scene, canvas.center(), &sprites);
    for body in orrery.bodies() {
        log::debug!(
            "Body {:?} orbits {:?} with {} satellite(s)",
            body.id,
            body.info.parent,
            orrery.child_bodies(body.id).count()
        );
    }

    Simulation::new(orrery, canvas).run();
    Ok(())
}
