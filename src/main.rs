use std::env;

use image::Rgb;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use lsystem_forest::{plant_tree, ImageCanvas, SceneParameters, TreeError};

const WIDTH : u32 = 800;
const HEIGHT : u32 = 600;

// Usage: lsystem_forest [config.json] [output.png]
fn main() -> Result<(), TreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lsystem_forest=info"))
        )
        .init();

    let mut args = env::args().skip(1);
    let scene = match args.next() {
        Some(path) => SceneParameters::from_json_file(path)?,
        None => SceneParameters::default(),
    };
    let output = args.next().unwrap_or_else(|| "tree.png".to_string());

    let mut rng = match scene.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut canvas = ImageCanvas::init(WIDTH, HEIGHT, Rgb([255, 255, 255]));
    let origin = canvas.place(scene.offset);
    plant_tree(&mut canvas, &mut rng, &scene, origin)?;

    canvas.image().save(&output)?;
    tracing::info!(path = %output, "image saved");
    Ok(())
}
