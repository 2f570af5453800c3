mod scene;

use clap::Parser;
use log::{info, warn};
use ocean_core::{ObstructionSource, Ocean, OceanConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scene::{FloatingBody, SwellField};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// JSON file with an OceanConfig; replaces the grid and tuning flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 240)]
    frames: usize,

    /// First frame number
    #[arg(long, default_value_t = 0)]
    start_frame: i64,

    /// Vertices along the width (>= 13)
    #[arg(long, default_value_t = 128)]
    vertices_x: usize,

    /// Vertices along the length (>= 13)
    #[arg(long, default_value_t = 128)]
    vertices_y: usize,

    /// Plane width in metres
    #[arg(long, default_value_t = 200.0)]
    width: f32,

    /// Plane length in metres
    #[arg(long, default_value_t = 200.0)]
    length: f32,

    /// Factor applied to emitted heights
    #[arg(long, default_value_t = 1.0)]
    height_scale: f32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 24.0)]
    dt: f32,

    /// Wave damping (realistic 0.2..0.4)
    #[arg(long, default_value_t = 0.3)]
    alpha: f32,

    /// Obstruction smoothing spread
    #[arg(long, default_value_t = 1.0)]
    sigma: f32,

    /// Wake nonlinearity (>= 1.0)
    #[arg(long, default_value_t = 2.0)]
    wake_exponent: f32,

    /// Number of floating bodies crossing the plane
    #[arg(long, default_value_t = 3)]
    bodies: usize,

    /// Number of swell components in the ambient field
    #[arg(long, default_value_t = 4)]
    swell_waves: usize,

    /// Total swell amplitude in metres
    #[arg(long, default_value_t = 0.5)]
    swell_amplitude: f32,

    /// RNG seed for the scene (reproducibility)
    #[arg(long, default_value_t = 123)]
    seed: u64,
}

impl Args {
    fn ocean_config(&self) -> Result<OceanConfig, Box<dyn std::error::Error>> {
        if let Some(path) = &self.config {
            info!("loading config from {}", path.display());
            let config: OceanConfig = serde_json::from_reader(File::open(path)?)?;
            return Ok(config);
        }

        Ok(OceanConfig {
            start_frame: self.start_frame,
            vertices_x: self.vertices_x,
            vertices_y: self.vertices_y,
            width: self.width,
            length: self.length,
            height_scale: self.height_scale,
            dt: self.dt,
            alpha: self.alpha,
            sigma: self.sigma,
            wake_exponent: self.wake_exponent,
        })
    }
}

#[derive(Serialize)]
struct MetaRow {
    frame: i64,
    seed: u64,

    vertices_x: usize,
    vertices_y: usize,
    width: f32,
    length: f32,
    height_scale: f32,

    min_height: f32,
    max_height: f32,
    mean_height: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.frames == 0 {
        return Err("frames must be > 0".into());
    }

    let config = args.ocean_config()?;
    config.validate()?;

    fs::create_dir_all(&args.out)?;
    write_config(&args.out.join("config.json"), &config)?;

    // Scene
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let plane = config.plane();
    let swell = SwellField::random(
        &mut rng,
        args.swell_waves,
        args.swell_amplitude,
        &plane,
        config.dt,
    );
    let bodies: Vec<Box<dyn ObstructionSource>> = (0..args.bodies)
        .map(|_| {
            let body = FloatingBody::random(&mut rng, &plane, config.start_frame, config.dt);
            info!(
                "body at ({:.1}, {:.1}) r={:.1} speed={:.2}",
                body.start.0,
                body.start.1,
                body.radius,
                body.speed()
            );
            Box::new(body) as Box<dyn ObstructionSource>
        })
        .collect();

    let mut ocean = Ocean::new(config.clone(), Box::new(swell), bodies)?;

    let mut height_writer = BufWriter::new(File::create(args.out.join("heights.bin"))?);
    let mut meta_file = BufWriter::new(
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(args.out.join("meta.jsonl"))?,
    );

    for _ in 0..args.frames {
        ocean.update_fields();
        let frame = ocean.advance();

        write_f32_vec(&mut height_writer, &frame.heights)?;

        let row = MetaRow {
            frame: frame.frame,
            seed: args.seed,

            vertices_x: config.vertices_x,
            vertices_y: config.vertices_y,
            width: config.width,
            length: config.length,
            height_scale: config.height_scale,

            min_height: frame.min_height(),
            max_height: frame.max_height(),
            mean_height: frame.mean_height(),
        };

        if !(row.min_height.is_finite() && row.max_height.is_finite()) {
            warn!("frame {} diverged; check dt against the grid spacing", frame.frame);
        }

        serde_json::to_writer(&mut meta_file, &row)?;
        meta_file.write_all(b"\n")?;
    }

    height_writer.flush()?;
    meta_file.flush()?;

    info!("wrote {} frames to {}", args.frames, args.out.display());

    Ok(())
}

fn write_config(path: &Path, config: &OceanConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, config)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}

fn write_f32_vec<W: Write>(w: &mut W, v: &[f32]) -> std::io::Result<()> {
    for &x in v {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}
