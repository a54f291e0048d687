//! `pathtracer` CLI: load a JSON scene, render it, write a PPM image.
//!
//! ```text
//! pathtracer [-v | -q] [input.json] [output.ppm]
//! ```
//!
//! `input.json` defaults to `scene.json`, `output.ppm` to `output.ppm`.
//! `-v` raises the log filter to `debug`, `-q` lowers it to `error`; absent
//! either flag the filter follows `RUST_LOG`, defaulting to `info`.

use std::path::PathBuf;
use std::process::ExitCode;

use pathtracer::image_buffer::write_ppm;
use pathtracer::loader::load_scene;
use pathtracer::render::{render_image, RendererSettings};

const DEFAULT_INPUT: &str = "scene.json";
const DEFAULT_OUTPUT: &str = "output.ppm";
const DEFAULT_MAX_COMPONENT: u32 = 255;

struct Args {
    input: PathBuf,
    output: PathBuf,
    verbosity: &'static str,
}

fn parse_args() -> Args {
    let mut verbosity = "info";
    let mut positional = Vec::new();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = "debug",
            "-q" | "--quiet" => verbosity = "error",
            other => positional.push(other.to_string()),
        }
    }

    Args {
        input: positional.first().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
        output: positional.get(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        verbosity,
    }
}

fn init_logging(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(args.verbosity);

    let loaded = match load_scene(&args.input) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("pathtracer: failed to load {}: {err}", args.input.display());
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        input = %args.input.display(),
        width = loaded.width,
        height = loaded.height,
        triangles = loaded.scene.triangles.len(),
        "scene loaded"
    );

    let settings = RendererSettings::default();
    let image = render_image(&loaded.scene, &settings, loaded.width, loaded.height);

    let file = match std::fs::File::create(&args.output) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("pathtracer: failed to create {}: {err}", args.output.display());
            return ExitCode::FAILURE;
        }
    };
    let mut writer = std::io::BufWriter::new(file);
    if let Err(err) = write_ppm(&mut writer, &image, DEFAULT_MAX_COMPONENT) {
        eprintln!("pathtracer: failed to write {}: {err}", args.output.display());
        return ExitCode::FAILURE;
    }

    tracing::info!(output = %args.output.display(), "render complete");
    ExitCode::SUCCESS
}
