use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};

use tabletop_presenter::{
    engine::{Engine, source::SceneSource},
    player::Player,
    renderer::{RenderContext, Renderer},
    types::Point,
    viewport::Viewport,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const RENDER_USAGE: &str = "tabletop-presenter render <scene.json> <output.png> [x y]";
const PLAY_USAGE: &str = "tabletop-presenter play <scene.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("render") => {
            let scene_path = args.next().context(RENDER_USAGE)?;
            let output_path = args.next().context(RENDER_USAGE)?;
            let pointer = match (args.next(), args.next()) {
                (Some(x), Some(y)) => Some(Point::new(
                    x.parse().context(RENDER_USAGE)?,
                    y.parse().context(RENDER_USAGE)?,
                )),
                (None, None) => None,
                _ => bail!("pointer needs both coordinates\n\nUsage:\n  {RENDER_USAGE}"),
            };
            render(Path::new(&scene_path), Path::new(&output_path), pointer)
        }
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(Path::new(&path))
        }
        _ => bail!(
            "Tabletop Presenter: sprite compositor for card and board games\n\nUsage:\n  {RENDER_USAGE}\n  {PLAY_USAGE}"
        ),
    }
}

/// Load a scene source and everything it names.
fn open_scene(path: &Path) -> Result<(SceneSource, Engine, RenderContext)> {
    let source =
        SceneSource::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);

    let viewport = Viewport::initialize(source.design_resolution, source.display);
    let mut ctx = RenderContext::new(viewport);
    if let Some(bg) = &source.background {
        ctx = ctx
            .with_background_file(&base_dir.join(bg))
            .context("Failed to load background")?;
    }
    let engine = Engine::build(&source, &base_dir, &viewport)
        .with_context(|| format!("Failed to build scene {}", path.display()))?;
    Ok((source, engine, ctx))
}

fn render(scene_path: &Path, output_path: &Path, pointer: Option<Point>) -> Result<()> {
    let (_, mut engine, mut ctx) = open_scene(scene_path)?;

    let viewport = *ctx.viewport();
    let frame = engine.resolve_frame(&viewport, pointer);
    let ops = frame.ops.len();
    Renderer::rasterize(&frame, &mut ctx);
    Renderer::save_png(&ctx, output_path)?;

    log::info!(
        "Rendered {} sprites ({}) from {} -> {}",
        ops,
        viewport.actual(),
        scene_path.display(),
        output_path.display(),
    );
    Ok(())
}

fn play(scene_path: &Path) -> Result<()> {
    let (source, engine, ctx) = open_scene(scene_path)?;
    let mut player = Player::new(engine, ctx, source.fps);
    player.play()
}
