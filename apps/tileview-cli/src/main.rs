use anyhow::Context;
use clap::{Parser, Subcommand};
use tileview_common::{PointerPosition, ViewportSize};
use tileview_render::{DebugRendererFactory, DebugTextRenderer, HeadlessSurface};
use tileview_scene::{GridSpec, TilePlacement};
use tileview_viewport::{ManualScheduler, ViewportController};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tileview-cli", about = "Headless tools for the tile viewport")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the world position of every tile
    Layout {
        #[arg(long, default_value_t = GridSpec::DEFAULT.rows)]
        rows: u32,
        #[arg(long, default_value_t = GridSpec::DEFAULT.cols)]
        cols: u32,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Replay a press, drag and release against a headless viewport
    Drag {
        /// Pointer position at press, as `x,y`
        #[arg(long, value_parser = parse_point, default_value = "100,100")]
        from: PointerPosition,
        /// Pointer position at release, as `x,y`
        #[arg(long, value_parser = parse_point, default_value = "130,80")]
        to: PointerPosition,
        /// Intermediate pointer moves, each followed by a frame
        #[arg(long, default_value = "1")]
        steps: u32,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
}

fn parse_point(s: &str) -> Result<PointerPosition, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x `{x}`: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y `{y}`: {e}"))?;
    Ok(PointerPosition::new(x, y))
}

fn layout(spec: GridSpec, json: bool) -> anyhow::Result<()> {
    let placements: Vec<TilePlacement> = spec.layout().collect();
    tracing::debug!(tiles = placements.len(), "grid laid out");
    if json {
        println!("{}", serde_json::to_string_pretty(&placements)?);
        return Ok(());
    }

    let extent = spec.extent();
    println!(
        "Grid {}x{} tile={} spacing={} extent={}x{}",
        spec.rows, spec.cols, spec.tile_size, spec.spacing, extent.x, extent.y
    );
    for p in &placements {
        println!(
            "  [{:>3},{:>3}] x={:>8.1} y={:>8.1}",
            p.row, p.col, p.position.x, p.position.y
        );
    }
    Ok(())
}

fn drag(
    from: PointerPosition,
    to: PointerPosition,
    steps: u32,
    size: ViewportSize,
) -> anyhow::Result<String> {
    let mut ctl: ViewportController<DebugTextRenderer, ManualScheduler> =
        ViewportController::new(ManualScheduler::new());
    ctl.create_scene(&DebugRendererFactory, HeadlessSurface::Attached, size)?;
    ctl.host_ready();
    ctl.animate()?;
    ctl.on_frame()?;

    ctl.on_pointer_down(from);
    let steps = steps.max(1);
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let at = PointerPosition::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        ctl.on_pointer_move(at);
        ctl.on_frame()?;
    }
    ctl.on_pointer_up();
    tracing::info!(steps, "drag replayed");

    let renderer = ctl.renderer().context("renderer released early")?;
    Ok(renderer.last_frame().to_owned())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::debug!("tileview-cli starting");

    match cli.command {
        Commands::Layout { rows, cols, json } => {
            layout(
                GridSpec {
                    rows,
                    cols,
                    ..GridSpec::DEFAULT
                },
                json,
            )?;
        }
        Commands::Drag {
            from,
            to,
            steps,
            width,
            height,
        } => {
            println!("Drag ({}, {}) -> ({}, {}) in {steps} steps", from.x, from.y, to.x, to.y);
            print!("{}", drag(from, to, steps, ViewportSize::new(width, height))?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_pairs() {
        assert_eq!(parse_point("130,80"), Ok(PointerPosition::new(130.0, 80.0)));
        assert_eq!(parse_point(" -1.5 , 2 "), Ok(PointerPosition::new(-1.5, 2.0)));
        assert!(parse_point("130").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn drag_replay_ends_at_expected_camera() {
        let frame = drag(
            PointerPosition::new(100.0, 100.0),
            PointerPosition::new(130.0, 80.0),
            3,
            ViewportSize::new(800, 600),
        )
        .unwrap();
        assert!(frame.contains("pos=(-3.0, -2.0, 5.0)"), "{frame}");
        assert!(frame.contains("Frame 4 (800x600)"), "{frame}");
    }
}
