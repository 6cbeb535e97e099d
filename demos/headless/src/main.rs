use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::Logger;
use swarm3d::prelude::*;

/// Drives a swarm3d simulation without a window and logs frame statistics.
#[derive(Parser, Debug)]
struct Args {
    /// YAML simulation configuration. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// YAML list of input events, replayed one per tick. A built-in script is used when omitted.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seeds this many particles on circular orbits. Needs the attractor interaction mode.
    #[arg(short, long)]
    galaxy: Option<usize>,

    /// Simulated wall-clock time between frames, in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_time: f64,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let yaml = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    SimulationConfig::from_yaml(&yaml).with_context(|| format!("loading {}", path.display()))
}

fn load_script(path: Option<&PathBuf>, viewport: Viewport) -> Result<Vec<InputEvent>> {
    let Some(path) = path else {
        return Ok(default_script(viewport));
    };

    let yaml = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&yaml).with_context(|| format!("parsing {}", path.display()))
}

/// A few bursts around the centre of the screen, then a slow orbit and a zoom out.
fn default_script(viewport: Viewport) -> Vec<InputEvent> {
    let (w, h) = (viewport.width, viewport.height);

    let mut script: Vec<_> = [(0.5, 0.5), (0.3, 0.4), (0.7, 0.6), (0.45, 0.7), (0.6, 0.3)]
        .into_iter()
        .map(|(x, y)| InputEvent::SpawnAt {
            x: x * w,
            y: y * h,
            mode: SpawnMode::Burst,
        })
        .collect();

    script.push(InputEvent::BeginOrbit);
    script.extend((0..120).map(|_| InputEvent::OrbitDelta { dx: 2.0, dy: 0.5 }));
    script.push(InputEvent::EndDrag);
    script.extend((0..20).map(|_| InputEvent::ZoomDelta { delta: 50.0 }));

    script
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let script = load_script(args.script.as_ref(), config.viewport)?;

    let mut context = SimulationContext::new(config).context("invalid simulation configuration")?;
    if let Some(count) = args.galaxy {
        context
            .seed_galaxy(count, 600.0)
            .context("seeding the galaxy")?;
    }

    let mut driver = FrameDriver::new(context);
    let mut script = script.into_iter();
    let mut drawn: Vec<DrawPrimitive> = Vec::new();
    let mut contacts = Resolution::default();

    for _ in 0..args.ticks {
        if let Some(event) = script.next() {
            driver.push(event);
        }

        let frame = driver.tick(args.frame_time);
        contacts += frame.contacts;
        drawn.render(frame.primitives);

        let stats = frame.stats;
        if stats.frame % 60 == 0 {
            log::info!(
                "frame {}: {} particles, {} drawn, {} contacts, {:.1} fps",
                stats.frame,
                stats.particles,
                drawn.len(),
                contacts.contacts,
                stats.fps
            );
        }
    }

    let camera = driver.context().camera().state();
    log::info!(
        "done after {} frames: {} contacts ({} impulses), camera yaw {:.3} pitch {:.3} distance {:.0}",
        driver.stats().frame,
        contacts.contacts,
        contacts.impulses,
        camera.yaw,
        camera.pitch,
        camera.distance
    );

    Ok(())
}
