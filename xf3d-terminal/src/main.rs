/// XF3D Terminal - interactive transform editing of simple primitives
///
/// Controls:
///   - 1/2/3: select the cube, cone or sphere
///   - X/x Y/y Z/z: rotate the selection (stack counts in shoe-box scenes)
///   - D/d U/u F/f: translate the selection along its local X/Y/Z
///   - S/s: scale the selection up/down
///   - r: start/stop recording edits, p: replay the recording
///   - Arrow keys: orbit the camera, =/-: zoom
///   - e: toggle axes, m: cycle scenes, q/Esc: quit

use anyhow::Result;
use clap::{Parser, ValueEnum};
use xf3d_core::{ProjectionMode, SceneKind, SceneState};
use xf3d_terminal::TerminalApp;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SceneArg {
    Objects,
    Shoebox,
    Tower,
    Grid,
}

impl From<SceneArg> for SceneKind {
    fn from(arg: SceneArg) -> Self {
        match arg {
            SceneArg::Objects => SceneKind::Objects,
            SceneArg::Shoebox => SceneKind::ShoeBox,
            SceneArg::Tower => SceneKind::ShoeBoxTower,
            SceneArg::Grid => SceneKind::ShoeBoxGrid,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "xf3d-terminal",
    about = "Interactive 3D transform editor for the terminal"
)]
struct Args {
    /// Scene to start in
    #[arg(long, value_enum, default_value = "objects")]
    scene: SceneArg,

    /// Use an orthographic projection instead of perspective
    #[arg(long)]
    ortho: bool,

    /// Frame-rate cap
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (width, height) = crossterm::terminal::size()?;
    let mut state = SceneState::new(u32::from(width), u32::from(height));
    state.set_scene(args.scene.into());
    if args.ortho {
        state.camera.mode = ProjectionMode::Orthographic;
    }

    let mut app = TerminalApp::new(state, args.fps)?;
    app.run()?;

    Ok(())
}
