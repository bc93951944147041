/// Example: start in the shoe-box grid scene with a 3x2x3 stack
///
/// Usage: cargo run --example grid_scene

use std::io;
use xf3d_core::{Axis, SceneKind, SceneState};
use xf3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    let (width, height) = crossterm::terminal::size()?;

    let mut state = SceneState::new(u32::from(width), u32::from(height));
    state.set_scene(SceneKind::ShoeBoxGrid);
    state.adjust_stacks(Axis::X, 2);
    state.adjust_stacks(Axis::Y, 1);
    state.adjust_stacks(Axis::Z, 2);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(state, 30)?;
    app.run()?;

    Ok(())
}
