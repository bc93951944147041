/// Terminal frontend for interactive transform editing
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::debug;
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use xf3d_core::{axis_lines, Axis, Mesh, PrimitiveKind, SceneKind, SceneState};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Rotation step per keypress, in degrees
const ROTATE_STEP_DEG: f32 = 2.0;
/// Translation step per keypress, along a local axis
const TRANSLATE_STEP: f32 = 0.1;
/// Uniform scale factor applied per keypress
const SCALE_STEP: f32 = 1.1;
/// Camera orbit step per keypress, in degrees
const ORBIT_STEP_DEG: f32 = 2.0;
/// Camera zoom step per keypress
const ZOOM_STEP: f32 = 0.2;
/// Half extent of the drawn coordinate axes
const AXIS_EXTENT: f32 = 2.0;

/// Pre-built meshes for everything the scenes draw
struct MeshSet {
    cube: Mesh,
    cone: Mesh,
    sphere: Mesh,
    shoe_box: Mesh,
}

impl MeshSet {
    fn build() -> Self {
        Self {
            cube: Mesh::cube(1.0),
            cone: Mesh::cone(0.5, 1.0, 24),
            sphere: Mesh::sphere(0.5, 24, 12),
            shoe_box: Mesh::shoe_box(),
        }
    }

    fn mesh(&self, kind: PrimitiveKind) -> &Mesh {
        match kind {
            PrimitiveKind::Cube => &self.cube,
            PrimitiveKind::Cone => &self.cone,
            PrimitiveKind::Sphere => &self.sphere,
            PrimitiveKind::ShoeBox => &self.shoe_box,
        }
    }

    fn color(kind: PrimitiveKind) -> Color {
        match kind {
            PrimitiveKind::Cube => Color::Magenta,
            PrimitiveKind::Cone => Color::Yellow,
            PrimitiveKind::Sphere => Color::Cyan,
            PrimitiveKind::ShoeBox => Color::Green,
        }
    }
}

/// Main application struct for the terminal editor
pub struct TerminalApp {
    state: SceneState,
    meshes: MeshSet,
    renderer: AsciiRenderer,
    running: bool,
    frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(state: SceneState, fps_cap: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            state,
            meshes: MeshSet::build(),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            frame_time: Duration::from_millis(1000 / u64::from(fps_cap.max(1))),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('1') => self.state.select_object(0),
                KeyCode::Char('2') => self.state.select_object(1),
                KeyCode::Char('3') => self.state.select_object(2),
                KeyCode::Up => self.state.camera.orbit(0.0, ORBIT_STEP_DEG),
                KeyCode::Down => self.state.camera.orbit(0.0, -ORBIT_STEP_DEG),
                KeyCode::Left => self.state.camera.orbit(-ORBIT_STEP_DEG, 0.0),
                KeyCode::Right => self.state.camera.orbit(ORBIT_STEP_DEG, 0.0),
                KeyCode::Char('=') => self.state.camera.zoom(-ZOOM_STEP),
                KeyCode::Char('-') => self.state.camera.zoom(ZOOM_STEP),
                KeyCode::Char('e') => self.state.toggle_axes(),
                KeyCode::Char('m') => self.state.cycle_scene(),
                KeyCode::Char('r') => {
                    let mode = self.state.toggle_recording();
                    debug!("recording mode now {mode:?}");
                }
                KeyCode::Char('p') => {
                    // Replay requests in the wrong mode are silently ignored
                    if let Err(err) = self.state.replay_on_selected() {
                        debug!("replay ignored: {err}");
                    }
                }
                KeyCode::Char(key) => self.handle_edit_key(key),
                _ => {}
            }
        }
        Ok(())
    }

    /// X/x, Y/y and Z/z rotate the selection in the objects scene and
    /// adjust the repetition counts in the shoe-box scenes
    fn handle_edit_key(&mut self, key: char) {
        if self.state.scene() != SceneKind::Objects {
            match key {
                'X' => self.state.adjust_stacks(Axis::X, 1),
                'x' => self.state.adjust_stacks(Axis::X, -1),
                'Y' => self.state.adjust_stacks(Axis::Y, 1),
                'y' => self.state.adjust_stacks(Axis::Y, -1),
                'Z' => self.state.adjust_stacks(Axis::Z, 1),
                'z' => self.state.adjust_stacks(Axis::Z, -1),
                _ => {}
            }
            return;
        }

        match key {
            'X' => self.state.rotate_selected(Axis::X, ROTATE_STEP_DEG),
            'x' => self.state.rotate_selected(Axis::X, -ROTATE_STEP_DEG),
            'Y' => self.state.rotate_selected(Axis::Y, ROTATE_STEP_DEG),
            'y' => self.state.rotate_selected(Axis::Y, -ROTATE_STEP_DEG),
            'Z' => self.state.rotate_selected(Axis::Z, ROTATE_STEP_DEG),
            'z' => self.state.rotate_selected(Axis::Z, -ROTATE_STEP_DEG),
            'S' => self.state.scale_selected(SCALE_STEP),
            's' => self.state.scale_selected(1.0 / SCALE_STEP),
            'D' => self
                .state
                .translate_selected(Vector3::new(TRANSLATE_STEP, 0.0, 0.0)),
            'd' => self
                .state
                .translate_selected(Vector3::new(-TRANSLATE_STEP, 0.0, 0.0)),
            'U' => self
                .state
                .translate_selected(Vector3::new(0.0, TRANSLATE_STEP, 0.0)),
            'u' => self
                .state
                .translate_selected(Vector3::new(0.0, -TRANSLATE_STEP, 0.0)),
            'F' => self
                .state
                .translate_selected(Vector3::new(0.0, 0.0, TRANSLATE_STEP)),
            'f' => self
                .state
                .translate_selected(Vector3::new(0.0, 0.0, -TRANSLATE_STEP)),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        if self.state.show_axes() {
            self.renderer
                .render_axes(&axis_lines(AXIS_EXTENT), &self.state.camera);
        }

        for instance in self.state.instances() {
            self.renderer.render_mesh(
                self.meshes.mesh(instance.kind),
                &instance.model,
                &self.state.camera,
                MeshSet::color(instance.kind),
            );
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let pose = self.state.selected_pose();
        let mode = if self.state.is_recording() {
            format!("REC {} ops", self.state.recorded_ops())
        } else if self.state.recorded_ops() > 0 {
            format!("idle, {} ops buffered", self.state.recorded_ops())
        } else {
            "idle".to_string()
        };

        format!(
            "XF3D | {} | {}: t=({:.1} {:.1} {:.1}) r=({:.0} {:.0} {:.0}) s={:.2} | {} | {:.1} fps",
            self.state.scene().label(),
            self.state.selected_kind().label(),
            pose.translation.x,
            pose.translation.y,
            pose.translation.z,
            pose.rotation_deg.x,
            pose.rotation_deg.y,
            pose.rotation_deg.z,
            pose.scale,
            mode,
            self.fps,
        )
    }
}
