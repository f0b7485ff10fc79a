//! Scene renderer: projects the 27 cubies and paints them into the
//! terminal framebuffer.
//!
//! Reads simulation state only; all cube motion happens in [`crate::sim`].

use std::io::{self, Write};
use std::time::Instant;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use crate::graphics::{apply_lighting, draw_line, draw_triangle, Framebuffer, Rgb};
use crate::math::{
    calculate_light_intensity, calculate_normal, multiply_matrices, multiply_matrix_vector,
    rotation_x, rotation_y, rotation_z,
};
use crate::sim::Simulation;
use crate::state::AppState;
use crate::vertex::Vertex;

/// Edge length of one cubie in world units.
const CUBIE_SIZE: f64 = 0.8;

/// Gap between neighboring cubies in world units.
const GAP: f64 = 0.01;

/// Unit cube corners, scaled per cubie.
const CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Cube faces (each face is defined by 4 vertex indices)
const FACES: [(usize, usize, usize, usize); 6] = [
    (0, 1, 2, 3),
    (5, 4, 7, 6),
    (4, 0, 3, 7),
    (1, 5, 6, 2),
    (4, 5, 1, 0),
    (3, 2, 6, 7),
];

/// Sticker colors in the cubie's local frame, matching [`FACES`] order:
/// -z, +z, -x, +x, -y, +y. Fixed to the piece, so they travel with it.
const FACE_COLORS: [Rgb; 6] = [
    (30, 60, 220),   // back: blue
    (30, 190, 60),   // front: green
    (235, 130, 20),  // left: orange
    (210, 40, 40),   // right: red
    (230, 210, 40),  // bottom: yellow
    (235, 235, 235), // top: white
];

/// Cube edges (pairs of vertex indices)
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0), // Front face
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4), // Back face
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7), // Connecting edges
];

/// Draws the cube scene and the text overlays.
pub struct SceneRenderer {
    fb: Framebuffer,
    cols: u16,
    rows: u16,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl SceneRenderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        SceneRenderer {
            fb: Framebuffer::new(cols, rows),
            cols,
            rows,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    /// Adopts a new terminal size.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.fb.resize(cols, rows);
    }

    /// Paints one frame of the simulation.
    pub fn draw(
        &mut self,
        out: &mut impl Write,
        sim: &Simulation,
        state: &AppState,
    ) -> io::Result<()> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        self.fb.clear();
        let width = self.fb.width();
        let height = self.fb.height();
        if width > 0 && height > 0 {
            let center = [width as f64 / 2.0, height as f64 / 2.0];
            let scale = (width.min(height) as f64 / 6.0) * state.zoom;

            // Whole-cube tumble applied on top of each cubie's own pose.
            let [gx, gy, gz] = sim.group_rotation();
            let group = multiply_matrices(
                &rotation_z(gz),
                &multiply_matrices(&rotation_y(gy), &rotation_x(gx)),
            );

            // The mobile tier drops the lighting pass.
            let shaded = sim.quality().cast_shadow;
            let (pixels, z_buffer) = self.fb.planes();

            for cubie in sim.cubies() {
                let spacing = CUBIE_SIZE + GAP;
                let offset = [
                    cubie.position[0] * spacing,
                    cubie.position[1] * spacing,
                    cubie.position[2] * spacing,
                ];

                // Transform and project the cubie's corners
                let vertices: Vec<Vertex> = CORNERS
                    .iter()
                    .map(|corner| {
                        let local = [
                            corner[0] * CUBIE_SIZE / 2.0,
                            corner[1] * CUBIE_SIZE / 2.0,
                            corner[2] * CUBIE_SIZE / 2.0,
                        ];
                        let posed = multiply_matrix_vector(&cubie.orientation, &local);
                        let world = multiply_matrix_vector(
                            &group,
                            &[
                                posed[0] + offset[0],
                                posed[1] + offset[1],
                                posed[2] + offset[2],
                            ],
                        );
                        Vertex {
                            position: world,
                            screen_position: [
                                world[0] * scale + center[0],
                                world[1] * scale + center[1],
                            ],
                        }
                    })
                    .collect();

                if state.wireframe {
                    for &(start, end) in &EDGES {
                        let v0 = &vertices[start];
                        let v1 = &vertices[end];
                        draw_line(
                            v0.screen_position[0],
                            v0.screen_position[1],
                            v1.screen_position[0],
                            v1.screen_position[1],
                            pixels,
                            width,
                            height,
                            (255, 255, 255),
                        );
                    }
                    continue;
                }

                for (face_index, &(a, b, c, d)) in FACES.iter().enumerate() {
                    let color = if shaded {
                        let normal = calculate_normal(
                            &vertices[a].position,
                            &vertices[b].position,
                            &vertices[c].position,
                        );
                        let face_center = [
                            (vertices[a].position[0] + vertices[c].position[0]) / 2.0,
                            (vertices[a].position[1] + vertices[c].position[1]) / 2.0,
                            (vertices[a].position[2] + vertices[c].position[2]) / 2.0,
                        ];
                        let intensity = calculate_light_intensity(
                            &normal,
                            &face_center,
                            &state.light_position,
                        );
                        apply_lighting(FACE_COLORS[face_index], intensity)
                    } else {
                        FACE_COLORS[face_index]
                    };

                    // Triangle 1: a, b, c
                    draw_triangle(
                        &vertices[a],
                        &vertices[b],
                        &vertices[c],
                        pixels,
                        z_buffer,
                        width,
                        height,
                        color,
                    );
                    // Triangle 2: a, c, d
                    draw_triangle(
                        &vertices[a],
                        &vertices[c],
                        &vertices[d],
                        pixels,
                        z_buffer,
                        width,
                        height,
                        color,
                    );
                }
            }
        }

        self.fb.blit(out)?;

        // Add debug info if debug mode is enabled
        if state.debug {
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("FPS: {:.2}", self.fps),
                format!("Tier: {:?}", sim.device_tier()),
                match sim.current_move() {
                    Some(mv) => format!(
                        "Move: {:?} layer {} dir {} ({:.0}%)",
                        mv.axis,
                        mv.layer,
                        mv.direction,
                        mv.progress * 100.0
                    ),
                    None => "Move: idle".to_owned(),
                },
                format!("Zoom: {:.2}", state.zoom),
            ];
            for (row, line) in lines.iter().enumerate() {
                write_text(out, 0, row as u16, line)?;
            }
        }

        // Display 'Paused' if the simulation is paused
        if state.paused {
            let text = "Paused";
            let col = (self.cols.saturating_sub(text.len() as u16)) / 2;
            write_text(out, col, self.rows / 2, text)?;
        }

        out.flush()
    }
}

fn write_text(out: &mut impl Write, col: u16, row: u16, text: &str) -> io::Result<()> {
    queue!(
        out,
        MoveTo(col, row),
        SetForegroundColor(Color::White),
        Print(text),
        ResetColor
    )
}
