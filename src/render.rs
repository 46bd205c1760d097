//! Software rendering of the rotating molecule.
//!
//! Everything here is plain math and buffers: axis rotations, the camera
//! presets, orthographic projection with back-to-front depth sorting, and a
//! Bresenham circle rasterizer writing into an RGBA [`Frame`]. The frame is
//! handed to [`crate::kitty`] for display; nothing in this module touches
//! the terminal.

use crate::molecule::{Atom, Molecule};

/// A 3D point or direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    #[must_use]
    pub fn rotate_x(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Vec3::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }

    #[must_use]
    pub fn rotate_y(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Vec3::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    #[must_use]
    pub fn rotate_z(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Vec3::new(self.x * c - self.y * s, self.x * s + self.y * c, self.z)
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// CPK-style color for an element symbol.
///
/// Symbols are matched in the uppercased form the parser stores them in
/// (`CL`, not `Cl`); unknown elements fall back to grey.
#[must_use]
pub fn element_color(element: &str) -> Rgb {
    match element {
        "H" => Rgb { r: 255, g: 255, b: 255 },
        "C" => Rgb { r: 144, g: 144, b: 144 },
        "N" => Rgb { r: 48, g: 80, b: 248 },
        "O" => Rgb { r: 255, g: 13, b: 13 },
        "S" => Rgb { r: 255, g: 255, b: 48 },
        "P" => Rgb { r: 255, g: 128, b: 0 },
        "F" => Rgb { r: 144, g: 224, b: 80 },
        "CL" => Rgb { r: 31, g: 240, b: 31 },
        "BR" => Rgb { r: 166, g: 41, b: 41 },
        _ => Rgb { r: 200, g: 200, b: 200 },
    }
}

/// Camera presets for the initial view orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// 3/4 view from the (1, 1, 1) direction.
    #[default]
    Isometric,
    /// Looking down the Z axis.
    Xy,
    /// Looking down the Y axis.
    Xz,
    /// Looking down the X axis.
    Yz,
}

impl ViewMode {
    /// Applies the preset camera rotation to a point.
    #[must_use]
    pub fn apply(self, v: Vec3) -> Vec3 {
        use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
        match self {
            ViewMode::Xy => v,
            ViewMode::Xz => v.rotate_x(-FRAC_PI_2),
            ViewMode::Yz => v.rotate_y(FRAC_PI_2),
            // Tilt down ~32 degrees, then 45 degrees around Y.
            ViewMode::Isometric => v.rotate_x(-PI / 5.5).rotate_y(FRAC_PI_4),
        }
    }
}

/// A square RGBA frame buffer with a transparent background.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Frame {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// The raw RGBA bytes, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        self.pixels[idx] = color.r;
        self.pixels[idx + 1] = color.g;
        self.pixels[idx + 2] = color.b;
        self.pixels[idx + 3] = 255;
    }

    /// Draws a circle outline with Bresenham's midpoint algorithm.
    pub fn draw_circle_outline(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb) {
        let mut x = 0;
        let mut y = radius;
        let mut d = 3 - 2 * radius;

        while x <= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.set_pixel(px, py, color);
            }
            if d < 0 {
                d += 4 * x + 6;
            } else {
                d += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
    }
}

/// The rendering pipeline for one molecule: centered atoms plus the scale
/// that fits the bounding sphere into the viewport.
#[derive(Debug, Clone)]
pub struct Scene {
    atoms: Vec<Atom>,
    scale: f64,
    view: ViewMode,
    atom_radius: i32,
}

impl Scene {
    /// Builds a scene: atoms centered on their centroid and scaled so the
    /// bounding sphere fits the viewport with padding for the atom circles.
    #[must_use]
    pub fn new(molecule: &Molecule, width: usize, height: usize, view: ViewMode) -> Self {
        let atom_radius = 12;
        let mut atoms = molecule.atoms.clone();

        let n = atoms.len().max(1) as f64;
        let cx = atoms.iter().map(|a| a.x).sum::<f64>() / n;
        let cy = atoms.iter().map(|a| a.y).sum::<f64>() / n;
        let cz = atoms.iter().map(|a| a.z).sum::<f64>() / n;
        for atom in &mut atoms {
            atom.x -= cx;
            atom.y -= cy;
            atom.z -= cz;
        }

        // Any axis can end up projected once the molecule spins, so the
        // worst-case extent is the distance from the centroid.
        let max_extent = atoms
            .iter()
            .map(|a| Vec3::new(a.x, a.y, a.z).norm())
            .fold(0.0f64, f64::max);

        let viewport_radius = (width.min(height) as f64) / 2.0 - f64::from(atom_radius) - 10.0;
        let scale = if max_extent > 1e-3 {
            viewport_radius / max_extent
        } else {
            80.0
        };

        Scene {
            atoms,
            scale,
            view,
            atom_radius,
        }
    }

    /// Renders one animation frame at the given rotation angle.
    pub fn render(&self, frame: &mut Frame, angle: f64) {
        frame.clear();

        struct Projected {
            x: i32,
            y: i32,
            depth: f64,
            color: Rgb,
        }

        let mut projected: Vec<Projected> = self
            .atoms
            .iter()
            .map(|atom| {
                let rotated = self.view.apply(Vec3::new(atom.x, atom.y, atom.z)).rotate_y(angle);
                Projected {
                    x: (frame.width as f64 / 2.0 + rotated.x * self.scale) as i32,
                    // Screen Y grows downward.
                    y: (frame.height as f64 / 2.0 - rotated.y * self.scale) as i32,
                    depth: rotated.z,
                    color: element_color(&atom.element),
                }
            })
            .collect();

        // Back to front.
        projected.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        for p in &projected {
            frame.draw_circle_outline(p.x, p.y, self.atom_radius, p.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rotations_are_orthogonal() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        for rotated in [v.rotate_x(0.7), v.rotate_y(1.3), v.rotate_z(-0.4)] {
            assert!(close(rotated.norm(), v.norm()));
        }
    }

    #[test]
    fn quarter_turn_around_y() {
        let v = Vec3::new(1.0, 0.0, 0.0).rotate_y(FRAC_PI_2);
        assert!(close(v.x, 0.0));
        assert!(close(v.z, -1.0));
    }

    #[test]
    fn full_turn_is_identity() {
        let v = Vec3::new(0.3, -0.5, 0.9);
        let turned = v.rotate_y(2.0 * PI);
        assert!(close(turned.x, v.x));
        assert!(close(turned.y, v.y));
        assert!(close(turned.z, v.z));
    }

    #[test]
    fn circle_stays_in_bounds() {
        let mut frame = Frame::new(32, 32);
        // Center far off-canvas: every pixel write must be clipped.
        frame.draw_circle_outline(-100, -100, 5, element_color("O"));
        assert!(frame.pixels().iter().all(|&b| b == 0));

        frame.draw_circle_outline(16, 16, 8, element_color("O"));
        assert!(frame.pixels().iter().any(|&b| b != 0));
    }

    #[test]
    fn element_colors_use_stored_casing() {
        assert_eq!(element_color("CL"), Rgb { r: 31, g: 240, b: 31 });
        assert_eq!(element_color("Cl"), Rgb { r: 200, g: 200, b: 200 });
        assert_eq!(element_color("H"), Rgb { r: 255, g: 255, b: 255 });
    }

    #[test]
    fn scene_renders_centered_molecule() {
        let molecule = crate::Molecule {
            charge: 0,
            multiplicity: 1,
            atoms: vec![
                crate::Atom { element: "H".into(), x: 10.0, y: 10.0, z: 10.0 },
                crate::Atom { element: "H".into(), x: 10.0, y: 10.0, z: 10.74 },
            ],
        };
        let scene = Scene::new(&molecule, 64, 64, ViewMode::Xy);
        let mut frame = Frame::new(64, 64);
        scene.render(&mut frame, 0.0);
        assert!(frame.pixels().iter().any(|&b| b != 0));
    }
}
