//! Floyd-Steinberg error diffusion for the remapping step.

use crate::buffer::PixelBuffer;
use crate::color::Rgba;

/// (dx, dy, weight) with a divisor of 16.
const FLOYD_STEINBERG: [(i32, usize, f32); 4] = [(1, 0, 7.0), (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0)];

/// Two rolling rows of accumulated error.
struct ErrorRows {
    current: Vec<[f32; 3]>,
    next: Vec<[f32; 3]>,
}

impl ErrorRows {
    fn new(width: usize) -> Self {
        Self {
            current: vec![[0.0; 3]; width],
            next: vec![[0.0; 3]; width],
        }
    }

    fn add(&mut self, x: usize, dy: usize, error: [f32; 3]) {
        let row = if dy == 0 { &mut self.current } else { &mut self.next };
        for (acc, e) in row[x].iter_mut().zip(error) {
            *acc += e;
        }
    }

    fn advance(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.fill([0.0; 3]);
    }
}

/// Remap every opaque pixel through `map`, spreading the difference to
/// unvisited neighbours.
///
/// Rows alternate direction. Error is carried in gamma-encoded 0..255
/// space, the same space `map` measures distances in. Transparent pixels
/// are copied as-is and neither receive nor emit error.
pub(crate) fn diffuse(buffer: &PixelBuffer, map: impl Fn([f32; 3]) -> [u8; 3]) -> Vec<Rgba> {
    let width = buffer.width();
    let mut output = buffer.pixels().to_vec();
    let mut errors = ErrorRows::new(width);

    for y in 0..buffer.height() {
        let reverse = y % 2 == 1;
        let row = &mut output[y * width..(y + 1) * width];

        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let pixel = row[x];
            if pixel.is_transparent() {
                continue;
            }

            let acc = errors.current[x];
            let wanted = [
                (pixel.r as f32 + acc[0]).clamp(0.0, 255.0),
                (pixel.g as f32 + acc[1]).clamp(0.0, 255.0),
                (pixel.b as f32 + acc[2]).clamp(0.0, 255.0),
            ];
            let [r, g, b] = map(wanted);
            row[x] = Rgba::new(r, g, b, pixel.a);

            let error = [wanted[0] - r as f32, wanted[1] - g as f32, wanted[2] - b as f32];
            for &(dx, dy, weight) in &FLOYD_STEINBERG {
                let nx = x as i32 + if reverse { -dx } else { dx };
                if nx < 0 || nx as usize >= width || y + dy >= buffer.height() {
                    continue;
                }
                errors.add(nx as usize, dy, error.map(|e| e * weight / 16.0));
            }
        }

        errors.advance();
    }

    output
}
