use image::{Rgb, RgbImage};
use line_drawing::Bresenham;

use crate::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Raster target. Every write is bounds-checked, so shapes may be clipped
/// by the image edges.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        self.image.put_pixel(x, y, color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
        let (right, bottom) = (x + w as i32 - 1, y + h as i32 - 1);
        self.line((x, y), (right, y), color, 1);
        self.line((x, bottom), (right, bottom), color, 1);
        self.line((x, y), (x, bottom), color, 1);
        self.line((right, y), (right, bottom), color, 1);
    }

    /// Bresenham segment, thickened to a `thickness`-pixel square brush.
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb<u8>, thickness: u32) {
        let thickness = thickness.max(1) as i32;
        let offset = (thickness - 1) / 2;
        for (x, y) in Bresenham::new(from, to) {
            for dy in 0..thickness {
                for dx in 0..thickness {
                    self.put(x - offset + dx, y - offset + dy, color);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    ///
    /// Characters following a `^` are raised until the next space.
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Rgb<u8>, scale: u32) {
        let scale = scale.max(1);
        let raise = (GLYPH_HEIGHT / 2 * scale) as i32;
        let mut cursor = x;
        let mut superscript = false;
        for c in text.chars() {
            match c {
                '^' => {
                    superscript = true;
                    continue;
                }
                ' ' => superscript = false,
                _ => {}
            }
            let top = if superscript { y - raise } else { y };
            self.glyph_at(c, scale, |col, row| (cursor + col, top + row), color);
            cursor += (ADVANCE * scale) as i32;
        }
    }

    /// Draw `text` rotated a quarter turn counter-clockwise, reading bottom
    /// to top, with the start of the baseline region at `(x, y)`.
    pub fn text_vertical(&mut self, x: i32, y: i32, text: &str, color: Rgb<u8>, scale: u32) {
        let scale = scale.max(1);
        let mut cursor = y;
        for c in text.chars().filter(|&c| c != '^') {
            self.glyph_at(c, scale, |col, row| (x + row, cursor - col), color);
            cursor -= (ADVANCE * scale) as i32;
        }
    }

    fn glyph_at<F>(&mut self, c: char, scale: u32, place: F, color: Rgb<u8>)
    where
        F: Fn(i32, i32) -> (i32, i32),
    {
        let rows = font::glyph(c);
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                if !font::is_lit(&rows, col, row) {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let (px, py) = place((col * scale + sx) as i32, (row * scale + sy) as i32);
                        self.put(px, py, color);
                    }
                }
            }
        }
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn count(canvas: &Canvas, color: Rgb<u8>) -> usize {
        canvas.image().pixels().filter(|&&p| p == color).count()
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut canvas = Canvas::new(4, 4, WHITE);
        canvas.put(-1, 0, BLACK);
        canvas.put(0, 4, BLACK);
        canvas.put(100, 100, BLACK);
        assert_eq!(count(&canvas, BLACK), 0);
        canvas.put(3, 3, BLACK);
        assert_eq!(count(&canvas, BLACK), 1);
    }

    #[test]
    fn horizontal_line_covers_endpoints() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.line((1, 5), (8, 5), BLACK, 1);
        assert_eq!(count(&canvas, BLACK), 8);
        assert_eq!(*canvas.image().get_pixel(1, 5), BLACK);
        assert_eq!(*canvas.image().get_pixel(8, 5), BLACK);
    }

    #[test]
    fn thick_line_widens_brush() {
        let mut canvas = Canvas::new(20, 20, WHITE);
        canvas.line((2, 10), (17, 10), BLACK, 3);
        // 16 centre pixels plus one brush column overhanging each end.
        assert_eq!(count(&canvas, BLACK), 18 * 3);
    }

    #[test]
    fn text_draws_inside_its_box() {
        let mut canvas = Canvas::new(40, 20, WHITE);
        canvas.text(2, 2, "N1", BLACK, 1);
        assert!(count(&canvas, BLACK) > 0);
        for (x, y, p) in canvas.image().enumerate_pixels() {
            if *p == BLACK {
                assert!((2..2 + 11).contains(&x) && (2..2 + 7).contains(&y));
            }
        }
    }

    #[test]
    fn vertical_text_is_transposed() {
        let mut horizontal = Canvas::new(30, 30, WHITE);
        horizontal.text(0, 0, "C", BLACK, 1);
        let mut vertical = Canvas::new(30, 30, WHITE);
        vertical.text_vertical(0, 29, "C", BLACK, 1);
        assert_eq!(count(&horizontal, BLACK), count(&vertical, BLACK));
        // Top-left lit cell of 'C' (col 1, row 0) lands at x=0, y=29-1.
        assert_eq!(*vertical.image().get_pixel(0, 28), BLACK);
    }

    #[test]
    fn fill_and_stroke_rect() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.fill_rect(0, 0, 3, 2, BLACK);
        assert_eq!(count(&canvas, BLACK), 6);
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.stroke_rect(1, 1, 4, 4, BLACK);
        assert_eq!(count(&canvas, BLACK), 12);
    }
}
