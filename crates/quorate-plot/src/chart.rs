use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::font::{self, GLYPH_HEIGHT};
use crate::ticks::Axis;
use crate::PlotError;

/// Line colours assigned to series in insertion order.
pub const PALETTE: [Rgb<u8>; 6] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const FRAME: Rgb<u8> = Rgb([204, 204, 204]);

const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 24;
const MARGIN_TOP: u32 = 24;
const MARGIN_BOTTOM: u32 = 64;
const TICK_LEN: i32 = 6;
const TEXT_SCALE: u32 = 2;
const LINE_WIDTH: u32 = 2;
const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Clone)]
pub struct LineSeries {
    pub label: String,
    pub color: Rgb<u8>,
    pub points: Vec<(f64, f64)>,
}

/// A single-panel line chart.
#[derive(Debug, Clone)]
pub struct Chart {
    pub width: u32,
    pub height: u32,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

/// Pixel-space rectangle of the data area.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

impl PlotArea {
    fn right(&self) -> i32 {
        self.left + self.width
    }

    fn bottom(&self) -> i32 {
        self.top + self.height
    }

    fn map(&self, x_axis: &Axis, y_axis: &Axis, (x, y): (f64, f64)) -> (i32, i32) {
        let fx = (x - x_axis.lo) / x_axis.span();
        let fy = (y - y_axis.lo) / y_axis.span();
        (
            self.left + (fx * self.width as f64).round() as i32,
            self.bottom() - (fy * self.height as f64).round() as i32,
        )
    }
}

impl Chart {
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            width: 800,
            height: 600,
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Add a series from aligned x and y slices. The colour comes from
    /// [`PALETTE`] by position.
    pub fn add_series(
        &mut self,
        label: impl Into<String>,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<(), PlotError> {
        let label = label.into();
        if xs.len() != ys.len() {
            return Err(PlotError::LengthMismatch {
                label,
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.is_empty() {
            return Err(PlotError::EmptySeries(label));
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(PlotError::NonFinite(label));
        }
        let color = PALETTE[self.series.len() % PALETTE.len()];
        self.series.push(LineSeries {
            label,
            color,
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        });
        Ok(())
    }

    fn plot_area(&self) -> Result<PlotArea, PlotError> {
        let min_width = MARGIN_LEFT + MARGIN_RIGHT;
        let min_height = MARGIN_TOP + MARGIN_BOTTOM;
        if self.width <= min_width || self.height <= min_height {
            return Err(PlotError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(PlotArea {
            left: MARGIN_LEFT as i32,
            top: MARGIN_TOP as i32,
            width: (self.width - min_width) as i32,
            height: (self.height - min_height) as i32,
        })
    }

    fn axes(&self) -> Result<(Axis, Axis), PlotError> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next().ok_or(PlotError::Empty)?;
        let (mut x_max, mut y_max) = *first;
        let (mut x_min, mut y_min) = *first;
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        // Anchor non-negative data at zero.
        Ok((
            Axis::covering(x_min.min(0.0), x_max, 6),
            Axis::covering(y_min.min(0.0), y_max, 8),
        ))
    }

    /// Rasterise the chart.
    pub fn render(&self) -> Result<RgbImage, PlotError> {
        if self.series.is_empty() {
            return Err(PlotError::Empty);
        }
        let area = self.plot_area()?;
        let (x_axis, y_axis) = self.axes()?;
        let mut canvas = Canvas::new(self.width, self.height, BACKGROUND);

        self.draw_axes(&mut canvas, area, &x_axis, &y_axis);
        for series in &self.series {
            let pixels: Vec<(i32, i32)> = series
                .points
                .iter()
                .map(|&p| area.map(&x_axis, &y_axis, p))
                .collect();
            if let [only] = pixels.as_slice() {
                canvas.fill_rect(only.0 - 1, only.1 - 1, 3, 3, series.color);
            }
            for pair in pixels.windows(2) {
                canvas.line(pair[0], pair[1], series.color, LINE_WIDTH);
            }
        }
        self.draw_legend(&mut canvas, area);

        debug!(
            width = self.width,
            height = self.height,
            series = self.series.len(),
            x_max = x_axis.hi,
            y_max = y_axis.hi,
            "chart rendered"
        );
        Ok(canvas.into_image())
    }

    fn draw_axes(&self, canvas: &mut Canvas, area: PlotArea, x_axis: &Axis, y_axis: &Axis) {
        let glyph_h = (GLYPH_HEIGHT * TEXT_SCALE) as i32;

        for tick in x_axis.ticks() {
            let (px, _) = area.map(x_axis, y_axis, (tick, y_axis.lo));
            canvas.line((px, area.bottom()), (px, area.bottom() + TICK_LEN), INK, 1);
            let label = x_axis.label(tick);
            let w = font::text_width(&label, TEXT_SCALE) as i32;
            canvas.text(px - w / 2, area.bottom() + TICK_LEN + 4, &label, INK, TEXT_SCALE);
        }
        for tick in y_axis.ticks() {
            let (_, py) = area.map(x_axis, y_axis, (x_axis.lo, tick));
            canvas.line((area.left - TICK_LEN, py), (area.left, py), INK, 1);
            let label = y_axis.label(tick);
            let w = font::text_width(&label, TEXT_SCALE) as i32;
            canvas.text(
                area.left - TICK_LEN - 4 - w,
                py - glyph_h / 2,
                &label,
                INK,
                TEXT_SCALE,
            );
        }

        canvas.stroke_rect(
            area.left,
            area.top,
            area.width as u32 + 1,
            area.height as u32 + 1,
            INK,
        );

        let x_label_w = font::text_width(&self.x_label, TEXT_SCALE) as i32;
        canvas.text(
            area.left + area.width / 2 - x_label_w / 2,
            self.height as i32 - glyph_h - 10,
            &self.x_label,
            INK,
            TEXT_SCALE,
        );
        let y_label_w = font::text_width(&self.y_label, TEXT_SCALE) as i32;
        canvas.text_vertical(
            10,
            area.top + area.height / 2 + y_label_w / 2,
            &self.y_label,
            INK,
            TEXT_SCALE,
        );
    }

    /// Legend box in the lower-right corner of the data area.
    fn draw_legend(&self, canvas: &mut Canvas, area: PlotArea) {
        let glyph_h = (GLYPH_HEIGHT * TEXT_SCALE) as i32;
        let row_h = glyph_h + 10;
        let sample_w = 28;
        let pad = 8;
        let text_w = self
            .series
            .iter()
            .map(|s| font::text_width(&s.label, TEXT_SCALE))
            .max()
            .unwrap_or(0) as i32;
        let box_w = pad * 3 + sample_w + text_w;
        let box_h = pad * 2 + row_h * self.series.len() as i32 - 10;
        let x = area.right() - box_w - 10;
        let y = area.bottom() - box_h - 10;

        canvas.fill_rect(x, y, box_w as u32, box_h as u32, BACKGROUND);
        canvas.stroke_rect(x, y, box_w as u32, box_h as u32, FRAME);
        for (i, series) in self.series.iter().enumerate() {
            let row_top = y + pad + i as i32 * row_h;
            let mid = row_top + glyph_h / 2;
            canvas.line(
                (x + pad, mid),
                (x + pad + sample_w, mid),
                series.color,
                LINE_WIDTH,
            );
            canvas.text(
                x + pad * 2 + sample_w,
                row_top,
                &series.label,
                INK,
                TEXT_SCALE,
            );
        }
    }

    /// Render and write the chart as a JPEG at `path`.
    pub fn save_jpeg(&self, path: &Path) -> Result<(), PlotError> {
        let image = self.render()?;
        let file = File::create(path).map_err(|source| PlotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode_image(&image)?;
        writer.flush().map_err(|source| PlotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "chart written");
        Ok(())
    }
}
