use std::collections::HashMap;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::models::Finding;

const BOX_THICKNESS: i32 = 3;
const GLYPH_SIZE: i32 = 8;
const TEXT_SCALE: i32 = 2;
const LABEL_PADDING: i32 = 5;
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb([color.r, color.g, color.b])
    }
}

/// Immutable class→color mapping injected into the annotator at
/// construction. Classes absent from the table get one fixed fallback
/// color so output stays stable across runs.
#[derive(Debug, Clone)]
pub struct StyleTable {
    classes: HashMap<String, Color>,
    fallback: Color,
}

impl StyleTable {
    pub fn new(classes: HashMap<String, Color>, fallback: Color) -> Self {
        Self { classes, fallback }
    }

    pub fn color_for(&self, class_name: &str) -> Color {
        self.classes
            .get(class_name)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Color {
        self.fallback
    }
}

impl Default for StyleTable {
    /// The defect palette of the original inspection portal.
    fn default() -> Self {
        let classes = HashMap::from([
            ("dent".to_string(), Color { r: 255, g: 192, b: 203 }),
            ("scratch".to_string(), Color { r: 0, g: 0, b: 255 }),
            ("lamp_broken".to_string(), Color { r: 255, g: 255, b: 0 }),
            ("glass_broken".to_string(), Color { r: 128, g: 0, b: 128 }),
            ("tire_flat".to_string(), Color { r: 255, g: 0, b: 0 }),
        ]);
        let fallback = Color { r: 0, g: 255, b: 0 };
        Self::new(classes, fallback)
    }
}

/// Draws finding boxes and labels onto a copy of the source image.
///
/// Rendering is append-only in finding-set order; later findings may
/// overlap earlier labels. Labels that would start above row 0 are
/// clamped inside the image instead of being lost off-canvas.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    style: StyleTable,
}

impl Annotator {
    pub fn new(style: StyleTable) -> Self {
        Self { style }
    }

    /// Render all findings onto a fresh RGB copy of `source`. The caller's
    /// image is never mutated; an empty finding set yields an unchanged
    /// copy with identical dimensions.
    pub fn annotate(&self, source: &DynamicImage, findings: &[Finding]) -> RgbImage {
        let mut image = source.to_rgb8();
        for finding in findings {
            self.draw_finding(&mut image, finding);
        }
        image
    }

    fn draw_finding(&self, image: &mut RgbImage, finding: &Finding) {
        let color: Rgb<u8> = self.style.color_for(&finding.class_name).into();

        let (w, h) = (image.width() as i64, image.height() as i64);
        let x1 = (finding.bbox.x1 as i64).min(w - 1) as i32;
        let y1 = (finding.bbox.y1 as i64).min(h - 1) as i32;
        let x2 = (finding.bbox.x2 as i64).min(w) as i32;
        let y2 = (finding.bbox.y2 as i64).min(h) as i32;
        if x2 <= x1 || y2 <= y1 {
            return;
        }

        // Nested hollow rectangles thicken the border inward.
        for t in 0..BOX_THICKNESS {
            let width = (x2 - x1) - 2 * t;
            let height = (y2 - y1) - 2 * t;
            if width <= 0 || height <= 0 {
                break;
            }
            let rect = Rect::at(x1 + t, y1 + t).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(image, rect, color);
        }

        self.draw_label(image, finding, color, x1, y1);
    }

    fn draw_label(&self, image: &mut RgbImage, finding: &Finding, color: Rgb<u8>, x1: i32, y1: i32) {
        let label = finding.label();
        let text_w = label.chars().count() as i32 * GLYPH_SIZE * TEXT_SCALE;
        let text_h = GLYPH_SIZE * TEXT_SCALE;
        let bg_w = text_w + 2 * LABEL_PADDING;
        let bg_h = text_h + 2 * LABEL_PADDING;

        // Background sits immediately above the box's top edge, clamped so
        // the label never leaves the canvas.
        let bg_x = x1.max(0);
        let bg_y = (y1 - bg_h).max(0);

        let rect = Rect::at(bg_x, bg_y).of_size(bg_w as u32, bg_h as u32);
        draw_filled_rect_mut(image, rect, color);
        self.draw_text(
            image,
            &label,
            bg_x + LABEL_PADDING,
            bg_y + LABEL_PADDING,
        );
    }

    /// Blit the embedded 8x8 bitmap font, scaled up, clipped to the image.
    fn draw_text(&self, image: &mut RgbImage, text: &str, x: i32, y: i32) {
        let (w, h) = (image.width() as i32, image.height() as i32);
        for (i, ch) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let cx = x + i as i32 * GLYPH_SIZE * TEXT_SCALE;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if *bits & (1u8 << col) == 0 {
                        continue;
                    }
                    for dy in 0..TEXT_SCALE {
                        for dx in 0..TEXT_SCALE {
                            let px = cx + col * TEXT_SCALE + dx;
                            let py = y + row as i32 * TEXT_SCALE + dy;
                            if (0..w).contains(&px) && (0..h).contains(&py) {
                                image.put_pixel(px as u32, py as u32, TEXT_COLOR);
                            }
                        }
                    }
                }
            }
        }
    }
}
