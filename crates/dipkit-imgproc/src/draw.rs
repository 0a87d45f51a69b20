use dipkit_image::Image;
use std::cmp::{max, min};

/// Glyphs for the characters `0-9`, `.` and `-`, 3 pixels wide and 5 tall, one row per byte
/// with the most significant of the low three bits on the left.
const GLYPHS: [(char, [u8; 5]); 12] = [
    ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b111, 0b001, 0b111, 0b100, 0b111]),
    ('3', [0b111, 0b001, 0b111, 0b001, 0b111]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b111, 0b001, 0b111]),
    ('6', [0b111, 0b100, 0b111, 0b101, 0b111]),
    ('7', [0b111, 0b001, 0b010, 0b010, 0b010]),
    ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    ('9', [0b111, 0b101, 0b111, 0b001, 0b111]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
];

/// Width in pixels of one glyph cell (glyph plus spacing) at scale 1.
pub const GLYPH_ADVANCE: i64 = 4;

/// Height in pixels of a glyph at scale 1.
pub const GLYPH_HEIGHT: i64 = 5;

/// Helper function to set a pixel's color, handling bounds checking.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        img.pixel_mut(x as usize, y as usize).copy_from_slice(&color);
    }
}

/// Draws a line on an image inplace using a standard Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        set_pixel(img, x0, y0, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a filled rectangle on an image inplace. Both corners are inclusive.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `top_left` - The top-left corner coordinates (x, y).
/// * `bottom_right` - The bottom-right corner coordinates (x, y).
/// * `color` - The fill color.
pub fn draw_filled_rect<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
) {
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;

    for y in min(y0, y1)..=max(y0, y1) {
        for x in min(x0, x1)..=max(x0, x1) {
            set_pixel(img, x, y, color);
        }
    }
}

/// Width in pixels of `text` rendered by [`draw_text`] at the given scale.
pub fn text_width(text: &str, scale: i64) -> i64 {
    (text.chars().count() as i64 * GLYPH_ADVANCE - 1).max(0) * scale
}

/// Draws a numeric label with its top-left corner at `origin`.
///
/// Only digits, `.` and `-` are rendered; other characters leave a blank cell.
pub fn draw_text<const C: usize>(
    img: &mut Image<u8, C>,
    text: &str,
    origin: (i64, i64),
    scale: i64,
    color: [u8; C],
) {
    let (ox, oy) = origin;
    for (i, ch) in text.chars().enumerate() {
        let Some((_, rows)) = GLYPHS.iter().find(|(g, _)| *g == ch) else {
            continue;
        };
        let cell_x = ox + i as i64 * GLYPH_ADVANCE * scale;
        for (r, bits) in rows.iter().enumerate() {
            for c in 0..3 {
                if bits & (0b100 >> c) != 0 {
                    let px = cell_x + c * scale;
                    let py = oy + r as i64 * scale;
                    draw_filled_rect(img, (px, py), (px + scale - 1, py + scale - 1), color);
                }
            }
        }
    }
}
