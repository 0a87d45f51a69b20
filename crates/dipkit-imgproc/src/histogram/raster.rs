use dipkit_image::{Image, ImageError, ImageSize};

use super::{Histogram, NUM_LEVELS};
use crate::draw;

/// Width and height of the rendered histogram chart.
pub const HISTOGRAM_RASTER_SIZE: usize = 500;

const MARGIN_LEFT: i64 = 60;
const MARGIN_RIGHT: i64 = 20;
const MARGIN_TOP: i64 = 20;
const MARGIN_BOTTOM: i64 = 30;

const Y_TICKS: u64 = 5;
const X_TICK_STEP: usize = 50;
const TICK_LEN: i64 = 4;

const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const INK: [u8; 4] = [0, 0, 0, 255];

/// Render a histogram as a 500x500 opaque bar chart.
///
/// Bars are scaled linearly against the largest bin. The Y axis carries five labelled ticks
/// from zero to the largest count and the X axis a labelled tick every 50 intensity levels.
pub fn render_histogram(hist: &Histogram, bar_color: [u8; 3]) -> Result<Image<u8, 4>, ImageError> {
    let side = HISTOGRAM_RASTER_SIZE as i64;
    let mut img = Image::<u8, 4>::from_size_pixel(
        ImageSize {
            width: HISTOGRAM_RASTER_SIZE,
            height: HISTOGRAM_RASTER_SIZE,
        },
        BACKGROUND,
    )?;

    let plot_w = side - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = side - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let bar = [bar_color[0], bar_color[1], bar_color[2], 255];
    let max_count = hist.max_count();

    let level_x = |level: usize| MARGIN_LEFT + level as i64 * plot_w / NUM_LEVELS as i64;

    if max_count > 0 {
        for (level, &count) in hist.bins().iter().enumerate() {
            if count == 0 {
                continue;
            }
            let height = (count as f64 / max_count as f64 * plot_h as f64).round() as i64;
            if height == 0 {
                continue;
            }
            let x0 = level_x(level);
            let x1 = (level_x(level + 1) - 1).max(x0);
            draw::draw_filled_rect(&mut img, (x0, baseline - height), (x1, baseline - 1), bar);
        }
    }

    // axes
    draw::draw_line(&mut img, (MARGIN_LEFT - 1, MARGIN_TOP), (MARGIN_LEFT - 1, baseline), INK);
    draw::draw_line(&mut img, (MARGIN_LEFT - 1, baseline), (MARGIN_LEFT + plot_w, baseline), INK);

    for k in 0..Y_TICKS {
        let value = max_count * k / (Y_TICKS - 1);
        let y = baseline - (k as i64 * plot_h) / (Y_TICKS as i64 - 1);
        draw::draw_line(&mut img, (MARGIN_LEFT - 1 - TICK_LEN, y), (MARGIN_LEFT - 1, y), INK);
        let label = value.to_string();
        let x = MARGIN_LEFT - 1 - TICK_LEN - 3 - draw::text_width(&label, 1);
        draw::draw_text(&mut img, &label, (x, y - draw::GLYPH_HEIGHT / 2), 1, INK);
    }

    for level in (0..NUM_LEVELS).step_by(X_TICK_STEP) {
        let x = level_x(level);
        draw::draw_line(&mut img, (x, baseline), (x, baseline + TICK_LEN), INK);
        let label = level.to_string();
        let lx = x - draw::text_width(&label, 1) / 2;
        draw::draw_text(&mut img, &label, (lx, baseline + TICK_LEN + 3), 1, INK);
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_single_bin() -> Result<(), ImageError> {
        let mut bins = [0u64; 256];
        bins[128] = 10;
        bins[0] = 5;
        let img = render_histogram(&Histogram::from_bins(bins), [255, 0, 0])?;
        assert_eq!(img.width(), 500);
        assert_eq!(img.height(), 500);

        let plot_h = 500 - MARGIN_TOP - MARGIN_BOTTOM;
        let x128 = (MARGIN_LEFT + 128 * 420 / 256) as usize;
        // full height bar for the largest bin
        assert_eq!(img.pixel(x128, MARGIN_TOP as usize), &[255, 0, 0, 255]);
        assert_eq!(img.pixel(x128, (MARGIN_TOP + plot_h - 1) as usize), &[255, 0, 0, 255]);
        // half height bar for bin 0
        let x0 = MARGIN_LEFT as usize;
        assert_eq!(img.pixel(x0, (MARGIN_TOP + plot_h / 2 - 2) as usize), &BACKGROUND);
        assert_eq!(img.pixel(x0, (MARGIN_TOP + plot_h / 2 + 2) as usize), &[255, 0, 0, 255]);
        // empty bins stay background
        assert_eq!(img.pixel(x0 + 100, (MARGIN_TOP + plot_h - 1) as usize), &BACKGROUND);
        // x axis
        assert_eq!(img.pixel(300, (MARGIN_TOP + plot_h) as usize), &INK);
        Ok(())
    }

    #[test]
    fn render_empty_histogram() -> Result<(), ImageError> {
        let img = render_histogram(&Histogram::default(), [0, 0, 255])?;
        assert_eq!(img.pixel(250, 100), &BACKGROUND);
        Ok(())
    }
}
