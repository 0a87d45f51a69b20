use dipkit_image::{Image, ImageError};

use crate::{color, parallel};

/// Offsets of the 8 neighbours, clockwise starting at north-west.
const COMPASS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Maximum Kirsch response over the 8 compass rotations of a clockwise neighbourhood.
///
/// For rotation `i` the three neighbours `i, i+1, i+2` weigh 5 and the other five weigh -3,
/// so the response is `|5 * S - 3 * T|`.
pub fn kirsch_response(neighbours: &[f64; 8]) -> f64 {
    let total: f64 = neighbours.iter().sum();
    (0..8)
        .map(|i| {
            let s = neighbours[i] + neighbours[(i + 1) % 8] + neighbours[(i + 2) % 8];
            let t = total - s;
            (5.0 * s - 3.0 * t).abs()
        })
        .fold(0.0, f64::max)
}

/// Kirsch compass edge detector over the HSV value channel.
///
/// Every interior pixel becomes `clamp(255 * response)` in its three colour channels, where
/// the response is computed on values in `[0, 1]`. Border pixels are copied from the source.
/// Alpha is copied.
pub fn kirsch(src: &Image<u8, 4>, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let mut hsv = Image::<f64, 3>::from_size_val(src.size(), 0.0)?;
    color::hsv_from_rgba(src, &mut hsv)?;
    let (width, height) = (src.width(), src.height());

    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            dst_pixel.copy_from_slice(src.pixel(x, y));
            return;
        }
        let mut neighbours = [0.0; 8];
        for (n, (dx, dy)) in neighbours.iter_mut().zip(COMPASS.iter()) {
            let nx = (x as isize + dx) as usize;
            let ny = (y as isize + dy) as usize;
            *n = hsv.pixel(nx, ny)[2];
        }
        let v = color::clamp_u8(kirsch_response(&neighbours) * 255.0);
        dst_pixel.copy_from_slice(&[v, v, v, src.pixel(x, y)[3]]);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use dipkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn flat_neighbourhood_has_no_response() {
        assert_relative_eq!(super::kirsch_response(&[0.5; 8]), 0.0);
    }

    #[test]
    fn response_picks_best_rotation() {
        // bright east side: NE, E, SE
        let n = [0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        assert_relative_eq!(super::kirsch_response(&n), 15.0);
        let n = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.2, 0.0];
        assert_relative_eq!(super::kirsch_response(&n), 1.0);
    }

    #[test]
    fn kirsch_on_step_edge() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let mut data = Vec::new();
        for _ in 0..3 {
            data.extend_from_slice(&[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255, 255]);
        }
        let src = Image::<u8, 4>::new(size, data)?;
        let mut dst = src.clone();
        super::kirsch(&src, &mut dst)?;
        // border untouched
        assert_eq!(dst.pixel(3, 1), &[255, 255, 255, 255]);
        assert_eq!(dst.pixel(0, 1), &[0, 0, 0, 255]);
        // the pixel next to the edge saturates, the one further away sees no edge
        assert_eq!(dst.pixel(2, 1), &[255, 255, 255, 255]);
        assert_eq!(dst.pixel(1, 1), &[0, 0, 0, 255]);
        Ok(())
    }
}
