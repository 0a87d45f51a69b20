use std::path::Path;

use dipkit_image::{Image, ImageSize};
use image::{ExtendedColorType, ImageFormat, ImageReader};

use crate::error::IoError;

fn check_extension(file_path: &Path) -> Result<(), IoError> {
    if file_path
        .extension()
        .map_or(true, |ext| !ext.eq_ignore_ascii_case("bmp"))
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }
    Ok(())
}

/// Read a BMP image as RGBA.
///
/// Images without an alpha channel get an opaque alpha of 255.
///
/// # Arguments
///
/// * `file_path` - The path to the BMP file.
///
/// # Returns
///
/// A RGBA image with four channels (rgba8).
pub fn read_image_bmp(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    check_extension(file_path)?;

    let img = ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?
        .into_rgba8();

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    log::debug!("read {} ({size})", file_path.display());

    Ok(Image::new(size, img.into_raw())?)
}

/// Write an RGBA image as an uncompressed 24-bit BMP.
///
/// The alpha channel is dropped.
///
/// # Arguments
///
/// * `file_path` - The path of the BMP file to create.
/// * `image` - The image to write.
pub fn write_image_bmp(file_path: impl AsRef<Path>, image: &Image<u8, 4>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    check_extension(file_path)?;

    let rgb: Vec<u8> = image
        .as_slice()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    image::save_buffer_with_format(
        file_path,
        &rgb,
        image.width() as u32,
        image.height() as u32,
        ExtendedColorType::Rgb8,
        ImageFormat::Bmp,
    )
    .map_err(|e| IoError::ImageEncodeError(e.to_string()))?;

    log::debug!("wrote {} ({})", file_path.display(), image.size());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_bmp() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("ramp.bmp");

        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let data = (0..6u8).flat_map(|i| [i * 40, 255 - i, i, 7]).collect();
        let image = Image::<u8, 4>::new(size, data)?;
        write_image_bmp(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {file_path:?}");

        let back = read_image_bmp(&file_path)?;
        assert_eq!(back.size(), size);
        for (a, b) in back.as_slice().chunks_exact(4).zip(image.as_slice().chunks_exact(4)) {
            assert_eq!(&a[..3], &b[..3]);
            assert_eq!(a[3], 255);
        }
        Ok(())
    }

    #[test]
    fn missing_file() {
        let res = read_image_bmp("does/not/exist.bmp");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn wrong_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = Image::<u8, 4>::from_size_val([2, 2].into(), 0)?;
        let res = write_image_bmp(tmp_dir.path().join("out.png"), &image);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }
}
