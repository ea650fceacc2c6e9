use image::ImageError;
use std::path::{Path, PathBuf};

/// A quarter turn applied to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterTurn {
    /// 90° clockwise
    Clockwise,
    /// 90° counter-clockwise (270° clockwise)
    CounterClockwise,
}

impl QuarterTurn {
    /// The turn that undoes this one
    pub fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RotateError {
    #[error("source image does not exist: {0}")]
    MissingSource(PathBuf),

    #[error("image error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// Rotate the image at `src` and write the result to `dst`
///
/// The output format follows the extension of `dst`. The parent directory of
/// `dst` must already exist.
pub fn rotate_file(src: &Path, dst: &Path, turn: QuarterTurn) -> Result<(), RotateError> {
    if !src.is_file() {
        return Err(RotateError::MissingSource(src.to_path_buf()));
    }

    let img = image::open(src).map_err(|source| RotateError::Image {
        path: src.to_path_buf(),
        source,
    })?;

    let rotated = match turn {
        QuarterTurn::Clockwise => img.rotate90(),
        QuarterTurn::CounterClockwise => img.rotate270(),
    };

    rotated.save(dst).map_err(|source| RotateError::Image {
        path: dst.to_path_buf(),
        source,
    })?;

    log::debug!(
        "🔄 Rotated {} ({:?}) -> {} ({}x{})",
        src.display(),
        turn,
        dst.display(),
        rotated.width(),
        rotated.height()
    );
    Ok(())
}

/// Read width and height without decoding the pixels
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), RotateError> {
    image::image_dimensions(path).map_err(|source| RotateError::Image {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// 2x1 image: red on the left, blue on the right
    fn write_strip(path: &Path) {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_clockwise_turn() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("strip.png");
        let dst = dir.path().join("strip_rotated.png");
        write_strip(&src);

        rotate_file(&src, &dst, QuarterTurn::Clockwise).unwrap();

        let out = image::open(&dst).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (1, 2));
        // Left edge ends up on top
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(out.get_pixel(0, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_counter_clockwise_turn() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("strip.png");
        let dst = dir.path().join("strip_rotated.png");
        write_strip(&src);

        rotate_file(&src, &dst, QuarterTurn::CounterClockwise).unwrap();

        let out = image::open(&dst).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (1, 2));
        // Right edge ends up on top
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(out.get_pixel(0, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_turn_and_inverse_restore_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("strip.png");
        let mid = dir.path().join("strip_rotated.png");
        let back = dir.path().join("strip_back.png");
        write_strip(&src);

        let turn = QuarterTurn::CounterClockwise;
        rotate_file(&src, &mid, turn).unwrap();
        rotate_file(&mid, &back, turn.inverse()).unwrap();

        let original = image::open(&src).unwrap().to_rgb8();
        let restored = image::open(&back).unwrap().to_rgb8();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = rotate_file(
            &dir.path().join("nope.png"),
            &dir.path().join("nope_rotated.png"),
            QuarterTurn::Clockwise,
        )
        .unwrap_err();
        assert!(matches!(err, RotateError::MissingSource(_)));
    }

    #[test]
    fn test_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("strip.png");
        write_strip(&src);
        assert_eq!(image_dimensions(&src).unwrap(), (2, 1));
    }
}
