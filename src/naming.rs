//! Rotated-variant file naming
//!
//! Works out whether an image file name is the "rotated" variant of a texture
//! and what its counterpart is called:
//! - `texture.png` <-> `texture_rotated.png`
//! - `texture.png.001` <-> `texture_rotated.png.001`
//!
//! The numeric suffix (`.001`) is what the host appends to image names when
//! several images share a file name. It is carried through unchanged.
//!
//! Everything here is plain string work. Nothing touches the disk.

use crate::texture::QuarterTurn;

/// Marker placed right before the extension of a rotated image
pub const ROTATED_MARKER: &str = "_rotated";

/// Length of a numeric suffix token: a dot plus three digits
const SUFFIX_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    #[error("no file extension in path `{0}`")]
    InvalidPath(String),

    #[error("numeric suffix would leave an empty name in `{0}`")]
    MalformedSuffix(String),
}

/// Split a trailing `.ddd` token off a file name.
///
/// Returns the name unchanged with `None` when there is no such token.
/// Fails with [`NamingError::MalformedSuffix`] when the token is the whole name.
pub fn split_numeric_suffix(filename: &str) -> Result<(&str, Option<&str>), NamingError> {
    if !filename.ends_with(|c: char| c.is_ascii_digit()) || filename.len() < SUFFIX_LEN {
        return Ok((filename, None));
    }

    let split = filename.len() - SUFFIX_LEN;
    let token = &filename.as_bytes()[split..];
    if token[0] != b'.' || !token[1..].iter().all(u8::is_ascii_digit) {
        return Ok((filename, None));
    }

    if split == 0 {
        return Err(NamingError::MalformedSuffix(filename.to_string()));
    }

    // token is ASCII, so `split` is a char boundary
    Ok((&filename[..split], Some(&filename[split..])))
}

/// A parsed image path.
///
/// `path == directory + stem + marker + extension + numeric_suffix`, where the
/// marker is present only when `is_rotated` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNameInfo {
    path: String,
    directory: String,
    stem: String,
    extension: String,
    numeric_suffix: Option<String>,
    is_rotated: bool,
}

impl ImageNameInfo {
    /// Parse a file path (absolute, relative or host-relative like `//tex/a.png`).
    ///
    /// Both `/` and `\` count as directory separators.
    pub fn parse(path: &str) -> Result<Self, NamingError> {
        let (directory, filename) = match path.rfind(['/', '\\']) {
            Some(sep) => path.split_at(sep + 1),
            None => ("", path),
        };

        // A suffix only counts if a real extension is left behind it.
        // Otherwise `.001` is the extension itself (e.g. `scan.001`).
        let (name, numeric_suffix) = match split_numeric_suffix(filename) {
            Ok((name, Some(suffix))) if name.contains('.') => (name, Some(suffix)),
            _ => (filename, None),
        };

        let dot = name
            .rfind('.')
            .ok_or_else(|| NamingError::InvalidPath(path.to_string()))?;
        let (base, extension) = name.split_at(dot);

        let (stem, is_rotated) = match base.strip_suffix(ROTATED_MARKER) {
            Some(stem) => (stem, true),
            None => (base, false),
        };

        Ok(Self {
            path: path.to_string(),
            directory: directory.to_string(),
            stem: stem.to_string(),
            extension: extension.to_string(),
            numeric_suffix: numeric_suffix.map(str::to_string),
            is_rotated,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Containing folder, including its trailing separator. Empty for bare names.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Dot-inclusive extension (`.png`)
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn numeric_suffix(&self) -> Option<&str> {
        self.numeric_suffix.as_deref()
    }

    pub fn is_rotated(&self) -> bool {
        self.is_rotated
    }

    /// File name as it exists on disk, without the numeric suffix
    pub fn file_name_on_disk(&self) -> String {
        let marker = if self.is_rotated { ROTATED_MARKER } else { "" };
        format!("{}{}{}", self.stem, marker, self.extension)
    }

    /// File name including the numeric suffix, i.e. the host image name
    pub fn file_name(&self) -> String {
        let mut name = self.file_name_on_disk();
        if let Some(suffix) = &self.numeric_suffix {
            name.push_str(suffix);
        }
        name
    }

    /// The same name with the marker flipped
    pub fn counterpart(&self) -> Self {
        let mut other = Self {
            path: String::new(),
            directory: self.directory.clone(),
            stem: self.stem.clone(),
            extension: self.extension.clone(),
            numeric_suffix: self.numeric_suffix.clone(),
            is_rotated: !self.is_rotated,
        };
        other.path = format!("{}{}", other.directory, other.file_name());
        other
    }
}

/// Outcome of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the input already is the rotated variant
    pub is_rotated: bool,
    pub current: ImageNameInfo,
    pub counterpart: ImageNameInfo,
}

impl Resolution {
    /// Counterpart path, numeric suffix included
    pub fn counterpart_path(&self) -> &str {
        self.counterpart.path()
    }

    /// Counterpart image name (file name plus numeric suffix)
    pub fn counterpart_name(&self) -> String {
        self.counterpart.file_name()
    }

    /// Path of the counterpart file on disk
    pub fn counterpart_file(&self) -> String {
        format!(
            "{}{}",
            self.counterpart.directory(),
            self.counterpart.file_name_on_disk()
        )
    }

    /// Turn that produces the counterpart pixels from the current image
    pub fn rotation(&self) -> QuarterTurn {
        if self.is_rotated {
            QuarterTurn::Clockwise
        } else {
            QuarterTurn::CounterClockwise
        }
    }
}

/// Work out the rotation state of `path` and the path of its counterpart.
///
/// Only fails when the file name has no extension.
pub fn resolve(path: &str) -> Result<Resolution, NamingError> {
    let current = ImageNameInfo::parse(path)?;
    let counterpart = current.counterpart();
    Ok(Resolution {
        is_rotated: current.is_rotated(),
        current,
        counterpart,
    })
}
