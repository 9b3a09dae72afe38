//! Archive format identifiers understood by 7-Zip's `-t` switch.

use crate::ArchiverError;
use crate::Result;
use std::path::Path;
use std::str::FromStr;

/// Formats 7-Zip can create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Native 7z archive.
    #[default]
    SevenZ,
    /// ZIP archive.
    Zip,
    /// Uncompressed tar archive.
    Tar,
    /// Gzip stream.
    GZip,
    /// Bzip2 stream.
    BZip2,
    /// XZ stream.
    Xz,
    /// Windows Imaging Format.
    Wim,
}

impl ArchiveFormat {
    /// All formats, in `-t` switch order.
    pub const ALL: [Self; 7] = [
        Self::SevenZ,
        Self::Zip,
        Self::Tar,
        Self::GZip,
        Self::BZip2,
        Self::Xz,
        Self::Wim,
    ];

    /// Returns the identifier passed as `-t<id>`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SevenZ => "7z",
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::GZip => "gzip",
            Self::BZip2 => "bzip2",
            Self::Xz => "xz",
            Self::Wim => "wim",
        }
    }

    /// Detects the format from an output file extension.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the extension is missing or unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use zzshim_core::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_path(Path::new("backup.7z")).unwrap(), ArchiveFormat::SevenZ);
    /// assert_eq!(ArchiveFormat::from_path(Path::new("logs.tar.gz")).unwrap(), ArchiveFormat::GZip);
    /// assert!(ArchiveFormat::from_path(Path::new("notes.txt")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ArchiverError::InvalidFormat(path.display().to_string()))?;

        match extension.to_ascii_lowercase().as_str() {
            "7z" => Ok(Self::SevenZ),
            "zip" | "jar" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            "gz" | "gzip" | "tgz" => Ok(Self::GZip),
            "bz2" | "bzip2" | "tbz" | "tbz2" => Ok(Self::BZip2),
            "xz" | "txz" => Ok(Self::Xz),
            "wim" | "swm" => Ok(Self::Wim),
            other => Err(ArchiverError::InvalidFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveFormat {
    type Err = ArchiverError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "gz" => return Ok(Self::GZip),
            "bz2" => return Ok(Self::BZip2),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == lower)
            .ok_or_else(|| ArchiverError::InvalidFormat(s.to_string()))
    }
}
