//! # Artifact References
//!
//! Turns untrusted `(package_name, filename)` pairs from request paths into
//! validated [`ArtifactRef`]s, and joins them onto the artifact root.
//!
//! ## Path Safety
//!
//! Each segment is checked against an allow-list and rejected outright on
//! any violation. Nothing is normalized, so there is no "clean it up, then
//! check containment" step that could disagree with the filesystem.
//!
//! A valid segment:
//! - is 1 to [`MAX_SEGMENT_LEN`] bytes long,
//! - contains only ASCII `[A-Za-z0-9._+-]`,
//! - does not start with `.`,
//! - does not contain `..`.
//!
//! Separators, null bytes, drive prefixes (`C:`) and the `.`/`..` entries
//! all fail the allow-list, so a joined path is always a direct
//! grandchild of the artifact root.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::StoreError;

/// Maximum length of a single path segment, in bytes.
pub const MAX_SEGMENT_LEN: usize = 255;

/// Extension of binary package artifacts.
pub const BINARY_EXTENSION: &str = "syos";

/// Extension of per-package manifest fragments.
pub const FRAGMENT_EXTENSION: &str = "syfo";

fn validate_segment(field: &str, raw: &str) -> Result<(), StoreError> {
    if raw.is_empty() {
        return Err(StoreError::InvalidRequest(format!("{field} is required")));
    }
    if raw.len() > MAX_SEGMENT_LEN {
        return Err(StoreError::InvalidRequest(format!(
            "{field} too long: {} bytes (max {MAX_SEGMENT_LEN})",
            raw.len()
        )));
    }
    if let Some(c) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-')))
    {
        return Err(StoreError::InvalidRequest(format!(
            "{field} contains invalid character {c:?}: must match [A-Za-z0-9._+-]"
        )));
    }
    if raw.starts_with('.') {
        return Err(StoreError::InvalidRequest(format!(
            "{field} must not start with '.'"
        )));
    }
    if raw.contains("..") {
        return Err(StoreError::InvalidRequest(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PathSegment
// ---------------------------------------------------------------------------

/// A single validated path component.
///
/// The inner value cannot be mutated after construction, so the allow-list
/// invariant holds for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PathSegment(String);

impl PathSegment {
    /// Validate `raw` as a path segment. `field` names the input in the
    /// error message.
    pub fn parse(field: &str, raw: &str) -> Result<Self, StoreError> {
        validate_segment(field, raw)?;
        Ok(Self(raw.to_string()))
    }

    /// The segment as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extension after the last `.`, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for PathSegment {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ArtifactRef
// ---------------------------------------------------------------------------

/// A validated reference to a file in the artifact tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactRef {
    /// Package directory name.
    pub package_name: PathSegment,
    /// File name within the package directory.
    pub filename: PathSegment,
}

impl ArtifactRef {
    /// Validate both segments of an artifact request.
    pub fn parse(package_name: &str, filename: &str) -> Result<Self, StoreError> {
        Ok(Self {
            package_name: PathSegment::parse("package name", package_name)?,
            filename: PathSegment::parse("filename", filename)?,
        })
    }

    /// The storage path of this artifact under `artifact_root`.
    ///
    /// This is the only place artifact paths are constructed.
    pub fn path_in(&self, artifact_root: &Path) -> PathBuf {
        artifact_root.join(&self.package_name).join(&self.filename)
    }

    /// Classify the artifact by its filename extension.
    pub fn content_kind(&self) -> ContentKind {
        ContentKind::from_extension(self.filename.extension())
    }
}

impl std::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.package_name, self.filename)
    }
}

// ---------------------------------------------------------------------------
// ContentKind
// ---------------------------------------------------------------------------

/// What an artifact is, derived from its extension. Lets the transport
/// pick response headers without re-inspecting the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// `.syos`: opaque package payload, delivered as a download.
    BinaryArtifact,
    /// `.syfo`: structured JSON describing a package.
    ManifestFragment,
    /// Any other extension.
    Unknown,
}

impl ContentKind {
    /// Classify an extension (without the leading dot). Case-sensitive.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some(BINARY_EXTENSION) => Self::BinaryArtifact,
            Some(FRAGMENT_EXTENSION) => Self::ManifestFragment,
            _ => Self::Unknown,
        }
    }

    /// MIME type the transport should send.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::BinaryArtifact | Self::Unknown => "application/octet-stream",
            Self::ManifestFragment => "application/json",
        }
    }

    /// Whether the transport should mark the response as an attachment.
    pub fn is_attachment(&self) -> bool {
        matches!(self, Self::BinaryArtifact)
    }

    /// Stable label, used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BinaryArtifact => "binary_artifact",
            Self::ManifestFragment => "manifest_fragment",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An artifact that exists on disk, ready to be streamed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// The validated request.
    pub artifact: ArtifactRef,
    /// Absolute or repo-relative storage path, as joined by [`ArtifactRef::path_in`].
    pub path: PathBuf,
    /// Content classification.
    pub kind: ContentKind,
    /// File size in bytes at resolution time.
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rejected(package: &str, filename: &str) -> bool {
        matches!(
            ArtifactRef::parse(package, filename),
            Err(StoreError::InvalidRequest(_))
        )
    }

    #[test]
    fn accepts_ordinary_names() {
        let r = ArtifactRef::parse("pkg-a", "tool-1.2.0+build.3.syos").unwrap();
        assert_eq!(r.package_name.as_str(), "pkg-a");
        assert_eq!(r.filename.as_str(), "tool-1.2.0+build.3.syos");
        assert_eq!(r.to_string(), "pkg-a/tool-1.2.0+build.3.syos");
    }

    #[test]
    fn rejects_traversal() {
        assert!(rejected("..", "tool.syos"));
        assert!(rejected("pkg-a", ".."));
        assert!(rejected(".", "tool.syos"));
        assert!(rejected("pkg..a", "tool.syos"));
        assert!(rejected("pkg-a", "tool..syos"));
    }

    #[test]
    fn rejects_separators_and_absolute_prefixes() {
        assert!(rejected("pkg/a", "tool.syos"));
        assert!(rejected("pkg-a", "sub/tool.syos"));
        assert!(rejected("pkg\\a", "tool.syos"));
        assert!(rejected("/etc", "passwd"));
        assert!(rejected("pkg-a", "/etc/passwd"));
        assert!(rejected("C:", "tool.syos"));
        assert!(rejected("pkg-a", "C:tool.syos"));
    }

    #[test]
    fn rejects_null_bytes_and_hidden_files() {
        assert!(rejected("pkg\0", "tool.syos"));
        assert!(rejected("pkg-a", "tool.syos\0.txt"));
        assert!(rejected("pkg-a", ".env"));
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(rejected("", "tool.syos"));
        assert!(rejected("pkg-a", ""));
        let max = "a".repeat(MAX_SEGMENT_LEN);
        assert!(ArtifactRef::parse(&max, &max).is_ok());
        let long = "a".repeat(MAX_SEGMENT_LEN + 1);
        assert!(rejected(&long, "tool.syos"));
        assert!(rejected("pkg-a", &long));
    }

    #[test]
    fn rejects_non_ascii() {
        assert!(rejected("pkg-é", "tool.syos"));
        assert!(rejected("pkg-a", "tool syos"));
    }

    #[test]
    fn error_message_names_the_field() {
        let err = ArtifactRef::parse("pkg-a", "../x").unwrap_err();
        assert!(err.to_string().contains("filename"), "got: {err}");
        let err = ArtifactRef::parse("a/b", "x").unwrap_err();
        assert!(err.to_string().contains("package name"), "got: {err}");
    }

    #[test]
    fn path_in_is_a_plain_join() {
        let r = ArtifactRef::parse("pkg-a", "tool.syos").unwrap();
        let root = Path::new("/srv/repo/packages");
        assert_eq!(r.path_in(root), root.join("pkg-a").join("tool.syos"));
    }

    #[test]
    fn classifies_by_extension() {
        let kind = |f: &str| ArtifactRef::parse("p", f).unwrap().content_kind();
        assert_eq!(kind("tool.syos"), ContentKind::BinaryArtifact);
        assert_eq!(kind("tool.syfo"), ContentKind::ManifestFragment);
        assert_eq!(kind("README"), ContentKind::Unknown);
        assert_eq!(kind("tool.SYOS"), ContentKind::Unknown);
        assert_eq!(kind("tool.syos.sig"), ContentKind::Unknown);
    }

    #[test]
    fn content_kind_headers() {
        assert_eq!(ContentKind::BinaryArtifact.content_type(), "application/octet-stream");
        assert!(ContentKind::BinaryArtifact.is_attachment());
        assert_eq!(ContentKind::ManifestFragment.content_type(), "application/json");
        assert!(!ContentKind::ManifestFragment.is_attachment());
        assert!(!ContentKind::Unknown.is_attachment());
    }

    proptest! {
        #[test]
        fn unsafe_input_always_rejected(
            prefix in "[A-Za-z0-9._+-]{0,8}",
            needle in prop::sample::select(vec!["..", "/", "\\", "\0"]),
            suffix in "[A-Za-z0-9._+-]{0,8}",
            in_filename in any::<bool>(),
        ) {
            let bad = format!("{prefix}{needle}{suffix}");
            let result = if in_filename {
                ArtifactRef::parse("pkg-a", &bad)
            } else {
                ArtifactRef::parse(&bad, "tool.syos")
            };
            prop_assert!(matches!(result, Err(StoreError::InvalidRequest(_))));
        }

        #[test]
        fn accepted_segments_stay_below_root(
            package in "[A-Za-z0-9][A-Za-z0-9_+-]{0,16}",
            filename in "[A-Za-z0-9][A-Za-z0-9_+-]{0,16}\\.(syos|syfo)",
        ) {
            let root = Path::new("/srv/repo/packages");
            let r = ArtifactRef::parse(&package, &filename).unwrap();
            let path = r.path_in(root);
            prop_assert!(path.starts_with(root));
            prop_assert_eq!(path.components().count(), root.components().count() + 2);
        }
    }
}
