//! File identity strings.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Prefix the host uses for local files addressed as URIs.
const FILE_SCHEME: &str = "file://";

/// String identifying a playable resource: a filesystem path or a URI.
///
/// Two identities are equal iff their strings are byte-for-byte equal. No
/// normalization, symlink resolution or case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileIdentity(CompactString);

impl FileIdentity {
    /// Create an identity from any string-like value.
    pub fn new(value: impl Into<CompactString>) -> Self {
        Self(value.into())
    }

    /// Create an identity from a filesystem path.
    ///
    /// Returns `None` for paths that are not valid UTF-8, since the host
    /// addresses tracks by UTF-8 strings.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.to_str().map(Self::new)
    }

    /// Get the identity as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Get the URI scheme (`http`, `file`, ...) if the identity has one.
    pub fn scheme(&self) -> Option<&str> {
        let (scheme, _) = self.0.split_once("://")?;
        let valid = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        valid.then_some(scheme)
    }

    /// Check whether this identity names a local file rather than a stream.
    pub fn is_local(&self) -> bool {
        match self.scheme() {
            Some(scheme) => scheme.eq_ignore_ascii_case("file"),
            None => true,
        }
    }

    /// Get the filesystem path for a local identity.
    ///
    /// A leading `file://` is stripped and the rest percent-decoded. Plain
    /// paths are returned as stored. Remote identities have no path.
    pub fn local_path(&self) -> Option<Cow<'_, Path>> {
        if !self.is_local() {
            return None;
        }
        let s = self.as_str();
        let path = match s.get(..FILE_SCHEME.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(FILE_SCHEME) => {
                let encoded = &s[FILE_SCHEME.len()..];
                match urlencoding::decode(encoded) {
                    Ok(Cow::Owned(decoded)) => Cow::Owned(PathBuf::from(decoded)),
                    // Nothing escaped, or the escapes are not UTF-8.
                    Ok(Cow::Borrowed(_)) | Err(_) => Cow::Borrowed(Path::new(encoded)),
                }
            }
            _ => Cow::Borrowed(Path::new(s)),
        };
        Some(path)
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for FileIdentity {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for FileIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FileIdentity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
