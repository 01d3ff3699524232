/// Opaque asset identifier: the asset's project-relative path.
///
/// Ids are compared as plain strings. Nothing here normalises case or
/// separators; enumeration is expected to hand out `/`-separated ids.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Path separator used when splitting an id into folder prefixes.
pub const SEPARATOR: char = '/';

/// Unique key for one asset, stable for its lifetime except on rename.
///
/// Backed by `CompactString` so short paths (the common case) stay
/// inline and cloning an id into both maps is cheap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(CompactString);

impl AssetId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(CompactString::new(id.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lowercased extension after the last `.` of the final segment, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.0
            .rsplit_once(SEPARATOR)
            .map(|(_, name)| name)
            .unwrap_or(self.0.as_str())
    }

    /// Every strict ancestor folder of this id, shallowest first.
    ///
    /// `"Assets/X/A.png"` yields `"Assets"`, `"Assets/X"`. Prefixes are
    /// returned without the trailing separator, matching how folder ids
    /// themselves are spelled.
    pub fn ancestor_folders(&self) -> impl Iterator<Item = &str> {
        let s = self.0.as_str();
        s.match_indices(SEPARATOR)
            .map(move |(pos, _)| &s[..pos])
            .filter(|prefix| !prefix.is_empty())
    }

    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(CompactString::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_are_strict_prefixes() {
        let id = AssetId::new("Assets/X/Sub/A.png");
        let folders: Vec<&str> = id.ancestor_folders().collect();
        assert_eq!(folders, vec!["Assets", "Assets/X", "Assets/X/Sub"]);
    }

    #[test]
    fn top_level_id_has_no_ancestors() {
        let id = AssetId::new("README.md");
        assert_eq!(id.ancestor_folders().count(), 0);
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(AssetId::new("Assets/Main.UNITY").extension().as_deref(), Some("unity"));
        assert_eq!(AssetId::new("Assets/Folder").extension(), None);
        assert_eq!(AssetId::new("Assets/.hidden").extension(), None);
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(AssetId::new("Assets/X/A.png").file_name(), "A.png");
        assert_eq!(AssetId::new("A.png").file_name(), "A.png");
    }
}
