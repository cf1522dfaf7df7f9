use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator between a parent package name and a nested child.
pub const PATH_SEPARATOR: char = '/';

/// A registry package identifier.
///
/// The registry hands names out percent-encoded (`%40scope%2Fpkg`) and expects
/// them back the same way in URL paths, while dependency maps and humans use
/// the readable form (`@scope/pkg`). Both are kept; identity is the readable
/// form, so the two spellings of one package compare equal.
#[derive(Clone)]
pub struct PackageName {
    encoded: String,
    display: String,
}

impl PackageName {
    /// Build from the transport form, as listed by the package index.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        let encoded = encoded.into();
        let display = match urlencoding::decode(&encoded) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => encoded.clone(),
        };
        Self { encoded, display }
    }

    /// Build from the readable form, as found in dependency maps.
    pub fn from_display(display: impl Into<String>) -> Self {
        let display = display.into();
        let encoded = urlencoding::encode(&display).into_owned();
        Self { encoded, display }
    }

    /// Percent-encoded form, safe to embed as a single URL path segment.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Readable form used for matching and output.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// True when `other` is nested directly or transitively under `self`.
    pub fn is_parent_of(&self, other: &PackageName) -> bool {
        other
            .display
            .strip_prefix(self.display.as_str())
            .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    }
}

impl PartialEq for PackageName {
    fn eq(&self, other: &Self) -> bool {
        self.display == other.display
    }
}

impl Eq for PackageName {}

impl Hash for PackageName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display.hash(state);
    }
}

impl PartialOrd for PackageName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display.cmp(&other.display)
    }
}

impl fmt::Debug for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageName({})", self.display)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

// The index endpoint speaks encoded strings, so that is the wire form.
impl Serialize for PackageName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for PackageName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Ok(Self::from_encoded(encoded))
    }
}
