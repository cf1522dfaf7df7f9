use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::name::PackageName;

/// The parts of a registry package document we rely on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, VersionManifest>,
    #[serde(default, rename = "dist-tags")]
    pub dist_tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: Option<BTreeMap<String, String>>,
}

impl VersionManifest {
    /// Regular and optional dependency names, in that order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .chain(self.optional_dependencies.iter())
            .flat_map(|deps| deps.keys())
            .map(String::as_str)
    }
}

impl PackageMetadata {
    /// Every dependency edge across every published version, duplicates included.
    pub fn all_dependencies(&self) -> Vec<PackageName> {
        self.versions
            .values()
            .flat_map(VersionManifest::dependency_names)
            .map(PackageName::from_display)
            .collect()
    }

    /// The manifest the `latest` tag points at, if both exist.
    pub fn latest(&self) -> Option<(&str, &VersionManifest)> {
        let version = self.dist_tags.get("latest")?;
        self.versions
            .get_key_value(version)
            .map(|(v, manifest)| (v.as_str(), manifest))
    }
}
