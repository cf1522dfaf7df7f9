use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::name::PackageName;

/// One top-level bucket: a root name and every name nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup {
    root: PackageName,
    members: Vec<PackageName>,
}

impl PackageGroup {
    pub fn root(&self) -> &PackageName {
        &self.root
    }

    /// Root first, then the nested names alphabetically.
    pub fn members(&self) -> &[PackageName] {
        &self.members
    }

    /// Everything but the root.
    pub fn children(&self) -> &[PackageName] {
        &self.members[1..]
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// Top-level groups keyed by root name, in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageGroups {
    groups: BTreeMap<PackageName, PackageGroup>,
}

impl PackageGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, root: &PackageName) -> Option<&PackageGroup> {
        self.groups.get(root)
    }

    pub fn contains_root(&self, root: &PackageName) -> bool {
        self.groups.contains_key(root)
    }

    pub fn roots(&self) -> impl Iterator<Item = &PackageName> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageGroup> {
        self.groups.values()
    }

    /// Total number of names across all groups.
    pub fn total_members(&self) -> usize {
        self.groups.values().map(|g| g.members.len()).sum()
    }
}

impl<'a> IntoIterator for &'a PackageGroups {
    type Item = &'a PackageGroup;
    type IntoIter = std::collections::btree_map::Values<'a, PackageName, PackageGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.values()
    }
}

/// Partition `names` into top-level groups by path prefix.
///
/// `B` is a child of `A` when `B` starts with `A/`. Any name that is a child
/// of some other name is dropped from the key set, even when it prefixes
/// further names itself, so `a`, `a/b`, `a/b/c` collapse into the single
/// group `a` holding all three.
pub fn group_by_prefix(names: &[PackageName]) -> PackageGroups {
    let unique: BTreeSet<&PackageName> = names.iter().collect();

    let mut children: BTreeMap<&PackageName, Vec<&PackageName>> = BTreeMap::new();
    let mut nested: HashSet<&PackageName> = HashSet::new();

    for &parent in &unique {
        for &candidate in &unique {
            if parent.is_parent_of(candidate) {
                children.entry(parent).or_default().push(candidate);
                nested.insert(candidate);
            }
        }
    }

    let groups = unique
        .iter()
        .filter(|name| !nested.contains(*name))
        .map(|&root| {
            let mut members = vec![root.clone()];
            if let Some(kids) = children.get(root) {
                members.extend(kids.iter().map(|&k| k.clone()));
            }
            (
                root.clone(),
                PackageGroup {
                    root: root.clone(),
                    members,
                },
            )
        })
        .collect();

    PackageGroups { groups }
}
