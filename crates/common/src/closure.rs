use std::collections::HashSet;

use crate::name::PackageName;
use crate::registry::Registry;

/// The packages a cascading delete will remove, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    discovered: Vec<PackageName>,
}

impl DeletionPlan {
    /// Root first, then dependencies as the walk reached them.
    pub fn discovery_order(&self) -> &[PackageName] {
        &self.discovered
    }

    /// Reverse discovery order. This is not a topological order: a package
    /// reachable through two paths is deleted according to where the walk
    /// first found it.
    pub fn deletion_order(&self) -> impl Iterator<Item = &PackageName> {
        self.discovered.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty()
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.discovered.contains(name)
    }
}

/// What a finished cascading delete removed, in deletion order.
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    pub deleted: Vec<PackageName>,
}

#[derive(Debug, thiserror::Error)]
pub enum CascadeError<E: std::error::Error + 'static> {
    #[error("failed to load metadata for {name}: {source}")]
    Metadata {
        name: PackageName,
        #[source]
        source: E,
    },
    #[error("failed to delete {name} after deleting {} package(s): {source}", deleted.len())]
    Delete {
        name: PackageName,
        deleted: Vec<PackageName>,
        #[source]
        source: E,
    },
}

/// Walk the dependency graph from `root`, staying inside `index`.
///
/// One metadata fetch per visited package. Names outside the index are
/// neither fetched nor returned, so a root missing from the index yields an
/// empty plan.
pub async fn resolve_closure<R: Registry>(
    registry: &R,
    root: &PackageName,
    index: &[PackageName],
) -> Result<DeletionPlan, CascadeError<R::Error>> {
    let known: HashSet<&PackageName> = index.iter().collect();
    let mut visited: HashSet<PackageName> = HashSet::new();
    let mut discovered = Vec::new();
    let mut pending = vec![root.clone()];

    while let Some(name) = pending.pop() {
        if visited.contains(&name) {
            continue;
        }
        // Prefer the index's copy so deletes use the registry's own encoding.
        let Some(&indexed) = known.get(&name) else {
            tracing::debug!(package = %name, "skipping dependency outside the package index");
            continue;
        };

        visited.insert(indexed.clone());
        discovered.push(indexed.clone());

        let metadata = registry
            .package_metadata(indexed)
            .await
            .map_err(|source| CascadeError::Metadata {
                name: indexed.clone(),
                source,
            })?;

        pending.extend(metadata.all_dependencies());
    }

    tracing::debug!(root = %root, packages = discovered.len(), "resolved dependency closure");
    Ok(DeletionPlan { discovered })
}

/// Delete every package of an already resolved plan, sequentially.
///
/// The first failing delete stops the run. Nothing is rolled back; the error
/// lists what was already removed.
pub async fn execute_plan<R: Registry>(
    registry: &R,
    plan: &DeletionPlan,
) -> Result<CascadeReport, CascadeError<R::Error>> {
    let mut deleted = Vec::with_capacity(plan.len());

    for name in plan.deletion_order() {
        if let Err(source) = registry.delete_package(name).await {
            return Err(CascadeError::Delete {
                name: name.clone(),
                deleted,
                source,
            });
        }
        tracing::info!(package = %name, "deleted package");
        deleted.push(name.clone());
    }

    Ok(CascadeReport { deleted })
}

/// Resolve the closure of `root` and delete all of it.
pub async fn cascade_delete<R: Registry>(
    registry: &R,
    root: &PackageName,
    index: &[PackageName],
) -> Result<CascadeReport, CascadeError<R::Error>> {
    let plan = resolve_closure(registry, root, index).await?;
    execute_plan(registry, &plan).await
}
