use std::fmt::Write;

use common::closure::DeletionPlan;
use common::grouping::PackageGroups;
use common::name::PackageName;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";

/// One node per group root, its nested packages drawn as branches.
pub fn render_tree(groups: &PackageGroups) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}", group.root());
        let children = group.children();
        for (i, child) in children.iter().enumerate() {
            let branch = if i + 1 == children.len() {
                LAST_BRANCH
            } else {
                BRANCH
            };
            let _ = writeln!(out, "{}{}", branch, child);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_flat(names: &[PackageName]) -> String {
    names
        .iter()
        .map(PackageName::display)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The cascade preview, in the order deletes will be issued.
pub fn render_plan(root: &PackageName, plan: &DeletionPlan) -> String {
    let mut out = format!(
        "Deleting {} removes {} package{}:",
        root,
        plan.len(),
        if plan.len() == 1 { "" } else { "s" }
    );
    for (i, name) in plan.deletion_order().enumerate() {
        let _ = write!(out, "\n  {:>3}. {}", i + 1, name);
    }
    out
}
