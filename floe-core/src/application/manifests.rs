// floe-core/src/application/manifests.rs

use tracing::debug;

use crate::domain::enforcement::Violation;
use crate::domain::manifest::{Manifest, ManifestMerger};
use crate::domain::registry::PluginRegistry;

/// Resolves every leaf manifest (one that no other manifest names as parent)
/// through its chain and checks plugin references on the result.
///
/// Returns the resolved manifest of the deepest leaf, first by name on ties,
/// and the raw findings of every chain. A conflict between ancestors shared by
/// several leaves is reported once.
pub fn resolve_manifests(manifests: &[Manifest], registry: &PluginRegistry) -> (Option<Manifest>, Vec<Violation>) {
    let mut violations = Vec::new();
    let Some(first) = manifests.first() else {
        return (None, violations);
    };

    let mut leaves: Vec<&Manifest> = manifests
        .iter()
        .filter(|m| !manifests.iter().any(|other| other.parent.as_deref() == Some(m.name.as_str())))
        .collect();
    leaves.sort_by(|a, b| a.name.cmp(&b.name));

    if leaves.is_empty() {
        // Every manifest is somebody's parent, so the graph is a cycle.
        if let Err(v) = ManifestMerger::lineage(manifests, &first.name) {
            violations.push(v);
        }
        return (None, violations);
    }

    let mut selected: Option<Manifest> = None;
    for leaf in leaves {
        let chain: Vec<Manifest> = match ManifestMerger::lineage(manifests, &leaf.name) {
            Ok(chain) => chain.into_iter().cloned().collect(),
            Err(v) => {
                push_unique(&mut violations, [v]);
                continue;
            }
        };

        let (resolved, found) = ManifestMerger::resolve_chain(&chain);
        debug!(leaf = %leaf.name, depth = chain.len(), conflicts = found.len(), "manifest chain resolved");
        push_unique(&mut violations, found);

        if let Some(resolved) = resolved {
            push_unique(&mut violations, registry.validate_manifest(&resolved));
            if selected.as_ref().is_none_or(|s| resolved.scope > s.scope) {
                selected = Some(resolved);
            }
        }
    }

    (selected, violations)
}

fn same_finding(a: &Violation, b: &Violation) -> bool {
    a.code == b.code
        && a.subject == b.subject
        && a.policy_type == b.policy_type
        && a.expected == b.expected
        && a.actual == b.actual
}

fn push_unique(violations: &mut Vec<Violation>, found: impl IntoIterator<Item = Violation>) {
    for v in found {
        if !violations.iter().any(|seen| same_finding(seen, &v)) {
            violations.push(v);
        }
    }
}
