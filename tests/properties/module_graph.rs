//! Property tests for resolving random module graphs, cycles included.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use crate::common::*;

const MODULES: usize = 8;

fn module_name(i: usize) -> String {
    format!("github.com/org/m{i}")
}

/// Per module: number of releases and the modules each release depends on.
fn module_graph() -> impl Strategy<Value = Vec<(usize, Vec<(usize, bool)>)>> {
    let deps = proptest::collection::vec((0..MODULES, any::<bool>()), 0..4);
    proptest::collection::vec((1usize..4, deps), MODULES)
}

fn registry_for(graph: &[(usize, Vec<(usize, bool)>)]) -> FakeRegistry {
    let mut registry = FakeRegistry::new();
    for (i, (releases, deps)) in graph.iter().enumerate() {
        let names: Vec<(String, &str)> = deps
            .iter()
            .map(|(dep, constrained)| (module_name(*dep), if *constrained { "^1.0.0" } else { "" }))
            .collect();
        let deps: Vec<(&str, &str)> = names.iter().map(|(n, c)| (n.as_str(), *c)).collect();
        for minor in 0..*releases {
            registry = registry.release(&module_name(i), &format!("v1.{minor}.0"), &deps);
        }
    }
    registry
}

/// Modules reachable from `roots` through any release's dependencies.
fn reachable(graph: &[(usize, Vec<(usize, bool)>)], roots: &[usize]) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut stack: Vec<usize> = roots.to_vec();
    while let Some(i) = stack.pop() {
        if seen.insert(module_name(i)) {
            stack.extend(graph[i].1.iter().map(|(dep, _)| *dep));
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: any graph of satisfiable requests resolves, cycles included,
    /// to exactly one version of every reachable module.
    #[test]
    fn property_every_reachable_module_resolves_once(
        graph in module_graph(),
        roots in proptest::collection::vec(0..MODULES, 1..4),
        workers in 1usize..6,
    ) {
        let registry = Arc::new(registry_for(&graph));
        let lockfiles = Arc::new(MemoryLockfiles::default());
        let names: Vec<String> = roots.iter().map(|i| module_name(*i)).collect();
        let requests: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "")).collect();

        let outcome = use_case(&registry, &lockfiles)
            .execute(&root_manifest(&requests), &options().with_concurrency(workers))
            .unwrap();

        let resolved: Vec<String> = outcome.modules.iter().map(|m| m.name().to_string()).collect();
        let unique: BTreeSet<String> = resolved.iter().cloned().collect();
        prop_assert_eq!(unique.len(), resolved.len(), "duplicate module in {:?}", resolved);
        prop_assert_eq!(unique, reachable(&graph, &roots));
    }

    /// PROPERTY: every module resolves to its highest release, since all
    /// requests admit any 1.x version.
    #[test]
    fn property_highest_release_wins(
        graph in module_graph(),
        root in 0..MODULES,
    ) {
        let registry = Arc::new(registry_for(&graph));
        let lockfiles = Arc::new(MemoryLockfiles::default());
        let name = module_name(root);

        let outcome = use_case(&registry, &lockfiles)
            .execute(&root_manifest(&[(name.as_str(), "^1.0.0")]), &options())
            .unwrap();

        for rm in &outcome.modules {
            let index: usize = rm.name().trim_start_matches("github.com/org/m").parse().unwrap();
            let expected = format!("v1.{}.0", graph[index].0 - 1);
            prop_assert_eq!(&rm.module.version().tag, &expected);
        }
    }
}
