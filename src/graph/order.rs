//! Topological start order for one root service.

use std::collections::{HashMap, HashSet};

/// Returns the order in which services must start so that `root` comes up
/// with all of its requirements already satisfied.
///
/// Post-order DFS over the requirement edges, then first-occurrence
/// deduplication: every node appears once, after all of its requirements,
/// with `root` last.
pub fn init_order(root: &str, requirements: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut order = Vec::new();
    post_order(root, requirements, &mut order);
    dedup_first_occurrence(order)
}

fn post_order(node: &str, requirements: &HashMap<String, Vec<String>>, order: &mut Vec<String>) {
    for requirement in requirements.get(node).into_iter().flatten() {
        post_order(requirement, requirements, order);
    }
    order.push(node.to_string());
}

fn dedup_first_occurrence(order: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    order.into_iter().filter(|name| seen.insert(name.clone())).collect()
}
