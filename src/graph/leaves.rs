//! Frontier selection: which services to act on next.
//!
//! The supervisor never starts or stops a whole subtree at once. Each
//! dispatch acts on a *frontier* and waits for the resulting state events
//! before computing the next one:
//!
//! - stopping works bottom-up: [`enabled_leaves_from`] yields the active
//!   services whose own requirements are all inactive already;
//! - starting works the same direction: [`disabled_leaves_from`] yields the
//!   inactive services whose requirements are all running.

use std::collections::{HashMap, HashSet};

use crate::service::ServiceState;

fn is_active(states: &HashMap<String, ServiceState>, name: &str) -> bool {
    states.get(name).is_some_and(ServiceState::is_active)
}

/// The frontier of active services safe to stop next on the way to stopping
/// `root`.
///
/// Memoised DFS: an inactive node roots a fully-disabled subtree; an active
/// node is a leaf exactly when every one of its requirements roots a
/// fully-disabled subtree. Sorted by name.
pub fn enabled_leaves_from(
    root: &str,
    states: &HashMap<String, ServiceState>,
    requirements: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    let mut memo = HashMap::new();
    let mut leaves = Vec::new();
    fully_disabled(root, states, requirements, &mut memo, &mut leaves);
    leaves.sort_unstable();
    leaves
}

/// The stop frontier of the whole system: the same recursion run from every
/// registered name, sharing one memo table. Drives `Close`.
pub fn enabled_leaves(
    states: &HashMap<String, ServiceState>,
    requirements: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    let mut memo = HashMap::new();
    let mut leaves = Vec::new();
    for name in states.keys() {
        fully_disabled(name, states, requirements, &mut memo, &mut leaves);
    }
    leaves.sort_unstable();
    leaves
}

/// Returns true when nothing in the subtree under `node` is active.
///
/// Side effect: appends active nodes whose requirements are all fully
/// disabled to `leaves`, each at most once thanks to the memo.
fn fully_disabled<'a>(
    node: &'a str,
    states: &'a HashMap<String, ServiceState>,
    requirements: &'a HashMap<String, Vec<String>>,
    memo: &mut HashMap<&'a str, bool>,
    leaves: &mut Vec<String>,
) -> bool {
    if let Some(&disabled) = memo.get(node) {
        return disabled;
    }

    if !is_active(states, node) {
        memo.insert(node, true);
        return true;
    }

    let mut requirements_disabled = true;
    for requirement in requirements.get(node).into_iter().flatten() {
        if !fully_disabled(requirement, states, requirements, memo, leaves) {
            requirements_disabled = false;
        }
    }
    if requirements_disabled {
        leaves.push(node.to_string());
    }

    memo.insert(node, false);
    false
}

/// The frontier of inactive services safe to start next on the way to
/// starting `root`.
///
/// Dual recursion: a running node is satisfied; any other node is a
/// startable leaf exactly when every one of its requirements is satisfied.
/// Sorted by name.
///
/// A `Started` node is not yet satisfied, so it stays on the frontier until
/// its `Running` event arrives; the supervisor's changed-set keeps it from
/// being dispatched twice within one command.
pub fn disabled_leaves_from(
    root: &str,
    states: &HashMap<String, ServiceState>,
    requirements: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    let mut memo = HashMap::new();
    let mut leaves = Vec::new();
    satisfied(root, states, requirements, &mut memo, &mut leaves);
    leaves.sort_unstable();
    leaves
}

/// Returns true when `node` is running.
///
/// Side effect: appends non-running nodes whose requirements are all
/// running to `leaves`.
fn satisfied<'a>(
    node: &'a str,
    states: &'a HashMap<String, ServiceState>,
    requirements: &'a HashMap<String, Vec<String>>,
    memo: &mut HashMap<&'a str, bool>,
    leaves: &mut Vec<String>,
) -> bool {
    if let Some(&running) = memo.get(node) {
        return running;
    }

    if matches!(states.get(node), Some(ServiceState::Running)) {
        memo.insert(node, true);
        return true;
    }

    let mut requirements_satisfied = true;
    for requirement in requirements.get(node).into_iter().flatten() {
        if !satisfied(requirement, states, requirements, memo, leaves) {
            requirements_satisfied = false;
        }
    }
    if requirements_satisfied {
        leaves.push(node.to_string());
    }

    memo.insert(node, false);
    false
}

/// Active services that no other active service requires.
///
/// These root the active subtrees, so they are the safe first targets when
/// draining the system top-down. Sorted by name.
pub fn orphaned_active(
    states: &HashMap<String, ServiceState>,
    requirements: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    let mut orphans: HashSet<&str> = states
        .iter()
        .filter(|(_, state)| state.is_active())
        .map(|(name, _)| name.as_str())
        .collect();

    for (name, state) in states {
        if !state.is_active() {
            continue;
        }
        for requirement in requirements.get(name).into_iter().flatten() {
            orphans.remove(requirement.as_str());
        }
    }

    let mut orphans: Vec<String> = orphans.into_iter().map(str::to_string).collect();
    orphans.sort_unstable();
    orphans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::{requirements, states};
    use crate::service::ServiceState::{Dead, Finished, Running, Started};

    #[test]
    fn stop_frontier_is_the_bottom_of_the_active_subtree() {
        let req = requirements(&[("s", &["a", "b"]), ("a", &["c"]), ("b", &["c"])]);
        let st = states(&[("s", Running), ("a", Running), ("b", Running), ("c", Running)]);
        assert_eq!(enabled_leaves_from("s", &st, &req), ["c"]);
    }

    #[test]
    fn stop_frontier_climbs_as_requirements_die() {
        let req = requirements(&[("b", &["a"])]);

        let st = states(&[("a", Running), ("b", Running)]);
        assert_eq!(enabled_leaves_from("b", &st, &req), ["a"]);

        let st = states(&[("a", Finished), ("b", Running)]);
        assert_eq!(enabled_leaves_from("b", &st, &req), ["b"]);
    }

    #[test]
    fn inactive_root_has_no_stop_frontier() {
        let req = requirements(&[("b", &["a"])]);
        let st = states(&[("a", Running), ("b", Dead)]);
        assert!(enabled_leaves_from("b", &st, &req).is_empty());
    }

    #[test]
    fn global_stop_frontier_covers_disjoint_roots() {
        let req = requirements(&[("b", &["a"])]);
        let st = states(&[("a", Running), ("b", Running), ("c", Running)]);
        assert_eq!(enabled_leaves(&st, &req), ["a", "c"]);
    }

    #[test]
    fn global_stop_frontier_empty_when_nothing_active() {
        let req = requirements(&[("b", &["a"])]);
        let st = states(&[("a", Finished), ("b", Dead), ("c", Finished)]);
        assert!(enabled_leaves(&st, &req).is_empty());
    }

    #[test]
    fn start_frontier_begins_at_unmet_requirements() {
        let req = requirements(&[("b", &["a"])]);
        let st = states(&[("a", Dead), ("b", Dead)]);
        assert_eq!(disabled_leaves_from("b", &st, &req), ["a"]);
    }

    #[test]
    fn start_frontier_advances_once_requirement_runs() {
        let req = requirements(&[("b", &["a"])]);
        let st = states(&[("a", Running), ("b", Dead)]);
        assert_eq!(disabled_leaves_from("b", &st, &req), ["b"]);
    }

    #[test]
    fn started_requirement_is_not_yet_satisfied() {
        let req = requirements(&[("b", &["a"])]);
        let st = states(&[("a", Started), ("b", Dead)]);
        assert_eq!(disabled_leaves_from("b", &st, &req), ["a"]);
    }

    #[test]
    fn running_root_has_no_start_frontier() {
        let req = requirements(&[("b", &["a"])]);
        let st = states(&[("a", Running), ("b", Running)]);
        assert!(disabled_leaves_from("b", &st, &req).is_empty());
    }

    #[test]
    fn diamond_start_frontier_names_shared_requirement_once() {
        let req = requirements(&[("s", &["a", "b"]), ("a", &["c"]), ("b", &["c"])]);
        let st = states(&[("s", Dead), ("a", Dead), ("b", Dead), ("c", Dead)]);
        assert_eq!(disabled_leaves_from("s", &st, &req), ["c"]);
    }

    #[test]
    fn orphans_with_active_dependents_excluded() {
        let req = requirements(&[("a", &["b", "c"])]);
        let st = states(&[("a", Running), ("b", Running), ("d", Running)]);
        assert_eq!(orphaned_active(&st, &req), ["a", "d"]);
    }

    #[test]
    fn orphans_when_dependent_is_inactive() {
        let req = requirements(&[("a", &["b", "c"])]);
        let st = states(&[("c", Started), ("b", Running), ("d", Running)]);
        assert_eq!(orphaned_active(&st, &req), ["b", "c", "d"]);
    }
}
