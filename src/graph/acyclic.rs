//! Cycle detection over the requirement graph.

use std::collections::HashMap;

/// Colour of a node during the DFS.
#[derive(Clone, Copy, PartialEq)]
enum Mark {
    /// On the current descent path.
    InProgress,
    /// Fully explored, known cycle-free.
    Done,
}

/// Returns true when the requirement graph contains no cycle.
///
/// Three-colour DFS from every node; a descent that reaches a node already
/// on the current path has found a cycle.
pub fn is_acyclic(requirements: &HashMap<String, Vec<String>>) -> bool {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    requirements
        .keys()
        .all(|name| visit(name, requirements, &mut marks))
}

fn visit<'a>(
    node: &'a str,
    requirements: &'a HashMap<String, Vec<String>>,
    marks: &mut HashMap<&'a str, Mark>,
) -> bool {
    match marks.get(node) {
        Some(Mark::InProgress) => return false,
        Some(Mark::Done) => return true,
        None => {}
    }

    marks.insert(node, Mark::InProgress);
    for requirement in requirements.get(node).into_iter().flatten() {
        if !visit(requirement, requirements, marks) {
            return false;
        }
    }
    marks.insert(node, Mark::Done);
    true
}
