//! Cycle-safe transitive walks over the dependency graph.

use std::collections::HashSet;

/// Compute the transitive closure reachable from `start`.
///
/// `neighbors` returns the next hop for a given name (dependents when walking
/// down, parents when walking up). Every reachable name is returned exactly
/// once, in depth-first discovery order following the neighbor order.
///
/// `start` itself is only part of the result when a cycle leads back to it.
/// Already visited names are never expanded again, so cyclic graphs terminate.
///
/// # Example
///
/// ```
/// use smart_tests_graph::compute_transitive_closure;
/// use std::collections::HashMap;
///
/// let dependents: HashMap<&str, Vec<&str>> = [
///     ("root", vec!["a", "b"]),
///     ("a", vec!["c"]),
///     ("c", vec!["root"]),
/// ]
/// .into_iter()
/// .collect();
///
/// let closure = compute_transitive_closure("root", |name| {
///     dependents.get(name).cloned().unwrap_or_default()
/// });
/// assert_eq!(closure, vec!["a", "c", "root", "b"]);
/// ```
pub fn compute_transitive_closure<'a, I>(start: &str, neighbors: impl Fn(&str) -> I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut closure = Vec::new();

    let mut frontier: Vec<&'a str> = neighbors(start).into_iter().collect();
    frontier.reverse();

    while let Some(name) = frontier.pop() {
        if !visited.insert(name) {
            continue;
        }
        closure.push(name);

        let mut next: Vec<&'a str> = neighbors(name).into_iter().collect();
        next.reverse();
        frontier.extend(next);
    }

    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn closure_of<'a>(edges: &'a HashMap<&'a str, Vec<&'a str>>, start: &str) -> Vec<&'a str> {
        compute_transitive_closure(start, |name| edges.get(name).cloned().unwrap_or_default())
    }

    #[test]
    fn test_closure_empty() {
        let edges = HashMap::new();
        assert!(closure_of(&edges, "missing").is_empty());
    }

    #[test]
    fn test_closure_chain() {
        let edges: HashMap<&str, Vec<&str>> =
            [("a", vec!["b"]), ("b", vec!["c"])].into_iter().collect();
        assert_eq!(closure_of(&edges, "a"), vec!["b", "c"]);
        assert_eq!(closure_of(&edges, "b"), vec!["c"]);
    }

    #[test]
    fn test_closure_diamond_visits_once() {
        let edges: HashMap<&str, Vec<&str>> = [
            ("root", vec!["left", "right"]),
            ("left", vec!["sink"]),
            ("right", vec!["sink"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(closure_of(&edges, "root"), vec!["left", "sink", "right"]);
    }

    #[test]
    fn test_closure_two_node_cycle_terminates() {
        let edges: HashMap<&str, Vec<&str>> =
            [("a", vec!["b"]), ("b", vec!["a"])].into_iter().collect();
        assert_eq!(closure_of(&edges, "a"), vec!["b", "a"]);
        assert_eq!(closure_of(&edges, "b"), vec!["a", "b"]);
    }

    #[test]
    fn test_closure_self_loop() {
        let edges: HashMap<&str, Vec<&str>> = [("a", vec!["a"])].into_iter().collect();
        assert_eq!(closure_of(&edges, "a"), vec!["a"]);
    }
}
