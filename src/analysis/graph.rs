//! Dependency graph over interned file paths.
//!
//! Paths are interned to indices and edges stored as adjacency lists, so
//! cyclic dependency data never turns into cyclic object graphs. Cycle
//! detection is an iterative depth-first search with explicit stacks;
//! recursion depth stays constant no matter how deep the project nests.

use std::collections::HashMap;

pub struct DependencyGraph {
    paths: Vec<String>,
    edges: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build from a node list and (from, to) edge pairs. Node order is
    /// preserved; callers pass path-sorted nodes to make traversal (and so
    /// cycle reporting) deterministic. Edges touching unknown nodes are
    /// dropped.
    pub fn build<'a, N, E>(nodes: N, edge_pairs: E) -> Self
    where
        N: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let paths: Vec<String> = nodes.into_iter().map(str::to_string).collect();
        let index: HashMap<&str, usize> = paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        let mut edges = vec![Vec::new(); paths.len()];
        for (from, to) in edge_pairs {
            if let (Some(&f), Some(&t)) = (index.get(from), index.get(to)) {
                edges[f].push(t);
            }
        }
        for list in &mut edges {
            list.sort_unstable();
            list.dedup();
        }

        Self { paths, edges }
    }

    /// Every cycle in the graph: strongly connected components of size two
    /// or more, plus self-loops. Members come back in discovery order with
    /// the first-discovered node first; cycles are ordered by discovery of
    /// their first member.
    pub fn cycles(&self) -> Vec<Vec<&str>> {
        let n = self.paths.len();
        const UNVISITED: usize = usize::MAX;

        let mut discovery = vec![UNVISITED; n];
        let mut low = vec![0usize; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut next = 0usize;
        let mut components: Vec<Vec<usize>> = Vec::new();

        for start in 0..n {
            if discovery[start] != UNVISITED {
                continue;
            }

            // (node, next child offset) frames instead of recursion
            let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
            loop {
                let Some(&(v, child)) = frames.last() else {
                    break;
                };

                if child == 0 {
                    discovery[v] = next;
                    low[v] = next;
                    next += 1;
                    stack.push(v);
                    on_stack[v] = true;
                }

                if child < self.edges[v].len() {
                    frames.last_mut().expect("frame just read").1 += 1;
                    let w = self.edges[v][child];
                    if discovery[w] == UNVISITED {
                        frames.push((w, 0));
                    } else if on_stack[w] {
                        low[v] = low[v].min(discovery[w]);
                    }
                    continue;
                }

                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    low[parent] = low[parent].min(low[v]);
                }

                if low[v] == discovery[v] {
                    let mut component = Vec::new();
                    loop {
                        let w = stack.pop().expect("component root still on stack");
                        on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    component.reverse();
                    let is_cycle =
                        component.len() >= 2 || self.edges[v].contains(&v);
                    if is_cycle {
                        components.push(component);
                    }
                }
            }
        }

        components.sort_by_key(|component| discovery[component[0]]);
        components
            .into_iter()
            .map(|component| {
                component
                    .into_iter()
                    .map(|i| self.paths[i].as_str())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        DependencyGraph::build(nodes.iter().copied(), edges.iter().copied())
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(g.cycles().is_empty());
    }

    #[test]
    fn test_three_node_cycle_reported_once() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycles = g.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a", "b", "c"]);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let g = graph(&["a", "b"], &[("a", "a")]);
        let cycles = g.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a"]);
    }

    #[test]
    fn test_two_disjoint_cycles() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
        );
        let cycles = g.cycles();
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0], vec!["a", "b"]);
        assert_eq!(cycles[1], vec!["c", "d"]);
    }

    #[test]
    fn test_shared_node_between_paths_is_not_doubled() {
        // a -> b -> c -> a with a side chain d -> b: one SCC, one cycle
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("d", "b")],
        );
        assert_eq!(g.cycles().len(), 1);
    }

    #[test]
    fn test_edges_to_unknown_nodes_are_dropped() {
        let g = graph(&["a"], &[("a", "ghost"), ("ghost", "a")]);
        assert!(g.cycles().is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let names: Vec<String> = (0..20_000).map(|i| format!("f{i:05}")).collect();
        let nodes: Vec<&str> = names.iter().map(String::as_str).collect();
        let edges: Vec<(&str, &str)> = nodes.windows(2).map(|w| (w[0], w[1])).collect();
        let g = DependencyGraph::build(nodes.iter().copied(), edges.iter().copied());
        assert!(g.cycles().is_empty());
    }
}
