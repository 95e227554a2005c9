use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::{Debug, Formatter},
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError<T>
where
    T: Debug,
{
    #[error("Cycle detected in dependency graph, from {:?}", .0)]
    CycleDetected(DepRoute<T>),
    #[error("Duplicate edge in dependency graph: {:?}", .0)]
    DuplicateEdge(DepRoute<T>),
}

#[derive(PartialEq, Eq)]
pub struct DepRoute<T> {
    // first is the start node, last is the end node
    route: Vec<T>,
}

impl<T> DepRoute<T> {
    pub fn nodes(&self) -> &[T] {
        &self.route
    }
}

impl<T> Debug for DepRoute<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some((last, rest)) = self.route.split_last() else {
            return write!(f, "[]");
        };
        for item in rest {
            write!(f, "{item:?} -> ")?;
        }
        write!(f, "{last:?}")
    }
}

/// Directed dependency graph. An edge `from -> to` means `to` depends on `from`.
#[derive(Debug)]
pub struct Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    edges: BTreeMap<Node, BTreeSet<Node>>,
    dependents_cache: BTreeMap<Node, BTreeSet<Node>>,
}

impl<Node> Default for Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Node> Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
            dependents_cache: BTreeMap::new(),
        }
    }

    pub fn route_to(&mut self, from: Node, to: Node) -> Result<(), TopologyError<Node>> {
        self.dependents_cache.clear();
        self.edges.entry(to).or_default();
        if !self.edges.entry(from).or_default().insert(to) {
            return Err(TopologyError::DuplicateEdge(DepRoute {
                route: vec![from, to],
            }));
        }
        Ok(())
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.edges.keys().copied()
    }

    /// Kahn's algorithm. Ties are broken by node order, so the result is
    /// deterministic.
    pub fn topology_sort(&self) -> Result<Vec<Node>, TopologyError<Node>> {
        let mut in_degree: BTreeMap<Node, usize> = self.edges.keys().map(|n| (*n, 0)).collect();
        for targets in self.edges.values() {
            for to in targets {
                *in_degree.entry(*to).or_default() += 1;
            }
        }

        let mut ready: VecDeque<Node> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for to in self.direct_dependents(node) {
                if let Some(degree) = in_degree.get_mut(&to) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(to);
                    }
                }
            }
        }

        if order.len() == in_degree.len() {
            return Ok(order);
        }

        let remaining: Vec<Node> = in_degree
            .keys()
            .filter(|n| !order.contains(n))
            .copied()
            .collect();
        let route = self.find_cycle(&remaining).unwrap_or(remaining);
        Err(TopologyError::CycleDetected(DepRoute { route }))
    }

    fn find_cycle(&self, nodes: &[Node]) -> Option<Vec<Node>> {
        let mut visited = BTreeSet::new();
        let mut path: Vec<Node> = Vec::new();
        let mut stack: Vec<(Node, std::vec::IntoIter<Node>)> = Vec::new();

        for &start in nodes {
            if !visited.insert(start) {
                continue;
            }
            path.push(start);
            stack.push((start, self.neighbours_within(start, nodes)));

            while let Some((_, neighbours)) = stack.last_mut() {
                match neighbours.next() {
                    Some(next) if path.contains(&next) => {
                        let pos = path.iter().position(|n| *n == next)?;
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(next);
                        return Some(cycle);
                    }
                    Some(next) => {
                        if visited.insert(next) {
                            path.push(next);
                            stack.push((next, self.neighbours_within(next, nodes)));
                        }
                    }
                    None => {
                        stack.pop();
                        path.pop();
                    }
                }
            }
        }
        None
    }

    fn neighbours_within(&self, node: Node, nodes: &[Node]) -> std::vec::IntoIter<Node> {
        self.direct_dependents(node)
            .filter(|n| nodes.contains(n))
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn direct_dependents(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.edges.get(&node).into_iter().flatten().copied()
    }

    /// Every node that transitively depends on `node`.
    pub fn dependents(&mut self, node: Node) -> &BTreeSet<Node> {
        if !self.dependents_cache.contains_key(&node) {
            let collected = self.collect_dependents(node);
            self.dependents_cache.insert(node, collected);
        }
        &self.dependents_cache[&node]
    }

    fn collect_dependents(&self, node: Node) -> BTreeSet<Node> {
        let mut collected = BTreeSet::new();
        let mut queue = VecDeque::from([node]);

        while let Some(current) = queue.pop_front() {
            for to in self.direct_dependents(current) {
                // a cycle cannot loop forever: visited nodes are skipped
                if collected.insert(to) {
                    queue.push_back(to);
                }
            }
        }

        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_sort_orders_dependencies_first() {
        let mut graph = Graph::new();
        graph.route_to(1, 3).unwrap();
        graph.route_to(2, 3).unwrap();
        graph.route_to(3, 4).unwrap();

        let order = graph.topology_sort().unwrap();
        let pos = |n: i32| order.iter().position(|x| *x == n).unwrap();

        assert_eq!(order.len(), 4);
        assert!(pos(1) < pos(3));
        assert!(pos(2) < pos(3));
        assert!(pos(3) < pos(4));
    }

    #[test]
    fn test_cycle_is_reported_with_route() {
        let mut graph = Graph::new();
        graph.route_to(1, 2).unwrap();
        graph.route_to(2, 3).unwrap();
        graph.route_to(3, 1).unwrap();

        let Err(TopologyError::CycleDetected(route)) = graph.topology_sort() else {
            panic!("expected a cycle");
        };
        assert_eq!(route.nodes().first(), route.nodes().last());
        assert_eq!(route.nodes().len(), 4);
    }

    #[test]
    fn test_duplicate_edge_is_rejected() {
        let mut graph = Graph::new();
        graph.route_to('a', 'b').unwrap();
        assert!(matches!(
            graph.route_to('a', 'b'),
            Err(TopologyError::DuplicateEdge(_))
        ));
    }

    #[test]
    fn test_dependents_are_transitive() {
        let mut graph = Graph::new();
        graph.route_to("time", "timer").unwrap();
        graph.route_to("users", "listing").unwrap();
        graph.route_to("listing", "summary").unwrap();

        let dependents: Vec<_> = graph.dependents("users").iter().copied().collect();
        assert_eq!(dependents, vec!["listing", "summary"]);
        assert!(graph.dependents("summary").is_empty());
    }

    #[test]
    fn test_dependents_cache_is_invalidated() {
        let mut graph = Graph::new();
        graph.route_to(1, 2).unwrap();
        assert_eq!(graph.dependents(1).len(), 1);

        graph.route_to(2, 5).unwrap();
        assert_eq!(graph.dependents(1).len(), 2);
    }
}
