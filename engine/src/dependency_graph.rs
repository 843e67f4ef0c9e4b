//! The directed graph of cell dependencies: tracks which cells a formula
//! reads (its dependencies) and which cells read it (its dependents),
//! detects cycles, and orders a transitive recompute.
//!
//! TERMINOLOGY:
//! - Dependencies (precedents): cells a formula references. If A3 = A1+A2,
//!   then A1 and A2 are dependencies of A3.
//! - Dependents: the reverse lookup. A3 is a dependent of A1 and of A2.
//!
//! Edges are keyed on `Position`, never on a pointer to the owning Cell —
//! the Sheet owns cells, the graph owns only identifiers.

use std::collections::{HashMap, HashSet, VecDeque};

use parser::Position;

#[derive(Debug, Default)]
pub struct DependencyGraph {
    dependencies: HashMap<Position, HashSet<Position>>,
    dependents: HashMap<Position, HashSet<Position>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        DependencyGraph { dependencies: HashMap::new(), dependents: HashMap::new() }
    }

    /// Replaces `cell`'s dependency set, updating the reverse `dependents`
    /// entries of both the old and new referents. Does not check for
    /// cycles — call `would_create_cycle` first.
    pub fn set_dependencies(&mut self, cell: Position, new_deps: HashSet<Position>) {
        self.clear_dependencies(cell);
        if new_deps.is_empty() {
            return;
        }
        for &dep in &new_deps {
            self.dependents.entry(dep).or_default().insert(cell);
        }
        self.dependencies.insert(cell, new_deps);
    }

    /// Clears `cell`'s outgoing dependency edges (used when a cell
    /// becomes Text/Empty or is removed from the sheet).
    pub fn clear_dependencies(&mut self, cell: Position) {
        if let Some(old_deps) = self.dependencies.remove(&cell) {
            for dep in old_deps {
                if let Some(dependents) = self.dependents.get_mut(&dep) {
                    dependents.remove(&cell);
                    if dependents.is_empty() {
                        self.dependents.remove(&dep);
                    }
                }
            }
        }
    }

    /// Fully removes `cell` from the graph: its own dependency edges and
    /// any dependents pointing at it (used when a cell is cleared from
    /// the sheet entirely).
    pub fn remove_cell(&mut self, cell: Position) {
        self.clear_dependencies(cell);
        self.dependents.remove(&cell);
    }

    pub fn get_dependencies(&self, cell: Position) -> HashSet<Position> {
        self.dependencies.get(&cell).cloned().unwrap_or_default()
    }

    pub fn get_dependents(&self, cell: Position) -> HashSet<Position> {
        self.dependents.get(&cell).cloned().unwrap_or_default()
    }

    /// DFS over the `dependents` relation starting at `start`. Returns the
    /// cycle path (starting and ending at `start`) if `start` is
    /// reachable from one of its own dependents, i.e. setting `start`'s
    /// dependencies as they currently stand in the graph would close a
    /// cycle.
    pub fn find_cycle_through(&self, start: Position) -> Option<Vec<Position>> {
        let mut visiting = HashSet::new();
        let mut path = Vec::new();
        if self.dfs_dependents(start, start, &mut visiting, &mut path) {
            path.push(start);
            Some(path)
        } else {
            None
        }
    }

    fn dfs_dependents(
        &self,
        start: Position,
        current: Position,
        visiting: &mut HashSet<Position>,
        path: &mut Vec<Position>,
    ) -> bool {
        if !visiting.insert(current) {
            return false;
        }
        path.push(current);
        for &next in self.dependents.get(&current).into_iter().flatten() {
            if next == start {
                return true;
            }
            if self.dfs_dependents(start, next, visiting, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// BFS over `dependents`, collecting every cell transitively reachable
    /// from `start` (not including `start` itself).
    pub fn transitive_dependents(&self, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(cell) = queue.pop_front() {
            for &next in self.dependents.get(&cell).into_iter().flatten() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Topologically sorts `subset` by the `dependencies` relation
    /// restricted to edges within the subset, so that every cell appears
    /// after all of its in-subset dependencies (Kahn's algorithm). Cells
    /// with dependencies outside `subset` are treated as having no
    /// in-subset precedent for those edges.
    pub fn topological_order(&self, subset: &HashSet<Position>) -> Vec<Position> {
        let mut in_degree: HashMap<Position, usize> = HashMap::new();
        for &cell in subset {
            let deps_in_subset =
                self.get_dependencies(cell).into_iter().filter(|d| subset.contains(d)).count();
            in_degree.insert(cell, deps_in_subset);
        }

        let mut ready: VecDeque<Position> =
            in_degree.iter().filter(|&(_, &deg)| deg == 0).map(|(&c, _)| c).collect();
        let mut ordered = Vec::with_capacity(subset.len());

        while let Some(cell) = ready.pop_front() {
            ordered.push(cell);
            for &dependent in self.dependents.get(&cell).into_iter().flatten() {
                if !subset.contains(&dependent) {
                    continue;
                }
                if let Some(deg) = in_degree.get_mut(&dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push_back(dependent);
                    }
                }
            }
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(r: i32, c: i32) -> Position {
        Position::new(r, c)
    }

    #[test]
    fn set_dependencies_updates_both_directions() {
        let mut g = DependencyGraph::new();
        g.set_dependencies(p(2, 0), [p(0, 0), p(1, 0)].into_iter().collect());
        assert_eq!(g.get_dependencies(p(2, 0)), [p(0, 0), p(1, 0)].into_iter().collect());
        assert_eq!(g.get_dependents(p(0, 0)), [p(2, 0)].into_iter().collect());
        assert_eq!(g.get_dependents(p(1, 0)), [p(2, 0)].into_iter().collect());
    }

    #[test]
    fn clear_dependencies_removes_reverse_edges() {
        let mut g = DependencyGraph::new();
        g.set_dependencies(p(2, 0), [p(0, 0)].into_iter().collect());
        g.clear_dependencies(p(2, 0));
        assert!(g.get_dependencies(p(2, 0)).is_empty());
        assert!(g.get_dependents(p(0, 0)).is_empty());
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut g = DependencyGraph::new();
        g.set_dependencies(p(0, 0), [p(0, 0)].into_iter().collect());
        assert!(g.find_cycle_through(p(0, 0)).is_some());
    }

    #[test]
    fn transitive_cycle_is_detected() {
        // A1 -> A2 -> A3 -> A1 (A1 depends on A2, A2 on A3, A3 on A1)
        let mut g = DependencyGraph::new();
        g.set_dependencies(p(0, 0), [p(1, 0)].into_iter().collect());
        g.set_dependencies(p(1, 0), [p(2, 0)].into_iter().collect());
        g.set_dependencies(p(2, 0), [p(0, 0)].into_iter().collect());
        assert!(g.find_cycle_through(p(0, 0)).is_some());
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let mut g = DependencyGraph::new();
        g.set_dependencies(p(1, 0), [p(0, 0)].into_iter().collect());
        g.set_dependencies(p(2, 0), [p(1, 0)].into_iter().collect());
        assert!(g.find_cycle_through(p(2, 0)).is_none());
        assert!(g.find_cycle_through(p(0, 0)).is_none());
    }

    #[test]
    fn diamond_topological_order_respects_precedents() {
        // D depends on B and C; B and C depend on A.
        let mut g = DependencyGraph::new();
        let (a, b, c, d) = (p(0, 0), p(1, 0), p(2, 0), p(3, 0));
        g.set_dependencies(b, [a].into_iter().collect());
        g.set_dependencies(c, [a].into_iter().collect());
        g.set_dependencies(d, [b, c].into_iter().collect());

        let subset: HashSet<Position> = [b, c, d].into_iter().collect();
        let order = g.topological_order(&subset);
        let pos = |x: Position| order.iter().position(|&y| y == x).unwrap();
        assert!(pos(b) < pos(d));
        assert!(pos(c) < pos(d));
    }

    #[test]
    fn transitive_dependents_reaches_full_chain() {
        let mut g = DependencyGraph::new();
        let (a, b, c) = (p(0, 0), p(1, 0), p(2, 0));
        g.set_dependencies(b, [a].into_iter().collect());
        g.set_dependencies(c, [b].into_iter().collect());
        assert_eq!(g.transitive_dependents(a), [b, c].into_iter().collect());
    }
}
