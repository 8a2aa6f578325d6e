//! The include graph of one translation unit.
//!
//! Every traversal is breadth-first over a visited set, so cyclic graphs
//! (`a.h` including itself, `a.h -> b.h -> a.h`) always terminate.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use crate::base::IncludeName;
use crate::hir::IncludeDirective;

/// Answers "how far is `to` from `from`" in include hops.
pub trait Reachability {
    /// `Some(0)` when `from == to`, `None` when `to` is not reachable.
    fn distance(&self, from: &IncludeName, to: &IncludeName) -> Option<usize>;

    fn reaches(&self, from: &IncludeName, to: &IncludeName) -> bool {
        self.distance(from, to).is_some()
    }
}

/// Directed graph of `#include` directives in discovery order.
#[derive(Clone, Debug, Default)]
pub struct IncludeGraph {
    edges: IndexMap<IncludeName, Vec<IncludeDirective>>,
    files: IndexSet<IncludeName>,
}

impl IncludeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, directive: IncludeDirective) {
        self.files.insert(directive.includer.clone());
        self.files.insert(directive.included.clone());
        self.edges
            .entry(directive.includer.clone())
            .or_default()
            .push(directive);
    }

    /// Every file seen as includer or included, in discovery order.
    pub fn files(&self) -> impl Iterator<Item = &IncludeName> {
        self.files.iter()
    }

    pub fn contains(&self, file: &IncludeName) -> bool {
        self.files.contains(file)
    }

    /// Include directives written in `file`, in source order.
    pub fn direct_includes(&self, file: &IncludeName) -> &[IncludeDirective] {
        self.edges.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn includes_directly(&self, includer: &IncludeName, included: &IncludeName) -> bool {
        self.direct_includes(includer)
            .iter()
            .any(|d| &d.included == included)
    }

    fn successors<'a>(&'a self, file: &IncludeName) -> impl Iterator<Item = &'a IncludeName> {
        self.direct_includes(file).iter().map(|d| &d.included)
    }

    /// Hop distance from `file` to everything it reaches, itself at 0.
    pub fn distances_from(&self, file: &IncludeName) -> FxHashMap<IncludeName, usize> {
        let mut distances = FxHashMap::default();
        distances.insert(file.clone(), 0);
        let mut queue = VecDeque::from([file.clone()]);
        while let Some(current) = queue.pop_front() {
            let next_distance = distances[&current] + 1;
            for next in self.successors(&current) {
                if !distances.contains_key(next) {
                    distances.insert(next.clone(), next_distance);
                    queue.push_back(next.clone());
                }
            }
        }
        distances
    }

    /// Files `file` includes directly or indirectly. Contains `file` itself
    /// only when it sits on a cycle.
    pub fn transitive_includes(&self, file: &IncludeName) -> IndexSet<IncludeName> {
        let mut seen = IndexSet::new();
        let mut queue: VecDeque<&IncludeName> = self.successors(file).collect();
        while let Some(current) = queue.pop_front() {
            if seen.insert(current.clone()) {
                queue.extend(self.successors(current));
            }
        }
        seen
    }

    /// A path `file -> ... -> file` if `file` transitively includes itself.
    pub fn find_cycle(&self, file: &IncludeName) -> Option<Vec<IncludeName>> {
        let mut parent: FxHashMap<&IncludeName, &IncludeName> = FxHashMap::default();
        let mut seen: IndexSet<&IncludeName> = IndexSet::new();
        let mut queue = VecDeque::from([file]);
        while let Some(current) = queue.pop_front() {
            for next in self.successors(current) {
                if next == file {
                    let mut middle = Vec::new();
                    let mut step = current;
                    while step != file {
                        middle.push(step.clone());
                        step = parent[step];
                    }
                    middle.reverse();
                    let mut path = vec![file.clone()];
                    path.extend(middle);
                    path.push(file.clone());
                    return Some(path);
                }
                if seen.insert(next) {
                    parent.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

impl Reachability for IncludeGraph {
    fn distance(&self, from: &IncludeName, to: &IncludeName) -> Option<usize> {
        self.distances_from(from).get(to).copied()
    }
}

/// Transitive closures over one graph, each computed on first request.
#[derive(Debug)]
pub struct ClosureCache<'a> {
    graph: &'a IncludeGraph,
    closures: FxHashMap<IncludeName, IndexSet<IncludeName>>,
}

impl<'a> ClosureCache<'a> {
    pub fn new(graph: &'a IncludeGraph) -> Self {
        Self {
            graph,
            closures: FxHashMap::default(),
        }
    }

    pub fn closure(&mut self, file: &IncludeName) -> &IndexSet<IncludeName> {
        let graph = self.graph;
        self.closures
            .entry(file.clone())
            .or_insert_with(|| graph.transitive_includes(file))
    }

    /// Same answer as [`Reachability::reaches`] on the graph.
    pub fn reaches(&mut self, from: &IncludeName, to: &IncludeName) -> bool {
        from == to || self.closure(from).contains(to)
    }

    /// Number of closures computed so far.
    pub fn len(&self) -> usize {
        self.closures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }
}

/// Distances from one file, computed once.
#[derive(Clone, Debug)]
pub struct DistanceMap {
    origin: IncludeName,
    distances: FxHashMap<IncludeName, usize>,
}

impl DistanceMap {
    pub fn new(graph: &IncludeGraph, origin: &IncludeName) -> Self {
        Self {
            origin: origin.clone(),
            distances: graph.distances_from(origin),
        }
    }
}

impl Reachability for DistanceMap {
    fn distance(&self, from: &IncludeName, to: &IncludeName) -> Option<usize> {
        if from == &self.origin {
            self.distances.get(to).copied()
        } else {
            None
        }
    }
}
