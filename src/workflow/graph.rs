//! Dependency graph for step execution ordering.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Result, TaskkitError};

/// Represents the dependency relationships between steps.
///
/// Steps keep their declaration order, which is also the tie-break order
/// when several steps become ready at once.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Step names in declaration order.
    steps: Vec<String>,
    /// Map of step name to its direct dependencies.
    dependencies: HashMap<String, Vec<String>>,
    /// Map of step name to steps that depend on it, in declaration order.
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Get the direct dependencies of a step.
    pub fn dependencies_of(&self, step: &str) -> Option<&[String]> {
        self.dependencies.get(step).map(Vec::as_slice)
    }

    /// Get steps that depend on the given step.
    pub fn dependents_of(&self, step: &str) -> Option<&[String]> {
        self.dependents.get(step).map(Vec::as_slice)
    }

    /// Check if a step exists in the graph.
    pub fn contains(&self, step: &str) -> bool {
        self.dependencies.contains_key(step)
    }

    /// Get all step names in declaration order.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Get the number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns steps in topological order (dependencies before dependents).
    ///
    /// Uses Kahn's algorithm with a FIFO ready queue seeded in declaration
    /// order, so the result is deterministic for a given definition.
    ///
    /// Returns an error if a cycle is detected.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        // Count incoming edges for each node
        let mut in_degree: HashMap<&str, usize> = self
            .steps
            .iter()
            .map(|s| {
                (
                    s.as_str(),
                    self.dependencies.get(s).map_or(0, |d| d.len()),
                )
            })
            .collect();

        // Start with nodes that have no dependencies
        let mut queue: VecDeque<&str> = self
            .steps
            .iter()
            .map(String::as_str)
            .filter(|s| in_degree.get(s) == Some(&0))
            .collect();

        let mut result = Vec::with_capacity(self.steps.len());

        while let Some(step) = queue.pop_front() {
            result.push(step.to_string());

            // Reduce in-degree for all dependents
            if let Some(dependents) = self.dependents.get(step) {
                for dependent in dependents {
                    if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(dependent.as_str());
                        }
                    }
                }
            }
        }

        // If we haven't processed all nodes, there's a cycle
        if result.len() != self.steps.len() {
            let cycle = match self.find_cycle() {
                Some(path) => path.join(" -> "),
                None => self
                    .steps
                    .iter()
                    .filter(|s| in_degree.get(s.as_str()).is_some_and(|d| *d > 0))
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            return Err(TaskkitError::CircularDependency { cycle });
        }

        Ok(result)
    }

    /// Find a cycle in the graph, returning the path if one exists.
    ///
    /// The path starts and ends with the same step, e.g. `a -> b -> a`.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        let mut state: HashMap<&str, State> = self
            .steps
            .iter()
            .map(|s| (s.as_str(), State::Unvisited))
            .collect();

        let mut path: Vec<String> = Vec::new();

        fn dfs<'a>(
            node: &'a str,
            graph: &'a DependencyGraph,
            state: &mut HashMap<&'a str, State>,
            path: &mut Vec<String>,
        ) -> Option<Vec<String>> {
            state.insert(node, State::Visiting);
            path.push(node.to_string());

            if let Some(deps) = graph.dependencies.get(node) {
                for dep in deps {
                    match state.get(dep.as_str()) {
                        Some(State::Visiting) => {
                            if let Some(start) = path.iter().position(|s| s == dep) {
                                let mut cycle: Vec<String> = path[start..].to_vec();
                                cycle.push(dep.clone());
                                return Some(cycle);
                            }
                        }
                        Some(State::Unvisited) => {
                            if let Some(cycle) = dfs(dep, graph, state, path) {
                                return Some(cycle);
                            }
                        }
                        Some(State::Visited) | None => {}
                    }
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        for step in &self.steps {
            if state.get(step.as_str()) == Some(&State::Unvisited) {
                if let Some(cycle) = dfs(step, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }
}

/// Builder for constructing a DependencyGraph.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    steps: Vec<(String, Vec<String>)>,
}

impl DependencyGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step with its dependencies.
    pub fn add_step(mut self, name: impl Into<String>, depends_on: Vec<String>) -> Self {
        self.steps.push((name.into(), depends_on));
        self
    }

    /// Build the dependency graph.
    ///
    /// Returns an error if a step name is declared twice or any dependency
    /// references a non-existent step.
    pub fn build(self) -> Result<DependencyGraph> {
        let mut order = Vec::with_capacity(self.steps.len());
        let mut dependencies: HashMap<String, Vec<String>> = HashMap::new();

        for (name, deps) in self.steps {
            if dependencies.contains_key(&name) {
                return Err(TaskkitError::DuplicateStep { name });
            }

            // A dependency listed twice still counts once
            let mut seen = HashSet::new();
            let deps: Vec<String> = deps.into_iter().filter(|d| seen.insert(d.clone())).collect();

            order.push(name.clone());
            dependencies.insert(name, deps);
        }

        // Validate all dependencies exist
        for step in &order {
            for dep in &dependencies[step] {
                if !dependencies.contains_key(dep) {
                    return Err(TaskkitError::UnknownDependency {
                        step: step.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        // Build dependents map (reverse lookup)
        let mut dependents: HashMap<String, Vec<String>> =
            order.iter().map(|s| (s.clone(), Vec::new())).collect();

        for step in &order {
            for dep in &dependencies[step] {
                if let Some(list) = dependents.get_mut(dep) {
                    list.push(step.clone());
                }
            }
        }

        Ok(DependencyGraph {
            steps: order,
            dependencies,
            dependents,
        })
    }
}
