use crate::dependency::{ArtifactCoordinates, DependencyId, DependencySet};
use crate::graph::{ClassGraph, ClassIndex, ClassName};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::{debug, trace};

/// Everything the usage walk needs, built once per run
#[derive(Debug, Clone, Copy)]
pub struct UsageInput<'a> {
    /// The project's own classes
    pub project: &'a ClassIndex,

    /// Classes of every external artifact
    pub external: &'a ClassIndex,

    /// References between all classes
    pub graph: &'a ClassGraph,

    /// External artifact to declared dependency
    pub coordinates: &'a ArtifactCoordinates,

    pub dependencies: &'a DependencySet,
}

impl<'a> UsageInput<'a> {
    /// Declared dependency owning a class, if any
    pub(crate) fn dependency_of(&self, class: &ClassName) -> Option<&'a DependencyId> {
        let artifact = self.external.find_owner(class)?;
        let id = self.coordinates.dependency_of(artifact)?;
        self.dependencies.contains(id).then_some(id)
    }
}

/// Dependency identifier sets produced by one analysis.
///
/// `used_direct ⊆ required ⊆ all`, `used_direct ⊆ direct` and
/// `unused_direct = direct − used_direct`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageResult {
    /// Direct dependencies referenced by project classes
    pub used_direct_dependencies: BTreeSet<DependencyId>,

    /// Declared dependencies reachable from project classes
    pub required_dependencies: BTreeSet<DependencyId>,

    /// Direct dependencies project classes never reference
    pub unused_direct_dependencies: BTreeSet<DependencyId>,

    /// Transitive dependencies project classes reference directly
    pub used_undeclared_dependencies: BTreeSet<DependencyId>,
}

/// Breadth-first reachability from project classes over the class graph
#[derive(Debug, Default, Clone, Copy)]
pub struct DependencyUsageAnalyzer;

impl DependencyUsageAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, input: &UsageInput<'_>) -> UsageResult {
        self.analyze_with_reachable(input).0
    }

    /// Analyze and also return every class reached from the project
    pub fn analyze_with_reachable<'g>(&self, input: &UsageInput<'g>) -> (UsageResult, HashSet<&'g ClassName>) {
        let reachable = self.reachable_classes(input.project, input.graph);
        let mut result = UsageResult::default();

        for class in &reachable {
            if input.project.contains(class) {
                continue;
            }
            if let Some(id) = input.dependency_of(class) {
                result.required_dependencies.insert(id.clone());
            }
        }

        for project_class in input.project.classes() {
            for target in input.graph.referenced_classes(project_class) {
                if input.project.contains(target) {
                    continue;
                }
                let Some(id) = input.dependency_of(target) else {
                    continue;
                };
                if input.dependencies.is_direct(id) {
                    if result.used_direct_dependencies.insert(id.clone()) {
                        trace!("{} uses {} via {}", project_class, id, target);
                    }
                } else {
                    result.used_undeclared_dependencies.insert(id.clone());
                }
            }
        }

        result.unused_direct_dependencies = input
            .dependencies
            .direct()
            .difference(&result.used_direct_dependencies)
            .cloned()
            .collect();

        debug!(
            "Reached {} classes: {} required, {} used direct, {} unused direct",
            reachable.len(),
            result.required_dependencies.len(),
            result.used_direct_dependencies.len(),
            result.unused_direct_dependencies.len()
        );

        (result, reachable)
    }

    /// Every class reachable from the project's classes, project classes included.
    ///
    /// Classes without a node in the graph are leaves.
    pub fn reachable_classes<'g>(&self, project: &ClassIndex, graph: &'g ClassGraph) -> HashSet<&'g ClassName> {
        let mut visited: HashSet<&ClassName> = HashSet::new();
        let mut queue: VecDeque<&ClassName> = VecDeque::new();

        for class in project.classes() {
            let Some(node) = graph.node_index(class) else {
                continue;
            };
            let class = &graph.inner()[node];
            if visited.insert(class) {
                queue.push_back(class);
            }
        }

        while let Some(class) = queue.pop_front() {
            for (target, _) in graph.references_from(class) {
                if visited.insert(target) {
                    queue.push_back(target);
                }
            }
        }

        visited
    }
}
