use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::builder;
use crate::digraph::Digraph;
use crate::error::{Error, Result};
use crate::range::Range;
use crate::setset::{SetSet, Universe};
use crate::spec_cycle::CycleSpec;
use crate::spec_degree::DegreeSpec;
use crate::spec_forest::{ForestSpec, TreeSpec};
use crate::spec_path::StPathSpec;

static SHOW_MESSAGES: AtomicBool = AtomicBool::new(false);

/// Toggles builder progress output; returns the previous value.
pub fn show_messages(flag: bool) -> bool {
    SHOW_MESSAGES.swap(flag, Ordering::Relaxed)
}

pub(crate) fn messages_enabled() -> bool {
    SHOW_MESSAGES.load(Ordering::Relaxed)
}

fn check_build(universe: &Universe, graph: &Digraph) -> Result<()> {
    if !graph.is_frozen() {
        return Err(Error::InvalidArgument(
            "the graph must be updated before searching".to_string(),
        ));
    }
    if graph.edge_size() > i16::MAX as usize {
        return Err(Error::InvalidArgument("too many edges".to_string()));
    }
    if universe.num_elems() != graph.edge_size() {
        return Err(Error::UniverseMismatch {
            universe: universe.num_elems(),
            edges: graph.edge_size(),
        });
    }
    Ok(())
}

fn restrict_space(result: SetSet, search_space: Option<&SetSet>) -> SetSet {
    match search_space {
        Some(space) => result.intersect(space),
        None => result,
    }
}

fn lookup(graph: &Digraph, label: &str) -> Result<crate::digraph::VertexNumber> {
    graph
        .vertex(label)
        .ok_or_else(|| Error::ConstraintViolation(format!("{:?} is not a vertex", label)))
}

/// Edge subsets forming exactly one directed simple cycle.
pub fn directed_cycles(
    universe: &Universe,
    graph: &Digraph,
    search_space: Option<&SetSet>,
) -> Result<SetSet> {
    check_build(universe, graph)?;
    let spec = CycleSpec::single(graph);
    Ok(restrict_space(builder::build(universe, &spec)?, search_space))
}

/// Edge subsets forming a directed Hamiltonian cycle.
pub fn directed_hamiltonian_cycles(
    universe: &Universe,
    graph: &Digraph,
    search_space: Option<&SetSet>,
) -> Result<SetSet> {
    check_build(universe, graph)?;
    let spec = CycleSpec::hamiltonian(graph);
    Ok(restrict_space(builder::build(universe, &spec)?, search_space))
}

/// Edge subsets forming one directed simple path from `s` to `t`.
pub fn directed_st_path(
    universe: &Universe,
    graph: &Digraph,
    s: &str,
    t: &str,
    is_hamiltonian: bool,
    search_space: Option<&SetSet>,
) -> Result<SetSet> {
    check_build(universe, graph)?;
    let s = lookup(graph, s)?;
    let t = lookup(graph, t)?;
    if s == t {
        return Err(Error::ConstraintViolation(
            "path endpoints must differ".to_string(),
        ));
    }
    let spec = StPathSpec::new(graph, s, t, is_hamiltonian);
    Ok(restrict_space(builder::build(universe, &spec)?, search_space))
}

/// Edge subsets forming a forest of arborescences. An empty root list
/// leaves the tree sources unconstrained; `is_spanning` requires every
/// non-root vertex to be covered.
pub fn rooted_forests(
    universe: &Universe,
    graph: &Digraph,
    roots: &[&str],
    is_spanning: bool,
    search_space: Option<&SetSet>,
) -> Result<SetSet> {
    check_build(universe, graph)?;
    let roots: Vec<_> = roots
        .iter()
        .map(|r| lookup(graph, r))
        .collect::<Result<_>>()?;
    let spec = ForestSpec::new(graph, &roots, is_spanning);
    Ok(restrict_space(builder::build(universe, &spec)?, search_space))
}

/// Edge subsets forming one arborescence rooted at `root`.
pub fn rooted_trees(
    universe: &Universe,
    graph: &Digraph,
    root: &str,
    is_spanning: bool,
    search_space: Option<&SetSet>,
) -> Result<SetSet> {
    check_build(universe, graph)?;
    let root = lookup(graph, root)?;
    let spec = TreeSpec::new(graph, root, is_spanning);
    Ok(restrict_space(builder::build(universe, &spec)?, search_space))
}

/// Edge subsets whose per-vertex in- and out-degrees lie in the given
/// ranges; vertices absent from a map default to `[0, m]`.
pub fn directed_graphs(
    universe: &Universe,
    graph: &Digraph,
    in_degree_constraints: Option<&BTreeMap<String, Range>>,
    out_degree_constraints: Option<&BTreeMap<String, Range>>,
    search_space: Option<&SetSet>,
) -> Result<SetSet> {
    check_build(universe, graph)?;
    let mut spec = DegreeSpec::new(graph);
    if let Some(cs) = in_degree_constraints {
        for (label, r) in cs {
            let v = graph.vertex(label).ok_or_else(|| {
                Error::InvalidArgument(format!("degree constraint on unknown vertex {:?}", label))
            })?;
            spec.set_in_constraint(v, r.clone());
        }
    }
    if let Some(cs) = out_degree_constraints {
        for (label, r) in cs {
            let v = graph.vertex(label).ok_or_else(|| {
                Error::InvalidArgument(format!("degree constraint on unknown vertex {:?}", label))
            })?;
            spec.set_out_constraint(v, r.clone());
        }
    }
    Ok(restrict_space(builder::build(universe, &spec)?, search_space))
}
