use common::prelude::*;

use crate::error::{Error, Result};

/// 1-based vertex number, assigned to labels in order of first appearance.
pub type VertexNumber = u16;

/// A directed graph with an ordered edge list. Once `update` has been
/// called the structure is immutable; the frontier precomputation and every
/// search depend on that.
#[derive(Debug, Default)]
pub struct Digraph {
    labels: Vec<String>,
    index: DdHashMap<String, VertexNumber>,
    edges: Vec<(VertexNumber, VertexNumber)>,
    frozen: bool,
}

impl Digraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and freezes a graph from label pairs.
    pub fn from_edges<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut g = Self::new();
        for (u, v) in pairs {
            g.add_edge(u.as_ref(), v.as_ref())?;
        }
        g.update();
        Ok(g)
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<()> {
        if self.frozen {
            return Err(Error::InvalidArgument(
                "no edges can be added after update".to_string(),
            ));
        }
        let u = self.intern(from)?;
        let v = self.intern(to)?;
        self.edges.push((u, v));
        Ok(())
    }

    fn intern(&mut self, label: &str) -> Result<VertexNumber> {
        if label.contains(',') {
            return Err(Error::InvalidArgument(format!(
                "vertex label {:?} contains a comma",
                label
            )));
        }
        if let Some(&v) = self.index.get(label) {
            return Ok(v);
        }
        let next = self.labels.len() + 1;
        if next > i16::MAX as usize {
            return Err(Error::InvalidArgument("too many vertices".to_string()));
        }
        let v = next as VertexNumber;
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), v);
        Ok(v)
    }

    /// Freezes the graph.
    pub fn update(&mut self) {
        self.frozen = true;
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn vertex(&self, label: &str) -> Option<VertexNumber> {
        self.index.get(label).copied()
    }

    pub fn vertex_label(&self, v: VertexNumber) -> &str {
        &self.labels[v as usize - 1]
    }

    #[inline]
    pub fn vertex_size(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn edge_size(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn edge(&self, i: usize) -> (VertexNumber, VertexNumber) {
        self.edges[i]
    }

    /// The ZDD element bound to edge index `i`. The first edge gets the
    /// highest element so that the variable order follows the edge order.
    #[inline]
    pub fn edge_elem(&self, i: usize) -> ElemId {
        self.edges.len() - i
    }
}
