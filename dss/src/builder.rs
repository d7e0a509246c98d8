use common::prelude::*;
use hashbrown::HashMap;

use crate::error::Result;
use crate::graphset::messages_enabled;
use crate::setset::{SetSet, Universe};
use crate::spec::{FrontierSpec, Step};

#[derive(Debug, Clone, Copy)]
enum Child {
    Zero,
    One,
    Next(usize),
}

/// Materializes the family described by a frontier constraint as a ZDD over
/// the universe. The forward sweep walks levels `m` down to 1, keeping one
/// table per level of the reachable states keyed by the state value, so
/// converging paths merge. The backward sweep then emits kernel nodes
/// bottom-up; the kernel's zero-suppression and unique table produce the
/// reduced diagram directly.
pub fn build<S: FrontierSpec>(universe: &Universe, spec: &S) -> Result<SetSet> {
    let (root_state, root_level) = spec.root();
    if root_level == 0 {
        return Ok(universe.empty());
    }

    let mut rows_per_level: Vec<Vec<[Child; 2]>> = Vec::with_capacity(root_level);
    let mut states: Vec<S::State> = vec![root_state];
    for level in (1..=root_level).rev() {
        let mut interned: HashMap<S::State, usize> = HashMap::new();
        let mut next_states: Vec<S::State> = Vec::new();
        let mut rows: Vec<[Child; 2]> = Vec::with_capacity(states.len());
        for state in &states {
            let mut row = [Child::Zero, Child::Zero];
            for (slot, take) in row.iter_mut().zip([false, true]) {
                let mut s = state.clone();
                *slot = match spec.child(&mut s, level, take) {
                    Step::Dead => Child::Zero,
                    Step::Accept => Child::One,
                    Step::Down(_) if level == 1 => Child::Zero,
                    Step::Down(next) => {
                        debug_assert_eq!(next, level - 1);
                        if let Some(&ix) = interned.get(&s) {
                            Child::Next(ix)
                        } else {
                            let ix = next_states.len();
                            next_states.push(s.clone());
                            interned.insert(s, ix);
                            Child::Next(ix)
                        }
                    }
                };
            }
            rows.push(row);
        }
        if messages_enabled() {
            tracing::info!(level, states = states.len(), "frontier sweep");
        }
        rows_per_level.push(rows);
        states = next_states;
    }

    let core = universe.core();
    let mut core = core.borrow_mut();
    let zero = core.mgr.zero();
    let one = core.mgr.one();
    let mut below: Vec<NodeId> = Vec::new();
    for (k, rows) in rows_per_level.iter().enumerate().rev() {
        let level = root_level - k;
        let header = core.elems[level - 1];
        let ids: Vec<NodeId> = rows
            .iter()
            .map(|row| {
                let lo = resolve(row[0], &below, zero, one);
                let hi = resolve(row[1], &below, zero, one);
                core.mgr.create_node(header, lo, hi)
            })
            .collect();
        below = ids;
    }
    let root = below[0];
    drop(core);
    Ok(universe.wrap(root))
}

fn resolve(c: Child, below: &[NodeId], zero: NodeId, one: NodeId) -> NodeId {
    match c {
        Child::Zero => zero,
        Child::One => one,
        Child::Next(i) => below[i],
    }
}
