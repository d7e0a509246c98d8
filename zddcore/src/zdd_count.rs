/// Path counting and weighted extraction over a ZDD.
///
/// `algo_c` counts the 1-paths of a node exactly; `algo_b` extracts a
/// single member optimizing an additive weight; `probability` evaluates the
/// family under independent per-element Bernoulli probabilities. The names
/// follow Knuth's treatment of these routines. Caches are per call and keyed
/// by node identity, which is stable for the lifetime of the manager.
use common::prelude::*;
use num_bigint::BigUint;

use crate::nodes::*;
use crate::zdd::*;

pub fn algo_c(dd: &ZddManager, f: NodeId, cache: &mut DdHashMap<NodeId, BigUint>) -> BigUint {
    if let Some(x) = cache.get(&f) {
        return x.clone();
    }
    let result = match dd.get_node(f).unwrap() {
        Node::Zero | Node::Undet => BigUint::from(0u32),
        Node::One => BigUint::from(1u32),
        Node::NonTerminal(fnode) => {
            let (f0, f1) = (fnode[0], fnode[1]);
            algo_c(dd, f0, cache) + algo_c(dd, f1, cache)
        }
    };
    cache.insert(f, result.clone());
    result
}

/// Returns the member of `f` maximizing the sum of `weights` (indexed by
/// element number minus one), or `None` for the empty family. Ties resolve
/// toward taking the element.
pub fn algo_b(dd: &ZddManager, f: NodeId, weights: &[f64]) -> Option<Vec<ElemId>> {
    let mut cache: DdHashMap<NodeId, Option<f64>> = DdHashMap::default();
    best_value(dd, f, weights, &mut cache)?;
    let mut set = Vec::new();
    let mut cur = f;
    loop {
        match dd.get_node(cur).unwrap() {
            Node::One => break,
            Node::Zero | Node::Undet => unreachable!("extraction entered a dead branch"),
            Node::NonTerminal(fnode) => {
                let (f0, f1) = (fnode[0], fnode[1]);
                let e = dd.level(cur).unwrap();
                let w = weights[e - 1];
                let v0 = cache[&f0];
                let v1 = cache[&f1].map(|x| x + w);
                match (v0, v1) {
                    (Some(a), Some(b)) if a > b => cur = f0,
                    (Some(_), None) => cur = f0,
                    _ => {
                        set.push(e);
                        cur = f1;
                    }
                }
            }
        }
    }
    set.reverse();
    Some(set)
}

fn best_value(
    dd: &ZddManager,
    f: NodeId,
    weights: &[f64],
    cache: &mut DdHashMap<NodeId, Option<f64>>,
) -> Option<f64> {
    if let Some(x) = cache.get(&f) {
        return *x;
    }
    let result = match dd.get_node(f).unwrap() {
        Node::Zero | Node::Undet => None,
        Node::One => Some(0.0),
        Node::NonTerminal(fnode) => {
            let (f0, f1) = (fnode[0], fnode[1]);
            let e = dd.level(f).unwrap();
            let w = weights[e - 1];
            let v0 = best_value(dd, f0, weights, cache);
            let v1 = best_value(dd, f1, weights, cache).map(|x| x + w);
            match (v0, v1) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (None, None) => None,
            }
        }
    };
    cache.insert(f, result);
    result
}

/// The probability that a random subset, drawn with independent element
/// probabilities `p` (indexed by element number minus one), is a member of
/// `f` over the universe of `n` elements.
pub fn probability(dd: &ZddManager, f: NodeId, p: &[f64], n: ElemId) -> f64 {
    let mut cache: DdHashMap<(NodeId, ElemId), f64> = DdHashMap::default();
    prob_rec(dd, f, p, n, &mut cache)
}

fn prob_rec(
    dd: &ZddManager,
    f: NodeId,
    p: &[f64],
    e: ElemId,
    cache: &mut DdHashMap<(NodeId, ElemId), f64>,
) -> f64 {
    if e == 0 {
        return match dd.get_node(f).unwrap() {
            Node::One => 1.0,
            _ => 0.0,
        };
    }
    if f == dd.zero() {
        return 0.0;
    }
    if let Some(x) = cache.get(&(f, e)) {
        return *x;
    }
    let result = match dd.level(f) {
        Some(lf) if lf == e => {
            let (f0, f1) = match dd.get_node(f).unwrap() {
                Node::NonTerminal(fnode) => (fnode[0], fnode[1]),
                _ => unreachable!(),
            };
            p[e - 1] * prob_rec(dd, f1, p, e - 1, cache)
                + (1.0 - p[e - 1]) * prob_rec(dd, f0, p, e - 1, cache)
        }
        // element e is absent from every member below f
        _ => (1.0 - p[e - 1]) * prob_rec(dd, f, p, e - 1, cache),
    };
    cache.insert((f, e), result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_small_family() {
        let mut dd = ZddManager::new();
        let h1 = dd.create_header(1, "x");
        let h2 = dd.create_header(2, "y");
        let x = dd.single(h1);
        let y = dd.single(h2);
        let xy = dd.product(x, y);
        let f = dd.union(x, y);
        let f = dd.union(f, xy);
        let mut cache = DdHashMap::default();
        assert_eq!(algo_c(&dd, f, &mut cache), BigUint::from(3u32));
        assert_eq!(algo_c(&dd, dd.zero(), &mut cache), BigUint::from(0u32));
        assert_eq!(algo_c(&dd, dd.one(), &mut cache), BigUint::from(1u32));
    }

    #[test]
    fn best_member() {
        let mut dd = ZddManager::new();
        let h1 = dd.create_header(1, "x");
        let h2 = dd.create_header(2, "y");
        let x = dd.single(h1);
        let y = dd.single(h2);
        let f = dd.union(x, y);
        let best = algo_b(&dd, f, &[1.0, 5.0]).unwrap();
        assert_eq!(best, vec![2]);
        let best = algo_b(&dd, f, &[5.0, 1.0]).unwrap();
        assert_eq!(best, vec![1]);
        assert!(algo_b(&dd, dd.zero(), &[1.0, 1.0]).is_none());
    }

    #[test]
    fn bernoulli_evaluation() {
        let mut dd = ZddManager::new();
        let h1 = dd.create_header(1, "x");
        let h2 = dd.create_header(2, "y");
        let x = dd.single(h1);
        let y = dd.single(h2);
        let f = dd.union(x, y);
        // P[{x}] + P[{y}] with p = (0.5, 0.25)
        let p = probability(&dd, f, &[0.5, 0.25], 2);
        let expect = 0.5 * 0.75 + 0.5 * 0.25;
        assert!((p - expect).abs() < 1e-12);
        assert_eq!(probability(&dd, dd.one(), &[0.5, 0.25], 2), 0.5 * 0.75);
    }
}
