use std::collections::BTreeSet;

use zddcore::prelude::*;

type Family = BTreeSet<BTreeSet<usize>>;

/// Enumerates the members of the family rooted at `f`.
fn collect(dd: &ZddManager, f: NodeId) -> Family {
    let mut out = Family::new();
    let mut stack = vec![(f, BTreeSet::new())];
    while let Some((id, cur)) = stack.pop() {
        match dd.get_node(id).unwrap() {
            Node::Zero | Node::Undet => {}
            Node::One => {
                out.insert(cur);
            }
            Node::NonTerminal(x) => {
                let e = dd.level(id).unwrap();
                stack.push((x[0], cur.clone()));
                let mut with = cur;
                with.insert(e);
                stack.push((x[1], with));
            }
        }
    }
    out
}

/// Builds the ZDD of an explicitly listed family.
fn build(dd: &mut ZddManager, hs: &[HeaderId], fam: &Family) -> NodeId {
    let mut f = dd.zero();
    for s in fam {
        let mut z = dd.one();
        for &e in s {
            let single = dd.single(hs[e - 1]);
            z = dd.product(z, single);
        }
        f = dd.union(f, z);
    }
    f
}

/// All 2^(2^n) families over the universe {1, .., n}.
fn all_families(n: usize) -> Vec<Family> {
    let mut subsets: Vec<BTreeSet<usize>> = vec![];
    for mask in 0..(1u32 << n) {
        let s: BTreeSet<usize> = (1..=n).filter(|e| mask >> (e - 1) & 1 == 1).collect();
        subsets.push(s);
    }
    let count = subsets.len();
    (0..(1u32 << count))
        .map(|fmask| {
            (0..count)
                .filter(|i| fmask >> i & 1 == 1)
                .map(|i| subsets[i].clone())
                .collect()
        })
        .collect()
}

fn headers(dd: &mut ZddManager, n: usize) -> Vec<HeaderId> {
    (1..=n).map(|e| dd.create_header(e, &format!("x{}", e))).collect()
}

#[test]
fn test_union_intersect_setdiff_exhaustive() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 2);
    let fams = all_families(2);
    let roots: Vec<NodeId> = fams.iter().map(|f| build(&mut dd, &hs, f)).collect();
    for (i, a) in fams.iter().enumerate() {
        for (j, b) in fams.iter().enumerate() {
            let u = dd.union(roots[i], roots[j]);
            assert_eq!(collect(&dd, u), a.union(b).cloned().collect());
            let n = dd.intersect(roots[i], roots[j]);
            assert_eq!(collect(&dd, n), a.intersection(b).cloned().collect());
            let m = dd.setdiff(roots[i], roots[j]);
            assert_eq!(collect(&dd, m), a.difference(b).cloned().collect());
        }
    }
}

#[test]
fn test_product_meet_exhaustive() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 2);
    let fams = all_families(2);
    let roots: Vec<NodeId> = fams.iter().map(|f| build(&mut dd, &hs, f)).collect();
    for (i, a) in fams.iter().enumerate() {
        for (j, b) in fams.iter().enumerate() {
            let p = dd.product(roots[i], roots[j]);
            let expect: Family = a
                .iter()
                .flat_map(|x| b.iter().map(move |y| x.union(y).cloned().collect()))
                .collect();
            assert_eq!(collect(&dd, p), expect);
            let m = dd.meet(roots[i], roots[j]);
            let expect: Family = a
                .iter()
                .flat_map(|x| b.iter().map(move |y| x.intersection(y).cloned().collect()))
                .collect();
            assert_eq!(collect(&dd, m), expect);
        }
    }
}

#[test]
fn test_divide_exhaustive() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 3);
    let fams = all_families(2);
    let roots: Vec<NodeId> = fams.iter().map(|f| build(&mut dd, &hs, f)).collect();
    let universe: Vec<BTreeSet<usize>> = {
        let mut v = vec![];
        for mask in 0..(1u32 << 3) {
            v.push((1..=3).filter(|e| mask >> (e - 1) & 1 == 1).collect());
        }
        v
    };
    for (i, a) in fams.iter().enumerate() {
        for (j, b) in fams.iter().enumerate() {
            if b.is_empty() {
                continue;
            }
            let q = dd.divide(roots[i], roots[j]);
            let expect: Family = universe
                .iter()
                .filter(|x| {
                    b.iter().all(|y| {
                        let joined: BTreeSet<usize> = x.union(y).cloned().collect();
                        x.is_disjoint(y) && a.contains(&joined)
                    })
                })
                .cloned()
                .collect();
            assert_eq!(collect(&dd, q), expect, "{:?} / {:?}", a, b);
            // remainder law: f == (f / g) * g + f % g
            let p = dd.product(q, roots[j]);
            let r = dd.remainder(roots[i], roots[j]);
            let back = dd.union(p, r);
            assert_eq!(collect(&dd, back), *a);
        }
    }
}

#[test]
fn test_subset_superset_sieves_exhaustive() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 2);
    let fams = all_families(2);
    let roots: Vec<NodeId> = fams.iter().map(|f| build(&mut dd, &hs, f)).collect();
    for (i, a) in fams.iter().enumerate() {
        for (j, b) in fams.iter().enumerate() {
            let p = dd.permit(roots[i], roots[j]);
            let expect: Family = a
                .iter()
                .filter(|x| b.iter().any(|y| x.is_subset(y)))
                .cloned()
                .collect();
            assert_eq!(collect(&dd, p), expect, "permit {:?} {:?}", a, b);
            let r = dd.restrict(roots[i], roots[j]);
            let expect: Family = a
                .iter()
                .filter(|x| b.iter().any(|y| x.is_superset(y)))
                .cloned()
                .collect();
            assert_eq!(collect(&dd, r), expect, "restrict {:?} {:?}", a, b);
        }
    }
}

#[test]
fn test_minimal_maximal_hitting_exhaustive() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 3);
    let fams = all_families(2);
    let roots: Vec<NodeId> = fams.iter().map(|f| build(&mut dd, &hs, f)).collect();
    for (i, a) in fams.iter().enumerate() {
        let m = dd.minimal(roots[i]);
        let expect: Family = a
            .iter()
            .filter(|x| !a.iter().any(|y| y.is_subset(x) && *y != **x))
            .cloned()
            .collect();
        assert_eq!(collect(&dd, m), expect, "minimal {:?}", a);

        let m = dd.maximal(roots[i]);
        let expect: Family = a
            .iter()
            .filter(|x| !a.iter().any(|y| y.is_superset(x) && *y != **x))
            .cloned()
            .collect();
        assert_eq!(collect(&dd, m), expect, "maximal {:?}", a);

        let h = dd.hitting(roots[i]);
        let hitters: Family = {
            let mut v = Family::new();
            for mask in 0..(1u32 << 2) {
                let s: BTreeSet<usize> =
                    (1..=2).filter(|e| mask >> (e - 1) & 1 == 1).collect();
                if a.iter().all(|y| !s.is_disjoint(y)) {
                    v.insert(s);
                }
            }
            v
        };
        let expect: Family = hitters
            .iter()
            .filter(|x| !hitters.iter().any(|y| y.is_subset(x) && *y != **x))
            .cloned()
            .collect();
        assert_eq!(collect(&dd, h), expect, "hitting {:?}", a);
    }
}

#[test]
fn test_element_ops() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 3);
    let fams = all_families(3);
    // a deterministic sample, the full space is large
    for i in [0usize, 1, 5, 17, 33, 100, 129, 200, 255] {
        let a = &fams[i];
        let root = build(&mut dd, &hs, a);
        for e in 1..=3usize {
            let c = dd.change(root, hs[e - 1]);
            let expect: Family = a
                .iter()
                .map(|x| {
                    let mut y = x.clone();
                    if !y.remove(&e) {
                        y.insert(e);
                    }
                    y
                })
                .collect();
            assert_eq!(collect(&dd, c), expect, "change {:?} {}", a, e);

            let on = dd.onset0(root, hs[e - 1]);
            let expect: Family = a
                .iter()
                .filter(|x| x.contains(&e))
                .map(|x| {
                    let mut y = x.clone();
                    y.remove(&e);
                    y
                })
                .collect();
            assert_eq!(collect(&dd, on), expect, "onset0 {:?} {}", a, e);

            let off = dd.offset(root, hs[e - 1]);
            let expect: Family = a.iter().filter(|x| !x.contains(&e)).cloned().collect();
            assert_eq!(collect(&dd, off), expect, "offset {:?} {}", a, e);
        }
    }
}

#[test]
fn test_algebra_laws() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 3);
    let fams = all_families(3);
    let power = dd.power_set(&hs);
    for i in [3usize, 9, 21, 60, 77, 128, 140, 255] {
        for j in [0usize, 5, 18, 42, 99, 254] {
            let a = build(&mut dd, &hs, &fams[i]);
            let b = build(&mut dd, &hs, &fams[j]);
            // idempotence
            assert_eq!(dd.union(a, a), a);
            assert_eq!(dd.intersect(a, a), a);
            // absorption
            let ab = dd.intersect(a, b);
            assert_eq!(dd.union(a, ab), a);
            let ab = dd.union(a, b);
            assert_eq!(dd.intersect(a, ab), a);
            // De Morgan over the bounded universe
            let u = dd.union(a, b);
            let lhs = dd.setdiff(power, u);
            let na = dd.setdiff(power, a);
            let nb = dd.setdiff(power, b);
            let rhs = dd.intersect(na, nb);
            assert_eq!(lhs, rhs);
        }
    }
}

#[test]
fn test_serialization_roundtrip() {
    let mut dd = ZddManager::new();
    let hs = headers(&mut dd, 3);
    let fams = all_families(3);
    for i in [0usize, 1, 40, 77, 100, 255] {
        let a = build(&mut dd, &hs, &fams[i]);
        let mut buf = vec![];
        dump(&dd, a, &mut buf).unwrap();
        let b = load(&mut dd, &buf[..], &hs).unwrap();
        assert_eq!(a, b);
    }
}
