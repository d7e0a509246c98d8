use std::collections::{BTreeMap, BTreeSet};

use dss::prelude::*;

// --- brute-force reference ---------------------------------------------------

fn degrees(g: &Digraph, mask: u32) -> (Vec<i32>, Vec<i32>) {
    let n = g.vertex_size();
    let mut indeg = vec![0; n + 1];
    let mut outdeg = vec![0; n + 1];
    for i in 0..g.edge_size() {
        if mask >> i & 1 == 1 {
            let (u, v) = g.edge(i);
            outdeg[u as usize] += 1;
            indeg[v as usize] += 1;
        }
    }
    (indeg, outdeg)
}

fn successor(g: &Digraph, mask: u32) -> (Vec<usize>, usize) {
    let mut succ = vec![0usize; g.vertex_size() + 1];
    let mut edges = 0;
    for i in 0..g.edge_size() {
        if mask >> i & 1 == 1 {
            let (u, v) = g.edge(i);
            succ[u as usize] = v as usize;
            edges += 1;
        }
    }
    (succ, edges)
}

fn is_single_cycle(g: &Digraph, mask: u32) -> bool {
    if mask == 0 {
        return false;
    }
    let n = g.vertex_size();
    let (indeg, outdeg) = degrees(g, mask);
    for v in 1..=n {
        if indeg[v] != outdeg[v] || indeg[v] > 1 {
            return false;
        }
    }
    let (succ, edges) = successor(g, mask);
    let start = (1..=n).find(|&v| outdeg[v] > 0).unwrap();
    let mut cur = start;
    let mut steps = 0;
    loop {
        cur = succ[cur];
        steps += 1;
        if cur == start {
            break;
        }
        if steps > edges {
            return false;
        }
    }
    steps == edges
}

fn is_hamiltonian_cycle(g: &Digraph, mask: u32) -> bool {
    if !is_single_cycle(g, mask) {
        return false;
    }
    let (_, outdeg) = degrees(g, mask);
    (1..=g.vertex_size()).all(|v| outdeg[v] > 0)
}

fn is_st_path(g: &Digraph, mask: u32, s: usize, t: usize, ham: bool) -> bool {
    let n = g.vertex_size();
    let (indeg, outdeg) = degrees(g, mask);
    if indeg[s] != 0 || outdeg[s] != 1 {
        return false;
    }
    if indeg[t] != 1 || outdeg[t] != 0 {
        return false;
    }
    for v in 1..=n {
        if v == s || v == t {
            continue;
        }
        if indeg[v] != outdeg[v] || indeg[v] > 1 {
            return false;
        }
        if ham && indeg[v] == 0 {
            return false;
        }
    }
    let (succ, edges) = successor(g, mask);
    let mut cur = s;
    let mut steps = 0;
    while cur != t {
        cur = succ[cur];
        steps += 1;
        if steps > edges {
            return false;
        }
    }
    steps == edges
}

fn is_rooted_forest(g: &Digraph, mask: u32, roots: &[usize], spanning: bool) -> bool {
    let n = g.vertex_size();
    let (indeg, outdeg) = degrees(g, mask);
    let has_roots = !roots.is_empty();
    for v in 1..=n {
        let root = roots.contains(&v);
        if indeg[v] > 1 {
            return false;
        }
        if has_roots && root && indeg[v] > 0 {
            return false;
        }
        if has_roots && !root && indeg[v] == 0 && outdeg[v] > 0 {
            return false;
        }
        if spanning && !root && indeg[v] + outdeg[v] == 0 {
            return false;
        }
    }
    let mut parent = vec![0usize; n + 1];
    for i in 0..g.edge_size() {
        if mask >> i & 1 == 1 {
            let (u, v) = g.edge(i);
            parent[v as usize] = u as usize;
        }
    }
    for v in 1..=n {
        let mut cur = v;
        let mut steps = 0;
        while parent[cur] != 0 {
            cur = parent[cur];
            steps += 1;
            if steps > n {
                return false; // cycle
            }
        }
    }
    true
}

fn brute<F: Fn(u32) -> bool>(g: &Digraph, pred: F) -> BTreeSet<u32> {
    (0..1u32 << g.edge_size()).filter(|&mask| pred(mask)).collect()
}

fn masks(g: &Digraph, f: &SetSet) -> BTreeSet<u32> {
    let m = g.edge_size();
    f.iter()
        .map(|set| {
            set.iter()
                .map(|&e| 1u32 << (m - e))
                .fold(0u32, |acc, b| acc | b)
        })
        .collect()
}

fn edge_set(g: &Digraph, edges: &[usize]) -> BTreeSet<usize> {
    edges.iter().map(|&i| g.edge_elem(i)).collect()
}

fn triangle() -> Digraph {
    Digraph::from_edges([("a", "b"), ("b", "c"), ("c", "a")]).unwrap()
}

fn bidirected_k3() -> Digraph {
    Digraph::from_edges([
        ("a", "b"),
        ("b", "a"),
        ("b", "c"),
        ("c", "b"),
        ("a", "c"),
        ("c", "a"),
    ])
    .unwrap()
}

fn dense5() -> Digraph {
    Digraph::from_edges([
        ("a", "b"),
        ("b", "c"),
        ("c", "a"),
        ("c", "d"),
        ("d", "a"),
        ("b", "d"),
        ("d", "e"),
        ("e", "a"),
        ("e", "c"),
        ("a", "d"),
    ])
    .unwrap()
}

fn dag6() -> Digraph {
    Digraph::from_edges([
        ("a", "b"),
        ("a", "c"),
        ("b", "d"),
        ("c", "d"),
        ("d", "e"),
        ("b", "e"),
        ("e", "f"),
    ])
    .unwrap()
}

// --- brute-force equality ----------------------------------------------------

#[test]
fn test_cycles_match_brute_force() {
    for g in [triangle(), bidirected_k3(), dense5()] {
        let uv = Universe::new(g.edge_size()).unwrap();
        let f = directed_cycles(&uv, &g, None).unwrap();
        assert_eq!(masks(&g, &f), brute(&g, |m| is_single_cycle(&g, m)));
    }
}

#[test]
fn test_hamiltonian_cycles_match_brute_force() {
    for g in [triangle(), bidirected_k3(), dense5()] {
        let uv = Universe::new(g.edge_size()).unwrap();
        let f = directed_hamiltonian_cycles(&uv, &g, None).unwrap();
        assert_eq!(masks(&g, &f), brute(&g, |m| is_hamiltonian_cycle(&g, m)));
        // every Hamiltonian cycle is a cycle
        let cycles = directed_cycles(&uv, &g, None).unwrap();
        assert!(f.is_subset(&cycles));
    }
}

#[test]
fn test_st_paths_match_brute_force() {
    for (g, s, t) in [(dense5(), "b", "e"), (dag6(), "a", "f"), (dag6(), "a", "e")] {
        let uv = Universe::new(g.edge_size()).unwrap();
        let sv = g.vertex(s).unwrap() as usize;
        let tv = g.vertex(t).unwrap() as usize;
        for ham in [false, true] {
            let f = directed_st_path(&uv, &g, s, t, ham, None).unwrap();
            assert_eq!(
                masks(&g, &f),
                brute(&g, |m| is_st_path(&g, m, sv, tv, ham)),
                "{}->{} ham={}",
                s,
                t,
                ham
            );
        }
    }
}

#[test]
fn test_forests_match_brute_force() {
    for g in [dag6(), dense5()] {
        let uv = Universe::new(g.edge_size()).unwrap();
        for roots in [vec![], vec!["a"], vec!["a", "c"]] {
            let root_nums: Vec<usize> = roots
                .iter()
                .map(|r| g.vertex(r).unwrap() as usize)
                .collect();
            for spanning in [false, true] {
                let f = rooted_forests(&uv, &g, &roots, spanning, None).unwrap();
                assert_eq!(
                    masks(&g, &f),
                    brute(&g, |m| is_rooted_forest(&g, m, &root_nums, spanning)),
                    "roots={:?} spanning={}",
                    roots,
                    spanning
                );
            }
        }
    }
}

#[test]
fn test_trees_match_brute_force() {
    for g in [dag6(), dense5()] {
        let uv = Universe::new(g.edge_size()).unwrap();
        let root_num = g.vertex("a").unwrap() as usize;
        for spanning in [false, true] {
            let f = rooted_trees(&uv, &g, "a", spanning, None).unwrap();
            assert_eq!(
                masks(&g, &f),
                brute(&g, |m| is_rooted_forest(&g, m, &[root_num], spanning)),
                "spanning={}",
                spanning
            );
        }
    }
}

#[test]
fn test_degree_constrained_match_brute_force() {
    let g = dense5();
    let uv = Universe::new(g.edge_size()).unwrap();
    let mut in_c = BTreeMap::new();
    let mut out_c = BTreeMap::new();
    for v in ["a", "b", "c", "d", "e"] {
        in_c.insert(v.to_string(), Range::new(0, 2, 1).unwrap());
        out_c.insert(v.to_string(), Range::new(1, 3, 1).unwrap());
    }
    let f = directed_graphs(&uv, &g, Some(&in_c), Some(&out_c), None).unwrap();
    let expect = brute(&g, |m| {
        let (indeg, outdeg) = degrees(&g, m);
        (1..=g.vertex_size()).all(|v| (0..=1).contains(&indeg[v]) && (1..=2).contains(&outdeg[v]))
    });
    assert_eq!(masks(&g, &f), expect);

    // a stepped range: even in-degree everywhere, unconstrained out
    let mut even_in = BTreeMap::new();
    for v in ["a", "b", "c", "d", "e"] {
        even_in.insert(v.to_string(), Range::new(0, 4, 2).unwrap());
    }
    let f = directed_graphs(&uv, &g, Some(&even_in), None, None).unwrap();
    let expect = brute(&g, |m| {
        let (indeg, _) = degrees(&g, m);
        (1..=g.vertex_size()).all(|v| indeg[v] % 2 == 0 && indeg[v] <= 3)
    });
    assert_eq!(masks(&g, &f), expect);
}

#[test]
fn test_search_space_restricts_result() {
    let g = bidirected_k3();
    let uv = Universe::new(g.edge_size()).unwrap();
    // only subsets containing the first edge (a, b)
    let space = uv.from_constraints(&[g.edge_elem(0)], &[]).unwrap();
    let all = directed_cycles(&uv, &g, None).unwrap();
    let restricted = directed_cycles(&uv, &g, Some(&space)).unwrap();
    assert_eq!(restricted, all.intersect(&space));
    assert!(restricted.is_subset(&all));
    for set in restricted.iter() {
        assert!(set.contains(&g.edge_elem(0)));
    }
}

// --- concrete scenarios ------------------------------------------------------

#[test]
fn test_scenario_triangle_cycle() {
    let g = triangle();
    let uv = Universe::new(3).unwrap();
    let f = directed_cycles(&uv, &g, None).unwrap();
    assert_eq!(f.len().unwrap(), 1);
    assert_eq!(f.size(), "1");
    assert!(f.contains(&edge_set(&g, &[0, 1, 2])).unwrap());
}

#[test]
fn test_scenario_bidirected_k3_cycles() {
    let g = bidirected_k3();
    let uv = Universe::new(6).unwrap();
    let f = directed_cycles(&uv, &g, None).unwrap();
    assert_eq!(f.size(), "5");
    // the three 2-cycles
    assert!(f.contains(&edge_set(&g, &[0, 1])).unwrap());
    assert!(f.contains(&edge_set(&g, &[2, 3])).unwrap());
    assert!(f.contains(&edge_set(&g, &[4, 5])).unwrap());
    // the two 3-cycles: a->b->c->a and a->c->b->a
    assert!(f.contains(&edge_set(&g, &[0, 2, 5])).unwrap());
    assert!(f.contains(&edge_set(&g, &[4, 3, 1])).unwrap());
}

#[test]
fn test_scenario_st_paths() {
    let g = Digraph::from_edges([("a", "b"), ("b", "c"), ("a", "c")]).unwrap();
    let uv = Universe::new(3).unwrap();
    let f = directed_st_path(&uv, &g, "a", "c", false, None).unwrap();
    let expect: BTreeSet<BTreeSet<usize>> =
        [edge_set(&g, &[2]), edge_set(&g, &[0, 1])].into_iter().collect();
    assert_eq!(f.iter().collect::<BTreeSet<_>>(), expect);
}

#[test]
fn test_scenario_spanning_trees() {
    let g = Digraph::from_edges([("a", "b"), ("a", "c"), ("b", "c")]).unwrap();
    let uv = Universe::new(3).unwrap();
    let f = rooted_trees(&uv, &g, "a", true, None).unwrap();
    let expect: BTreeSet<BTreeSet<usize>> =
        [edge_set(&g, &[0, 1]), edge_set(&g, &[0, 2])].into_iter().collect();
    assert_eq!(f.iter().collect::<BTreeSet<_>>(), expect);
}

#[test]
fn test_scenario_two_cycle_degrees() {
    let g = Digraph::from_edges([("a", "b"), ("b", "a")]).unwrap();
    let uv = Universe::new(2).unwrap();
    let r = Range::new(1, 2, 1).unwrap();
    let mut in_c = BTreeMap::new();
    let mut out_c = BTreeMap::new();
    for v in ["a", "b"] {
        in_c.insert(v.to_string(), r.clone());
        out_c.insert(v.to_string(), r.clone());
    }
    let f = directed_graphs(&uv, &g, Some(&in_c), Some(&out_c), None).unwrap();
    assert_eq!(f.len().unwrap(), 1);
    assert!(f.contains(&edge_set(&g, &[0, 1])).unwrap());
}

#[test]
fn test_scenario_edge_algebra() {
    let g = triangle();
    let uv = Universe::new(3).unwrap();
    let e1 = g.edge_elem(0);
    let e2 = g.edge_elem(1);
    let a = uv.from_constraints(&[e1], &[]).unwrap();
    let b = uv.from_constraints(&[e2], &[]).unwrap();
    let ab = a.intersect(&b);
    assert_eq!(ab.supersets_of_elem(e1).unwrap(), ab);
    assert_eq!(a.union(&b).difference(&a), b.difference(&a));
}

// --- argument validation -----------------------------------------------------

#[test]
fn test_universe_mismatch() {
    let g = triangle();
    let uv = Universe::new(2).unwrap();
    assert!(matches!(
        directed_cycles(&uv, &g, None),
        Err(Error::UniverseMismatch { universe: 2, edges: 3 })
    ));
}

#[test]
fn test_unknown_vertices() {
    let g = triangle();
    let uv = Universe::new(3).unwrap();
    assert!(matches!(
        directed_st_path(&uv, &g, "a", "z", false, None),
        Err(Error::ConstraintViolation(_))
    ));
    assert!(matches!(
        directed_st_path(&uv, &g, "a", "a", false, None),
        Err(Error::ConstraintViolation(_))
    ));
    assert!(matches!(
        rooted_trees(&uv, &g, "z", false, None),
        Err(Error::ConstraintViolation(_))
    ));
    let mut c = BTreeMap::new();
    c.insert("z".to_string(), Range::to(2).unwrap());
    assert!(matches!(
        directed_graphs(&uv, &g, Some(&c), None, None),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_unfrozen_graph_is_rejected() {
    let mut g = Digraph::new();
    g.add_edge("a", "b").unwrap();
    let uv = Universe::new(1).unwrap();
    assert!(directed_cycles(&uv, &g, None).is_err());
}

#[test]
fn test_show_messages_toggle() {
    let prev = show_messages(true);
    assert!(show_messages(false));
    show_messages(prev);
}
