use eqsat::{EGraph, Id, RecExpr, SymbolLang as S};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn interning_dedups_nodes() {
    init();
    let mut egraph = EGraph::<S>::default();

    let a = egraph.add(S::leaf("a"));
    let a2 = egraph.add(S::leaf("a"));
    assert_eq!(a, a2);

    let f = egraph.add(S::new("f", vec![a, a]));
    assert_eq!(egraph.total_size(), 2);
    assert_eq!(egraph.number_of_classes(), 2);
    assert_eq!(egraph.total_number_of_nodes(), 2);

    // the repeated child contributes a single parent entry
    assert_eq!(egraph[a].parents().len(), 1);
    assert_eq!(egraph[f].parents().len(), 0);
}

#[test]
fn add_is_idempotent() {
    init();
    let mut egraph = EGraph::<S>::default();
    let x = egraph.add(S::leaf("x"));
    let f1 = egraph.add(S::new("f", vec![x]));

    let before = (egraph.total_size(), egraph.number_of_classes());
    let f2 = egraph.add(S::new("f", vec![x]));
    assert_eq!(f1, f2);
    assert_eq!(before, (egraph.total_size(), egraph.number_of_classes()));
}

#[test]
fn merge_is_idempotent() {
    init();
    let mut egraph = EGraph::<S>::default();
    let a = egraph.add(S::leaf("a"));
    let b = egraph.add(S::leaf("b"));

    assert_eq!(egraph.merge(a, a), egraph.find(a));

    let kept = egraph.merge(a, b);
    assert_eq!(egraph.merge(a, b), kept);
    assert_eq!(egraph.merge(b, a), kept);

    assert_eq!(egraph.rebuild(), 0);
    assert_eq!(egraph.number_of_classes(), 1);
}

#[test]
fn congruence_closes_applications() {
    init();
    let mut egraph = EGraph::<S>::default();
    let a = egraph.add(S::leaf("a"));
    let b = egraph.add(S::leaf("b"));
    let c = egraph.add(S::leaf("c"));
    let d = egraph.add(S::leaf("d"));
    let fab = egraph.add(S::new("f", vec![a, b]));
    let fcd = egraph.add(S::new("f", vec![c, d]));
    assert_ne!(egraph.find(fab), egraph.find(fcd));

    egraph.merge(a, c);
    egraph.merge(b, d);
    egraph.rebuild();

    assert_eq!(egraph.find(fab), egraph.find(fcd));
}

#[test]
fn upward_merging_cascades() {
    init();
    let mut egraph = EGraph::<S>::default();
    let gfa = egraph.add_expr(&"(g (f a))".parse().unwrap());
    let gfb = egraph.add_expr(&"(g (f b))".parse().unwrap());
    let a = egraph.lookup(S::leaf("a")).unwrap();
    let b = egraph.lookup(S::leaf("b")).unwrap();
    assert_ne!(egraph.find(gfa), egraph.find(gfb));

    egraph.merge(a, b);
    let n_unions = egraph.rebuild();

    // the f classes collapse, then the g classes
    assert_eq!(n_unions, 2);
    assert_eq!(egraph.find(gfa), egraph.find(gfb));
}

#[test]
fn reachable_tolerates_cycles() {
    init();
    let mut egraph = EGraph::<S>::default();
    let a = egraph.add(S::leaf("a"));
    let fa = egraph.add(S::new("f", vec![a]));
    egraph.merge(a, fa);
    egraph.rebuild();

    let reached = egraph.reachable(a);
    assert_eq!(reached.len(), 1);
    assert!(reached.contains(&egraph.find(fa)));

    // a loop that still hangs on to a second class
    let mut egraph = EGraph::<S>::default();
    let x = egraph.add(S::leaf("x"));
    let y = egraph.add(S::leaf("y"));
    let fxy = egraph.add(S::new("f", vec![x, y]));
    egraph.merge(x, fxy);
    egraph.rebuild();

    let reached = egraph.reachable(fxy);
    assert_eq!(reached.len(), 2);
    assert!(reached.contains(&egraph.find(x)));
    assert!(reached.contains(&egraph.find(y)));
}

#[test]
fn reachable_covers_the_whole_expression() {
    init();
    let mut egraph = EGraph::<S>::default();
    let x = egraph.add(S::leaf("x"));
    let y = egraph.add(S::leaf("y"));
    let gxy = egraph.add(S::new("g", vec![x, y]));
    let hx = egraph.add(S::new("h", vec![x]));
    let root = egraph.add(S::new("f", vec![gxy, hx]));

    let reached = egraph.reachable(root);
    for id in [x, y, gxy, hx, root] {
        assert!(reached.contains(&egraph.find(id)));
    }
}

#[test]
fn root_stays_canonical() {
    init();
    let expr: RecExpr<S> = "(f a)".parse().unwrap();
    let (mut egraph, root) = EGraph::from_expr(&expr);
    assert_eq!(egraph.root(), Some(egraph.find(root)));

    let b = egraph.add(S::leaf("b"));
    egraph.merge(root, b);
    egraph.rebuild();

    assert_eq!(egraph.root(), Some(egraph.find(root)));
    assert_eq!(egraph.root(), Some(egraph.find(b)));
}

#[test]
fn merge_order_does_not_matter() {
    init();

    fn build() -> (EGraph<S>, Vec<Id>) {
        let mut egraph = EGraph::<S>::default();
        let mut ids = Vec::new();
        for op in ["a", "b", "c", "d"] {
            ids.push(egraph.add(S::leaf(op)));
        }
        let fab = egraph.add(S::new("f", vec![ids[0], ids[1]]));
        let fcd = egraph.add(S::new("f", vec![ids[2], ids[3]]));
        ids.push(fab);
        ids.push(fcd);
        ids.push(egraph.add(S::new("g", vec![fab])));
        ids.push(egraph.add(S::new("g", vec![fcd])));
        (egraph, ids)
    }

    let merges = [(0usize, 2usize), (1, 3), (4, 5)];

    let (mut g1, ids) = build();
    for &(i, j) in &merges {
        g1.merge(ids[i], ids[j]);
    }
    g1.rebuild();

    let (mut g2, _) = build();
    for &(i, j) in merges.iter().rev() {
        g2.merge(ids[i], ids[j]);
    }
    g2.rebuild();

    // rebuilding between merges must not change the final partition either
    let (mut g3, _) = build();
    for &(i, j) in &merges {
        g3.merge(ids[i], ids[j]);
        g3.rebuild();
    }

    for i in 0..ids.len() {
        for j in 0..ids.len() {
            let expected = g1.find(ids[i]) == g1.find(ids[j]);
            assert_eq!(expected, g2.find(ids[i]) == g2.find(ids[j]));
            assert_eq!(expected, g3.find(ids[i]) == g3.find(ids[j]));
        }
    }
}

#[test]
fn lookup_sees_through_merges() {
    init();
    let mut egraph = EGraph::<S>::default();
    let a = egraph.add(S::leaf("a"));
    let c = egraph.add(S::leaf("c"));
    let fac = egraph.add(S::new("f", vec![a, c]));

    let b = egraph.add(S::leaf("b"));
    egraph.merge(b, c);
    egraph.rebuild();

    // querying with the stale child id still finds the class
    assert_eq!(egraph.lookup(S::new("f", vec![a, c])), Some(egraph.find(fac)));
    assert_eq!(egraph.lookup(S::new("f", vec![a, b])), Some(egraph.find(fac)));
    assert_eq!(egraph.lookup(S::new("f", vec![c, a])), None);
}
