use parent_bst::{BinaryTree, Node};

use std::collections::HashSet;

fn less(a: &i8, b: &i8) -> bool {
    a < b
}

fn build(xs: &[i8]) -> BinaryTree<i8> {
    let mut tree = BinaryTree::new();
    tree.insert_all(xs.iter().copied(), less);
    tree
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    xs.iter()
        .all(|x| tree.search(x).map(|n| *n.value()) == Some(*x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree = build(&xs);
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn duplicates_are_ignored(xs: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    let distinct: HashSet<_> = xs.iter().collect();
    let height = tree.height();

    tree.insert_all(xs.iter().copied(), less);

    tree.len() == distinct.len() && tree.height() == height
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| tree.search(x).is_none())
        && still_present.iter().all(|x| tree.search(x).is_some())
}

#[quickcheck]
fn search_all_ignores_ordering(xs: Vec<i8>, target: i8) -> bool {
    // Alternate orderings so ordered search is unreliable.
    let mut tree = BinaryTree::new();
    for (i, x) in xs.iter().enumerate() {
        if i % 2 == 0 {
            tree.insert(*x, less);
        } else {
            tree.insert(*x, |a: &i8, b: &i8| a > b);
        }
    }

    // A value inserted under both orderings can end up stored twice.
    let found = tree.search_all(&target);

    found.iter().all(|n| *n.value() == target) && found.is_empty() != xs.contains(&target)
}

#[quickcheck]
fn delete_all_removes_every_match(xs: Vec<i8>, target: i8) -> bool {
    let mut tree = BinaryTree::new();
    for (i, x) in xs.iter().enumerate() {
        if i % 3 == 0 {
            tree.insert(*x, |a: &i8, b: &i8| a > b);
        } else {
            tree.insert(*x, less);
        }
    }
    let before = tree.len();
    let matching = tree.search_all(&target).len();

    let removed = tree.delete_all(&target);

    removed.len() == matching
        && removed.iter().all(|n| *n.value() == target)
        && tree.search_all(&target).is_empty()
        && tree.len() == before - matching
}

/// Every node above `node`, nearest first.
fn ancestors(node: &Node<i8>) -> Vec<Node<i8>> {
    let mut found = Vec::new();
    let mut current = node.parent();
    while let Some(parent) = current {
        current = parent.parent();
        found.push(parent);
    }
    found
}

#[quickcheck]
fn delete_where_removes_exactly_the_matching_subtrees(xs: Vec<i8>, bound: i8) -> bool {
    let mut tree = build(&xs);
    let before = tree.len();
    let above = |n: &Node<i8>| *n.value() > bound;

    // The highest matching nodes are the ones that should be cut, each taking its subtree.
    let roots = tree.search_where(|n| above(n) && !ancestors(n).iter().any(above));
    let cut: usize = roots
        .iter()
        .map(|root| BinaryTree::with_root(root.clone()).len())
        .sum();

    let removed = tree.delete_where(above);

    removed.len() == roots.len()
        && removed.iter().zip(&roots).all(|(a, b)| Node::ptr_eq(a, b))
        && tree.len() == before - cut
        && tree
            .search_where(|_| true)
            .iter()
            .all(|n| !above(n) && !ancestors(n).iter().any(above))
}
