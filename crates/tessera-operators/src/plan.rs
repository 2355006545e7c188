//! Plan introspection over `OpIterator::children`.

use std::fmt::Write;

use crate::traits::OpIterator;

/// Render an operator tree, one node per line, children indented below their
/// parent:
///
/// ```text
/// insert [INT_TYPE(unnamed)]
///   filter [INT_TYPE(t.v)]
///     seq_scan [INT_TYPE(t.v)]
/// ```
pub fn explain(root: &dyn OpIterator) -> String {
    let mut out = String::new();
    walk(root, 0, &mut out);
    out
}

fn walk(op: &dyn OpIterator, depth: usize, out: &mut String) {
    // Writing into a String cannot fail.
    let indent = depth * 2;
    let _ = writeln!(out, "{:indent$}{} [{}]", "", op.name(), op.tuple_desc());
    for child in op.children() {
        walk(child, depth + 1, out);
    }
}

/// Number of operators in the tree rooted at `root`.
pub fn node_count(root: &dyn OpIterator) -> usize {
    1 + root.children().into_iter().map(node_count).sum::<usize>()
}
