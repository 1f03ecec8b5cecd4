//! Purpose: Generic ordered multiway tree used to hold decoded documents.
//! Exports: `Tree`, `PreOrder`.
//! Role: The shape downstream consumers traverse; `fold` is the primitive every query builds on.
//! Invariants: Each tree exclusively owns its children; no sharing, no parent links.
//! Invariants: Traversal is left-to-right depth-first pre-order and never recurses on the call stack.
//! Invariants: `Clone`, `PartialEq`, `Debug`, and `Drop` walk the tree with explicit stacks too.
use std::convert::Infallible;
use std::fmt;

pub struct Tree<T> {
    node: T,
    children: Vec<Tree<T>>,
}

impl<T> Tree<T> {
    pub fn singleton(node: T) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn new(node: T, children: Vec<Tree<T>>) -> Self {
        Self { node, children }
    }

    pub fn node(&self) -> &T {
        &self.node
    }

    pub fn children(&self) -> &[Tree<T>] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Thread `init` through every node in pre-order (node, then each child subtree in order).
    pub fn fold<A, F>(&self, init: A, mut combine: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.iter().fold(init, |acc, node| combine(acc, node))
    }

    pub fn iter(&self) -> PreOrder<'_, T> {
        PreOrder { stack: vec![self] }
    }

    /// Pre-order walk that also reports each node's depth (root is 0).
    pub fn iter_with_depth(&self) -> impl Iterator<Item = (usize, &T)> {
        self.iter_trees().map(|(depth, tree)| (depth, &tree.node))
    }

    pub fn len(&self) -> usize {
        self.fold(0, |count, _| count + 1)
    }

    pub fn depth(&self) -> usize {
        self.iter_trees()
            .map(|(depth, _)| depth + 1)
            .max()
            .unwrap_or(1)
    }

    /// First subtree (pre-order) whose node satisfies `predicate`.
    pub fn find<F>(&self, mut predicate: F) -> Option<&Tree<T>>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter_trees()
            .map(|(_, tree)| tree)
            .find(|tree| predicate(&tree.node))
    }

    /// Structure-preserving conversion of every node.
    pub fn map<U, F>(&self, mut convert: F) -> Tree<U>
    where
        F: FnMut(&T) -> U,
    {
        let built = Tree::try_unfold(self, |tree| {
            Ok::<_, Infallible>((convert(&tree.node), tree.children.iter()))
        });
        match built {
            Ok(tree) => tree,
            Err(never) => match never {},
        }
    }

    /// Grow a tree from `seed`: `expand` turns a seed into its node and its ordered child seeds.
    ///
    /// Children are expanded depth-first, left to right, using an explicit stack, so the
    /// depth of the result is bounded by memory rather than by the call stack. The first
    /// error returned by `expand` aborts the whole build.
    pub fn try_unfold<S, I, E, F>(seed: S, mut expand: F) -> Result<Tree<T>, E>
    where
        F: FnMut(S) -> Result<(T, I), E>,
        I: IntoIterator<Item = S>,
    {
        struct Frame<T, P> {
            node: T,
            pending: P,
            built: Vec<Tree<T>>,
        }

        let (node, pending) = expand(seed)?;
        let mut current = Frame {
            node,
            pending: pending.into_iter(),
            built: Vec::new(),
        };
        let mut ancestors = Vec::new();
        loop {
            if let Some(child_seed) = current.pending.next() {
                let (node, pending) = expand(child_seed)?;
                let child = Frame {
                    node,
                    pending: pending.into_iter(),
                    built: Vec::new(),
                };
                ancestors.push(std::mem::replace(&mut current, child));
                continue;
            }
            let tree = Tree::new(current.node, current.built);
            match ancestors.pop() {
                Some(mut parent) => {
                    parent.built.push(tree);
                    current = parent;
                }
                None => return Ok(tree),
            }
        }
    }

    fn iter_trees(&self) -> impl Iterator<Item = (usize, &Tree<T>)> {
        TreeWalk {
            stack: vec![(0, self)],
        }
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut tree) = pending.pop() {
            pending.append(&mut tree.children);
        }
    }
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        self.map(T::clone)
    }
}

impl<T: PartialEq> PartialEq for Tree<T> {
    // Equal pre-order (depth, child count, node) sequences imply equal shapes.
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.iter_trees();
        let mut right = other.iter_trees();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some((da, a)), Some((db, b))) => {
                    if da != db || a.children.len() != b.children.len() || a.node != b.node {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl<T: Eq> Eq for Tree<T> {}

/// Renders as a flat pre-order list of `(depth, node)` pairs.
impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter_with_depth()).finish()
    }
}

pub struct PreOrder<'a, T> {
    stack: Vec<&'a Tree<T>>,
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.stack.pop()?;
        // reversed so the leftmost child is popped first
        self.stack.extend(tree.children.iter().rev());
        Some(&tree.node)
    }
}

struct TreeWalk<'a, T> {
    stack: Vec<(usize, &'a Tree<T>)>,
}

impl<'a, T> Iterator for TreeWalk<'a, T> {
    type Item = (usize, &'a Tree<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, tree) = self.stack.pop()?;
        for child in tree.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, tree))
    }
}
