//! Rendering trees and nested sets with `termtree`.

use std::slice;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{Entry, NestedSet, Position, TreeArena, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.id.to_string()).with_leaves(leaves)
    }
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root) = self.root().and_then(|idx| self.get_node(idx)) else {
            return Tree::new("Empty tree".to_string());
        };

        // (rendered node, remaining children); a node is attached to its
        // parent once all of its children are rendered
        let mut stack: Vec<(Tree<String>, slice::Iter<'_, Index>)> =
            vec![(Tree::new(root.id.to_string()), root.children.iter())];

        while let Some((_, children)) = stack.last_mut() {
            match children.next() {
                Some(&child_idx) => {
                    if let Some(child) = self.get_node(child_idx) {
                        stack.push((Tree::new(child.id.to_string()), child.children.iter()));
                    }
                }
                None => {
                    if let Some((done, _)) = stack.pop() {
                        match stack.last_mut() {
                            Some((parent, _)) => {
                                parent.push(done);
                            }
                            None => return done,
                        }
                    }
                }
            }
        }
        Tree::new("Empty tree".to_string())
    }
}

/// Rebuilt from the intervals alone: each entry goes below the nearest
/// still-open entry whose interval contains it.
impl TreeNodeConvert for NestedSet {
    fn to_tree_string(&self) -> Tree<String> {
        // rendered entries whose right bound has not been passed yet
        let mut open: Vec<(Tree<String>, Position)> = Vec::new();

        for entry in self {
            while open.len() > 1 && open.last().is_some_and(|(_, right)| *right < entry.left) {
                attach_top(&mut open);
            }
            open.push((Tree::new(label(entry)), entry.right));
        }
        while open.len() > 1 {
            attach_top(&mut open);
        }

        open.pop()
            .map(|(root, _)| root)
            .unwrap_or_else(|| Tree::new("Empty nested set".to_string()))
    }
}

fn attach_top(open: &mut Vec<(Tree<String>, Position)>) {
    if let Some((done, _)) = open.pop() {
        if let Some((parent, _)) = open.last_mut() {
            parent.push(done);
        }
    }
}

fn label(entry: &Entry) -> String {
    format!("{} [{}, {}]", entry.id, entry.left, entry.right)
}
