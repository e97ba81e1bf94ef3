//! Identifier → block lookup over a flat, unordered block sequence.

use std::collections::HashMap;

use crate::models::{Block, BlockType};

/// Borrowed index over the blocks of one document.
///
/// Built in O(n). Holds references only for the duration of one extraction.
pub struct BlockIndex<'a> {
    blocks: &'a [Block],
    by_id: HashMap<&'a str, &'a Block>,
}

impl<'a> BlockIndex<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        let mut by_id = HashMap::with_capacity(blocks.len());
        for block in blocks {
            if by_id.insert(block.id.as_str(), block).is_some() {
                tracing::debug!(block_id = %block.id, "Duplicate block id, keeping last");
            }
        }
        Self { blocks, by_id }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&'a Block> {
        self.by_id.get(id).copied()
    }

    /// All blocks of the given type, in source order.
    pub fn blocks_of_type(&self, kind: &BlockType) -> Vec<&'a Block> {
        self.blocks.iter().filter(|b| b.is_type(kind)).collect()
    }

    /// Children of `parent` whose type is `kind`, in child order.
    ///
    /// Dangling child ids are skipped.
    pub fn children_of_type(&self, parent: &Block, kind: &BlockType) -> Vec<&'a Block> {
        parent
            .children
            .iter()
            .filter_map(|id| {
                let child = self.get(id);
                if child.is_none() {
                    tracing::debug!(parent_id = %parent.id, child_id = %id, "Dangling child reference");
                }
                child
            })
            .filter(|child| child.is_type(kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Block> {
        vec![
            Block::word("w2", "Sales"),
            Block::cell("c1", 1, 1, &["w1", "w2"]),
            Block::table("t1", &["c1", "missing", "w1"]),
            Block::word("w1", "Case"),
        ]
    }

    #[test]
    fn lookup_is_order_independent() {
        let blocks = sample();
        let index = BlockIndex::new(&blocks);
        assert_eq!(index.len(), 4);
        assert_eq!(index.get("w1").unwrap().text.as_deref(), Some("Case"));
        assert!(index.get("nope").is_none());
    }

    #[test]
    fn children_keep_child_order() {
        let blocks = sample();
        let index = BlockIndex::new(&blocks);
        let cell = index.get("c1").unwrap();
        let words: Vec<&str> = index
            .children_of_type(cell, &BlockType::Word)
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(words, vec!["w1", "w2"]);
    }

    #[test]
    fn dangling_and_mistyped_children_are_skipped() {
        let blocks = sample();
        let index = BlockIndex::new(&blocks);
        let table = index.get("t1").unwrap();
        let cells = index.children_of_type(table, &BlockType::Cell);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].id, "c1");
    }

    #[test]
    fn blocks_of_type_preserves_source_order() {
        let blocks = sample();
        let index = BlockIndex::new(&blocks);
        let words: Vec<&str> = index
            .blocks_of_type(&BlockType::Word)
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(words, vec!["w2", "w1"]);
    }

    #[test]
    fn empty_input_builds_empty_index() {
        let blocks: Vec<Block> = Vec::new();
        let index = BlockIndex::new(&blocks);
        assert!(index.is_empty());
    }
}
