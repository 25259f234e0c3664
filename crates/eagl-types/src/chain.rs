use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Ordered sequence of blocks, genesis first.
///
/// `Chain` does not check linkage on its own: a chain assembled from storage
/// may be broken until it has been verified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing block sequence without checking it.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The first block, if any.
    pub fn genesis(&self) -> Option<&Block> {
        self.blocks.first()
    }

    /// The most recently appended block, if any.
    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Block at position `index`; `None` when out of range.
    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Append a block to the tip. Linkage is the caller's responsibility.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Remove and return the tip block.
    pub fn pop(&mut self) -> Option<Block> {
        self.blocks.pop()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::BlockHash;
    use chrono::Utc;

    fn block(index: u64) -> Block {
        Block::from_parts(
            index,
            Utc::now(),
            format!("block-{index}"),
            BlockHash::sentinel(),
            BlockHash::from_bytes([index as u8; 32]),
        )
    }

    #[test]
    fn empty_chain() {
        let chain = Chain::new();
        assert!(chain.is_empty());
        assert!(chain.last().is_none());
        assert!(chain.genesis().is_none());
    }

    #[test]
    fn get_in_and_out_of_range() {
        let chain = Chain::from_blocks(vec![block(0), block(1)]);
        assert_eq!(chain.get(1).map(Block::index), Some(1));
        assert!(chain.get(2).is_none());
        assert!(chain.get(u64::MAX).is_none());
    }

    #[test]
    fn push_and_pop() {
        let mut chain = Chain::from_blocks(vec![block(0)]);
        chain.push(block(1));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.pop().map(|b| b.index()), Some(1));
        assert_eq!(chain.last().map(Block::index), Some(0));
    }

    #[test]
    fn serializes_as_plain_array() {
        let chain = Chain::from_blocks(vec![block(0)]);
        let value = serde_json::to_value(&chain).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 1);
    }
}
