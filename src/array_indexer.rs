use std::fmt::Write;

/// Generates the keys of array elements: "0", "1", "2", and so on.
#[derive(Clone, Debug)]
pub struct ArrayIndexer {
    index: usize,
    key: String,
}

impl ArrayIndexer {
    pub fn new() -> Self {
        Self {
            index: 0,
            key: String::from("0"),
        }
    }

    /// Move to the next index.
    pub fn advance(&mut self) {
        self.index += 1;
        self.key.clear();
        // Writing into a String can't fail
        let _ = write!(self.key, "{}", self.index);
    }

    /// The key for the current index.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Default for ArrayIndexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequence() {
        let mut indexer = ArrayIndexer::new();
        let mut keys = Vec::new();
        for _ in 0..12 {
            keys.push(indexer.key().to_string());
            indexer.advance();
        }
        assert_eq!(
            keys,
            ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]
        );
        assert_eq!(indexer.index(), 12);
    }

    #[test]
    fn large_indices() {
        let mut indexer = ArrayIndexer::new();
        for _ in 0..1000 {
            indexer.advance();
        }
        assert_eq!(indexer.key(), "1000");
    }
}
