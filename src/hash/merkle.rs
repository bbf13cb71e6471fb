//! Merkle root folding over bitcoin double-SHA256 leaves (spec.md's Hash
//! Kernel), grounded in the well-known block-construction convention: an
//! odd level duplicates its last node before pairing.

use super::bitcoin_hash;

/// Folds `leaves` (already-hashed txids/wtxids, in order) into a single
/// merkle root. Returns the all-zero digest for an empty input, matching
/// the convention used for the null merkle root of an empty block.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut level: Vec<[u8; 32]> = leaves.to_vec();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = *level.last().unwrap();
            level.push(last);
        }
        level = level
            .chunks_exact(2)
            .map(|pair| {
                let mut concatenated = [0u8; 64];
                concatenated[..32].copy_from_slice(&pair[0]);
                concatenated[32..].copy_from_slice(&pair[1]);
                bitcoin_hash(&concatenated)
            })
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_leaf_is_its_own_root() {
        let leaf = [7u8; 32];
        assert_eq!(merkle_root(&[leaf]), leaf);
    }

    #[test]
    fn odd_count_duplicates_last_leaf() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let c = [3u8; 32];
        let with_duplicate = merkle_root(&[a, b, c, c]);
        assert_eq!(merkle_root(&[a, b, c]), with_duplicate);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(merkle_root(&[]), [0u8; 32]);
    }
}
