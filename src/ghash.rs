//! GHASH: the streaming accumulator built on [`GcmTable`] multiplication.

use crate::field::{FieldElement, GcmTable};

/// Absorbs `data` into `acc` as a sequence of 16-byte blocks,
/// zero-padding a final partial block. Used both for associated data
/// (at session construction) and for the data stream (during
/// `encrypt`/`decrypt`).
pub(crate) fn update(table: &GcmTable, acc: &mut FieldElement, data: &[u8]) {
    let mut chunks = data.chunks_exact(16);
    for block in &mut chunks {
        let block: [u8; 16] = block.try_into().expect("chunks_exact(16) yields 16-byte slices");
        *acc ^= FieldElement::from_block(&block);
        table.mul(acc);
    }

    let rem = chunks.remainder();
    if !rem.is_empty() {
        let mut block = [0u8; 16];
        block[..rem.len()].copy_from_slice(rem);
        *acc ^= FieldElement::from_block(&block);
        table.mul(acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_is_noop() {
        let table = GcmTable::new(FieldElement::from_block(&[0x42; 16]));
        let mut acc = FieldElement::ZERO;
        update(&table, &mut acc, &[]);
        assert_eq!(acc, FieldElement::ZERO);
    }

    #[test]
    fn partial_block_is_zero_padded() {
        let table = GcmTable::new(FieldElement::from_block(&[0x11; 16]));

        let mut acc_short = FieldElement::ZERO;
        update(&table, &mut acc_short, &[1, 2, 3]);

        let mut padded = [0u8; 16];
        padded[0..3].copy_from_slice(&[1, 2, 3]);
        let mut acc_padded = FieldElement::ZERO;
        update(&table, &mut acc_padded, &padded);

        assert_eq!(acc_short, acc_padded);
    }

    #[test]
    fn multi_block_chains_state() {
        let table = GcmTable::new(FieldElement::from_block(&[0x77; 16]));
        let data = [0xABu8; 40]; // two full blocks + one 8-byte partial block

        let mut acc_whole = FieldElement::ZERO;
        update(&table, &mut acc_whole, &data);

        // Re-deriving the same result one block at a time confirms the
        // accumulator is a pure function of the bytes absorbed so far,
        // not of how they were chunked.
        let mut acc_chunked = FieldElement::ZERO;
        update(&table, &mut acc_chunked, &data[0..16]);
        update(&table, &mut acc_chunked, &data[16..32]);
        update(&table, &mut acc_chunked, &data[32..40]);

        assert_eq!(acc_whole, acc_chunked);
    }
}
