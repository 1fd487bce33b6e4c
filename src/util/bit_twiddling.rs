/// Number of addressable bits in `data` (most significant bit of byte 0 is bit 0).
pub fn bit_len(data: &[u8]) -> usize {
    data.len() * 8
}

#[cfg(test)]
pub fn get_bit_i(data: &[u8], bit: usize) -> Option<bool> {
    let byte = data.get(bit / 8)?;
    Some(byte & (1u8 << (7 - bit % 8)) != 0)
}

/// Flips bit `bit`, returning `false` (and leaving `data` untouched) if it is out of range.
pub fn flip_bit_i(data: &mut [u8], bit: usize) -> bool {
    match data.get_mut(bit / 8) {
        Some(byte) => {
            *byte ^= 1u8 << (7 - bit % 8);
            true
        }
        None => false,
    }
}

/// XORs the byte at `offset` with `mask`, returning `false` if `offset` is out of range.
pub fn flip_byte(data: &mut [u8], offset: usize, mask: u8) -> bool {
    match data.get_mut(offset) {
        Some(byte) => {
            *byte ^= mask;
            true
        }
        None => false,
    }
}
