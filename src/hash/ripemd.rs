//! RIPEMD-128 and RIPEMD-160, implemented directly from the RIPEMD
//! reference specification (Dobbertin, Bosselaers, Preneel).
//!
//! RIPEMD-160 backs `hash160` (the short hash behind P2PKH/P2WPKH/P2SH
//! programs) and `op_ripemd160`/`op_hash160`. RIPEMD-128 is exposed only
//! because spec.md's Hash Kernel names it as a component function; no
//! opcode or sighash path in this crate calls it.

const BLOCK_SIZE: usize = 64;

fn f1(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}
fn f2(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}
fn f3(x: u32, y: u32, z: u32) -> u32 {
    (x | !y) ^ z
}
fn f4(x: u32, y: u32, z: u32) -> u32 {
    (x & z) | (y & !z)
}
fn f5(x: u32, y: u32, z: u32) -> u32 {
    x ^ (y | !z)
}

/// Pads `data` with RIPEMD/MD-style little-endian length strengthening and
/// splits it into 64-byte blocks of sixteen little-endian `u32` words.
fn blocks(data: &[u8]) -> Vec<[u32; 16]> {
    let bit_len = (data.len() as u64).wrapping_mul(8);
    let mut padded = data.to_vec();
    padded.push(0x80);
    while padded.len() % BLOCK_SIZE != 56 {
        padded.push(0);
    }
    padded.extend_from_slice(&bit_len.to_le_bytes());

    padded
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut words = [0u32; 16];
            for (i, word) in words.iter_mut().enumerate() {
                *word = u32::from_le_bytes([
                    chunk[i * 4],
                    chunk[i * 4 + 1],
                    chunk[i * 4 + 2],
                    chunk[i * 4 + 3],
                ]);
            }
            words
        })
        .collect()
}

const R160_LEFT: [[usize; 16]; 5] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [7, 4, 13, 1, 10, 6, 15, 3, 12, 0, 9, 5, 2, 14, 11, 8],
    [3, 10, 14, 4, 9, 15, 8, 1, 2, 7, 0, 6, 13, 11, 5, 12],
    [1, 9, 11, 10, 0, 8, 12, 4, 13, 3, 7, 15, 14, 5, 6, 2],
    [4, 0, 5, 9, 7, 12, 2, 10, 14, 1, 3, 8, 11, 6, 15, 13],
];
const R160_RIGHT: [[usize; 16]; 5] = [
    [5, 14, 7, 0, 9, 2, 11, 4, 13, 6, 15, 8, 1, 10, 3, 12],
    [6, 11, 3, 7, 0, 13, 5, 10, 14, 15, 8, 12, 4, 9, 1, 2],
    [15, 5, 1, 3, 7, 14, 6, 9, 11, 8, 12, 2, 10, 0, 4, 13],
    [8, 6, 4, 1, 3, 11, 15, 0, 5, 12, 2, 13, 9, 7, 10, 14],
    [12, 15, 10, 4, 1, 5, 8, 7, 6, 2, 13, 14, 0, 3, 9, 11],
];
const S160_LEFT: [[u32; 16]; 5] = [
    [11, 14, 15, 12, 5, 8, 7, 9, 11, 13, 14, 15, 6, 7, 9, 8],
    [7, 6, 8, 13, 11, 9, 7, 15, 7, 12, 15, 9, 11, 7, 13, 12],
    [11, 13, 6, 7, 14, 9, 13, 15, 14, 8, 13, 6, 5, 12, 7, 5],
    [11, 12, 14, 15, 14, 15, 9, 8, 9, 14, 5, 6, 8, 6, 5, 12],
    [9, 15, 5, 11, 6, 8, 13, 12, 5, 12, 13, 14, 11, 8, 5, 6],
];
const S160_RIGHT: [[u32; 16]; 5] = [
    [8, 9, 9, 11, 13, 15, 15, 5, 7, 7, 8, 11, 14, 14, 12, 6],
    [9, 13, 15, 7, 12, 8, 9, 11, 7, 7, 12, 7, 6, 15, 13, 11],
    [9, 7, 15, 11, 8, 6, 6, 14, 12, 13, 5, 14, 13, 13, 7, 5],
    [15, 5, 8, 11, 14, 14, 6, 14, 6, 9, 12, 9, 12, 5, 15, 8],
    [8, 5, 12, 9, 12, 5, 14, 6, 8, 13, 6, 5, 15, 13, 11, 11],
];
const K160_LEFT: [u32; 5] = [0x0000_0000, 0x5a82_7999, 0x6ed9_eba1, 0x8f1b_bcdc, 0xa953_fd4e];
const K160_RIGHT: [u32; 5] = [0x50a2_8be6, 0x5c4d_d124, 0x6d70_3ef3, 0x7a6d_76e9, 0x0000_0000];

/// RIPEMD-160 of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut h: [u32; 5] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

    for block in blocks(data) {
        let (mut a, mut b, mut c, mut d, mut e) = (h[0], h[1], h[2], h[3], h[4]);
        let (mut ap, mut bp, mut cp, mut dp, mut ep) = (h[0], h[1], h[2], h[3], h[4]);

        let left_f: [fn(u32, u32, u32) -> u32; 5] = [f1, f2, f3, f4, f5];
        let right_f: [fn(u32, u32, u32) -> u32; 5] = [f5, f4, f3, f2, f1];

        for round in 0..5 {
            for i in 0..16 {
                let t = a
                    .wrapping_add(left_f[round](b, c, d))
                    .wrapping_add(block[R160_LEFT[round][i]])
                    .wrapping_add(K160_LEFT[round])
                    .rotate_left(S160_LEFT[round][i])
                    .wrapping_add(e);
                a = e;
                e = d;
                d = c.rotate_left(10);
                c = b;
                b = t;

                let tp = ap
                    .wrapping_add(right_f[round](bp, cp, dp))
                    .wrapping_add(block[R160_RIGHT[round][i]])
                    .wrapping_add(K160_RIGHT[round])
                    .rotate_left(S160_RIGHT[round][i])
                    .wrapping_add(ep);
                ap = ep;
                ep = dp;
                dp = cp.rotate_left(10);
                cp = bp;
                bp = tp;
            }
        }

        let t = h[1].wrapping_add(c).wrapping_add(dp);
        h[1] = h[2].wrapping_add(d).wrapping_add(ep);
        h[2] = h[3].wrapping_add(e).wrapping_add(ap);
        h[3] = h[4].wrapping_add(a).wrapping_add(bp);
        h[4] = h[0].wrapping_add(b).wrapping_add(cp);
        h[0] = t;
    }

    let mut out = [0u8; 20];
    for (i, word) in h.iter().enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    out
}

const R128_LEFT: [[usize; 16]; 4] = [
    R160_LEFT[0],
    R160_LEFT[1],
    R160_LEFT[2],
    R160_LEFT[3],
];
const R128_RIGHT: [[usize; 16]; 4] = [
    R160_RIGHT[0],
    R160_RIGHT[1],
    R160_RIGHT[2],
    R160_RIGHT[3],
];
const S128_LEFT: [[u32; 16]; 4] = [
    S160_LEFT[0],
    S160_LEFT[1],
    S160_LEFT[2],
    S160_LEFT[3],
];
const S128_RIGHT: [[u32; 16]; 4] = [
    S160_RIGHT[0],
    S160_RIGHT[1],
    S160_RIGHT[2],
    S160_RIGHT[3],
];
const K128_LEFT: [u32; 4] = [0x0000_0000, 0x5a82_7999, 0x6ed9_eba1, 0x8f1b_bcdc];
const K128_RIGHT: [u32; 4] = [0x50a2_8be6, 0x5c4d_d124, 0x6d70_3ef3, 0x0000_0000];

/// RIPEMD-128 of `data`.
pub fn ripemd128(data: &[u8]) -> [u8; 16] {
    let mut h: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

    for block in blocks(data) {
        let (mut a, mut b, mut c, mut d) = (h[0], h[1], h[2], h[3]);
        let (mut ap, mut bp, mut cp, mut dp) = (h[0], h[1], h[2], h[3]);

        let left_f: [fn(u32, u32, u32) -> u32; 4] = [f1, f2, f3, f4];
        let right_f: [fn(u32, u32, u32) -> u32; 4] = [f4, f3, f2, f1];

        for round in 0..4 {
            for i in 0..16 {
                let t = a
                    .wrapping_add(left_f[round](b, c, d))
                    .wrapping_add(block[R128_LEFT[round][i]])
                    .wrapping_add(K128_LEFT[round])
                    .rotate_left(S128_LEFT[round][i]);
                a = d;
                d = c;
                c = b;
                b = t;

                let tp = ap
                    .wrapping_add(right_f[round](bp, cp, dp))
                    .wrapping_add(block[R128_RIGHT[round][i]])
                    .wrapping_add(K128_RIGHT[round])
                    .rotate_left(S128_RIGHT[round][i]);
                ap = dp;
                dp = cp;
                cp = bp;
                bp = tp;
            }
        }

        let t = h[1].wrapping_add(c).wrapping_add(dp);
        h[1] = h[2].wrapping_add(d).wrapping_add(ap);
        h[2] = h[3].wrapping_add(a).wrapping_add(bp);
        h[3] = h[0].wrapping_add(b).wrapping_add(cp);
        h[0] = t;
    }

    let mut out = [0u8; 16];
    for (i, word) in h.iter().enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ripemd160_known_vectors() {
        assert_eq!(
            hex::encode(ripemd160(b"")),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn ripemd128_known_vectors() {
        assert_eq!(hex::encode(ripemd128(b"")), "cdf26213a150dc3ecb610f18f6b38b46");
        assert_eq!(hex::encode(ripemd128(b"abc")), "c14a12199c66e4ba84636b0f69144c77");
    }
}
