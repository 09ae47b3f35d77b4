//! CityHash128, version 1.0.2
//!
//! The server checksums every compressed block with this exact revision of
//! CityHash; later revisions changed the mixing and produce different
//! digests. All arithmetic wraps modulo 2^64.

const K0: u64 = 0xc3a5_c85c_97cb_3127;
const K1: u64 = 0xb492_b66f_be98_f273;
const K2: u64 = 0x9ae1_6a3b_2f90_404f;
const K3: u64 = 0xc949_d7c7_509e_6557;
const K_MUL: u64 = 0x9ddf_ea08_eb38_2d69;

#[inline]
fn fetch64(s: &[u8], pos: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&s[pos..pos + 8]);
    u64::from_le_bytes(word)
}

#[inline]
fn fetch32(s: &[u8], pos: usize) -> u64 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&s[pos..pos + 4]);
    u64::from(u32::from_le_bytes(word))
}

#[inline]
fn shift_mix(v: u64) -> u64 {
    v ^ (v >> 47)
}

#[inline]
fn hash_len16(u: u64, v: u64) -> u64 {
    let mut a = (u ^ v).wrapping_mul(K_MUL);
    a ^= a >> 47;
    let mut b = (v ^ a).wrapping_mul(K_MUL);
    b ^= b >> 47;
    b.wrapping_mul(K_MUL)
}

fn hash_len0to16(s: &[u8]) -> u64 {
    let len = s.len();
    if len > 8 {
        let a = fetch64(s, 0);
        let b = fetch64(s, len - 8);
        // len is 9..=16, so the rotation is never by zero
        return hash_len16(a, b.wrapping_add(len as u64).rotate_right(len as u32)) ^ b;
    }
    if len >= 4 {
        let a = fetch32(s, 0);
        return hash_len16((len as u64).wrapping_add(a << 3), fetch32(s, len - 4));
    }
    if len > 0 {
        let a = u64::from(s[0]);
        let b = u64::from(s[len >> 1]);
        let c = u64::from(s[len - 1]);
        let y = a + (b << 8);
        let z = len as u64 + (c << 2);
        return shift_mix(y.wrapping_mul(K2) ^ z.wrapping_mul(K3)).wrapping_mul(K2);
    }
    K2
}

/// Mixes the 32 bytes at `s[pos..]` into the seed pair `(a, b)`.
fn weak_hash_len32_with_seeds(s: &[u8], pos: usize, a: u64, b: u64) -> (u64, u64) {
    let w = fetch64(s, pos);
    let x = fetch64(s, pos + 8);
    let y = fetch64(s, pos + 16);
    let z = fetch64(s, pos + 24);

    let mut a = a.wrapping_add(w);
    let mut b = b.wrapping_add(a).wrapping_add(z).rotate_right(21);
    let c = a;
    a = a.wrapping_add(x).wrapping_add(y);
    b = b.wrapping_add(a.rotate_right(44));
    (a.wrapping_add(z), b.wrapping_add(c))
}

fn city_murmur(s: &[u8], seed: (u64, u64)) -> (u64, u64) {
    let len = s.len();
    let (mut a, mut b) = seed;
    let mut c;
    let mut d;
    if len <= 16 {
        a = shift_mix(a.wrapping_mul(K1)).wrapping_mul(K1);
        c = b.wrapping_mul(K1).wrapping_add(hash_len0to16(s));
        d = shift_mix(a.wrapping_add(if len >= 8 { fetch64(s, 0) } else { c }));
    } else {
        c = hash_len16(fetch64(s, len - 8).wrapping_add(K1), a);
        d = hash_len16(
            b.wrapping_add(len as u64),
            c.wrapping_add(fetch64(s, len - 16)),
        );
        a = a.wrapping_add(d);
        let mut pos = 0;
        let mut remaining = len - 16;
        loop {
            a ^= shift_mix(fetch64(s, pos).wrapping_mul(K1)).wrapping_mul(K1);
            a = a.wrapping_mul(K1);
            b ^= a;
            c ^= shift_mix(fetch64(s, pos + 8).wrapping_mul(K1)).wrapping_mul(K1);
            c = c.wrapping_mul(K1);
            d ^= c;
            pos += 16;
            if remaining <= 16 {
                break;
            }
            remaining -= 16;
        }
    }
    a = hash_len16(a, c);
    b = hash_len16(d, b);
    (a ^ b, hash_len16(b, a))
}

fn city_hash128_with_seed(s: &[u8], seed: (u64, u64)) -> (u64, u64) {
    let mut len = s.len();
    if len < 128 {
        return city_murmur(s, seed);
    }

    let (mut x, mut y) = seed;
    let mut z = (len as u64).wrapping_mul(K1);
    let mut v0 = (y ^ K1).rotate_right(49).wrapping_mul(K1).wrapping_add(fetch64(s, 0));
    let mut v1 = v0.rotate_right(42).wrapping_mul(K1).wrapping_add(fetch64(s, 8));
    let mut w0 = y.wrapping_add(z).rotate_right(35).wrapping_mul(K1).wrapping_add(x);
    let mut w1 = x.wrapping_add(fetch64(s, 88)).rotate_right(53).wrapping_mul(K1);

    let mut pos = 0;
    loop {
        for _ in 0..2 {
            x = x
                .wrapping_add(y)
                .wrapping_add(v0)
                .wrapping_add(fetch64(s, pos + 16))
                .rotate_right(37)
                .wrapping_mul(K1);
            y = y
                .wrapping_add(v1)
                .wrapping_add(fetch64(s, pos + 48))
                .rotate_right(42)
                .wrapping_mul(K1);
            x ^= w1;
            y ^= v0;
            z = (z ^ w0).rotate_right(33);
            (v0, v1) = weak_hash_len32_with_seeds(s, pos, v1.wrapping_mul(K1), x.wrapping_add(w0));
            (w0, w1) = weak_hash_len32_with_seeds(s, pos + 32, z.wrapping_add(w1), y);
            std::mem::swap(&mut z, &mut x);
            pos += 64;
        }
        len -= 128;
        if len < 128 {
            break;
        }
    }

    y = y.wrapping_add(w0.rotate_right(37).wrapping_mul(K0)).wrapping_add(z);
    x = x.wrapping_add(v0.wrapping_add(z).rotate_right(49).wrapping_mul(K0));

    let mut tail_done = 0;
    while tail_done < len {
        tail_done += 32;
        y = y.wrapping_sub(x).rotate_right(42).wrapping_mul(K0).wrapping_add(v1);
        w0 = w0.wrapping_add(fetch64(s, pos + len - tail_done + 16));
        x = x.rotate_right(49).wrapping_mul(K0).wrapping_add(w0);
        w0 = w0.wrapping_add(v0);
        (v0, v1) = weak_hash_len32_with_seeds(s, pos + len - tail_done, v0, v1);
    }

    x = hash_len16(x, v0);
    y = hash_len16(y, w0);
    (
        hash_len16(x.wrapping_add(v1), w1).wrapping_add(y),
        hash_len16(x.wrapping_add(w1), y.wrapping_add(v1)),
    )
}

/// CityHash128 v1.0.2 of `data`, as its low and high 64-bit halves.
pub fn city_hash128(data: &[u8]) -> [u64; 2] {
    let len = data.len();
    let (low, high) = if len >= 16 {
        city_hash128_with_seed(&data[16..], (fetch64(data, 0) ^ K3, fetch64(data, 8)))
    } else if len >= 8 {
        city_hash128_with_seed(
            &[],
            (
                fetch64(data, 0) ^ (len as u64).wrapping_mul(K0),
                fetch64(data, len - 8) ^ K1,
            ),
        )
    } else {
        city_hash128_with_seed(data, (K0, K1))
    };
    [low, high]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn block_checksums() {
        let digest = city_hash128(&hex!("82 0c000000 02000000 200102"));
        assert_eq!(digest, [0x6063_2c96_711f_aadc, 0x98b7_27c1_0f2f_f970]);
        let digest = city_hash128(&hex!("82 0b000000 01000000 1003"));
        assert_eq!(digest, [0x4919_84b3_3215_d940, 0x4a47_630c_da70_09c5]);
    }

    #[test]
    fn every_length_class() {
        let cases: &[(usize, [u64; 2])] = &[
            (0, [0x3df0_9dfc_64c0_9a2b, 0x3cb5_40c3_92e5_1e29]),
            (3, [0x3108_fa6b_1da1_6986, 0x3230_1bf0_c250_612d]),
            (4, [0x2321_e75a_ee8d_6c41, 0xcea6_b327_f605_358d]),
            (9, [0x5601_ccf1_e058_519a, 0xf851_2fca_2833_3fef]),
            (17, [0x0cd5_bb13_faea_6e4c, 0x32bf_7191_78f6_bbfe]),
            (64, [0xd412_d58e_c143_2aef, 0x5754_630c_bbd8_3214]),
            (128, [0x11d0_0b10_d669_4d31, 0x108f_b9e5_b83f_dff4]),
            (200, [0x6bfc_6588_f839_7554, 0xe370_6db4_8081_4454]),
            (300, [0xd630_6a0c_4528_ae11, 0x37c2_e51c_ab25_17ef]),
        ];
        for (len, digest) in cases {
            assert_eq!(city_hash128(&sample(*len)), *digest, "length {len}");
        }
    }
}
