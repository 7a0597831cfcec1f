/// Maps a signed integer onto an unsigned one so that small magnitudes stay small.
#[inline]
pub fn encode(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`encode`].
#[inline]
pub fn decode(u: u32) -> i32 {
    ((u >> 1) as i32) ^ -((u & 1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_interleaves_positive_and_negative_values() {
        assert_eq!(encode(0), 0);
        assert_eq!(encode(-1), 1);
        assert_eq!(encode(1), 2);
        assert_eq!(encode(-2), 3);
        assert_eq!(encode(2), 4);
    }

    #[test]
    fn decode_inverts_encode_at_the_extremes() {
        for n in [i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX - 1, i32::MAX] {
            assert_eq!(decode(encode(n)), n, "round trip failed for {n}");
        }
    }

    #[test]
    fn decode_inverts_encode_over_a_dense_window() {
        for n in -70_000..70_000 {
            assert_eq!(decode(encode(n)), n);
        }
    }

    #[test]
    fn decode_inverts_encode_over_strided_full_range() {
        let mut n = i32::MIN as i64;
        while n <= i32::MAX as i64 {
            let v = n as i32;
            assert_eq!(decode(encode(v)), v);
            n += 65_521;
        }
    }
}
