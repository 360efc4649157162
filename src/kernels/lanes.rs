//! # **Lanes Module** - *Shared Fixed-Width SIMD Plumbing*
//!
//! Lane-width constant and the horizontal reductions the intrinsic kernels
//! share. Everything here assumes 256-bit registers holding eight `i32`
//! lanes, which is what both the portable and the AVX2 strategies batch on.

/// `i32` lanes per 256-bit register.
pub const LANES: usize = 8;

/// Horizontal sum of the eight `i32` lanes.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn hsum_epi32(v: std::arch::x86_64::__m256i) -> i32 {
    use std::arch::x86_64::*;

    unsafe {
        let hi = _mm256_extracti128_si256::<1>(v);
        let lo = _mm256_castsi256_si128(v);
        let sum4 = _mm_add_epi32(lo, hi);
        let sum2 = _mm_add_epi32(sum4, _mm_unpackhi_epi64(sum4, sum4));
        let sum1 = _mm_add_epi32(sum2, _mm_shuffle_epi32::<1>(sum2));
        _mm_cvtsi128_si32(sum1)
    }
}

/// Horizontal maximum of the eight `i32` lanes.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn hmax_epi32(v: std::arch::x86_64::__m256i) -> i32 {
    use std::arch::x86_64::*;

    unsafe {
        let hi = _mm256_extracti128_si256::<1>(v);
        let lo = _mm256_castsi256_si128(v);
        let max4 = _mm_max_epi32(lo, hi);
        let max2 = _mm_max_epi32(max4, _mm_unpackhi_epi64(max4, max4));
        let max1 = _mm_max_epi32(max2, _mm_shuffle_epi32::<1>(max2));
        _mm_cvtsi128_si32(max1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_width_matches_register() {
        assert_eq!(LANES * size_of::<i32>() * 8, 256);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_horizontal_reductions() {
        use std::arch::x86_64::*;

        use crate::utils::avx2_available;

        if !avx2_available() {
            return;
        }
        unsafe {
            let v = _mm256_setr_epi32(1, 2, 3, 4, 5, 6, 7, -8);
            assert_eq!(hsum_epi32(v), 20);
            assert_eq!(hmax_epi32(v), 7);
        }
    }
}
