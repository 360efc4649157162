use std::fmt::{Debug, Display};

use num_traits::{NumCast, PrimInt, ToPrimitive};

/// Trait for types valid as dataset elements.
///
/// Useful when specifying `my_fn::<T: Element>() {}`.
///
/// Extends and constrains the *num-traits* `PrimInt` implementation to fit the
/// crate's type universe: every element is a fixed-width integer that can be
/// summed into `i64` without loss and shared freely across worker threads.
pub trait Element:
    PrimInt
    + NumCast
    + Default
    + Debug
    + Display
    + ToPrimitive
    + Send
    + Sync
    + 'static
{
    /// Lossless cast to `usize`
    fn to_usize(self) -> usize;

    /// Lossless cast from `usize`
    fn from_usize(v: usize) -> Self;

    /// Widening cast to `i64`, the crate's accumulator and result type
    fn to_i64(self) -> i64;
}

macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                #[inline(always)]
                fn to_usize(self) -> usize {
                    self as usize
                }

                #[inline(always)]
                fn from_usize(v: usize) -> Self {
                    v as $t
                }

                #[inline(always)]
                fn to_i64(self) -> i64 {
                    self as i64
                }
            }
        )*
    };
}

// 8-bit types are excluded: the generator's value range [0, 25000)
// does not fit them.
impl_element!(i16, i32, i64, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Element>(v: usize) -> usize {
        T::from_usize(v).to_usize()
    }

    #[test]
    fn test_usize_roundtrip() {
        assert_eq!(roundtrip::<i16>(24_999), 24_999);
        assert_eq!(roundtrip::<i32>(24_999), 24_999);
        assert_eq!(roundtrip::<i64>(24_999), 24_999);
        assert_eq!(roundtrip::<u16>(24_999), 24_999);
        assert_eq!(roundtrip::<u32>(24_999), 24_999);
        assert_eq!(roundtrip::<u64>(24_999), 24_999);
    }

    #[test]
    fn test_widening() {
        assert_eq!(42i32.to_i64(), 42i64);
        assert_eq!(0u16.to_i64(), 0i64);
        assert_eq!(i64::MAX.to_i64(), i64::MAX);
    }
}
