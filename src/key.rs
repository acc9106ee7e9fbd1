/// Keys that can be compared against a scaled copy of another key.
///
/// Routing in a [`QuaternaryTree`](crate::QuaternaryTree) needs `<`, `==` and the two scaled
/// comparisons `key < other * 0.5` and `key < other * 2.0`. The scaled product is computed in
/// `f64`, so integer keys are widened before multiplying (`i64`/`u64` values beyond 2^53 lose
/// precision in that product, exactly as mixed integer/double arithmetic would).
pub trait Key: PartialOrd + Clone {
    /// Returns `self < other * factor`.
    fn lt_scaled(&self, other: &Self, factor: f64) -> bool;
}

macro_rules! impl_key_as_f64 {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn lt_scaled(&self, other: &Self, factor: f64) -> bool {
                    (*self as f64) < (*other as f64) * factor
                }
            }
        )*
    };
}

impl_key_as_f64!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
