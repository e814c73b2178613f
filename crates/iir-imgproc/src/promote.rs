use num_traits::Float;

/// Trait mapping a sample type to the real type used while accumulating.
///
/// Repeated multiplication by fractional decay factors loses precision on narrow integer
/// types, so the recursive filters run on `Self::Real` and convert back with
/// [`RealPromote::from_real`] when writing the destination.
pub trait RealPromote: Copy + Send + Sync {
    /// The promoted accumulation type.
    type Real: Float + RealPromote + Send + Sync;

    /// Convert the sample to its promoted type.
    fn to_real(self) -> Self::Real;

    /// Convert a real value back to the sample type.
    ///
    /// Integer types round half away from zero and saturate at their bounds.
    fn from_real<R: Float>(value: R) -> Self;
}

macro_rules! impl_real_promote_int {
    ($($t:ty),*) => {
        $(
            impl RealPromote for $t {
                type Real = f64;

                fn to_real(self) -> f64 {
                    self as f64
                }

                fn from_real<R: Float>(value: R) -> Self {
                    let v = value.to_f64().unwrap_or(0.0);
                    if v <= <$t>::MIN as f64 {
                        <$t>::MIN
                    } else if v >= <$t>::MAX as f64 {
                        <$t>::MAX
                    } else {
                        // NaN saturates to zero
                        v.round() as $t
                    }
                }
            }
        )*
    };
}

impl_real_promote_int!(u8, i8, u16, i16, u32, i32);

impl RealPromote for f32 {
    type Real = f32;

    fn to_real(self) -> f32 {
        self
    }

    fn from_real<R: Float>(value: R) -> Self {
        value.to_f32().unwrap_or(f32::NAN)
    }
}

impl RealPromote for f64 {
    type Real = f64;

    fn to_real(self) -> f64 {
        self
    }

    fn from_real<R: Float>(value: R) -> Self {
        value.to_f64().unwrap_or(f64::NAN)
    }
}

/// Convert a coefficient computed in `f64` to the promoted type.
pub(crate) fn coefficient<R: Float>(value: f64) -> R {
    <R as num_traits::NumCast>::from(value).unwrap_or_else(R::nan)
}

/// Widen a promoted value to `f64` for a product with an `f64` coefficient.
pub(crate) fn widen<R: Float>(value: R) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_u8() {
        assert_eq!(200u8.to_real(), 200.0f64);
        assert_eq!(u8::from_real(254.5f64), 255);
        assert_eq!(u8::from_real(12.49f32), 12);
        assert_eq!(u8::from_real(-3.0f64), 0);
        assert_eq!(u8::from_real(1e9f64), 255);
        assert_eq!(u8::from_real(f64::NAN), 0);
    }

    #[test]
    fn test_promote_signed() {
        assert_eq!(i16::from_real(-2.5f64), -3);
        assert_eq!(i16::from_real(-40000.0f64), i16::MIN);
        assert_eq!(i32::from_real(1.5f32), 2);
        assert_eq!(i8::from_real(127.2f64), 127);
    }

    #[test]
    fn test_promote_float() {
        assert_eq!(0.25f32.to_real(), 0.25f32);
        assert_eq!(f32::from_real(0.5f64), 0.5f32);
        assert_eq!(f64::from_real(0.125f32), 0.125f64);
    }

    #[test]
    fn test_coefficient() {
        let c: f32 = coefficient(0.5);
        assert_eq!(c, 0.5f32);
        let c: f64 = coefficient(std::f64::consts::E);
        assert_eq!(c, std::f64::consts::E);
    }
}
