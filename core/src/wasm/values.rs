//! Numeric coercion across the boundary
//!
//! Host and module exchange plain numbers. The module decides whether a
//! coordinate is an `i32` or an `f32`; the host works in `f64` and converts
//! at the edge using the declared value types.

use wasmtime::{FuncType, Val, ValType};

/// Returns true for the four core numeric value types
pub(crate) fn is_numeric(ty: &ValType) -> bool {
    matches!(ty, ValType::I32 | ValType::I64 | ValType::F32 | ValType::F64)
}

/// Check that every parameter and result of `ty` is numeric
pub(crate) fn check_numeric(ty: &FuncType) -> Result<(), String> {
    if let Some(bad) = ty.params().find(|p| !is_numeric(p)) {
        return Err(format!("parameter of type {bad} is not numeric"));
    }
    if let Some(bad) = ty.results().find(|r| !is_numeric(r)) {
        return Err(format!("result of type {bad} is not numeric"));
    }
    Ok(())
}

/// Read a value as a number
pub(crate) fn number(val: &Val) -> f64 {
    match val {
        Val::I32(v) => *v as f64,
        Val::I64(v) => *v as f64,
        Val::F32(bits) => f32::from_bits(*bits) as f64,
        Val::F64(bits) => f64::from_bits(*bits),
        _ => 0.0,
    }
}

/// Read a value as a linear-memory offset or length
///
/// Integers are reinterpreted as unsigned so offsets above 2 GiB survive.
pub(crate) fn address(val: &Val) -> u32 {
    match val {
        Val::I32(v) => *v as u32,
        Val::I64(v) => *v as u32,
        other => {
            let n = number(other);
            if n.is_finite() && n > 0.0 {
                n.min(u32::MAX as f64) as u32
            } else {
                0
            }
        }
    }
}

/// Convert a number into a value of the declared type
pub(crate) fn to_val(ty: &ValType, n: f64) -> Option<Val> {
    match ty {
        ValType::I32 => Some(Val::I32(to_int32(n))),
        ValType::I64 => Some(Val::I64(if n.is_finite() { n.trunc() as i64 } else { 0 })),
        ValType::F32 => Some(Val::F32((n as f32).to_bits())),
        ValType::F64 => Some(Val::F64(n.to_bits())),
        _ => None,
    }
}

/// Zero value used to pre-size result buffers
pub(crate) fn zero(ty: &ValType) -> Val {
    to_val(ty, 0.0).unwrap_or(Val::I32(0))
}

/// Wrapping conversion to a 32-bit integer (NaN and infinities become 0)
fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let wrapped = n.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u64 as u32 as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int32_wraps() {
        assert_eq!(to_int32(3.9), 3);
        assert_eq!(to_int32(-3.9), -3);
        assert_eq!(to_int32(4_294_967_297.0), 1);
        assert_eq!(to_int32(2_147_483_648.0), i32::MIN);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_int32(f64::INFINITY), 0);
    }

    #[test]
    fn test_float_round_trip_through_declared_type() {
        let val = to_val(&ValType::F32, 12.5).unwrap();
        assert_eq!(number(&val), 12.5);
        let val = to_val(&ValType::I32, 12.5).unwrap();
        assert_eq!(number(&val), 12.0);
    }

    #[test]
    fn test_address_reinterprets_negative_i32() {
        assert_eq!(address(&Val::I32(-1)), u32::MAX);
        assert_eq!(address(&Val::F32((-4.0f32).to_bits())), 0);
        assert_eq!(address(&Val::F64(64.0f64.to_bits())), 64);
    }
}
