//! Range checks shared by the encoder and decoder: every integer value must
//! fit its declared bit width, checked against `2^bits` (or the signed
//! equivalent) before encoding and after decoding.

use alloy_primitives::{I256, U256};

pub fn check_uint_range(value: U256, bits: u16) -> Result<(), ()> {
    if bits >= 256 {
        return Ok(());
    }
    let limit = U256::from(1u8) << bits;
    if value >= limit {
        Err(())
    } else {
        Ok(())
    }
}

pub fn check_int_range(value: I256, bits: u16) -> Result<(), ()> {
    if bits >= 256 {
        return Ok(());
    }
    let half = U256::from(1u8) << (bits - 1);
    let max = I256::from_raw(half - U256::from(1u8));
    let min = -I256::from_raw(half);
    if value > max || value < min {
        Err(())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint8_boundaries() {
        assert!(check_uint_range(U256::from(255u64), 8).is_ok());
        assert!(check_uint_range(U256::from(256u64), 8).is_err());
    }

    #[test]
    fn int8_boundaries() {
        assert!(check_int_range(I256::try_from(127i64).unwrap(), 8).is_ok());
        assert!(check_int_range(I256::try_from(128i64).unwrap(), 8).is_err());
        assert!(check_int_range(I256::try_from(-128i64).unwrap(), 8).is_ok());
        assert!(check_int_range(I256::try_from(-129i64).unwrap(), 8).is_err());
    }

    #[test]
    fn uint256_and_int256_never_overflow() {
        assert!(check_uint_range(U256::MAX, 256).is_ok());
        assert!(check_int_range(I256::MAX, 256).is_ok());
        assert!(check_int_range(I256::MIN, 256).is_ok());
    }
}
