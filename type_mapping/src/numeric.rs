//! NUMERIC decoding
//!
//! Values are kept as their exact decimal string. Binary-format values are rebuilt
//! from PostgreSQL's base-10000 digit layout, so the text matches what the server
//! itself would print.

use sqlx::error::BoxDynError;
use sqlx::postgres::{PgHasArrayType, PgTypeInfo, PgValueFormat, PgValueRef};
use sqlx::{Decode, Postgres, Type, TypeInfo};
use std::fmt::Write;

const SIGN_NEGATIVE: u16 = 0x4000;
const SIGN_NAN: u16 = 0xC000;
const SIGN_POS_INFINITY: u16 = 0xD000;
const SIGN_NEG_INFINITY: u16 = 0xF000;

/// A NUMERIC value as its exact decimal string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgNumericText(pub String);

impl Type<Postgres> for PgNumericText {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("numeric")
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        ty.name().eq_ignore_ascii_case("numeric")
    }
}

impl PgHasArrayType for PgNumericText {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_numeric")
    }
}

impl<'r> Decode<'r, Postgres> for PgNumericText {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        match value.format() {
            PgValueFormat::Text => Ok(PgNumericText(value.as_str()?.to_string())),
            PgValueFormat::Binary => numeric_to_string(value.as_bytes()?).map(PgNumericText),
        }
    }
}

/// Render the binary NUMERIC wire format: ndigits, weight, sign, dscale (each 16 bits)
/// followed by `ndigits` base-10000 digits, most significant first.
pub(crate) fn numeric_to_string(bytes: &[u8]) -> Result<String, BoxDynError> {
    let word = |i: usize| -> Result<u16, BoxDynError> {
        bytes
            .get(i * 2..i * 2 + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .ok_or_else(|| "numeric value is truncated".into())
    };

    let ndigits = word(0)? as usize;
    let weight = word(1)? as i16 as i64;
    let sign = word(2)?;
    let dscale = word(3)? as usize;

    match sign {
        SIGN_NAN => return Ok("NaN".to_string()),
        SIGN_POS_INFINITY => return Ok("Infinity".to_string()),
        SIGN_NEG_INFINITY => return Ok("-Infinity".to_string()),
        _ => {}
    }

    let digits = (0..ndigits)
        .map(|i| word(4 + i))
        .collect::<Result<Vec<_>, _>>()?;
    // Digit at position p carries 10000^(weight - p); anything outside the array is zero
    let digit_at = |p: i64| -> u16 {
        usize::try_from(p)
            .ok()
            .and_then(|p| digits.get(p).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == SIGN_NEGATIVE {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        for p in 0..=weight {
            if p == 0 {
                write!(out, "{}", digit_at(p))?;
            } else {
                write!(out, "{:04}", digit_at(p))?;
            }
        }
    }

    if dscale > 0 {
        let mut fraction = String::with_capacity(dscale + 4);
        let mut p = weight + 1;
        while fraction.len() < dscale {
            write!(fraction, "{:04}", digit_at(p))?;
            p += 1;
        }
        fraction.truncate(dscale);
        out.push('.');
        out.push_str(&fraction);
    }

    Ok(out)
}
