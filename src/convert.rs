/*!
Conversion of raw token text into the requested semantic type.

Integer widths are bounds-checked individually: `"65536"` converts to a
`u32` but is a distinct out-of-range failure as a `u16`, not a syntax
error. The same split applies to float precision, where a literal finite in
`f64` can still overflow an `f32` request.

Booleans are deliberately absent here: a flag is presence-only, never parsed
from text, so boolean queries go through
[`Resolver::flag`][crate::Resolver::flag] instead of this trait.
*/

use core::num::IntErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The text is not a valid literal of the requested kind.
    #[error("expected {kind}, got {raw:?}")]
    Syntax { raw: String, kind: &'static str },

    /// The text is a valid literal, but does not fit the requested width
    /// or precision.
    #[error("{raw:?} is out of range for {kind}")]
    OutOfRange { raw: String, kind: &'static str },

    /// A presence-only flag was supplied with an attached value.
    #[error("this switch takes no value (got {raw:?})")]
    PresenceOnly { raw: String },
}

/**
A type a token value can resolve to.

The [`Default`] supertrait supplies the placeholder used by discovery-phase
queries, which must succeed without any real token to draw from.
*/
pub trait FromToken: Sized + Default {
    /// Name of the kind, for error messages.
    const KIND: &'static str;

    fn from_token(raw: &str) -> Result<Self, ConvertError>;
}

fn parse_integer(raw: &str, min: i128, max: i128, kind: &'static str) -> Result<i128, ConvertError> {
    let out_of_range = || ConvertError::OutOfRange {
        raw: raw.to_owned(),
        kind,
    };

    // unsigned widths reject a leading minus outright, "-0" included
    if min == 0 && raw.starts_with('-') {
        return Err(out_of_range());
    }

    let parsed: i128 = raw.parse().map_err(|err: core::num::ParseIntError| {
        match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
            _ => ConvertError::Syntax {
                raw: raw.to_owned(),
                kind,
            },
        }
    })?;

    match (min..=max).contains(&parsed) {
        true => Ok(parsed),
        false => Err(out_of_range()),
    }
}

fn parse_float(raw: &str, kind: &'static str) -> Result<f64, ConvertError> {
    let parsed: f64 = raw.parse().map_err(|_| ConvertError::Syntax {
        raw: raw.to_owned(),
        kind,
    })?;

    // f64 parsing saturates to infinity on overflow; only a literal that
    // actually spells infinity may produce it
    if parsed.is_infinite() && !spells_infinity(raw) {
        return Err(ConvertError::OutOfRange {
            raw: raw.to_owned(),
            kind,
        });
    }

    Ok(parsed)
}

fn spells_infinity(raw: &str) -> bool {
    let raw = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    raw.eq_ignore_ascii_case("inf") || raw.eq_ignore_ascii_case("infinity")
}

macro_rules! integers {
    ($($type:ty => $kind:literal,)*) => {
        $(
            impl FromToken for $type {
                const KIND: &'static str = $kind;

                #[inline]
                fn from_token(raw: &str) -> Result<Self, ConvertError> {
                    parse_integer(raw, Self::MIN as i128, Self::MAX as i128, $kind)
                        .map(|value| value as $type)
                }
            }
        )*
    };
}

integers! {
    i16 => "a 16-bit integer",
    i32 => "a 32-bit integer",
    i64 => "a 64-bit integer",
    u16 => "a 16-bit unsigned integer",
    u32 => "a 32-bit unsigned integer",
    u64 => "a 64-bit unsigned integer",
}

impl FromToken for f64 {
    const KIND: &'static str = "a number";

    #[inline]
    fn from_token(raw: &str) -> Result<Self, ConvertError> {
        parse_float(raw, Self::KIND)
    }
}

impl FromToken for f32 {
    const KIND: &'static str = "a single-precision number";

    #[inline]
    fn from_token(raw: &str) -> Result<Self, ConvertError> {
        let wide = parse_float(raw, Self::KIND)?;

        match wide.is_finite() && wide.abs() > f32::MAX as f64 {
            true => Err(ConvertError::OutOfRange {
                raw: raw.to_owned(),
                kind: Self::KIND,
            }),
            false => Ok(wide as f32),
        }
    }
}

impl FromToken for String {
    const KIND: &'static str = "a string";

    #[inline]
    fn from_token(raw: &str) -> Result<Self, ConvertError> {
        Ok(raw.to_owned())
    }
}
