//! Currency formatting utilities for TON and nanoton values
//!
//! Coin amounts on the wire are integers in nano-units (9 decimals). These
//! helpers convert to and from the decimal strings people type and read,
//! without going through floating point.

/// Nanotons per TON
pub const NANOS_PER_TON: u128 = 1_000_000_000;

const DECIMALS: usize = 9;

/// Format a nanoton amount as dual TON + nanotons display
///
/// # Examples
/// ```
/// use jetton_codec::utils::currency::format_nanos;
///
/// assert_eq!(
///     format_nanos(1_000_000_000_000),
///     "1000.000000000 TON (1000000000000 nanotons)"
/// );
/// assert_eq!(format_nanos(50_000_000), "0.050000000 TON (50000000 nanotons)");
/// ```
pub fn format_nanos(nanos: u128) -> String {
    format!(
        "{}.{:09} TON ({} nanotons)",
        nanos / NANOS_PER_TON,
        nanos % NANOS_PER_TON,
        nanos
    )
}

/// Parse a decimal TON amount into nanotons
///
/// Accepts `"1000"`, `"0.05"` and `".5"`; rejects signs, exponents, more
/// than nine decimals, and values that overflow.
///
/// # Examples
/// ```
/// use jetton_codec::utils::currency::to_nanos;
///
/// assert_eq!(to_nanos("1000"), Some(1_000_000_000_000));
/// assert_eq!(to_nanos("0.05"), Some(50_000_000));
/// assert_eq!(to_nanos("1.0000000001"), None);
/// ```
pub fn to_nanos(text: &str) -> Option<u128> {
    let text = text.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > DECIMALS || !is_digits(whole) || !is_digits(fraction) {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: u128 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = DECIMALS).parse().ok()?
    };
    whole.checked_mul(NANOS_PER_TON)?.checked_add(fraction)
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|byte| byte.is_ascii_digit())
}
