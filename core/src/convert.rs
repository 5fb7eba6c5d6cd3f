//! Lenient text-to-number parsing, as SQLite applies when a text column is
//! read as a number: the longest numeric prefix wins and garbage reads as zero.

/// Parse a leading integer with C `strtol` rules and automatic radix.
///
/// Leading whitespace and one sign are skipped; `0x`/`0X` selects hex and a
/// leading `0` selects octal. Parsing stops at the first invalid digit.
/// Out-of-range values saturate, and text without digits is 0.
pub fn strtol(text: &str) -> i64 {
    let bytes = text.trim_start().as_bytes();
    let (negative, mut rest) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let radix = match rest {
        [b'0', b'x' | b'X', digit, ..] if digit.is_ascii_hexdigit() => {
            rest = &rest[2..];
            16
        }
        [b'0', ..] => 8,
        _ => 10,
    };

    let mut value: i64 = 0;
    let mut overflow = false;
    for digit in rest.iter().map_while(|b| (*b as char).to_digit(radix)) {
        let next = value.checked_mul(radix as i64).and_then(|v| if negative { v.checked_sub(digit as i64) } else { v.checked_add(digit as i64) });
        match next {
            Some(next) => value = next,
            None => {
                overflow = true;
                break;
            }
        }
    }

    match (overflow, negative) {
        (true, true) => i64::MIN,
        (true, false) => i64::MAX,
        _ => value,
    }
}

/// Parse the longest leading decimal floating point number, or 0.0 when
/// there is none.
pub fn strtod(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let integer_digits = count_digits(&bytes[end..]);
    end += integer_digits;
    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(&bytes[end + 1..]);
        if integer_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if integer_digits + fraction_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent.min(bytes.len())..]);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize { bytes.iter().take_while(|b| b.is_ascii_digit()).count() }
