//! Encoder for PHP's native serialization format.
//!
//! The encoding is length-prefixed and type-tagged: `s:5:"Paris";`,
//! `i:60;`, `a:2:{...}`. String lengths are byte counts of the UTF-8
//! encoded content, and the same logical value always encodes to the
//! same bytes, so a decode and re-encode round trip regenerates every
//! length prefix from scratch.

use super::{PhpKey, PhpValue};

/// Serialize a value to its PHP-serialized byte representation
pub fn serialize(value: &PhpValue) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &PhpValue, out: &mut Vec<u8>) {
    match value {
        PhpValue::Null => out.extend_from_slice(b"N;"),
        PhpValue::Bool(b) => {
            out.extend_from_slice(if *b { b"b:1;" } else { b"b:0;" });
        }
        PhpValue::Int(i) => {
            out.extend_from_slice(format!("i:{};", i).as_bytes());
        }
        PhpValue::Float(f) => {
            out.extend_from_slice(format_float(*f).as_bytes());
        }
        PhpValue::Str(bytes) => write_str(bytes, out),
        PhpValue::Array(entries) => {
            out.extend_from_slice(format!("a:{}:{{", entries.len()).as_bytes());
            for (key, val) in entries {
                match key {
                    PhpKey::Int(i) => out.extend_from_slice(format!("i:{};", i).as_bytes()),
                    PhpKey::Str(bytes) => write_str(bytes, out),
                }
                write_value(val, out);
            }
            out.push(b'}');
        }
    }
}

fn write_str(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(format!("s:{}:\"", bytes.len()).as_bytes());
    out.extend_from_slice(bytes);
    out.extend_from_slice(b"\";");
}

// PHP prints INF/NAN literally and otherwise the shortest decimal that
// round-trips, which is what f64's Display produces.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "d:NAN;".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "d:INF;".to_string() } else { "d:-INF;".to_string() }
    } else {
        format!("d:{};", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(serialize(&PhpValue::Null), b"N;");
        assert_eq!(serialize(&PhpValue::Bool(true)), b"b:1;");
        assert_eq!(serialize(&PhpValue::Bool(false)), b"b:0;");
        assert_eq!(serialize(&PhpValue::Int(-42)), b"i:-42;");
        assert_eq!(serialize(&PhpValue::Float(1.5)), b"d:1.5;");
        assert_eq!(serialize(&PhpValue::Float(1.0)), b"d:1;");
    }

    #[test]
    fn test_string_length_is_byte_count() {
        // "café" is 4 characters but 5 bytes in UTF-8
        assert_eq!(serialize(&PhpValue::str("café")), "s:5:\"café\";".as_bytes());
    }

    #[test]
    fn test_reference_array_encoding() {
        let v = PhpValue::list(vec![PhpValue::str("Paris"), PhpValue::Bool(true)]);
        assert_eq!(serialize(&v), b"a:2:{i:0;s:5:\"Paris\";i:1;b:1;}");
    }

    #[test]
    fn test_string_keys() {
        let v = PhpValue::Array(vec![(PhpKey::str("type"), PhpValue::str("open_question"))]);
        assert_eq!(serialize(&v), b"a:1:{s:4:\"type\";s:13:\"open_question\";}");
    }

    #[test]
    fn test_deterministic() {
        let v = PhpValue::Array(vec![
            (PhpKey::str("b"), PhpValue::Int(2)),
            (PhpKey::str("a"), PhpValue::Int(1)),
        ]);
        // Iteration order is preserved, not sorted
        assert_eq!(serialize(&v), serialize(&v.clone()));
        assert_eq!(serialize(&v), b"a:2:{s:1:\"b\";i:2;s:1:\"a\";i:1;}");
    }
}
