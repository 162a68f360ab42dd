//! Text escaping for SpreadsheetML cell text
//!
//! Excel stores characters XML 1.0 cannot carry (control characters, and
//! `\r` which XML parsers fold into `\n`) as `_xHHHH_`. A literal `_` that
//! would otherwise start such a sequence is itself written as `_x005F_`.

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('_') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match parse_escape(rest) {
            Some(decoded) => {
                result.push(decoded);
                rest = &rest[7..];
            }
            None => {
                result.push('_');
                rest = &rest[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Parse `_xHHHH_` at the start of `s`
fn parse_escape(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || bytes[1] != b'x' || bytes[6] != b'_' {
        return None;
    }
    let hex = &s[2..6];
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Encode characters XML cannot hold as `_xHHHH_`, and protect literal
/// `_xHHHH_` runs so they decode back unchanged.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for (i, c) in s.char_indices() {
        match c {
            '_' if parse_escape(&s[i..]).is_some() => result.push_str("_x005F_"),
            '\t' | '\n' => result.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                result.push_str(&format!("_x{:04X}_", c as u32));
            }
            c => result.push(c),
        }
    }

    result
}

/// Escape the XML special characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_excel_escapes_carriage_return() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
    }

    #[test]
    fn test_decode_excel_escapes_multiple() {
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("a_b_c"), "a_b_c");
        assert_eq!(decode_excel_escapes("_x00zz_"), "_x00zz_");
    }

    #[test]
    fn test_decode_excel_escapes_uppercase() {
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
    }

    #[test]
    fn test_encode_control_characters() {
        assert_eq!(encode_excel_escapes("a\rb"), "a_x000D_b");
        assert_eq!(encode_excel_escapes("a\u{1}b"), "a_x0001_b");
        assert_eq!(encode_excel_escapes("tab\there\nnext"), "tab\there\nnext");
    }

    #[test]
    fn test_encode_protects_literal_sequences() {
        let raw = "keep _x0041_ literal";
        let encoded = encode_excel_escapes(raw);
        assert_eq!(encoded, "keep _x005F_x0041_ literal");
        assert_eq!(decode_excel_escapes(&encoded), raw);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }
}
