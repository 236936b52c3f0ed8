use std::borrow::Cow;

use crate::error::{Error, Result};

#[inline(always)]
fn char_to_digit(c: u8) -> Option<u8> {
    char::from(c).to_digit(16).map(|d| d as u8)
}

/// Decodes one key or value of a querystring, applying the following:
/// - Replaces `+` with a space
/// - Decodes percent-encoded characters
/// - Converts the result to a UTF-8 string
///
/// `offset` is the position of `input` within the full querystring and is
/// only used for error reporting. Malformed escapes are an error.
pub(crate) fn decode(input: &str, offset: usize) -> Result<Cow<'_, str>> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        return Ok(Cow::Borrowed(input));
    }

    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                decoded.push(b' ');
                idx += 1;
            }
            b'%' => {
                let high = bytes.get(idx + 1).copied().and_then(char_to_digit);
                let low = bytes.get(idx + 2).copied().and_then(char_to_digit);
                let (Some(high), Some(low)) = (high, low) else {
                    let end = (idx + 3).min(bytes.len());
                    return Err(Error::parse_err(
                        format!(
                            "invalid URL escape {:?}",
                            String::from_utf8_lossy(&bytes[idx..end])
                        ),
                        offset + idx,
                    ));
                };
                decoded.push(high * 0x10 + low);
                idx += 3;
            }
            b => {
                decoded.push(b);
                idx += 1;
            }
        }
    }

    String::from_utf8(decoded)
        .map(Cow::Owned)
        .map_err(|_| Error::parse_err("decoded bytes are not valid UTF-8", offset))
}
