use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// As defined in https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
///
/// The application/x-www-form-urlencoded percent-encode set contains all code points, except the ASCII alphanumeric,
/// U+002A (*), U+002D (-), U+002E (.), and U+005F (_).
///
/// Space is removed from the set here so it can be written as `+`.
const FORM_URLENCODED_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Percent-encodes `input` onto the end of `out`, writing spaces as `+`.
pub(crate) fn encode_into(out: &mut String, input: &str) {
    for chunk in percent_encoding::utf8_percent_encode(input, FORM_URLENCODED_SET) {
        if chunk.contains(' ') {
            out.extend(chunk.chars().map(|c| if c == ' ' { '+' } else { c }));
        } else {
            out.push_str(chunk);
        }
    }
}
