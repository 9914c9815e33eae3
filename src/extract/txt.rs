/// Decode a text upload as UTF-8. Invalid sequences become U+FFFD and a
/// leading byte-order mark is dropped.
pub fn read_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
