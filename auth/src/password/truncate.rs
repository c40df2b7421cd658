/// Longest password prefix, in bytes, that takes part in hashing.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Cut a password down to at most [`MAX_PASSWORD_BYTES`] bytes.
///
/// The cut always lands on a UTF-8 character boundary: a multi-byte
/// character straddling the limit is dropped whole. Both the hashing and the
/// verification paths go through this function so that registration and
/// login see the same bytes.
pub fn truncate_to_limit(password: &str) -> &str {
    if password.len() <= MAX_PASSWORD_BYTES {
        return password;
    }

    let mut end = MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }

    &password[..end]
}
