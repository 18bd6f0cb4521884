//! Filesystem-safe filenames.

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Makes `name` safe to join onto a download directory.
///
/// Path separators, NUL and other control characters become `_`; leading
/// and trailing whitespace and dots are removed so the result can neither
/// be hidden nor climb out of the directory. Truncated to 255 bytes.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
