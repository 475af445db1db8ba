/// Number of whitespace-delimited tokens in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// File-name-safe form of a book title: whitespace becomes underscores,
/// path separators, quotes and control characters are dropped.
pub fn sanitize_filename(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            '/' | '\\' | '"' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
