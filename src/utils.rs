//! Common utility functions shared across the codebase.

/// Build an index of line start byte offsets for O(log n) line lookups.
///
/// The returned vector contains byte offsets where each line starts.
/// Line 1 starts at offset 0, line 2 starts after the first '\n', etc.
pub fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Find line number for a byte offset using binary search.
///
/// Returns 1-based line number.
pub fn offset_to_line(line_index: &[usize], offset: usize) -> usize {
    match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    }
}

/// Resolve a byte offset to a 1-based `(line, column)` pair.
///
/// The column counts characters, not bytes.
pub fn offset_to_line_col(content: &str, line_index: &[usize], offset: usize) -> (usize, usize) {
    let line = offset_to_line(line_index, offset);
    let start = line_index[line - 1];
    let end = offset.min(content.len());
    let col = content.get(start..end).map_or(0, |s| s.chars().count()) + 1;
    (line, col)
}

/// Return the text of a 1-based line, without its line terminator.
pub fn line_text<'a>(content: &'a str, line_index: &[usize], line: usize) -> &'a str {
    let Some(&start) = line_index.get(line.saturating_sub(1)) else {
        return "";
    };
    let end = line_index
        .get(line)
        .map_or(content.len(), |next| next.saturating_sub(1));
    content[start..end.max(start)].trim_end_matches('\r')
}
