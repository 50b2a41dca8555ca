use std::fmt::{self, Write};

/// Log-line view of user text: words joined by single spaces, at most
/// `max_chars` chars, `…` appended when cut. Formats straight into the
/// writer.
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    source: &'a str,
    max_chars: usize,
}

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut budget = self.max_chars;
        for (i, word) in self.source.split_whitespace().enumerate() {
            if i > 0 {
                if budget == 0 {
                    return f.write_char('…');
                }
                f.write_char(' ')?;
                budget -= 1;
            }
            match word.char_indices().nth(budget) {
                Some((cut, _)) => {
                    f.write_str(&word[..cut])?;
                    return f.write_char('…');
                }
                None => {
                    f.write_str(word)?;
                    budget -= word.chars().count();
                }
            }
        }
        Ok(())
    }
}

/// Shorthand for [`Preview`]
#[inline]
pub fn preview_compact(source: &str, max_chars: usize) -> Preview<'_> {
    Preview { source, max_chars }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_whitespace() {
        assert_eq!(preview_compact("a  \n\t b", 10).to_string(), "a b");
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(preview_compact("abcdef", 3).to_string(), "abc…");
        assert_eq!(preview_compact("abc", 3).to_string(), "abc");
    }

    #[test]
    fn trims_ends_and_cuts_between_words() {
        assert_eq!(preview_compact("  crash on start \n", 20).to_string(), "crash on start");
        assert_eq!(preview_compact("crash on start", 5).to_string(), "crash…");
        assert_eq!(preview_compact("crash on start", 6).to_string(), "crash …");
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(preview_compact("ééééé", 2).to_string(), "éé…");
    }
}
