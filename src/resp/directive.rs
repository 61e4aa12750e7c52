/// One classified response-file line.
///
/// Classification looks at the first non-whitespace character, then scans
/// for a top-level `=` to tell assignment statements from file
/// specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'line> {
    Blank,
    Comment,
    Statement,
    SearchPath(SearchPathCmd<'line>),
    Include(&'line str),
    FileSpec(&'line str),
}

/// Sub-command of a `SEARCHPATH=` directive, decoded once at
/// classification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPathCmd<'line> {
    Push,
    Pop,
    Revert,
    Replace(Vec<&'line str>),
}

const SEARCHPATH_PREFIX: &str = "SEARCHPATH=";

impl<'line> LineKind<'line> {
    /// Classify one line. `text` is expected pre-trimmed; the marker
    /// prefixes applied downstream use the same trimmed form.
    pub fn classify(text: &'line str) -> Self {
        let text = text.trim();

        if text.is_empty() {
            return Self::Blank;
        }
        if text.starts_with('#') || text.starts_with(';') {
            return Self::Comment;
        }
        if let Some(rest) = text.strip_prefix(SEARCHPATH_PREFIX) {
            return Self::SearchPath(SearchPathCmd::decode(rest));
        }
        if let Some(rest) = text.strip_prefix('@') {
            return Self::Include(rest.trim());
        }
        if is_statement(text) {
            return Self::Statement;
        }

        Self::FileSpec(text)
    }
}

impl<'line> SearchPathCmd<'line> {
    /// Decode the text after `SEARCHPATH=`. A path list splits on whichever
    /// of `|` or `;` appears first in the remainder.
    fn decode(rest: &'line str) -> Self {
        let rest = rest.trim();

        if rest.is_empty() || rest == "^" {
            return Self::Revert;
        }
        if rest.eq_ignore_ascii_case("push") {
            return Self::Push;
        }
        if rest.eq_ignore_ascii_case("pop") {
            return Self::Pop;
        }

        let elements = match rest.find(['|', ';']) {
            Some(at) => {
                let separator = rest[at..].chars().next().unwrap_or('|');
                rest.split(separator)
                    .map(str::trim)
                    .filter(|element| !element.is_empty())
                    .collect()
            }
            None => vec![rest],
        };
        Self::Replace(elements)
    }
}

/// Assignment statement scan: an identifier (`[A-Za-z_][A-Za-z0-9_]*`),
/// optionally one of `: ! ~ @`, optional whitespace, then a literal `=`.
fn is_statement(text: &str) -> bool {
    let mut chars = text.chars().peekable();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    while chars
        .peek()
        .is_some_and(|&c| c.is_ascii_alphanumeric() || c == '_')
    {
        chars.next();
    }
    if chars.peek().is_some_and(|&c| matches!(c, ':' | '!' | '~' | '@')) {
        chars.next();
    }
    while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
        chars.next();
    }

    chars.next() == Some('=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines() {
        assert_eq!(LineKind::classify(""), LineKind::Blank);
        assert_eq!(LineKind::classify("   "), LineKind::Blank);
        assert_eq!(LineKind::classify("# note"), LineKind::Comment);
        assert_eq!(LineKind::classify("; note"), LineKind::Comment);
    }

    #[test]
    fn assignment_statements() {
        assert_eq!(LineKind::classify("FOO=bar"), LineKind::Statement);
        assert_eq!(LineKind::classify("foo_2:=bar"), LineKind::Statement);
        assert_eq!(LineKind::classify("_x ~=y"), LineKind::FileSpec("_x ~=y"));
        assert_eq!(LineKind::classify("FOO = bar"), LineKind::Statement);
    }

    #[test]
    fn leading_digit_is_a_filespec() {
        assert_eq!(LineKind::classify("1x=bar"), LineKind::FileSpec("1x=bar"));
    }

    #[test]
    fn include_reference() {
        assert_eq!(LineKind::classify("@more.rsp"), LineKind::Include("more.rsp"));
        assert_eq!(LineKind::classify("@ more.rsp"), LineKind::Include("more.rsp"));
    }

    #[test]
    fn searchpath_control_forms() {
        assert_eq!(
            LineKind::classify("SEARCHPATH=push"),
            LineKind::SearchPath(SearchPathCmd::Push)
        );
        assert_eq!(
            LineKind::classify("SEARCHPATH=POP"),
            LineKind::SearchPath(SearchPathCmd::Pop)
        );
        assert_eq!(
            LineKind::classify("SEARCHPATH=^"),
            LineKind::SearchPath(SearchPathCmd::Revert)
        );
        assert_eq!(
            LineKind::classify("SEARCHPATH="),
            LineKind::SearchPath(SearchPathCmd::Revert)
        );
    }

    #[test]
    fn searchpath_list_splits_on_first_separator() {
        assert_eq!(
            LineKind::classify("SEARCHPATH=a|b|c"),
            LineKind::SearchPath(SearchPathCmd::Replace(vec!["a", "b", "c"]))
        );
        assert_eq!(
            LineKind::classify("SEARCHPATH=a;b"),
            LineKind::SearchPath(SearchPathCmd::Replace(vec!["a", "b"]))
        );
        // `;` first wins even with `|` further along
        assert_eq!(
            LineKind::classify("SEARCHPATH=a;b|c"),
            LineKind::SearchPath(SearchPathCmd::Replace(vec!["a", "b|c"]))
        );
        assert_eq!(
            LineKind::classify("SEARCHPATH=single/dir"),
            LineKind::SearchPath(SearchPathCmd::Replace(vec!["single/dir"]))
        );
    }

    #[test]
    fn searchpath_classified_before_statement_scan() {
        // matches the statement grammar too, the directive takes precedence
        assert!(matches!(
            LineKind::classify("SEARCHPATH=a|b"),
            LineKind::SearchPath(..)
        ));
    }

    #[test]
    fn plain_filespec() {
        assert_eq!(
            LineKind::classify("textures/*.png"),
            LineKind::FileSpec("textures/*.png")
        );
    }
}
