//! Line-oriented builder for failure messages.

/// An ordered list of message lines.
///
/// Every composition rule of the failure messages lives here: indentation is
/// applied per line, empty fragments contribute no lines, and the rendered
/// text always ends with exactly one newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Message {
    lines: Vec<String>,
}

impl Message {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `text` as new lines.
    pub(crate) fn line(mut self, text: impl AsRef<str>) -> Self {
        self.lines.extend(text.as_ref().split('\n').map(str::to_owned));
        self
    }

    pub(crate) fn blank(mut self) -> Self {
        self.lines.push(String::new());
        self
    }

    /// Continue the last line with `text`.
    pub(crate) fn append(mut self, text: impl AsRef<str>) -> Self {
        match self.lines.last_mut() {
            Some(last) => last.push_str(text.as_ref()),
            None => self.lines.push(text.as_ref().to_owned()),
        }
        self
    }

    /// Append each line of `text` prefixed with `width` spaces.
    ///
    /// Trailing empty lines are dropped, so an empty `text` adds nothing.
    pub(crate) fn indented(mut self, text: impl AsRef<str>, width: usize) -> Self {
        self.lines.extend(indent(text.as_ref(), width));
        self
    }

    /// Append `open`, every item indented by two spaces, then `]`.
    ///
    /// A list without items keeps one empty line between the brackets.
    pub(crate) fn bracketed<I>(self, open: impl AsRef<str>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut message = self.append(open);
        let before = message.lines.len();
        for item in items {
            message = message.indented(item, 2);
        }
        if message.lines.len() == before {
            message = message.blank();
        }
        message.line("]")
    }

    /// Splice the lines of `other` onto the end of this message.
    pub(crate) fn extend(mut self, other: Message) -> Self {
        self.lines.extend(other.lines);
        self
    }

    pub(crate) fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Split `text` into lines prefixed with `width` spaces, dropping trailing
/// empty lines.
fn indent(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let pad = " ".repeat(width);
    lines.into_iter().map(|line| format!("{pad}{line}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_ends_with_single_newline() {
        let message = Message::new().line("a").blank().line("b");
        assert_eq!(message.render(), "a\n\nb\n");
    }

    #[test]
    fn append_continues_last_line() {
        let message = Message::new().line("expected x").append(", but no");
        assert_eq!(message.render(), "expected x, but no\n");
        assert_eq!(Message::new().append("x").render(), "x\n");
    }

    #[test]
    fn empty_fragments_add_no_lines() {
        let message = Message::new().line("1) event").indented("", 4).indented("\n\n", 4);
        assert_eq!(message.render(), "1) event\n");
    }

    #[test]
    fn indent_keeps_inner_blank_lines() {
        assert_eq!(indent("a\n\nb\n", 2), vec!["  a", "  ", "  b"]);
        assert_eq!(indent("data diff:\n-x", 4), vec!["    data diff:", "    -x"]);
    }

    #[test]
    fn bracketed_lists() {
        let message = Message::new().line("expected ").bracketed("[", ["A", "B\nC"]);
        assert_eq!(message.render(), "expected [\n  A\n  B\n  C\n]\n");

        let empty = Message::new().bracketed("list: [", Vec::<String>::new());
        assert_eq!(empty.render(), "list: [\n\n]\n");
    }

    #[test]
    fn extend_splices_lines() {
        let message = Message::new().line("a").extend(Message::new().line("b"));
        assert_eq!(message.render(), "a\nb\n");
    }
}
