//! Session log rendered as HTML, most recent line first.

use std::path::PathBuf;

/// Line separator in the rendered log
pub const LINE_BREAK: &str = "<br>";

/// Escape the first occurrence of each of `&`, `<`, `>` and `"`.
///
/// Later occurrences are left untouched.
pub fn escape_first(text: &str) -> String {
    text.replacen('&', "&amp;", 1)
        .replacen('<', "&lt;", 1)
        .replacen('>', "&gt;", 1)
        .replacen('"', "&quot;", 1)
}

/// Observer notified after every append
pub trait LogView: Send {
    /// `line` is the unescaped text, `rendered` the full log after the append
    fn line_appended(&mut self, line: &str, rendered: &str);
}

/// Append-only log; grows without bound
#[derive(Debug, Clone, Default)]
pub struct Log {
    rendered: String,
    len: usize,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape `text` and prepend it with a line break
    pub fn append(&mut self, text: &str) {
        let mut rendered = escape_first(text);
        rendered.push_str(LINE_BREAK);
        rendered.push_str(&self.rendered);
        self.rendered = rendered;
        self.len += 1;
    }

    /// Rendered HTML
    pub fn render(&self) -> &str {
        &self.rendered
    }

    /// Number of appended lines
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Mirrors the rendered log into an HTML file
#[derive(Debug, Clone)]
pub struct HtmlFileView {
    path: PathBuf,
}

impl HtmlFileView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogView for HtmlFileView {
    fn line_appended(&mut self, _line: &str, rendered: &str) {
        if let Err(e) = std::fs::write(&self.path, rendered) {
            tracing::warn!("Failed to write log file '{}': {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_first_each_character() {
        // テスト項目: 4 種類の文字がそれぞれエスケープされる
        // given (前提条件):
        let text = r#"a & b < c > d " e"#;

        // when (操作):
        let escaped = escape_first(text);

        // then (期待する結果):
        assert_eq!(escaped, "a &amp; b &lt; c &gt; d &quot; e");
    }

    #[test]
    fn test_escape_first_only_first_occurrence() {
        // テスト項目: 各文字は最初の出現のみエスケープされる
        // given (前提条件):
        let text = r#"<b>&&</b> "x" "#;

        // when (操作):
        let escaped = escape_first(text);

        // then (期待する結果):
        assert_eq!(escaped, r#"&lt;b&gt;&amp;&</b> &quot;x" "#);
    }

    #[test]
    fn test_escape_first_does_not_reescape_entities() {
        // テスト項目: 生成されたエンティティの & は再度エスケープされない
        // given (前提条件):
        let text = "<&";

        // when (操作):
        let escaped = escape_first(text);

        // then (期待する結果):
        assert_eq!(escaped, "&lt;&amp;");
    }

    #[test]
    fn test_escape_first_plain_text_unchanged() {
        // テスト項目: エスケープ対象がない文字列は変化しない
        // given (前提条件):
        let text = "onmessage: hi :3";

        // when (操作):
        let escaped = escape_first(text);

        // then (期待する結果):
        assert_eq!(escaped, text);
    }

    #[test]
    fn test_append_most_recent_first() {
        // テスト項目: 最新の行が先頭に来て、古い行の相対順序は保たれる
        // given (前提条件):
        let mut log = Log::new();

        // when (操作):
        log.append("onopen");
        log.append("onmessage: a");
        log.append("onclose");

        // then (期待する結果):
        assert_eq!(log.render(), "onclose<br>onmessage: a<br>onopen<br>");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_append_escapes_line() {
        // テスト項目: 追加された行はエスケープされる
        // given (前提条件):
        let mut log = Log::new();

        // when (操作):
        log.append("onmessage: <ok>");

        // then (期待する結果):
        assert_eq!(log.render(), "onmessage: &lt;ok&gt;<br>");
    }

    #[test]
    fn test_new_log_is_empty() {
        // テスト項目: 新しいログは空である
        // given (前提条件):

        // when (操作):
        let log = Log::new();

        // then (期待する結果):
        assert!(log.is_empty());
        assert_eq!(log.render(), "");
    }

    #[test]
    fn test_html_file_view_writes_rendered_log() {
        // テスト項目: HtmlFileView が描画済みのログをファイルに書き込む
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.html");
        let mut view = HtmlFileView::new(&path);

        // when (操作):
        view.line_appended("onopen", "onopen<br>");

        // then (期待する結果):
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "onopen<br>");
    }
}
