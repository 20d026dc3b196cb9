//! Renders the lightweight markup the model answers in (headings, bullet and
//! numbered lists, bold, italic, inline code, paragraphs) into HTML. All text
//! is escaped; model output is never passed through as raw HTML.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum List {
    Unordered,
    Ordered,
}

impl List {
    fn tag(&self) -> &'static str {
        match self {
            List::Unordered => "ul",
            List::Ordered => "ol",
        }
    }
}

#[derive(Default)]
struct Renderer {
    html: String,
    list: Option<List>,
    paragraph: Vec<String>,
}

impl Renderer {
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        self.html.push_str("<p>");
        self.html.push_str(&self.paragraph.join("<br />\n"));
        self.html.push_str("</p>\n");
        self.paragraph.clear();
    }

    fn close_list(&mut self) {
        if let Some(list) = self.list.take() {
            self.html.push_str(&format!("</{}>\n", list.tag()));
        }
    }

    fn item(&mut self, kind: List, text: &str) {
        self.flush_paragraph();
        if self.list != Some(kind) {
            self.close_list();
            self.html.push_str(&format!("<{}>\n", kind.tag()));
            self.list = Some(kind);
        }
        self.html.push_str(&format!("<li>{}</li>\n", inline(&escape(text))));
    }

    fn heading(&mut self, level: usize, text: &str) {
        self.flush_paragraph();
        self.close_list();
        self.html
            .push_str(&format!("<h{0}>{1}</h{0}>\n", level, inline(&escape(text))));
    }

    fn line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            self.flush_paragraph();
            self.close_list();
        } else if let Some((level, text)) = heading(line) {
            self.heading(level, text);
        } else if let Some(text) = bullet(line) {
            self.item(List::Unordered, text);
        } else if let Some(text) = numbered(line) {
            self.item(List::Ordered, text);
        } else {
            self.close_list();
            self.paragraph.push(inline(&escape(line)));
        }
    }

    fn finish(mut self) -> String {
        self.flush_paragraph();
        self.close_list();
        self.html
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|text| (level, text.trim()))
}

fn bullet(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

fn numbered(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ").map(str::trim)
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inline spans on already-escaped text. Unmatched markers stay literal.
fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**").filter(|end| *end > 0) {
                out.push_str("<strong>");
                out.push_str(&inline(&after[..end]));
                out.push_str("</strong>");
                rest = &after[end + 2..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`').filter(|end| *end > 0) {
                out.push_str("<code>");
                out.push_str(&after[..end]);
                out.push_str("</code>");
                rest = &after[end + 1..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('*') {
            if let Some(end) = after.find('*').filter(|end| *end > 0) {
                out.push_str("<em>");
                out.push_str(&inline(&after[..end]));
                out.push_str("</em>");
                rest = &after[end + 1..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

pub fn render_html(markup: &str) -> String {
    let mut renderer = Renderer::default();
    for line in markup.lines() {
        renderer.line(line);
    }
    renderer.finish()
}
