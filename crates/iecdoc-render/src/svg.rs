//! Minimal SVG markup writer.

use std::fmt::Write;

/// Font stack used for all page text
pub const FONT_FAMILY: &str = "Helvetica, Arial, Liberation Sans, DejaVu Sans, sans-serif";

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Text styling
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub size: f32,
    pub bold: bool,
    pub fill: &'a str,
    pub anchor: Anchor,
}

impl<'a> TextStyle<'a> {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            bold: false,
            fill: "#1f2937",
            anchor: Anchor::Start,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn fill(mut self, fill: &'a str) -> Self {
        self.fill = fill;
        self
    }

    pub fn centered(mut self) -> Self {
        self.anchor = Anchor::Middle;
        self
    }
}

/// Accumulates SVG elements for one page
pub struct SvgWriter {
    width: f32,
    height: f32,
    body: String,
}

impl SvgWriter {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Filled and/or stroked rectangle
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: &str, stroke: Option<&str>) {
        write!(
            self.body,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}""#,
            x, y, w, h, fill
        )
        .unwrap();
        if let Some(stroke) = stroke {
            write!(self.body, r#" stroke="{}" stroke-width="0.75""#, stroke).unwrap();
        }
        self.body.push_str("/>\n");
    }

    /// Single line of text with its baseline at `y`
    pub fn text(&mut self, x: f32, y: f32, style: TextStyle<'_>, content: &str) {
        if content.is_empty() {
            return;
        }
        writeln!(
            self.body,
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
            x,
            y,
            FONT_FAMILY,
            style.size,
            if style.bold { "bold" } else { "normal" },
            style.fill,
            style.anchor.as_str(),
            escape_xml(content)
        )
        .unwrap();
    }

    /// Text centered inside a box
    pub fn text_in_box(&mut self, x: f32, y: f32, w: f32, h: f32, style: TextStyle<'_>, content: &str) {
        let baseline = y + h / 2.0 + style.size * 0.35;
        let tx = match style.anchor {
            Anchor::Start => x + 4.0,
            Anchor::Middle => x + w / 2.0,
            Anchor::End => x + w - 4.0,
        };
        self.text(tx, baseline, style, content);
    }

    /// Several lines of text starting at baseline `y`; returns the y below the block
    pub fn paragraph(&mut self, x: f32, y: f32, line_height: f32, style: TextStyle<'_>, lines: &[String]) -> f32 {
        let mut baseline = y;
        for line in lines {
            self.text(x, baseline, style, line);
            baseline += line_height;
        }
        baseline
    }

    /// Embedded raster or SVG image from a data URI
    pub fn image(&mut self, x: f32, y: f32, w: f32, h: f32, href: &str) {
        writeln!(
            self.body,
            r#"<image x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" preserveAspectRatio="xMidYMid meet" href="{}"/>"#,
            x, y, w, h, href
        )
        .unwrap();
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Extend the page downwards; never shrinks it
    pub fn grow_to(&mut self, height: f32) {
        self.height = self.height.max(height);
    }

    /// Complete SVG document
    pub fn finish(self) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                "\n",
                r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##,
                "\n{body}</svg>\n"
            ),
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters are not allowed in XML 1.0
            c if c.is_control() && c != '\n' && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

/// Greedy word wrap to at most `max_chars` characters per line
///
/// Words longer than a line are kept whole on their own line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Truncate to `max_chars`, marking the cut with an ellipsis
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
