use owo_colors::OwoColorize;
use std::fmt;

/// A byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A message attached to a span of the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A complete diagnostic message, independent of how it is rendered
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub label: Option<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            label: None,
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// 1-based line and column of a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_text(source: &str, line: usize) -> &str {
    source.lines().nth(line - 1).unwrap_or("")
}

/// Renders diagnostics in a compiler-like layout:
///
/// ```text
/// error[E0101]: expected RParen, found end of input
///   --> script.flow:1:8
///    |
///  1 | print (1
///    |        ^ here
/// ```
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let header = match &diagnostic.code {
            Some(code) => format!("{}[{}]", diagnostic.severity, code),
            None => diagnostic.severity.to_string(),
        };
        output.push_str(&format!("{}: {}\n", self.red(&header), self.bold(&diagnostic.message)));

        if let Some(label) = &diagnostic.label {
            let (line, col) = line_col(self.source, label.span.start);
            let gutter = " ".repeat(line.to_string().len() + 1);
            output.push_str(&format!("{}{} {}:{}:{}\n", gutter, self.blue("-->"), self.file_name, line, col));
            output.push_str(&format!("{}{}\n", gutter, self.blue("|")));
            output.push_str(&format!("{} {} {}\n", self.blue(&line.to_string()), self.blue("|"), line_text(self.source, line)));

            let width = self
                .source
                .get(label.span.start..label.span.end)
                .map(|text| text.chars().count())
                .unwrap_or(1)
                .max(1);
            let marker = format!("{}{} {}", " ".repeat(col - 1), "^".repeat(width), label.message);
            output.push_str(&format!("{}{} {}\n", gutter, self.blue("|"), self.red(marker.trim_end())));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.blue("="), note));
        }

        output
    }

    fn red(&self, s: &str) -> String {
        if self.use_color {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn blue(&self, s: &str) -> String {
        if self.use_color {
            s.blue().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.use_color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}
