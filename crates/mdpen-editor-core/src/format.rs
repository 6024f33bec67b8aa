//! Markdown formatting operations.
//!
//! Each toolbar command is a `FormatAction` variant carrying a typed options
//! record. Options only supply placeholder text and parameters; fields left
//! out (or given garbage from a loosely typed caller) fall back to the
//! built-in defaults listed on each record.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use smol_str::SmolStr;

use crate::table::{EMPTY_TABLE, csv_to_table};
use crate::text_helpers::{number_lines, prefix_lines, split_lines};
use crate::transform::TextTransform;

/// Placeholder text used when nothing is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlaceholderOptions {
    pub default: Option<SmolStr>,
}

impl PlaceholderOptions {
    pub fn new(default: impl Into<SmolStr>) -> Self {
        Self {
            default: Some(default.into()),
        }
    }

    fn or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.default.as_deref().unwrap_or(fallback)
    }
}

/// Header options. Defaults: `level = 1`, `default = "Heading"`.
///
/// Levels outside `1..=6` are treated as level 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderOptions {
    pub level: Option<u8>,
    pub default: Option<SmolStr>,
}

impl HeaderOptions {
    pub fn level(level: u8) -> Self {
        Self {
            level: Some(level),
            default: None,
        }
    }

    pub fn resolved_level(&self) -> usize {
        match self.level {
            Some(level @ 1..=6) => level as usize,
            _ => 1,
        }
    }

    fn placeholder(&self) -> &str {
        self.default.as_deref().unwrap_or("Heading")
    }
}

/// Link options. Defaults: `text = "Link"`, `url = "URL"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    pub text: Option<SmolStr>,
    pub url: Option<SmolStr>,
}

impl LinkOptions {
    fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("Link")
    }

    fn url(&self) -> &str {
        self.url.as_deref().unwrap_or("URL")
    }
}

/// Image options. Defaults: `alt = ""`, `url = "Image URL"`, `title = ""`.
///
/// A selection is taken to be the image URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub alt: Option<SmolStr>,
    pub url: Option<SmolStr>,
    pub title: Option<SmolStr>,
}

impl ImageOptions {
    fn embed(&self, url: &str) -> String {
        format!(
            "![{}]({} \"{}\")",
            self.alt.as_deref().unwrap_or(""),
            url,
            self.title.as_deref().unwrap_or("")
        )
    }
}

/// Fenced code block options. Defaults: `language = "language"`,
/// `default = "Code block"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodeBlockOptions {
    pub language: Option<SmolStr>,
    pub default: Option<SmolStr>,
}

impl CodeBlockOptions {
    fn language(&self) -> &str {
        self.language.as_deref().unwrap_or("language")
    }

    fn placeholder(&self) -> &str {
        self.default.as_deref().unwrap_or("Code block")
    }
}

/// Footnote options. Defaults: `label = "1"`, `text = "Footnote text"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FootnoteOptions {
    pub label: Option<SmolStr>,
    pub text: Option<SmolStr>,
}

impl FootnoteOptions {
    fn note(&self) -> String {
        let label = self.label.as_deref().unwrap_or("1");
        let text = self.text.as_deref().unwrap_or("Footnote text");
        format!("[^{label}]\n\n[^{label}] {text}\n\n")
    }
}

/// Macro block options.
///
/// Defaults: `name = "macroname"` and `text = "macro text"` for the demo pair
/// inserted at a caret; `suffix = "Macro"` and `content = "macro content"`
/// for definitions generated from a selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MacroOptions {
    pub name: Option<SmolStr>,
    pub text: Option<SmolStr>,
    pub suffix: Option<SmolStr>,
    pub content: Option<SmolStr>,
}

impl MacroOptions {
    /// Reference plus definition, inserted as one string.
    pub fn demo_pair(&self) -> String {
        let name = self.name.as_deref().unwrap_or("macroname");
        let text = self.text.as_deref().unwrap_or("macro text");
        format!("<<<{name}>>>\n\n>>>{name}\n{text}\n<<<\n")
    }

    /// Macro name derived from selected text.
    pub fn name_for(&self, selected: &str) -> String {
        format!("{selected}{}", self.suffix.as_deref().unwrap_or("Macro"))
    }

    /// Inline reference to a macro.
    pub fn reference(&self, name: &str) -> String {
        format!("<<<{name}>>>")
    }

    /// Block definition appended to the end of the document.
    pub fn definition(&self, name: &str) -> String {
        let content = self.content.as_deref().unwrap_or("macro content");
        format!("\n\n>>>{name}\n{content}\n<<<\n")
    }
}

/// The selected text names the macro: it is replaced by a reference and the
/// definition is appended to the document.
impl TextTransform for MacroOptions {
    fn selected(&self, text: &str) -> String {
        self.reference(&self.name_for(text))
    }

    fn no_selection(&self) -> String {
        self.demo_pair()
    }

    fn appended(&self, text: &str) -> Option<String> {
        Some(self.definition(&self.name_for(text)))
    }
}

const DEFAULT_DIAGRAM: &str = concat!(
    "graph LR\n",
    "  A[Square Rect] -- Link text --> B((Circle))\n",
    "  A --> C(Round Rect)\n",
    "  B --> D{Rhombus}\n",
    "  C --> D"
);

/// Every formatting command the toolbar offers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatAction {
    Bold(PlaceholderOptions),
    Italic(PlaceholderOptions),
    Underline(PlaceholderOptions),
    Strikethrough(PlaceholderOptions),
    Highlight(PlaceholderOptions),
    Superscript(PlaceholderOptions),
    Subscript(PlaceholderOptions),
    /// Marks text as added when showing diffs.
    Inserted(PlaceholderOptions),
    /// Marks text as removed when showing diffs.
    Deleted(PlaceholderOptions),
    Header(HeaderOptions),
    Link(LinkOptions),
    Image(ImageOptions),
    InlineCode(PlaceholderOptions),
    CodeBlock(CodeBlockOptions),
    Quote(PlaceholderOptions),
    NumberedList(PlaceholderOptions),
    BulletList(PlaceholderOptions),
    Footnote(FootnoteOptions),
    HorizontalRule,
    /// CSV selection to pipe table.
    Table,
    /// Flexmark macro definition. With a selection the definition is
    /// appended at the end of the document.
    Macro(MacroOptions),
    InlineMath(PlaceholderOptions),
    BlockMath(PlaceholderOptions),
    /// Mermaid diagram block.
    Diagram(PlaceholderOptions),
}

fn options<T: DeserializeOwned + Default>(name: &str, value: &serde_json::Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        tracing::debug!(command = name, "ignoring malformed options: {e}");
        T::default()
    })
}

impl FormatAction {
    /// Shorthand for a header of the given level.
    pub fn header(level: u8) -> Self {
        Self::Header(HeaderOptions::level(level))
    }

    /// Look up a command by toolbar name, reading its options from loosely
    /// typed JSON. Unknown names return `None`; bad options use defaults.
    pub fn from_name(name: &str, value: &serde_json::Value) -> Option<Self> {
        let action = match name {
            "bold" => Self::Bold(options(name, value)),
            "italic" => Self::Italic(options(name, value)),
            "underline" => Self::Underline(options(name, value)),
            "strikethrough" => Self::Strikethrough(options(name, value)),
            "highlight" => Self::Highlight(options(name, value)),
            "superscript" => Self::Superscript(options(name, value)),
            "subscript" => Self::Subscript(options(name, value)),
            "insert" => Self::Inserted(options(name, value)),
            "delete" => Self::Deleted(options(name, value)),
            "header" => Self::Header(options(name, value)),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let mut opts: HeaderOptions = options(name, value);
                opts.level = name[1..].parse().ok();
                Self::Header(opts)
            }
            "link" => Self::Link(options(name, value)),
            "image" => Self::Image(options(name, value)),
            "code-inline" => Self::InlineCode(options(name, value)),
            "code" => Self::CodeBlock(options(name, value)),
            "quote" => Self::Quote(options(name, value)),
            "numbered-list" => Self::NumberedList(options(name, value)),
            "bullet-list" => Self::BulletList(options(name, value)),
            "footnote" => Self::Footnote(options(name, value)),
            "horizontal-rule" => Self::HorizontalRule,
            "table" => Self::Table,
            "macro" => Self::Macro(options(name, value)),
            "math-inline" => Self::InlineMath(options(name, value)),
            "math" => Self::BlockMath(options(name, value)),
            "diagram" => Self::Diagram(options(name, value)),
            _ => return None,
        };
        Some(action)
    }

    /// Toolbar name, the inverse of `from_name`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold(_) => "bold",
            Self::Italic(_) => "italic",
            Self::Underline(_) => "underline",
            Self::Strikethrough(_) => "strikethrough",
            Self::Highlight(_) => "highlight",
            Self::Superscript(_) => "superscript",
            Self::Subscript(_) => "subscript",
            Self::Inserted(_) => "insert",
            Self::Deleted(_) => "delete",
            Self::Header(_) => "header",
            Self::Link(_) => "link",
            Self::Image(_) => "image",
            Self::InlineCode(_) => "code-inline",
            Self::CodeBlock(_) => "code",
            Self::Quote(_) => "quote",
            Self::NumberedList(_) => "numbered-list",
            Self::BulletList(_) => "bullet-list",
            Self::Footnote(_) => "footnote",
            Self::HorizontalRule => "horizontal-rule",
            Self::Table => "table",
            Self::Macro(_) => "macro",
            Self::InlineMath(_) => "math-inline",
            Self::BlockMath(_) => "math",
            Self::Diagram(_) => "diagram",
        }
    }
}

fn wrap(open: &str, text: &str, close: &str) -> String {
    format!("{open}{text}{close}")
}

fn fence(info: &str, body: &str) -> String {
    format!("\n```{info}\n{body}\n```\n")
}

impl TextTransform for FormatAction {
    fn selected(&self, text: &str) -> String {
        match self {
            Self::Bold(_) => wrap("**", text, "**"),
            Self::Italic(_) => wrap("_", text, "_"),
            Self::Underline(_) => wrap("++", text, "++"),
            Self::Strikethrough(_) => wrap("~~", text, "~~"),
            Self::Highlight(_) => wrap("==", text, "=="),
            Self::Superscript(_) => wrap("^", text, "^"),
            Self::Subscript(_) => wrap("~", text, "~"),
            Self::Inserted(_) => wrap("{+", text, "+}"),
            Self::Deleted(_) => wrap("{-", text, "-}"),
            Self::Header(opts) => format!("\n{} {}\n", "#".repeat(opts.resolved_level()), text),
            Self::Link(opts) => format!("[{}]({})", text, opts.url()),
            Self::Image(opts) => opts.embed(text),
            Self::InlineCode(_) => {
                let lines = split_lines(text);
                if lines.len() == 1 {
                    wrap("`", text, "`")
                } else {
                    // Indented code block.
                    prefix_lines(&lines, "    ")
                }
            }
            Self::CodeBlock(opts) => {
                let lines = split_lines(text);
                if lines.len() == 1 {
                    fence(opts.language(), text)
                } else {
                    format!("\n```\n{}\n```\n", prefix_lines(&lines, ""))
                }
            }
            Self::Quote(_) => {
                let lines = split_lines(text);
                if lines.len() == 1 {
                    format!("\n> {text}\n")
                } else {
                    format!("\n{}", prefix_lines(&lines, "> "))
                }
            }
            Self::NumberedList(_) => {
                let lines = split_lines(text);
                if lines.len() == 1 {
                    format!("1. {text}\n")
                } else {
                    format!("{}\n", number_lines(&lines))
                }
            }
            Self::BulletList(_) => {
                let lines = split_lines(text);
                if lines.len() == 1 {
                    format!("- {text}\n")
                } else {
                    format!("{}\n", prefix_lines(&lines, "- "))
                }
            }
            Self::Footnote(opts) => format!("{text}{}", opts.note()),
            Self::HorizontalRule => format!("\n---\n{text}"),
            Self::Table => csv_to_table(text),
            Self::Macro(opts) => opts.selected(text),
            Self::InlineMath(_) => wrap("$`", text, "`$"),
            Self::BlockMath(_) => fence("math", text),
            Self::Diagram(_) => fence("mermaid", text),
        }
    }

    fn no_selection(&self) -> String {
        match self {
            Self::Bold(o) => wrap("**", o.or("bold"), "**"),
            Self::Italic(o) => wrap("_", o.or("italic"), "_"),
            Self::Underline(o) => wrap("++", o.or("underline"), "++"),
            Self::Strikethrough(o) => wrap("~~", o.or("strikethrough"), "~~"),
            Self::Highlight(o) => wrap("==", o.or("highlighted"), "=="),
            Self::Superscript(o) => wrap("^", o.or("super"), "^"),
            Self::Subscript(o) => wrap("~", o.or("sub"), "~"),
            Self::Inserted(o) => wrap("{+", o.or("inserted"), "+}"),
            Self::Deleted(o) => wrap("{-", o.or("deleted"), "-}"),
            Self::Header(opts) => format!(
                "\n{} {}\n",
                "#".repeat(opts.resolved_level()),
                opts.placeholder()
            ),
            Self::Link(opts) => format!("[{}]({})", opts.text(), opts.url()),
            Self::Image(opts) => opts.embed(opts.url.as_deref().unwrap_or("Image URL")),
            Self::InlineCode(o) => wrap("`", o.or("inline code"), "`"),
            Self::CodeBlock(opts) => fence(opts.language(), opts.placeholder()),
            Self::Quote(o) => format!("\n> {}\n", o.or("Block quote")),
            Self::NumberedList(o) => format!("1. {}\n", o.or("Numbered list item")),
            Self::BulletList(o) => format!("- {}\n", o.or("Bullet list item")),
            Self::Footnote(opts) => opts.note(),
            Self::HorizontalRule => "\n---\n".to_string(),
            Self::Table => EMPTY_TABLE.to_string(),
            Self::Macro(opts) => opts.no_selection(),
            Self::InlineMath(o) => wrap("$`", o.or("a^2 + b^2 = c^2"), "`$"),
            Self::BlockMath(o) => fence("math", o.or(r"c = \pm\sqrt{a^2 + b^2}")),
            Self::Diagram(o) => fence("mermaid", o.or(DEFAULT_DIAGRAM)),
        }
    }

    fn appended(&self, text: &str) -> Option<String> {
        match self {
            Self::Macro(opts) => opts.appended(text),
            _ => None,
        }
    }
}
