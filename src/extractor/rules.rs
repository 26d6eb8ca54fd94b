//! Per-tag formatting rules and the line labels they emit
//!
//! The labels written here are the only signal the SEO summarizer reads, so
//! both sides go through [`Label`]. Unlabelled lines whose text would read as
//! a label are written with a leading [`ESCAPE`].

/// Marks an unlabelled line whose text starts like a label (or like an escape)
pub const ESCAPE: char = '\\';

/// Semantic label at the start of a formatted line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    H1,
    H2,
    H3,
    Paragraph,
    Link,
    Image,
    ListItem,
    MetaDescription,
}

impl Label {
    pub const ALL: [Label; 8] = [
        Label::MetaDescription,
        Label::H1,
        Label::H2,
        Label::H3,
        Label::Paragraph,
        Label::Link,
        Label::Image,
        Label::ListItem,
    ];

    /// Literal marker written before the payload
    pub fn marker(self) -> &'static str {
        match self {
            Label::H1 => "h1:",
            Label::H2 => "h2:",
            Label::H3 => "h3:",
            Label::Paragraph => "p:",
            Label::Link => "link:",
            Label::Image => "image:",
            Label::ListItem => "-",
            Label::MetaDescription => "meta_description:",
        }
    }

    /// Split a line into its label and the remaining payload
    ///
    /// The list marker only counts when followed by a space, so text such as
    /// `-5 degrees` stays unlabelled.
    pub fn strip(line: &str) -> Option<(Label, &str)> {
        Self::ALL.into_iter().find_map(|label| {
            let rest = line.strip_prefix(label.marker())?;
            if label == Label::ListItem && !rest.starts_with(' ') {
                return None;
            }
            Some((label, rest.trim_start()))
        })
    }

    /// Read a formatted line back into its label and payload
    ///
    /// Escaped lines are unlabelled and lose the escape character.
    pub fn parse_line(line: &str) -> (Option<Label>, &str) {
        if let Some(rest) = line.strip_prefix(ESCAPE) {
            return (None, rest);
        }
        match Label::strip(line) {
            Some((label, rest)) => (Some(label), rest),
            None => (None, line),
        }
    }
}

/// How one element is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    Heading(u8),
    Paragraph,
    Link,
    Image,
    ListItem,
    MetaDescription,
    Generic,
}

/// Tags with a dedicated rule; everything else is `Generic`
const RULES: &[(&str, FormatRule)] = &[
    ("h1", FormatRule::Heading(1)),
    ("h2", FormatRule::Heading(2)),
    ("h3", FormatRule::Heading(3)),
    ("p", FormatRule::Paragraph),
    ("a", FormatRule::Link),
    ("img", FormatRule::Image),
    ("li", FormatRule::ListItem),
];

impl FormatRule {
    pub fn for_tag(tag: &str) -> Self {
        RULES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map_or(FormatRule::Generic, |(_, rule)| *rule)
    }

    pub fn label(self) -> Option<Label> {
        match self {
            FormatRule::Heading(1) => Some(Label::H1),
            FormatRule::Heading(2) => Some(Label::H2),
            FormatRule::Heading(3) => Some(Label::H3),
            FormatRule::Heading(_) => None,
            FormatRule::Paragraph => Some(Label::Paragraph),
            FormatRule::Link => Some(Label::Link),
            FormatRule::Image => Some(Label::Image),
            FormatRule::ListItem => Some(Label::ListItem),
            FormatRule::MetaDescription => Some(Label::MetaDescription),
            FormatRule::Generic => None,
        }
    }

    /// Whether the element's text already appears in an enclosing list item
    pub fn folds_into_list_item(self) -> bool {
        matches!(
            self,
            FormatRule::Heading(_) | FormatRule::Paragraph | FormatRule::Generic
        )
    }

    /// Whether the element is kept even with no text of its own
    pub fn keeps_empty(self) -> bool {
        self == FormatRule::Image
    }

    /// Tag map payload for an element
    ///
    /// `text` is the element's own text; `attr` looks up attributes, missing
    /// ones render as empty strings.
    pub fn payload<'a>(self, text: &str, attr: impl Fn(&str) -> Option<&'a str>) -> String {
        match self {
            FormatRule::Link => format!("{} ({})", text, attr("href").unwrap_or_default()),
            FormatRule::Image => format!(
                "{} ({})",
                attr("alt").unwrap_or_default(),
                attr("src").unwrap_or_default()
            ),
            _ => text.to_string(),
        }
    }

    fn terminator(self) -> &'static str {
        match self {
            FormatRule::Link | FormatRule::Image | FormatRule::ListItem => "\n",
            _ => "\n\n",
        }
    }

    /// Append the formatted line for `payload` to `out`
    pub fn render_line(self, payload: &str, out: &mut String) {
        match self.label() {
            Some(label) => {
                out.push_str(label.marker());
                out.push(' ');
            }
            None if payload.starts_with(ESCAPE) || Label::strip(payload).is_some() => {
                out.push(ESCAPE);
            }
            None => {}
        }
        out.push_str(payload);
        out.push_str(self.terminator());
    }
}
