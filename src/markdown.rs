//! Terminal rendering for the markdown the analysis model answers with

use std::io::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::Result;

/// Print `markdown` to stdout with colors when the terminal supports them
pub fn format_markdown(markdown: &str) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    render_markdown(&mut stdout, markdown)
}

/// Render `markdown` into any color-aware writer
pub fn render_markdown<W: WriteColor>(out: &mut W, markdown: &str) -> Result<()> {
    let mut renderer = Renderer::new(out);
    for event in Parser::new_ext(markdown, Options::all()) {
        renderer.event(event)?;
    }
    renderer.out.reset()?;
    Ok(())
}

struct Renderer<'w, W: WriteColor> {
    out: &'w mut W,
    styles: Vec<ColorSpec>,
    /// One entry per open list: the next number for ordered lists
    lists: Vec<Option<u64>>,
}

impl<'w, W: WriteColor> Renderer<'w, W> {
    fn new(out: &'w mut W) -> Self {
        Self {
            out,
            styles: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Start(tag) => self.start(tag)?,
            Event::End(tag) => self.end(tag)?,
            Event::Text(text) => write!(self.out, "{}", text)?,
            Event::Code(code) => {
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(Color::Green));
                self.out.set_color(&spec)?;
                write!(self.out, "`{}`", code)?;
                self.restore()?;
            }
            Event::SoftBreak | Event::HardBreak => writeln!(self.out)?,
            Event::Rule => writeln!(self.out, "\n{}", "─".repeat(40))?,
            _ => {}
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag) -> Result<()> {
        match tag {
            Tag::Heading { level, .. } => {
                let color = match level {
                    HeadingLevel::H1 => Color::Rgb(255, 99, 71),
                    HeadingLevel::H2 => Color::Rgb(70, 130, 180),
                    _ => Color::Cyan,
                };
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(color)).set_bold(true);
                writeln!(self.out)?;
                self.push(spec)?;
            }
            Tag::Paragraph if self.lists.is_empty() => writeln!(self.out)?,
            Tag::Strong => {
                let mut spec = self.current();
                spec.set_bold(true);
                self.push(spec)?;
            }
            Tag::Emphasis => {
                let mut spec = self.current();
                spec.set_italic(true);
                self.push(spec)?;
            }
            Tag::BlockQuote(_) => {
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(Color::Yellow));
                self.push(spec)?;
                write!(self.out, "  │ ")?;
            }
            Tag::CodeBlock(kind) => {
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(Color::Green));
                writeln!(self.out)?;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        let mut lang_spec = ColorSpec::new();
                        lang_spec.set_fg(Some(Color::Blue)).set_italic(true);
                        self.out.set_color(&lang_spec)?;
                        writeln!(self.out, "[{}]", lang)?;
                    }
                }
                self.push(spec)?;
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    writeln!(self.out)?;
                }
                self.lists.push(start);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                match self.lists.last_mut() {
                    Some(Some(number)) => {
                        write!(self.out, "{}{:2}. ", indent, number)?;
                        *number += 1;
                    }
                    _ => write!(self.out, "{}• ", indent)?,
                }
            }
            Tag::Link { .. } => {
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(Color::Blue)).set_underline(true);
                self.push(spec)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, tag: TagEnd) -> Result<()> {
        match tag {
            TagEnd::Heading(_) => {
                self.pop()?;
                writeln!(self.out)?;
            }
            TagEnd::Paragraph if self.lists.is_empty() => writeln!(self.out)?,
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Link => self.pop()?,
            TagEnd::BlockQuote(_) | TagEnd::CodeBlock => {
                self.pop()?;
                writeln!(self.out)?;
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Item => writeln!(self.out)?,
            _ => {}
        }
        Ok(())
    }

    fn current(&self) -> ColorSpec {
        self.styles.last().cloned().unwrap_or_default()
    }

    fn push(&mut self, spec: ColorSpec) -> Result<()> {
        self.out.set_color(&spec)?;
        self.styles.push(spec);
        Ok(())
    }

    fn pop(&mut self) -> Result<()> {
        self.styles.pop();
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        match self.styles.last() {
            Some(spec) => self.out.set_color(spec)?,
            None => self.out.reset()?,
        }
        Ok(())
    }
}
