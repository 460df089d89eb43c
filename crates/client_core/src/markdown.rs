//! Flattens assistant markdown into styled blocks a widget toolkit or a
//! terminal can draw.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    ListItem { marker: String, depth: usize },
    CodeBlock,
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub spans: Vec<Span>,
}

impl Block {
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    current: Option<Block>,
    style: SpanStyle,
    // Next ordinal per open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    in_quote: bool,
}

impl BlockBuilder {
    fn start(&mut self, kind: BlockKind) {
        self.flush();
        self.current = Some(Block {
            kind,
            spans: Vec::new(),
        });
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            if block.spans.iter().any(|s| !s.text.trim().is_empty()) {
                self.blocks.push(block);
            }
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        let default_kind = if self.in_quote {
            BlockKind::Quote
        } else {
            BlockKind::Paragraph
        };
        let block = self.current.get_or_insert_with(|| Block {
            kind: default_kind,
            spans: Vec::new(),
        });
        let style = SpanStyle {
            code: code || self.style.code,
            ..self.style.clone()
        };
        match block.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => block.spans.push(Span {
                text: text.to_string(),
                style,
            }),
        }
    }

    fn start_item(&mut self) {
        let depth = self.lists.len().saturating_sub(1);
        let marker = match self.lists.last_mut() {
            Some(Some(next)) => {
                let marker = format!("{next}.");
                *next += 1;
                marker
            }
            _ => "•".to_string(),
        };
        self.start(BlockKind::ListItem { marker, depth });
    }

    fn start_paragraph(&mut self) {
        // Loose list items wrap their text in a paragraph; keep the item block.
        let keeps_item = matches!(
            &self.current,
            Some(Block { kind: BlockKind::ListItem { .. }, spans }) if spans.is_empty()
        );
        if !keeps_item {
            let kind = if self.in_quote {
                BlockKind::Quote
            } else {
                BlockKind::Paragraph
            };
            self.start(kind);
        }
    }
}

pub fn parse(markdown: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => builder.start_paragraph(),
                Tag::Heading { level, .. } => builder.start(BlockKind::Heading(level as u8)),
                Tag::BlockQuote { .. } => {
                    builder.flush();
                    builder.in_quote = true;
                }
                Tag::CodeBlock(_) => builder.start(BlockKind::CodeBlock),
                Tag::List(first) => {
                    builder.flush();
                    builder.lists.push(first);
                }
                Tag::Item => builder.start_item(),
                Tag::Emphasis => builder.style.emphasis = true,
                Tag::Strong => builder.style.strong = true,
                Tag::Link { dest_url, .. } => builder.style.link = Some(dest_url.to_string()),
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock | TagEnd::Item => {
                    builder.flush()
                }
                TagEnd::BlockQuote { .. } => {
                    builder.flush();
                    builder.in_quote = false;
                }
                TagEnd::List(_) => {
                    builder.flush();
                    builder.lists.pop();
                }
                TagEnd::Emphasis => builder.style.emphasis = false,
                TagEnd::Strong => builder.style.strong = false,
                TagEnd::Link => builder.style.link = None,
                _ => {}
            },
            Event::Text(text) => {
                let code = matches!(
                    builder.current,
                    Some(Block {
                        kind: BlockKind::CodeBlock,
                        ..
                    })
                );
                builder.push_text(&text, code);
            }
            Event::Code(code) => builder.push_text(&code, true),
            Event::SoftBreak => builder.push_text(" ", false),
            Event::HardBreak => builder.push_text("\n", false),
            _ => {}
        }
    }

    builder.flush();
    builder.blocks
}

/// Terminal rendering: one line per block, list markers indented by depth.
pub fn to_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match &block.kind {
            BlockKind::ListItem { marker, depth } => {
                format!("{}{marker} {}", "  ".repeat(*depth), block.plain_text())
            }
            BlockKind::Quote => format!("> {}", block.plain_text()),
            _ => block.plain_text().trim_end().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
