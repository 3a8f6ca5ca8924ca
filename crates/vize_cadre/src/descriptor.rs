//! SFC descriptor and the built-in block parser.
//!
//! The parser only splits a `.vue` file into its top-level blocks and reads
//! their attributes; block contents are left untouched for the compiler.

use memchr::{memchr, memchr_iter};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use vize_carton::FxHashMap;

use crate::compiler::{CompilerMessage, ParseOptions, ParseOutput};

static SLOTTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:::v-|:)slotted\(").unwrap());

/// Parsed structure of one `.vue` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcDescriptor {
    pub filename: String,
    pub source: String,
    pub template: Option<SfcTemplateBlock>,
    pub script: Option<SfcScriptBlock>,
    pub script_setup: Option<SfcScriptBlock>,
    pub styles: Vec<SfcStyleBlock>,
    pub custom_blocks: Vec<SfcCustomBlock>,
    /// Whether a scoped style targets slot content (`:slotted(...)`).
    #[serde(default)]
    pub slotted: bool,
}

impl SfcDescriptor {
    pub fn has_script(&self) -> bool {
        self.script.is_some() || self.script_setup.is_some()
    }

    pub fn has_scoped_style(&self) -> bool {
        self.styles.iter().any(|s| s.scoped)
    }

    /// Script language, preferring `<script setup>` over `<script>`.
    pub fn script_lang(&self) -> Option<&str> {
        self.script_setup
            .as_ref()
            .and_then(|s| s.lang.as_deref())
            .or_else(|| self.script.as_ref().and_then(|s| s.lang.as_deref()))
    }

    /// Whether either script block is declared `lang="ts"`.
    pub fn is_typescript(&self) -> bool {
        let is_ts = |block: &Option<SfcScriptBlock>| {
            block
                .as_ref()
                .is_some_and(|s| s.lang.as_deref() == Some("ts"))
        };
        is_ts(&self.script_setup) || is_ts(&self.script)
    }

    /// Whether the template is compiled into the setup function instead of
    /// being loaded as its own facet.
    pub fn inline_template(&self) -> bool {
        self.script_setup.is_some()
            && self
                .template
                .as_ref()
                .map_or(true, |template| template.src.is_none())
    }
}

/// Location of a block's content in the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLocation {
    /// Start offset of the content.
    pub start: usize,
    /// End offset of the content.
    pub end: usize,
    /// Line of the opening tag (1-based).
    pub start_line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcTemplateBlock {
    pub content: String,
    pub loc: BlockLocation,
    pub lang: Option<String>,
    /// External template source.
    pub src: Option<String>,
    pub attrs: FxHashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcScriptBlock {
    pub content: String,
    pub loc: BlockLocation,
    pub lang: Option<String>,
    pub src: Option<String>,
    pub setup: bool,
    pub attrs: FxHashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcStyleBlock {
    pub content: String,
    pub loc: BlockLocation,
    pub lang: Option<String>,
    pub src: Option<String>,
    pub scoped: bool,
    /// CSS module binding name (`$style` for a bare `module` attribute).
    pub module: Option<String>,
    pub attrs: FxHashMap<String, String>,
}

/// Custom block (e.g., `<i18n>`, `<docs>`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcCustomBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub content: String,
    pub loc: BlockLocation,
    pub attrs: FxHashMap<String, String>,
}

/// One raw top-level block.
struct RawBlock<'a> {
    tag: &'a str,
    attrs: FxHashMap<String, String>,
    content: &'a str,
    loc: BlockLocation,
}

enum Scan<'a> {
    Block(RawBlock<'a>, usize),
    Unclosed(&'a str),
    Skip(usize),
}

/// Split an SFC into blocks. Structural problems are reported, not fatal.
pub fn parse_descriptor(source: &str, options: &ParseOptions) -> ParseOutput {
    let mut descriptor = SfcDescriptor {
        filename: options.filename.clone(),
        source: source.to_string(),
        ..Default::default()
    };
    let mut errors = Vec::new();

    let bytes = source.as_bytes();
    let mut pos = 0;

    while let Some(offset) = memchr(b'<', &bytes[pos..]) {
        pos += offset;
        match scan_block(source, pos) {
            Scan::Skip(next) => pos = next,
            Scan::Unclosed(tag) => {
                errors.push(CompilerMessage::text(format!(
                    "Element is missing end tag: <{tag}>"
                )));
                break;
            }
            Scan::Block(block, next) => {
                pos = next;
                if let Err(message) = insert_block(&mut descriptor, block) {
                    errors.push(CompilerMessage::text(message));
                }
            }
        }
    }

    if errors.is_empty() && descriptor.template.is_none() && !descriptor.has_script() {
        errors.push(CompilerMessage::text(
            "At least one <template> or <script> is required in a single file component.",
        ));
    }

    descriptor.slotted = descriptor
        .styles
        .iter()
        .any(|s| s.scoped && SLOTTED_RE.is_match(&s.content));

    ParseOutput { descriptor, errors }
}

fn insert_block(descriptor: &mut SfcDescriptor, block: RawBlock<'_>) -> Result<(), String> {
    let RawBlock {
        tag,
        attrs,
        content,
        loc,
    } = block;
    let lang = attrs.get("lang").cloned();
    let src = attrs.get("src").cloned();

    match tag.to_ascii_lowercase().as_str() {
        "template" => {
            if descriptor.template.is_some() {
                return Err("Single file component can contain only one <template> element".into());
            }
            descriptor.template = Some(SfcTemplateBlock {
                content: content.to_string(),
                loc,
                lang,
                src,
                attrs,
            });
        }
        "script" => {
            let setup = attrs.contains_key("setup");
            let slot = if setup {
                &mut descriptor.script_setup
            } else {
                &mut descriptor.script
            };
            if slot.is_some() {
                return Err(if setup {
                    "Single file component can contain only one <script setup> element".into()
                } else {
                    "Single file component can contain only one <script> element".into()
                });
            }
            *slot = Some(SfcScriptBlock {
                content: content.to_string(),
                loc,
                lang,
                src,
                setup,
                attrs,
            });
        }
        "style" => {
            let module = attrs.get("module").map(|name| {
                if name.is_empty() {
                    "$style".to_string()
                } else {
                    name.clone()
                }
            });
            descriptor.styles.push(SfcStyleBlock {
                content: content.to_string(),
                loc,
                lang,
                src,
                scoped: attrs.contains_key("scoped"),
                module,
                attrs,
            });
        }
        _ => descriptor.custom_blocks.push(SfcCustomBlock {
            block_type: tag.to_string(),
            content: content.to_string(),
            loc,
            attrs,
        }),
    }
    Ok(())
}

/// Scan the block whose opening `<` sits at `start`.
fn scan_block(source: &str, start: usize) -> Scan<'_> {
    let bytes = source.as_bytes();
    let len = bytes.len();

    if bytes[start..].starts_with(b"<!--") {
        return match find(bytes, b"-->", start + 4) {
            Some(end) => Scan::Skip(end + 3),
            None => Scan::Skip(len),
        };
    }

    let mut pos = start + 1;
    while pos < len && is_tag_name_char(bytes[pos]) {
        pos += 1;
    }
    if pos == start + 1 {
        // `</x>`, `<!doctype>` and stray `<` at the top level carry no block.
        return Scan::Skip(start + 1);
    }
    let tag = &source[start + 1..pos];

    let (attrs, after_open, self_closing) = match parse_attrs(source, pos) {
        Some(parsed) => parsed,
        None => return Scan::Unclosed(tag),
    };
    let start_line = memchr_iter(b'\n', &bytes[..start]).count() + 1;

    if self_closing {
        let loc = BlockLocation {
            start: after_open,
            end: after_open,
            start_line,
        };
        return Scan::Block(
            RawBlock {
                tag,
                attrs,
                content: "",
                loc,
            },
            after_open,
        );
    }

    let close = if tag.eq_ignore_ascii_case("template") {
        find_template_close(bytes, after_open)
    } else {
        find_close(bytes, tag.as_bytes(), after_open)
    };

    match close {
        Some((content_end, next)) => Scan::Block(
            RawBlock {
                tag,
                attrs,
                content: &source[after_open..content_end],
                loc: BlockLocation {
                    start: after_open,
                    end: content_end,
                    start_line,
                },
            },
            next,
        ),
        None => Scan::Unclosed(tag),
    }
}

/// Parse attributes up to the end of the opening tag.
///
/// Returns the attributes, the offset right after `>` and whether the tag
/// was self-closing.
fn parse_attrs(source: &str, mut pos: usize) -> Option<(FxHashMap<String, String>, usize, bool)> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut attrs = FxHashMap::default();

    loop {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            return None;
        }
        match bytes[pos] {
            b'>' => return Some((attrs, pos + 1, false)),
            b'/' if bytes.get(pos + 1) == Some(&b'>') => return Some((attrs, pos + 2, true)),
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let name_start = pos;
        while pos < len && !matches!(bytes[pos], b'=' | b'>' | b'/') && !bytes[pos].is_ascii_whitespace()
        {
            pos += 1;
        }
        let name = &source[name_start..pos];

        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let mut value = "";
        if pos < len && bytes[pos] == b'=' {
            pos += 1;
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < len && matches!(bytes[pos], b'"' | b'\'') {
                let quote = bytes[pos];
                let value_start = pos + 1;
                let value_end = value_start + memchr(quote, &bytes[value_start..])?;
                value = &source[value_start..value_end];
                pos = value_end + 1;
            } else {
                let value_start = pos;
                while pos < len && !matches!(bytes[pos], b'>') && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                value = &source[value_start..pos];
            }
        }

        attrs.insert(name.to_string(), value.to_string());
    }
}

/// Find `</tag>` (case-insensitive). Returns (content end, offset after the tag).
fn find_close(bytes: &[u8], tag: &[u8], mut pos: usize) -> Option<(usize, usize)> {
    while let Some(offset) = memchr(b'<', &bytes[pos..]) {
        pos += offset;
        if let Some(next) = closing_tag_end(bytes, tag, pos) {
            return Some((pos, next));
        }
        pos += 1;
    }
    None
}

/// Like [`find_close`], but balances nested `<template>` elements.
fn find_template_close(bytes: &[u8], mut pos: usize) -> Option<(usize, usize)> {
    const TAG: &[u8] = b"template";
    let mut depth = 1usize;

    while let Some(offset) = memchr(b'<', &bytes[pos..]) {
        pos += offset;
        if let Some(next) = closing_tag_end(bytes, TAG, pos) {
            depth -= 1;
            if depth == 0 {
                return Some((pos, next));
            }
            pos = next;
            continue;
        }
        if opens_tag(bytes, TAG, pos) && !opening_tag_self_closes(bytes, pos) {
            depth += 1;
        }
        pos += 1;
    }
    None
}

/// If a closing tag `</tag ...>` starts at `pos`, return the offset after its `>`.
fn closing_tag_end(bytes: &[u8], tag: &[u8], pos: usize) -> Option<usize> {
    let name_start = pos + 2;
    let name_end = name_start + tag.len();
    if !bytes[pos..].starts_with(b"</")
        || name_end > bytes.len()
        || !bytes[name_start..name_end].eq_ignore_ascii_case(tag)
    {
        return None;
    }
    let mut end = name_end;
    while end < bytes.len() && bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    (bytes.get(end) == Some(&b'>')).then_some(end + 1)
}

fn opens_tag(bytes: &[u8], tag: &[u8], pos: usize) -> bool {
    let name_end = pos + 1 + tag.len();
    name_end < bytes.len()
        && bytes[pos + 1..name_end].eq_ignore_ascii_case(tag)
        && (bytes[name_end].is_ascii_whitespace() || matches!(bytes[name_end], b'>' | b'/'))
}

fn opening_tag_self_closes(bytes: &[u8], pos: usize) -> bool {
    match memchr(b'>', &bytes[pos..]) {
        Some(offset) => offset > 0 && bytes[pos + offset - 1] == b'/',
        None => false,
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

#[inline(always)]
fn is_tag_name_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_')
}
