use std::sync::OnceLock;

use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::render::html_escape;

/// One h2/h3 heading of a post, in document order.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct RenderedMarkdown {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

fn id_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^a-z\x{0590}-\x{05FF}0-9]+").unwrap())
}

/// Anchor id for a heading: lowercased, with every run of characters other
/// than latin letters, digits and Hebrew collapsed into `-`.
pub fn heading_id(text: &str) -> String {
    id_separator()
        .replace_all(&text.trim().to_lowercase(), "-")
        .into_owned()
}

/// Relative image sources are resolved against the post's own directory.
pub fn resolve_image_src(src: &str, image_base: &str) -> String {
    let lower = src.to_ascii_lowercase();
    let absolute = lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("data:")
        || src.starts_with('/');
    if absolute {
        src.to_string()
    } else {
        format!("{}/{}", image_base.trim_end_matches('/'), src)
    }
}

/// Heading text without the alt text of any image inside it.
fn plain_text(events: &[Event]) -> String {
    let mut text = String::new();
    let mut image_depth = 0usize;
    for event in events {
        match event {
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            Event::Text(chunk) | Event::Code(chunk) if image_depth == 0 => text.push_str(chunk),
            _ => {}
        }
    }
    text
}

fn raw_img_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap())
}

fn raw_img_src() -> &'static Regex {
    static SRC: OnceLock<Regex> = OnceLock::new();
    SRC.get_or_init(|| Regex::new(r#"(?i)(\s)src\s*=\s*"([^"]*)""#).unwrap())
}

/// Applies the image rules to `<img>` tags written as raw HTML in a post.
fn rewrite_raw_images(raw: &str, image_base: &str) -> String {
    raw_img_tag()
        .replace_all(raw, |tag: &Captures| {
            let tag = raw_img_src().replace(&tag[0], |src: &Captures| {
                format!("{}src=\"{}\"", &src[1], resolve_image_src(&src[2], image_base))
            });
            if tag.to_ascii_lowercase().contains("loading=") {
                return tag.into_owned();
            }
            let (head, close) = match tag.strip_suffix("/>") {
                Some(head) => (head, " />"),
                None => (tag.strip_suffix('>').unwrap_or(&*tag), ">"),
            };
            format!("{} loading=\"lazy\"{}", head.trim_end(), close)
        })
        .into_owned()
}

/// Consumes the events of an image up to its end tag and returns the
/// replacement `<img>`.
fn take_image<'a>(
    events: &mut impl Iterator<Item = Event<'a>>,
    dest_url: &str,
    title: &str,
    image_base: &str,
) -> Event<'a> {
    let mut alt = String::new();
    let mut depth = 0;
    for event in events.by_ref() {
        match event {
            Event::Start(Tag::Image { .. }) => depth += 1,
            Event::End(TagEnd::Image) if depth == 0 => break,
            Event::End(TagEnd::Image) => depth -= 1,
            Event::Text(chunk) | Event::Code(chunk) => alt.push_str(&chunk),
            _ => {}
        }
    }
    let src = resolve_image_src(dest_url, image_base);
    Event::InlineHtml(image_html(&src, &alt, title).into())
}

/// Image and raw HTML rewriting shared by headings and the rest of the body.
fn rewrite_inline<'a>(
    event: Event<'a>,
    events: &mut impl Iterator<Item = Event<'a>>,
    image_base: &str,
) -> Event<'a> {
    match event {
        Event::Start(Tag::Image {
            dest_url, title, ..
        }) => take_image(events, &dest_url, &title, image_base),
        Event::Html(raw) if raw.contains("<img") || raw.contains("<IMG") => {
            Event::Html(rewrite_raw_images(&raw, image_base).into())
        }
        Event::InlineHtml(raw) if raw.contains("<img") || raw.contains("<IMG") => {
            Event::InlineHtml(rewrite_raw_images(&raw, image_base).into())
        }
        other => other,
    }
}

fn code_block_html(lang: Option<&str>, code: &str) -> String {
    let class = match lang {
        Some(lang) => format!(" class=\"language-{}\"", html_escape(lang)),
        None => String::new(),
    };
    format!(
        "<pre><code{}>{}</code><button type=\"button\" class=\"copy-btn\">Copy</button></pre>\n",
        class,
        html_escape(code)
    )
}

fn image_html(src: &str, alt: &str, title: &str) -> String {
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", html_escape(title))
    };
    format!(
        "<img src=\"{}\" alt=\"{}\"{} loading=\"lazy\" />",
        html_escape(src),
        html_escape(alt),
        title
    )
}

/// Renders a post body. Headings get anchor ids and feed the table of
/// contents, images load lazily and fenced code gets a language class and a
/// copy button.
pub fn render_markdown(body: &str, image_base: &str) -> RenderedMarkdown {
    let mut events = Parser::new_ext(body, options());
    let mut out: Vec<Event> = Vec::new();
    let mut toc = Vec::new();

    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) if matches!(level, HeadingLevel::H2 | HeadingLevel::H3) => {
                let mut inner = Vec::new();
                for event in events.by_ref() {
                    if let Event::End(TagEnd::Heading(_)) = event {
                        break;
                    }
                    inner.push(event);
                }
                let text = plain_text(&inner);
                let id = match id {
                    Some(id) => id.to_string(),
                    None => heading_id(&text),
                };
                toc.push(TocEntry {
                    level: if level == HeadingLevel::H2 { 2 } else { 3 },
                    id: id.clone(),
                    text: text.trim().to_string(),
                });
                out.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(id.into()),
                    classes,
                    attrs,
                }));
                let mut inner = inner.into_iter();
                while let Some(event) = inner.next() {
                    out.push(rewrite_inline(event, &mut inner, image_base));
                }
                out.push(Event::End(TagEnd::Heading(level)));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                let mut code = String::new();
                for event in events.by_ref() {
                    match event {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(chunk) => code.push_str(&chunk),
                        _ => {}
                    }
                }
                out.push(Event::Html(code_block_html(lang.as_deref(), &code).into()));
            }
            other => out.push(rewrite_inline(other, &mut events, image_base)),
        }
    }

    let mut html_output = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut html_output, out.into_iter());
    RenderedMarkdown {
        html: html_output,
        toc,
    }
}
