use crate::{
    core::reading::format_long_date,
    render::{html_escape, render_error_page, render_page, tag_pills, SiteContext},
    types::Post,
};

fn build_post_header(ctx: &SiteContext, post: &Post) -> String {
    let title = post.meta.title().unwrap_or("Untitled");
    let subtitle = match post.meta.subtitle() {
        Some(subtitle) => format!(
            "\n    <p class=\"post-subtitle\">{}</p>",
            html_escape(subtitle)
        ),
        None => String::new(),
    };

    let mut meta_parts: Vec<String> = Vec::new();
    if let Some(date) = post.meta.date() {
        meta_parts.push(format!(
            "<time>{}</time>",
            html_escape(&format_long_date(date, ctx.prefs.lang))
        ));
    }
    meta_parts.push(format!("<span>{} min read</span>", post.minutes));
    let tags = post.meta.tags();
    if !tags.is_empty() {
        meta_parts.push(format!(
            "<span class=\"flex flex-wrap gap-2\">{}</span>",
            tag_pills(&tags)
        ));
    }

    format!(
        r#"<div id="postHeader" class="mb-8">
    <h1 class="post-title">{}</h1>{}
    <div class="post-meta">{}</div>
    <hr class="mt-7 border-slate-200 dark:border-slate-800" />
  </div>"#,
        html_escape(title),
        subtitle,
        meta_parts.join("<span>&bull;</span>"),
    )
}

fn build_toc(post: &Post) -> String {
    if post.toc.is_empty() {
        return String::new();
    }
    let items: Vec<String> = post
        .toc
        .iter()
        .map(|entry| {
            let indent = if entry.level == 3 { "12px" } else { "0" };
            format!(
                "<a href=\"#{}\" style=\"padding-inline-start: {}\">{}</a>",
                html_escape(&entry.id),
                indent,
                html_escape(&entry.text)
            )
        })
        .collect();
    format!(
        r#"<nav id="toc" class="toc" aria-label="Table of contents">
    <div id="tocItems">{}</div>
  </nav>"#,
        items.join("")
    )
}

pub fn render_post_page(ctx: &SiteContext, post: &Post) -> String {
    let title = post.meta.title().unwrap_or("Untitled");
    let main = format!(
        r#"<div id="progressbar" class="progress-bar"></div>
<main class="post-layout mx-auto px-4 py-8 max-w-4xl">
  {header}
  {toc}
  <article id="post" class="prose dark:prose-invert max-w-none">
{body}
  </article>
</main>"#,
        header = build_post_header(ctx, post),
        toc = build_toc(post),
        body = post.html,
    );
    render_page(ctx, &format!("{} – {}", title, ctx.author()), &main)
}

pub fn render_missing_slug(ctx: &SiteContext) -> String {
    render_error_page(ctx, "<p>Missing <code>?slug=</code> in the URL.</p>")
}

pub fn render_post_not_found(ctx: &SiteContext, status: u16, looked_for: &str) -> String {
    render_error_page(
        ctx,
        &format!(
            "<p>Post not found (HTTP {}).<br>Looked for: <code>content/{}</code></p>",
            status,
            html_escape(looked_for)
        ),
    )
}

pub fn render_post_failed(ctx: &SiteContext) -> String {
    render_error_page(ctx, "<p>Failed to load post.</p>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{frontmatter::parse_front_matter, markdown::render_markdown, settings::Settings},
        prefs::{Language, Preferences, Theme},
    };

    fn post(source: &str) -> Post {
        let (meta, body) = parse_front_matter(source);
        let rendered = render_markdown(body, "/content/en/posts/demo");
        Post {
            slug: "demo".to_string(),
            minutes: crate::core::reading::estimate_minutes(body, meta.minutes()),
            meta,
            html: rendered.html,
            toc: rendered.toc,
        }
    }

    fn context(settings: &Settings) -> SiteContext<'_> {
        SiteContext {
            settings,
            prefs: Preferences {
                lang: Language::En,
                theme: Theme::Light,
            },
            current: "/post?slug=demo",
            year: 2026,
            nav: None,
        }
    }

    #[test]
    fn header_shows_title_date_minutes_and_tags() {
        let settings = Settings::new();
        let page = render_post_page(
            &context(&settings),
            &post("---\ntitle: Scope <3\nsubtitle: DIY\ndate: 2024-03-05\ntags: [\"hw\"]\n---\n## Part one\n\ntext\n"),
        );
        assert!(page.contains("<h1 class=\"post-title\">Scope &lt;3</h1>"));
        assert!(page.contains("<p class=\"post-subtitle\">DIY</p>"));
        assert!(page.contains("<time>March 5, 2024</time>"));
        assert!(page.contains("<span>1 min read</span>"));
        assert!(page.contains("<span class=\"tag-pill\">hw</span>"));
        assert!(page.contains("<title>Scope &lt;3 – Ronel Herzass</title>"));
        assert!(page.contains("<a href=\"#part-one\" style=\"padding-inline-start: 0\">Part one</a>"));
        assert!(page.contains("id=\"progressbar\""));
    }

    #[test]
    fn untitled_posts_get_a_placeholder_and_no_toc() {
        let settings = Settings::new();
        let page = render_post_page(&context(&settings), &post("just text"));
        assert!(page.contains("<h1 class=\"post-title\">Untitled</h1>"));
        assert!(!page.contains("id=\"toc\""));
        assert!(!page.contains("post-subtitle"));
    }

    #[test]
    fn not_found_page_names_the_path() {
        let settings = Settings::new();
        let page = render_post_not_found(&context(&settings), 404, "en/posts/x/index.md");
        assert!(page.contains("Post not found (HTTP 404)."));
        assert!(page.contains("<code>content/en/posts/x/index.md</code>"));
    }
}
