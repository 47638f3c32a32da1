use std::collections::BTreeSet;

use crate::{
    core::reading::format_short_date,
    prefs::Language,
    render::{html_escape, render_page, tag_pills, url_encode, SiteContext},
    types::{HomeContent, PostSummary, Project},
};

pub const ALL_FILTER: &str = "all";

/// What the home page shows, already loaded.
pub struct HomeView<'a> {
    pub content: &'a HomeContent,
    pub projects: &'a [Project],
    pub posts: &'a [PostSummary],
    pub tag: Option<&'a str>,
    pub query: Option<&'a str>,
}

/// `all` followed by every project tag, sorted and deduplicated.
pub fn project_filters(projects: &[Project]) -> Vec<String> {
    let unique: BTreeSet<&str> = projects
        .iter()
        .flat_map(|project| project.tags.iter().map(String::as_str))
        .collect();
    std::iter::once(ALL_FILTER.to_string())
        .chain(unique.into_iter().map(str::to_string))
        .collect()
}

pub fn filter_projects<'p>(projects: &'p [Project], tag: Option<&str>) -> Vec<&'p Project> {
    match tag.filter(|tag| !tag.is_empty() && *tag != ALL_FILTER) {
        Some(tag) => projects
            .iter()
            .filter(|project| project.tags.iter().any(|t| t == tag))
            .collect(),
        None => projects.iter().collect(),
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn build_hero(ctx: &SiteContext, content: &HomeContent) -> String {
    let settings = ctx.settings;
    format!(
        r##"<section class="section">
    <div class="max-container grid-2">
      <div>
        <h1 id="heroTitle" class="hero-title">{title}</h1>
        <p id="heroSubtitle" class="hero-subtitle">{subtitle}</p>
        <div class="hero-actions">
          <a id="ctaProjects" href="#projects" class="btn">{cta}</a>
          <a href="#blog" class="btn-outline">{blog}</a>
          <a href="{github}" class="btn-outline" target="_blank" rel="noopener">GitHub</a>
          <a href="{linkedin}" class="btn-outline" target="_blank" rel="noopener">LinkedIn</a>
        </div>
      </div>
      <div>
        <div class="card">
          <img alt="Electronics lab desk with instruments" src="{image}" loading="lazy" />
        </div>
      </div>
    </div>
  </section>"##,
        title = content.hero_title,
        subtitle = html_escape(&content.hero_subtitle),
        cta = html_escape(&content.cta_projects),
        blog = html_escape(&content.nav.blog),
        github = html_escape(&settings.github_url.value),
        linkedin = html_escape(&settings.linkedin_url.value),
        image = html_escape(&settings.hero_image_url.value),
    )
}

fn build_project_card(project: &Project) -> String {
    format!(
        r#"<article class="card group" data-tags="{tags_attr}">
        <a href="{link}" target="_blank" rel="noopener" class="card-link">
          <img src="{image}" alt="{title}" loading="lazy" class="card-img"/>
          <div class="card-body">
            <h3 class="card-title">{title}</h3>
            <p class="card-summary">{summary}</p>
            <div class="card-tags">{pills}</div>
          </div>
        </a>
      </article>"#,
        tags_attr = html_escape(&project.tags.join(" ")),
        link = html_escape(project.link()),
        image = html_escape(&project.image),
        title = html_escape(&project.title),
        summary = html_escape(&project.summary),
        pills = tag_pills(&project.tags),
    )
}

fn build_projects(ctx: &SiteContext, view: &HomeView) -> String {
    let lang = ctx.prefs.lang.code();
    let active = view.tag.filter(|tag| !tag.is_empty()).unwrap_or(ALL_FILTER);
    let filters: Vec<String> = project_filters(view.projects)
        .iter()
        .map(|filter| {
            let class = if filter == active {
                "btn-outline text-sm active-filter"
            } else {
                "btn-outline text-sm"
            };
            format!(
                "<a class=\"{}\" data-filter=\"{}\" href=\"/?lang={}&amp;tag={}#projects\">{}</a>",
                class,
                html_escape(filter),
                lang,
                url_encode(filter),
                html_escape(&capitalize(filter))
            )
        })
        .collect();
    let cards: Vec<String> = filter_projects(view.projects, view.tag)
        .into_iter()
        .map(build_project_card)
        .collect();

    format!(
        r#"<section id="projects" class="section border-t">
    <div class="max-container">
      <div class="section-header">
        <div>
          <h2 id="projectsTitle" class="section-header-title">{title}</h2>
          <p id="projectsSubtitle" class="section-header-subtitle">{subtitle}</p>
        </div>
        <div class="hero-actions">{filters}</div>
      </div>
      <div id="projectGrid" class="card-grid mt-8">
      {cards}
      </div>
      <div class="mt-8 text-sm section-header-subtitle">
        More on <a class="footer-link" href="{github}" target="_blank" rel="noopener">GitHub</a>.
      </div>
    </div>
  </section>"#,
        title = html_escape(&view.content.projects_title),
        subtitle = html_escape(&view.content.projects_subtitle),
        filters = filters.join(""),
        cards = cards.join("\n      "),
        github = html_escape(&ctx.settings.github_url.value),
    )
}

pub fn build_post_card(post: &PostSummary, lang: Language) -> String {
    let date = post
        .date
        .as_deref()
        .map(|date| format_short_date(date, lang))
        .unwrap_or_default();
    let minutes = match post.minutes {
        Some(minutes) => format!(" · {} {}", minutes, lang.minutes_unit()),
        None => String::new(),
    };
    let title = post.title.as_deref().unwrap_or("Untitled");
    let image = match &post.image {
        Some(image) => format!(
            "\n          <img class=\"card-img\" src=\"{}\" alt=\"{}\" loading=\"lazy\"/>",
            html_escape(image),
            html_escape(post.title.as_deref().unwrap_or(""))
        ),
        None => String::new(),
    };
    let excerpt = match &post.excerpt {
        Some(excerpt) => format!(
            "\n            <p class=\"card-summary opacity-80 mt-1\">{}</p>",
            html_escape(excerpt)
        ),
        None => String::new(),
    };

    format!(
        r#"<article class="card group" data-tags="{tags_attr}">
        <a class="card-link" href="/post?lang={lang}&amp;slug={slug}">{image}
          <div class="card-body">
            <div class="text-sm opacity-70">{date}{minutes}</div>
            <h3 class="card-title">{title}</h3>{excerpt}
            <div class="mt-3 flex items-center justify-between">
              <div class="flex gap-2">{pills}</div>
            </div>
          </div>
        </a>
      </article>"#,
        tags_attr = html_escape(&post.tags.join(" ")),
        lang = lang.code(),
        slug = url_encode(&post.slug),
        image = image,
        date = html_escape(&date),
        minutes = html_escape(&minutes),
        title = html_escape(title),
        excerpt = excerpt,
        pills = tag_pills(&post.tags),
    )
}

fn build_blog(ctx: &SiteContext, view: &HomeView) -> String {
    let lang = ctx.prefs.lang;
    let query = view.query.unwrap_or("");
    let cards: Vec<String> = view
        .posts
        .iter()
        .filter(|post| post.matches_query(query))
        .map(|post| build_post_card(post, lang))
        .collect();
    let list = if cards.is_empty() {
        "<p class=\"opacity-70\">No posts found.</p>".to_string()
    } else {
        cards.join("\n      ")
    };

    format!(
        r#"<section id="blog" class="section border-t">
    <div class="max-container">
      <div class="section-header">
        <div>
          <h2 id="blogTitle" class="section-header-title">{title}</h2>
          <p id="blogSubtitle" class="section-header-subtitle">{subtitle}</p>
        </div>
        <form method="get" action="/#blog">
          <input type="hidden" name="lang" value="{lang}" />
          <input type="search" name="q" value="{query}" placeholder="Search posts…" class="input w-60 text-sm" aria-label="Search posts" />
        </form>
      </div>
      <div id="postList" class="card-grid mt-8">
      {list}
      </div>
    </div>
  </section>"#,
        title = html_escape(&view.content.blog_title),
        subtitle = html_escape(&view.content.blog_subtitle),
        lang = lang.code(),
        query = html_escape(query),
        list = list,
    )
}

fn build_about(content: &HomeContent) -> String {
    let paragraphs: Vec<String> = content
        .about_text
        .iter()
        .map(|paragraph| format!("<p>{}</p>", html_escape(paragraph)))
        .collect();
    format!(
        r#"<section id="about" class="section border-t">
    <div class="max-container">
      <div class="section-header">
        <h2 id="aboutTitle" class="section-header-title">{}</h2>
      </div>
      <div id="aboutText" class="mt-4 space-y-4">{}</div>
    </div>
  </section>"#,
        html_escape(&content.about_title),
        paragraphs.join("")
    )
}

fn build_contact(ctx: &SiteContext, content: &HomeContent) -> String {
    let settings = ctx.settings;
    let title = content.contact_title.as_deref().unwrap_or("Connect With Me");
    format!(
        r#"<section id="contact" class="section border-t">
    <div class="max-container text-center">
      <h2 id="contactTitle" class="section-header-title mb-4">{title}</h2>
      <p class="mb-6 text-gray-600">I'm always open to new projects, collaborations, and ideas.</p>
      <div class="hero-actions">
        <a href="mailto:{email}" class="btn">Email</a>
        <button id="copyEmail" type="button" class="btn-outline" data-email="{email}" title="Copy email" aria-label="Copy email">
          <span class="material-symbols-outlined" aria-hidden="true">content_copy</span>
        </button>
        <a href="{linkedin}" class="btn" target="_blank" rel="noopener">LinkedIn</a>
        <a href="{github}" class="btn" target="_blank" rel="noopener">GitHub</a>
      </div>
    </div>
  </section>"#,
        title = html_escape(title),
        email = html_escape(&settings.contact_email.value),
        linkedin = html_escape(&settings.linkedin_url.value),
        github = html_escape(&settings.github_url.value),
    )
}

pub fn render_home_page(ctx: &SiteContext, view: &HomeView) -> String {
    let main = format!(
        "<main id=\"home\">\n  {}\n  {}\n  {}\n  {}\n  {}\n</main>",
        build_hero(ctx, view.content),
        build_projects(ctx, view),
        build_blog(ctx, view),
        build_about(view.content),
        build_contact(ctx, view.content),
    );
    render_page(ctx, ctx.author(), &main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::settings::Settings,
        prefs::{Preferences, Theme},
    };

    fn project(title: &str, tags: &[&str]) -> Project {
        Project {
            title: title.to_string(),
            summary: format!("{} summary", title),
            image: format!("/img/{}.png", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            links: None,
        }
    }

    fn summary(slug: &str, title: Option<&str>) -> PostSummary {
        PostSummary {
            slug: slug.to_string(),
            title: title.map(str::to_string),
            date: Some("2024-03-05".to_string()),
            minutes: Some(4),
            excerpt: Some("An excerpt".to_string()),
            image: None,
            tags: vec!["rust".to_string()],
        }
    }

    fn content() -> HomeContent {
        HomeContent {
            hero_title: "Hi, I'm <span class=\"accent\">Ronel</span>".to_string(),
            projects_title: "Projects".to_string(),
            blog_title: "Blog".to_string(),
            about_title: "About".to_string(),
            about_text: vec!["First".to_string(), "Second & last".to_string()],
            ..HomeContent::default()
        }
    }

    fn context(settings: &Settings, lang: Language) -> SiteContext<'_> {
        SiteContext {
            settings,
            prefs: Preferences {
                lang,
                theme: Theme::System,
            },
            current: "/",
            year: 2026,
            nav: None,
        }
    }

    #[test]
    fn filters_are_all_plus_sorted_unique_tags() {
        let projects = vec![project("a", &["rust", "fpga"]), project("b", &["fpga", "c"])];
        assert_eq!(project_filters(&projects), vec!["all", "c", "fpga", "rust"]);
    }

    #[test]
    fn tag_filter_selects_matching_projects() {
        let projects = vec![project("a", &["rust"]), project("b", &["fpga"])];
        assert_eq!(filter_projects(&projects, Some("fpga")).len(), 1);
        assert_eq!(filter_projects(&projects, Some("all")).len(), 2);
        assert_eq!(filter_projects(&projects, None).len(), 2);
        assert!(filter_projects(&projects, Some("go")).is_empty());
    }

    #[test]
    fn filter_labels_are_capitalized() {
        assert_eq!(capitalize("all"), "All");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn post_card_links_and_formats() {
        let card = build_post_card(&summary("my post", Some("Hello")), Language::En);
        assert!(card.contains("href=\"/post?lang=en&amp;slug=my%20post\""));
        assert!(card.contains("Mar 5, 2024 · 4 min"));
        assert!(card.contains("<h3 class=\"card-title\">Hello</h3>"));
        assert!(!card.contains("card-img"));
    }

    #[test]
    fn hebrew_cards_use_hebrew_minutes() {
        let card = build_post_card(&summary("p", None), Language::He);
        assert!(card.contains("4 דק'"));
        assert!(card.contains("Untitled"));
    }

    #[test]
    fn home_renders_every_section() {
        let settings = Settings::new();
        let projects = vec![project("scope", &["hw"])];
        let posts = vec![summary("p", Some("Post"))];
        let content = content();
        let view = HomeView {
            content: &content,
            projects: &projects,
            posts: &posts,
            tag: None,
            query: None,
        };
        let page = render_home_page(&context(&settings, Language::En), &view);
        assert!(page.contains("<span class=\"accent\">Ronel</span>"));
        for id in ["projects", "blog", "about", "contact"] {
            assert!(page.contains(&format!("<section id=\"{}\"", id)));
        }
        assert!(page.contains("<p>Second &amp; last</p>"));
        assert!(page.contains("btn-outline text-sm active-filter\" data-filter=\"all\""));
        assert!(page.contains("Connect With Me"));
        assert!(page.contains("data-email=\"ronelherzass@gmail.com\" title=\"Copy email\""));
        assert!(page.contains(
            "<img alt=\"Electronics lab desk with instruments\" src=\"https://images.unsplash.com/photo-1558494949-ef010cbdcc31?q=80&amp;w=1200&amp;auto=format&amp;fit=crop\" loading=\"lazy\" />"
        ));
    }

    #[test]
    fn search_without_hits_says_so() {
        let settings = Settings::new();
        let content = content();
        let posts = vec![summary("p", Some("Post"))];
        let view = HomeView {
            content: &content,
            projects: &[],
            posts: &posts,
            tag: None,
            query: Some("nothing like this"),
        };
        let page = render_home_page(&context(&settings, Language::En), &view);
        assert!(page.contains("No posts found."));
        assert!(page.contains("value=\"nothing like this\""));
    }
}
