pub mod assets;
pub mod home;
pub mod legal;
pub mod post;

use chrono::Datelike;

use crate::{
    core::settings::Settings,
    prefs::{with_lang_param, Preferences},
    types::Nav,
};

/// Everything a page needs besides its own content.
#[derive(Clone, Copy, Debug)]
pub struct SiteContext<'a> {
    pub settings: &'a Settings,
    pub prefs: Preferences,
    /// Path and query of the current request, used as the toggles' return target.
    pub current: &'a str,
    pub year: i32,
    /// Translated section names from `{lang}/index.json`, when it was loaded.
    pub nav: Option<&'a Nav>,
}

impl<'a> SiteContext<'a> {
    pub fn new(settings: &'a Settings, prefs: Preferences, current: &'a str) -> Self {
        SiteContext {
            settings,
            prefs,
            current,
            year: chrono::Local::now().year(),
            nav: None,
        }
    }

    pub fn with_nav(self, nav: &'a Nav) -> Self {
        SiteContext {
            nav: Some(nav),
            ..self
        }
    }

    /// `(anchor, label)` for each home section, English where no
    /// translation is available.
    pub fn nav_links(&self) -> [(&'static str, &'a str); 4] {
        [
            ("projects", nav_label(self.nav, |nav| &nav.projects, "Projects")),
            ("blog", nav_label(self.nav, |nav| &nav.blog, "Blog")),
            ("about", nav_label(self.nav, |nav| &nav.about, "About")),
            ("contact", nav_label(self.nav, |nav| &nav.contact, "Contact")),
        ]
    }

    pub fn author(&self) -> &str {
        &self.settings.author.value
    }
}

fn nav_label<'n>(nav: Option<&'n Nav>, pick: fn(&Nav) -> &String, fallback: &'static str) -> &'n str {
    nav.map(pick)
        .map(String::as_str)
        .filter(|label| !label.trim().is_empty())
        .unwrap_or(fallback)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", b));
            }
        }
    }
    result
}

pub fn tag_pills(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("<span class=\"tag-pill\">{}</span>", html_escape(tag)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_header(ctx: &SiteContext) -> String {
    let lang = ctx.prefs.lang;
    let current = url_encode(ctx.current);
    let links: Vec<String> = ctx
        .nav_links()
        .iter()
        .map(|(anchor, label)| {
            format!(
                "<a href=\"/?lang={}#{}\" class=\"nav-link\">{}</a>",
                lang.code(),
                anchor,
                html_escape(label)
            )
        })
        .collect();
    format!(
        r##"<header class="header">
  <div class="header-inner">
    <a href="/?lang={lang}" class="logo-link">
      <span class="logo-icon material-symbols-outlined" aria-hidden="true">electric_bolt</span>
      <span>{author}</span>
    </a>
    <nav class="header-controls">
      <button id="navHamburger" class="hamburger-btn" aria-label="Menu" aria-expanded="false">
        <span class="material-symbols-outlined" aria-hidden="true">menu</span>
      </button>
      <div id="navMenu" class="nav-menu" aria-hidden="true">
        {links}
      </div>
      <a href="{cv}" class="btn cv-btn" aria-label="CV" target="_blank" rel="noopener">CV</a>
      <a id="langToggle" href="/lang/toggle?return={current}" class="btn-outline" aria-label="Toggle language">
        <span class="material-symbols-outlined" aria-hidden="true">language</span>
      </a>
      <a id="darkToggle" href="/theme/toggle?return={current}" class="btn-outline" aria-label="Toggle dark mode">
        <span id="darkToggleIcon" class="material-symbols-outlined" aria-hidden="true">{icon}</span>
      </a>
    </nav>
  </div>
</header>"##,
        lang = lang.code(),
        author = html_escape(ctx.author()),
        cv = html_escape(&ctx.settings.cv_url.value),
        links = links.join("\n        "),
        current = current,
        icon = ctx.prefs.theme.toggle_icon(),
    )
}

fn build_footer(ctx: &SiteContext) -> String {
    format!(
        r#"<footer class="footer">
  <div class="footer-inner">
    <p>&copy; <span id="year">{year}</span> {author}</p>
    <div class="footer-links">
      <a href="/privacy" class="footer-link">Privacy</a>
      <a href="/imprint" class="footer-link">Imprint</a>
    </div>
  </div>
</footer>"#,
        year = ctx.year,
        author = html_escape(ctx.author()),
    )
}

/// Wraps page content in the document shell. `title` is plain text.
pub fn render_page(ctx: &SiteContext, title: &str, main: &str) -> String {
    let lang = ctx.prefs.lang;
    let theme_class = if ctx.prefs.theme.is_dark() {
        " class=\"dark\""
    } else {
        ""
    };
    let theme_attr = ctx.prefs.theme.value().unwrap_or("system");
    format!(
        r#"<!doctype html>
<html lang="{lang}" dir="{dir}" data-theme="{theme_attr}"{theme_class}>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Material+Symbols+Outlined" />
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github-dark.min.css" />
  <link rel="stylesheet" href="/assets/site.css" />
  <script>{theme_script}</script>
</head>
<body data-lang="{lang}">
{header}
{main}
{footer}
<script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js"></script>
<script src="/assets/site.js" defer></script>
</body>
</html>
"#,
        lang = lang.code(),
        dir = lang.dir(),
        theme_attr = theme_attr,
        theme_class = theme_class,
        title = html_escape(title),
        theme_script = assets::THEME_BOOTSTRAP,
        header = build_header(ctx),
        main = main,
        footer = build_footer(ctx),
    )
}

/// Replacement body for pages that could not be built.
pub fn render_error_page(ctx: &SiteContext, message_html: &str) -> String {
    let main = format!(
        r#"<main class="main-container mx-auto px-4 py-8">
  <div class="text-red-600">{}</div>
  <p><a href="{}">&larr; Back to home</a></p>
</main>"#,
        message_html,
        html_escape(&with_lang_param("/", ctx.prefs.lang)),
    );
    render_page(ctx, &format!("Error – {}", ctx.author()), &main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{Language, Theme};

    fn context(settings: &Settings, lang: Language, theme: Theme) -> SiteContext<'_> {
        SiteContext {
            settings,
            prefs: Preferences { lang, theme },
            current: "/post?slug=a b",
            year: 2026,
            nav: None,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn url_encode_keeps_unreserved() {
        assert_eq!(url_encode("my-post_1.v~2"), "my-post_1.v~2");
        assert_eq!(url_encode("/post?slug=a b"), "%2Fpost%3Fslug%3Da%20b");
    }

    #[test]
    fn shell_carries_language_direction_and_theme() {
        let settings = Settings::new();
        let html = render_page(&context(&settings, Language::He, Theme::Dark), "T", "<main></main>");
        assert!(html.contains("<html lang=\"he\" dir=\"rtl\" data-theme=\"dark\" class=\"dark\">"));
        assert!(html.contains("light_mode"));
        assert!(html.contains("&copy; <span id=\"year\">2026</span> Ronel Herzass"));
        assert!(html.contains("/theme/toggle?return=%2Fpost%3Fslug%3Da%20b"));
    }

    #[test]
    fn nav_uses_translated_labels_and_falls_back_to_english() {
        let settings = Settings::new();
        let html = render_page(&context(&settings, Language::He, Theme::Light), "T", "");
        assert!(html.contains("<a href=\"/?lang=he#projects\" class=\"nav-link\">Projects</a>"));

        let nav = Nav {
            projects: "פרויקטים".to_string(),
            blog: "בלוג".to_string(),
            about: String::new(),
            contact: "צור קשר".to_string(),
        };
        let ctx = context(&settings, Language::He, Theme::Light).with_nav(&nav);
        let html = render_page(&ctx, "T", "");
        assert!(html.contains("<a href=\"/?lang=he#projects\" class=\"nav-link\">פרויקטים</a>"));
        assert!(html.contains("<a href=\"/?lang=he#blog\" class=\"nav-link\">בלוג</a>"));
        assert!(html.contains("<a href=\"/?lang=he#about\" class=\"nav-link\">About</a>"));
        assert!(html.contains("<a href=\"/?lang=he#contact\" class=\"nav-link\">צור קשר</a>"));
    }

    #[test]
    fn system_theme_has_no_dark_class() {
        let settings = Settings::new();
        let html = render_page(&context(&settings, Language::En, Theme::System), "T", "");
        assert!(html.contains("dir=\"ltr\" data-theme=\"system\">"));
        assert!(html.contains("dark_mode"));
    }
}
