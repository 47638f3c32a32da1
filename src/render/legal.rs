use crate::render::{html_escape, render_page, SiteContext};

pub fn render_imprint_page(ctx: &SiteContext) -> String {
    let author = html_escape(ctx.author());
    let email = html_escape(&ctx.settings.contact_email.value);
    let main = format!(
        r#"<main>
  <section class="max-container text-center legal">
    <h2 class="section-header-title mb-4">Imprint</h2>
    <p>This website is operated by:</p>
    <p><strong>{author}</strong></p>
    <p>
      Contact:<br />
      <a href="mailto:{email}">{email}</a><br />
      <a href="{linkedin}" target="_blank" rel="noopener">LinkedIn Profile</a>
    </p>
    <p class="text-gray-600">All content on this website, including text, images, and code, is the property of {author}, unless otherwise noted. Unauthorized use or reproduction is prohibited.</p>
    <p class="text-gray-600">&copy; {year} {author}. All rights reserved.</p>
  </section>
</main>"#,
        author = author,
        email = email,
        linkedin = html_escape(&ctx.settings.linkedin_url.value),
        year = ctx.year,
    );
    render_page(ctx, &format!("Imprint – {}", ctx.author()), &main)
}

pub fn render_privacy_page(ctx: &SiteContext) -> String {
    let main = format!(
        r#"<main>
  <section class="max-container text-center legal">
    <h2 class="section-header-title mb-4">Privacy</h2>
    <p>This site does not track visitors and sets no analytics cookies.</p>
    <p>Two preference cookies are stored in your browser: <code>theme</code> (light or dark) and <code>lang</code> (interface language). They never leave this site and can be deleted at any time.</p>
    <p>Questions: <a href="mailto:{email}">{email}</a></p>
  </section>
</main>"#,
        email = html_escape(&ctx.settings.contact_email.value),
    );
    render_page(ctx, &format!("Privacy – {}", ctx.author()), &main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::settings::Settings,
        prefs::{Language, Preferences, Theme},
    };

    #[test]
    fn imprint_names_the_operator() {
        let settings = Settings::new();
        let ctx = SiteContext {
            settings: &settings,
            prefs: Preferences {
                lang: Language::En,
                theme: Theme::System,
            },
            current: "/imprint",
            year: 2026,
            nav: None,
        };
        let page = render_imprint_page(&ctx);
        assert!(page.contains("<strong>Ronel Herzass</strong>"));
        assert!(page.contains("&copy; 2026 Ronel Herzass. All rights reserved."));
        assert!(render_privacy_page(&ctx).contains("<code>theme</code>"));
    }
}
