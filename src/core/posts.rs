use std::cmp::Reverse;

use chrono::NaiveDateTime;

use crate::{
    core::{
        data::{post_index_path, post_path, ContentSource},
        frontmatter::parse_front_matter,
        markdown::render_markdown,
        reading::{estimate_minutes, parse_date},
    },
    error::{FolioError, Result},
    prefs::Language,
    types::{Post, PostSummary},
};

/// Slugs listed in `posts/_index.json`. A missing or unreadable index means
/// there are no posts.
pub async fn load_post_index(source: &ContentSource, lang: Language) -> Vec<String> {
    match source.read_json::<Vec<String>>(&post_index_path(lang)).await {
        Ok(slugs) => slugs,
        Err(error) => {
            tracing::warn!("No post index for {}: {}", lang.code(), error);
            Vec::new()
        }
    }
}

/// Posts without a usable date sort after every dated post.
fn sort_key(summary: &PostSummary) -> Reverse<Option<NaiveDateTime>> {
    Reverse(summary.date.as_deref().and_then(parse_date))
}

pub fn sort_newest_first(summaries: &mut [PostSummary]) {
    summaries.sort_by_key(sort_key);
}

/// Front matter of every listed post, newest first. Posts that fail to load
/// are logged and left out.
pub async fn load_post_summaries(source: &ContentSource, lang: Language) -> Vec<PostSummary> {
    let slugs = load_post_index(source, lang).await;
    let mut summaries = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        let path = post_path(lang, slug);
        match source.read_text(&path).await {
            Ok(raw) => {
                let (meta, _) = parse_front_matter(&raw);
                summaries.push(PostSummary::from_meta(slug, &meta));
            }
            Err(error) => {
                tracing::warn!("Skipping post {}: {}", path, error);
            }
        }
    }
    sort_newest_first(&mut summaries);
    summaries
}

pub fn image_base(lang: Language, slug: &str) -> String {
    format!("/content/{}/posts/{}", lang.code(), slug)
}

/// Builds a post from its markdown source.
pub fn build_post(lang: Language, slug: &str, raw: &str) -> Post {
    let (meta, body) = parse_front_matter(raw);
    let minutes = estimate_minutes(body, meta.minutes());
    let rendered = render_markdown(body, &image_base(lang, slug));
    Post {
        slug: slug.to_string(),
        meta,
        minutes,
        html: rendered.html,
        toc: rendered.toc,
    }
}

pub async fn load_post(source: &ContentSource, lang: Language, slug: &str) -> Result<Post> {
    if slug.trim().is_empty() || slug.contains('/') {
        return Err(FolioError::InvalidPath {
            path: slug.to_string(),
        });
    }
    let raw = source.read_text(&post_path(lang, slug)).await?;
    let post = build_post(lang, slug, &raw);
    tracing::debug!(
        "Rendered {} ({} min, {} headings)",
        slug,
        post.minutes,
        post.toc.len()
    );
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(slug: &str, date: Option<&str>) -> PostSummary {
        PostSummary {
            slug: slug.to_string(),
            title: None,
            date: date.map(str::to_string),
            minutes: None,
            excerpt: None,
            image: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn newest_first_with_undated_last() {
        let mut posts = vec![
            summary("old", Some("2023-01-01")),
            summary("undated", None),
            summary("new", Some("2024-06-01")),
            summary("garbage", Some("someday")),
            summary("mid", Some("2023-12-31T08:00:00Z")),
        ];
        sort_newest_first(&mut posts);
        let order: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old", "undated", "garbage"]);
    }

    #[test]
    fn built_post_resolves_images_under_its_slug() {
        let post = build_post(Language::He, "scope", "---\ntitle: T\n---\n![x](a.png)\n");
        assert!(post.html.contains("/content/he/posts/scope/a.png"));
        assert_eq!(post.minutes, 1);
        assert_eq!(post.meta.title(), Some("T"));
    }

    #[actix_web::test]
    async fn summaries_skip_missing_posts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("en/posts/first")).unwrap();
        std::fs::create_dir_all(root.join("en/posts/second")).unwrap();
        std::fs::write(
            root.join("en/posts/_index.json"),
            r#"["first", "ghost", "second"]"#,
        )
        .unwrap();
        std::fs::write(
            root.join("en/posts/first/index.md"),
            "---\ntitle: First\ndate: 2024-01-01\n---\nbody",
        )
        .unwrap();
        std::fs::write(
            root.join("en/posts/second/index.md"),
            "---\ntitle: Second\ndate: 2024-05-01\nminutes: 9\n---\nbody",
        )
        .unwrap();

        let source = ContentSource::Local(root.to_path_buf());
        let summaries = load_post_summaries(&source, Language::En).await;
        let slugs: Vec<&str> = summaries.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);
        assert_eq!(summaries[0].minutes, Some(9));
    }

    #[actix_web::test]
    async fn missing_index_means_no_posts() {
        let dir = tempfile::tempdir().unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        assert!(load_post_summaries(&source, Language::En).await.is_empty());
    }

    #[actix_web::test]
    async fn slugs_with_separators_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        assert!(matches!(
            load_post(&source, Language::En, "../secret").await,
            Err(FolioError::InvalidPath { .. })
        ));
    }
}
