use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
    path::{Component, Path, PathBuf},
};

use awc::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{FolioError, Result},
    prefs::Language,
    types::{HomeContent, Project},
};

const REMOTE_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Where the content tree lives: a local directory or a statically hosted
/// base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    Local(PathBuf),
    Remote(String),
}

impl ContentSource {
    pub fn from_root(root: &str) -> Self {
        if root.starts_with("http://") || root.starts_with("https://") {
            ContentSource::Remote(root.trim_end_matches('/').to_string())
        } else {
            ContentSource::Local(PathBuf::from(root))
        }
    }

    pub async fn read_bytes(&self, relative: &str) -> Result<Vec<u8>> {
        check_relative(relative)?;
        match self {
            ContentSource::Local(root) => read_local(&root.join(relative), relative),
            ContentSource::Remote(base) => read_remote(&remote_url(base, relative)?, relative).await,
        }
    }

    pub async fn read_text(&self, relative: &str) -> Result<String> {
        let bytes = self.read_bytes(relative).await?;
        String::from_utf8(bytes).map_err(|error| {
            FolioError::Io(std::io::Error::new(ErrorKind::InvalidData, error))
        })
    }

    pub async fn read_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T> {
        let bytes = self.read_bytes(relative).await?;
        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::error!("Content {} structure is incorrect: {}", relative, error);
                Err(error.into())
            }
        }
    }
}

pub fn home_path(lang: Language) -> String {
    format!("{}/index.json", lang.code())
}

pub fn projects_path(lang: Language) -> String {
    format!("{}/projects.json", lang.code())
}

pub fn post_index_path(lang: Language) -> String {
    format!("{}/posts/_index.json", lang.code())
}

pub fn post_path(lang: Language, slug: &str) -> String {
    format!("{}/posts/{}/index.md", lang.code(), slug)
}

pub async fn load_home_content(source: &ContentSource, lang: Language) -> Result<HomeContent> {
    source.read_json(&home_path(lang)).await
}

pub async fn load_projects(source: &ContentSource, lang: Language) -> Result<Vec<Project>> {
    source.read_json(&projects_path(lang)).await
}

/// Rejects anything that could step outside the content root.
fn check_relative(relative: &str) -> Result<()> {
    let invalid = || FolioError::InvalidPath {
        path: relative.to_string(),
    };
    if relative.is_empty() || relative.contains('\\') {
        return Err(invalid());
    }
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(invalid()),
        }
    }
    Ok(())
}

/// Appends `relative` to the base URL one percent-encoded segment at a time.
fn remote_url(base: &str, relative: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|error| FolioError::remote(format!("invalid content base {}: {}", base, error)))?;
    url.path_segments_mut()
        .map_err(|_| FolioError::remote(format!("content base {} cannot take a path", base)))?
        .pop_if_empty()
        .extend(relative.split('/'));
    Ok(url)
}

fn read_local(path: &Path, relative: &str) -> Result<Vec<u8>> {
    match File::open(path) {
        Ok(file) => {
            let mut buffer: Vec<u8> = Vec::new();
            let mut reader = BufReader::new(file);
            reader.read_to_end(&mut buffer)?;
            tracing::debug!("Loaded {} ({} bytes)", relative, buffer.len());
            Ok(buffer)
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Err(FolioError::NotFound {
            path: relative.to_string(),
            status: 404,
        }),
        Err(error) => {
            tracing::error!("Error opening content file {}: {}", path.display(), error);
            Err(error.into())
        }
    }
}

async fn read_remote(url: &Url, relative: &str) -> Result<Vec<u8>> {
    let client = Client::default();
    let mut response = client.get(url.as_str()).send().await.map_err(|error| {
        tracing::error!("Error requesting {} from CDN: {}", url, error);
        FolioError::remote(format!("failed to connect to {}", url))
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("CDN answered {} for {}", status.as_u16(), url);
        return Err(FolioError::NotFound {
            path: relative.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .body()
        .limit(REMOTE_BODY_LIMIT)
        .await
        .map_err(|error| {
            tracing::error!("Remote content {} could not be read: {}", url, error);
            FolioError::remote(format!("failed to read {}", url))
        })?;
    tracing::debug!("Remote {} size: {}", relative, body.len());
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

    async fn cdn(req: HttpRequest) -> HttpResponse {
        let path = req.path().to_string();
        if path.ends_with("/gone/index.md") {
            HttpResponse::Forbidden().finish()
        } else if path.ends_with("/huge.bin") {
            HttpResponse::Ok().body(vec![b'x'; REMOTE_BODY_LIMIT + 1])
        } else {
            HttpResponse::Ok().body(path)
        }
    }

    /// Serves every path on an ephemeral port and returns the base URL.
    fn spawn_cdn() -> String {
        let server = HttpServer::new(|| App::new().default_service(web::to(cdn)))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}/content", addr)
    }

    #[test]
    fn remote_urls_encode_each_segment() {
        let url = remote_url("https://cdn.example.com/content", "he/posts/שלום עולם/index.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cdn.example.com/content/he/posts/%D7%A9%D7%9C%D7%95%D7%9D%20%D7%A2%D7%95%D7%9C%D7%9D/index.md"
        );
        let url = remote_url("https://cdn.example.com", "en/index.json").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/en/index.json");
    }

    #[actix_web::test]
    async fn remote_fetch_returns_the_body() {
        let source = ContentSource::from_root(&spawn_cdn());
        let text = source.read_text("he/posts/שלום/index.md").await.unwrap();
        assert_eq!(text, "/content/he/posts/%D7%A9%D7%9C%D7%95%D7%9D/index.md");
        let text = source.read_text("en/posts/my post/index.md").await.unwrap();
        assert_eq!(text, "/content/en/posts/my%20post/index.md");
    }

    #[actix_web::test]
    async fn remote_error_status_is_reported_as_missing() {
        let source = ContentSource::from_root(&spawn_cdn());
        let error = source.read_text("en/posts/gone/index.md").await.unwrap_err();
        assert_eq!(error.missing_status(), Some(403));
    }

    #[actix_web::test]
    async fn remote_body_over_the_limit_is_refused() {
        let source = ContentSource::from_root(&spawn_cdn());
        let error = source.read_bytes("en/huge.bin").await.unwrap_err();
        assert!(matches!(error, FolioError::Remote { .. }));
    }

    #[test]
    fn root_kind_is_detected_from_scheme() {
        assert_eq!(
            ContentSource::from_root("https://cdn.example.com/content/"),
            ContentSource::Remote("https://cdn.example.com/content".to_string())
        );
        assert_eq!(
            ContentSource::from_root("./content"),
            ContentSource::Local(PathBuf::from("./content"))
        );
    }

    #[test]
    fn content_paths_follow_the_static_layout() {
        assert_eq!(home_path(Language::En), "en/index.json");
        assert_eq!(projects_path(Language::He), "he/projects.json");
        assert_eq!(post_index_path(Language::En), "en/posts/_index.json");
        assert_eq!(post_path(Language::He, "hello"), "he/posts/hello/index.md");
    }

    #[test]
    fn traversal_is_rejected() {
        assert!(check_relative("en/posts/../../secret").is_err());
        assert!(check_relative("/etc/passwd").is_err());
        assert!(check_relative("").is_err());
        assert!(check_relative("en\\posts").is_err());
        assert!(check_relative("en/posts/a/img.png").is_ok());
    }

    #[actix_web::test]
    async fn local_missing_file_reports_404() {
        let dir = tempfile::tempdir().unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        let error = source.read_text("en/index.json").await.unwrap_err();
        assert_eq!(error.missing_status(), Some(404));
    }

    #[actix_web::test]
    async fn local_json_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("en/posts")).unwrap();
        std::fs::write(dir.path().join("en/posts/_index.json"), r#"["a","b"]"#).unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        let slugs: Vec<String> = source.read_json("en/posts/_index.json").await.unwrap();
        assert_eq!(slugs, vec!["a", "b"]);
    }
}
