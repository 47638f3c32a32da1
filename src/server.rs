use std::io::Result;

use actix_cors::Cors;
use actix_web::{
    cookie::Cookie,
    http::{header, StatusCode},
    web::{self, resource, scope, Json},
    App, HttpRequest, HttpResponse, HttpServer,
};
use serde::Deserialize;

use crate::{
    core::{
        data::{load_home_content, load_projects, ContentSource},
        posts::{load_post, load_post_summaries},
        settings::Settings,
    },
    error::FolioError,
    prefs::{
        preference_cookie, safe_return_path, with_lang_param, Language, Preferences, Theme,
        LANG_COOKIE, THEME_COOKIE,
    },
    render::{
        assets::{SITE_CSS, SITE_JS},
        home::{render_home_page, HomeView},
        legal::{render_imprint_page, render_privacy_page},
        post::{render_missing_slug, render_post_failed, render_post_not_found, render_post_page},
        render_error_page, SiteContext,
    },
    types::{Post, PostSummary},
};

pub struct AppState {
    pub settings: Settings,
    pub source: ContentSource,
    pub default_lang: Language,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        AppState {
            source: ContentSource::from_root(&settings.content_root.value),
            default_lang: Language::parse(&settings.default_language.value),
            settings,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct HomeQuery {
    pub lang: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PostQuery {
    pub lang: Option<String>,
    pub slug: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ToggleQuery {
    #[serde(rename = "return")]
    pub return_to: Option<String>,
    pub system: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/").route(web::get().to(home_handler)))
        .service(resource("/post").route(web::get().to(post_handler)))
        .service(resource("/imprint").route(web::get().to(imprint_handler)))
        .service(resource("/privacy").route(web::get().to(privacy_handler)))
        .service(resource("/theme/toggle").route(web::get().to(theme_toggle_handler)))
        .service(resource("/lang/toggle").route(web::get().to(lang_toggle_handler)))
        .service(resource("/assets/site.js").route(web::get().to(script_handler)))
        .service(resource("/assets/site.css").route(web::get().to(style_handler)))
        .service(resource("/content/{path:.*}").route(web::get().to(content_handler)))
        .service(
            scope("/v1")
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_header()
                        .allow_any_method(),
                )
                .service(resource("/folio").route(web::get().to(status_handler)))
                .service(resource("/{lang}/posts").route(web::get().to(api_posts_handler)))
                .service(resource("/{lang}/posts/{slug}").route(web::get().to(api_post_handler))),
        );
}

pub async fn start_server(settings: Settings) -> Result<()> {
    let addr = settings.socket_addr();
    let state = web::Data::new(AppState::new(settings));
    tracing::info!("Serving content from {:?}", state.source);
    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(addr)?;
    tracing::info!("Server started at {}", addr);
    server.run().await
}

fn current_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}

/// An explicit `?lang=` is remembered the way a language switch is.
fn lang_cookie(query_lang: Option<&str>, prefs: Preferences) -> Option<Cookie<'static>> {
    query_lang
        .filter(|code| !code.is_empty())
        .map(|_| preference_cookie(LANG_COOKIE, prefs.lang.code()))
}

fn html_response(status: StatusCode, body: String, cookie: Option<Cookie<'static>>) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    builder.content_type("text/html; charset=utf-8");
    if let Some(cookie) = cookie {
        builder.cookie(cookie);
    }
    builder.body(body)
}

async fn home_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<HomeQuery>,
) -> HttpResponse {
    let prefs = Preferences::from_request(&req, query.lang.as_deref(), state.default_lang);
    let current = current_path(&req);
    let ctx = SiteContext::new(&state.settings, prefs, &current);
    let cookie = lang_cookie(query.lang.as_deref(), prefs);

    let content = match load_home_content(&state.source, prefs.lang).await {
        Ok(content) => content,
        Err(error) => {
            tracing::error!("Failed to load home content for {}: {}", prefs.lang.code(), error);
            return html_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_error_page(&ctx, "<p>Failed to load site content.</p>"),
                cookie,
            );
        }
    };
    let ctx = ctx.with_nav(&content.nav);
    let projects = load_projects(&state.source, prefs.lang)
        .await
        .unwrap_or_else(|error| {
            tracing::error!("Failed to load projects: {}", error);
            Vec::new()
        });
    let posts = load_post_summaries(&state.source, prefs.lang).await;

    let view = HomeView {
        content: &content,
        projects: &projects,
        posts: &posts,
        tag: query.tag.as_deref(),
        query: query.q.as_deref(),
    };
    html_response(StatusCode::OK, render_home_page(&ctx, &view), cookie)
}

async fn post_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PostQuery>,
) -> HttpResponse {
    let prefs = Preferences::from_request(&req, query.lang.as_deref(), state.default_lang);
    let current = current_path(&req);
    let ctx = SiteContext::new(&state.settings, prefs, &current);
    let cookie = lang_cookie(query.lang.as_deref(), prefs);

    let Some(slug) = query.slug.as_deref().filter(|slug| !slug.is_empty()) else {
        tracing::warn!("Post requested without slug");
        return html_response(StatusCode::BAD_REQUEST, render_missing_slug(&ctx), cookie);
    };

    let home = load_home_content(&state.source, prefs.lang).await.ok();
    let ctx = match &home {
        Some(home) => ctx.with_nav(&home.nav),
        None => ctx,
    };

    match load_post(&state.source, prefs.lang, slug).await {
        Ok(post) => html_response(StatusCode::OK, render_post_page(&ctx, &post), cookie),
        Err(FolioError::NotFound { path, status }) => {
            tracing::warn!("Post {} not found (HTTP {})", path, status);
            html_response(
                StatusCode::NOT_FOUND,
                render_post_not_found(&ctx, status, &path),
                cookie,
            )
        }
        Err(FolioError::InvalidPath { path }) => {
            tracing::warn!("Rejected post slug {:?}", path);
            html_response(StatusCode::BAD_REQUEST, render_post_failed(&ctx), cookie)
        }
        Err(error) => {
            tracing::error!("Failed to load post {}: {}", slug, error);
            html_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_post_failed(&ctx),
                cookie,
            )
        }
    }
}

async fn imprint_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<LangQuery>,
) -> HttpResponse {
    let prefs = Preferences::from_request(&req, query.lang.as_deref(), state.default_lang);
    let current = current_path(&req);
    let ctx = SiteContext::new(&state.settings, prefs, &current);
    html_response(StatusCode::OK, render_imprint_page(&ctx), None)
}

async fn privacy_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<LangQuery>,
) -> HttpResponse {
    let prefs = Preferences::from_request(&req, query.lang.as_deref(), state.default_lang);
    let current = current_path(&req);
    let ctx = SiteContext::new(&state.settings, prefs, &current);
    html_response(StatusCode::OK, render_privacy_page(&ctx), None)
}

async fn theme_toggle_handler(req: HttpRequest, query: web::Query<ToggleQuery>) -> HttpResponse {
    let current = req
        .cookie(THEME_COOKIE)
        .map(|cookie| Theme::parse(cookie.value()))
        .unwrap_or_default();
    let system_dark = query.system.as_deref() == Some("dark");
    let next = current.toggled(system_dark);
    let location = safe_return_path(query.return_to.as_deref());
    tracing::debug!("Theme {:?} -> {:?}", current, next);
    HttpResponse::SeeOther()
        .cookie(preference_cookie(THEME_COOKIE, next.value().unwrap_or("light")))
        .insert_header((header::LOCATION, location))
        .finish()
}

async fn lang_toggle_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ToggleQuery>,
) -> HttpResponse {
    let current = Preferences::from_request(&req, None, state.default_lang).lang;
    let next = current.toggled();
    let location = with_lang_param(&safe_return_path(query.return_to.as_deref()), next);
    tracing::debug!("Language {} -> {}", current.code(), next.code());
    HttpResponse::SeeOther()
        .cookie(preference_cookie(LANG_COOKIE, next.code()))
        .insert_header((header::LOCATION, location))
        .finish()
}

async fn script_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(SITE_JS)
}

async fn style_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .body(SITE_CSS)
}

fn content_type_for(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => "application/json",
        "md" => "text/markdown; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn content_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> std::result::Result<HttpResponse, FolioError> {
    let relative = path.into_inner();
    let bytes = state.source.read_bytes(&relative).await?;
    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&relative))
        .body(bytes))
}

async fn status_handler() -> HttpResponse {
    HttpResponse::Ok().body("folio-site is running")
}

async fn api_posts_handler(
    state: web::Data<AppState>,
    lang: web::Path<String>,
) -> Json<Vec<PostSummary>> {
    let lang = Language::parse(&lang);
    Json(load_post_summaries(&state.source, lang).await)
}

async fn api_post_handler(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> std::result::Result<Json<Post>, FolioError> {
    let (lang, slug) = path.into_inner();
    let post = load_post(&state.source, Language::parse(&lang), &slug).await?;
    Ok(Json(post))
}
