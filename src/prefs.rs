//! Visitor preferences: interface language and colour theme.
//!
//! Both live in cookies named `lang` and `theme`. An explicit `?lang=` on the
//! URL wins over the cookie.

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    HttpRequest,
};
use serde::Serialize;

pub const LANG_COOKIE: &str = "lang";
pub const THEME_COOKIE: &str = "theme";

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    /// Anything that is not Hebrew is English.
    pub fn parse(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("he") {
            Language::He
        } else {
            Language::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
        }
    }

    pub fn dir(self) -> &'static str {
        match self {
            Language::En => "ltr",
            Language::He => "rtl",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::He,
            Language::He => Language::En,
        }
    }

    pub fn minutes_unit(self) -> &'static str {
        match self {
            Language::En => "min",
            Language::He => "דק'",
        }
    }

    pub fn all() -> [Language; 2] {
        [Language::En, Language::He]
    }
}

/// `System` means no stored choice: the page follows `prefers-color-scheme`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => Theme::Dark,
            "light" => Theme::Light,
            _ => Theme::System,
        }
    }

    /// The stored value after a click on the toggle. `system_dark` is what the
    /// browser reports for `prefers-color-scheme` when nothing is stored.
    pub fn toggled(self, system_dark: bool) -> Self {
        let dark = match self {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => system_dark,
        };
        if dark {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn value(self) -> Option<&'static str> {
        match self {
            Theme::Dark => Some("dark"),
            Theme::Light => Some("light"),
            Theme::System => None,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Material symbol shown on the dark-mode button.
    pub fn toggle_icon(self) -> &'static str {
        if self.is_dark() {
            "light_mode"
        } else {
            "dark_mode"
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preferences {
    pub lang: Language,
    pub theme: Theme,
}

impl Preferences {
    pub fn resolve(
        query_lang: Option<&str>,
        cookie_lang: Option<&str>,
        cookie_theme: Option<&str>,
        default_lang: Language,
    ) -> Self {
        let lang = query_lang
            .filter(|code| !code.is_empty())
            .or(cookie_lang.filter(|code| !code.is_empty()))
            .map(Language::parse)
            .unwrap_or(default_lang);
        let theme = cookie_theme.map(Theme::parse).unwrap_or_default();
        Preferences { lang, theme }
    }

    pub fn from_request(
        req: &HttpRequest,
        query_lang: Option<&str>,
        default_lang: Language,
    ) -> Self {
        let lang_cookie = req.cookie(LANG_COOKIE);
        let theme_cookie = req.cookie(THEME_COOKIE);
        Preferences::resolve(
            query_lang,
            lang_cookie.as_ref().map(|cookie| cookie.value()),
            theme_cookie.as_ref().map(|cookie| cookie.value()),
            default_lang,
        )
    }
}

pub fn preference_cookie(name: &'static str, value: &'static str) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .max_age(Duration::days(365))
        .same_site(SameSite::Lax)
        .finish()
}

/// Only same-site absolute paths are accepted as redirect targets. Browsers
/// drop tabs and newlines from a `Location`, so any control or whitespace
/// character is refused along with `//` and `\`.
pub fn safe_return_path(candidate: Option<&str>) -> String {
    match candidate {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(|c| c.is_control() || c.is_whitespace()) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Rewrites (or adds) the `lang` query parameter of a same-site path.
pub fn with_lang_param(path: &str, lang: Language) -> String {
    let (path, fragment) = match path.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (path, None),
    };
    let (base, query) = path.split_once('?').unwrap_or((path, ""));
    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("lang"))
        .map(str::to_string)
        .collect();
    pairs.push(format!("lang={}", lang.code()));
    let mut rewritten = format!("{}?{}", base, pairs.join("&"));
    if let Some(fragment) = fragment {
        rewritten.push('#');
        rewritten.push_str(fragment);
    }
    rewritten
}
