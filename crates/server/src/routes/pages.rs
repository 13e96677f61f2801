//! Frontend shell views.
//!
//! Home, Login and Register share `base.html`, whose header carries the site
//! title and navigation. The views are static; the forms talk to the JSON API.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::filters;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub active: &'static str,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub active: &'static str,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub active: &'static str,
}

/// Display the home page.
#[instrument]
pub async fn home() -> HomeTemplate {
    HomeTemplate { active: "home" }
}

/// Display the login page.
#[instrument]
pub async fn login() -> LoginTemplate {
    LoginTemplate { active: "login" }
}

/// Display the registration page.
#[instrument]
pub async fn register() -> RegisterTemplate {
    RegisterTemplate { active: "register" }
}
