use super::AppError;
use crate::impact::build_impact_report;
use crate::views::{self, PageContext};
use crate::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Extension;
use minijinja::context;

pub(crate) async fn home_handler(
    Extension(page): Extension<PageContext>,
) -> Result<Html<String>, AppError> {
    let html = views::render(
        "index.html",
        context! {
            page => page.titled("Home"),
            message => "Welcome to the Volunteer Engagement App!",
        },
    )?;
    Ok(Html(html))
}

pub(crate) async fn about_handler(
    Extension(page): Extension<PageContext>,
) -> Result<Html<String>, AppError> {
    let html = views::render(
        "about.html",
        context! {
            page => page.titled("About Us"),
            message => "Learn about our volunteer management platform",
        },
    )?;
    Ok(Html(html))
}

pub(crate) async fn impact_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
) -> Result<Html<String>, AppError> {
    let report = build_impact_report(&state.repos).await?;
    let html = views::render(
        "impact.html",
        context! {
            page => page.titled("Impact Reports"),
            report,
        },
    )?;
    Ok(Html(html))
}
