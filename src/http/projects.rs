use super::{parse_object_id, set_flash, take_flash, AppError};
use crate::model::{ProjectInput, ProjectStatus};
use crate::views::{self, PageContext};
use crate::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use minijinja::context;
use serde::Deserialize;
use tower_cookies::Cookies;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route("/new", get(new_handler))
        .route("/:id", get(show_handler).post(update_handler))
        .route("/:id/edit", get(edit_handler))
        .route("/:id/delete", post(delete_handler))
}

#[derive(Debug, Deserialize)]
struct ProjectForm {
    name: String,
    #[serde(default)]
    description: String,
    status: String,
    #[serde(default)]
    hours_worked: String,
    #[serde(default)]
    people_helped: String,
}

fn parse_metric(raw: &str, field: &str) -> Result<i64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let value: i64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a whole number")))?;
    if value < 0 {
        return Err(AppError::BadRequest(format!("{field} must not be negative")));
    }
    Ok(value)
}

impl ProjectForm {
    fn into_input(self) -> Result<ProjectInput, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("project name is required".to_string()));
        }
        let status: ProjectStatus = self.status.trim().parse().map_err(AppError::BadRequest)?;
        let description = self.description.trim();
        Ok(ProjectInput {
            name,
            description: (!description.is_empty()).then(|| description.to_string()),
            status,
            hours_worked: parse_metric(&self.hours_worked, "hours worked")?,
            people_helped: parse_metric(&self.people_helped, "people helped")?,
        })
    }
}

async fn list_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let projects = state.repos.projects.list().await?;
    let html = views::render(
        "projects/list.html",
        context! {
            page => page.titled("Projects"),
            projects,
            flash => take_flash(&cookies),
        },
    )?;
    Ok(Html(html))
}

async fn new_handler(
    Extension(page): Extension<PageContext>,
) -> Result<Html<String>, AppError> {
    let html = views::render(
        "projects/form.html",
        context! {
            page => page.titled("New Project"),
            action => "/projects",
            project => None::<()>,
        },
    )?;
    Ok(Html(html))
}

async fn create_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    form: Result<Form<ProjectForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let created = state.repos.projects.create(form.into_input()?).await?;
    set_flash(&cookies, format!("Project {} added", created.name));
    Ok(Redirect::to("/projects"))
}

async fn show_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_object_id(&id)?;
    let project = state
        .repos
        .projects
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("project not found".to_string()))?;
    let html = views::render(
        "projects/show.html",
        context! {
            page => page.titled(&project.name),
            project,
        },
    )?;
    Ok(Html(html))
}

async fn edit_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_object_id(&id)?;
    let project = state
        .repos
        .projects
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("project not found".to_string()))?;
    let html = views::render(
        "projects/form.html",
        context! {
            page => page.titled("Edit Project"),
            action => format!("/projects/{}", id.to_hex()),
            project,
        },
    )?;
    Ok(Html(html))
}

async fn update_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
    form: Result<Form<ProjectForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let id = parse_object_id(&id)?;
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let updated = state
        .repos
        .projects
        .update(id, form.into_input()?)
        .await?
        .ok_or_else(|| AppError::NotFound("project not found".to_string()))?;
    set_flash(&cookies, format!("Project {} updated", updated.name));
    Ok(Redirect::to(&format!("/projects/{}", id.to_hex())))
}

async fn delete_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_object_id(&id)?;
    if !state.repos.projects.delete(id).await? {
        return Err(AppError::NotFound("project not found".to_string()));
    }
    set_flash(&cookies, "Project removed".to_string());
    Ok(Redirect::to("/projects"))
}
