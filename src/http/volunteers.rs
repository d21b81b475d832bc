use super::{parse_object_id, set_flash, take_flash, AppError};
use crate::model::VolunteerInput;
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
struct VolunteerForm {
    name: String,
    email: String,
    #[serde(default)]
    phone: String,
}

impl VolunteerForm {
    fn into_input(self) -> Result<VolunteerInput, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("volunteer name is required".to_string()));
        }
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(AppError::BadRequest("volunteer email is required".to_string()));
        }
        let phone = self.phone.trim();
        Ok(VolunteerInput {
            name,
            email,
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        })
    }
}

async fn list_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let volunteers = state.repos.volunteers.list().await?;
    let html = views::render(
        "volunteers/list.html",
        context! {
            page => page.titled("Volunteers"),
            volunteers,
            flash => take_flash(&cookies),
        },
    )?;
    Ok(Html(html))
}

async fn new_handler(
    Extension(page): Extension<PageContext>,
) -> Result<Html<String>, AppError> {
    let html = views::render(
        "volunteers/form.html",
        context! {
            page => page.titled("New Volunteer"),
            action => "/volunteers",
            volunteer => None::<()>,
        },
    )?;
    Ok(Html(html))
}

async fn create_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    form: Result<Form<VolunteerForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let created = state.repos.volunteers.create(form.into_input()?).await?;
    set_flash(&cookies, format!("Volunteer {} added", created.name));
    Ok(Redirect::to("/volunteers"))
}

async fn show_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_object_id(&id)?;
    let volunteer = state
        .repos
        .volunteers
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("volunteer not found".to_string()))?;
    let html = views::render(
        "volunteers/show.html",
        context! {
            page => page.titled(&volunteer.name),
            volunteer,
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
    let volunteer = state
        .repos
        .volunteers
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("volunteer not found".to_string()))?;
    let html = views::render(
        "volunteers/form.html",
        context! {
            page => page.titled("Edit Volunteer"),
            action => format!("/volunteers/{}", id.to_hex()),
            volunteer,
        },
    )?;
    Ok(Html(html))
}

async fn update_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
    form: Result<Form<VolunteerForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let id = parse_object_id(&id)?;
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let updated = state
        .repos
        .volunteers
        .update(id, form.into_input()?)
        .await?
        .ok_or_else(|| AppError::NotFound("volunteer not found".to_string()))?;
    set_flash(&cookies, format!("Volunteer {} updated", updated.name));
    Ok(Redirect::to(&format!("/volunteers/{}", id.to_hex())))
}

async fn delete_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_object_id(&id)?;
    // No cascade: tasks keep their references and expansion drops them.
    if !state.repos.volunteers.delete(id).await? {
        return Err(AppError::NotFound("volunteer not found".to_string()));
    }
    set_flash(&cookies, "Volunteer removed".to_string());
    Ok(Redirect::to("/volunteers"))
}
