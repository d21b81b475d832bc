use super::{parse_object_id, set_flash, take_flash, AppError};
use crate::model::{TaskInput, TaskStatus, TaskWithAssignees};
use crate::views::{self, PageContext};
use crate::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use minijinja::context;
use mongodb::bson::oid::ObjectId;
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
struct TaskForm {
    title: String,
    #[serde(default)]
    description: String,
    status: String,
    /// Comma-separated volunteer identifiers from the form.
    #[serde(default)]
    assigned_to: String,
}

impl TaskForm {
    fn into_input(self) -> Result<TaskInput, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("task title is required".to_string()));
        }
        let status: TaskStatus = self.status.trim().parse().map_err(AppError::BadRequest)?;
        let assigned_to = self
            .assigned_to
            .split(',')
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_object_id)
            .collect::<Result<Vec<ObjectId>, AppError>>()?;
        let description = self.description.trim();
        Ok(TaskInput {
            title,
            description: (!description.is_empty()).then(|| description.to_string()),
            status,
            assigned_to,
        })
    }
}

async fn list_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let tasks = state.repos.tasks.list().await?;
    let html = views::render(
        "tasks/list.html",
        context! {
            page => page.titled("Tasks"),
            tasks,
            flash => take_flash(&cookies),
        },
    )?;
    Ok(Html(html))
}

async fn new_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
) -> Result<Html<String>, AppError> {
    let volunteers = state.repos.volunteers.list().await?;
    let html = views::render(
        "tasks/form.html",
        context! {
            page => page.titled("New Task"),
            action => "/tasks",
            task => None::<()>,
            volunteers,
        },
    )?;
    Ok(Html(html))
}

async fn create_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    form: Result<Form<TaskForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let created = state.repos.tasks.create(form.into_input()?).await?;
    set_flash(&cookies, format!("Task {} added", created.title));
    Ok(Redirect::to("/tasks"))
}

async fn show_handler(
    State(state): State<AppState>,
    Extension(page): Extension<PageContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_object_id(&id)?;
    let task = state
        .repos
        .tasks
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("task not found".to_string()))?;

    // Read-time expansion of the weak references; deleted volunteers are
    // simply absent from the result.
    let mut assignees = Vec::with_capacity(task.assigned_to.len());
    for volunteer_id in &task.assigned_to {
        if let Some(volunteer) = state.repos.volunteers.get(*volunteer_id).await? {
            assignees.push(volunteer);
        }
    }
    let expanded = TaskWithAssignees {
        id: task.id,
        title: task.title,
        description: task.description,
        status: task.status,
        assigned_to: task.assigned_to,
        assignees,
    };

    let html = views::render(
        "tasks/show.html",
        context! {
            page => page.titled(&expanded.title),
            task => expanded,
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
    let task = state
        .repos
        .tasks
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("task not found".to_string()))?;
    let volunteers = state.repos.volunteers.list().await?;
    let html = views::render(
        "tasks/form.html",
        context! {
            page => page.titled("Edit Task"),
            action => format!("/tasks/{}", id.to_hex()),
            task,
            volunteers,
        },
    )?;
    Ok(Html(html))
}

async fn update_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
    form: Result<Form<TaskForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let id = parse_object_id(&id)?;
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let updated = state
        .repos
        .tasks
        .update(id, form.into_input()?)
        .await?
        .ok_or_else(|| AppError::NotFound("task not found".to_string()))?;
    set_flash(&cookies, format!("Task {} updated", updated.title));
    Ok(Redirect::to(&format!("/tasks/{}", id.to_hex())))
}

async fn delete_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_object_id(&id)?;
    if !state.repos.tasks.delete(id).await? {
        return Err(AppError::NotFound("task not found".to_string()));
    }
    set_flash(&cookies, "Task removed".to_string());
    Ok(Redirect::to("/tasks"))
}
