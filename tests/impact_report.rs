mod support;

use axum::http::StatusCode;
use mongodb::bson::oid::ObjectId;
use support::{get, test_app};
use volunteer_hub::model::{ProjectInput, ProjectStatus, TaskInput, TaskStatus, VolunteerInput};
use volunteer_hub::scheduler::MetricsJob;
use volunteer_hub::{ProjectStore, TaskStore, VolunteerStore};

fn volunteer(name: &str) -> VolunteerInput {
    VolunteerInput {
        name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase()),
        phone: None,
    }
}

fn project(name: &str, status: ProjectStatus, hours: i64, people: i64) -> ProjectInput {
    ProjectInput {
        name: name.to_string(),
        description: None,
        status,
        hours_worked: hours,
        people_helped: people,
    }
}

#[tokio::test]
async fn impact_page_aggregates_active_and_completed_projects() {
    let (app, store) = test_app();

    let ada = VolunteerStore::create(store.as_ref(), volunteer("Ada"))
        .await
        .expect("create volunteer");
    VolunteerStore::create(store.as_ref(), volunteer("Grace"))
        .await
        .expect("create volunteer");

    TaskStore::create(
        store.as_ref(),
        TaskInput {
            title: "Distribute meals".to_string(),
            description: None,
            status: TaskStatus::Completed,
            assigned_to: vec![ada.id.expect("stored id")],
        },
    )
    .await
    .expect("create task");
    TaskStore::create(
        store.as_ref(),
        TaskInput {
            title: "Plan fundraiser".to_string(),
            description: None,
            status: TaskStatus::Pending,
            assigned_to: vec![],
        },
    )
    .await
    .expect("create task");

    ProjectStore::create(
        store.as_ref(),
        project("Food drive", ProjectStatus::Active, 10, 5),
    )
    .await
    .expect("create project");
    ProjectStore::create(
        store.as_ref(),
        project("Winter shelter", ProjectStatus::Completed, 20, 15),
    )
    .await
    .expect("create project");

    let (parts, body) = get(&app, "/impact").await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("Volunteers: 2"));
    assert!(body.contains("Total hours worked: 30"));
    assert!(body.contains("Total people helped: 20"));
    // Only completed tasks are listed, with their assignees expanded.
    assert!(body.contains("Distribute meals"));
    assert!(body.contains("Ada"));
    assert!(!body.contains("Plan fundraiser"));
}

#[tokio::test]
async fn impact_totals_move_after_daily_metrics_fire() {
    let (app, store) = test_app();

    ProjectStore::create(
        store.as_ref(),
        project("Food drive", ProjectStatus::Active, 10, 5),
    )
    .await
    .expect("create project");
    ProjectStore::create(
        store.as_ref(),
        project("Winter shelter", ProjectStatus::Completed, 20, 15),
    )
    .await
    .expect("create project");

    let job = MetricsJob::new(store.clone());
    job.fire().await;

    let (parts, body) = get(&app, "/impact").await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("Total hours worked: 36"));
    assert!(body.contains("Total people helped: 30"));
}

#[tokio::test]
async fn impact_drops_assignees_of_deleted_volunteers() {
    let (app, store) = test_app();

    let ada = VolunteerStore::create(store.as_ref(), volunteer("Ada"))
        .await
        .expect("create volunteer");
    let ada_id = ada.id.expect("stored id");
    TaskStore::create(
        store.as_ref(),
        TaskInput {
            title: "Distribute meals".to_string(),
            description: None,
            status: TaskStatus::Completed,
            assigned_to: vec![ada_id, ObjectId::new()],
        },
    )
    .await
    .expect("create task");

    let (_, before) = get(&app, "/impact").await;
    assert!(before.contains("Ada"));

    VolunteerStore::delete(store.as_ref(), ada_id)
        .await
        .expect("delete volunteer");
    let (parts, after) = get(&app, "/impact").await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(after.contains("Distribute meals"));
    assert!(!after.contains("Ada"));
}
