use super::{ProjectStore, RepoError, TaskStore, VolunteerStore};
use crate::model::{
    Project, ProjectInput, ProjectStatus, Task, TaskInput, TaskStatus, TaskWithAssignees,
    Volunteer, VolunteerInput,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_bson};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

pub const VOLUNTEERS_COLLECTION: &str = "volunteers";
pub const TASKS_COLLECTION: &str = "tasks";
pub const PROJECTS_COLLECTION: &str = "projects";

pub struct MongoVolunteers {
    collection: Collection<Volunteer>,
}

impl MongoVolunteers {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(VOLUNTEERS_COLLECTION),
        }
    }
}

#[async_trait]
impl VolunteerStore for MongoVolunteers {
    async fn create(&self, input: VolunteerInput) -> Result<Volunteer, RepoError> {
        let volunteer = Volunteer {
            id: Some(ObjectId::new()),
            name: input.name,
            email: input.email,
            phone: input.phone,
        };
        self.collection.insert_one(&volunteer).await?;
        Ok(volunteer)
    }

    async fn list(&self) -> Result<Vec<Volunteer>, RepoError> {
        let cursor = self.collection.find(doc! {}).sort(doc! {"name": 1}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Volunteer>, RepoError> {
        Ok(self.collection.find_one(doc! {"_id": id}).await?)
    }

    async fn update(
        &self,
        id: ObjectId,
        input: VolunteerInput,
    ) -> Result<Option<Volunteer>, RepoError> {
        let update = doc! {"$set": {
            "name": input.name,
            "email": input.email,
            "phone": input.phone,
        }};
        Ok(self
            .collection
            .find_one_and_update(doc! {"_id": id}, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        let result = self.collection.delete_one(doc! {"_id": id}).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}

pub struct MongoTasks {
    collection: Collection<Task>,
}

impl MongoTasks {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(TASKS_COLLECTION),
        }
    }
}

#[async_trait]
impl TaskStore for MongoTasks {
    async fn create(&self, input: TaskInput) -> Result<Task, RepoError> {
        let task = Task {
            id: Some(ObjectId::new()),
            title: input.title,
            description: input.description,
            status: input.status,
            assigned_to: input.assigned_to,
        };
        self.collection.insert_one(&task).await?;
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, RepoError> {
        let cursor = self.collection.find(doc! {}).sort(doc! {"title": 1}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Task>, RepoError> {
        Ok(self.collection.find_one(doc! {"_id": id}).await?)
    }

    async fn update(&self, id: ObjectId, input: TaskInput) -> Result<Option<Task>, RepoError> {
        let update = doc! {"$set": {
            "title": input.title,
            "description": input.description,
            "status": to_bson(&input.status)?,
            "assigned_to": to_bson(&input.assigned_to)?,
        }};
        Ok(self
            .collection
            .find_one_and_update(doc! {"_id": id}, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        let result = self.collection.delete_one(doc! {"_id": id}).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_by_status_expanded(
        &self,
        status: TaskStatus,
    ) -> Result<Vec<TaskWithAssignees>, RepoError> {
        // $lookup keeps the join at read time; volunteer lifecycle stays
        // independent and dangling references simply expand to nothing.
        let pipeline = vec![
            doc! {"$match": {"status": to_bson(&status)?}},
            doc! {"$lookup": {
                "from": VOLUNTEERS_COLLECTION,
                "localField": "assigned_to",
                "foreignField": "_id",
                "as": "assignees",
            }},
            doc! {"$sort": {"title": 1}},
        ];
        let mut cursor = self.collection.aggregate(pipeline).await?;
        let mut expanded = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            expanded.push(mongodb::bson::from_document(document)?);
        }
        Ok(expanded)
    }
}

pub struct MongoProjects {
    collection: Collection<Project>,
}

impl MongoProjects {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(PROJECTS_COLLECTION),
        }
    }
}

#[async_trait]
impl ProjectStore for MongoProjects {
    async fn create(&self, input: ProjectInput) -> Result<Project, RepoError> {
        let project = Project {
            id: Some(ObjectId::new()),
            name: input.name,
            description: input.description,
            status: input.status,
            hours_worked: input.hours_worked,
            people_helped: input.people_helped,
        };
        self.collection.insert_one(&project).await?;
        Ok(project)
    }

    async fn list(&self) -> Result<Vec<Project>, RepoError> {
        let cursor = self.collection.find(doc! {}).sort(doc! {"name": 1}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Project>, RepoError> {
        Ok(self.collection.find_one(doc! {"_id": id}).await?)
    }

    async fn update(
        &self,
        id: ObjectId,
        input: ProjectInput,
    ) -> Result<Option<Project>, RepoError> {
        let update = doc! {"$set": {
            "name": input.name,
            "description": input.description,
            "status": to_bson(&input.status)?,
            "hours_worked": input.hours_worked,
            "people_helped": input.people_helped,
        }};
        Ok(self
            .collection
            .find_one_and_update(doc! {"_id": id}, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        let result = self.collection.delete_one(doc! {"_id": id}).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_by_status_in(
        &self,
        statuses: &[ProjectStatus],
    ) -> Result<Vec<Project>, RepoError> {
        let filter = doc! {"status": {"$in": to_bson(&statuses)?}};
        let cursor = self.collection.find(filter).sort(doc! {"name": 1}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn increment_metrics_for_active(
        &self,
        hours: i64,
        people: i64,
    ) -> Result<u64, RepoError> {
        let result = self
            .collection
            .update_many(
                doc! {"status": to_bson(&ProjectStatus::Active)?},
                doc! {"$inc": {"hours_worked": hours, "people_helped": people}},
            )
            .await?;
        Ok(result.modified_count)
    }
}
