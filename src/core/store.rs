//! Typed access to the document store and the collection layout.

use crate::domain::model::{Course, Enrollment, Major, Requirement, StudentProfile};
use crate::domain::ports::{CourseCatalog, Document, DocumentStore, Filter};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const USER_COLLECTION: &str = "Users";
pub const MAJOR_COLLECTION: &str = "Majors";
pub const COURSE_COLLECTION: &str = "Courses";

pub fn user_path(student_id: &str) -> String {
    format!("{}/{}", USER_COLLECTION, student_id)
}

pub fn enrollments_path(student_id: &str) -> String {
    format!("{}/{}/courses", USER_COLLECTION, student_id)
}

pub fn requirements_path(major_id: &str) -> String {
    format!("{}/{}/requirements", MAJOR_COLLECTION, major_id)
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub fn to_document<T: Serialize>(record: &T) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        other => Err(PlannerError::store(format!(
            "record must serialize to an object, got {}",
            other
        ))),
    }
}

pub async fn fetch_one<T, S>(store: &S, path: &str, filters: &[Filter]) -> Result<T>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    from_document(store.get_one(path, filters).await?)
}

pub async fn fetch_many<T, S>(store: &S, path: &str, filters: &[Filter]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    store
        .get_many(path, filters)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

fn rename_not_found(err: PlannerError, kind: &str, key: &str) -> PlannerError {
    match err {
        PlannerError::NotFound { .. } => PlannerError::not_found(kind, key),
        other => other,
    }
}

pub async fn load_student<S: DocumentStore + ?Sized>(
    store: &S,
    student_id: &str,
) -> Result<StudentProfile> {
    fetch_one(store, &user_path(student_id), &[])
        .await
        .map_err(|err| rename_not_found(err, "Student", student_id))
}

pub async fn load_major<S: DocumentStore + ?Sized>(store: &S, name: &str) -> Result<Major> {
    fetch_one(store, MAJOR_COLLECTION, &[Filter::eq("name", name)])
        .await
        .map_err(|err| rename_not_found(err, "Major", name))
}

pub async fn load_requirements<S: DocumentStore + ?Sized>(
    store: &S,
    major: &Major,
) -> Result<Vec<Requirement>> {
    fetch_many(store, &requirements_path(&major.id), &[]).await
}

pub async fn load_enrollments<S: DocumentStore + ?Sized>(
    store: &S,
    student_id: &str,
    filters: &[Filter],
) -> Result<Vec<Enrollment>> {
    fetch_many(store, &enrollments_path(student_id), filters).await
}

/// Catalog lookups by exact short name against the `Courses` collection.
pub struct StoreCatalog<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> StoreCatalog<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<'a, S: DocumentStore + ?Sized> CourseCatalog for StoreCatalog<'a, S> {
    async fn course(&self, short_name: &str) -> Result<Course> {
        let filters = [Filter::eq("shortName", short_name)];
        fetch_one(self.store, COURSE_COLLECTION, &filters)
            .await
            .map_err(|err| rename_not_found(err, "Course", short_name))
    }
}
