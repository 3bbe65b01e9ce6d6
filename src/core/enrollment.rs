use crate::core::matcher::{find_requirement, normalize_short_name};
use crate::core::store::{
    enrollments_path, load_enrollments, load_major, load_requirements, load_student, to_document,
    StoreCatalog,
};
use crate::domain::model::{CourseBrief, Enrollment, EnrollmentRequest};
use crate::domain::ports::{CourseCatalog, DocumentStore, Filter};
use crate::utils::error::{PlannerError, Result};

/// Records a course for the student, tagging it with the requirement it
/// fills at this moment.
///
/// The duplicate check and the write are separate store calls, so two
/// concurrent adds of the same course can both succeed.
pub async fn add_enrollment<S: DocumentStore + ?Sized>(
    store: &S,
    student_id: &str,
    request: &EnrollmentRequest,
) -> Result<CourseBrief> {
    let short_name = normalize_short_name(&request.course);

    let existing = load_enrollments(store, student_id, &[Filter::eq("course", short_name.as_str())])
        .await?;
    if !existing.is_empty() {
        tracing::warn!("{} is already enrolled in {}", student_id, short_name);
        return Err(PlannerError::AlreadyEnrolled { course: short_name });
    }

    let course = StoreCatalog::new(store).course(&short_name).await?;

    let student = load_student(store, student_id).await?;
    let major = load_major(store, &student.major).await?;
    let requirements = load_requirements(store, &major).await?;
    let requirement = find_requirement(&requirements, &course.short_name);

    let mut enrollment = Enrollment {
        id: String::new(),
        course: course.short_name.clone(),
        semester: request.semester,
        category: requirement.map(|r| r.category.clone()),
        subcategory: requirement.and_then(|r| r.subcategory.clone()),
        priority: requirement.map(|r| r.priority),
    };

    enrollment.id = store
        .put(&enrollments_path(student_id), to_document(&enrollment)?)
        .await?;

    tracing::info!(
        "Added {} to term {} for {}",
        enrollment.course,
        enrollment.semester,
        student_id
    );
    Ok(CourseBrief::from_enrollment(&enrollment, &course))
}

/// Deletes the first enrollment for `short_name` and returns the course name.
pub async fn remove_enrollment<S: DocumentStore + ?Sized>(
    store: &S,
    student_id: &str,
    short_name: &str,
) -> Result<String> {
    let short_name = normalize_short_name(short_name);

    let matches = load_enrollments(store, student_id, &[Filter::eq("course", short_name.as_str())])
        .await?;
    let Some(enrollment) = matches.into_iter().next() else {
        tracing::warn!("{} has no enrollment for {}", student_id, short_name);
        return Err(PlannerError::not_found("Enrollment", short_name));
    };

    store
        .delete(&format!("{}/{}", enrollments_path(student_id), enrollment.id))
        .await?;

    tracing::info!("Removed {} for {}", enrollment.course, student_id);
    Ok(enrollment.course)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use crate::core::store::{requirements_path, COURSE_COLLECTION, MAJOR_COLLECTION, USER_COLLECTION};
    use crate::domain::ports::Document;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .put(
                USER_COLLECTION,
                doc(json!({
                    "id": "s1",
                    "major": "Computer Science",
                    "dateJoined": "2021-08-20",
                    "startingSemester": 1
                })),
            )
            .await
            .unwrap();
        store
            .put(
                MAJOR_COLLECTION,
                doc(json!({
                    "id": "cs",
                    "name": "Computer Science",
                    "degree": "BS",
                    "plannedLength": 8
                })),
            )
            .await
            .unwrap();
        for requirement in [
            json!({"category": "Core", "subcategory": "Programming", "course": ["CS2400"], "priority": 2, "semester": 2}),
            json!({"category": "Elective", "course": ["CS2400", "CS2420"], "priority": 1, "semester": 3}),
        ] {
            store
                .put(&requirements_path("cs"), doc(requirement))
                .await
                .unwrap();
        }
        for (name, credits) in [("CS2400", 4), ("CS2420", 3), ("MATH1500", 4)] {
            store
                .put(
                    COURSE_COLLECTION,
                    doc(json!({
                        "shortName": name,
                        "fullName": format!("{} full", name),
                        "college": "Engineering",
                        "credits": credits
                    })),
                )
                .await
                .unwrap();
        }
        store
    }

    fn request(course: &str, semester: i32) -> EnrollmentRequest {
        EnrollmentRequest {
            course: course.to_string(),
            semester,
        }
    }

    #[tokio::test]
    async fn test_add_snapshots_first_matching_requirement() {
        let store = seeded().await;

        let brief = add_enrollment(&store, "s1", &request("cs 2400", 2)).await.unwrap();

        assert_eq!(brief.short_name, "CS2400");
        assert_eq!(brief.category.as_deref(), Some("Core"));
        assert_eq!(brief.subcategory.as_deref(), Some("Programming"));
        assert_eq!(brief.priority, Some(2));
        assert_eq!(brief.semester, 2);
        assert!(!brief.suggestion);
        assert_ne!(brief.id, "");
    }

    #[tokio::test]
    async fn test_add_without_requirement_leaves_context_empty() {
        let store = seeded().await;

        let brief = add_enrollment(&store, "s1", &request("MATH1500", 1)).await.unwrap();
        assert_eq!(brief.category, None);
        assert_eq!(brief.priority, None);
    }

    #[tokio::test]
    async fn test_second_add_fails_and_keeps_one_record() {
        let store = seeded().await;

        add_enrollment(&store, "s1", &request("CS2420", 1)).await.unwrap();
        let err = add_enrollment(&store, "s1", &request("cs2420", 3))
            .await
            .unwrap_err();

        assert!(matches!(err, PlannerError::AlreadyEnrolled { ref course } if course == "CS2420"));
        let records = load_enrollments(&store, "s1", &[]).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_course_is_not_found() {
        let store = seeded().await;

        let err = add_enrollment(&store, "s1", &request("PHYS2210", 1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(load_enrollments(&store, "s1", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_returns_course_name() {
        let store = seeded().await;
        add_enrollment(&store, "s1", &request("CS2400", 2)).await.unwrap();

        let removed = remove_enrollment(&store, "s1", "cs2400").await.unwrap();
        assert_eq!(removed, "CS2400");
        assert!(load_enrollments(&store, "s1", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let store = seeded().await;

        let err = remove_enrollment(&store, "s1", "CS2400").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
