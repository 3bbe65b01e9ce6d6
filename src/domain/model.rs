use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity given to suggestions that have not been persisted.
pub const UNSAVED_ID: &str = "unsaved";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default)]
    pub id: String,
    pub short_name: String,
    pub full_name: String,
    pub college: String,
    pub credits: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prereq: Vec<String>,
    #[serde(default)]
    pub semester: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Major {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub degree: String,
    pub planned_length: i32,
    #[serde(default)]
    pub semester_divisions: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    #[serde(default)]
    pub id: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub course: Vec<String>,
    pub priority: i64,
    pub semester: i32,
}

/// A course the student has taken or planned (stored as `UserCourse`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default)]
    pub id: String,
    pub course: String,
    pub semester: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub id: String,
    pub major: String,
    pub date_joined: NaiveDate,
    pub starting_semester: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub onboarded: bool,
}

/// Course details plus the enrollment/requirement context it appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBrief {
    pub id: String,
    pub short_name: String,
    pub full_name: String,
    pub college: String,
    pub credits: u32,
    pub description: String,
    pub prereq: Vec<String>,
    pub semester: i32,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub priority: Option<i64>,
    pub suggestion: bool,
}

impl CourseBrief {
    pub fn from_enrollment(enrollment: &Enrollment, course: &Course) -> Self {
        Self {
            id: enrollment.id.clone(),
            semester: enrollment.semester,
            category: enrollment.category.clone(),
            subcategory: enrollment.subcategory.clone(),
            priority: enrollment.priority,
            suggestion: false,
            ..Self::from_course(course)
        }
    }

    pub fn suggested(requirement: &Requirement, course: &Course, semester: i32) -> Self {
        Self {
            id: UNSAVED_ID.to_string(),
            semester,
            category: Some(requirement.category.clone()),
            subcategory: requirement.subcategory.clone(),
            priority: Some(requirement.priority),
            suggestion: true,
            ..Self::from_course(course)
        }
    }

    fn from_course(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            short_name: course.short_name.clone(),
            full_name: course.full_name.clone(),
            college: course.college.clone(),
            credits: course.credits,
            description: course.description.clone(),
            prereq: course.prereq.clone(),
            semester: 0,
            category: None,
            subcategory: None,
            priority: None,
            suggestion: false,
        }
    }
}

/// A catalog search hit with the requirement slot it would fill, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMatch {
    #[serde(flatten)]
    pub course: Course,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub priority: Option<i64>,
}

/// What the caller asks to enroll in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub course: String,
    pub semester: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermPlan {
    pub next_term: i32,
    pub courses: Vec<CourseBrief>,
}

impl TermPlan {
    pub fn enrolled(&self) -> impl Iterator<Item = &CourseBrief> {
        self.courses.iter().filter(|brief| !brief.suggestion)
    }

    pub fn suggestions(&self) -> impl Iterator<Item = &CourseBrief> {
        self.courses.iter().filter(|brief| brief.suggestion)
    }
}
