pub mod calendar;
pub mod engine;
pub mod enrollment;
pub mod matcher;
pub mod planner;
pub mod prereq;
pub mod store;

pub use crate::domain::model::{
    Course, CourseBrief, CourseMatch, Enrollment, EnrollmentRequest, Major, Requirement,
    StudentProfile, TermPlan,
};
pub use crate::domain::ports::{CourseCatalog, Document, DocumentStore, Filter, FilterOp, SuggestionPicker};
pub use crate::utils::error::Result;
