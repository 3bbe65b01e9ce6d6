use crate::core::calendar::{current_term_on, current_year};
use crate::core::enrollment;
use crate::core::matcher::{normalize_short_name, search_catalog};
use crate::core::planner::prepare_plan;
use crate::core::prereq::RandomPicker;
use crate::core::store::{
    fetch_many, load_enrollments, load_major, load_requirements, load_student, StoreCatalog,
    COURSE_COLLECTION, MAJOR_COLLECTION,
};
use crate::domain::model::{
    Course, CourseBrief, CourseMatch, EnrollmentRequest, Major, TermPlan,
};
use crate::domain::ports::{CourseCatalog, DocumentStore, SuggestionPicker};
use crate::utils::error::Result;
use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use tokio::sync::Mutex;

/// Public surface of the planner. Every call reads fresh data from the store.
pub struct PlannerEngine<S: DocumentStore, P: SuggestionPicker = RandomPicker<StdRng>> {
    store: S,
    picker: Mutex<P>,
    today: Option<NaiveDate>,
}

impl<S: DocumentStore> PlannerEngine<S, RandomPicker<StdRng>> {
    pub fn new(store: S) -> Self {
        Self::with_picker(store, RandomPicker::from_entropy())
    }

    pub fn seeded(store: S, seed: u64) -> Self {
        Self::with_picker(store, RandomPicker::seeded(seed))
    }
}

impl<S: DocumentStore, P: SuggestionPicker> PlannerEngine<S, P> {
    pub fn with_picker(store: S, picker: P) -> Self {
        Self {
            store,
            picker: Mutex::new(picker),
            today: None,
        }
    }

    /// Pins the evaluation date instead of using the local clock.
    pub fn on_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub async fn current_term(&self, student_id: &str) -> Result<i32> {
        let student = load_student(&self.store, student_id).await?;
        Ok(current_term_on(
            self.today(),
            student.date_joined,
            student.starting_semester,
        ))
    }

    pub async fn current_year(&self, student_id: &str) -> Result<i32> {
        Ok(current_year(self.current_term(student_id).await?))
    }

    pub async fn current_major(&self, student_id: &str) -> Result<Major> {
        let student = load_student(&self.store, student_id).await?;
        load_major(&self.store, &student.major).await
    }

    pub async fn list_majors(&self) -> Result<Vec<String>> {
        let majors: Vec<Major> = fetch_many(&self.store, MAJOR_COLLECTION, &[]).await?;
        Ok(majors.into_iter().map(|major| major.name).collect())
    }

    /// Enrollments followed by suggestions for the upcoming term.
    pub async fn build_plan(&self, student_id: &str) -> Result<TermPlan> {
        let student = load_student(&self.store, student_id).await?;
        let (major, enrollments) = futures::try_join!(
            load_major(&self.store, &student.major),
            load_enrollments(&self.store, student_id, &[])
        )?;
        let requirements = load_requirements(&self.store, &major).await?;

        let catalog = StoreCatalog::new(&self.store);
        let draft = prepare_plan(
            &student,
            &major,
            &requirements,
            &enrollments,
            &catalog,
            self.today(),
        )
        .await?;

        let mut picker = self.picker.lock().await;
        let plan = draft.finish(&mut *picker);

        tracing::info!(
            "📚 Plan for {}: {} courses, {} suggested for term {}",
            student_id,
            plan.courses.len(),
            plan.suggestions().count(),
            plan.next_term
        );
        Ok(plan)
    }

    pub async fn current_courses(&self, student_id: &str) -> Result<Vec<CourseBrief>> {
        let plan = self.build_plan(student_id).await?;
        Ok(plan.enrolled().cloned().collect())
    }

    pub async fn suggestions(&self, student_id: &str) -> Result<Vec<CourseBrief>> {
        let plan = self.build_plan(student_id).await?;
        Ok(plan.suggestions().cloned().collect())
    }

    /// Catalog search annotated with the requirement each hit would fill
    /// for this student's major.
    pub async fn search_catalog(&self, student_id: &str, query: &str) -> Result<Vec<CourseMatch>> {
        let student = load_student(&self.store, student_id).await?;
        let major = load_major(&self.store, &student.major).await?;
        let (courses, requirements) = futures::try_join!(
            fetch_many::<Course, _>(&self.store, COURSE_COLLECTION, &[]),
            load_requirements(&self.store, &major)
        )?;

        let results = search_catalog(&courses, &requirements, query);
        tracing::debug!("Search '{}' matched {} courses", query, results.len());
        Ok(results)
    }

    pub async fn course_info(&self, name: &str) -> Result<Course> {
        StoreCatalog::new(&self.store)
            .course(&normalize_short_name(name))
            .await
    }

    pub async fn add_enrollment(
        &self,
        student_id: &str,
        request: &EnrollmentRequest,
    ) -> Result<CourseBrief> {
        enrollment::add_enrollment(&self.store, student_id, request).await
    }

    pub async fn remove_enrollment(&self, student_id: &str, short_name: &str) -> Result<String> {
        enrollment::remove_enrollment(&self.store, student_id, short_name).await
    }
}
