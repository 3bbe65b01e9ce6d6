use crate::core::calendar::current_term_on;
use crate::core::prereq::{choose_suggestion, Candidate};
use crate::domain::model::{
    Course, CourseBrief, Enrollment, Major, Requirement, StudentProfile, TermPlan,
};
use crate::domain::ports::{CourseCatalog, SuggestionPicker};
use crate::utils::error::Result;
use chrono::NaiveDate;
use futures::future::try_join_all;
use std::collections::HashSet;

/// Credit load a single term may carry once suggestions are added.
pub const MAX_TERM_CREDITS: u32 = 16;

/// The term suggestions are generated for, clamped to the program length.
pub fn next_term(major: &Major, current_term: i32) -> i32 {
    (major.planned_length - 1).min(current_term + 1)
}

/// Requirements no enrollment has claimed, lowest priority value first.
pub fn unmet_requirements<'a>(
    requirements: &'a [Requirement],
    enrollments: &[Enrollment],
) -> Vec<&'a Requirement> {
    let met: HashSet<i64> = enrollments.iter().filter_map(|e| e.priority).collect();

    let mut unmet: Vec<&Requirement> = requirements
        .iter()
        .filter(|requirement| !met.contains(&requirement.priority))
        .collect();
    unmet.sort_by_key(|requirement| requirement.priority);
    unmet
}

/// Walks enrollments then suggestions once, keeping a running credit total
/// for `next_term`. Enrollments are always kept; a suggestion is kept only
/// while the total stays within [`MAX_TERM_CREDITS`].
pub fn apply_credit_cap(working: Vec<CourseBrief>, next_term: i32) -> Vec<CourseBrief> {
    let mut term_credits = 0u32;
    let mut emitted = Vec::with_capacity(working.len());

    for brief in working {
        if brief.suggestion {
            term_credits += brief.credits;
            if term_credits <= MAX_TERM_CREDITS {
                emitted.push(brief);
            }
        } else {
            if brief.semester == next_term {
                term_credits += brief.credits;
            }
            emitted.push(brief);
        }
    }

    emitted
}

/// Everything a plan needs once the catalog has been read. Selection is
/// kept separate so the random source is only borrowed synchronously.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    next_term: i32,
    enrolled: Vec<CourseBrief>,
    slots: Vec<(Requirement, Vec<Course>)>,
    completed: HashSet<String>,
}

impl PlanDraft {
    pub fn next_term(&self) -> i32 {
        self.next_term
    }

    pub fn finish(self, picker: &mut dyn SuggestionPicker) -> TermPlan {
        let mut suggestions = Vec::new();

        for (requirement, options) in &self.slots {
            let candidates: Vec<Candidate> = options
                .iter()
                .map(|course| Candidate {
                    name: course.short_name.clone(),
                    prereq: course.prereq.clone(),
                })
                .collect();

            let Some(chosen) = choose_suggestion(&candidates, &self.completed, picker) else {
                tracing::debug!(
                    "No takeable option for requirement {} (priority {})",
                    requirement.category,
                    requirement.priority
                );
                continue;
            };

            if let Some(course) = options.iter().find(|c| c.short_name == chosen) {
                suggestions.push(CourseBrief::suggested(requirement, course, self.next_term));
            }
        }

        let generated = suggestions.len();
        let mut working = self.enrolled;
        let enrolled = working.len();
        working.extend(suggestions);

        let courses = apply_credit_cap(working, self.next_term);
        tracing::debug!(
            "Plan for term {}: {} enrolled, {} suggested, {} dropped by credit cap",
            self.next_term,
            enrolled,
            generated,
            enrolled + generated - courses.len()
        );

        TermPlan {
            next_term: self.next_term,
            courses,
        }
    }
}

/// Reads every course the plan touches from the catalog, concurrently.
pub async fn prepare_plan<C: CourseCatalog + ?Sized>(
    student: &StudentProfile,
    major: &Major,
    requirements: &[Requirement],
    enrollments: &[Enrollment],
    catalog: &C,
    today: NaiveDate,
) -> Result<PlanDraft> {
    let current = current_term_on(today, student.date_joined, student.starting_semester);
    let next_term = next_term(major, current);

    let unmet = unmet_requirements(requirements, enrollments);
    tracing::debug!(
        "Student {} in term {}: {} of {} requirements unmet",
        student.id,
        current,
        unmet.len(),
        requirements.len()
    );

    let option_lookups = unmet.iter().copied().map(move |requirement| {
        try_join_all(
            requirement
                .course
                .iter()
                .map(move |short_name| catalog.course(short_name)),
        )
    });
    let enrollment_lookups = enrollments
        .iter()
        .map(move |enrollment| catalog.course(&enrollment.course));

    let (resolved_options, enrolled_courses) = futures::try_join!(
        try_join_all(option_lookups),
        try_join_all(enrollment_lookups)
    )?;

    let enrolled = enrollments
        .iter()
        .zip(enrolled_courses.iter())
        .map(|(enrollment, course)| CourseBrief::from_enrollment(enrollment, course))
        .collect();

    let slots = unmet.into_iter().cloned().zip(resolved_options).collect();

    let completed = enrollments.iter().map(|e| e.course.clone()).collect();

    Ok(PlanDraft {
        next_term,
        enrolled,
        slots,
        completed,
    })
}

/// Current enrollments followed by the suggestions for the upcoming term.
pub async fn build_plan<C: CourseCatalog + ?Sized>(
    student: &StudentProfile,
    major: &Major,
    requirements: &[Requirement],
    enrollments: &[Enrollment],
    catalog: &C,
    picker: &mut dyn SuggestionPicker,
    today: NaiveDate,
) -> Result<TermPlan> {
    let draft = prepare_plan(student, major, requirements, enrollments, catalog, today).await?;
    Ok(draft.finish(picker))
}
