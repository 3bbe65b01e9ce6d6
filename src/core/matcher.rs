use crate::domain::model::{Course, CourseMatch, Requirement};

/// Uppercases and strips whitespace, e.g. `"cs 24"` -> `"CS24"`.
pub fn normalize_short_name(query: &str) -> String {
    query
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// First requirement, in storage order, whose option list names the course.
///
/// A course listed by several requirements only ever fills the first one.
pub fn find_requirement<'a>(
    requirements: &'a [Requirement],
    short_name: &str,
) -> Option<&'a Requirement> {
    requirements
        .iter()
        .find(|requirement| requirement.course.iter().any(|option| option == short_name))
}

pub fn search_catalog(
    courses: &[Course],
    requirements: &[Requirement],
    query: &str,
) -> Vec<CourseMatch> {
    let needle = normalize_short_name(query);

    courses
        .iter()
        .filter(|course| course.short_name.contains(&needle))
        .map(|course| {
            let requirement = find_requirement(requirements, &course.short_name);
            CourseMatch {
                course: course.clone(),
                category: requirement.map(|r| r.category.clone()),
                subcategory: requirement.and_then(|r| r.subcategory.clone()),
                priority: requirement.map(|r| r.priority),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(short_name: &str) -> Course {
        Course {
            id: short_name.to_lowercase(),
            short_name: short_name.to_string(),
            full_name: format!("{} full", short_name),
            college: "Engineering".to_string(),
            credits: 3,
            description: String::new(),
            prereq: vec![],
            semester: "Fall".to_string(),
        }
    }

    fn requirement(id: &str, priority: i64, options: &[&str]) -> Requirement {
        Requirement {
            id: id.to_string(),
            category: format!("category-{}", id),
            subcategory: Some(format!("sub-{}", id)),
            course: options.iter().map(|s| s.to_string()).collect(),
            priority,
            semester: 1,
        }
    }

    #[test]
    fn test_normalize_short_name() {
        assert_eq!(normalize_short_name("cs 24"), "CS24");
        assert_eq!(normalize_short_name("  math\t1500 "), "MATH1500");
    }

    #[test]
    fn test_first_match_wins_in_storage_order() {
        // storage order, not priority order
        let requirements = vec![
            requirement("late", 9, &["CS2400", "CS2420"]),
            requirement("early", 1, &["CS2400"]),
        ];

        for _ in 0..3 {
            let found = find_requirement(&requirements, "CS2400").unwrap();
            assert_eq!(found.id, "late");
        }
        assert!(find_requirement(&requirements, "MATH1500").is_none());
    }

    #[test]
    fn test_search_matches_normalized_substring() {
        let courses = vec![course("CS2400"), course("CS2420"), course("MATH1500")];
        let results = search_catalog(&courses, &[], "cs 24");

        let names: Vec<&str> = results.iter().map(|m| m.course.short_name.as_str()).collect();
        assert_eq!(names, vec!["CS2400", "CS2420"]);
        assert!(results.iter().all(|m| m.category.is_none()));
    }

    #[test]
    fn test_search_attaches_requirement_context() {
        let courses = vec![course("CS2400"), course("CS2420")];
        let requirements = vec![requirement("core", 4, &["CS2420"])];

        let results = search_catalog(&courses, &requirements, "CS24");
        assert_eq!(results[0].priority, None);
        assert_eq!(results[1].category.as_deref(), Some("category-core"));
        assert_eq!(results[1].subcategory.as_deref(), Some("sub-core"));
        assert_eq!(results[1].priority, Some(4));
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let courses = vec![course("CS2400")];
        assert!(search_catalog(&courses, &[], "phys").is_empty());
    }
}
