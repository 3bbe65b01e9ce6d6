use anyhow::Result;
use chrono::NaiveDate;
use degree_planner::domain::model::EnrollmentRequest;
use degree_planner::utils::validation::Validate;
use degree_planner::{FirstPicker, JsonFileStore, PlannerConfig, PlannerEngine};
use serde_json::json;
use tempfile::TempDir;

fn fixture() -> serde_json::Value {
    json!({
        "Users": [
            {"id": "s1", "major": "Computer Science", "dateJoined": "2022-08-22", "startingSemester": 1}
        ],
        "Majors": [
            {"id": "cs", "name": "Computer Science", "degree": "BS", "plannedLength": 4}
        ],
        "Majors/cs/requirements": [
            {"id": "r1", "category": "Core", "course": ["CS1000"], "priority": 1, "semester": 1},
            {"id": "r2", "category": "Core", "course": ["CS2400"], "priority": 2, "semester": 2}
        ],
        "Courses": [
            {"id": "c1", "shortName": "CS1000", "fullName": "Intro to Programming", "college": "Engineering", "credits": 3},
            {"id": "c2", "shortName": "CS2400", "fullName": "Data Structures", "college": "Engineering", "credits": 4, "prereq": ["CS1000"]}
        ]
    })
}

#[tokio::test]
async fn test_config_points_engine_at_data_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("planner.json");
    tokio::fs::write(&data_path, serde_json::to_string_pretty(&fixture())?).await?;

    let config_path = temp_dir.path().join("planner.toml");
    let normalized = data_path.to_str().unwrap().replace('\\', "/");
    tokio::fs::write(
        &config_path,
        format!(
            "[store]\ndata_file = \"{}\"\n\n[planner]\nstudent_id = \"s1\"\nseed = 3\n",
            normalized
        ),
    )
    .await?;

    let config = PlannerConfig::from_file(&config_path)?;
    config.validate()?;

    let store = JsonFileStore::open(&config.store.data_file).await?;
    let engine = PlannerEngine::seeded(store, config.planner.seed.unwrap_or_default())
        .on_date(NaiveDate::from_ymd_opt(2022, 10, 1).unwrap());

    let student = config.student_id().unwrap();
    assert_eq!(engine.current_term(student).await?, 1);

    let plan = engine.build_plan(student).await?;
    // planned length 4 caps nothing here: next term is 2
    assert_eq!(plan.next_term, 2);
    let names: Vec<&str> = plan.courses.iter().map(|b| b.short_name.as_str()).collect();
    assert_eq!(names, vec!["CS1000"]);
    Ok(())
}

#[tokio::test]
async fn test_enrollments_persist_across_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("planner.json");
    tokio::fs::write(&data_path, serde_json::to_string(&fixture())?).await?;
    let today = NaiveDate::from_ymd_opt(2022, 10, 1).unwrap();

    {
        let engine =
            PlannerEngine::with_picker(JsonFileStore::open(&data_path).await?, FirstPicker)
                .on_date(today);
        let brief = engine
            .add_enrollment(
                "s1",
                &EnrollmentRequest {
                    course: "cs1000".to_string(),
                    semester: 1,
                },
            )
            .await?;
        assert_eq!(brief.priority, Some(1));
    }

    let engine = PlannerEngine::with_picker(JsonFileStore::open(&data_path).await?, FirstPicker)
        .on_date(today);
    let plan = engine.build_plan("s1").await?;

    let enrolled: Vec<&str> = plan.enrolled().map(|b| b.short_name.as_str()).collect();
    let suggested: Vec<&str> = plan.suggestions().map(|b| b.short_name.as_str()).collect();
    assert_eq!(enrolled, vec!["CS1000"]);
    assert_eq!(suggested, vec!["CS2400"]);

    assert_eq!(engine.remove_enrollment("s1", "CS1000").await?, "CS1000");
    let reopened = PlannerEngine::with_picker(JsonFileStore::open(&data_path).await?, FirstPicker)
        .on_date(today);
    assert!(reopened.current_courses("s1").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_next_term_clamped_at_program_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("planner.json");
    tokio::fs::write(&data_path, serde_json::to_string(&fixture())?).await?;

    // four years in: term 9, program has 4 terms
    let engine = PlannerEngine::with_picker(JsonFileStore::open(&data_path).await?, FirstPicker)
        .on_date(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());

    assert_eq!(engine.current_term("s1").await?, 9);
    let plan = engine.build_plan("s1").await?;
    assert_eq!(plan.next_term, 3);
    assert!(plan.suggestions().all(|b| b.semester == 3));
    Ok(())
}
