use anyhow::Context;
use clap::Parser;
use degree_planner::config::cli::{require_student, Command};
use degree_planner::domain::model::{CourseBrief, EnrollmentRequest};
use degree_planner::domain::ports::DocumentStore;
use degree_planner::utils::error::ErrorSeverity;
use degree_planner::utils::logger;
use degree_planner::{CliConfig, JsonFileStore, PlannerEngine, PlannerError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if settings.json_logs() {
        logger::init_json_logger(&settings.logging.level);
    } else {
        logger::init_cli_logger_with_level(&settings.logging.level);
    }
    tracing::debug!("Settings: {:?}", settings);

    let store = JsonFileStore::open(&settings.store.data_file)
        .await
        .with_context(|| format!("failed to open data file '{}'", settings.store.data_file))?;
    tracing::info!("📁 Using data file {}", store.path().display());

    let engine = match settings.planner.seed {
        Some(seed) => PlannerEngine::seeded(store, seed),
        None => PlannerEngine::new(store),
    };

    let student = if cli.needs_student() {
        match require_student(&settings) {
            Ok(student) => student,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
    } else {
        String::new()
    };

    if let Err(e) = run(&engine, &student, cli.command).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium | ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<S: DocumentStore>(
    engine: &PlannerEngine<S>,
    student: &str,
    command: Command,
) -> Result<(), PlannerError> {
    match command {
        Command::Term => {
            let term = engine.current_term(student).await?;
            let year = engine.current_year(student).await?;
            println!("Term {} (year {})", term, year);
        }
        Command::Plan => {
            let plan = engine.build_plan(student).await?;
            println!("Enrolled:");
            for brief in plan.enrolled() {
                print_brief(brief);
            }
            println!("\nSuggested for term {}:", plan.next_term);
            for brief in plan.suggestions() {
                print_brief(brief);
            }
        }
        Command::Search { query } => {
            for hit in engine.search_catalog(student, &query).await? {
                match &hit.category {
                    Some(category) => println!(
                        "{:<10} {} [{}]",
                        hit.course.short_name, hit.course.full_name, category
                    ),
                    None => println!("{:<10} {}", hit.course.short_name, hit.course.full_name),
                }
            }
        }
        Command::Info { course } => {
            let course = engine.course_info(&course).await?;
            println!("{}\n{}", course.full_name, course.short_name);
            println!("Credits: {}\nCollege: {}", course.credits, course.college);
            if !course.prereq.is_empty() {
                println!("Prerequisites: {}", course.prereq.join(", "));
            }
            println!("\n{}", course.description);
        }
        Command::Add { course, semester } => {
            let brief = engine
                .add_enrollment(student, &EnrollmentRequest { course, semester })
                .await?;
            println!("✅ Added {} to term {}", brief.short_name, brief.semester);
        }
        Command::Remove { course } => {
            let removed = engine.remove_enrollment(student, &course).await?;
            println!("✅ Removed {}", removed);
        }
        Command::Majors => {
            for name in engine.list_majors().await? {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

fn print_brief(brief: &CourseBrief) {
    println!(
        "  term {:<2} {:<10} {:>2} cr  {}{}",
        brief.semester,
        brief.short_name,
        brief.credits,
        brief.full_name,
        brief
            .category
            .as_ref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default()
    );
}
