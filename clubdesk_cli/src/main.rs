use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use clubdesk_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clubdesk")]
#[command(about = "Physics club problem desk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the problem that is live today (default)
    Today {
        /// Show the rotation entry for a specific date (YYYY-MM-DD) instead
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Include the full solution in the output
        #[arg(long)]
        solution: bool,
    },

    /// Show when a problem number comes up in the rotation
    Schedule {
        /// Problem number (1-based rotation position)
        number: usize,
    },

    /// Run an interactive practice session
    Practice {
        /// Restrict to one exam (fma, physics-bowl)
        #[arg(long)]
        exam: Option<String>,

        /// Restrict to these topics (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,

        /// Restrict to these difficulties (easy, medium, hard; repeatable)
        #[arg(long = "difficulty")]
        difficulties: Vec<String>,

        /// Answer choices (0-based, comma-separated) for non-interactive runs
        #[arg(long)]
        script: Option<String>,
    },

    /// Record a club registration
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        grade: String,
        /// Competition events of interest (repeatable)
        #[arg(long = "event")]
        events: Vec<String>,
        #[arg(long = "physics-course")]
        physics_courses: Vec<String>,
        #[arg(long)]
        physics_other: Option<String>,
        #[arg(long = "math-course")]
        math_courses: Vec<String>,
        #[arg(long)]
        math_other: Option<String>,
        #[arg(long = "meeting")]
        meeting_preference: Vec<String>,
        #[arg(long)]
        meeting_other: Option<String>,
    },

    /// List registrations, or export them to CSV
    Roster {
        /// Export the roster log to CSV and archive it
        #[arg(long)]
        export: bool,

        /// Clean up archived roster logs after export
        #[arg(long, requires = "export")]
        cleanup: bool,
    },

    /// Pin a specific problem as live, overriding the rotation
    SetCurrent {
        /// Problem id (e.g. fma-3)
        problem_id: String,

        /// Who is setting the override
        #[arg(long, default_value = "admin")]
        by: String,
    },

    /// Remove the live-problem override
    ClearCurrent,
}

fn main() -> std::process::ExitCode {
    clubdesk_core::logging::init();

    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!(data_dir = %data_dir.display(), "Using data directory");

    match cli.command {
        Some(Commands::Today { date, solution }) => cmd_today(data_dir, date, solution, &config),
        Some(Commands::Schedule { number }) => cmd_schedule(number, &config),
        Some(Commands::Practice {
            exam,
            topics,
            difficulties,
            script,
        }) => cmd_practice(exam, topics, difficulties, script),
        Some(Commands::Register {
            first_name,
            last_name,
            email,
            grade,
            events,
            physics_courses,
            physics_other,
            math_courses,
            math_other,
            meeting_preference,
            meeting_other,
        }) => {
            let registration = Registration {
                id: uuid::Uuid::new_v4(),
                first_name,
                last_name,
                email,
                grade,
                events,
                physics_courses,
                physics_other,
                math_courses,
                math_other,
                meeting_preference,
                meeting_other,
                submitted_at: Utc::now(),
            };
            cmd_register(data_dir, registration)
        }
        Some(Commands::Roster { export, cleanup }) => cmd_roster(data_dir, export, cleanup),
        Some(Commands::SetCurrent { problem_id, by }) => cmd_set_current(data_dir, problem_id, by),
        Some(Commands::ClearCurrent) => cmd_clear_current(data_dir),
        None => cmd_today(data_dir, None, false, &config),
    }
}

fn load_validated_catalog() -> Result<&'static Catalog> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn cmd_today(
    data_dir: PathBuf,
    date: Option<NaiveDate>,
    solution: bool,
    config: &Config,
) -> Result<()> {
    let catalog = load_validated_catalog()?;
    let epoch = config.rotation.epoch;
    let total = config.rotation_total(catalog.len()).min(catalog.len());

    let problem = match date {
        // Schedule queries are pure rotation; the override only affects "now"
        Some(date) => {
            let number = problem_number_for_date(date, epoch, total);
            println!("Rotation for {}: problem #{}", date, number);
            catalog.by_number(number)
        }
        None => {
            let override_state = CurrentProblemState::load(&data_dir.join("current.json"))?;
            let today = Utc::now().date_naive();
            if let Some(ref state) = override_state {
                if state.live {
                    println!("Live problem pinned by {} at {}", state.set_by, state.set_at);
                }
            }
            resolve_current(override_state.as_ref(), catalog, today, epoch)
        }
    };

    match problem {
        Some(problem) => display_problem(problem, solution),
        None => println!("No problem available."),
    }

    Ok(())
}

fn cmd_schedule(number: usize, config: &Config) -> Result<()> {
    let catalog = load_validated_catalog()?;
    let epoch = config.rotation.epoch;
    let total = config.rotation_total(catalog.len()).min(catalog.len());
    let today = Utc::now().date_naive();

    let days = days_until_problem(number, today, epoch, total)?;
    let date = date_for_problem_number(number, today, epoch, total)?;

    if days == 0 {
        println!("Problem #{} is live today ({}).", number, date);
    } else {
        println!("Problem #{} comes up in {} day(s), on {}.", number, days, date);
    }
    if let Some(problem) = catalog.by_number(number) {
        println!(
            "  {} / {} / {}",
            problem.exam.label(),
            problem.topic,
            problem.difficulty.label()
        );
    }

    Ok(())
}

fn cmd_practice(
    exam: Option<String>,
    topics: Vec<String>,
    difficulties: Vec<String>,
    script: Option<String>,
) -> Result<()> {
    let catalog = load_validated_catalog()?;
    let filter = build_filter(exam, topics, difficulties)?;

    let mut session = PracticeSession::new(catalog, filter);

    if let Some(script) = script {
        return run_scripted(&mut session, catalog, &script);
    }

    loop {
        match session.phase() {
            Phase::Idle => {
                println!("No problems match your current filters.");
                break;
            }
            Phase::Completed => {
                println!(
                    "\nYou've completed all {} matching problems!",
                    session.answered_count()
                );
                break;
            }
            Phase::Presented => {
                let problem = session
                    .current_problem(catalog)
                    .expect("presented phase has a problem");
                display_problem(problem, false);

                match prompt_answer(problem.choices.len())? {
                    PracticeInput::Answer(choice) => {
                        session.submit_answer(catalog, choice);
                        report_answer(&session, catalog);
                    }
                    PracticeInput::Quit => break,
                }
            }
            Phase::Answered => match prompt_next()? {
                NextAction::Solution => {
                    session.toggle_solution();
                    if session.solution_revealed() {
                        if let Some(problem) = session.current_problem(catalog) {
                            println!("\nSolution:\n{}\n", problem.solution);
                        }
                    }
                }
                NextAction::Next => session.next_problem(catalog),
                NextAction::Quit => break,
            },
        }
    }

    print_stats(&session);
    Ok(())
}

/// Play a comma-separated list of 0-based answers without prompting
fn run_scripted(session: &mut PracticeSession, catalog: &Catalog, script: &str) -> Result<()> {
    for part in script.split(',').filter(|p| !p.trim().is_empty()) {
        if session.phase() != Phase::Presented {
            break;
        }
        let choice: usize = part
            .trim()
            .parse()
            .map_err(|_| Error::Other(format!("Invalid scripted answer '{}'", part)))?;

        let problem = session
            .current_problem(catalog)
            .expect("presented phase has a problem");
        println!("[{}] {}", problem.id, problem.question);

        session.submit_answer(catalog, choice);
        report_answer(session, catalog);
        session.next_problem(catalog);
    }

    if session.phase() == Phase::Completed {
        println!(
            "\nYou've completed all {} matching problems!",
            session.answered_count()
        );
    }

    print_stats(session);
    Ok(())
}

fn cmd_register(data_dir: PathBuf, registration: Registration) -> Result<()> {
    let errors = registration.validate();
    if !errors.is_empty() {
        eprintln!("Registration rejected:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Registration(errors.join("; ")));
    }

    let mut roster = JsonlRoster::new(data_dir.join("roster.jsonl"));
    roster.append(&registration)?;
    tracing::info!(id = %registration.id, "Registration recorded");

    println!(
        "✓ Registered {} {} ({})",
        registration.first_name, registration.last_name, registration.id
    );
    Ok(())
}

fn cmd_roster(data_dir: PathBuf, export: bool, cleanup: bool) -> Result<()> {
    let jsonl_path = data_dir.join("roster.jsonl");
    let csv_path = data_dir.join("roster.csv");

    if export {
        if !jsonl_path.exists() {
            println!("No roster log found - nothing to export.");
            return Ok(());
        }

        let count = clubdesk_core::export::roster_to_csv_and_archive(&jsonl_path, &csv_path)?;
        println!("✓ Exported {} registrations to CSV", count);
        println!("  CSV: {}", csv_path.display());

        if cleanup {
            let cleaned = clubdesk_core::export::cleanup_processed_rosters(&data_dir)?;
            if cleaned > 0 {
                println!("✓ Cleaned up {} archived roster logs", cleaned);
            }
        }
        return Ok(());
    }

    let registrations = load_registrations(&jsonl_path, &csv_path)?;
    if registrations.is_empty() {
        println!("No registrations yet.");
        return Ok(());
    }

    println!("{} registration(s):", registrations.len());
    for r in &registrations {
        println!(
            "  {} {} <{}> grade {} - {}",
            r.first_name,
            r.last_name,
            r.email,
            r.grade,
            r.events.join(", ")
        );
    }
    Ok(())
}

fn cmd_set_current(data_dir: PathBuf, problem_id: String, by: String) -> Result<()> {
    let catalog = load_validated_catalog()?;
    if catalog.by_id(&problem_id).is_none() {
        return Err(Error::Other(format!(
            "Unknown problem id '{}'",
            problem_id
        )));
    }

    let state = CurrentProblemState {
        problem_id: problem_id.clone(),
        set_by: by,
        set_at: Utc::now(),
        live: true,
    };
    state.save(&data_dir.join("current.json"))?;

    println!("✓ Pinned {} as the live problem", problem_id);
    Ok(())
}

fn cmd_clear_current(data_dir: PathBuf) -> Result<()> {
    CurrentProblemState::clear(&data_dir.join("current.json"))?;
    println!("✓ Cleared the live-problem override; rotation resumes");
    Ok(())
}

fn build_filter(
    exam: Option<String>,
    topics: Vec<String>,
    difficulties: Vec<String>,
) -> Result<FilterSelection> {
    let exam = match exam.as_deref() {
        None | Some("both") => ExamFilter::Both,
        Some("fma") => ExamFilter::Fma,
        Some("physics-bowl") => ExamFilter::PhysicsBowl,
        Some(other) => {
            return Err(Error::Other(format!(
                "Unknown exam '{}' (expected fma, physics-bowl, or both)",
                other
            )))
        }
    };

    let difficulties = difficulties
        .iter()
        .map(|d| match d.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::Other(format!(
                "Unknown difficulty '{}' (expected easy, medium, or hard)",
                other
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FilterSelection {
        exam,
        topics,
        difficulties,
    })
}

fn display_problem(problem: &Problem, solution: bool) {
    println!("\n╭─────────────────────────────────────────╮");
    println!(
        "│  {} / {} / {}",
        problem.exam.label(),
        problem.topic,
        problem.difficulty.label()
    );
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  [{}] {}", problem.id, problem.question);
    println!();
    for (i, choice) in problem.choices.iter().enumerate() {
        println!("  {}. {}", choice_letter(i), choice);
    }
    if solution {
        println!();
        println!("  Solution:\n{}", problem.solution);
    }
    println!();
}

fn report_answer(session: &PracticeSession, catalog: &Catalog) {
    let Some(problem) = session.current_problem(catalog) else {
        return;
    };
    match session.selected_answer() {
        Some(choice) if choice == problem.correct_answer => {
            println!("✓ Correct!");
        }
        _ => {
            println!(
                "✗ Incorrect. The answer was {}.",
                choice_letter(problem.correct_answer)
            );
        }
    }
}

fn print_stats(session: &PracticeSession) {
    println!(
        "\nSession: {} answered, {} correct, {} incorrect",
        session.answered_count(),
        session.correct_count(),
        session.incorrect_count()
    );
}

fn choice_letter(index: usize) -> char {
    (b'A' + (index as u8 % 26)) as char
}

enum PracticeInput {
    Answer(usize),
    Quit,
}

fn prompt_answer(choice_count: usize) -> Result<PracticeInput> {
    loop {
        print!("Answer (A-{}), or 'q' to quit > ", choice_letter(choice_count - 1));
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input == "q" {
            return Ok(PracticeInput::Quit);
        }
        if let Some(c) = input.chars().next() {
            if input.len() == 1 && c.is_ascii_alphabetic() {
                let index = (c as u8 - b'a') as usize;
                if index < choice_count {
                    return Ok(PracticeInput::Answer(index));
                }
            }
        }
        println!("Please enter a letter between A and {}.", choice_letter(choice_count - 1));
    }
}

enum NextAction {
    Next,
    Solution,
    Quit,
}

fn prompt_next() -> Result<NextAction> {
    println!("─────────────────────────────────────────");
    println!("Press Enter for the next problem");
    println!("  's' + Enter to toggle the solution");
    println!("  'q' + Enter to quit");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let action = match input.trim().to_lowercase().as_str() {
        "q" => NextAction::Quit,
        "s" => NextAction::Solution,
        _ => NextAction::Next,
    };

    Ok(action)
}
