//! CyberAware CLI - personalized cybersecurity awareness tips and quizzes
//!
//! Runs the tip selector and the quiz engine from a terminal, with profiles
//! kept in memory or loaded from a JSON file.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::{Arg, ArgMatches, Command};
use rand_core::OsRng;

use cyberaware::{
    config::AwarenessConfig,
    errors::{AwarenessError, Result},
    profile::{InMemoryProfileStore, ProfileRecord},
    quiz::{QuizSession, QuizState, ScoreTier},
    telemetry, AwarenessEngine, Cohort,
};

#[tokio::main]
async fn main() {
    let matches = Command::new("CyberAware")
        .version(env!("CARGO_PKG_VERSION"))
        .author("CyberAware Team")
        .about("Personalized cybersecurity awareness tips and quizzes")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (JSON)"),
        )
        .arg(
            Arg::new("minimal")
                .long("minimal")
                .help("Use minimal configuration for low-connectivity environments")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("profiles")
                .long("profiles")
                .value_name("FILE")
                .help("JSON array of user profiles to load"),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .value_name("LOCALE")
                .help("Device locale, e.g. en-US or kn-IN"),
        )
        .subcommand(Command::new("cohorts").about("List the supported learner groups"))
        .subcommand(
            Command::new("tip")
                .about("Show a random safety tip")
                .arg(Arg::new("cohort").long("cohort").help("Learner group"))
                .arg(Arg::new("user").long("user").help("Signed-in user id")),
        )
        .subcommand(
            Command::new("quiz")
                .about("Take the quiz interactively")
                .arg(Arg::new("cohort").long("cohort").help("Learner group"))
                .arg(Arg::new("user").long("user").help("Signed-in user id")),
        )
        .subcommand(Command::new("demo").about("Run a scripted walkthrough for every group"))
        .get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return;
        }
    };

    if let Err(e) = telemetry::init(&config) {
        eprintln!("Logging disabled: {}", e);
    }

    let store = Arc::new(InMemoryProfileStore::new());
    if let Some(path) = matches.get_one::<String>("profiles") {
        if let Err(e) = load_profiles(&store, path).await {
            eprintln!("❌ Could not load profiles: {}", e);
            return;
        }
    }

    let engine = match AwarenessEngine::new(config, store.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Startup failed: {}", e);
            return;
        }
    };

    match matches.subcommand() {
        Some(("cohorts", _)) => show_cohorts(),
        Some(("tip", sub_matches)) => show_tip(&engine, sub_matches).await,
        Some(("quiz", sub_matches)) => {
            let session = match sub_matches.get_one::<String>("cohort") {
                Some(cohort) => engine.start_session(cohort),
                None => {
                    let user = sub_matches.get_one::<String>("user").map(String::as_str);
                    engine.start_session_for_user(user).await
                }
            };
            if let Err(e) = run_interactive_quiz(&engine, session) {
                eprintln!("❌ Quiz stopped: {}", e.to_user_message());
            }
        }
        Some(("demo", _)) => {
            println!("🛡️  CyberAware Demo - Personalized Safety Learning");
            println!("{}", "=".repeat(50));
            run_demo(&engine, &store).await;
        }
        _ => {
            println!("🛡️  CyberAware - Cybersecurity awareness for everyone");
            println!("Use --help to see available commands");
            println!();
            println!("Quick Demo:");
            println!("  cargo run -- demo              # Scripted walkthrough");
            println!("  cargo run -- quiz --cohort rural");
        }
    }
}

fn load_config(matches: &ArgMatches) -> Result<AwarenessConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AwarenessConfig::from_json_file(path)?,
        None if matches.get_flag("minimal") => AwarenessConfig::minimal(),
        None => AwarenessConfig::default(),
    };
    if let Some(locale) = matches.get_one::<String>("locale") {
        config.locale = locale.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn load_profiles(store: &InMemoryProfileStore, path: &str) -> Result<()> {
    let raw = std::fs::read_to_string(path)?;
    let profiles: Vec<ProfileRecord> = serde_json::from_str(&raw)?;
    let count = profiles.len();
    for profile in profiles {
        store.upsert(profile).await;
    }
    tracing::info!(count, path, "profiles loaded");
    Ok(())
}

fn show_cohorts() {
    println!("   👥 Learner groups:");
    for cohort in Cohort::ALL {
        let profile = cohort.profile();
        println!("      {:<13} {} - {}", cohort.as_str(), profile.label, profile.description);
    }
}

async fn show_tip(engine: &AwarenessEngine, sub_matches: &ArgMatches) {
    let tip = match sub_matches.get_one::<String>("cohort") {
        Some(cohort) => engine.select_tip(cohort, &mut OsRng),
        None => {
            let user = sub_matches.get_one::<String>("user").map(String::as_str);
            engine.select_tip_for_user(user, &mut OsRng).await
        }
    };
    println!("💡 {}", engine.translate(&tip));
}

fn run_interactive_quiz(engine: &AwarenessEngine, mut session: QuizSession) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let cohort = session.cohort().to_string();
    println!("📝 Cyber Safety Quiz ({} focus)", cohort);

    while let Some(question) = session.current_question().cloned() {
        println!();
        println!(
            "Question {} of {}: {}",
            session.current_index() + 1,
            session.len(),
            question.question
        );
        for (index, option) in question.options.iter().enumerate() {
            println!("   {}. {}", option_label(index), option);
        }

        loop {
            print!("Your answer: ");
            io::stdout().flush()?;
            let line = match lines.next() {
                Some(line) => line?,
                None => return Ok(()),
            };
            let Some(choice) = parse_choice(&line) else {
                println!("   Please enter a letter such as A or B.");
                continue;
            };
            match session.select_answer(choice) {
                Ok(()) => break,
                Err(AwarenessError::InvalidStateTransition { reason, .. }) => {
                    println!("   ⚠️  {}", reason);
                }
                Err(e) => return Err(e),
            }
        }

        if session.submit_answer()? {
            println!("   ✅ Correct!");
        } else {
            println!(
                "   ❌ Not quite. The answer was {}: {}",
                option_label(question.correct_index),
                question.correct_option()
            );
        }
        println!("   {}", question.explanation);
        println!("   💡 {}", question.tip);
        session.advance()?;
    }

    print_report(&session);

    print!("\nTry again? [y/N] ");
    io::stdout().flush()?;
    if let Some(Ok(answer)) = lines.next() {
        if answer.trim().eq_ignore_ascii_case("y") {
            drop(lines);
            return run_interactive_quiz(engine, engine.restart(&session));
        }
    }
    Ok(())
}

fn print_report(session: &QuizSession) {
    if let Some(report) = session.report() {
        let symbol = match report.tier {
            ScoreTier::Perfect => "🏆",
            ScoreTier::High | ScoreTier::Medium => "🏅",
            ScoreTier::Low => "🎗️",
        };
        println!();
        println!("{} Your Score: {}/{}", symbol, report.score, report.total);
        println!("   {}% Correct", report.percentage);
        println!("   {}", report.tier.message());
    }
}

/// "A".."Z" for the first 26 options, then the 1-based number
fn option_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => char::from(b'A' + offset).to_string(),
        _ => (index + 1).to_string(),
    }
}

fn parse_choice(input: &str) -> Option<usize> {
    let input = input.trim();
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => input.parse::<usize>().ok().and_then(|n| n.checked_sub(1)),
    }
}

async fn run_demo(engine: &AwarenessEngine, store: &InMemoryProfileStore) {
    println!("\n1. Registering learner profiles...");
    let demo_users = vec![
        ("asha", "student", "Asha - College Student"),
        ("ravi", "professional", "Ravi - Office Worker"),
        ("meena", "homemaker", "Meena - Homemaker"),
        ("gowda", "rural", "Gowda - Farmer"),
        ("lakshmi", "senior", "Lakshmi - Retired Teacher"),
        ("guest", "astronaut", "Guest - Unknown Group"),
    ];
    for (user_id, demographic, description) in &demo_users {
        store
            .upsert(ProfileRecord::new(*user_id).with_demographic(*demographic))
            .await;
        println!("   ✅ Registered {}", description);
    }

    println!("\n2. Personalized tips...");
    let tip = engine.tip_text_for_user(None, &mut OsRng).await;
    println!("   (signed out) 💡 {}", tip);
    for (user_id, _, description) in &demo_users {
        let cohort = engine.resolve_cohort(user_id).await;
        let tip = engine.tip_text_for_user(Some(*user_id), &mut OsRng).await;
        println!("   {} [{}] 💡 {}", description, cohort, tip);
    }

    println!("\n3. Scripted quizzes...");
    for (user_id, _, description) in &demo_users {
        let mut session = engine.start_session_for_user(Some(*user_id)).await;
        // Alternate right and wrong answers to exercise scoring
        let mut answer_right = true;
        while let Some(question) = session.current_question().cloned() {
            let choice = if answer_right {
                question.correct_index
            } else {
                (question.correct_index + 1) % question.options.len()
            };
            answer_right = !answer_right;
            let step = session
                .select_answer(choice)
                .and_then(|_| session.submit_answer())
                .and_then(|_| session.advance());
            match step {
                Ok(QuizState::Completed) => break,
                Ok(QuizState::InProgress) => {}
                Err(e) => {
                    println!("   ❌ {}: {}", description, e);
                    break;
                }
            }
        }
        if let Some(report) = session.report() {
            println!(
                "   {} [{}]: {}/{} ({}%) - {}",
                description,
                report.cohort,
                report.score,
                report.total,
                report.percentage,
                report.tier.message()
            );
        }
    }

    println!("\n✅ Demo completed successfully!");
}
