//! services/companion/src/bin/companion.rs

use companion_lib::{
    app::{Companion, Delivery, SetupOutcome},
    config::Config,
    error::{AppError, AppResult},
};
use prepwise_core::{
    onboarding::{self, OnboardingForm, WizardStep},
    prompts::split_doubt_entry,
    quiz::format_subjects,
    QuizRun,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Input = Lines<BufReader<Stdin>>;

const HELP: &str = "\
Commands:
  plan [--refresh]        show the learning plan
  explain <topic-id>      explain a topic
  doubt <topic-id> <text> ask a follow-up question
  show <topic-id>         show a topic's explanation and doubts
  quiz <topic-id>         take a quiz on a topic
  summary                 show profile and quiz statistics
  logout                  reset the profile and start over
  quit                    exit";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(backend = %config.backend_base_url, "Configuration loaded.");

    // --- 2. Build the Session Controller ---
    let companion = Companion::from_config(config);
    let mut input = BufReader::new(io::stdin()).lines();

    // --- 3. Run Onboarding, Then the Command Loop ---
    loop {
        if !onboard(&companion, &mut input).await? {
            return Ok(());
        }
        match command_loop(&companion, &mut input).await? {
            Next::Quit => return Ok(()),
            Next::Onboard => continue,
        }
    }
}

enum Next {
    Quit,
    Onboard,
}

async fn say(text: &str) -> AppResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

async fn ask(input: &mut Input, prompt: &str) -> AppResult<Option<String>> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}

/// Asks for one value from a fixed list, by number or by name.
async fn choose(input: &mut Input, label: &str, options: &[&str]) -> AppResult<Option<String>> {
    let listing: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("{}) {}", i + 1, o))
        .collect();
    say(&format!("{}: {}", label, listing.join("  "))).await?;
    let Some(answer) = ask(input, "> ").await? else {
        return Ok(None);
    };
    let picked = answer
        .parse::<usize>()
        .ok()
        .and_then(|n| options.get(n.wrapping_sub(1)))
        .or_else(|| options.iter().find(|o| o.eq_ignore_ascii_case(&answer)))
        .map(|o| o.to_string());
    Ok(Some(picked.unwrap_or_default()))
}

/// Walks the three wizard steps. Returns `false` when input ends.
async fn onboard(companion: &Companion, input: &mut Input) -> AppResult<bool> {
    say("Welcome! Let's set up your study profile.").await?;
    let mut form = OnboardingForm::default();
    let mut step = WizardStep::Basics;

    loop {
        say(&format!("-- Step {} of 3 --", step.number())).await?;
        let filled = match step {
            WizardStep::Basics => fill_basics(&mut form, input).await?,
            WizardStep::Preferences => fill_preferences(&mut form, input).await?,
            WizardStep::Schedule => fill_schedule(&mut form, input).await?,
        };
        if !filled {
            return Ok(false);
        }

        if let Err(e) = form.validate_step(step) {
            for field in &e.missing {
                say(&format!("  ! {}", field)).await?;
            }
            continue;
        }
        match step.next() {
            Some(next) => step = next,
            None => break,
        }
    }

    match companion.complete_setup(form).await {
        Ok(outcome) => {
            if let SetupOutcome::Masked { .. } = outcome {
                info!("Continuing with a locally completed profile.");
            }
            let profile = companion.profile().await;
            say(&format!(
                "{}. Welcome, {}. Type 'help' for commands.",
                outcome.ack().message,
                profile.name
            ))
            .await?;
            Ok(true)
        }
        Err(e) => {
            error!(error = %e, "Setup failed.");
            say(&format!("Setup failed: {}", e)).await?;
            Ok(false)
        }
    }
}

async fn fill_basics(form: &mut OnboardingForm, input: &mut Input) -> AppResult<bool> {
    let Some(name) = ask(input, "Your name: ").await? else {
        return Ok(false);
    };
    form.name = name;
    let Some(exam) = choose(input, "Exam", onboarding::EXAMS).await? else {
        return Ok(false);
    };
    form.exam = exam;
    Ok(true)
}

async fn fill_preferences(form: &mut OnboardingForm, input: &mut Input) -> AppResult<bool> {
    say(&format!(
        "Subjects (comma separated numbers or names): {}",
        onboarding::SUBJECTS.join(", ")
    ))
    .await?;
    let Some(answer) = ask(input, "> ").await? else {
        return Ok(false);
    };
    form.subjects.clear();
    for part in answer.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let subject = part
            .parse::<usize>()
            .ok()
            .and_then(|n| onboarding::SUBJECTS.get(n.wrapping_sub(1)))
            .or_else(|| onboarding::SUBJECTS.iter().find(|s| s.eq_ignore_ascii_case(part)));
        if let Some(subject) = subject {
            if !form.subjects.iter().any(|s| s.as_str() == *subject) {
                form.toggle_subject(subject);
            }
        }
    }
    let Some(level) = choose(input, "Understanding level", onboarding::UNDERSTANDING_LEVELS).await?
    else {
        return Ok(false);
    };
    form.understanding_level = level;
    Ok(true)
}

async fn fill_schedule(form: &mut OnboardingForm, input: &mut Input) -> AppResult<bool> {
    let Some(school_year) = choose(input, "School year", onboarding::SCHOOL_YEARS).await? else {
        return Ok(false);
    };
    form.school_year = school_year;
    let Some(target_year) = choose(input, "Target year", onboarding::TARGET_YEARS).await? else {
        return Ok(false);
    };
    form.target_year = target_year;
    let Some(study_time) = choose(input, "Daily study time", onboarding::STUDY_TIMES).await? else {
        return Ok(false);
    };
    form.daily_study_time = study_time;
    Ok(true)
}

async fn command_loop(companion: &Companion, input: &mut Input) -> AppResult<Next> {
    loop {
        let Some(line) = ask(input, "prepwise> ").await? else {
            return Ok(Next::Quit);
        };
        let mut parts = line.splitn(3, ' ');
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default();

        // Every command is a new screen; late responses from the last one are dropped.
        companion.leave_screen();

        let outcome = match command {
            "" => Ok(()),
            "help" => say(HELP).await,
            "plan" => show_plan(companion, arg == "--refresh").await,
            "explain" => explain(companion, arg).await,
            "doubt" => doubt(companion, arg, rest).await,
            "show" => show_topic(companion, arg).await,
            "quiz" => take_quiz(companion, input, arg).await,
            "summary" => summary(companion).await,
            "logout" => {
                companion.logout().await;
                return Ok(Next::Onboard);
            }
            "quit" | "exit" => return Ok(Next::Quit),
            other => say(&format!("Unknown command '{}'. Type 'help'.", other)).await,
        };

        // Usage errors are reported and the loop continues; terminal I/O errors end it.
        match outcome {
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => say(&format!("Error: {}", e)).await?,
            Ok(()) => {}
        }
    }
}

async fn show_plan(companion: &Companion, refresh: bool) -> AppResult<()> {
    if let Delivery::Discarded = companion.load_plan(refresh).await? {
        return Ok(());
    }
    for topic in companion.topics().await {
        let marker = match &topic.quiz_result {
            Some(result) => format!(" [quiz {}%]", result.score_percentage),
            None => String::new(),
        };
        say(&format!("{:>4}  {} ({}){}", topic.id, topic.title, topic.subject, marker)).await?;
    }
    Ok(())
}

async fn explain(companion: &Companion, topic_id: &str) -> AppResult<()> {
    if let Delivery::Applied(details) = companion.explain_topic(topic_id).await? {
        say(&details).await?;
    }
    Ok(())
}

async fn doubt(companion: &Companion, topic_id: &str, question: &str) -> AppResult<()> {
    if let Delivery::Applied(entry) = companion.ask_doubt(topic_id, question).await? {
        let (_, answer) = split_doubt_entry(&entry);
        say(answer.unwrap_or_default()).await?;
    }
    Ok(())
}

async fn show_topic(companion: &Companion, topic_id: &str) -> AppResult<()> {
    let topic = companion
        .topic(topic_id)
        .await
        .ok_or_else(|| AppError::UnknownTopic(topic_id.to_string()))?;
    say(&format!("{} ({})", topic.title, topic.subject)).await?;
    if let Some(details) = &topic.details {
        say(details).await?;
    }
    for entry in &topic.doubts {
        let (question, answer) = split_doubt_entry(entry);
        say(&format!("  Q: {}", question)).await?;
        if let Some(answer) = answer {
            say(&format!("  A: {}", answer)).await?;
        }
    }
    Ok(())
}

async fn take_quiz(companion: &Companion, input: &mut Input, topic_id: &str) -> AppResult<()> {
    let Delivery::Applied(mut run) = companion.start_quiz(topic_id).await? else {
        return Ok(());
    };

    loop {
        if !quiz_question(&mut run, input).await? {
            say("Quiz abandoned.").await?;
            return Ok(());
        }
        if !run.advance()? {
            break;
        }
    }

    let total = run.len();
    let correct = run.score();
    let result = companion.finish_quiz(topic_id, run).await?;
    say(&format!(
        "Score: {}/{} ({}%)",
        correct, total, result.score_percentage
    ))
    .await
}

/// Presents the current question until it is checked. Returns `false` when
/// input ends.
async fn quiz_question(run: &mut QuizRun, input: &mut Input) -> AppResult<bool> {
    let Some(question) = run.current_question().cloned() else {
        return Ok(false);
    };
    say(&format!(
        "Question {} of {}: {}",
        run.position() + 1,
        run.len(),
        question.question
    ))
    .await?;
    for (i, option) in question.options.iter().enumerate() {
        say(&format!("  {}. {}", prepwise_core::domain::option_letter(i), option)).await?;
    }

    loop {
        let Some(answer) = ask(input, "answer> ").await? else {
            return Ok(false);
        };
        if let Err(e) = run.select(&answer) {
            say(&format!("  {}", e)).await?;
            continue;
        }
        let right = run.check()?;
        let correct = question.correct_letter().unwrap_or_else(|| question.correct_answer.clone());
        if right {
            say("  Correct!").await?;
        } else {
            let text = question.option_for_letter(&correct).unwrap_or_default();
            say(&format!("  Correct Answer: {}. {}", correct, text)).await?;
        }
        if !question.explanation.is_empty() {
            say(&format!("  {}", question.explanation)).await?;
        }
        return Ok(true);
    }
}

async fn summary(companion: &Companion) -> AppResult<()> {
    let profile = companion.profile().await;
    let stats = companion.summary().await;

    say(&format!("{} - {} Aspirant", profile.name, profile.exam)).await?;
    say(&format!(
        "Quizzes: {}  Topics: {}  Accuracy: {}%",
        stats.quizzes_attempted, stats.topic_count, stats.accuracy
    ))
    .await?;
    say(&format!("Subjects: {}", format_subjects(&profile.subjects))).await?;
    say(&format!("Level: {}", profile.understanding_level)).await?;
    say(&format!("Target Year: {}", profile.target_year)).await?;
    say(&format!("Daily Study Time: {}", profile.daily_study_time)).await?;
    for (title, score) in &stats.scores {
        say(&format!("  {}: {}%", title, score)).await?;
    }
    say(&format!("Session ID: {}", profile.session_id)).await
}
