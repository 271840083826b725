//! Line-oriented presentation of a quiz session on stdin/stdout.

use std::io::{self, BufRead, Write};

use quiz_core::model::{FinishReason, QuizSettings, SessionType};
use rand::Rng;
use services::{SessionController, StartOutcome};

/// Map what the learner typed to an answer: an option number or the term itself.
fn resolve_choice(input: &str, options: &[String]) -> String {
    let input = input.trim();
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| options.get(idx))
        .map_or_else(|| input.to_owned(), Clone::clone)
}

fn read_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    lines.next().transpose()
}

/// Ask a yes/no question; anything but `y`/`yes` counts as no.
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn print_settings(settings: &QuizSettings) {
    println!("direction: {}", settings.direction.as_str());
    println!(
        "range:     {}-{}",
        settings.range.start(),
        settings.range.end()
    );
    println!("limit:     {}", settings.limit.get());
}

/// Run one session to completion, or until the learner quits with `q`/EOF.
pub async fn run_quiz<R: Rng>(
    controller: &mut SessionController<R>,
    session_type: SessionType,
) -> io::Result<()> {
    if controller.engine().pool().is_empty() {
        println!("The word list is empty.");
        return Ok(());
    }

    if controller.start_session(session_type) == StartOutcome::NoEligibleWords {
        let range = controller.settings().range;
        println!(
            "No words with ids in {}-{}. Change the range with `quiz config --range`.",
            range.start(),
            range.end()
        );
        controller.return_to_lobby();
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(question) = controller.engine().current_question().cloned() {
        if let Some(session) = controller.engine().session() {
            let progress = session.progress();
            println!();
            println!("[{}/{}] {}", progress.solved + 1, progress.limit, question.prompt());
        }
        for (idx, option) in question.options().iter().enumerate() {
            println!("  {}) {option}", idx + 1);
        }

        let Some(line) = read_line(&mut lines)? else {
            println!();
            return Ok(());
        };
        if line.trim().eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let answer = resolve_choice(&line, question.options());
        let Some(result) = controller.submit_answer(&answer).await else {
            continue;
        };
        if result.outcome.is_correct {
            println!("Correct!");
        } else {
            println!("Wrong. Answer: {}", result.outcome.correct_answer);
        }
        if !result.persisted {
            println!("(progress could not be saved)");
        }
        controller.advance();
    }

    if let Some(summary) = controller.engine().summary() {
        println!();
        match summary.reason() {
            FinishReason::LimitReached => println!("Session complete."),
            FinishReason::PoolExhausted => println!("No more words in range."),
        }
        println!(
            "{} / {} correct ({}%)",
            summary.correct(),
            summary.solved(),
            summary.accuracy_percent()
        );
        let in_training = controller.engine().pool().training_count();
        if in_training > 0 {
            println!("{in_training} word(s) need more practice; try --training.");
        }
    }
    controller.return_to_lobby();
    Ok(())
}
