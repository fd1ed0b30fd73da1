//! The `drivequiz take` command: an interactive quiz on the terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use drivequiz_core::scoring::ScoreReport;
use drivequiz_core::{HistoryStore, QuestionBank, QuizSession, BATCH_SIZE};
use drivequiz_providers::config::load_config_from;

use super::on_off;

pub fn execute(
    bank_path: Option<PathBuf>,
    storage_path: Option<PathBuf>,
    seed: Option<u64>,
    skip_known: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = super::load_bank(bank_path.as_deref(), &config)?;
    let (mut history, _) = super::open_history(storage_path, &config);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(
        stdin.lock(),
        stdout.lock(),
        &bank,
        &mut history,
        skip_known,
        &mut rng,
    )
}

/// What the user picked after a submission.
enum MenuChoice {
    NewBatch,
    Retry,
    Quit,
}

/// Drive one interactive session until the user quits or input ends.
pub(crate) fn run<I: BufRead, O: Write, R: Rng>(
    mut input: I,
    mut out: O,
    bank: &QuestionBank,
    history: &mut HistoryStore,
    skip_known: bool,
    rng: &mut R,
) -> Result<()> {
    let mut session = if skip_known {
        QuizSession::start_filtered(bank, history, rng)?
    } else {
        QuizSession::start(bank, rng)?
    };
    if session.batch().is_empty() {
        writeln!(
            out,
            "You have answered every question correctly before. Starting a regular batch."
        )?;
        session = QuizSession::start(bank, rng)?;
    }

    loop {
        let total = session.batch().len();
        if session.batch().is_short() {
            writeln!(
                out,
                "\nNote: only {total} eligible questions were available for this batch."
            )?;
        }
        writeln!(out, "\n=== DETRAN practice exam: {total} questions ===")?;

        for slot in 0..total {
            let Some(option) = ask_question(&mut input, &mut out, &session, slot)? else {
                writeln!(out, "\nBye!")?;
                return Ok(());
            };
            session.answer(slot, option)?;
        }

        let report = session.submit(history)?.report.clone();
        print_result(&mut out, &session, &report)?;

        match menu(&mut input, &mut out, &session, history)? {
            MenuChoice::NewBatch => session.new_batch(bank, rng)?,
            MenuChoice::Retry => session.retry(bank, history, rng)?,
            MenuChoice::Quit => {
                writeln!(out, "Bye!")?;
                return Ok(());
            }
        }
    }
}

/// Show one question and read an option; `None` means input ended.
fn ask_question<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    session: &QuizSession,
    slot: usize,
) -> Result<Option<usize>> {
    let Some(question) = session.question(slot) else {
        return Ok(None);
    };

    writeln!(out, "\n{}. {}", slot + 1, question.question)?;
    if let Some(image) = &question.image {
        writeln!(out, "   [image: {image}]")?;
    }
    for (idx, option) in question.options.iter().enumerate() {
        writeln!(out, "   {}) {option}", idx + 1)?;
    }

    let count = question.options.len();
    loop {
        write!(out, "Answer (1-{count}): ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match parse_option(&line, count) {
            Some(option) => return Ok(Some(option)),
            None => writeln!(out, "Please answer with a number from 1 to {count} or a letter.")?,
        }
    }
}

fn print_result<O: Write>(out: &mut O, session: &QuizSession, report: &ScoreReport) -> Result<()> {
    writeln!(
        out,
        "\nYou got {} of {} questions right ({}%).",
        report.correct_count,
        report.total(),
        report.percentage()
    )?;
    if report.passed() {
        writeln!(out, "Congratulations, you are ready!")?;
    } else {
        writeln!(
            out,
            "Keep studying! You need {} correct answers to pass.",
            report.pass_mark()
        )?;
    }

    if report.has_wrong() {
        writeln!(out, "\nYou missed {} question(s):", report.wrong_indexes.len())?;
        for &slot in &report.wrong_indexes {
            let Some(q) = session.question(slot) else {
                continue;
            };
            if let Some(correct) = q.options.get(q.correct_index) {
                writeln!(out, "  {}. {} -> {correct}", slot + 1, q.question)?;
            }
        }
    }
    Ok(())
}

fn menu<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    session: &QuizSession,
    history: &mut HistoryStore,
) -> Result<MenuChoice> {
    loop {
        writeln!(out)?;
        writeln!(out, "  [n] new batch of {BATCH_SIZE} questions")?;
        if session.can_retry() {
            let wrong = session
                .submission()
                .map(|s| s.report.wrong_indexes.len())
                .unwrap_or(0);
            writeln!(out, "  [r] new batch with the questions you missed ({wrong})")?;
        }
        writeln!(
            out,
            "  [p] include previously-correct questions in retries (currently {})",
            on_off(history.get_preference())
        )?;
        writeln!(out, "  [q] quit")?;
        write!(out, "Choice: ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(MenuChoice::Quit);
        };
        match line.trim().to_lowercase().as_str() {
            "n" => return Ok(MenuChoice::NewBatch),
            "r" if session.can_retry() => return Ok(MenuChoice::Retry),
            "p" => {
                let flag = history.toggle_preference();
                writeln!(out, "Previously-correct questions in retries: {}", on_off(flag))?;
            }
            "q" => return Ok(MenuChoice::Quit),
            _ => writeln!(out, "Unknown choice.")?,
        }
    }
}

fn read_line<I: BufRead>(input: &mut I) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Accept `1`..`count` or `a`.. as an option choice.
fn parse_option(line: &str, count: usize) -> Option<usize> {
    let answer = line.trim().to_lowercase();
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=count).contains(&n).then(|| n - 1);
    }
    let mut chars = answer.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => {
            let idx = (c as u8 - b'a') as usize;
            (idx < count).then_some(idx)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivequiz_core::store::MemoryStore;

    fn run_with_input(input: &str, history: &mut HistoryStore) -> String {
        run_with_options(input, history, false)
    }

    fn run_with_options(input: &str, history: &mut HistoryStore, skip_known: bool) -> String {
        let bank = QuestionBank::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Vec::new();
        run(input.as_bytes(), &mut out, &bank, history, skip_known, &mut rng).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_option_accepts_numbers_and_letters() {
        assert_eq!(parse_option("1\n", 4), Some(0));
        assert_eq!(parse_option(" 4 ", 4), Some(3));
        assert_eq!(parse_option("b", 4), Some(1));
        assert_eq!(parse_option("D", 4), Some(3));
        assert_eq!(parse_option("0", 4), None);
        assert_eq!(parse_option("5", 4), None);
        assert_eq!(parse_option("e", 4), None);
        assert_eq!(parse_option("ab", 4), None);
        assert_eq!(parse_option("", 4), None);
    }

    #[test]
    fn full_batch_then_quit() {
        let mut history = HistoryStore::open(Box::new(MemoryStore::new()));
        let input = format!("{}q\n", "1\n".repeat(BATCH_SIZE));
        let output = run_with_input(&input, &mut history);

        assert!(output.contains("30 questions ==="));
        assert!(output.contains("of 30 questions right"));
        assert!(output.contains("Bye!"));
    }

    #[test]
    fn invalid_answer_is_reprompted() {
        let mut history = HistoryStore::open(Box::new(MemoryStore::new()));
        let input = format!("9\nx\n{}q\n", "a\n".repeat(BATCH_SIZE));
        let output = run_with_input(&input, &mut history);
        assert_eq!(output.matches("Please answer").count(), 2);
        assert!(output.contains("of 30 questions right"));
    }

    #[test]
    fn end_of_input_quits_mid_batch() {
        let mut history = HistoryStore::open(Box::new(MemoryStore::new()));
        let output = run_with_input("1\n2\n", &mut history);
        assert!(output.contains("Bye!"));
        assert!(!output.contains("questions right"));
        assert!(history.correct_ids().is_empty());
    }

    #[test]
    fn toggle_preference_from_menu() {
        let mut history = HistoryStore::open(Box::new(MemoryStore::new()));
        let input = format!("{}p\nq\n", "1\n".repeat(BATCH_SIZE));
        let output = run_with_input(&input, &mut history);
        assert!(output.contains("Previously-correct questions in retries: on"));
        assert!(history.get_preference());
    }

    #[test]
    fn submission_updates_history() {
        let mut history = HistoryStore::open(Box::new(MemoryStore::new()));
        let input = format!("{}q\n", "2\n".repeat(BATCH_SIZE));
        let output = run_with_input(&input, &mut history);

        let line = output
            .lines()
            .find(|l| l.starts_with("You got"))
            .unwrap()
            .to_string();
        let correct: usize = line
            .trim_start_matches("You got ")
            .split_whitespace()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(history.correct_ids().len(), correct);
    }

    #[test]
    fn skip_known_with_everything_known_falls_back_to_full_batch() {
        let bank = QuestionBank::builtin().unwrap();
        let mut history = HistoryStore::open(Box::new(MemoryStore::new()));
        for q in bank.questions() {
            history.record_outcome(&q.id, true);
        }

        let input = format!("{}q\n", "1\n".repeat(BATCH_SIZE));
        let output = run_with_options(&input, &mut history, true);
        assert!(output.contains("answered every question correctly before"));
        assert!(output.contains("30 questions ==="));
        assert!(output.contains("of 30 questions right"));
        assert!(!output.contains("of 0 questions right"));
    }

    #[test]
    fn missed_question_with_bad_correct_index_is_skipped() {
        use drivequiz_core::{Batch, Question};

        let question = Question {
            id: "odd".into(),
            question: "Odd record".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 9,
            image: None,
        };
        let mut session = QuizSession::with_batch(Batch::new(vec![question]));
        session.answer(0, 0).unwrap();
        let mut history = HistoryStore::open(Box::new(MemoryStore::new()));
        let report = session.submit(&mut history).unwrap().report.clone();

        let mut out = Vec::new();
        print_result(&mut out, &session, &report).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("You missed 1 question(s):"));
        assert!(!output.contains("Odd record ->"));
    }
}
