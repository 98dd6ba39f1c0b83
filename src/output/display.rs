//! Display functions for round status and command results

use super::formatters::{format_assignments, format_letters, format_words};
use crate::commands::ReplaySummary;
use crate::core::{LetterSet, Wordlist};
use crate::dispatch::Status;
use colored::Colorize;

/// Print one orchestrator status update
pub fn print_status(status: &Status, workers: usize) {
    match status {
        Status::RoundStarted {
            level,
            letters,
            wordlist,
        } => {
            println!(
                "\n{} letters -> [{}]",
                level_title(*level).bright_cyan().bold(),
                letters.to_string().bright_yellow().bold()
            );
            print_dispatch(wordlist, workers);
        }
        Status::LettersRemoved {
            removed,
            letters,
            wordlist,
        } => {
            println!(
                "\n{} {}, new letters: {}",
                "False letters:".red(),
                format_letters(removed),
                letters.to_string().bright_yellow()
            );
            print_dispatch(wordlist, workers);
        }
        Status::LettersRevealed {
            revealed,
            letters,
            wordlist,
        } => {
            println!(
                "\n{} {}, new letters: {}",
                "Hidden letters:".green(),
                format_letters(revealed),
                letters.to_string().bright_yellow()
            );
            print_dispatch(wordlist, workers);
        }
        Status::MarkReached { mark, wordlist } => {
            println!("\n{}", format!("Mark {mark} reached!").bright_magenta().bold());
            print_dispatch(wordlist, workers);
        }
        Status::RoundEnded => {
            println!("\n{}", "Level ended!".bright_cyan().bold());
        }
    }
}

fn level_title(level: Option<u32>) -> String {
    match level {
        Some(level) => format!("Level {level} started,"),
        None => "Level started,".to_string(),
    }
}

fn print_dispatch(wordlist: &Wordlist, workers: usize) {
    if wordlist.is_empty() {
        println!("{}", "No candidate words available yet".yellow());
        return;
    }
    if workers == 0 {
        println!("   {} words found, no bots to send them to", wordlist.len());
        return;
    }

    println!("Sending {} words to {workers} bot(s):", wordlist.len());
    for line in format_assignments(wordlist, workers) {
        println!("   {line}");
    }
}

/// Print the result of a single word lookup
pub fn print_unscramble_result(letters: &LetterSet, words: &[String]) {
    println!("\n{}", "─".repeat(60).cyan());
    println!(
        "Unscrambling: {}",
        letters.to_string().to_uppercase().bright_yellow().bold()
    );
    println!("{}", "─".repeat(60).cyan());
    println!("\n{} words, best first:", words.len());
    println!("   {}", format_words(words));
}

/// Print what every recorded worker would have been sent
pub fn print_replay_summary(summary: &ReplaySummary) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", "REPLAY RESULTS".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    println!("\n   Frames read:      {}", summary.frames);
    println!("   Status updates:   {}", summary.statuses);
    for (i, queue) in summary.queues.iter().enumerate() {
        println!(
            "   bot {}: {} words queued -> {}",
            i + 1,
            queue.len(),
            format_words(queue)
        );
    }
}
