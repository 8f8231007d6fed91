// Colored terminal output for post previews, topics, and run summaries.

use colored::Colorize;

use super::truncate_chars;
use crate::extractor::topic::Topic;
use crate::formatter::TrainingPair;
use crate::pipeline::PipelineSummary;

/// Show the first `limit` loaded posts, one line each.
pub fn display_posts_preview(posts: &[String], limit: usize) {
    if posts.is_empty() {
        println!("No posts found. Check the content column name and the file contents.");
        return;
    }

    println!(
        "\n{}",
        format!("=== {} posts loaded ===", posts.len()).bold()
    );
    println!();

    for (i, post) in posts.iter().take(limit).enumerate() {
        let one_line = post.replace(['\n', '\r'], " ");
        println!("  {:>4}. {}", i + 1, truncate_chars(&one_line, 100));
    }

    if posts.len() > limit {
        println!(
            "  {}",
            format!("... and {} more", posts.len() - limit).dimmed()
        );
    }
    println!();
}

/// Show one extracted topic.
pub fn display_topic(topic: &Topic) {
    match topic {
        Topic::Label(label) => println!("Topic: {}", label.bold()),
        Topic::General => println!("Topic: {} {}", topic.as_str().bold(), "(empty post)".dimmed()),
        Topic::Unavailable { reason } => {
            println!("Topic: {} ({})", topic.as_str().red(), reason)
        }
    }
}

/// Print a training pair as pretty JSON.
pub fn display_training_pair(pair: &TrainingPair) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(pair)?);
    Ok(())
}

/// Summarize a finished pipeline run.
pub fn display_summary(summary: &PipelineSummary, output_path: &str) {
    println!("\n{}", "Preparation complete.".bold());
    println!("  Posts loaded:   {}", summary.loaded);
    println!("  Pairs written:  {}", summary.written.to_string().green());
    if summary.general > 0 {
        println!("  {} {} posts labelled General", "~".yellow(), summary.general);
    }
    if summary.skipped > 0 {
        println!(
            "  {} {} posts skipped (topic extraction failed)",
            "!".bright_red(),
            summary.skipped
        );
    }
    println!("  Output: {}", output_path.dimmed());
}
