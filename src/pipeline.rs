// Preparation pipeline: load posts, extract topics, format, write JSONL.
//
// Output is written only after every earlier step has succeeded, and lands
// at the output path by rename, so a failed run never leaves a half-written
// training file behind.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::PrepError;
use crate::extractor::topic::{Topic, TopicExtractor};
use crate::formatter::{format_for_training, TrainingPair};
use crate::loader::{load_posts, DEFAULT_CONTENT_COLUMN};
use crate::output::truncate_chars;

/// Knobs for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub content_column: String,
    /// Number of extraction calls in flight (1 = sequential)
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            content_column: DEFAULT_CONTENT_COLUMN.to_string(),
            concurrency: 1,
            show_progress: false,
        }
    }
}

/// Counts from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Posts that survived loading
    pub loaded: usize,
    /// Training pairs written to the output file
    pub written: usize,
    /// Posts dropped because their topic was unavailable
    pub skipped: usize,
    /// Posts labelled with the fallback "General" topic
    pub general: usize,
}

/// Run the full pipeline from `input_path` to a JSONL file at `output_path`.
pub async fn process_posts(
    input_path: &Path,
    output_path: &Path,
    extractor: &TopicExtractor,
    options: &PipelineOptions,
) -> Result<PipelineSummary, PrepError> {
    let posts = load_posts(input_path, &options.content_column)?;
    info!(
        count = posts.len(),
        input = %input_path.display(),
        model = %extractor.settings().model,
        "Loaded posts"
    );

    let pb = if options.show_progress {
        let pb = ProgressBar::new(posts.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  Topics [{bar:30}] {pos}/{len} ({eta})")
        {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let topics = extractor
        .extract_with_progress(&posts, options.concurrency, &pb)
        .await;
    pb.finish_and_clear();
    let topics = topics?;

    let mut summary = PipelineSummary {
        loaded: posts.len(),
        ..Default::default()
    };

    let mut kept_posts = Vec::with_capacity(posts.len());
    let mut kept_topics = Vec::with_capacity(posts.len());
    for (post, topic) in posts.iter().zip(&topics) {
        match topic {
            Topic::Unavailable { reason } => {
                warn!(
                    reason = %reason,
                    post_preview = %truncate_chars(post, 50),
                    "Skipping post with unavailable topic"
                );
                summary.skipped += 1;
                continue;
            }
            Topic::General => summary.general += 1,
            Topic::Label(_) => {}
        }
        kept_posts.push(post.as_str());
        kept_topics.push(topic.as_str());
    }

    let pairs = format_for_training(&kept_posts, &kept_topics)?;
    write_jsonl(output_path, &pairs)?;
    summary.written = pairs.len();

    info!(
        written = summary.written,
        skipped = summary.skipped,
        output = %output_path.display(),
        "Training data written"
    );

    Ok(summary)
}

/// Write one JSON object per line. Creates parent directories as needed.
///
/// Lines go to a temp file next to `path` that is renamed over it once
/// complete; on failure the temp file is removed and `path` is untouched.
pub fn write_jsonl(path: &Path, pairs: &[TrainingPair]) -> Result<(), PrepError> {
    let io_err = |source: std::io::Error| PrepError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(io_err)?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        for pair in pairs {
            serde_json::to_writer(&mut writer, pair).map_err(|e| io_err(e.into()))?;
            writer.write_all(b"\n").map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Read a JSONL file of training pairs. Blank lines are ignored.
pub fn read_jsonl(path: &Path) -> Result<Vec<TrainingPair>, PrepError> {
    if !path.exists() {
        return Err(PrepError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut pairs = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let pair = serde_json::from_str(&line).map_err(|e| {
            PrepError::Validation(format!("Invalid training pair on line {}: {e}", index + 1))
        })?;
        pairs.push(pair);
    }
    Ok(pairs)
}
