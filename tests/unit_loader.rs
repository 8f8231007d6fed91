// Unit tests for the CSV post loader.
//
// Each test writes a small fixture file into a temp directory and checks the
// filtering, ordering, and error classification of load_posts.

use std::fs;
use std::path::PathBuf;

use postprep::loader::{load_posts, DEFAULT_CONTENT_COLUMN};
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

// ============================================================
// Filtering and ordering
// ============================================================

#[test]
fn empty_rows_are_removed_and_order_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "posts.csv",
        "post_content\n\
         This is the first post.\n\
         Here's another one.\n\
         \"\"\n\
         A third valid post.\n",
    );

    let posts = load_posts(&path, DEFAULT_CONTENT_COLUMN).unwrap();
    assert_eq!(
        posts,
        vec![
            "This is the first post.".to_string(),
            "Here's another one.".to_string(),
            "A third valid post.".to_string(),
        ]
    );
}

#[test]
fn whitespace_only_and_missing_marker_rows_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "posts.csv",
        "id,post_content\n1,\"   \"\n2,nan\n3,Shipping our new release today\n4,\n",
    );

    let posts = load_posts(&path, "post_content").unwrap();
    assert_eq!(posts, vec!["Shipping our new release today".to_string()]);
}

#[test]
fn dataframe_na_spellings_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "posts.csv",
        "post_content\nreal post\nNaN\nNA\nnull\nN/A\nNone\n<NA>\n#N/A\n\" nan \"\n",
    );

    let posts = load_posts(&path, "post_content").unwrap();
    assert_eq!(posts, vec!["real post".to_string(), " nan ".to_string()]);
}

#[test]
fn surrounding_whitespace_is_preserved_in_kept_posts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "posts.csv", "post_content\n\"  padded post  \"\n");

    let posts = load_posts(&path, "post_content").unwrap();
    assert_eq!(posts, vec!["  padded post  ".to_string()]);
}

#[test]
fn quoted_multiline_posts_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "posts.csv",
        "author,post_content\nana,\"Big news!\n\nWe're hiring, apply below.\"\n",
    );

    let posts = load_posts(&path, "post_content").unwrap();
    assert_eq!(posts, vec!["Big news!\n\nWe're hiring, apply below.".to_string()]);
}

#[test]
fn short_rows_count_as_missing_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "posts.csv",
        "id,post_content\n1,Kept post\n2\n3,Another kept post\n",
    );

    let posts = load_posts(&path, "post_content").unwrap();
    assert_eq!(posts, vec!["Kept post".to_string(), "Another kept post".to_string()]);
}

#[test]
fn custom_content_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "posts.csv", "text,likes\nHello network,12\n,3\n");

    let posts = load_posts(&path, "text").unwrap();
    assert_eq!(posts, vec!["Hello network".to_string()]);
}

#[test]
fn loading_twice_gives_the_same_posts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "posts.csv", "post_content\none\ntwo\n\nthree\n");

    let first = load_posts(&path, "post_content").unwrap();
    let second = load_posts(&path, "post_content").unwrap();
    assert_eq!(first, second);
}

// ============================================================
// Empty inputs
// ============================================================

#[test]
fn empty_file_yields_no_posts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "empty.csv", "");

    assert!(load_posts(&path, "post_content").unwrap().is_empty());
}

#[test]
fn blank_lines_only_file_yields_no_posts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "blank.csv", "\n\n  \n");

    assert!(load_posts(&path, "post_content").unwrap().is_empty());
}

#[test]
fn header_only_file_yields_no_posts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "header.csv", "post_content\n");

    assert!(load_posts(&path, "post_content").unwrap().is_empty());
}

// ============================================================
// Errors
// ============================================================

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("non_existent_file.csv");

    let err = load_posts(&path, "post_content").unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
}

#[test]
fn missing_column_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "wrong.csv", "wrong_column\npost 1\npost 2\n");

    let err = load_posts(&path, "post_content").unwrap_err();
    assert!(err.is_validation(), "expected Validation, got {err:?}");
    assert!(err.to_string().contains("post_content"));
}

#[test]
fn header_only_file_without_column_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "header.csv", "author,date\n");

    assert!(load_posts(&path, "post_content").unwrap_err().is_validation());
}

#[test]
fn row_wider_than_header_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "wide.csv", "post_content\nfine\ntoo,many,fields\n");

    let err = load_posts(&path, "post_content").unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().starts_with("Failed to read CSV file"));
}

#[test]
fn invalid_utf8_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.csv");
    fs::write(&path, b"post_content\n\xff\xfe broken\n").unwrap();

    assert!(load_posts(&path, "post_content").unwrap_err().is_validation());
}
