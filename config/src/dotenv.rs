//! Parse a project `.env` file into a key-value map. Nothing is applied to the process here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return value[1..value.len() - 1].replace("\\\"", "\"");
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }
    // Unquoted: ` #` starts a trailing comment.
    match value.find(" #") {
        Some(i) => value[..i].trim_end().to_string(),
        None => value.to_string(),
    }
}

/// Line-oriented `KEY=VALUE` parser.
///
/// Blank lines and `#` lines are skipped, an optional `export ` prefix is accepted, and
/// lines without `=` or with an empty key are ignored. No multiline values.
pub(crate) fn parse_dotenv(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim())))
        })
        .collect()
}

/// Loads `.env` from `override_dir` (or the current directory). A missing file is an empty map.
pub(crate) fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    match dotenv_path(override_dir) {
        Some(path) => Ok(parse_dotenv(&std::fs::read_to_string(path)?)),
        None => Ok(HashMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_pairs() {
        let m = parse_dotenv("VIDEODB_API_KEY=abc\nOPENAI_API_KEY=sk-1\n");
        assert_eq!(m.get("VIDEODB_API_KEY").map(String::as_str), Some("abc"));
        assert_eq!(m.get("OPENAI_API_KEY").map(String::as_str), Some("sk-1"));
    }

    #[test]
    fn skips_comments_blank_lines_and_junk() {
        let m = parse_dotenv("\n# keys\nNOT_A_PAIR\n=orphan\nKEY=val\n   \n");
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("KEY").map(String::as_str), Some("val"));
    }

    #[test]
    fn strips_quotes() {
        let m = parse_dotenv("A=\"hello world\"\nB='single'\nC=\"say \\\"hi\\\"\"\nD=\"\"\n");
        assert_eq!(m.get("A").map(String::as_str), Some("hello world"));
        assert_eq!(m.get("B").map(String::as_str), Some("single"));
        assert_eq!(m.get("C").map(String::as_str), Some("say \"hi\""));
        assert_eq!(m.get("D").map(String::as_str), Some(""));
    }

    #[test]
    fn accepts_export_prefix_and_trailing_comment() {
        let m = parse_dotenv("export RUST_LOG=debug # verbose\nURL=http://x/#frag\n");
        assert_eq!(m.get("RUST_LOG").map(String::as_str), Some("debug"));
        assert_eq!(m.get("URL").map(String::as_str), Some("http://x/#frag"));
    }

    #[test]
    fn hash_inside_quotes_is_kept() {
        let m = parse_dotenv("KEY=\"a #b\"\n");
        assert_eq!(m.get("KEY").map(String::as_str), Some("a #b"));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_map(Some(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn reads_file_from_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "A=1\nB=2\n").unwrap();
        let m = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(m.get("A").map(String::as_str), Some("1"));
        assert_eq!(m.get("B").map(String::as_str), Some("2"));
    }
}
