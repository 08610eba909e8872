// gtp-cli: rule file discovery and loading shared by the CLI tools.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use gtp_core::{ContextField, RuleSet, RuleSetError};
use gtp_engine::{PrepareError, RuleTable, Segment, Transcriber, prepare};

/// Default rule file name looked up in directories.
pub const RULES_FILE: &str = "gtp_rules.json";

/// Environment variable naming a rule file or a directory containing one.
pub const RULES_ENV: &str = "GTP_RULES_PATH";

/// Error type for locating, reading, and preparing a rule file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not find {} in any of the search paths:\n{}", .file, format_paths(.searched))]
    NotFound {
        file: &'static str,
        searched: Vec<PathBuf>,
    },
    #[error(transparent)]
    Read(#[from] RuleSetError),
    #[error("invalid rule file {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: PrepareError,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Search for a rule file, parse it, and prepare the rule table.
///
/// Search order:
/// 1. `rules_path` argument (if provided)
/// 2. `GTP_RULES_PATH` environment variable (a file, or a directory
///    containing `gtp_rules.json`)
/// 3. `gtp_rules.json` in the current working directory
pub fn load_table(rules_path: Option<&Path>) -> Result<RuleTable, LoadError> {
    let path = find_rules(rules_path)?;
    let set = RuleSet::from_path(&path)?;
    prepare(&set).map_err(|source| LoadError::Prepare { path, source })
}

/// Locate the rule file without reading it.
pub fn find_rules(rules_path: Option<&Path>) -> Result<PathBuf, LoadError> {
    // An explicit path is used as given, so a typo surfaces as a read error.
    if let Some(p) = rules_path {
        return Ok(p.to_path_buf());
    }

    let env_path = std::env::var_os(RULES_ENV).map(PathBuf::from);
    let cwd = std::env::current_dir().ok();
    let searched = build_search_paths(env_path.as_deref(), cwd.as_deref());

    let found = searched.iter().find(|p| p.is_file()).cloned();
    found.ok_or(LoadError::NotFound {
        file: RULES_FILE,
        searched,
    })
}

/// Build the list of candidate rule file paths.
fn build_search_paths(env_path: Option<&Path>, cwd: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = env_path {
        paths.push(p.to_path_buf());
        paths.push(p.join(RULES_FILE));
    }

    if let Some(dir) = cwd {
        paths.push(dir.join(RULES_FILE));
    }

    paths
}

/// Transcribe one word and write `word: phonemes`, followed by one line per
/// segment when `segments` is set. Errors go to stderr.
///
/// Returns `false` if the word could not be transcribed.
pub fn report_word(
    out: &mut impl Write,
    transcriber: &Transcriber<'_>,
    word: &str,
    segments: bool,
) -> bool {
    match transcriber.transcribe_segments(word) {
        Ok(resolved) => {
            let phonemes: String = resolved.iter().map(|s| s.phonemes.as_str()).collect();
            let _ = writeln!(out, "{word}: {phonemes}");
            if segments {
                for s in &resolved {
                    let _ = writeln!(out, "  {}", describe_segment(transcriber.table(), s));
                }
            }
            true
        }
        Err(e) => {
            let _ = out.flush();
            eprintln!("error: {e}");
            false
        }
    }
}

/// Transcribe one word per line of `input`, skipping blank lines.
///
/// Returns `false` if any word failed or the input could not be read.
pub fn report_lines(
    input: impl BufRead,
    out: &mut impl Write,
    transcriber: &Transcriber<'_>,
    segments: bool,
) -> bool {
    let mut ok = true;
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                let _ = out.flush();
                eprintln!("error reading input: {e}");
                return false;
            }
        };
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        ok &= report_word(out, transcriber, word, segments);
    }
    ok
}

/// Render a segment with the rule that produced it, e.g.
/// `c -> θ  (rule 12: c before "e i")`.
pub fn describe_segment(table: &RuleTable, segment: &Segment) -> String {
    let mut line = format!("{} -> {}", segment.grapheme, segment.phonemes);
    if let Some(prepared) = table.rules().get(segment.rule) {
        let rule = prepared.rule();
        line.push_str(&format!("  (rule {}: {}", segment.rule, rule.center));
        for (field, word) in [
            (ContextField::Predecessor, "after"),
            (ContextField::Successor, "before"),
        ] {
            if let Some(value) = rule.context(field) {
                line.push_str(&format!(" {word} {value:?}"));
            }
        }
        line.push(')');
    }
    line
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_paths_order() {
        let paths = build_search_paths(Some(Path::new("/opt/rules")), Some(Path::new("/work")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/opt/rules"),
                PathBuf::from("/opt/rules/gtp_rules.json"),
                PathBuf::from("/work/gtp_rules.json"),
            ]
        );
    }

    #[test]
    fn search_paths_without_env() {
        let paths = build_search_paths(None, Some(Path::new("/work")));
        assert_eq!(paths, vec![PathBuf::from("/work/gtp_rules.json")]);
    }

    #[test]
    fn explicit_path_is_returned_as_is() {
        let p = find_rules(Some(Path::new("/no/such/rules.json"))).unwrap();
        assert_eq!(p, PathBuf::from("/no/such/rules.json"));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let err = load_table(Some(Path::new("/no/such/rules.json"))).unwrap_err();
        assert!(matches!(err, LoadError::Read(RuleSetError::Io { .. })));
    }

    #[test]
    fn loads_fixture() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../gtp-engine/tests/data/spanish_gtp_rules.json");
        let table = load_table(Some(&path)).unwrap();
        assert_eq!(table.transcriber().transcribe("chico").unwrap(), "tʃiko");
    }

    fn small_table() -> RuleTable {
        use gtp_core::{Rule, Subset};
        prepare(&RuleSet {
            graphemes: "c a e".into(),
            subsets: vec![Subset::new("FV", "e")],
            rules: vec![
                Rule::new("c", "θ").before("FV"),
                Rule::new("c", "k"),
                Rule::new("a", "a"),
                Rule::new("e", "e").after("c"),
                Rule::new("e", "e"),
            ],
        })
        .unwrap()
    }

    #[test]
    fn segments_name_their_rule() {
        let table = small_table();
        let tr = table.transcriber();
        let mut out = Vec::new();
        assert!(report_word(&mut out, &tr, "cea", true));
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "cea: θea",
                "  c -> θ  (rule 0: c before \"e\")",
                "  e -> e  (rule 3: e after \"c\")",
                "  a -> a  (rule 2: a)",
            ]
        );
    }

    #[test]
    fn failed_word_is_not_written() {
        let table = small_table();
        let mut out = Vec::new();
        assert!(!report_word(&mut out, &table.transcriber(), "cx", false));
        assert!(out.is_empty());
    }

    #[test]
    fn report_lines_skips_blanks_and_flags_failures() {
        let table = small_table();
        let tr = table.transcriber();
        let mut out = Vec::new();
        assert!(report_lines(&b"ca\n\n  ce \n"[..], &mut out, &tr, false));
        assert_eq!(String::from_utf8(out).unwrap(), "ca: ka\nce: θe\n");

        let mut out = Vec::new();
        assert!(!report_lines(&b"ca\nxx\nac\n"[..], &mut out, &tr, false));
        assert_eq!(String::from_utf8(out).unwrap(), "ca: ka\nac: ak\n");
    }

    #[test]
    fn unreadable_input_is_a_failure() {
        let table = small_table();
        let mut out = Vec::new();
        let input: &[u8] = b"ca\n\xff\xfe\nce\n";
        assert!(!report_lines(input, &mut out, &table.transcriber(), false));
        assert_eq!(String::from_utf8(out).unwrap(), "ca: ka\n");
    }

    #[test]
    fn not_found_lists_searched_paths() {
        let err = LoadError::NotFound {
            file: RULES_FILE,
            searched: vec![PathBuf::from("/a/gtp_rules.json")],
        };
        let msg = err.to_string();
        assert!(msg.contains("gtp_rules.json"));
        assert!(msg.contains("  - /a/gtp_rules.json"));
    }
}
