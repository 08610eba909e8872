// gtp-transcribe: Transcribe words into phonemes using a rule file.
//
// Words are taken from the command line, or from stdin (one per line) when
// none are given. Output format:
//   word: phonemes
// Words that cannot be transcribed are reported on stderr and skipped; the
// exit status is 1 if any word failed or stdin could not be read.
//
// Usage:
//   gtp-transcribe [-r RULES] [--segments] [WORDS...]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "gtp-transcribe",
    version,
    about = "Transcribe words into phonemes using a context-sensitive rule file"
)]
struct Args {
    /// Rule file (JSON). Defaults to $GTP_RULES_PATH, then ./gtp_rules.json.
    #[arg(short = 'r', long)]
    rules: Option<PathBuf>,

    /// Also print each resolved position with the rule that produced it.
    #[arg(long)]
    segments: bool,

    /// Words to transcribe. Reads stdin when empty.
    words: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let table = gtp_cli::load_table(args.rules.as_deref())
        .unwrap_or_else(|e| gtp_cli::fatal(&e.to_string()));
    let transcriber = table.transcriber();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut failed = false;

    if args.words.is_empty() {
        let stdin = io::stdin();
        failed |= !gtp_cli::report_lines(stdin.lock(), &mut out, &transcriber, args.segments);
    } else {
        for word in &args.words {
            failed |= !gtp_cli::report_word(&mut out, &transcriber, word, args.segments);
        }
    }

    let _ = out.flush();
    if failed {
        std::process::exit(1);
    }
}
