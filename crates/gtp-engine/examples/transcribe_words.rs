// Quick check: load a rule file and transcribe a handful of Spanish words
use gtp_core::RuleSet;
use gtp_engine::prepare;

fn main() {
    let rules_path = std::env::args().nth(1).unwrap_or_else(|| {
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/spanish_gtp_rules.json").to_string()
    });

    let set = RuleSet::from_path(&rules_path).expect("Failed to read rule file");
    let table = prepare(&set).expect("Failed to prepare rule table");
    println!(
        "Loaded {}: {} rules, {} graphemes, {} subsets",
        rules_path,
        table.len(),
        table.graphemes().len(),
        table.subsets().len(),
    );

    let test_words = [
        "sueño", "pequeñita", "guitarra", "cigüeña", "muchacho",
        "barranquilla", "mantequilla", "colombia", "méxico", "quiero",
        "qatar",
    ];

    let transcriber = table.transcriber();
    for word in &test_words {
        match transcriber.transcribe_segments(word) {
            Ok(segments) => {
                let phonemes: String = segments.iter().map(|s| s.phonemes.as_str()).collect();
                println!("\n{:15} → {}", word, phonemes);
                for s in &segments {
                    println!("  [{}] {} → {} (rule {})", s.position, s.grapheme, s.phonemes, s.rule);
                }
            }
            Err(e) => println!("\n{:15} → (error: {})", word, e),
        }
    }
}
