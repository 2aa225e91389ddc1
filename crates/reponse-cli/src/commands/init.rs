//! The `reponse init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("reponse.toml").exists() {
        println!("reponse.toml already exists, skipping.");
    } else {
        std::fs::write("reponse.toml", SAMPLE_CONFIG)?;
        println!("Created reponse.toml");
    }

    let example_path = std::path::Path::new("questions.json");
    if example_path.exists() {
        println!("questions.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTIONS)?;
        println!("Created questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Export your API key: export REPONSE_API_KEY=sk-...");
    println!("  2. Evaluate an answer: reponse evaluate --request request.json");
    println!("  3. Reclassify difficulties: reponse reclassify --questions questions.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# reponse configuration

[judge]
api_key = "${REPONSE_API_KEY}"
model = "gpt-4o-mini"
timeout_secs = 30

[fuzzy_matching]
enabled = true

[rate_limit]
window_secs = 60
max_requests = 30

[batch]
page_size = 1000
batch_size = 10
"#;

const EXAMPLE_QUESTIONS: &str = r#"[
  {
    "id": "q1",
    "question": "Translate to French: hello",
    "referenceAnswer": "bonjour",
    "difficulty": "beginner"
  },
  {
    "id": "q2",
    "question": "Conjugate 'être' in the first person singular present tense",
    "referenceAnswer": "je suis",
    "difficulty": "beginner"
  },
  {
    "id": "q3",
    "question": "Rewrite using the subjunctive: Il faut que tu (venir)",
    "referenceAnswer": "il faut que tu viennes",
    "difficulty": "advanced"
  }
]
"#;
