//! `solace analyze`

use serde_json::json;
use solace_nlp::{CrisisScanner, IntentDetector, SentimentAnalyzer};

/// Print the three per-utterance signals as JSON
pub fn run(text: &str) -> anyhow::Result<()> {
    let sentiment = SentimentAnalyzer::new().analyze(text);
    let intent = IntentDetector::new().detect(text);
    let crisis = CrisisScanner::default().scan(text);

    let report = json!({
        "text": text,
        "sentiment": sentiment,
        "intent": intent,
        "crisis": crisis,
        "escalate_to_human": intent.should_escalate_to_human() || crisis.is_crisis,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
