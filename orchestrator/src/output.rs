use chrono::{DateTime, Utc};
use inference::InferenceReport;
use reviewlens_preprocessing::{TokenSequence, Vocabulary};

pub struct ResultFormatter {
    request_count: u64,
    start_time: DateTime<Utc>,
}

impl ResultFormatter {
    pub fn new() -> Self {
        Self {
            request_count: 0,
            start_time: Utc::now(),
        }
    }

    pub fn display_report(&mut self, report: &InferenceReport, vocabulary: &Vocabulary) {
        self.request_count += 1;

        println!("\n{}", "=".repeat(80));
        println!("🔍 REVIEW ANALYSIS #{}", self.request_count);
        println!("{}", "=".repeat(80));

        println!("📝 Input: {}", truncate_text(&report.input_text, 100));

        println!("\n{}", "-".repeat(40));
        println!("📊 SENTIMENT");
        println!("{}", "-".repeat(40));
        println!("   Prediction: {:.6}", report.base_score);
        println!("   Label: {} (threshold {})", report.sentiment_label, report.threshold_used);

        println!("\n{}", "-".repeat(40));
        println!("🎯 TOKEN CONTRIBUTIONS");
        println!("{}", "-".repeat(40));
        if report.top_attributions.is_empty() {
            println!("   No tokens to attribute.");
        } else {
            println!("   {:<6} {:<20} {:<10} {:<12} effect", "rank", "token", "position", "delta");
            for entry in &report.top_attributions {
                println!(
                    "   {:<6} {:<20} {:<10} {:<+12.6} {}",
                    entry.rank,
                    truncate_text(&entry.token, 20),
                    entry.position,
                    entry.delta,
                    effect_marker(entry.delta)
                );
            }
        }

        println!("\n{}", "-".repeat(40));
        println!("📋 TEXT DIAGNOSTICS");
        println!("{}", "-".repeat(40));
        println!("   Tokens: {}", report.token_count);
        if report.token_count > report.maxlen_used {
            println!(
                "   Note: only the first {} tokens are visible to the model",
                report.maxlen_used
            );
        }
        if !report.displayed_tokens.is_empty() {
            println!(
                "   First {} tokens: {}",
                report.displayed_tokens.len(),
                report.displayed_tokens.join(" ")
            );
            let window = report.displayed_tokens.len();
            if let Ok(sequence) = TokenSequence::encode(&report.displayed_tokens, vocabulary, window)
            {
                println!("   Model view: {}", vocabulary.decode(sequence.ids()));
            }
        }

        self.display_summary();
    }

    fn display_summary(&self) {
        let runtime = Utc::now().signed_duration_since(self.start_time);
        println!("\n{}", "-".repeat(40));
        println!("📈 SESSION SUMMARY");
        println!("{}", "-".repeat(40));
        println!("Requests processed: {}", self.request_count);
        println!("Runtime: {}s", runtime.num_seconds());
        println!("{}", "=".repeat(80));
    }

    pub fn display_error(&self, error: &anyhow::Error) {
        println!("\n{}", "=".repeat(80));
        println!("💥 ANALYSIS ERROR");
        println!("{}", "=".repeat(80));
        println!("Error: {}", error);
        println!("Requests processed before error: {}", self.request_count);
        println!("{}", "=".repeat(80));
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn effect_marker(delta: f64) -> &'static str {
    if delta > 0.0 {
        "↑ pushes positive"
    } else if delta < 0.0 {
        "↓ pushes negative"
    } else {
        "· no effect"
    }
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max_chars).collect();
        format!("{}...", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_is_char_safe() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_effect_marker_signs() {
        assert!(effect_marker(0.2).starts_with('↑'));
        assert!(effect_marker(-0.2).starts_with('↓'));
        assert!(effect_marker(0.0).starts_with('·'));
    }
}
