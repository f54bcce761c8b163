//! Prompt rendering for review annotation requests.
//!
//! `build_prompt` is deterministic: the same review text and customer name
//! always produce the same prompt. The enumerated fields mirror
//! [`super::schema::ANNOTATION_FIELDS`] one to one; the parser in the client
//! relies on the model answering in exactly this order.

/// System message sent with every annotation request.
pub const SYSTEM_PROMPT: &str = "You are an expert in travel review analysis. \
You answer ONLY with the requested values separated by |.";

/// Render the annotation request for a single review.
pub fn build_prompt(review_text: &str, customer_name: &str) -> String {
    format!(
        r#"You are an analyzer specialized in tourism review evaluation and sentiment analysis. For the text below, provide the following information separated by the "|" delimiter:

REVIEW TO ANALYZE:
Text: {review_text}
Customer: {customer_name}

REQUIRED ANALYSIS (answer each field separated by "|"):

0. Language: classify as "es", "en", "fr", "de", "it", "pt", "nl", "ru", "tr", "ar", "zh", "ja", "ko", "other"
1. Sentiment: classify as "Positive", "Negative" or "Neutral"
2. Sentiment_score: rate on a scale from -1 to +1 (-1=extremely negative, 0=neutral, +1=extremely positive)
3. Emotion: identify one emotion (joy, surprise, neutral, sadness, disgust, anger, fear)
4. Emotion_intensity: intensity from 1-5 (1=very mild, 5=very intense)
5. Customer_gender: based on the name (male, female, unknown)
6. Topic: main topic (Customer service, Cleanliness, Facilities, Value for money, Services, Location, Ethics and sustainability, Check-in and check-out, Comfort and rest, Food and dining, Booking ease and digital accessibility, Entertainment and activities, Safety)
7. Keywords: 3-5 relevant terms separated by commas WITHOUT spaces
8. Customer_type: Promoter, Loyal, Neutral, Critic, Opportunist
9. Tourist_type: Leisure tourist, cultural, nature, adventure, shopping, spiritual/religious, food, sports, wellness, volunteer
10. Group_type: family, friends, couple, solo, organized group

RESPONSE FORMAT:
Answer ONLY with the values separated by "|" in the exact order listed above.
If you cannot determine a field, use "unknown".
Do NOT include spaces before or after the pipes.

Example: en|Positive|0.8|joy|4|female|Customer service|excellent,service,friendly|Promoter|Leisure tourist|couple
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::schema::FIELD_COUNT;

    #[test]
    fn test_build_prompt_is_deterministic() {
        let a = build_prompt("Great hotel", "Alice");
        let b = build_prompt("Great hotel", "Alice");
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_prompt_embeds_inputs_verbatim() {
        let prompt = build_prompt("The pool was dirty & cold", "José García");
        assert!(prompt.contains("Text: The pool was dirty & cold"));
        assert!(prompt.contains("Customer: José García"));
    }

    #[test]
    fn test_build_prompt_enumerates_all_fields() {
        let prompt = build_prompt("x", "y");
        // One numbered line per schema field, 0-indexed.
        for i in 0..FIELD_COUNT {
            assert!(
                prompt.contains(&format!("\n{}. ", i)),
                "missing field entry {}",
                i
            );
        }
        assert!(!prompt.contains(&format!("\n{}. ", FIELD_COUNT)));
    }

    #[test]
    fn test_build_prompt_has_example_with_field_count_values() {
        let prompt = build_prompt("x", "y");
        let example = prompt
            .lines()
            .find(|l| l.starts_with("Example: "))
            .expect("example line");
        let values = example.trim_start_matches("Example: ").split('|').count();
        assert_eq!(values, FIELD_COUNT);
    }
}
