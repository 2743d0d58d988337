//! Verdict-conditioned prompt construction.

use crate::config::PromptStyle;
use crate::types::Verdict;

const DETAILED_PROMPT: &str = r#"Sebagai AI assistant yang ahli dalam analisis berita dan media literacy, berikan rekomendasi dan saran yang berguna untuk pengguna.

Konteks:
- Teks berita telah dianalisis dan dikategorikan sebagai: {status}
- Tingkat kepercayaan: {confidence}% ({level})
- Teks berita: "{excerpt}"

Berikan rekomendasi dalam format berikut:
1. **Analisis Singkat**: Jelaskan mengapa berita ini dikategorikan sebagai {status}
2. **Saran Verifikasi**: 3-4 langkah konkret untuk memverifikasi kebenaran berita
3. **Tips Media Literacy**: 2-3 tips praktis untuk mengidentifikasi berita hoax di masa depan
4. **Tindakan yang Disarankan**: Apa yang sebaiknya dilakukan pengguna selanjutnya

Berikan jawaban dalam bahasa Indonesia yang mudah dipahami dan praktis."#;

const BRIEF_PROMPT: &str = r#"Sebagai AI assistant media literacy, beri saran singkat (satu paragraf) untuk pengguna.

Teks berita dikategorikan sebagai {status} dengan tingkat kepercayaan {confidence}% ({level}).
Teks berita: "{excerpt}"

Jelaskan langkah verifikasi yang paling penting dalam bahasa Indonesia."#;

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub fn build_prompt(text: &str, verdict: &Verdict, style: PromptStyle, excerpt_chars: usize) -> String {
    let template = match style {
        PromptStyle::Detailed => DETAILED_PROMPT,
        PromptStyle::Brief => BRIEF_PROMPT,
    };

    template
        .replace("{status}", verdict.class.as_str())
        .replace("{confidence}", &format!("{:.2}", verdict.confidence))
        .replace("{level}", verdict.confidence_level().label())
        // excerpt last so user text is never scanned for placeholders
        .replace("{excerpt}", &excerpt(text, excerpt_chars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewsClass;

    fn hoax(confidence: f64) -> Verdict {
        Verdict {
            class: NewsClass::Hoax,
            confidence,
        }
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(excerpt(&text, 4), "éééé...");
        assert_eq!(excerpt("pendek", 500), "pendek");
    }

    #[test]
    fn test_detailed_prompt_contents() {
        let prompt = build_prompt("Beredar kabar vaksin mengandung chip", &hoax(95.0), PromptStyle::Detailed, 500);
        assert!(prompt.contains("dikategorikan sebagai: HOAX"));
        assert!(prompt.contains("95.00% (tinggi)"));
        assert!(prompt.contains("\"Beredar kabar vaksin mengandung chip\""));
        assert!(prompt.contains("Saran Verifikasi"));
    }

    #[test]
    fn test_brief_prompt_has_label() {
        let v = Verdict {
            class: NewsClass::Valid,
            confidence: 65.0,
        };
        let prompt = build_prompt("teks", &v, PromptStyle::Brief, 500);
        assert!(prompt.contains("VALID"));
        assert!(prompt.contains("(sedang)"));
        assert!(!prompt.contains("Tips Media Literacy"));
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = "a".repeat(2_000);
        let prompt = build_prompt(&long, &hoax(70.0), PromptStyle::Detailed, 500);
        assert!(prompt.contains(&format!("\"{}...\"", "a".repeat(500))));
        assert!(!prompt.contains(&"a".repeat(501)));
    }

    #[test]
    fn test_excerpt_taken_from_raw_text() {
        let padded = format!("{}{}", " ".repeat(10), "a".repeat(500));
        let prompt = build_prompt(&padded, &hoax(70.0), PromptStyle::Brief, 500);
        let expected = format!("\"{}{}...\"", " ".repeat(10), "a".repeat(490));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"a".repeat(491)));
    }

    #[test]
    fn test_placeholders_in_user_text_are_not_expanded() {
        let prompt = build_prompt("{status} {level}", &hoax(99.0), PromptStyle::Brief, 500);
        assert!(prompt.contains("\"{status} {level}\""));
    }
}
