//! Template-based fallback advisories
//!
//! Deterministic Indonesian-language guidance used whenever the external
//! service cannot produce an advisory. The template is chosen by verdict
//! class alone; the confidence value is interpolated into the text.

use crate::config::FallbackConfig;
use crate::types::{Advisory, NewsClass, Verdict};

/// Generic manual verification checklist.
const MANUAL_TIPS: [&str; 4] = [
    "Verifikasi dengan sumber berita terpercaya",
    "Cek fakta di situs fact-checking",
    "Jangan langsung share tanpa verifikasi",
    "Perhatikan tanda-tanda berita hoax seperti judul sensasional",
];

#[derive(Debug, Clone, Default)]
pub struct FallbackAdvisor {
    include_manual_tips: bool,
}

impl FallbackAdvisor {
    pub fn new(config: &FallbackConfig) -> Self {
        Self {
            include_manual_tips: config.include_manual_tips,
        }
    }

    /// Build the fallback advisory. Never fails.
    pub fn advise(&self, verdict: &Verdict) -> Advisory {
        let mut text = match verdict.class {
            NewsClass::Hoax => hoax_template(verdict.confidence),
            NewsClass::Valid => valid_template(verdict.confidence),
        };

        if self.include_manual_tips {
            text.push_str("\n\n**Tips Manual:**\n");
            for tip in MANUAL_TIPS {
                text.push_str("- ");
                text.push_str(tip);
                text.push('\n');
            }
            text.truncate(text.trim_end().len());
        }

        Advisory::fallback(text)
    }
}

fn hoax_template(confidence: f64) -> String {
    format!(
        "1. **Analisis Singkat**: Model mengkategorikan berita ini sebagai HOAX \
         dengan tingkat kepercayaan {confidence:.2}%. Pola bahasa dalam teks mirip \
         dengan berita hoax yang pernah beredar.\n\
         2. **Saran Verifikasi**: Cari berita yang sama di media arus utama, \
         periksa tanggal dan sumber asli, lalu bandingkan dengan hasil situs cek fakta.\n\
         3. **Tips Media Literacy**: Waspadai judul sensasional dan ajakan untuk \
         segera menyebarkan.\n\
         4. **Tindakan yang Disarankan**: Jangan bagikan berita ini sebelum \
         kebenarannya terkonfirmasi."
    )
}

fn valid_template(confidence: f64) -> String {
    format!(
        "1. **Analisis Singkat**: Model mengkategorikan berita ini sebagai VALID \
         dengan tingkat kepercayaan {confidence:.2}%. Pola bahasa dalam teks mirip \
         dengan berita dari sumber terpercaya.\n\
         2. **Saran Verifikasi**: Tetap pastikan sumber dan tanggal publikasi, \
         karena hasil model bukan jaminan kebenaran.\n\
         3. **Tips Media Literacy**: Biasakan membaca isi berita secara utuh, \
         bukan hanya judulnya.\n\
         4. **Tindakan yang Disarankan**: Jika ingin membagikan, sertakan tautan \
         ke sumber aslinya."
    )
}
