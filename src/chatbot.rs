use std::fmt;
use std::str::FromStr;

/// Reply language for the help assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "hi" | "hindi" => Ok(Language::Hi),
            other => Err(format!("unsupported language '{}' (expected en or hi)", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::En => "en",
            Language::Hi => "hi",
        })
    }
}

/// Number of FAQ keys offered as example questions.
pub const EXAMPLE_COUNT: usize = 8;

// Order matters: the first key found anywhere in the question wins.
const FAQ_EN: &[(&str, &str)] = &[
    ("hello", "Hello! How can I help you today?"),
    ("hi", "Hi there! How can I assist you?"),
    ("help", "You can submit complaints, reviews, track complaints, view analytics, or get vendor info."),
    ("submit complaint", "Run 'feedhub complaint submit' to lodge a new complaint."),
    ("submit review", "Run 'feedhub review submit' to add a product review."),
    ("track complaints", "Run 'feedhub complaint list' or 'feedhub complaint browse' to see complaint status."),
    ("vendor dashboard", "Run 'feedhub vendor show <name>' to see vendor stats."),
    ("analytics", "Run 'feedhub analytics' to view KPIs and top products and vendors."),
    ("quick stats", "Total complaints, resolved complaints, pending complaints, avg. ratings, total users, total vendors."),
    ("thank you", "You're welcome!"),
    ("bye", "Goodbye! Have a great day!"),
];

const FAQ_HI: &[(&str, &str)] = &[
    ("hello", "नमस्ते! मैं आपकी कैसे मदद कर सकता हूँ?"),
    ("hi", "हाय! मैं आपकी कैसे सहायता करूँ?"),
    ("help", "आप शिकायत दर्ज कर सकते हैं, समीक्षा जोड़ सकते हैं, शिकायतें ट्रैक कर सकते हैं, एनालिटिक्स देख सकते हैं, या विक्रेता जानकारी प्राप्त कर सकते हैं।"),
    ("submit complaint", "नया शिकायत दर्ज करने के लिए 'feedhub complaint submit' चलाएँ।"),
    ("submit review", "उत्पाद समीक्षा जोड़ने के लिए 'feedhub review submit' चलाएँ।"),
    ("track complaints", "'feedhub complaint list' चलाकर शिकायत स्थिति देखें।"),
    ("vendor dashboard", "'feedhub vendor show <name>' चलाकर विक्रेता आँकड़े देखें।"),
    ("analytics", "KPIs और शीर्ष उत्पाद देखने के लिए 'feedhub analytics' चलाएँ।"),
    ("quick stats", "कुल शिकायतें, हल की गई शिकायतें, लंबित शिकायतें, औसत रेटिंग, कुल उपयोगकर्ता, कुल विक्रेता।"),
    ("thank you", "आपका स्वागत है!"),
    ("bye", "अलविदा! आपका दिन शुभ हो!"),
];

const FALLBACK_EN: &str = "Sorry, I didn't understand that. Please try again.";
const FALLBACK_HI: &str = "माफ़ कीजिये, मैं इसे समझ नहीं पाया। कृपया पुनः प्रयास करें।";

fn faq(lang: Language) -> &'static [(&'static str, &'static str)] {
    match lang {
        Language::En => FAQ_EN,
        Language::Hi => FAQ_HI,
    }
}

/// Canned answer for the first FAQ key contained in `question`, if any.
pub fn lookup(question: &str, lang: Language) -> Option<&'static str> {
    let question = question.to_lowercase();
    faq(lang)
        .iter()
        .find(|(key, _)| question.contains(key))
        .map(|(_, answer)| *answer)
}

/// Like [`lookup`], falling back to a "didn't understand" reply.
pub fn respond(question: &str, lang: Language) -> &'static str {
    lookup(question, lang).unwrap_or(match lang {
        Language::En => FALLBACK_EN,
        Language::Hi => FALLBACK_HI,
    })
}

/// The leading FAQ keys, suitable as example prompts.
pub fn examples(lang: Language) -> impl Iterator<Item = &'static str> {
    faq(lang).iter().take(EXAMPLE_COUNT).map(|(key, _)| *key)
}
