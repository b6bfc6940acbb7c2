use std::collections::HashMap;
use once_cell::sync::Lazy;

/// The fixed intermediate language used for prompt construction regardless of
/// the caller's chosen language.
pub const WORKING_LANGUAGE: &str = "en";

/// Closed set of languages the chatbot speaks, code → display name.
static LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("mr", "Marathi"),
    ("te", "Telugu"),
    ("ta", "Tamil"),
    ("gu", "Gujarati"),
    ("pa", "Punjabi"),
    ("bn", "Bengali"),
];

/// Canned replies returned when the generation backend fails mid-request.
/// Languages without an entry fall back to English.
static FALLBACK_APOLOGIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "en",
            "Sorry, I am having trouble answering right now. Please try again in a moment.",
        ),
        (
            "hi",
            "क्षमा करें, मुझे अभी उत्तर देने में समस्या हो रही है। कृपया थोड़ी देर बाद पुनः प्रयास करें।",
        ),
        (
            "mr",
            "क्षमस्व, मला सध्या उत्तर देण्यात अडचण येत आहे. कृपया थोड्या वेळाने पुन्हा प्रयत्न करा.",
        ),
        (
            "te",
            "క్షమించండి, నేను ప్రస్తుతం సమాధానం ఇవ్వలేకపోతున్నాను. దయచేసి కాసేపటి తర్వాత మళ్లీ ప్రయత్నించండి.",
        ),
        (
            "ta",
            "மன்னிக்கவும், என்னால் இப்போது பதிலளிக்க முடியவில்லை. சிறிது நேரம் கழித்து மீண்டும் முயற்சிக்கவும்.",
        ),
        (
            "gu",
            "માફ કરશો, હું અત્યારે જવાબ આપી શકતો નથી. કૃપા કરીને થોડી વાર પછી ફરી પ્રયાસ કરો.",
        ),
        (
            "pa",
            "ਮੁਆਫ਼ ਕਰਨਾ, ਮੈਨੂੰ ਹੁਣੇ ਜਵਾਬ ਦੇਣ ਵਿੱਚ ਮੁਸ਼ਕਲ ਆ ਰਹੀ ਹੈ। ਕਿਰਪਾ ਕਰਕੇ ਥੋੜ੍ਹੀ ਦੇਰ ਬਾਅਦ ਦੁਬਾਰਾ ਕੋਸ਼ਿਸ਼ ਕਰੋ।",
        ),
        (
            "bn",
            "দুঃখিত, আমি এখন উত্তর দিতে পারছি না। অনুগ্রহ করে কিছুক্ষণ পরে আবার চেষ্টা করুন।",
        ),
    ])
});

pub fn supported_codes() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(code, _)| *code)
}

/// Display name for a language code; unknown codes resolve to "English".
pub fn display_name(code: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("English")
}

/// Canned apology for a generation failure, in the caller's language when an
/// entry exists, English otherwise.
pub fn fallback_apology(code: &str) -> &'static str {
    FALLBACK_APOLOGIES
        .get(code)
        .or_else(|| FALLBACK_APOLOGIES.get(WORKING_LANGUAGE))
        .copied()
        .unwrap_or("Sorry, I am having trouble answering right now.")
}
