//! Language display names for the `language_name` filter.

/// Source of human-readable language names, keyed by ISO language code.
pub trait LocaleRegistry: Send + Sync + std::fmt::Debug {
    /// The language's name in its own language (e.g. `"Deutsch"` for `de`),
    /// or `None` when the code is unknown.
    fn name_local(&self, code: &str) -> Option<String>;
}

/// Built-in table of the languages MenuManager ships translations for, plus
/// the other common languages a site may list.
///
/// Codes are matched case-insensitively, `_` and `-` are interchangeable, and a
/// regional code (`pt-br`) that is not in the table falls back to its base
/// language (`pt`).
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLocales;

// (code, local name)
const LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "العربيّة"),
    ("ar-dz", "العربية الجزائرية"),
    ("az", "Azərbaycanca"),
    ("be", "беларуская"),
    ("bg", "български"),
    ("bn", "বাংলা"),
    ("bs", "bosanski"),
    ("ca", "català"),
    ("cs", "česky"),
    ("cy", "Cymraeg"),
    ("da", "dansk"),
    ("de", "Deutsch"),
    ("el", "Ελληνικά"),
    ("en", "English"),
    ("en-au", "Australian English"),
    ("en-gb", "British English"),
    ("eo", "Esperanto"),
    ("es", "español"),
    ("es-ar", "español de Argentina"),
    ("es-mx", "español de Mexico"),
    ("et", "eesti"),
    ("eu", "Basque"),
    ("fa", "فارسی"),
    ("fi", "suomi"),
    ("fr", "français"),
    ("ga", "Gaeilge"),
    ("gl", "galego"),
    ("he", "עברית"),
    ("hi", "हिंदी"),
    ("hr", "Hrvatski"),
    ("hu", "Magyar"),
    ("hy", "հայերեն"),
    ("id", "Bahasa Indonesia"),
    ("is", "Íslenska"),
    ("it", "italiano"),
    ("ja", "日本語"),
    ("ka", "ქართული"),
    ("kk", "Қазақ"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "한국어"),
    ("lt", "Lietuviškai"),
    ("lv", "latviešu"),
    ("mk", "Македонски"),
    ("ml", "മലയാളം"),
    ("mn", "Mongolian"),
    ("mr", "मराठी"),
    ("ms", "Bahasa Melayu"),
    ("nb", "norsk (bokmål)"),
    ("ne", "नेपाली"),
    ("nl", "Nederlands"),
    ("nn", "norsk (nynorsk)"),
    ("pa", "Punjabi"),
    ("pl", "polski"),
    ("pt", "Português"),
    ("pt-br", "Português Brasileiro"),
    ("ro", "Română"),
    ("ru", "Русский"),
    ("sk", "Slovensky"),
    ("sl", "Slovenščina"),
    ("sq", "shqip"),
    ("sr", "српски"),
    ("sr-latn", "srpski (latinica)"),
    ("sv", "svenska"),
    ("sw", "Kiswahili"),
    ("ta", "தமிழ்"),
    ("te", "తెలుగు"),
    ("th", "ภาษาไทย"),
    ("tr", "Türkçe"),
    ("uk", "Українська"),
    ("ur", "اردو"),
    ("uz", "oʻzbek tili"),
    ("vi", "Tiếng Việt"),
    ("zh-hans", "简体中文"),
    ("zh-hant", "繁體中文"),
];

// Codes that resolve to another entry rather than carrying a name of their own.
const ALIASES: &[(&str, &str)] = &[
    ("zh-cn", "zh-hans"),
    ("zh-sg", "zh-hans"),
    ("zh-hk", "zh-hant"),
    ("zh-mo", "zh-hant"),
    ("zh-tw", "zh-hant"),
    ("zh-my", "zh-hans"),
    ("zh", "zh-hans"),
];

fn lookup(code: &str) -> Option<&'static str> {
    let code = ALIASES
        .iter()
        .find(|(alias, _)| *alias == code)
        .map_or(code, |(_, target)| *target);
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

impl LocaleRegistry for BuiltinLocales {
    fn name_local(&self, code: &str) -> Option<String> {
        let normalized = code.trim().to_ascii_lowercase().replace('_', "-");
        if normalized.is_empty() {
            return None;
        }

        if let Some(name) = lookup(&normalized) {
            return Some(name.to_string());
        }

        let (generic, _) = normalized.split_once('-')?;
        lookup(generic).map(str::to_string)
    }
}
