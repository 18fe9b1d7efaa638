//! Query-side script normalization.
//!
//! Product names in the price list are katakana, but users type hiragana or
//! romaji. Both are mapped to katakana before matching.

/// Offset between the hiragana and katakana blocks.
const KANA_OFFSET: u32 = 0x60;

/// Convert hiragana to katakana, leaving every other character untouched.
pub fn hira_to_kata(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}' => {
                char::from_u32(c as u32 + KANA_OFFSET).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Romaji → katakana
// ---------------------------------------------------------------------------

/// Syllable table. Order is irrelevant: lookup tries 3, then 2, then 1 letters.
const ROMAJI: &[(&str, &str)] = &[
    ("a", "ア"), ("i", "イ"), ("u", "ウ"), ("e", "エ"), ("o", "オ"),
    ("ka", "カ"), ("ki", "キ"), ("ku", "ク"), ("ke", "ケ"), ("ko", "コ"),
    ("kya", "キャ"), ("kyu", "キュ"), ("kyo", "キョ"),
    ("ga", "ガ"), ("gi", "ギ"), ("gu", "グ"), ("ge", "ゲ"), ("go", "ゴ"),
    ("gya", "ギャ"), ("gyu", "ギュ"), ("gyo", "ギョ"),
    ("sa", "サ"), ("si", "シ"), ("shi", "シ"), ("su", "ス"), ("se", "セ"), ("so", "ソ"),
    ("sha", "シャ"), ("shu", "シュ"), ("sho", "ショ"), ("she", "シェ"),
    ("sya", "シャ"), ("syu", "シュ"), ("syo", "ショ"),
    ("za", "ザ"), ("zi", "ジ"), ("ji", "ジ"), ("zu", "ズ"), ("ze", "ゼ"), ("zo", "ゾ"),
    ("ja", "ジャ"), ("ju", "ジュ"), ("jo", "ジョ"), ("je", "ジェ"),
    ("zya", "ジャ"), ("zyu", "ジュ"), ("zyo", "ジョ"),
    ("jya", "ジャ"), ("jyu", "ジュ"), ("jyo", "ジョ"),
    ("ta", "タ"), ("ti", "チ"), ("chi", "チ"), ("tu", "ツ"), ("tsu", "ツ"), ("te", "テ"), ("to", "ト"),
    ("cha", "チャ"), ("chu", "チュ"), ("cho", "チョ"), ("che", "チェ"),
    ("tya", "チャ"), ("tyu", "チュ"), ("tyo", "チョ"), ("thi", "ティ"), ("twu", "トゥ"),
    ("da", "ダ"), ("di", "ヂ"), ("du", "ヅ"), ("de", "デ"), ("do", "ド"),
    ("dhi", "ディ"), ("dwu", "ドゥ"),
    ("na", "ナ"), ("ni", "ニ"), ("nu", "ヌ"), ("ne", "ネ"), ("no", "ノ"),
    ("nya", "ニャ"), ("nyu", "ニュ"), ("nyo", "ニョ"),
    ("ha", "ハ"), ("hi", "ヒ"), ("hu", "フ"), ("fu", "フ"), ("he", "ヘ"), ("ho", "ホ"),
    ("hya", "ヒャ"), ("hyu", "ヒュ"), ("hyo", "ヒョ"),
    ("fa", "ファ"), ("fi", "フィ"), ("fe", "フェ"), ("fo", "フォ"),
    ("ba", "バ"), ("bi", "ビ"), ("bu", "ブ"), ("be", "ベ"), ("bo", "ボ"),
    ("bya", "ビャ"), ("byu", "ビュ"), ("byo", "ビョ"),
    ("pa", "パ"), ("pi", "ピ"), ("pu", "プ"), ("pe", "ペ"), ("po", "ポ"),
    ("pya", "ピャ"), ("pyu", "ピュ"), ("pyo", "ピョ"),
    ("ma", "マ"), ("mi", "ミ"), ("mu", "ム"), ("me", "メ"), ("mo", "モ"),
    ("mya", "ミャ"), ("myu", "ミュ"), ("myo", "ミョ"),
    ("ya", "ヤ"), ("yu", "ユ"), ("yo", "ヨ"),
    ("ra", "ラ"), ("ri", "リ"), ("ru", "ル"), ("re", "レ"), ("ro", "ロ"),
    ("rya", "リャ"), ("ryu", "リュ"), ("ryo", "リョ"),
    ("wa", "ワ"), ("wi", "ウィ"), ("we", "ウェ"), ("wo", "ヲ"),
    ("va", "ヴァ"), ("vi", "ヴィ"), ("vu", "ヴ"), ("ve", "ヴェ"), ("vo", "ヴォ"),
    ("xa", "ァ"), ("xi", "ィ"), ("xu", "ゥ"), ("xe", "ェ"), ("xo", "ォ"),
    ("xya", "ャ"), ("xyu", "ュ"), ("xyo", "ョ"), ("xtu", "ッ"),
    ("-", "ー"),
];

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'i' | b'u' | b'e' | b'o')
}

fn lookup(chunk: &[u8]) -> Option<&'static str> {
    ROMAJI
        .iter()
        .find(|(latin, _)| latin.as_bytes() == chunk)
        .map(|(_, kana)| *kana)
}

/// Transliterate a romaji string (Hepburn or Kunrei) into katakana.
///
/// Returns `None` when the input is not wholly romaji, so that ordinary
/// Latin-script queries such as brand names are not mangled.
pub fn romaji_to_kata(text: &str) -> Option<String> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty()
        || !lower
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b == b'-' || b == b'\'')
    {
        return None;
    }

    let s = lower.as_bytes();
    let mut out = String::with_capacity(s.len() * 3);
    let mut i = 0;

    while i < s.len() {
        let c = s[i];
        let next = s.get(i + 1).copied();

        if c == b'\'' {
            i += 1;
            continue;
        }

        // Syllabic n: before a consonant, an apostrophe, another n, or the end.
        if c == b'n' {
            match next {
                None => {
                    out.push('ン');
                    i += 1;
                    continue;
                }
                Some(b'n') => {
                    let after = s.get(i + 2).copied();
                    let starts_syllable = after.is_some_and(|b| is_vowel(b) || b == b'y');
                    out.push('ン');
                    i += if starts_syllable { 1 } else { 2 };
                    continue;
                }
                Some(b) if !is_vowel(b) && b != b'y' => {
                    out.push('ン');
                    i += 1;
                    continue;
                }
                _ => {}
            }
        }

        // Geminate consonant: "tt", "pp", "ss", and the Hepburn "tch".
        if c != b'n' && !is_vowel(c) && c != b'-' {
            if next == Some(c) || (c == b't' && next == Some(b'c')) {
                out.push('ッ');
                i += 1;
                continue;
            }
        }

        let mut matched = false;
        for len in (1..=3).rev() {
            if i + len > s.len() {
                continue;
            }
            if let Some(kana) = lookup(&s[i..i + len]) {
                out.push_str(kana);
                i += len;
                matched = true;
                break;
            }
        }
        if !matched {
            return None;
        }
    }

    Some(out)
}

/// Every form a query is matched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryForms {
    /// The query as typed (trimmed, lowercased).
    pub raw: String,
    /// Phonetically normalized katakana forms, deduplicated.
    pub normalized: Vec<String>,
}

impl QueryForms {
    pub fn new(query: &str) -> Self {
        let raw = query.trim().to_lowercase();
        let mut normalized = vec![hira_to_kata(&raw)];
        if let Some(kata) = romaji_to_kata(&raw) {
            if !normalized.contains(&kata) {
                normalized.push(kata);
            }
        }
        QueryForms { raw, normalized }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiragana_becomes_katakana() {
        assert_eq!(hira_to_kata("あすぴりん"), "アスピリン");
        assert_eq!(hira_to_kata("ろきそにん錠60mg"), "ロキソニン錠60mg");
        assert_eq!(hira_to_kata("カタカナ"), "カタカナ");
    }

    #[test]
    fn romaji_transliteration() {
        assert_eq!(romaji_to_kata("asupirin").as_deref(), Some("アスピリン"));
        assert_eq!(romaji_to_kata("rokisonin").as_deref(), Some("ロキソニン"));
        assert_eq!(romaji_to_kata("Kyabetsu").as_deref(), Some("キャベツ"));
        assert_eq!(romaji_to_kata("gakkou").as_deref(), Some("ガッコウ"));
        assert_eq!(romaji_to_kata("konnichiha").as_deref(), Some("コンニチハ"));
        assert_eq!(romaji_to_kata("kan'i").as_deref(), Some("カンイ"));
        assert_eq!(romaji_to_kata("ka-do").as_deref(), Some("カード"));
        assert_eq!(romaji_to_kata("matcha").as_deref(), Some("マッチャ"));
    }

    #[test]
    fn non_romaji_is_rejected() {
        assert_eq!(romaji_to_kata("qxz"), None);
        assert_eq!(romaji_to_kata("abc123"), None);
        assert_eq!(romaji_to_kata("アスピリン"), None);
        assert_eq!(romaji_to_kata(""), None);
    }

    #[test]
    fn query_forms_include_both_scripts() {
        let forms = QueryForms::new("  Asupirin ");
        assert_eq!(forms.raw, "asupirin");
        assert_eq!(forms.normalized, vec!["asupirin".to_string(), "アスピリン".to_string()]);

        let forms = QueryForms::new("あすぴりん");
        assert_eq!(forms.normalized, vec!["アスピリン".to_string()]);
    }
}
