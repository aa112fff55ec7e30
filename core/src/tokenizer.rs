use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Characters trimmed from both ends of every token.
pub const PUNCTUATION: &[char] = &['.', ',', ';', ':', '(', ')', '°'];

lazy_static! {
    static ref MARKUP: Regex = Regex::new(r"<.*?>").expect("valid regex");
    // "l. 1234" -> "l1234", only for a standalone l/r/d
    static ref CITATION_PREFIX: Regex = Regex::new(r"\b([lrd])\. ").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "au","aux","avec","ce","ces","dans","de","des","du","elle","en","et","eux","il","ils",
            "je","la","le","les","leur","lui","ma","mais","me","même","mes","moi","mon","ne","nos",
            "notre","nous","on","ou","par","pas","pour","qu","que","qui","sa","se","ses","son","sur",
            "ta","te","tes","toi","ton","tu","un","une","vos","votre","vous",
            "c","d","j","l","à","m","n","s","t","y",
            "été","étée","étées","étés","étant","étante","étants","étantes",
            "suis","es","est","sommes","êtes","sont","serai","seras","sera","serons","serez","seront",
            "serais","serait","serions","seriez","seraient",
            "étais","était","étions","étiez","étaient","fus","fut","fûmes","fûtes","furent",
            "sois","soit","soyons","soyez","soient","fusse","fusses","fût","fussions","fussiez","fussent",
            "ayant","ayante","ayantes","ayants","eu","eue","eues","eus",
            "ai","as","avons","avez","ont","aurai","auras","aura","aurons","aurez","auront",
            "aurais","aurait","aurions","auriez","auraient",
            "avais","avait","avions","aviez","avaient","eut","eûmes","eûtes","eurent",
            "aie","aies","ait","ayons","ayez","aient","eusse","eusses","eût","eussions","eussiez","eussent"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(PUNCTUATION)
}

/// Normalize a single word for index lookup: lowercase and punctuation trim only.
///
/// Stop words and markup are left alone, so a stop word typed as a query term
/// is still looked up (and finds nothing, since it was never indexed).
pub fn normalize_term(word: &str) -> String {
    strip_punctuation(&word.to_lowercase()).to_string()
}

/// Tokenize a full article text into the words that get indexed.
///
/// Order of the output is not meaningful; callers only count occurrences.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let collapsed = CITATION_PREFIX.replace_all(&lowered, "$1");
    let elided = collapsed.replace("l'", "l ");
    let plain = MARKUP.replace_all(&elided, "");

    plain
        .split(' ')
        .map(strip_punctuation)
        .filter(|token| !token.is_empty() && !is_stopword(token))
        .map(str::to_string)
        .collect()
}
