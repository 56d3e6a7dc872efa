use std::fmt;

/// One string transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizeStep {
    /// Strip leading and trailing whitespace.
    Trim,
    LowerCase,
    /// Drop everything that is not a letter, a combining mark or an ASCII digit.
    AlphaNumOnly,
    /// Drop `(..)`, `[..]` and `{..}` groups, shortest first.
    NoBrackets,
    /// Fold accented Latin letters to their base letters and drop combining marks.
    NoAccents,
}

impl NormalizeStep {
    pub fn apply(self, input: &str) -> String {
        match self {
            NormalizeStep::Trim => input.trim().to_string(),
            NormalizeStep::LowerCase => input.to_lowercase(),
            NormalizeStep::AlphaNumOnly => regex!(r"[^\p{L}\p{M}0-9]").replace_all(input, "").into_owned(),
            NormalizeStep::NoBrackets => regex!(r"\(.*?\)|\[.*?\]|\{.*?\}").replace_all(input, "").into_owned(),
            NormalizeStep::NoAccents => {
                let mut out = String::with_capacity(input.len());
                for c in input.chars() {
                    match fold_accent(c) {
                        Some(base) => out.push_str(base),
                        None => out.push(c),
                    }
                }
                regex!(r"\p{Mn}+").replace_all(&out, "").into_owned()
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NormalizeStep::Trim => "trim",
            NormalizeStep::LowerCase => "lower",
            NormalizeStep::AlphaNumOnly => "alpha-num",
            NormalizeStep::NoBrackets => "no-brackets",
            NormalizeStep::NoAccents => "no-accents",
        }
    }
}

impl fmt::Display for NormalizeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Precomposed Latin-1 and Latin Extended-A letters.
fn fold_accent(c: char) -> Option<&'static str> {
    let base = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ď' | 'Đ' | 'Ð' => "D",
        'ď' | 'đ' | 'ð' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ý' | 'Ŷ' | 'Ÿ' => "Y",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(base)
}

/// An ordered pipeline of [`NormalizeStep`]s.
///
/// The default pipeline is trim, alpha-num, lower, no-accents:
///
/// ```
/// use phrasematch::Normalizer;
///
/// let normalizer = Normalizer::default();
/// assert_eq!(normalizer.normalize(" Café! "), "cafe");
/// assert_eq!(normalizer.normalize("hyper-space"), "hyperspace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Normalizer {
    steps: Vec<NormalizeStep>,
}

impl Normalizer {
    pub fn new(steps: Vec<NormalizeStep>) -> Self {
        Normalizer { steps }
    }

    /// No-op: normalized form equals the word.
    pub fn identity() -> Self {
        Normalizer { steps: Vec::new() }
    }

    pub fn lower_case() -> Self {
        Normalizer { steps: vec![NormalizeStep::LowerCase] }
    }

    /// `default`, `lower` or `none`.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Normalizer::default()),
            "lower" => Some(Normalizer::lower_case()),
            "none" | "identity" => Some(Normalizer::identity()),
            _ => None,
        }
    }

    /// Append a step.
    pub fn then(mut self, step: NormalizeStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[NormalizeStep] {
        &self.steps
    }

    pub fn normalize(&self, input: &str) -> String {
        self.steps.iter().fold(input.to_string(), |acc, step| step.apply(&acc))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(vec![
            NormalizeStep::Trim,
            NormalizeStep::AlphaNumOnly,
            NormalizeStep::LowerCase,
            NormalizeStep::NoAccents,
        ])
    }
}

impl fmt::Display for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("identity");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("hyper-space"), "hyperspace");
        assert_eq!(n.normalize("f*cking"), "fcking");
        assert_eq!(n.normalize("arVId"), "arvid");
        assert_eq!(n.normalize("Caf\u{e9}"), "cafe");
        assert_eq!(n.normalize("Hub!"), "hub");
    }

    #[test]
    fn accents_fold_in_both_forms() {
        // precomposed and decomposed
        assert_eq!(NormalizeStep::NoAccents.apply("Caf\u{e9}"), "Cafe");
        assert_eq!(NormalizeStep::NoAccents.apply("Cafe\u{301}"), "Cafe");
        assert_eq!(NormalizeStep::NoAccents.apply("Straße"), "Strasse");
    }

    #[test]
    fn brackets_are_removed_lazily() {
        assert_eq!(NormalizeStep::NoBrackets.apply("a (b) c [d] {e} f"), "a  c   f");
    }

    #[test]
    fn digits_survive_alpha_num_only() {
        assert_eq!(NormalizeStep::AlphaNumOnly.apply("$1.30"), "130");
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(Normalizer::preset("none"), Some(Normalizer::identity()));
        assert_eq!(Normalizer::preset("lower").map(|n| n.normalize("ABC")), Some("abc".to_string()));
        assert!(Normalizer::preset("stemmed").is_none());
        assert_eq!(Normalizer::default().to_string(), "trim > alpha-num > lower > no-accents");
    }

    #[test]
    fn steps_can_be_appended() {
        let n = Normalizer::lower_case().then(NormalizeStep::NoBrackets);
        assert_eq!(n.normalize("Apple (RED)"), "apple ");
    }
}
