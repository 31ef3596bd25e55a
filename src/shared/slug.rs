//! Slug derivation and name collation for Portuguese content.

/// Convert a title into a URL-friendly slug.
///
/// Accented characters are folded to their ASCII base before filtering, so
/// "Direito Civil" becomes "direito-civil" and "Ação Rescisória" becomes
/// "acao-rescisoria". Characters with no ASCII equivalent are dropped.
pub fn slugify(input: &str) -> String {
    fold_diacritics(input)
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Case- and accent-insensitive sort key for sibling ordering.
///
/// "Ética" and "etica" compare equal; "Ação" sorts between "Abuso" and
/// "Adoção" instead of after "z".
pub fn collation_key(input: &str) -> String {
    fold_diacritics(input).to_lowercase()
}

fn fold_diacritics(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Direito Civil"), "direito-civil");
        assert_eq!(slugify("Lei 8078/90"), "lei-807890");
    }

    #[test]
    fn test_slugify_folds_portuguese_accents() {
        assert_eq!(slugify("Ação Rescisória"), "acao-rescisoria");
        assert_eq!(slugify("Usucapião"), "usucapiao");
        assert_eq!(slugify("Herança e Sucessões"), "heranca-e-sucessoes");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Direito   do  Consumidor "), "direito-do-consumidor");
        assert_eq!(slugify("penal_-_processo"), "penal-processo");
    }

    #[test]
    fn test_slugify_drops_symbols() {
        assert_eq!(slugify("Art. 5º, CF/88"), "art-5-cf88");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_collation_key_ignores_case_and_accents() {
        assert_eq!(collation_key("Ética"), collation_key("etica"));
        assert!(collation_key("Ação") < collation_key("Adoção"));
        assert!(collation_key("Abuso") < collation_key("Ação"));
    }
}
