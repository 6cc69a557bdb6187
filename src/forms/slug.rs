use nanoid::nanoid;

pub const MAX_SLUG_LENGTH: usize = 100;

const RANDOM_SLUG_ALPHABET: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

/// Turns a note title into a URL slug: Cyrillic is transliterated, anything
/// that is not an ASCII letter, digit, `_` or `-` is dropped, and runs of
/// whitespace or hyphens become a single `-`.
pub fn slugify(value: &str) -> String {
    let mut latin = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        match transliterate(c) {
            Some(piece) => latin.push_str(piece),
            None => latin.push(c),
        }
    }

    let mut slug = String::with_capacity(latin.len());
    let mut separator = false;
    for c in latin.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            separator = true;
        }
    }

    let slug = slug.trim_matches(|c| c == '-' || c == '_');
    slug.chars().take(MAX_SLUG_LENGTH).collect()
}

pub fn random_slug() -> String {
    nanoid!(6, &RANDOM_SLUG_ALPHABET)
}

/// Letters, digits, underscores and hyphens only.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
