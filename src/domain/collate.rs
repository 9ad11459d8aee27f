//! Name ordering that follows pt-BR collation closely enough for rider names:
//! base letters first, then accents, then case (lowercase first).

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub fn compare_names(left: &str, right: &str) -> Ordering {
    base_key(left)
        .cmp(&base_key(right))
        .then_with(|| accent_key(left).cmp(&accent_key(right)))
        .then_with(|| compare_case(left, right))
        .then_with(|| left.cmp(right))
}

fn base_key(name: &str) -> String {
    name.nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accent_key(name: &str) -> String {
    name.nfd().flat_map(char::to_lowercase).collect()
}

fn compare_case(left: &str, right: &str) -> Ordering {
    for (a, b) in left.nfd().zip(right.nfd()) {
        if a == b {
            continue;
        }
        match (a.is_lowercase(), b.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::compare_names;
    use std::cmp::Ordering;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut owned: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        owned.sort_by(|a, b| compare_names(a, b));
        owned
    }

    #[test]
    fn accents_do_not_push_names_past_plain_letters() {
        assert_eq!(
            sorted(&["Érica", "Bruno", "Eduardo", "Ana"]),
            vec!["Ana", "Bruno", "Eduardo", "Érica"]
        );
        assert_eq!(sorted(&["Zé", "Álvaro", "Beto"]), vec!["Álvaro", "Beto", "Zé"]);
    }

    #[test]
    fn case_is_ignored_at_the_first_level() {
        assert_eq!(sorted(&["bruno", "Ana", "carla"]), vec!["Ana", "bruno", "carla"]);
    }

    #[test]
    fn ties_break_on_accent_then_case() {
        assert_eq!(compare_names("Jose", "José"), Ordering::Less);
        assert_eq!(compare_names("ana", "Ana"), Ordering::Less);
        assert_eq!(compare_names("Ana", "Ana"), Ordering::Equal);
    }
}
