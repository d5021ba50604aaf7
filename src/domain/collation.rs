//! Locale-aware string comparison for car makes and models.
//!
//! Implements the three comparison levels of the default Unicode collation in
//! a compact form:
//!
//! 1. **Primary**: base letters, ignoring case and accents. Whitespace sorts
//!    before punctuation, punctuation before digits, digits before letters.
//! 2. **Secondary**: accents. An unaccented letter sorts before its accented
//!    forms.
//! 3. **Tertiary**: case. Lowercase sorts before uppercase.
//!
//! Strings equal on all three levels fall back to code point order so the
//! result is a total order.
//!
//! ```text
//! "audi" < "BMW"       primary
//! "resume" < "résumé"  secondary
//! "civic" < "Civic"    tertiary
//! ```

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug)]
struct Element {
    primary: (u8, char),
    marks: Vec<char>,
    upper: bool,
}

fn class_of(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_numeric() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        1
    }
}

fn elements(text: &str) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::with_capacity(text.len());

    for c in text.nfd() {
        if is_combining_mark(c) {
            if let Some(last) = out.last_mut() {
                last.marks.push(c);
            }
            continue;
        }

        let upper = c.is_uppercase();
        for lower in c.to_lowercase() {
            if is_combining_mark(lower) {
                if let Some(last) = out.last_mut() {
                    last.marks.push(lower);
                }
            } else {
                out.push(Element {
                    primary: (class_of(lower), lower),
                    marks: Vec::new(),
                    upper,
                });
            }
        }
    }

    out
}

/// Compares two strings the way a default-locale collator does.
///
/// # Examples
///
/// ```
/// use fuel_tracker::domain::collation::collate;
/// use std::cmp::Ordering;
///
/// assert_eq!(collate("audi", "BMW"), Ordering::Less);
/// assert_eq!(collate("Honda", "Toyota"), Ordering::Less);
/// ```
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    let left = elements(a);
    let right = elements(b);

    left.iter()
        .map(|e| e.primary)
        .cmp(right.iter().map(|e| e.primary))
        .then_with(|| left.iter().map(|e| &e.marks).cmp(right.iter().map(|e| &e.marks)))
        .then_with(|| left.iter().map(|e| e.upper).cmp(right.iter().map(|e| e.upper)))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_is_ignored_at_the_primary_level() {
        assert_eq!(collate("audi", "BMW"), Ordering::Less);
        assert_eq!(collate("BMW", "audi"), Ordering::Greater);
    }

    #[test]
    fn lowercase_sorts_before_uppercase_when_letters_match() {
        assert_eq!(collate("civic", "Civic"), Ordering::Less);
    }

    #[test]
    fn accents_only_break_ties() {
        assert_eq!(collate("resume", "résumé"), Ordering::Less);
        assert_eq!(collate("résumé", "resumes"), Ordering::Less);
        assert_eq!(collate("Škoda", "Subaru"), Ordering::Less);
        assert_eq!(collate("Citroën", "Citroen"), Ordering::Greater);
    }

    #[test]
    fn precomposed_and_decomposed_forms_compare_equal_on_letters() {
        assert_eq!(collate("Citro\u{00eb}n", "Citroe\u{0308}n"), "Citro\u{00eb}n".cmp("Citroe\u{0308}n"));
        assert_ne!(collate("Citro\u{00eb}n", "Citroen"), Ordering::Equal);
    }

    #[test]
    fn digits_sort_before_letters_and_spaces_before_digits() {
        assert_eq!(collate("4Runner", "Accord"), Ordering::Less);
        assert_eq!(collate("Model 3", "Model3"), Ordering::Less);
    }

    #[test]
    fn identical_strings_are_equal() {
        assert_eq!(collate("Mazda", "Mazda"), Ordering::Equal);
        assert_eq!(collate("", ""), Ordering::Equal);
        assert_eq!(collate("", "a"), Ordering::Less);
    }
}
