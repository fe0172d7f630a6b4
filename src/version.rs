//! Version string ordering.

use std::cmp::Ordering;

/// Compares two version strings the way package managers do.
///
/// Versions are split into runs of digits and runs of letters; everything
/// else separates segments. Numeric runs compare by value, a numeric run is
/// newer than an alphabetic one, and `~` sorts before anything, including
/// the end of the string (`1.0~rc1 < 1.0`). A missing version is older than
/// any present one.
pub fn compare_versions(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) if a == b => Ordering::Equal,
        (Some(a), Some(b)) => compare_segments(a.as_bytes(), b.as_bytes()),
    }
}

fn is_separator(c: u8) -> bool {
    !c.is_ascii_alphanumeric() && c != b'~'
}

fn compare_segments(mut a: &[u8], mut b: &[u8]) -> Ordering {
    loop {
        a = skip_separators(a);
        b = skip_separators(b);

        match (a.first(), b.first()) {
            (Some(b'~'), Some(b'~')) => {
                a = &a[1..];
                b = &b[1..];
                continue;
            }
            (Some(b'~'), _) => return Ordering::Less,
            (_, Some(b'~')) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(_), Some(_)) => {}
        }

        let numeric = a[0].is_ascii_digit();
        let run = |s: &[u8]| -> usize {
            s.iter()
                .take_while(|c| {
                    if numeric {
                        c.is_ascii_digit()
                    } else {
                        c.is_ascii_alphabetic()
                    }
                })
                .count()
        };
        let (len_a, len_b) = (run(a), run(b));

        // segments of different types: numbers are newer than letters
        if len_b == 0 {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let (seg_a, seg_b) = (&a[..len_a], &b[..len_b]);
        let ordering = if numeric {
            let seg_a = trim_leading_zeros(seg_a);
            let seg_b = trim_leading_zeros(seg_b);
            seg_a.len().cmp(&seg_b.len()).then_with(|| seg_a.cmp(seg_b))
        } else {
            seg_a.cmp(seg_b)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }

        a = &a[len_a..];
        b = &b[len_b..];
    }
}

fn skip_separators(s: &[u8]) -> &[u8] {
    let skip = s.iter().take_while(|c| is_separator(**c)).count();
    &s[skip..]
}

fn trim_leading_zeros(s: &[u8]) -> &[u8] {
    let zeros = s.iter().take_while(|c| **c == b'0').count();
    &s[zeros..]
}
