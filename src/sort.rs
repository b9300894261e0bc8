//! Ordering of items within a section and of sections within a manifest

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{GalleryItem, GallerySection};

/// Extract the first run of ASCII digits in `text` as a number.
///
/// Returns 0 when there are no digits. Runs too large for `u64` saturate.
pub fn leading_number(text: &str) -> u64 {
    let start = match text.find(|c: char| c.is_ascii_digit()) {
        Some(idx) => idx,
        None => return 0,
    };
    let digits = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<u64>().unwrap_or(u64::MAX)
}

/// Primary collation weight: punctuation and whitespace, then digits, then
/// everything else, each compared case-insensitively.
fn primary_key(c: char) -> (u8, char) {
    let class = if c.is_whitespace() || c.is_ascii_punctuation() {
        0
    } else if c.is_ascii_digit() {
        1
    } else {
        2
    };
    let lower = c.to_lowercase().next().unwrap_or(c);
    (class, lower)
}

/// Tertiary weight: lowercase before uppercase, then code point.
fn tertiary_key(c: char) -> (u8, char) {
    (if c.is_lowercase() { 0 } else { 1 }, c)
}

/// Locale-aware string comparison.
///
/// Three levels, each only consulted when the previous one ties:
/// - base letters, case-insensitive, accents stripped (`"Été" < "Fall"`)
/// - accents: the unaccented form first (`"ete" < "été"`)
/// - case: lowercase first, then code point
///
/// `"apple" < "Banana" < "cherry"`. Only identical strings compare equal.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let base = |s: &str| -> Vec<(u8, char)> {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .map(primary_key)
            .collect()
    };
    let accents = |s: &str| -> Vec<char> {
        s.nfd()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect()
    };

    base(a)
        .cmp(&base(b))
        .then_with(|| accents(a).cmp(&accents(b)))
        .then_with(|| a.chars().map(tertiary_key).cmp(b.chars().map(tertiary_key)))
}

fn compare_titles(num_a: u64, title_a: &str, num_b: u64, title_b: &str) -> Ordering {
    if num_a != 0 && num_b != 0 {
        num_a
            .cmp(&num_b)
            .then_with(|| locale_cmp(title_a, title_b))
    } else {
        locale_cmp(title_a, title_b)
    }
}

/// Compare two items within a section.
///
/// When both titles carry a non-zero number the numbers decide; equal
/// numbers fall back to title order. If either number is absent or zero,
/// titles are compared with [`locale_cmp`]. A literal 0 counts as absent.
pub fn compare_items(a: &GalleryItem, b: &GalleryItem) -> Ordering {
    compare_titles(
        leading_number(&a.title),
        &a.title,
        leading_number(&b.title),
        &b.title,
    )
}

/// Sort items in place with [`compare_items`].
///
/// Mixing numeric and lexicographic comparison is not transitive
/// (`"b 2" < "a 10" < "ab" < "b 2"`) and `slice::sort_by` may panic on
/// such input. A stable merge sort always terminates and gives the same
/// output for the same input order. Title numbers are extracted once.
pub fn sort_items(items: &mut Vec<GalleryItem>) {
    let keyed: Vec<(u64, GalleryItem)> = std::mem::take(items)
        .into_iter()
        .map(|item| (leading_number(&item.title), item))
        .collect();

    let mut by_title = |(num_a, a): &(u64, GalleryItem), (num_b, b): &(u64, GalleryItem)| {
        compare_titles(*num_a, &a.title, *num_b, &b.title)
    };
    let sorted = merge_sort_by(keyed, &mut by_title);

    *items = sorted.into_iter().map(|(_, item)| item).collect();
}

/// Stable top-down merge sort. Takes from the right run only when it is
/// strictly less, so equal elements keep their input order.
fn merge_sort_by<T, F>(mut items: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }

    merged
}

/// Sort sections by display name, folder key breaking ties.
pub fn sort_sections(sections: &mut [GallerySection]) {
    sections.sort_by(|a, b| {
        locale_cmp(&a.display_name, &b.display_name).then_with(|| a.folder_key.cmp(&b.folder_key))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use proptest::prelude::*;

    fn item(title: &str) -> GalleryItem {
        GalleryItem {
            id: format!("{title}.jpg"),
            title: title.to_string(),
            description: "Image from Test".to_string(),
            media_path: format!("Test/{title}.jpg"),
            kind: MediaKind::Image,
            video_reference: None,
            category: "Test".to_string(),
        }
    }

    fn section(name: &str, key: &str) -> GallerySection {
        GallerySection {
            display_name: name.to_string(),
            folder_key: key.to_string(),
            items: Vec::new(),
        }
    }

    fn titles(items: &[GalleryItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("Frame 2024"), 2024);
        assert_eq!(leading_number("Sequence 2023-2024"), 2023);
        assert_eq!(leading_number("shot 007 take 2"), 7);
        assert_eq!(leading_number("no digits"), 0);
        assert_eq!(leading_number("Frame 0"), 0);
        assert_eq!(leading_number(""), 0);
        assert_eq!(leading_number("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_numeric_aware_sort() {
        let mut items = vec![item("Frame 2"), item("Frame 10"), item("Frame 1")];
        sort_items(&mut items);
        assert_eq!(titles(&items), ["Frame 1", "Frame 2", "Frame 10"]);
    }

    #[test]
    fn test_named_items_sort_alphabetically() {
        let mut items = vec![item("sunset"), item("Beach"), item("arrival")];
        sort_items(&mut items);
        assert_eq!(titles(&items), ["arrival", "Beach", "sunset"]);
    }

    #[test]
    fn test_zero_is_treated_as_absent() {
        // Numerically 0 < 1; as "absent" the titles decide and T > F.
        assert_eq!(
            compare_items(&item("Take 0"), &item("Frame 1")),
            Ordering::Greater
        );
        assert_eq!(
            compare_items(&item("Take 5"), &item("Frame 10")),
            Ordering::Less
        );

        let mut items = vec![item("Frame 1"), item("Take 0"), item("Frame 2")];
        sort_items(&mut items);
        assert_eq!(titles(&items), ["Frame 1", "Frame 2", "Take 0"]);
    }

    #[test]
    fn test_equal_numbers_fall_back_to_title() {
        let mut items = vec![item("Take 3 b"), item("Take 3 a")];
        sort_items(&mut items);
        assert_eq!(titles(&items), ["Take 3 a", "Take 3 b"]);
    }

    #[test]
    fn test_non_transitive_input_does_not_panic() {
        let mut items = vec![item("b 2"), item("a 10"), item("ab")];
        sort_items(&mut items);
        assert_eq!(items.len(), 3);

        let mut again = vec![item("b 2"), item("a 10"), item("ab")];
        sort_items(&mut again);
        assert_eq!(items, again);
    }

    #[test]
    fn test_section_ordering() {
        let mut sections = vec![
            section("Weddings", "weddings"),
            section("Events", "events"),
            section("3D Work", "3D_work"),
        ];
        sort_sections(&mut sections);
        let names: Vec<_> = sections.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, ["3D Work", "Events", "Weddings"]);
    }

    #[test]
    fn test_section_ties_broken_by_folder_key() {
        let mut sections = vec![section("A B", "a_b"), section("A B", "A_b")];
        sort_sections(&mut sections);
        assert_eq!(sections[0].folder_key, "A_b");
        assert_eq!(sections[1].folder_key, "a_b");
    }

    #[test]
    fn test_locale_cmp_is_case_insensitive_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Banana", "cherry"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("abc", "abc"), Ordering::Equal);
        assert_eq!(locale_cmp("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_folds_accents() {
        assert_eq!(locale_cmp("Été", "Fall"), Ordering::Less);
        assert_eq!(locale_cmp("éclair", "zebra"), Ordering::Less);
        assert_eq!(locale_cmp("Zoë", "Zoe"), Ordering::Greater);
        assert_eq!(locale_cmp("ete", "été"), Ordering::Less);
        assert_eq!(locale_cmp("été", "Ete"), Ordering::Greater);
        // Precomposed and decomposed forms share a base letter
        assert_eq!(locale_cmp("e\u{301}a", "\u{e9}b"), Ordering::Less);
    }

    #[test]
    fn test_accented_sections_sort_with_their_base_letter() {
        let mut sections = vec![
            section("Fall", "fall"),
            section("Été", "été"),
            section("Autumn", "autumn"),
        ];
        sort_sections(&mut sections);
        let names: Vec<_> = sections.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, ["Autumn", "Été", "Fall"]);
    }

    #[test]
    fn test_large_unpadded_frame_set_sorts_quickly() {
        // Walk order is byte order: 1, 10, 100, 1000, 10000, 10001, ...
        let mut names: Vec<String> = (1..=20_000).map(|n| n.to_string()).collect();
        names.sort();
        let mut items: Vec<_> = names.iter().map(|n| item(n)).collect();

        let start = std::time::Instant::now();
        sort_items(&mut items);
        let elapsed = start.elapsed();

        let numbers: Vec<u64> = items.iter().map(|i| leading_number(&i.title)).collect();
        let expected: Vec<u64> = (1..=20_000).collect();
        assert_eq!(numbers, expected);
        assert!(elapsed < std::time::Duration::from_secs(1), "took {:?}", elapsed);
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let mut items = vec![item("Take 3"), item("Take 1"), item("Take 3")];
        items[0].id = "first".to_string();
        items[2].id = "second".to_string();
        sort_items(&mut items);
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["Take 1.jpg", "first", "second"]);
    }

    #[test]
    fn test_locale_cmp_punctuation_then_digits_then_letters() {
        assert_eq!(locale_cmp("_x", "1x"), Ordering::Less);
        assert_eq!(locale_cmp("~x", "1x"), Ordering::Less);
        assert_eq!(locale_cmp("9", "a"), Ordering::Less);
        assert_eq!(locale_cmp("a b", "ab"), Ordering::Less);
    }

    proptest! {
        #[test]
        fn locale_cmp_is_antisymmetric(a in "\\PC{0,12}", b in "\\PC{0,12}") {
            prop_assert_eq!(locale_cmp(&a, &b), locale_cmp(&b, &a).reverse());
        }

        #[test]
        fn locale_cmp_equal_only_for_identical(a in "[a-zA-Z0-9 _]{0,8}", b in "[a-zA-Z0-9 _]{0,8}") {
            prop_assert_eq!(locale_cmp(&a, &b) == Ordering::Equal, a == b);
        }

        #[test]
        fn numbered_frames_sort_numerically(mut nums in proptest::collection::vec(1u32..100_000, 0..30)) {
            let mut items: Vec<_> = nums.iter().map(|n| item(&format!("Frame {n}"))).collect();
            sort_items(&mut items);
            nums.sort_unstable();
            let sorted: Vec<u64> = items.iter().map(|i| leading_number(&i.title)).collect();
            let expected: Vec<u64> = nums.iter().map(|&n| n as u64).collect();
            prop_assert_eq!(sorted, expected);
        }

        #[test]
        fn sort_items_is_a_permutation(titles in proptest::collection::vec("[a-z0-9 ]{0,6}", 0..20)) {
            let mut items: Vec<_> = titles.iter().map(|t| item(t)).collect();
            sort_items(&mut items);
            let mut before = titles.clone();
            let mut after: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }
    }
}
