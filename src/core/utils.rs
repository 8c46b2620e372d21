use std::cmp::Ordering;

use wana_kana::utils::is_char_katakana;

/// Case-insensitive substring match on the query as given. Only the empty query
/// matches everything.
pub fn text_matches_search(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    text.to_lowercase().contains(&query.to_lowercase())
}

pub trait FoldKana {
    fn fold_kana(&self) -> String;
}

//カタカナ -> かたかな, leaves everything else alone
impl FoldKana for str {
    fn fold_kana(&self) -> String {
        self.chars()
            .map(|c| {
                if is_char_katakana(c) && ('ァ'..='ヶ').contains(&c) {
                    char::from_u32(c as u32 - 0x60).unwrap_or(c)
                } else {
                    c
                }
            })
            .collect()
    }
}

impl FoldKana for String {
    fn fold_kana(&self) -> String {
        self.as_str().fold_kana()
    }
}

/// Dictionary-style ordering: case and kana script are ignored first, the raw
/// text breaks ties so the order is total.
pub fn collate(left: &str, right: &str) -> Ordering {
    let left_key = left.to_lowercase().fold_kana();
    let right_key = right.to_lowercase().fold_kana();
    left_key.cmp(&right_key).then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matches_search() {
        assert!(text_matches_search("neko", "NEKO"));
        assert!(text_matches_search("The cat is sleeping", "cat"));
        assert!(text_matches_search("anything", ""));
        assert!(!text_matches_search("anything", "   "));
        assert!(!text_matches_search("neko", " neko"));
        assert!(text_matches_search("cat food", "T F"));
        assert!(!text_matches_search("inu", "neko"));
        assert!(text_matches_search("猫はベッドで寝ています", "ベッド"));
    }

    #[test]
    fn test_fold_kana() {
        assert_eq!("ネコ".fold_kana(), "ねこ");
        assert_eq!("ネコ猫neko".fold_kana(), "ねこ猫neko");
        assert_eq!("ラーメン".fold_kana(), "らーめん");
    }

    #[test]
    fn test_collate_ignores_case_and_kana_script() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Banana", "apple"), Ordering::Greater);
        assert_eq!(collate("ネコ", "いぬ"), Ordering::Greater);
        assert_eq!(collate("ねこ", "ネコ"), Ordering::Less);
        assert_eq!(collate("ネコ", "のり"), Ordering::Less);
        assert_eq!(collate("neko", "neko"), Ordering::Equal);
    }
}
