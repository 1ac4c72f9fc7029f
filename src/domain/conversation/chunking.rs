//! Splitting long outbound text into transport-sized messages.

/// Largest message, in characters, sent in one piece.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Splits `text` into ordered chunks of at most `max_chars` characters.
///
/// Splits fall on character boundaries, so multi-byte characters are never
/// cut. Concatenating the chunks yields `text` again. Empty text yields no
/// chunks.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_message("hello", MAX_MESSAGE_CHARS), vec!["hello"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(split_message("", MAX_MESSAGE_CHARS).is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let text = "a".repeat(8000);
        let chunks = split_message(&text, MAX_MESSAGE_CHARS);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() == 4000));
    }

    #[test]
    fn long_ai_reply_is_split_in_order() {
        let text: String = (0..9001).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = split_message(&text, MAX_MESSAGE_CHARS);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].chars().count(), 1001);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn multibyte_characters_are_not_cut() {
        let text = "ñ".repeat(4001);
        let chunks = split_message(&text, MAX_MESSAGE_CHARS);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "ñ");
    }

    proptest! {
        #[test]
        fn chunks_reconstitute_text(text in "\\PC{0,300}", max in 1usize..50) {
            let chunks = split_message(&text, max);

            prop_assert_eq!(chunks.concat(), text.clone());
            for chunk in &chunks {
                let n = chunk.chars().count();
                prop_assert!(n >= 1 && n <= max);
            }
            let expected = (text.chars().count() + max - 1) / max;
            prop_assert_eq!(chunks.len(), expected);
        }
    }
}
