//! Decoding of the path list delivered with a file-drop notification.
//!
//! The payload is zero or more paths separated by `\n` or NUL. Any path may be
//! wrapped in double quotes so that it can carry separators or quotes; inside a
//! quoted span `""` stands for one literal quote and `\n` is ordinary content.
//! NUL splits even inside quotes: the native side uses it as a hard record
//! terminator.

const QUOTE: char = '"';
const LINE_FEED: char = '\n';
const NUL: char = '\0';

/// Split a drop payload into its paths, in order of appearance.
///
/// Empty entries are dropped, so a payload made only of separators yields an
/// empty list.
pub fn decode(text: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE => {
                if quoted && chars.peek() == Some(&QUOTE) {
                    chars.next();
                    current.push(QUOTE);
                } else {
                    quoted = !quoted;
                }
            }
            LINE_FEED if quoted => current.push(c),
            LINE_FEED | NUL => flush(&mut current, &mut paths),
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut paths);

    paths
}

/// Build a payload that [`decode`] turns back into `paths`.
///
/// Each path is quoted with inner quotes doubled, and entries are joined with
/// NUL. Paths containing NUL cannot be represented.
pub fn encode<S: AsRef<str>>(paths: &[S]) -> String {
    paths
        .iter()
        .map(|path| format!("\"{}\"", path.as_ref().replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join("\0")
}

fn flush(current: &mut String, paths: &mut Vec<String>) {
    if !current.is_empty() {
        paths.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};

    #[test]
    fn nul_separated_paths_split_in_order() {
        assert_eq!(decode("a.txt\0b.txt"), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn line_feed_separates_outside_quotes() {
        assert_eq!(
            decode("C:\\one.png\nC:\\two.png\n"),
            vec!["C:\\one.png", "C:\\two.png"]
        );
    }

    #[test]
    fn doubled_quote_inside_quotes_is_a_literal_quote() {
        assert_eq!(decode("\"a\"\"b\".txt"), vec!["a\"b.txt"]);
    }

    #[test]
    fn line_feed_inside_quotes_is_content() {
        assert_eq!(
            decode("\"odd\nname.txt\"\nnext.txt"),
            vec!["odd\nname.txt", "next.txt"]
        );
    }

    #[test]
    fn nul_splits_even_inside_an_open_quote() {
        // The quote stays open across the split, so the line feed after the
        // NUL is still treated as content.
        assert_eq!(decode("\"left\0right\nmore\""), vec!["left", "right\nmore"]);
    }

    #[test]
    fn empty_and_separator_only_payloads_yield_nothing() {
        assert!(decode("").is_empty());
        assert!(decode("\0\0\0").is_empty());
        assert!(decode("\n\0\n").is_empty());
        assert!(decode("\"\"\0\"\"").is_empty());
    }

    #[test]
    fn every_short_payload_survives_a_reencode() {
        const ALPHABET: [char; 4] = ['a', '"', '\n', '\0'];

        for len in 0..=8u32 {
            for mut n in 0..ALPHABET.len().pow(len) {
                let mut sample = String::new();
                for _ in 0..len {
                    sample.push(ALPHABET[n % ALPHABET.len()]);
                    n /= ALPHABET.len();
                }
                let decoded = decode(&sample);
                assert_eq!(decode(&encode(&decoded)), decoded, "sample {sample:?}");
            }
        }
    }

    #[test]
    fn encode_quotes_and_doubles() {
        assert_eq!(encode(&["a\"b", "c"]), "\"a\"\"b\"\0\"c\"");
    }
}
