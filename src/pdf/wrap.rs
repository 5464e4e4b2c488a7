use crate::fonts::FontEntry;

/// Greedy word wrap over one string. Lines are produced on demand; nothing is
/// kept between strings, so a fresh iterator is built per field.
///
/// Each `\n`-separated paragraph is wrapped on its own and blank paragraphs
/// yield no line. Within a paragraph words are separated by any whitespace
/// and re-joined with single spaces. A word wider than `max_width` starts its
/// own line; with `split_long_words` it is additionally cut at character
/// boundaries into chunks that fit.
pub(super) struct WrappedLines<'a> {
    paragraphs: std::str::Split<'a, char>,
    words: std::str::SplitWhitespace<'a>,
    pending: Option<&'a str>,
    font: &'a FontEntry,
    font_size: f32,
    max_width: f32,
    split_long_words: bool,
}

pub(super) fn wrap_text<'a>(
    text: &'a str,
    font: &'a FontEntry,
    font_size: f32,
    max_width: f32,
    split_long_words: bool,
) -> WrappedLines<'a> {
    WrappedLines {
        paragraphs: text.split('\n'),
        words: "".split_whitespace(),
        pending: None,
        font,
        font_size,
        max_width,
        split_long_words,
    }
}

impl<'a> WrappedLines<'a> {
    /// Byte index splitting `word` into the longest prefix that fits, never
    /// less than one character.
    fn fitting_prefix(&self, word: &str) -> usize {
        let mut width = 0.0;
        for (idx, ch) in word.char_indices() {
            width += self.font.char_width_1000(ch) * self.font_size / 1000.0;
            if width > self.max_width {
                return if idx == 0 { ch.len_utf8() } else { idx };
            }
        }
        word.len()
    }

    /// Next line of the current paragraph, `None` once it is used up.
    fn next_in_paragraph(&mut self) -> Option<String> {
        let space_w = self.font.space_width(self.font_size);
        let mut line = String::new();
        let mut line_w = 0.0f32;

        while let Some(word) = self.pending.take().or_else(|| self.words.next()) {
            let ww = self.font.text_width(word, self.font_size);

            if line.is_empty() {
                if ww <= self.max_width || !self.split_long_words {
                    line.push_str(word);
                    line_w = ww;
                    continue;
                }
                let cut = self.fitting_prefix(word);
                if cut < word.len() {
                    self.pending = Some(&word[cut..]);
                }
                return Some(word[..cut].to_string());
            }

            let proposed = line_w + space_w + ww;
            if proposed <= self.max_width {
                line.push(' ');
                line.push_str(word);
                line_w = proposed;
            } else {
                self.pending = Some(word);
                break;
            }
        }

        if line.is_empty() { None } else { Some(line) }
    }
}

impl Iterator for WrappedLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.next_in_paragraph() {
                return Some(line);
            }
            self.words = self.paragraphs.next()?.split_whitespace();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str, max_width: f32, split: bool) -> Vec<String> {
        let font = FontEntry::builtin(false);
        wrap_text(text, &font, 12.0, max_width, split).collect()
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(lines("Title: X", 468.0, true), ["Title: X"]);
    }

    #[test]
    fn empty_and_blank_text_yield_nothing() {
        assert!(lines("", 100.0, true).is_empty());
        assert!(lines("  \n\t ", 100.0, true).is_empty());
    }

    #[test]
    fn whitespace_runs_collapse_within_a_paragraph() {
        assert_eq!(lines("a \t b   c\r", 468.0, true), ["a b c"]);
    }

    #[test]
    fn newlines_start_new_lines_and_blank_ones_vanish() {
        assert_eq!(lines("a\n\nb   c", 468.0, true), ["a", "b c"]);
        assert_eq!(
            lines("Description: Links\nhttps://a.example\r\nhttps://b.example\n", 468.0, true),
            ["Description: Links", "https://a.example", "https://b.example"]
        );
        assert!(lines("\n \n\n", 468.0, true).is_empty());
    }

    #[test]
    fn long_paragraphs_wrap_independently() {
        let text = format!("{}\n{}", "one ".repeat(60), "two ".repeat(60));
        let out = lines(&text, 200.0, true);
        let first_two = out.iter().position(|l| l.starts_with("two")).unwrap();
        assert!(out[..first_two].iter().all(|l| !l.contains("two")));
        assert!(out[first_two..].iter().all(|l| !l.contains("one")));
    }

    #[test]
    fn upper_half_winansi_is_measured_at_full_width() {
        let font = FontEntry::builtin(false);
        // Em dash is 1000/1000: 12pt each, 39 per 468pt line.
        let dashes = "\u{2014}".repeat(200);
        let out: Vec<String> = wrap_text(&dashes, &font, 12.0, 468.0, true).collect();
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|l| l.chars().count() <= 39));
        assert_eq!(out.concat(), dashes);

        let text = "Caf\u{00E9} \u{2026} na\u{00EF}ve \u{00C6}sir \u{2122} \u{2030} \u{0152}uvre ".repeat(30);
        for l in wrap_text(&text, &font, 12.0, 300.0, true) {
            assert!(font.text_width(&l, 12.0) <= 300.0, "{l:?}");
        }
    }

    #[test]
    fn lines_never_exceed_budget() {
        let font = FontEntry::builtin(false);
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        for max in [50.0, 120.0, 333.3, 468.0] {
            let out: Vec<String> = wrap_text(&text, &font, 12.0, max, true).collect();
            assert!(out.len() > 1);
            for l in &out {
                assert!(font.text_width(l, 12.0) <= max, "{l:?} wider than {max}");
            }
            // No word lost or reordered.
            assert_eq!(
                out.join(" ").split_whitespace().collect::<Vec<_>>(),
                text.split_whitespace().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn greedy_fill() {
        // "aaaa" = 4 * 6.672 = 26.688; with a space (3.336) two words need 56.712.
        assert_eq!(lines("aaaa aaaa aaaa", 56.8, true), ["aaaa aaaa", "aaaa"]);
        assert_eq!(lines("aaaa aaaa aaaa", 56.7, true), ["aaaa", "aaaa", "aaaa"]);
    }

    #[test]
    fn overlong_word_keeps_own_line_without_splitting() {
        let out = lines("a bbbbbbbbbbbbbbbbbbbb c", 30.0, false);
        assert_eq!(out, ["a", "bbbbbbbbbbbbbbbbbbbb", "c"]);
    }

    #[test]
    fn overlong_word_is_cut_into_fitting_chunks() {
        let font = FontEntry::builtin(false);
        let word = "a".repeat(10_000);
        let max = 468.0;
        let out: Vec<String> = wrap_text(&word, &font, 12.0, max, true).collect();
        let total_w = font.text_width(&word, 12.0);
        assert_eq!(out.len(), (total_w / max).ceil() as usize);
        assert_eq!(out.concat(), word);
        assert!(out.iter().all(|l| font.text_width(l, 12.0) <= max));
    }

    #[test]
    fn single_char_wider_than_budget_still_progresses() {
        assert_eq!(lines("WW", 1.0, true), ["W", "W"]);
    }

    #[test]
    fn restartable_and_deterministic() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let a = lines(text, 80.0, true);
        let b = lines(text, 80.0, true);
        assert_eq!(a, b);
    }
}
