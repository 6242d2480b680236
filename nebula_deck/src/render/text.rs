use super::font::Font;

/// Suffix appended to clamped text
pub const ELLIPSIS: &str = "...";

/// Width measurement for a drawing surface
pub trait TextMeasurer {
    /// Width of `text` in logical pixels when drawn with `font`
    fn measure_text(&self, text: &str, font: &Font) -> f32;
}

/// Shorten `text` so it fits in `max_width`.
///
/// Text that already fits is returned unchanged. Otherwise the longest
/// prefix whose `prefix + "..."` fits is found by binary search; when not
/// even the empty prefix fits, the bare ellipsis is returned.
pub fn clamp_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: &Font,
    max_width: f32,
) -> String {
    if text.is_empty() {
        return String::new();
    }
    if measurer.measure_text(text, font) <= max_width {
        return text.to_string();
    }

    // Byte offset where each char starts; prefix of n chars is text[..starts[n]]
    let starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let mut left = 0;
    let mut right = starts.len();
    let mut result = ELLIPSIS.to_string();
    while left < right {
        let mid = (left + right) / 2;
        let candidate = format!("{}{}", &text[..starts[mid]], ELLIPSIS);
        if measurer.measure_text(&candidate, font) <= max_width {
            result = candidate;
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every char is 10px wide, regardless of font
    struct FixedWidth;

    impl TextMeasurer for FixedWidth {
        fn measure_text(&self, text: &str, _font: &Font) -> f32 {
            text.chars().count() as f32 * 10.0
        }
    }

    const FONT: Font = Font::regular(13.0);

    #[test]
    fn test_fitting_text_is_unchanged() {
        assert_eq!(clamp_text(&FixedWidth, "Pilot", &FONT, 50.0), "Pilot");
    }

    #[test]
    fn test_empty_text_stays_empty() {
        assert_eq!(clamp_text(&FixedWidth, "", &FONT, 0.0), "");
    }

    #[test]
    fn test_long_text_gets_longest_prefix() {
        // 100px fits 10 chars: 7 prefix chars + "..."
        let clamped = clamp_text(&FixedWidth, "Interstellar Dragon", &FONT, 100.0);
        assert_eq!(clamped, "Interst...");
    }

    #[test]
    fn test_result_never_exceeds_width() {
        let text = "A rather long card name that will not fit";
        for width in [0.0, 5.0, 30.0, 31.0, 99.0, 150.0, 399.0] {
            let clamped = clamp_text(&FixedWidth, text, &FONT, width);
            let fits = FixedWidth.measure_text(&clamped, &FONT) <= width;
            assert!(fits || clamped == ELLIPSIS, "width {width}: {clamped}");
            assert!(clamped.ends_with(ELLIPSIS));
        }
    }

    #[test]
    fn test_bare_ellipsis_when_nothing_fits() {
        assert_eq!(clamp_text(&FixedWidth, "Long name", &FONT, 20.0), "...");
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let once = clamp_text(&FixedWidth, "Interstellar Dragon", &FONT, 100.0);
        let twice = clamp_text(&FixedWidth, &once, &FONT, 100.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_multibyte_prefixes_split_on_char_boundaries() {
        let clamped = clamp_text(&FixedWidth, "ドラゴンパイロット", &FONT, 60.0);
        assert_eq!(clamped, "ドラゴ...");
    }
}
