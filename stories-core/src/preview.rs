/// Сколько символов контента показывается в карточке.
pub const PREVIEW_THRESHOLD: usize = 150;

const ELLIPSIS: &str = "...";

/// Обрезает контент до `max_chars` символов и добавляет `...`.
///
/// Контент не длиннее порога возвращается без изменений. Длина считается в
/// символах, а не в байтах.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        None => content.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &content[..cut]),
    }
}

/// Нужна ли кнопка `Read More`.
pub fn needs_read_more(content: &str, max_chars: usize) -> bool {
    content.chars().nth(max_chars).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_content_is_cut_with_ellipsis() {
        let content = "x".repeat(200);
        let preview = truncate_content(&content, PREVIEW_THRESHOLD);
        assert_eq!(preview.chars().count(), 153);
        assert!(preview.ends_with("..."));
        assert!(needs_read_more(&content, PREVIEW_THRESHOLD));
    }

    #[test]
    fn content_at_threshold_is_unchanged() {
        let content = "y".repeat(PREVIEW_THRESHOLD);
        assert_eq!(truncate_content(&content, PREVIEW_THRESHOLD), content);
        assert!(!needs_read_more(&content, PREVIEW_THRESHOLD));
    }

    #[test]
    fn short_content_is_unchanged() {
        assert_eq!(truncate_content("short", PREVIEW_THRESHOLD), "short");
        assert_eq!(truncate_content("", PREVIEW_THRESHOLD), "");
    }

    #[test]
    fn multibyte_content_is_cut_on_char_boundary() {
        let content = "ж".repeat(151);
        let preview = truncate_content(&content, PREVIEW_THRESHOLD);
        assert_eq!(preview, format!("{}...", "ж".repeat(150)));
    }
}
