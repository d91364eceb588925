use std::borrow::Cow;

pub fn truncate_middle<'a>(value: &'a str, max_chars: usize) -> Cow<'a, str> {
    if value.chars().count() <= max_chars {
        return Cow::Borrowed(value);
    }

    if max_chars <= 3 {
        return Cow::Owned("...".chars().take(max_chars).collect());
    }

    let keep = max_chars - 3;
    let left = keep / 2;
    let right = keep - left;
    let start: String = value.chars().take(left).collect();
    let total = value.chars().count();
    let end: String = value.chars().skip(total - right).collect();
    Cow::Owned(format!("{start}...{end}"))
}

pub fn compose_status(left: &str, right: &str, width: usize) -> String {
    let left_chars = left.chars().count();
    let right_chars = right.chars().count();

    if right.is_empty() || left_chars + 1 + right_chars >= width {
        return left.to_string();
    }

    let spaces = width.saturating_sub(left_chars + right_chars);
    format!("{left}{}{}", " ".repeat(spaces), right)
}

pub fn list_title(page: usize) -> String {
    format!(" Keys - page: {page} ")
}

pub fn search_title(error: Option<&str>) -> String {
    match error {
        Some(err) => format!(" Search: {err} "),
        None => " Search ".into(),
    }
}
