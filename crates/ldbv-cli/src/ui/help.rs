pub fn help_lines() -> &'static [&'static str] {
    &[
        "Keys",
        "Up/Down move | PgUp/PgDn page | Home first page",
        "Enter show value | Esc/Backspace back to keys",
        "Ctrl+S search: type a key prefix, Enter to apply",
        "Empty search lists all keys",
        "Settings in the search box:",
        "  $key=text|hex",
        "  $val=text|hex|number|binary",
        "  $max=<keys per page>",
        "[ ] or Ctrl+Left/Right resize panes",
        "? or F1 help | q, Ctrl+Q, Ctrl+C quit",
    ]
}

pub fn help_text() -> String {
    help_lines().join("\n")
}
