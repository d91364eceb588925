use ratatui::style::{Color, Modifier, Style};

use crate::app::ThemeChoice;

#[derive(Debug, Clone)]
pub struct ThemeTokens {
    pub top_bar: Style,
    pub status_ok: Style,
    pub status_error: Style,
    pub pane_border: Style,
    pub pane_focus: Style,
    pub highlight: Style,
    pub placeholder: Style,
    pub help: Style,
    pub plain: Style,
}

pub fn build_theme(choice: ThemeChoice, no_color: bool) -> ThemeTokens {
    if no_color {
        return monochrome_theme();
    }

    match choice {
        ThemeChoice::Default => default_theme(),
        ThemeChoice::HighContrast => high_contrast_theme(),
    }
}

fn default_theme() -> ThemeTokens {
    ThemeTokens {
        top_bar: Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        status_ok: Style::default().fg(Color::Green),
        status_error: Style::default().fg(Color::Red),
        pane_border: Style::default().fg(Color::DarkGray),
        pane_focus: Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD),
        highlight: Style::default()
            .fg(Color::Black)
            .bg(Color::LightBlue),
        placeholder: Style::default().fg(Color::DarkGray),
        help: Style::default().fg(Color::White),
        plain: Style::default().fg(Color::White),
    }
}

fn high_contrast_theme() -> ThemeTokens {
    ThemeTokens {
        top_bar: Style::default()
            .fg(Color::White)
            .bg(Color::Black)
            .add_modifier(Modifier::BOLD),
        status_ok: Style::default().fg(Color::Green).bg(Color::Black),
        status_error: Style::default().fg(Color::Red).bg(Color::Black),
        pane_border: Style::default().fg(Color::White),
        pane_focus: Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        highlight: Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        placeholder: Style::default().fg(Color::Gray),
        help: Style::default().fg(Color::White).bg(Color::Black),
        plain: Style::default().fg(Color::White),
    }
}

fn monochrome_theme() -> ThemeTokens {
    let base = Style::default();
    ThemeTokens {
        top_bar: base.add_modifier(Modifier::BOLD),
        status_ok: base,
        status_error: base.add_modifier(Modifier::BOLD),
        pane_border: base,
        pane_focus: base.add_modifier(Modifier::BOLD),
        highlight: base.add_modifier(Modifier::REVERSED),
        placeholder: base.add_modifier(Modifier::DIM),
        help: base,
        plain: base,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};

    use crate::app::ThemeChoice;

    use super::build_theme;

    #[test]
    fn no_color_theme_reverses_highlight() {
        let theme = build_theme(ThemeChoice::Default, true);
        assert!(theme.highlight.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(theme.highlight.bg, None);
    }

    #[test]
    fn high_contrast_theme_sets_bg_and_focus() {
        let theme = build_theme(ThemeChoice::HighContrast, false);
        assert_eq!(theme.top_bar.bg, Some(Color::Black));
        assert_eq!(theme.status_error.bg, Some(Color::Black));
        assert!(theme.pane_focus.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn no_color_overrides_selected_theme() {
        let theme = build_theme(ThemeChoice::HighContrast, true);
        assert_eq!(theme.plain.fg, None);
        assert!(theme.top_bar.add_modifier.contains(Modifier::BOLD));
    }
}
