use super::action::Action;
use super::state::{UiState, clamp_split_ratio};

/// Applies a UI-only action. `Quit` is handled by the event loop.
pub fn apply_action(ui: &mut UiState, action: Action) {
    match action {
        Action::Quit => {}
        Action::ToggleHelp => ui.help_open = !ui.help_open,
        Action::AdjustSplit(delta) => {
            let next = if delta < 0 {
                ui.split_ratio.saturating_sub(delta.unsigned_abs())
            } else {
                ui.split_ratio.saturating_add(delta.unsigned_abs())
            };
            ui.split_ratio = clamp_split_ratio(next);
        }
        Action::ApplyPrefs { theme, no_color } => {
            ui.theme = theme;
            ui.no_color = no_color;
        }
    }
}
