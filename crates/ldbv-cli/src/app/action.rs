use super::state::ThemeChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    AdjustSplit(i16),
    ApplyPrefs { theme: ThemeChoice, no_color: bool },
}
