#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Default,
    HighContrast,
}

#[derive(Debug, Clone)]
pub struct UiState {
    /// Width of the key list as a percentage of the body.
    pub split_ratio: u16,
    pub help_open: bool,
    pub theme: ThemeChoice,
    pub no_color: bool,
}

pub const MIN_SPLIT_RATIO: u16 = 20;
pub const MAX_SPLIT_RATIO: u16 = 80;
pub const DEFAULT_SPLIT_RATIO: u16 = 40;
pub const SPLIT_STEP: i16 = 5;

impl Default for UiState {
    fn default() -> Self {
        Self {
            split_ratio: DEFAULT_SPLIT_RATIO,
            help_open: false,
            theme: ThemeChoice::Default,
            no_color: false,
        }
    }
}

pub fn clamp_split_ratio(ratio: u16) -> u16 {
    ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
}
