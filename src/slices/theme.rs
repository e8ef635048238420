use serde::Serialize;

use crate::engine::Mirror;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Toggle,
    Set(bool),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub dark_mode: bool,
}

impl ThemeState {
    pub const STORAGE_KEY: &'static str = "darkMode";

    pub fn rehydrate(mirror: &Mirror) -> Self {
        Self {
            dark_mode: mirror.load(Self::STORAGE_KEY, false),
        }
    }

    pub fn apply(&mut self, action: &ThemeAction) {
        self.dark_mode = match *action {
            ThemeAction::Toggle => !self.dark_mode,
            ThemeAction::Set(v) => v,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_set() {
        let mut theme = ThemeState::default();
        theme.apply(&ThemeAction::Toggle);
        assert!(theme.dark_mode);
        theme.apply(&ThemeAction::Set(false));
        assert!(!theme.dark_mode);
    }

    #[test]
    fn test_rehydrate_falls_back_on_garbage() {
        let mirror = Mirror::in_memory();
        mirror.save(ThemeState::STORAGE_KEY, "yes please");
        assert!(!ThemeState::rehydrate(&mirror).dark_mode);

        mirror.save(ThemeState::STORAGE_KEY, &true);
        assert!(ThemeState::rehydrate(&mirror).dark_mode);
    }
}
