use crate::memory::layout::ui_settings;
use crate::memory::{Record, field};

/// The UI settings block at the `ui_settings` anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiSettingsRecord {
    pub game_menu_open: u8,
}

impl UiSettingsRecord {
    pub fn is_game_menu_open(&self) -> bool {
        self.game_menu_open == 1
    }
}

impl Record for UiSettingsRecord {
    const SIZE: usize = ui_settings::SIZE;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            game_menu_open: bytes[ui_settings::GAME_MENU_OPEN],
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; Self::SIZE];
        field::put(&mut buffer, ui_settings::GAME_MENU_OPEN, &[self.game_menu_open]);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_flag_offset() {
        let record = UiSettingsRecord::from_bytes(&[0, 1, 0, 0, 0, 0, 0, 0]).unwrap();
        assert!(record.is_game_menu_open());

        let record = UiSettingsRecord::from_bytes(&[1, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert!(!record.is_game_menu_open());
    }

    #[test]
    fn test_menu_flag_only_one_means_open() {
        assert!(!UiSettingsRecord { game_menu_open: 2 }.is_game_menu_open());
    }
}
