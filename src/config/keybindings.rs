//! Keybinding configuration for the terminal UI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::domain::FeedKind;
use crate::tui::event::Action;

/// Configuration for all keybindings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub next_feed: Vec<String>,
    pub prev_feed: Vec<String>,
    pub open_comments: Vec<String>,
    pub close_dialog: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub search: Vec<String>,
    pub prev_day: Vec<String>,
    pub next_day: Vec<String>,
    pub today: Vec<String>,
    pub cycle_range: Vec<String>,
    pub toggle_sort: Vec<String>,
    pub refresh: Vec<String>,
    pub show_rules: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            next_page: keys(&["n", "PageDown"]),
            prev_page: keys(&["p", "PageUp"]),
            next_feed: keys(&["Tab"]),
            prev_feed: keys(&["BackTab", "Shift+Tab"]),
            open_comments: keys(&["c", "Enter"]),
            close_dialog: keys(&["Esc"]),
            open_in_browser: keys(&["o"]),
            search: keys(&["/"]),
            prev_day: keys(&["h", "Left"]),
            next_day: keys(&["l", "Right"]),
            today: keys(&["t"]),
            cycle_range: keys(&["g"]),
            toggle_sort: keys(&["S"]),
            refresh: keys(&["R"]),
            show_rules: keys(&["?"]),
        }
    }
}

impl KeybindingConfig {
    /// Get the action for a key event.
    ///
    /// Digits `1`-`6` jump straight to a feed tab.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 18] = [
            (&self.quit, Action::Quit),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.next_feed, Action::NextFeed),
            (&self.prev_feed, Action::PrevFeed),
            (&self.open_comments, Action::OpenComments),
            (&self.close_dialog, Action::CloseDialog),
            (&self.open_in_browser, Action::OpenInBrowser),
            (&self.search, Action::Search),
            (&self.prev_day, Action::PrevDay),
            (&self.next_day, Action::NextDay),
            (&self.today, Action::Today),
            (&self.cycle_range, Action::CycleRange),
            (&self.toggle_sort, Action::ToggleSort),
            (&self.refresh, Action::Refresh),
            (&self.show_rules, Action::ShowRules),
        ];

        if let Some((_, action)) = table
            .iter()
            .find(|(bindings, _)| self.matches_key(key, bindings))
        {
            return *action;
        }

        match key.code {
            KeyCode::Char(c @ '1'..='6') if key.modifiers == KeyModifiers::NONE => {
                let idx = c as usize - '1' as usize;
                Action::SelectFeed(FeedKind::ALL[idx])
            }
            _ => Action::None,
        }
    }

    fn matches_key(&self, key: &KeyEvent, bindings: &[String]) -> bool {
        bindings.iter().any(|binding| {
            parse_key_string(binding)
                .map(|parsed| parsed.matches(key))
                .unwrap_or(false)
        })
    }

    /// Every binding string that fails to parse, for startup warnings.
    pub fn invalid_bindings(&self) -> Vec<String> {
        [
            &self.quit,
            &self.move_up,
            &self.move_down,
            &self.next_page,
            &self.prev_page,
            &self.next_feed,
            &self.prev_feed,
            &self.open_comments,
            &self.close_dialog,
            &self.open_in_browser,
            &self.search,
            &self.prev_day,
            &self.next_day,
            &self.today,
            &self.cycle_range,
            &self.toggle_sort,
            &self.refresh,
            &self.show_rules,
        ]
        .iter()
        .flat_map(|bindings| bindings.iter())
        .filter(|binding| parse_key_string(binding).is_err())
        .cloned()
        .collect()
    }
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Check if this binding matches a key event.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse a key string into a KeyBinding.
///
/// Supported formats:
/// - Single characters: "a", "A", "1", "/"
/// - Special keys: "Enter", "Tab", "BackTab", "Backspace", "Delete", "Home", "End",
///   "PageUp", "PageDown", "Up", "Down", "Left", "Right", "Esc", "Space", "F1"-"F12"
/// - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter", "Ctrl+Shift+a"
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let parts: Vec<&str> = s.split('+').collect();

    let mut modifiers = KeyModifiers::NONE;
    let key_part = if parts.len() > 1 {
        // Parse modifiers
        for part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" => modifiers |= KeyModifiers::ALT,
                _ => return Err(format!("Unknown modifier: {}", part)),
            }
        }
        parts[parts.len() - 1]
    } else {
        s
    };

    let code = parse_key_code(key_part)?;

    Ok(KeyBinding { code, modifiers })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    // Check for special keys (case-insensitive)
    match s.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        "f1" => Ok(KeyCode::F(1)),
        "f2" => Ok(KeyCode::F(2)),
        "f3" => Ok(KeyCode::F(3)),
        "f4" => Ok(KeyCode::F(4)),
        "f5" => Ok(KeyCode::F(5)),
        "f6" => Ok(KeyCode::F(6)),
        "f7" => Ok(KeyCode::F(7)),
        "f8" => Ok(KeyCode::F(8)),
        "f9" => Ok(KeyCode::F(9)),
        "f10" => Ok(KeyCode::F(10)),
        "f11" => Ok(KeyCode::F(11)),
        "f12" => Ok(KeyCode::F(12)),
        _ => Err(format!("Unknown key: {}", s)),
    }
}
