use bevy::prelude::KeyCode;

/// Converts a human-readable key name from the config files into a `KeyCode`.
///
/// Accepts single letters and digits, `F1` to `F12` and a few named keys. Matching is
/// case-insensitive. Returns `None` for anything else so the caller can pick its default.
pub fn convert(name: &str) -> Option<KeyCode> {
    let name = name.trim().to_ascii_uppercase();

    let key = match name.as_str() {
        "A" => KeyCode::KeyA,
        "B" => KeyCode::KeyB,
        "C" => KeyCode::KeyC,
        "D" => KeyCode::KeyD,
        "E" => KeyCode::KeyE,
        "F" => KeyCode::KeyF,
        "G" => KeyCode::KeyG,
        "H" => KeyCode::KeyH,
        "I" => KeyCode::KeyI,
        "J" => KeyCode::KeyJ,
        "K" => KeyCode::KeyK,
        "L" => KeyCode::KeyL,
        "M" => KeyCode::KeyM,
        "N" => KeyCode::KeyN,
        "O" => KeyCode::KeyO,
        "P" => KeyCode::KeyP,
        "Q" => KeyCode::KeyQ,
        "R" => KeyCode::KeyR,
        "S" => KeyCode::KeyS,
        "T" => KeyCode::KeyT,
        "U" => KeyCode::KeyU,
        "V" => KeyCode::KeyV,
        "W" => KeyCode::KeyW,
        "X" => KeyCode::KeyX,
        "Y" => KeyCode::KeyY,
        "Z" => KeyCode::KeyZ,

        "0" => KeyCode::Digit0,
        "1" => KeyCode::Digit1,
        "2" => KeyCode::Digit2,
        "3" => KeyCode::Digit3,
        "4" => KeyCode::Digit4,
        "5" => KeyCode::Digit5,
        "6" => KeyCode::Digit6,
        "7" => KeyCode::Digit7,
        "8" => KeyCode::Digit8,
        "9" => KeyCode::Digit9,

        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,

        "SPACE" => KeyCode::Space,
        "ESCAPE" | "ESC" => KeyCode::Escape,
        "TAB" => KeyCode::Tab,
        "ENTER" | "RETURN" => KeyCode::Enter,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_letters_and_function_keys() {
        assert_eq!(convert("x"), Some(KeyCode::KeyX));
        assert_eq!(convert(" F12 "), Some(KeyCode::F12));
        assert_eq!(convert("space"), Some(KeyCode::Space));
        assert_eq!(convert("7"), Some(KeyCode::Digit7));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(convert(""), None);
        assert_eq!(convert("F13"), None);
        assert_eq!(convert("LeftStick"), None);
    }
}
