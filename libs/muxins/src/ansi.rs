//! Minecraft `§` formatting codes.

/// The ANSI SGR parameter for a formatting code
fn sgr(code: char) -> Option<&'static str> {
    Some(match code.to_ascii_lowercase() {
        '0' => "30",
        '1' => "34",
        '2' => "32",
        '3' => "36",
        '4' => "31",
        '5' => "35",
        '6' => "33",
        '7' => "37",
        '8' => "90",
        '9' => "94",
        'a' => "92",
        'b' => "96",
        'c' => "91",
        'd' => "95",
        'e' => "93",
        'f' => "97",
        'k' => "5",
        'l' => "1",
        'm' => "9",
        'n' => "4",
        'o' => "3",
        'r' => "0",
        _ => return None
    })
}

/// Replace formatting codes with ANSI escapes, resetting at the end.
///
/// Unknown codes are left alone.
pub fn render(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 16);
    let mut styled = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '§' {
            if let Some(param) = chars.peek().cloned().and_then(sgr) {
                chars.next();
                result.push_str("\x1b[");
                result.push_str(param);
                result.push('m');
                styled = true;
                continue;
            }
        }
        result.push(c);
    }
    if styled {
        result.push_str("\x1b[0m");
    }
    result
}

/// Remove formatting codes, for sinks that can't display them
pub fn strip(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '§' && chars.peek().cloned().and_then(sgr).is_some() {
            chars.next();
            continue;
        }
        result.push(c);
    }
    result
}
