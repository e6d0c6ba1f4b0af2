//! Parsing of dropped or typed file paths
//!
//! Terminals hand a file drop to the application as pasted text. Depending on
//! the emulator that text is one path per line, shell-quoted paths separated
//! by spaces, backslash-escaped paths, or `file://` URIs.

use std::path::PathBuf;

/// Split pasted text into the paths it names
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use tgdrive::logic::paths::parse_dropped_paths;
///
/// assert_eq!(
///     parse_dropped_paths("'/tmp/my file.txt' /tmp/b.bin"),
///     vec![PathBuf::from("/tmp/my file.txt"), PathBuf::from("/tmp/b.bin")]
/// );
/// assert_eq!(
///     parse_dropped_paths("file:///tmp/with%20space.png\n"),
///     vec![PathBuf::from("/tmp/with space.png")]
/// );
/// ```
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .flat_map(split_line)
        .filter_map(|token| to_path(&token))
        .collect()
}

/// Shell-style word splitting: quotes group, backslash escapes one char
fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                        in_token = true;
                    }
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}

fn to_path(token: &str) -> Option<PathBuf> {
    if token.is_empty() {
        return None;
    }

    let Some(rest) = token.strip_prefix("file://") else {
        return Some(PathBuf::from(token));
    };
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    if rest.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(rest)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| rest.to_string());
    Some(PathBuf::from(decoded))
}
