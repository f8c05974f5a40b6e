use crate::compdb::CompdbError;

/// Split a shell-quoted `command` string into argument tokens.
///
/// Handles the POSIX quoting forms that appear in real compilation
/// databases: single quotes (literal), double quotes (backslash escapes
/// the next character), and bare backslash escapes. An unterminated quote
/// means the entry was written by something broken, so it is rejected
/// rather than guessed at.
pub fn split_command(input: &str) -> Result<Vec<String>, CompdbError> {
    let mut out: Vec<String> = Vec::new();
    let mut cur = String::new();
    // Distinguishes "no token in progress" from an empty quoted token ('').
    let mut pending = false;
    let mut chars = input.chars();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                cur.push(ch);
            }
            continue;
        }
        if in_double {
            match ch {
                '"' => in_double = false,
                '\\' => {
                    if let Some(next) = chars.next() {
                        cur.push(next);
                    }
                }
                _ => cur.push(ch),
            }
            continue;
        }
        match ch {
            '\'' => {
                in_single = true;
                pending = true;
            }
            '"' => {
                in_double = true;
                pending = true;
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    cur.push(next);
                    pending = true;
                }
            }
            c if c.is_whitespace() => {
                if pending {
                    out.push(std::mem::take(&mut cur));
                    pending = false;
                }
            }
            _ => {
                cur.push(ch);
                pending = true;
            }
        }
    }

    if in_single || in_double {
        return Err(CompdbError::MalformedEntry(
            "unterminated quote in 'command' string".to_string(),
        ));
    }
    if pending {
        out.push(cur);
    }
    Ok(out)
}
