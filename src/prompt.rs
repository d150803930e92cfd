use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Interpret the usual boolean spellings: `y`/`yes`/`t`/`true`/`on`/`1`
/// and `n`/`no`/`f`/`false`/`off`/`0`, case-insensitive. Anything else is
/// `None`.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Ask a yes/no question on stdout and read the answer from stdin,
/// re-asking until the answer is recognizable. EOF counts as a decline.
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{} [y/n]: ", question);
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match parse_yes_no(&line) {
            Some(answer) => return Ok(answer),
            None => println!("Please use y/n or yes/no.\n"),
        }
    }
}

/// Prompt for a password without echoing it back.
pub fn read_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}
