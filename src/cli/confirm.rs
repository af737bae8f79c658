/// Interactive confirmation before destructive work
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Literal the operator has to type
pub const CONFIRMATION_WORD: &str = "YES";

/// Show the target and an SSD warning, then read one line.
///
/// Returns true only for the exact confirmation word (surrounding
/// whitespace ignored). EOF counts as "no".
pub fn confirm<R: BufRead, W: Write>(target: &Path, input: &mut R, output: &mut W) -> io::Result<bool> {
    writeln!(output, "[!] target: {}", target.display())?;
    writeln!(output, "[!] Destructive operation. On SSD/NVMe this is best-effort only.")?;
    write!(output, "Type \"{}\" to continue: ", CONFIRMATION_WORD)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(line.trim() == CONFIRMATION_WORD)
}
