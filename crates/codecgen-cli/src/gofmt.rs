//! Optional formatting through the external `gofmt` tool.

use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Format Go source with `gofmt`, returning the input unchanged if the tool
/// is missing or rejects it.
pub fn format(code: &str) -> String {
    match run_gofmt(code) {
        Ok(formatted) => formatted,
        Err(err) => {
            tracing::warn!("gofmt failed, writing unformatted output: {}", err);
            code.to_string()
        }
    }
}

fn run_gofmt(code: &str) -> io::Result<String> {
    let mut child = Command::new("gofmt")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("gofmt stdin unavailable"))?
        .write_all(code.as_bytes())?;

    let output = child.wait_with_output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(stderr.trim().to_string()));
    }
    String::from_utf8(output.stdout).map_err(io::Error::other)
}
