use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// Sends one JSON request and returns the raw response body.
pub trait Transport {
    fn post_json(&self, url: &str, api_key: &str, body: &str) -> Result<String>;
}

/// Shells out to `curl`. Request options travel over stdin as a curl config
/// so the key never shows up in the process list.
#[derive(Clone, Debug)]
pub struct CurlTransport {
    program: String,
    timeout_seconds: u32,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            program: "curl".to_owned(),
            timeout_seconds: 90,
        }
    }
}

impl CurlTransport {
    pub fn new(program: impl Into<String>, timeout_seconds: u32) -> Self {
        Self {
            program: program.into(),
            timeout_seconds,
        }
    }
}

impl Transport for CurlTransport {
    fn post_json(&self, url: &str, api_key: &str, body: &str) -> Result<String> {
        let timeout = self.timeout_seconds.to_string();
        let args = [
            "--silent",
            "--show-error",
            "--fail-with-body",
            "--max-time",
            timeout.as_str(),
            "--config",
            "-",
        ];
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {} with args: {args:?}", self.program))?;

        let config = curl_config(url, api_key, body);
        child
            .stdin
            .take()
            .context("curl stdin was not captured")?
            .write_all(config.as_bytes())
            .context("failed to send request to curl")?;

        let output = child
            .wait_with_output()
            .context("failed to wait for curl")?;
        let stdout = String::from_utf8(output.stdout).context("response was not valid UTF-8")?;
        if output.status.success() {
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(anyhow!(
                "request to {url} failed ({}): {} {}",
                output.status,
                stderr.trim(),
                excerpt(&stdout)
            ))
        }
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

pub(super) fn curl_config(url: &str, api_key: &str, body: &str) -> String {
    [
        format!("url = {}", quote(url)),
        "request = \"POST\"".to_owned(),
        "header = \"Content-Type: application/json\"".to_owned(),
        format!("header = {}", quote(&format!("x-goog-api-key: {api_key}"))),
        format!("data-binary = {}", quote(body)),
    ]
    .join("\n")
        + "\n"
}

fn excerpt(body: &str) -> &str {
    let body = body.trim();
    match body.char_indices().nth(400) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_escapes_quotes_and_backslashes() {
        let config = curl_config(
            "https://example.test/v1/models/m:generateContent",
            "secret",
            r#"{"text":"say \"hi\"\n"}"#,
        );
        let lines = config.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], r#"url = "https://example.test/v1/models/m:generateContent""#);
        assert_eq!(lines[3], r#"header = "x-goog-api-key: secret""#);
        assert_eq!(lines[4], r#"data-binary = "{\"text\":\"say \\\"hi\\\"\\n\"}""#);
        assert!(config.ends_with('\n'));
    }

    #[test]
    fn raw_newlines_never_break_a_config_line() {
        let config = curl_config("u", "k", "a\nb");
        assert_eq!(config.lines().count(), 5);
    }

    #[test]
    fn missing_program_is_reported() {
        let transport = CurlTransport::new("skill-horizon-no-such-binary", 1);
        let error = transport.post_json("http://127.0.0.1:9", "k", "{}").unwrap_err();
        assert!(format!("{error:#}").contains("failed to spawn"));
    }

    #[test]
    fn excerpt_caps_long_bodies() {
        let long = "x".repeat(1_000);
        assert_eq!(excerpt(&long).len(), 400);
        assert_eq!(excerpt("  short "), "short");
    }
}
