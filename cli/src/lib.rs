//! Interactive session for the Toolgate demo tool.
//!
//! Reads a license key, activates it, then processes one line of input per
//! gated call until the user quits or the quota runs out.

use std::io::{BufRead, Write};

use anyhow::Result;
use toolgate_license::{Entitlement, LicenseClient, LicenseError, LicenseKey};
use tracing::debug;

/// Input that selects the built-in demo key.
pub const DEMO_SENTINEL: &str = "demo";

/// Demo key. The backend does not know it, so activation fails.
pub const DEMO_LICENSE_KEY: &str = "LIC-DEMO123456789ABC";

/// Inputs that end the session.
pub const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

const RULE: &str = "==================================================";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user quit (or input ended).
    Quit,
    /// Activation failed; nothing was processed.
    ActivationFailed,
    /// A request was refused because the license stopped authorizing calls.
    Unauthorized,
}

impl SessionEnd {
    /// Process exit code for this outcome.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Quit => 0,
            Self::ActivationFailed | Self::Unauthorized => 1,
        }
    }
}

/// Maps the entered text to the key to activate.
#[must_use]
pub fn resolve_key(input: &str) -> LicenseKey {
    let input = input.trim();
    if input.eq_ignore_ascii_case(DEMO_SENTINEL) {
        LicenseKey::new(DEMO_LICENSE_KEY)
    } else {
        LicenseKey::new(input)
    }
}

/// Returns true if `input` asks to end the session.
#[must_use]
pub fn is_quit(input: &str) -> bool {
    let input = input.trim();
    QUIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

/// Stand-in for the gated work.
#[must_use]
pub fn process(request: &str) -> String {
    format!("Processed result for: {request}")
}

/// Runs one full session: key prompt, activation, processing loop.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run_session<R: BufRead, W: Write>(
    client: &mut LicenseClient,
    mut input: R,
    out: &mut W,
) -> Result<SessionEnd> {
    writeln!(out, "Toolgate - licensed AI tool demo")?;
    writeln!(out, "{RULE}")?;

    let Some(line) = prompt(&mut input, out, "Enter your license key (or 'demo' for demo): ")? else {
        return Ok(SessionEnd::Quit);
    };
    if line.trim().eq_ignore_ascii_case(DEMO_SENTINEL) {
        writeln!(out, "\nDemo Mode: Using a test license key...")?;
    }
    let key = resolve_key(&line);

    writeln!(out, "Validating license...")?;
    match client.activate(key).await {
        Ok(entitlement) => report_activation(out, &entitlement)?,
        Err(e) => {
            report_failure(out, &e)?;
            return Ok(SessionEnd::ActivationFailed);
        }
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Tool activated! You can now use AI features.")?;
    writeln!(out, "{RULE}")?;

    loop {
        let Some(line) = prompt(&mut input, out, "\nEnter text to process (or 'quit' to exit): ")?
        else {
            return Ok(SessionEnd::Quit);
        };
        let request = line.trim();

        if is_quit(request) {
            return Ok(SessionEnd::Quit);
        }
        if request.is_empty() {
            continue;
        }

        if !client.authorize() {
            if client.is_licensed() {
                writeln!(out, "Error: No API calls remaining. Please upgrade your plan.")?;
            } else {
                writeln!(out, "Error: Tool not activated. Please provide a valid license key.")?;
            }
            writeln!(out, "Processing failed due to license issues.")?;
            return Ok(SessionEnd::Unauthorized);
        }

        debug!("Processing request of {} bytes", request.len());
        writeln!(out, "Processing: {request}")?;
        writeln!(out, "Result: {}", process(request))?;

        client.consume();
        if let Some(left) = client.api_calls_left() {
            writeln!(out, "API calls remaining: {left}")?;
        }
    }
}

/// Prints `text` and reads one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn report_activation<W: Write>(out: &mut W, entitlement: &Entitlement) -> Result<()> {
    writeln!(out, "✓ License activated successfully!")?;
    writeln!(out, "  API calls remaining: {}", entitlement.api_calls_left)?;
    if let Some(days) = entitlement.days_remaining {
        writeln!(out, "  License expires in: {days} days")?;
    }
    Ok(())
}

fn report_failure<W: Write>(out: &mut W, err: &LicenseError) -> Result<()> {
    writeln!(out, "✗ License validation failed: {err} (code {})", err.code())?;
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Tool activation failed. Please check your license key.")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "\nTo get a valid license key:")?;
    writeln!(out, "1. Visit the Toolgate website")?;
    writeln!(out, "2. Sign up for an account")?;
    writeln!(out, "3. Subscribe to a paid plan (Pro or Advanced)")?;
    writeln!(out, "4. Generate your license key from the dashboard")?;
    Ok(())
}
