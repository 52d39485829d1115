//! Wire protocol between host and device.
//!
//! Device → host: newline-delimited text. A line matching `Enc<N>: <+|->`
//! is an encoder volume command; any other line is, verbatim after trim, a
//! macro command key. Host → device: volume replies `<N>:<P>` and indicator
//! color frames `<N>:color(R,G,B)`.

/// A parsed encoder volume command, e.g. `Enc3: +`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderCommand {
    /// Encoder id, a positive integer.
    pub encoder: u32,
    /// `true` for `+`, `false` for `-`.
    pub increase: bool,
}

/// Classification of one received line.
///
/// Line-atomic: one line yields exactly one variant. The encoder pattern
/// must fully match to be treated specially — partial or ambiguous forms
/// (`EncA: +`, `Enc0: +`, `Enc3:+`) fall through to the macro branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// An encoder volume command.
    Encoder(EncoderCommand),
    /// The trimmed line, used as a macro command key.
    Macro(String),
}

impl DeviceCommand {
    /// Classify a received line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match parse_encoder(line) {
            Some(cmd) => DeviceCommand::Encoder(cmd),
            None => DeviceCommand::Macro(line.to_string()),
        }
    }
}

fn parse_encoder(line: &str) -> Option<EncoderCommand> {
    let rest = line.strip_prefix("Enc")?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, rest) = rest.split_at(digits_end);

    let encoder: u32 = digits.parse().ok()?;
    if encoder == 0 {
        return None;
    }

    let increase = match rest.strip_prefix(": ")? {
        "+" => true,
        "-" => false,
        _ => return None,
    };

    Some(EncoderCommand { encoder, increase })
}

/// Reply frame sent after a completed volume adjustment: `<N>:<P>`.
pub fn volume_reply(encoder: u32, percent: u8) -> Vec<u8> {
    format!("{encoder}:{percent}\n").into_bytes()
}

/// Indicator color frame: `<N>:color(R,G,B)`.
pub fn color_frame(encoder: u32, color: [u8; 3]) -> Vec<u8> {
    format!(
        "{encoder}:color({},{},{})\n",
        color[0], color[1], color[2]
    )
    .into_bytes()
}
