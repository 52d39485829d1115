use crate::device_command::{DeviceCommand, EncoderCommand, color_frame, volume_reply};

/// WHAT: `EncN: +` and `EncN: -` parse as encoder commands
/// WHY: The encoder grammar is the only special form on the wire
#[test]
fn given_valid_encoder_lines_when_parsing_then_encoder_commands() {
    // Given/When/Then: Both deltas parse with the right direction
    assert_eq!(
        DeviceCommand::parse("Enc3: +"),
        DeviceCommand::Encoder(EncoderCommand {
            encoder: 3,
            increase: true
        })
    );
    assert_eq!(
        DeviceCommand::parse("Enc12: -"),
        DeviceCommand::Encoder(EncoderCommand {
            encoder: 12,
            increase: false
        })
    );
}

/// WHAT: Surrounding whitespace is trimmed before classification
/// WHY: Serial lines arrive with trailing newlines and stray spaces
#[test]
fn given_padded_line_when_parsing_then_trimmed_first() {
    // Given/When/Then: Whitespace does not defeat the encoder match
    assert_eq!(
        DeviceCommand::parse("  Enc1: + \r\n"),
        DeviceCommand::Encoder(EncoderCommand {
            encoder: 1,
            increase: true
        })
    );
}

/// WHAT: Partial or ambiguous encoder forms fall through to the macro branch
/// WHY: The encoder pattern must fully match before being treated specially
#[test]
fn given_near_miss_encoder_lines_when_parsing_then_macro_commands() {
    // Given/When/Then: Each near-miss is a macro key, verbatim after trim
    for line in [
        "EncA: +",   // non-numeric id
        "Enc0: +",   // id must be positive
        "Enc3:+",    // missing space
        "Enc3: ++",  // delta must be exactly one of +/-
        "Enc3: *",   // unknown delta
        "Enc: +",    // no id at all
        "Enc3: + x", // trailing garbage
    ] {
        assert_eq!(
            DeviceCommand::parse(line),
            DeviceCommand::Macro(line.trim().to_string()),
            "expected macro fallthrough for {line:?}"
        );
    }
}

/// WHAT: Ordinary lines are macro command keys
/// WHY: Any non-encoder line maps verbatim to the registry
#[test]
fn given_plain_line_when_parsing_then_macro_command() {
    // Given/When/Then: The full trimmed line is the lookup key
    assert_eq!(
        DeviceCommand::parse("play_button"),
        DeviceCommand::Macro("play_button".to_string())
    );
}

/// WHAT: Volume replies are `<N>:<P>` with a trailing newline
/// WHY: The device display parses exactly this frame
#[test]
fn given_adjustment_result_when_building_reply_then_expected_frame() {
    // Given/When/Then
    assert_eq!(volume_reply(3, 50), b"3:50\n");
    assert_eq!(volume_reply(12, 100), b"12:100\n");
}

/// WHAT: Color frames are `<N>:color(R,G,B)`
/// WHY: The device firmware expects this exact form for indicator LEDs
#[test]
fn given_color_when_building_frame_then_expected_frame() {
    // Given/When/Then
    assert_eq!(color_frame(2, [255, 0, 64]), b"2:color(255,0,64)\n");
}
