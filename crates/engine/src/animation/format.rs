use tracing::warn;

use crate::geometry::Vec2;

use super::{AnimationError, LoopStyle};

/// Parsed form of an animation description file:
///
/// ```text
/// loopType: NO_LOOPING/LOOP_TO_START/LOOP_BACKWARDS
/// generalHitbox: x y width height
/// numFrames: n
/// FRAME0
/// numHitboxes: n
/// hitboxName: x y width height
/// ...
/// ```
///
/// Frame labels must run `FRAME0..FRAMEn-1` in order. A malformed frame
/// record is reported and parsing of frames stops (the cursor is mid-record
/// and later lines cannot be trusted to align); frames left unpopulated are
/// reported and default to full-frame hit-geometry at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSpec {
    pub loop_style: LoopStyle,
    pub general_offset: Vec2,
    pub general_width: f64,
    pub general_height: f64,
    pub frames: Vec<Option<Vec<HitboxSpec>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitboxSpec {
    pub name: String,
    pub offset: Vec2,
    pub width: f64,
    pub height: f64,
}

pub fn parse_cycle_spec(source: &str) -> Result<CycleSpec, AnimationError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line));

    let loop_style = parse_loop_style_line(lines.next())?;
    let (general_offset, general_width, general_height) = parse_box_line(
        lines.next(),
        "generalHitbox",
    )?;
    let frame_count = parse_count_line(lines.next(), "numFrames")?;

    let mut frames: Vec<Option<Vec<HitboxSpec>>> = vec![None; frame_count];
    for expected_index in 0..frame_count {
        match parse_frame_record(&mut lines, expected_index, frame_count) {
            Ok((frame_index, hitboxes)) => frames[frame_index] = Some(hitboxes),
            Err(error) => {
                warn!(expected_index, error = %error, "animation_frame_skipped");
                break;
            }
        }
    }

    for (frame_index, frame) in frames.iter().enumerate() {
        if frame.is_none() {
            warn!(frame_index, "animation_frame_not_loaded");
        }
    }

    Ok(CycleSpec {
        loop_style,
        general_offset,
        general_width,
        general_height,
        frames,
    })
}

fn parse_frame_record<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    expected_index: usize,
    frame_count: usize,
) -> Result<(usize, Vec<HitboxSpec>), AnimationError> {
    let (line_no, label) = lines.next().ok_or(AnimationError::MissingFrameLabel {
        frame_index: expected_index,
    })?;
    let label = label.trim();
    let frame_index = label
        .strip_prefix("FRAME")
        .and_then(|digits| digits.parse::<usize>().ok())
        .ok_or_else(|| AnimationError::BadFrameLabel {
            line_no,
            text: label.to_string(),
        })?;
    if frame_index != expected_index || frame_index >= frame_count {
        return Err(AnimationError::FrameLabelOutOfOrder {
            line_no,
            expected: expected_index,
            actual: frame_index,
        });
    }

    let hitbox_count = parse_count_line(lines.next(), "numHitboxes")?;
    let mut hitboxes = Vec::with_capacity(hitbox_count);
    for _ in 0..hitbox_count {
        let (line_no, line) = lines.next().ok_or(AnimationError::TruncatedFrame {
            frame_index: expected_index,
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 5 {
            return Err(AnimationError::BadTokenCount {
                line_no,
                expected: 5,
                actual: tokens.len(),
            });
        }
        let name = tokens[0].trim_end_matches(':').to_string();
        let x = parse_float(tokens[1], line_no)?;
        let y = parse_float(tokens[2], line_no)?;
        let width = parse_integer(tokens[3], line_no)?;
        let height = parse_integer(tokens[4], line_no)?;
        hitboxes.push(HitboxSpec {
            name,
            offset: Vec2 { x, y },
            width,
            height,
        });
    }

    Ok((frame_index, hitboxes))
}

fn parse_loop_style_line(line: Option<(usize, &str)>) -> Result<LoopStyle, AnimationError> {
    let (line_no, text) = line.ok_or(AnimationError::MissingLine {
        label: "loopType",
    })?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(AnimationError::BadTokenCount {
            line_no,
            expected: 2,
            actual: tokens.len(),
        });
    }
    Ok(match tokens[1] {
        "NO_LOOPING" => LoopStyle::None,
        "LOOP_TO_START" => LoopStyle::ToStart,
        "LOOP_BACKWARDS" => LoopStyle::PingPong,
        other => {
            warn!(line_no, loop_type = other, "unknown_loop_type");
            LoopStyle::None
        }
    })
}

fn parse_box_line(
    line: Option<(usize, &str)>,
    label: &'static str,
) -> Result<(Vec2, f64, f64), AnimationError> {
    let (line_no, text) = line.ok_or(AnimationError::MissingLine { label })?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 5 {
        return Err(AnimationError::BadTokenCount {
            line_no,
            expected: 5,
            actual: tokens.len(),
        });
    }
    let x = parse_float(tokens[1], line_no)?;
    let y = parse_float(tokens[2], line_no)?;
    let width = parse_integer(tokens[3], line_no)?;
    let height = parse_integer(tokens[4], line_no)?;
    Ok((Vec2 { x, y }, width, height))
}

fn parse_count_line(
    line: Option<(usize, &str)>,
    label: &'static str,
) -> Result<usize, AnimationError> {
    let (line_no, text) = line.ok_or(AnimationError::MissingLine { label })?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(AnimationError::BadTokenCount {
            line_no,
            expected: 2,
            actual: tokens.len(),
        });
    }
    tokens[1]
        .parse::<usize>()
        .map_err(|_| AnimationError::BadNumber {
            line_no,
            text: tokens[1].to_string(),
        })
}

fn parse_float(token: &str, line_no: usize) -> Result<f64, AnimationError> {
    token.parse::<f64>().map_err(|_| AnimationError::BadNumber {
        line_no,
        text: token.to_string(),
    })
}

fn parse_integer(token: &str, line_no: usize) -> Result<f64, AnimationError> {
    token
        .parse::<i64>()
        .map(|value| value as f64)
        .map_err(|_| AnimationError::BadNumber {
            line_no,
            text: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
loopType: LOOP_TO_START
generalHitbox: 10 4 40 60
numFrames: 2
FRAME0
numHitboxes: 2
body: 12.5 6 20 48
arm: 30 10 8 12
FRAME1
numHitboxes: 1
body: 12.5 6 20 48
";

    #[test]
    fn parses_well_formed_cycle() {
        let spec = parse_cycle_spec(WELL_FORMED).expect("spec parses");
        assert_eq!(spec.loop_style, LoopStyle::ToStart);
        assert_eq!(spec.general_offset, Vec2::new(10.0, 4.0));
        assert_eq!(spec.general_width, 40.0);
        assert_eq!(spec.general_height, 60.0);
        assert_eq!(spec.frames.len(), 2);

        let first = spec.frames[0].as_ref().expect("frame 0 populated");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, "body");
        assert_eq!(first[0].offset, Vec2::new(12.5, 6.0));
        assert_eq!(first[1].offset, Vec2::new(30.0, 10.0));
    }

    #[test]
    fn unknown_loop_type_defaults_to_no_looping() {
        let source = WELL_FORMED.replace("LOOP_TO_START", "LOOP_SIDEWAYS");
        let spec = parse_cycle_spec(&source).expect("spec parses");
        assert_eq!(spec.loop_style, LoopStyle::None);
    }

    #[test]
    fn out_of_order_frame_label_leaves_rest_unpopulated() {
        let source = WELL_FORMED.replace("FRAME1", "FRAME3");
        let spec = parse_cycle_spec(&source).expect("spec still parses");
        assert!(spec.frames[0].is_some());
        assert!(spec.frames[1].is_none());
    }

    #[test]
    fn truncated_frame_section_keeps_earlier_frames() {
        let cut = WELL_FORMED.find("FRAME1").expect("marker");
        let spec = parse_cycle_spec(&WELL_FORMED[..cut]).expect("spec still parses");
        assert!(spec.frames[0].is_some());
        assert!(spec.frames[1].is_none());
    }

    #[test]
    fn non_numeric_field_is_an_error() {
        let source = WELL_FORMED.replace("numFrames: 2", "numFrames: two");
        let error = parse_cycle_spec(&source).expect_err("bad count rejected");
        assert!(matches!(error, AnimationError::BadNumber { .. }));
    }

    #[test]
    fn wrong_token_count_is_an_error() {
        let source = WELL_FORMED.replace("generalHitbox: 10 4 40 60", "generalHitbox: 10 4 40");
        let error = parse_cycle_spec(&source).expect_err("bad box rejected");
        assert!(matches!(error, AnimationError::BadTokenCount { .. }));
    }
}
