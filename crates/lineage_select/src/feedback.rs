//! HUD feedback for hierarchy steps.
//!
//! Turns a [`TraversalResult`] into fading labels drawn next to the mouse
//! cursor. Nothing here draws; a host renders the [`HudLabel`]s however it
//! likes. Offsets are in pixels relative to the cursor anchor, y pointing up,
//! already multiplied by the UI scale.

use crate::preferences::HudPreferences;
use crate::walker::{BoundaryKind, Direction, TraversalResult, WalkPolicy};

/// Semantic label color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Plain white text
    Neutral,
    /// Yellow, stopped by hidden objects
    Warning,
    /// Green, the true top
    Success,
    /// Red, the true bottom
    Alert,
}

impl Tone {
    /// Linear RGB color for this tone.
    pub fn rgb(&self) -> [f32; 3] {
        match self {
            Tone::Neutral => [1.0, 1.0, 1.0],
            Tone::Warning => [1.0, 0.831, 0.0],
            Tone::Success => [0.3, 1.0, 0.3],
            Tone::Alert => [1.0, 0.3, 0.3],
        }
    }
}

/// One line of label text.
#[derive(Clone, Debug, PartialEq)]
pub struct HudLine {
    pub text: String,
    pub tone: Tone,
}

impl HudLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// A fading label.
#[derive(Clone, Debug, PartialEq)]
pub struct HudLabel {
    pub lines: Vec<HudLine>,
    pub offset: [f32; 2],
    pub size: u32,
    pub alpha: f32,
    /// Seconds until fully faded
    pub fade_time: f32,
}

impl HudLabel {
    /// Text of all lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

const TITLE_SIZE: u32 = 12;
const DETAIL_SIZE: u32 = 10;
const ARROW_X: f32 = -70.0;

/// Rough advance of a glyph relative to the font size. Hosts with real font
/// metrics may re-layout the detail labels.
const GLYPH_ADVANCE: f32 = 0.55;

fn text_width(text: &str, size: u32, scale: f32) -> f32 {
    text.chars().count() as f32 * size as f32 * GLYPH_ADVANCE * scale
}

/// Per-session feedback state.
///
/// Remembers the last boundary so that an "absolute" label shown right after
/// its hidden-objects counterpart is offset and doesn't overlap it while the
/// first one is still fading.
#[derive(Clone, Debug, Default)]
pub struct FeedbackState {
    last_boundary: Option<BoundaryKind>,
}

impl FeedbackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_boundary(&self) -> Option<BoundaryKind> {
        self.last_boundary
    }

    pub fn reset(&mut self) {
        self.last_boundary = None;
    }

    /// Build the labels for one hierarchy step.
    pub fn describe(
        &mut self,
        direction: Direction,
        policy: &WalkPolicy,
        result: &TraversalResult,
        hud: &HudPreferences,
    ) -> Vec<HudLabel> {
        let scale = hud.ui_scale;
        let label = |lines: Vec<HudLine>, offset: [f32; 2], size: u32, alpha: f32| HudLabel {
            lines,
            offset,
            size,
            alpha,
            fade_time: hud.fade_time,
        };

        let mut labels = Vec::new();

        match result {
            TraversalResult::Boundary(kind) => {
                let (lines, y, alpha) = match kind {
                    BoundaryKind::Top => (
                        vec![
                            HudLine::new("Reached Top of Hierarchy", Tone::Warning),
                            HudLine::new("with Hidden Parents", Tone::Neutral),
                        ],
                        18.0,
                        0.5,
                    ),
                    BoundaryKind::AbsoluteTop => {
                        let y = if self.last_boundary == Some(BoundaryKind::Top) { 54.0 } else { 18.0 };
                        (
                            vec![HudLine::new("Reached ABSOLUTE Top of Hierarchy", Tone::Success)],
                            y,
                            1.0,
                        )
                    }
                    BoundaryKind::Bottom => (
                        vec![
                            HudLine::new("Reached Bottom of Hierarchy", Tone::Warning),
                            HudLine::new("with Hidden Children", Tone::Neutral),
                        ],
                        -36.0,
                        0.5,
                    ),
                    BoundaryKind::AbsoluteBottom => {
                        let y = if self.last_boundary == Some(BoundaryKind::Bottom) { -54.0 } else { -18.0 };
                        (
                            vec![HudLine::new("Reached ABSOLUTE Bottom of Hierarchy", Tone::Alert)],
                            y,
                            1.0,
                        )
                    }
                };

                labels.push(label(lines, [0.0, y * scale], TITLE_SIZE, alpha));
                self.last_boundary = Some(*kind);
            }
            TraversalResult::Continued { .. } => {
                let title = match direction {
                    Direction::Up => "Selecting Up ",
                    Direction::Down => "Selecting Down ",
                };
                labels.push(label(
                    vec![HudLine::new(title.trim_end(), Tone::Neutral)],
                    [0.0, 0.0],
                    TITLE_SIZE,
                    0.5,
                ));

                let mut x = text_width(title, TITLE_SIZE, scale);
                let detail = |text: &str, x: f32, y: f32| {
                    label(
                        vec![HudLine::new(text, Tone::Neutral)],
                        [x, y * scale],
                        DETAIL_SIZE,
                        0.3,
                    )
                };

                if policy.unhide {
                    labels.push(detail("+ Unhiding ", x, 5.0));
                }
                if policy.recursive {
                    labels.push(detail("+ Recursive ", x, -5.0));
                }
                if policy.include_selection {
                    if policy.unhide {
                        x += text_width("+ Unhiding ", DETAIL_SIZE, scale);
                    }
                    labels.push(detail("+ Inclusive", x, 5.0));
                }
            }
        }

        let (arrow, arrow_y) = match direction {
            Direction::Up => ("▲", 9.0),
            Direction::Down => ("▼", -9.0),
        };
        labels.push(label(
            vec![HudLine::new(arrow, Tone::Neutral)],
            [ARROW_X, arrow_y * scale],
            TITLE_SIZE,
            0.25,
        ));

        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hud() -> HudPreferences {
        HudPreferences {
            fade_time: 2.0,
            ui_scale: 1.0,
        }
    }

    #[test]
    fn test_absolute_bottom_offset_after_bottom() {
        let mut state = FeedbackState::new();
        let policy = WalkPolicy::down();

        let first = state.describe(
            Direction::Down,
            &policy,
            &TraversalResult::Boundary(BoundaryKind::AbsoluteBottom),
            &hud(),
        );
        assert_eq!(first[0].offset, [0.0, -18.0]);
        assert_eq!(first[0].lines[0].tone, Tone::Alert);

        let bottom = state.describe(
            Direction::Down,
            &policy,
            &TraversalResult::Boundary(BoundaryKind::Bottom),
            &hud(),
        );
        assert_eq!(bottom[0].text(), "Reached Bottom of Hierarchy\nwith Hidden Children");
        assert_eq!(state.last_boundary(), Some(BoundaryKind::Bottom));

        let absolute = state.describe(
            Direction::Down,
            &policy,
            &TraversalResult::Boundary(BoundaryKind::AbsoluteBottom),
            &hud(),
        );
        assert_eq!(absolute[0].offset, [0.0, -54.0]);
    }

    #[test]
    fn test_reset_forgets_last_boundary() {
        let mut state = FeedbackState::new();
        let policy = WalkPolicy::down();
        state.describe(
            Direction::Down,
            &policy,
            &TraversalResult::Boundary(BoundaryKind::Bottom),
            &hud(),
        );

        state.reset();
        assert_eq!(state.last_boundary(), None);

        let absolute = state.describe(
            Direction::Down,
            &policy,
            &TraversalResult::Boundary(BoundaryKind::AbsoluteBottom),
            &hud(),
        );
        assert_eq!(absolute[0].offset, [0.0, -18.0]);
    }

    #[test]
    fn test_continued_lists_policy_details() {
        let mut state = FeedbackState::new();
        let policy = WalkPolicy::up().unhide(true).include_selection(true);
        let labels = state.describe(
            Direction::Up,
            &policy,
            &TraversalResult::Continued { active: None },
            &hud(),
        );

        let texts: Vec<String> = labels.iter().map(HudLabel::text).collect();
        assert_eq!(
            texts,
            vec!["Selecting Up", "+ Unhiding ", "+ Recursive ", "+ Inclusive", "▲"]
        );
        assert!(labels.iter().all(|l| l.fade_time == 2.0));
        // Inclusive sits to the right of Unhiding on the same row
        assert!(labels[3].offset[0] > labels[1].offset[0]);
        assert_eq!(labels[3].offset[1], labels[1].offset[1]);
        // Continuing doesn't touch the boundary memory
        assert_eq!(state.last_boundary(), None);
    }

    #[test]
    fn test_ui_scale_applies_to_offsets() {
        let mut state = FeedbackState::new();
        let hud = HudPreferences {
            fade_time: 1.0,
            ui_scale: 2.0,
        };
        let labels = state.describe(
            Direction::Up,
            &WalkPolicy::up(),
            &TraversalResult::Boundary(BoundaryKind::Top),
            &hud,
        );
        assert_eq!(labels[0].offset, [0.0, 36.0]);
        assert_eq!(labels[1].offset, [ARROW_X, 18.0]);
    }
}
