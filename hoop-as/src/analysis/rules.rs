//! Keyword rule tables
//!
//! Theme and skill inference is a best-effort keyword heuristic over model
//! text. All of it is table-driven from this module so it can be replaced by
//! a real classifier without touching the session protocol:
//!
//! - [`THEME_RULES`]: ordered keyword → theme mapping
//! - [`BEGINNER_TERMS`] / [`ADVANCED_TERMS`]: skill vocabulary, beginner first
//! - [`DRILL_TABLE`]: (skill level, dominant theme) → recommended drill

use hoop_common::api::{ClipFeedback, SkillLevel, Theme};

/// One theme rule: any keyword present (case-insensitive substring) tags the text
#[derive(Debug, Clone, Copy)]
pub struct ThemeRule {
    pub theme: Theme,
    pub keywords: &'static [&'static str],
}

/// Ordered theme rules. Order decides tie-breaks for the dominant theme.
pub const THEME_RULES: &[ThemeRule] = &[
    ThemeRule {
        theme: Theme::BallControl,
        keywords: &["control", "grip"],
    },
    ThemeRule {
        theme: Theme::RhythmTiming,
        keywords: &["rhythm", "timing", "consistency"],
    },
    ThemeRule {
        theme: Theme::BodyPosition,
        keywords: &["posture", "stance", "position"],
    },
    ThemeRule {
        theme: Theme::DribbleHeight,
        keywords: &["height", "bounce"],
    },
    ThemeRule {
        theme: Theme::HandTechnique,
        keywords: &["hand", "finger"],
    },
    ThemeRule {
        theme: Theme::CourtAwareness,
        keywords: &["head", "eyes", "awareness"],
    },
];

/// Terms indicating a beginner. Checked before [`ADVANCED_TERMS`].
pub const BEGINNER_TERMS: &[&str] = &[
    "beginner",
    "basic",
    "novice",
    "struggl",
    "inconsistent",
    "learning",
];

/// Terms indicating an advanced player
pub const ADVANCED_TERMS: &[&str] = &[
    "advanced",
    "excellent",
    "skilled",
    "impressive",
    "polished",
    "elite",
];

/// Drill recommendation by (skill level, dominant theme)
pub const DRILL_TABLE: &[(SkillLevel, Theme, &str)] = &[
    (SkillLevel::Beginner, Theme::BallControl, "Basic Stationary Dribble"),
    (SkillLevel::Beginner, Theme::RhythmTiming, "Pound Dribble"),
    (SkillLevel::Beginner, Theme::BodyPosition, "Stance Hold Dribble"),
    (SkillLevel::Beginner, Theme::DribbleHeight, "Low-High Dribble"),
    (SkillLevel::Beginner, Theme::HandTechnique, "Fingertip Control Drill"),
    (SkillLevel::Beginner, Theme::CourtAwareness, "Eyes-Up Stationary Dribble"),
    (SkillLevel::Intermediate, Theme::BallControl, "Figure 8 Dribble"),
    (SkillLevel::Intermediate, Theme::RhythmTiming, "Rhythm Crossover"),
    (SkillLevel::Intermediate, Theme::BodyPosition, "Defensive Slide Dribble"),
    (SkillLevel::Intermediate, Theme::DribbleHeight, "Speed Change Dribble"),
    (SkillLevel::Intermediate, Theme::HandTechnique, "Crossover Dribble"),
    (SkillLevel::Intermediate, Theme::CourtAwareness, "Cone Weave with Callouts"),
    (SkillLevel::Advanced, Theme::BallControl, "Two-Ball Dribble"),
    (SkillLevel::Advanced, Theme::RhythmTiming, "Two-Ball Alternating Dribble"),
    (SkillLevel::Advanced, Theme::BodyPosition, "Attack Stance Combo"),
    (SkillLevel::Advanced, Theme::DribbleHeight, "Spider Dribble"),
    (SkillLevel::Advanced, Theme::HandTechnique, "Behind-the-Back Series"),
    (SkillLevel::Advanced, Theme::CourtAwareness, "Tennis Ball Toss Dribble"),
];

/// Drill when no theme was detected
pub fn default_drill(level: SkillLevel) -> &'static str {
    match level {
        SkillLevel::Beginner => "Basic Stationary Dribble",
        SkillLevel::Intermediate => "Figure 8 Dribble",
        SkillLevel::Advanced => "Two-Ball Dribble",
    }
}

/// Themes present in `text`, in rule order, without duplicates
pub fn detect_themes(text: &str) -> Vec<Theme> {
    let lower = text.to_lowercase();
    THEME_RULES
        .iter()
        .filter(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.theme)
        .collect()
}

/// Beginner vocabulary wins over advanced; neither present → intermediate
pub fn infer_skill_level(text: &str) -> SkillLevel {
    let lower = text.to_lowercase();
    if BEGINNER_TERMS.iter().any(|t| lower.contains(t)) {
        SkillLevel::Beginner
    } else if ADVANCED_TERMS.iter().any(|t| lower.contains(t)) {
        SkillLevel::Advanced
    } else {
        SkillLevel::Intermediate
    }
}

/// Theme mentioned by the most clips; ties go to the earlier rule
pub fn dominant_theme(clips: &[ClipFeedback]) -> Option<Theme> {
    let mut best: Option<(Theme, usize)> = None;
    for rule in THEME_RULES {
        let count = clips
            .iter()
            .filter(|c| c.key_areas.contains(&rule.theme))
            .count();
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((rule.theme, count)),
        }
    }
    best.map(|(theme, _)| theme)
}

/// Pick the single follow-up drill
pub fn recommend_drill(level: SkillLevel, theme: Option<Theme>) -> &'static str {
    theme
        .and_then(|theme| {
            DRILL_TABLE
                .iter()
                .find(|(l, t, _)| *l == level && *t == theme)
                .map(|(_, _, drill)| *drill)
        })
        .unwrap_or_else(|| default_drill(level))
}
