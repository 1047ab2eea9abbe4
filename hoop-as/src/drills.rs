//! Static drill catalog served by `GET /drill/{name}`
//!
//! Every drill the recommendation table can name has an entry here.

use hoop_common::api::{DrillInfo, SkillLevel, Theme};

struct DrillEntry {
    name: &'static str,
    description: &'static str,
    level: SkillLevel,
    focus_areas: &'static [Theme],
    steps: &'static [&'static str],
}

impl DrillEntry {
    fn to_info(&self) -> DrillInfo {
        DrillInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            level: self.level,
            focus_areas: self.focus_areas.to_vec(),
            steps: self.steps.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const CATALOG: &[DrillEntry] = &[
    DrillEntry {
        name: "Basic Stationary Dribble",
        description: "Dribble in place with one hand to build a consistent, controlled bounce.",
        level: SkillLevel::Beginner,
        focus_areas: &[Theme::BallControl],
        steps: &[
            "Stand in an athletic stance with knees bent",
            "Dribble with your strong hand at hip height for 30 seconds",
            "Switch to your weak hand for 30 seconds",
            "Repeat three rounds per hand",
        ],
    },
    DrillEntry {
        name: "Pound Dribble",
        description: "Hard, fast dribbles to a steady count to build rhythm and hand strength.",
        level: SkillLevel::Beginner,
        focus_areas: &[Theme::RhythmTiming, Theme::BallControl],
        steps: &[
            "Pound the ball as hard as you can at waist height",
            "Count each bounce out loud to keep an even rhythm",
            "Do 30 seconds per hand, then 30 seconds alternating",
        ],
    },
    DrillEntry {
        name: "Stance Hold Dribble",
        description: "Hold a low defensive stance while dribbling to train body position.",
        level: SkillLevel::Beginner,
        focus_areas: &[Theme::BodyPosition],
        steps: &[
            "Sink into a low stance with feet shoulder-width apart",
            "Dribble at knee height without rising out of the stance",
            "Hold for 20 seconds, rest 10, repeat five times",
        ],
    },
    DrillEntry {
        name: "Low-High Dribble",
        description: "Alternate sets of low and high dribbles to control bounce height.",
        level: SkillLevel::Beginner,
        focus_areas: &[Theme::DribbleHeight],
        steps: &[
            "Five dribbles at ankle height",
            "Five dribbles at waist height",
            "Keep alternating for 45 seconds per hand",
        ],
    },
    DrillEntry {
        name: "Fingertip Control Drill",
        description: "Tap and dribble using only the fingertips to stop slapping the ball.",
        level: SkillLevel::Beginner,
        focus_areas: &[Theme::HandTechnique],
        steps: &[
            "Tip the ball between your hands above your head for 20 seconds",
            "Dribble using only your fingerpads, palm off the ball",
            "Finish with 20 slow, controlled dribbles per hand",
        ],
    },
    DrillEntry {
        name: "Eyes-Up Stationary Dribble",
        description: "Dribble in place while reading numbers or signals held up by a partner.",
        level: SkillLevel::Beginner,
        focus_areas: &[Theme::CourtAwareness],
        steps: &[
            "Pick a target on the wall at eye level",
            "Dribble in place without looking down",
            "Have a partner flash fingers and call out the number",
        ],
    },
    DrillEntry {
        name: "Figure 8 Dribble",
        description: "Dribble the ball in a figure 8 through and around your legs.",
        level: SkillLevel::Intermediate,
        focus_areas: &[Theme::BallControl, Theme::HandTechnique],
        steps: &[
            "Stand with feet wide and knees bent",
            "Dribble through your legs from front to back",
            "Bring the ball around the outside leg and through again",
            "Reverse direction after 30 seconds",
        ],
    },
    DrillEntry {
        name: "Rhythm Crossover",
        description: "Crossovers to a metronome or beat to lock in timing.",
        level: SkillLevel::Intermediate,
        focus_areas: &[Theme::RhythmTiming],
        steps: &[
            "Set a steady beat you can hear",
            "Cross over on every second beat",
            "Speed up the beat once the crossover stays on time",
        ],
    },
    DrillEntry {
        name: "Defensive Slide Dribble",
        description: "Slide laterally in a low stance while keeping the dribble alive.",
        level: SkillLevel::Intermediate,
        focus_areas: &[Theme::BodyPosition, Theme::BallControl],
        steps: &[
            "Start low with the ball on your outside hand",
            "Slide five steps sideways without crossing your feet",
            "Switch hands and slide back",
        ],
    },
    DrillEntry {
        name: "Speed Change Dribble",
        description: "Move up the court changing between a high speed dribble and a low control dribble.",
        level: SkillLevel::Intermediate,
        focus_areas: &[Theme::DribbleHeight, Theme::RhythmTiming],
        steps: &[
            "Push the ball out high and run for three dribbles",
            "Drop into a low control dribble for three dribbles",
            "Repeat the length of the court and back",
        ],
    },
    DrillEntry {
        name: "Crossover Dribble",
        description: "Quick, low crossovers in front of the body.",
        level: SkillLevel::Intermediate,
        focus_areas: &[Theme::HandTechnique, Theme::DribbleHeight],
        steps: &[
            "Dribble low on your right side",
            "Cross the ball to your left hand below the knee",
            "Keep the crossover tight and repeat for 45 seconds",
        ],
    },
    DrillEntry {
        name: "Cone Weave with Callouts",
        description: "Weave through cones while a partner calls out colours or numbers.",
        level: SkillLevel::Intermediate,
        focus_areas: &[Theme::CourtAwareness, Theme::BallControl],
        steps: &[
            "Set five cones in a line two steps apart",
            "Weave through using the hand away from each cone",
            "Answer your partner's callouts without looking down",
        ],
    },
    DrillEntry {
        name: "Two-Ball Dribble",
        description: "Dribble two balls at once to build control in both hands.",
        level: SkillLevel::Advanced,
        focus_areas: &[Theme::BallControl, Theme::HandTechnique],
        steps: &[
            "Dribble both balls at the same time for 30 seconds",
            "Keep both bounces at the same height",
            "Walk forward and back while keeping both alive",
        ],
    },
    DrillEntry {
        name: "Two-Ball Alternating Dribble",
        description: "Two balls bouncing on alternate beats to sharpen timing.",
        level: SkillLevel::Advanced,
        focus_areas: &[Theme::RhythmTiming],
        steps: &[
            "Start one ball, then the other half a beat later",
            "Keep the alternating rhythm steady for 30 seconds",
            "Add a slow walk once the rhythm holds",
        ],
    },
    DrillEntry {
        name: "Attack Stance Combo",
        description: "Combination moves out of a triple-threat stance at game speed.",
        level: SkillLevel::Advanced,
        focus_areas: &[Theme::BodyPosition, Theme::HandTechnique],
        steps: &[
            "Start in triple threat",
            "Jab, cross over, and attack with a low first step",
            "Finish with a hesitation and retreat dribble",
        ],
    },
    DrillEntry {
        name: "Spider Dribble",
        description: "Rapid alternating taps in front of and behind the legs, kept very low.",
        level: SkillLevel::Advanced,
        focus_areas: &[Theme::DribbleHeight, Theme::HandTechnique],
        steps: &[
            "Stand wide with the ball between your feet",
            "Tap right, left in front, then right, left behind",
            "Keep every tap below the knee for 30 seconds",
        ],
    },
    DrillEntry {
        name: "Behind-the-Back Series",
        description: "Repeated behind-the-back changes of direction without breaking stride.",
        level: SkillLevel::Advanced,
        focus_areas: &[Theme::HandTechnique],
        steps: &[
            "Wrap the ball behind your back from right to left",
            "Catch it with a soft hand and continue the dribble",
            "Repeat in both directions while walking, then jogging",
        ],
    },
    DrillEntry {
        name: "Tennis Ball Toss Dribble",
        description: "Dribble with one hand while tossing and catching a tennis ball with the other.",
        level: SkillLevel::Advanced,
        focus_areas: &[Theme::CourtAwareness, Theme::BallControl],
        steps: &[
            "Dribble with your strong hand",
            "Toss a tennis ball with your other hand and catch it",
            "Switch hands after 30 seconds",
        ],
    },
];

/// Lowercase, collapse runs of non-alphanumerics to a single `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Look up a drill by display name or slug
pub fn find_drill(name: &str) -> Option<DrillInfo> {
    let wanted = slugify(name);
    if wanted.is_empty() {
        return None;
    }
    CATALOG
        .iter()
        .find(|entry| slugify(entry.name) == wanted)
        .map(DrillEntry::to_info)
}

/// All catalog drill names
pub fn drill_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|entry| entry.name)
}
