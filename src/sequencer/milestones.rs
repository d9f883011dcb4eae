// Milestone overlay table: one record per score threshold.
// Image paths are served from the static site next to the wasm bundle.

use crate::config::MILESTONE_STEP;

/// How the overlay arranges its photos around the caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoLayout {
    /// Left and right of the caption.
    Pair,
    /// Banner photo above a left/right pair.
    BannerPair,
    /// Top, bottom, left, right.
    Cross,
    /// Four corners.
    Corners,
    /// Photos orbiting the caption.
    Orbit,
}

#[derive(Debug)]
pub struct Milestone {
    pub threshold: u32,
    pub message: &'static str,
    pub images: &'static [&'static str],
    pub layout: PhotoLayout,
}

pub const MILESTONE_COUNT: usize = 9;

pub static MILESTONES: [Milestone; MILESTONE_COUNT] = [
    Milestone {
        threshold: 10,
        message: "Making you laugh is the absolute highlight of my day",
        images: &["/images/val_1.png", "/images/val_2.png"],
        layout: PhotoLayout::Pair,
    },
    Milestone {
        threshold: 20,
        message: "It's the little things you do that make the biggest difference to me",
        images: &["/images/val_9.png", "/images/val_3.png", "/images/val_4.png"],
        layout: PhotoLayout::BannerPair,
    },
    Milestone {
        threshold: 30,
        message: "You make every date so fun and enjoyable",
        images: &["/images/val_5.png", "/images/val_6.png", "/images/val_7.png", "/images/val_8.png"],
        layout: PhotoLayout::Cross,
    },
    Milestone {
        threshold: 40,
        message: "I really love how career oriented, goal-driven, and studious you are",
        images: &["/images/val_10.png", "/images/val_11.png", "/images/val_12.png", "/images/val_13.png"],
        layout: PhotoLayout::Cross,
    },
    Milestone {
        threshold: 50,
        message: "I love how you make even the most ordinary moments feel special",
        images: &["/images/val_14.png", "/images/val_15.png"],
        layout: PhotoLayout::Pair,
    },
    Milestone {
        threshold: 60,
        message: "I love that you challenge me to be a better person just by being yourself.",
        images: &["/images/val_17.png", "/images/val_16.png"],
        layout: PhotoLayout::Pair,
    },
    Milestone {
        threshold: 70,
        message: "You give the best kisses and hugs, the kind that make everything else disappear",
        images: &["/images/val_19.png", "/images/val_20.png", "/images/val_21.png", "/images/val_22.png"],
        layout: PhotoLayout::Corners,
    },
    Milestone {
        threshold: 80,
        message: "I admire how you try your very best to make me happy",
        images: &["/images/val_23.png", "/images/val_24.png", "/images/val_25.png", "/images/val_26.png"],
        layout: PhotoLayout::Corners,
    },
    Milestone {
        threshold: 90,
        message: "You are my best friend and my favorite person, all wrapped in one",
        images: &[
            "/images/val_27.png",
            "/images/val_28.png",
            "/images/val_29.png",
            "/images/val_30.png",
            "/images/val_31.png",
        ],
        layout: PhotoLayout::Orbit,
    },
];

/// Index into [`MILESTONES`] for an exact threshold score.
pub fn index_for_score(score: u32) -> Option<usize> {
    if score == 0 || score % MILESTONE_STEP != 0 {
        return None;
    }
    MILESTONES.iter().position(|m| m.threshold == score)
}

/// True when the hit that moves the score from `score` to `score + 1` lands on
/// a milestone threshold.
pub fn is_boundary_hit(score: u32) -> bool {
    index_for_score(score + 1).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TERMINAL_SCORE;

    #[test]
    fn thresholds_are_ascending_multiples_of_ten() {
        let thresholds: Vec<u32> = MILESTONES.iter().map(|m| m.threshold).collect();
        let expected: Vec<u32> = (1..TERMINAL_SCORE / MILESTONE_STEP).map(|k| k * MILESTONE_STEP).collect();
        assert_eq!(thresholds, expected);
        assert_eq!(thresholds, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(index_for_score(10), Some(0));
        assert_eq!(index_for_score(90), Some(8));
        assert_eq!(index_for_score(11), None);
        assert_eq!(index_for_score(100), None);
        assert_eq!(index_for_score(0), None);
    }

    #[test]
    fn boundary_hits_precede_thresholds() {
        assert!(is_boundary_hit(9));
        assert!(is_boundary_hit(89));
        assert!(!is_boundary_hit(10));
        assert!(!is_boundary_hit(99));
    }
}
