use crate::pipeline::domain::LandmarkName;
use indexmap::IndexMap;
use serde::Serialize;

const GENERAL_FEEDBACK: [&str; 2] = ["Breathe deeply and evenly", "Focus on proper alignment"];

/// One angle measurement and the band it has to fall in.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleCheck {
    pub name: &'static str,
    /// (A, B, C) with B as the vertex.
    pub landmarks: (LandmarkName, LandmarkName, LandmarkName),
    pub acceptable_range: (f64, f64),
    pub low_feedback: &'static str,
    pub high_feedback: &'static str,
}

/// Where a measured angle falls relative to its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    Below,
    Within,
    Above,
}

impl AngleCheck {
    pub fn classify(&self, degrees: f64) -> RangeOutcome {
        let (min, max) = self.acceptable_range;
        if degrees < min {
            RangeOutcome::Below
        } else if degrees > max {
            RangeOutcome::Above
        } else {
            RangeOutcome::Within
        }
    }

    pub fn feedback_for(&self, degrees: f64) -> Option<&'static str> {
        match self.classify(degrees) {
            RangeOutcome::Below => Some(self.low_feedback),
            RangeOutcome::Within => None,
            RangeOutcome::Above => Some(self.high_feedback),
        }
    }

    /// Middle of the acceptable band, used where no measurement exists.
    pub fn midpoint(&self) -> f64 {
        let (min, max) = self.acceptable_range;
        (min + max) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoseRule {
    pub pose_id: &'static str,
    pub angle_checks: Vec<AngleCheck>,
    pub static_feedback: Vec<&'static str>,
}

/// Descriptive catalog entry served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseInfo {
    pub display_name: &'static str,
    pub difficulty: &'static str,
    pub benefits: Vec<&'static str>,
    pub instructions: Vec<&'static str>,
}

/// Read-only registry of pose rules, built once at startup and shared.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: IndexMap<&'static str, PoseRule>,
    poses: IndexMap<&'static str, PoseInfo>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleCatalog {
    /// The four configured yoga poses.
    pub fn standard() -> Self {
        use LandmarkName::*;

        let mut rules = IndexMap::new();
        let mut poses = IndexMap::new();

        rules.insert(
            "tree_pose",
            PoseRule {
                pose_id: "tree_pose",
                angle_checks: vec![
                    AngleCheck {
                        name: "left_knee_angle",
                        landmarks: (LeftHip, LeftKnee, LeftAnkle),
                        acceptable_range: (160.0, 180.0),
                        low_feedback: "Bend your knees more for better balance",
                        high_feedback: "Soften your standing knee slightly",
                    },
                    AngleCheck {
                        name: "right_knee_angle",
                        landmarks: (RightHip, RightKnee, RightAnkle),
                        acceptable_range: (160.0, 180.0),
                        low_feedback: "Bend your knees more for better balance",
                        high_feedback: "Soften your standing knee slightly",
                    },
                ],
                static_feedback: vec![
                    "Keep your standing leg strong",
                    "Focus on a fixed point for balance",
                ],
            },
        );
        poses.insert(
            "tree_pose",
            PoseInfo {
                display_name: "Tree Pose (Vrikshasana)",
                difficulty: "Beginner",
                benefits: vec![
                    "Improves balance",
                    "Strengthens legs",
                    "Enhances concentration",
                ],
                instructions: vec![
                    "Stand straight on one leg",
                    "Place the sole of your other foot on the inner thigh or calf of the standing leg",
                    "Bring hands to prayer position at your chest",
                    "Focus on a fixed point straight ahead for better balance",
                    "Hold for 30-60 seconds, then switch legs",
                ],
            },
        );

        rules.insert(
            "warrior_pose",
            PoseRule {
                pose_id: "warrior_pose",
                angle_checks: vec![AngleCheck {
                    name: "front_knee_angle",
                    landmarks: (LeftHip, LeftKnee, LeftAnkle),
                    acceptable_range: (80.0, 100.0),
                    low_feedback: "Bend your front knee more",
                    high_feedback: "Straighten your front knee slightly",
                }],
                static_feedback: vec![
                    "Keep front knee at 90 degrees",
                    "Open your chest and shoulders",
                ],
            },
        );
        poses.insert(
            "warrior_pose",
            PoseInfo {
                display_name: "Warrior Pose (Virabhadrasana)",
                difficulty: "Beginner",
                benefits: vec!["Strengthens legs", "Improves stability", "Stretches hips"],
                instructions: vec![
                    "Stand with feet 3-4 feet apart",
                    "Turn the front foot out 90 degrees and the back foot in slightly",
                    "Bend the front knee to 90 degrees, keeping it aligned with the ankle",
                    "Extend arms parallel to the ground, palms facing down",
                    "Hold for 30-60 seconds, then switch sides",
                ],
            },
        );

        rules.insert(
            "downward_dog",
            PoseRule {
                pose_id: "downward_dog",
                angle_checks: vec![AngleCheck {
                    name: "shoulder_hip_angle",
                    landmarks: (LeftWrist, LeftShoulder, LeftHip),
                    acceptable_range: (160.0, 180.0),
                    low_feedback: "Straighten your back more",
                    high_feedback: "Relax your shoulders slightly",
                }],
                static_feedback: vec![
                    "Press firmly through palms and knuckles",
                    "Engage your core to protect your lower back",
                ],
            },
        );
        poses.insert(
            "downward_dog",
            PoseInfo {
                display_name: "Downward Facing Dog (Adho Mukha Svanasana)",
                difficulty: "Beginner",
                benefits: vec!["Strengthens arms", "Stretches hamstrings", "Calms mind"],
                instructions: vec![
                    "Start on hands and knees in a tabletop position",
                    "Place hands shoulder-width apart, fingers spread wide",
                    "Tuck toes under and lift hips up and back",
                    "Straighten legs as much as comfortable",
                    "Keep head between arms, ears in line with biceps",
                ],
            },
        );

        rules.insert(
            "mountain_pose",
            PoseRule {
                pose_id: "mountain_pose",
                angle_checks: vec![],
                static_feedback: vec![
                    "Stand tall and ground through all four corners of your feet",
                    "Keep your chin parallel to the ground",
                ],
            },
        );
        poses.insert(
            "mountain_pose",
            PoseInfo {
                display_name: "Mountain Pose (Tadasana)",
                difficulty: "Beginner",
                benefits: vec!["Improves posture", "Strengthens legs", "Reduces flat feet"],
                instructions: vec![
                    "Stand with feet together or hip-width apart",
                    "Distribute weight evenly across both feet",
                    "Engage thigh muscles and lengthen your tailbone toward the floor",
                    "Roll shoulders back and down",
                    "Relax arms by your sides and hold for 30-60 seconds",
                ],
            },
        );

        Self { rules, poses }
    }

    pub fn rule(&self, pose_id: &str) -> Option<&PoseRule> {
        self.rules.get(pose_id)
    }

    /// Checks to run for a pose. Unknown poses get none rather than an error.
    pub fn checks_for(&self, pose_id: &str) -> &[AngleCheck] {
        self.rule(pose_id)
            .map(|rule| rule.angle_checks.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_known(&self, pose_id: &str) -> bool {
        self.rules.contains_key(pose_id)
    }

    pub fn supported_poses(&self) -> &IndexMap<&'static str, PoseInfo> {
        &self.poses
    }

    /// Image-independent advice for a pose, with generic advice for unknown ids.
    pub fn static_feedback(&self, pose_id: &str) -> Vec<String> {
        match self.rule(pose_id) {
            Some(rule) if !rule.static_feedback.is_empty() => {
                rule.static_feedback.iter().map(|s| s.to_string()).collect()
            }
            _ => GENERAL_FEEDBACK.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The single hint a degraded verdict carries. Always the same text for a given pose.
    pub fn hint_for(&self, pose_id: &str) -> String {
        match self.checks_for(pose_id).first() {
            Some(check) => check.low_feedback.to_string(),
            None => self
                .static_feedback(pose_id)
                .into_iter()
                .next()
                .unwrap_or_else(|| GENERAL_FEEDBACK[0].to_string()),
        }
    }

    /// Band midpoints for each check, reported when nothing was measured.
    pub fn placeholder_angles(&self, pose_id: &str) -> IndexMap<String, f64> {
        self.checks_for(pose_id)
            .iter()
            .map(|check| (check.name.to_string(), check.midpoint()))
            .collect()
    }
}
