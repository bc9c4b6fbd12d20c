use serde::{Deserialize, Serialize};

/// Keypoints of the 33-point body model, in detector output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkName {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl LandmarkName {
    pub const COUNT: usize = 33;

    pub const ALL: [LandmarkName; Self::COUNT] = [
        LandmarkName::Nose,
        LandmarkName::LeftEyeInner,
        LandmarkName::LeftEye,
        LandmarkName::LeftEyeOuter,
        LandmarkName::RightEyeInner,
        LandmarkName::RightEye,
        LandmarkName::RightEyeOuter,
        LandmarkName::LeftEar,
        LandmarkName::RightEar,
        LandmarkName::MouthLeft,
        LandmarkName::MouthRight,
        LandmarkName::LeftShoulder,
        LandmarkName::RightShoulder,
        LandmarkName::LeftElbow,
        LandmarkName::RightElbow,
        LandmarkName::LeftWrist,
        LandmarkName::RightWrist,
        LandmarkName::LeftPinky,
        LandmarkName::RightPinky,
        LandmarkName::LeftIndex,
        LandmarkName::RightIndex,
        LandmarkName::LeftThumb,
        LandmarkName::RightThumb,
        LandmarkName::LeftHip,
        LandmarkName::RightHip,
        LandmarkName::LeftKnee,
        LandmarkName::RightKnee,
        LandmarkName::LeftAnkle,
        LandmarkName::RightAnkle,
        LandmarkName::LeftHeel,
        LandmarkName::RightHeel,
        LandmarkName::LeftFootIndex,
        LandmarkName::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkName::Nose => "NOSE",
            LandmarkName::LeftEyeInner => "LEFT_EYE_INNER",
            LandmarkName::LeftEye => "LEFT_EYE",
            LandmarkName::LeftEyeOuter => "LEFT_EYE_OUTER",
            LandmarkName::RightEyeInner => "RIGHT_EYE_INNER",
            LandmarkName::RightEye => "RIGHT_EYE",
            LandmarkName::RightEyeOuter => "RIGHT_EYE_OUTER",
            LandmarkName::LeftEar => "LEFT_EAR",
            LandmarkName::RightEar => "RIGHT_EAR",
            LandmarkName::MouthLeft => "MOUTH_LEFT",
            LandmarkName::MouthRight => "MOUTH_RIGHT",
            LandmarkName::LeftShoulder => "LEFT_SHOULDER",
            LandmarkName::RightShoulder => "RIGHT_SHOULDER",
            LandmarkName::LeftElbow => "LEFT_ELBOW",
            LandmarkName::RightElbow => "RIGHT_ELBOW",
            LandmarkName::LeftWrist => "LEFT_WRIST",
            LandmarkName::RightWrist => "RIGHT_WRIST",
            LandmarkName::LeftPinky => "LEFT_PINKY",
            LandmarkName::RightPinky => "RIGHT_PINKY",
            LandmarkName::LeftIndex => "LEFT_INDEX",
            LandmarkName::RightIndex => "RIGHT_INDEX",
            LandmarkName::LeftThumb => "LEFT_THUMB",
            LandmarkName::RightThumb => "RIGHT_THUMB",
            LandmarkName::LeftHip => "LEFT_HIP",
            LandmarkName::RightHip => "RIGHT_HIP",
            LandmarkName::LeftKnee => "LEFT_KNEE",
            LandmarkName::RightKnee => "RIGHT_KNEE",
            LandmarkName::LeftAnkle => "LEFT_ANKLE",
            LandmarkName::RightAnkle => "RIGHT_ANKLE",
            LandmarkName::LeftHeel => "LEFT_HEEL",
            LandmarkName::RightHeel => "RIGHT_HEEL",
            LandmarkName::LeftFootIndex => "LEFT_FOOT_INDEX",
            LandmarkName::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }
}

/// One detected keypoint. Coordinates are normalized to the image, `visibility` is in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

impl Landmark {
    pub fn new(name: LandmarkName, x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            name: name.as_str().to_string(),
            x,
            y,
            z,
            visibility: visibility.clamp(0.0, 1.0),
        }
    }

    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// The landmark set a provider returns for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEstimate {
    landmarks: Vec<Landmark>,
}

impl PoseEstimate {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn into_landmarks(self) -> Vec<Landmark> {
        self.landmarks
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn find(&self, name: LandmarkName) -> Option<&Landmark> {
        let wanted = name.as_str();
        self.landmarks
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(wanted))
    }

    /// Mean visibility over all landmarks, 0 when empty.
    pub fn mean_visibility(&self) -> f64 {
        if self.landmarks.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .landmarks
            .iter()
            .map(|l| l.visibility.clamp(0.0, 1.0))
            .sum();
        (sum / self.landmarks.len() as f64).clamp(0.0, 1.0)
    }
}
