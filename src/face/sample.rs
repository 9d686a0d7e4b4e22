use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Device orientation reported alongside a tracking frame. When present, head
/// pose is measured relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Raw blendshape activations in 0..1. Missing keys deserialize as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Blendshapes {
    pub jaw_open: f32,
    pub jaw_forward: f32,
    pub mouth_smile_left: f32,
    pub mouth_smile_right: f32,
    pub mouth_frown_left: f32,
    pub mouth_frown_right: f32,
    pub mouth_stretch_left: f32,
    pub mouth_stretch_right: f32,
    pub mouth_lower_down_left: f32,
    pub mouth_lower_down_right: f32,
    pub mouth_upper_up_left: f32,
    pub mouth_upper_up_right: f32,
    pub mouth_pucker: f32,
    pub mouth_funnel: f32,
    pub mouth_close: f32,
    pub tongue_out: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceSample {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub blendshapes: Blendshapes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraPose>,
}

/// Which face signal drives the lead pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchAxis {
    #[default]
    HeadPitch,
    HeadYaw,
    HeadRoll,
    JawOpen,
}

impl FaceSample {
    /// Head orientation, relative to the camera pose when one is attached.
    pub fn pose_relative(&self) -> Orientation {
        match self.camera {
            Some(cam) => Orientation {
                yaw: self.orientation.yaw - cam.yaw,
                pitch: self.orientation.pitch - cam.pitch,
                roll: self.orientation.roll - cam.roll,
            },
            None => self.orientation,
        }
    }

    pub fn axis_value(&self, axis: PitchAxis) -> f32 {
        let pose = self.pose_relative();
        match axis {
            PitchAxis::HeadPitch => pose.pitch,
            PitchAxis::HeadYaw => pose.yaw,
            PitchAxis::HeadRoll => pose.roll,
            PitchAxis::JawOpen => self.blendshapes.jaw_open,
        }
    }
}
