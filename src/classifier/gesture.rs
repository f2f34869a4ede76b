use crate::landmarks::Finger;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Set of fingers judged extended in one frame.
///
/// Stored as a bit set so equal sets always compare equal and iterate in the
/// canonical thumb-to-pinky order, whatever order they were built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FingerSet(u8);

impl FingerSet {
    pub const EMPTY: FingerSet = FingerSet(0);
    pub const ALL: FingerSet = FingerSet::of(&Finger::ALL);

    const fn bit(finger: Finger) -> u8 {
        1 << finger as u8
    }

    /// Build a set from a list of fingers
    pub const fn of(fingers: &[Finger]) -> FingerSet {
        let mut bits = 0;
        let mut i = 0;
        while i < fingers.len() {
            bits |= Self::bit(fingers[i]);
            i += 1;
        }
        FingerSet(bits)
    }

    pub fn insert(&mut self, finger: Finger) {
        self.0 |= Self::bit(finger);
    }

    pub fn contains(&self, finger: Finger) -> bool {
        self.0 & Self::bit(finger) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Fingers in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Finger> + '_ {
        Finger::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Finger> for FingerSet {
    fn from_iter<I: IntoIterator<Item = Finger>>(iter: I) -> Self {
        let mut set = FingerSet::EMPTY;
        for finger in iter {
            set.insert(finger);
        }
        set
    }
}

impl fmt::Display for FingerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, finger) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", finger)?;
        }
        f.write_str("]")
    }
}

/// Recognized static hand poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gesture {
    Fist,
    OnlyThumbUp,
    OnlyIndexUp,
    OnlyMiddleUp,
    OnlyRingUp,
    OnlyPinkyUp,
    PeaceSign,
    Spiderman,
    AllUp,
}

/// Finger-up set to gesture. Sets not listed have no gesture.
const GESTURE_TABLE: [(FingerSet, Gesture); 9] = [
    (FingerSet::EMPTY, Gesture::Fist),
    (FingerSet::of(&[Finger::Thumb]), Gesture::OnlyThumbUp),
    (FingerSet::of(&[Finger::Index]), Gesture::OnlyIndexUp),
    (FingerSet::of(&[Finger::Middle]), Gesture::OnlyMiddleUp),
    (FingerSet::of(&[Finger::Ring]), Gesture::OnlyRingUp),
    (FingerSet::of(&[Finger::Pinky]), Gesture::OnlyPinkyUp),
    (
        FingerSet::of(&[Finger::Index, Finger::Middle]),
        Gesture::PeaceSign,
    ),
    (
        FingerSet::of(&[Finger::Index, Finger::Pinky]),
        Gesture::Spiderman,
    ),
    (FingerSet::ALL, Gesture::AllUp),
];

impl Gesture {
    pub const ALL: [Gesture; 9] = [
        Gesture::Fist,
        Gesture::OnlyThumbUp,
        Gesture::OnlyIndexUp,
        Gesture::OnlyMiddleUp,
        Gesture::OnlyRingUp,
        Gesture::OnlyPinkyUp,
        Gesture::PeaceSign,
        Gesture::Spiderman,
        Gesture::AllUp,
    ];

    /// Look up the gesture for a finger-up set
    pub fn from_fingers(fingers: FingerSet) -> Option<Gesture> {
        GESTURE_TABLE
            .iter()
            .find(|(key, _)| *key == fingers)
            .map(|(_, gesture)| *gesture)
    }

    /// The finger-up set that produces this gesture
    pub fn fingers(self) -> FingerSet {
        GESTURE_TABLE
            .iter()
            .find(|(_, gesture)| *gesture == self)
            .map(|(key, _)| *key)
            .unwrap_or_default()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Gesture::Fist => "fist",
            Gesture::OnlyThumbUp => "only-thumb-up",
            Gesture::OnlyIndexUp => "only-index-up",
            Gesture::OnlyMiddleUp => "only-middle-up",
            Gesture::OnlyRingUp => "only-ring-up",
            Gesture::OnlyPinkyUp => "only-pinky-up",
            Gesture::PeaceSign => "peace-sign",
            Gesture::Spiderman => "spiderman",
            Gesture::AllUp => "all-up",
        }
    }

    /// Command triggered by this gesture, if any
    pub const fn command(self) -> Option<Command> {
        match self {
            Gesture::OnlyIndexUp => Some(Command::BedroomLightOn),
            Gesture::Fist => Some(Command::BedroomLightOff),
            Gesture::PeaceSign => Some(Command::GarageLightOn),
            Gesture::OnlyPinkyUp => Some(Command::GarageLightOff),
            Gesture::OnlyThumbUp => Some(Command::GarageDoorOpen),
            Gesture::Spiderman => Some(Command::GarageDoorClose),
            Gesture::OnlyMiddleUp | Gesture::OnlyRingUp | Gesture::AllUp => None,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gesture name for a finger-up set, empty when nothing is recognized
pub fn gesture_name(fingers: FingerSet) -> &'static str {
    Gesture::from_fingers(fingers).map_or("", Gesture::name)
}

/// Remote device a command acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    BedroomLight,
    GarageLight,
    GarageDoor,
}

impl Device {
    /// Actuator channel number on the receiving side
    pub const fn channel(self) -> u8 {
        match self {
            Device::BedroomLight => 0,
            Device::GarageLight => 1,
            Device::GarageDoor => 2,
        }
    }
}

/// Home automation commands sent to the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    #[serde(rename = "BL_ON")]
    BedroomLightOn,
    #[serde(rename = "BL_OFF")]
    BedroomLightOff,
    #[serde(rename = "GL_ON")]
    GarageLightOn,
    #[serde(rename = "GL_OFF")]
    GarageLightOff,
    #[serde(rename = "GD_ON")]
    GarageDoorOpen,
    #[serde(rename = "GD_OFF")]
    GarageDoorClose,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::BedroomLightOn,
        Command::BedroomLightOff,
        Command::GarageLightOn,
        Command::GarageLightOff,
        Command::GarageDoorOpen,
        Command::GarageDoorClose,
    ];

    /// Symbolic name published as the message body
    pub const fn name(self) -> &'static str {
        match self {
            Command::BedroomLightOn => "BL_ON",
            Command::BedroomLightOff => "BL_OFF",
            Command::GarageLightOn => "GL_ON",
            Command::GarageLightOff => "GL_OFF",
            Command::GarageDoorOpen => "GD_ON",
            Command::GarageDoorClose => "GD_OFF",
        }
    }

    /// Gesture that triggers this command
    pub const fn gesture(self) -> Gesture {
        match self {
            Command::BedroomLightOn => Gesture::OnlyIndexUp,
            Command::BedroomLightOff => Gesture::Fist,
            Command::GarageLightOn => Gesture::PeaceSign,
            Command::GarageLightOff => Gesture::OnlyPinkyUp,
            Command::GarageDoorOpen => Gesture::OnlyThumbUp,
            Command::GarageDoorClose => Gesture::Spiderman,
        }
    }

    pub const fn device(self) -> Device {
        match self {
            Command::BedroomLightOn | Command::BedroomLightOff => Device::BedroomLight,
            Command::GarageLightOn | Command::GarageLightOff => Device::GarageLight,
            Command::GarageDoorOpen | Command::GarageDoorClose => Device::GarageDoor,
        }
    }

    /// Whether the command switches its device on (or opens it)
    pub const fn is_on(self) -> bool {
        matches!(
            self,
            Command::BedroomLightOn | Command::GarageLightOn | Command::GarageDoorOpen
        )
    }

    /// Human readable action for logs
    pub const fn action(self) -> &'static str {
        match self {
            Command::BedroomLightOn => "Bedroom Light ON",
            Command::BedroomLightOff => "Bedroom Light OFF",
            Command::GarageLightOn => "Garage Light ON",
            Command::GarageLightOff => "Garage Light OFF",
            Command::GarageDoorOpen => "Opening Garage Door",
            Command::GarageDoorClose => "Closing Garage Door",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command: {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Command::ALL
            .into_iter()
            .find(|command| command.name() == trimmed)
            .ok_or_else(|| UnknownCommand(trimmed.to_string()))
    }
}
