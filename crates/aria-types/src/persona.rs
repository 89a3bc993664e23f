//! Persona definitions and the static persona registry.
//!
//! A `Persona` maps a logical ID to a default synthesis voice, its default
//! voice parameters, and an optional set of accent-specific alternate voices.
//! The registry is compiled into the binary and is read-only for the process
//! lifetime, so concurrent readers need no synchronization.

use crate::Accent;

/// A named voice profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Persona {
    /// Unique identifier, used as the `personaId` form field.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Character description, also fed to the persona rewrite provider.
    pub description: &'static str,
    /// Default synthesis voice identifier.
    pub voice_id: &'static str,
    /// Default stability (0.0 to 1.0).
    pub stability: f32,
    /// Similarity boost (0.0 to 1.0). Never overridden by request input.
    pub similarity_boost: f32,
    /// Default style exaggeration (0.0 to 1.0).
    pub style: f32,
    /// Default speaking rate (0.7 to 1.3). `None` leaves the provider default.
    pub speaking_rate: Option<f32>,
    /// Accent-specific voice identifiers. Partial: absent accents use `voice_id`.
    pub accent_voices: &'static [(Accent, &'static str)],
}

impl Persona {
    /// Returns the accent-specific voice identifier, if this persona has one.
    pub fn accent_voice(&self, accent: Accent) -> Option<&'static str> {
        self.accent_voices
            .iter()
            .find(|(candidate, _)| *candidate == accent)
            .map(|(_, voice_id)| *voice_id)
    }

    /// Returns the accents this persona has a dedicated voice for.
    pub fn accents(&self) -> impl Iterator<Item = Accent> + '_ {
        self.accent_voices.iter().map(|(accent, _)| *accent)
    }
}

/// Every persona known to this deployment.
pub static PERSONAS: &[Persona] = &[
    Persona {
        id: "calm_narrator",
        name: "Calm Narrator",
        description: "A measured, soothing voice ideal for storytelling and narration.",
        voice_id: "wLOfTh9wT8nrLnLqxfd5",
        stability: 0.80,
        similarity_boost: 0.75,
        style: 0.05,
        speaking_rate: None,
        accent_voices: &[],
    },
    Persona {
        id: "radio_host",
        name: "Radio Host",
        description: "Energetic and punchy, like a live FM broadcast.",
        voice_id: "OQZFQwxzrAUxV46LjHx1",
        stability: 0.55,
        similarity_boost: 0.8,
        style: 0.22,
        speaking_rate: Some(1.03),
        accent_voices: &[
            (Accent::American, "OQZFQwxzrAUxV46LjHx1"),
            (Accent::British, "Om2UWRzFN17pcwpGqlL7"),
            (Accent::Australian, "gmBpaV0BNpfT1EqjI4Dx"),
            (Accent::Indian, "9yJ9vg0nUgNIvv7y2uhu"),
        ],
    },
    Persona {
        id: "elder_storyteller",
        name: "Elder Storyteller",
        description: "Warm and unhurried, carrying decades of wisdom.",
        voice_id: "aJGQwZByOI8Zm1HDZTqc",
        stability: 0.65,
        similarity_boost: 0.70,
        style: 0.25,
        speaking_rate: Some(0.85),
        accent_voices: &[],
    },
    Persona {
        id: "playful_kid",
        name: "Playful Kid",
        description: "Light, bouncy, and full of infectious enthusiasm.",
        voice_id: "7J89xXY66GnQ4VvinF4Q",
        stability: 0.45,
        similarity_boost: 0.70,
        style: 0.60,
        speaking_rate: Some(1.10),
        accent_voices: &[],
    },
];

/// Looks up a persona by its identifier.
pub fn find_persona(id: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|persona| persona.id == id)
}

/// Returns every persona identifier in registry order.
pub fn persona_ids() -> impl Iterator<Item = &'static str> {
    PERSONAS.iter().map(|persona| persona.id)
}
