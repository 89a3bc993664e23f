//! Voice selection and parameter resolution for a persona.
//!
//! Settings are layered in a fixed order: persona defaults, then request
//! overrides, then smoothing rules. Smoothing rules always win, including
//! over an explicit override.

use aria_types::{Accent, Persona, ResolvedVoiceSettings, VoiceOverrides};

/// Stability floor for the American radio host voice.
pub const RADIO_HOST_STABILITY_FLOOR: f32 = 0.62;
/// Style ceiling for the American radio host voice.
pub const RADIO_HOST_STYLE_CEILING: f32 = 0.15;
/// Speaking rate ceiling for the American radio host voice.
pub const RADIO_HOST_SPEAKING_RATE_CEILING: f32 = 1.0;

/// Voice identifier plus final parameters for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSelection {
    pub voice_id: &'static str,
    pub settings: ResolvedVoiceSettings,
}

/// A persona/accent-specific post-adjustment.
///
/// Rules exist for voices that produce audible artifacts at some parameter
/// combinations. They run after overrides, in table order.
#[derive(Clone, Copy)]
pub struct SmoothingRule {
    /// Name used in logs.
    pub name: &'static str,
    pub applies: fn(&str, Accent) -> bool,
    pub adjust: fn(ResolvedVoiceSettings) -> ResolvedVoiceSettings,
}

impl std::fmt::Debug for SmoothingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmoothingRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn is_american_radio_host(persona_id: &str, accent: Accent) -> bool {
    persona_id == "radio_host" && accent == Accent::American
}

// The American radio host voice distorts at low stability and high style.
fn smooth_american_radio_host(settings: ResolvedVoiceSettings) -> ResolvedVoiceSettings {
    ResolvedVoiceSettings {
        stability: settings.stability.max(RADIO_HOST_STABILITY_FLOOR),
        style: settings.style.min(RADIO_HOST_STYLE_CEILING),
        speaking_rate: settings
            .speaking_rate
            .map(|rate| rate.min(RADIO_HOST_SPEAKING_RATE_CEILING)),
        ..settings
    }
}

/// Smoothing rules applied to every request.
pub static SMOOTHING_RULES: &[SmoothingRule] = &[SmoothingRule {
    name: "radio_host/american",
    applies: is_american_radio_host,
    adjust: smooth_american_radio_host,
}];

/// Returns the persona's voice for `accent`, or its default voice.
pub fn resolve_voice_id(persona: &Persona, accent: Accent) -> &'static str {
    persona.accent_voice(accent).unwrap_or(persona.voice_id)
}

/// Persona defaults before any request input is considered.
pub fn base_settings(persona: &Persona) -> ResolvedVoiceSettings {
    ResolvedVoiceSettings {
        stability: persona.stability,
        similarity_boost: persona.similarity_boost,
        style: persona.style,
        speaking_rate: persona.speaking_rate,
    }
}

/// Replaces each base value that has a request override.
///
/// Similarity boost has no override and always keeps the base value.
pub fn apply_overrides(
    base: ResolvedVoiceSettings,
    overrides: &VoiceOverrides,
) -> ResolvedVoiceSettings {
    ResolvedVoiceSettings {
        stability: overrides.stability.unwrap_or(base.stability),
        similarity_boost: base.similarity_boost,
        style: overrides.style.unwrap_or(base.style),
        speaking_rate: overrides.speaking_rate.or(base.speaking_rate),
    }
}

/// Runs every matching rule in `rules`, in order.
pub fn apply_smoothing(
    rules: &[SmoothingRule],
    persona_id: &str,
    accent: Accent,
    settings: ResolvedVoiceSettings,
) -> ResolvedVoiceSettings {
    rules
        .iter()
        .filter(|rule| (rule.applies)(persona_id, accent))
        .fold(settings, |current, rule| {
            let adjusted = (rule.adjust)(current);
            if adjusted != current {
                tracing::debug!(
                    rule = rule.name,
                    persona = persona_id,
                    accent = accent.as_str(),
                    "smoothing rule adjusted voice settings"
                );
            }
            adjusted
        })
}

/// Resolves voice and settings against a custom rule table.
pub fn resolve_voice_with(
    rules: &[SmoothingRule],
    persona: &Persona,
    accent: Accent,
    overrides: &VoiceOverrides,
) -> VoiceSelection {
    let settings = apply_overrides(base_settings(persona), overrides);
    let settings = apply_smoothing(rules, persona.id, accent, settings);
    debug_assert!(settings.in_range(), "resolved settings out of range: {settings:?}");

    VoiceSelection {
        voice_id: resolve_voice_id(persona, accent),
        settings,
    }
}

/// Resolves voice and settings using [`SMOOTHING_RULES`].
pub fn resolve_voice(
    persona: &Persona,
    accent: Accent,
    overrides: &VoiceOverrides,
) -> VoiceSelection {
    resolve_voice_with(SMOOTHING_RULES, persona, accent, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aria_types::{find_persona, PERSONAS};

    fn persona(id: &str) -> &'static Persona {
        find_persona(id).expect("persona should exist")
    }

    #[test]
    fn voice_id_uses_accent_map_then_default() {
        for persona in PERSONAS {
            for accent in Accent::ALL {
                let expected = persona.accent_voice(accent).unwrap_or(persona.voice_id);
                assert_eq!(resolve_voice_id(persona, accent), expected);
                // Same inputs, same answer.
                assert_eq!(resolve_voice_id(persona, accent), resolve_voice_id(persona, accent));
            }
        }
        assert_eq!(
            resolve_voice_id(persona("radio_host"), Accent::Indian),
            "9yJ9vg0nUgNIvv7y2uhu"
        );
        assert_eq!(
            resolve_voice_id(persona("playful_kid"), Accent::Indian),
            persona("playful_kid").voice_id
        );
    }

    #[test]
    fn no_overrides_yields_persona_defaults() {
        let narrator = persona("calm_narrator");
        let selection = resolve_voice(narrator, Accent::default(), &VoiceOverrides::default());
        assert_eq!(selection.settings, base_settings(narrator));
        assert_eq!(selection.voice_id, narrator.voice_id);
        assert_eq!(selection.settings.speaking_rate, None);
    }

    #[test]
    fn overrides_replace_defaults_except_similarity_boost() {
        let overrides = VoiceOverrides {
            style: Some(0.4),
            stability: Some(0.3),
            speaking_rate: Some(0.9),
        };
        for persona in PERSONAS {
            // British has no smoothing rule for any shipped persona.
            let settings = resolve_voice(persona, Accent::British, &overrides).settings;
            assert_eq!(settings.style, 0.4, "{}", persona.id);
            assert_eq!(settings.stability, 0.3, "{}", persona.id);
            assert_eq!(settings.speaking_rate, Some(0.9), "{}", persona.id);
            assert_eq!(settings.similarity_boost, persona.similarity_boost, "{}", persona.id);
        }
    }

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let kid = persona("playful_kid");
        let overrides = VoiceOverrides {
            style: Some(0.1),
            ..Default::default()
        };
        let settings = resolve_voice(kid, Accent::American, &overrides).settings;
        assert_eq!(settings.style, 0.1);
        assert_eq!(settings.stability, kid.stability);
        assert_eq!(settings.speaking_rate, kid.speaking_rate);
    }

    #[test]
    fn american_radio_host_is_smoothed_over_overrides() {
        let overrides = VoiceOverrides {
            style: Some(0.9),
            stability: Some(0.1),
            speaking_rate: Some(1.3),
        };
        let selection = resolve_voice(persona("radio_host"), Accent::American, &overrides);
        assert!(selection.settings.stability >= RADIO_HOST_STABILITY_FLOOR);
        assert!(selection.settings.style <= RADIO_HOST_STYLE_CEILING);
        assert_eq!(
            selection.settings.speaking_rate,
            Some(RADIO_HOST_SPEAKING_RATE_CEILING)
        );
        assert_eq!(selection.voice_id, "OQZFQwxzrAUxV46LjHx1");
    }

    #[test]
    fn american_radio_host_defaults_are_smoothed() {
        let settings =
            resolve_voice(persona("radio_host"), Accent::American, &VoiceOverrides::default())
                .settings;
        assert_eq!(settings.stability, RADIO_HOST_STABILITY_FLOOR);
        assert_eq!(settings.style, RADIO_HOST_STYLE_CEILING);
        assert_eq!(settings.speaking_rate, Some(RADIO_HOST_SPEAKING_RATE_CEILING));
        assert_eq!(settings.similarity_boost, 0.8);
    }

    #[test]
    fn smoothing_does_not_loosen_values_already_inside_bounds() {
        let overrides = VoiceOverrides {
            style: Some(0.05),
            stability: Some(0.9),
            speaking_rate: Some(0.8),
        };
        let settings = resolve_voice(persona("radio_host"), Accent::American, &overrides).settings;
        assert_eq!(settings.style, 0.05);
        assert_eq!(settings.stability, 0.9);
        assert_eq!(settings.speaking_rate, Some(0.8));
    }

    #[test]
    fn other_radio_host_accents_are_not_smoothed() {
        let overrides = VoiceOverrides {
            style: Some(0.9),
            stability: Some(0.1),
            speaking_rate: None,
        };
        let settings = resolve_voice(persona("radio_host"), Accent::British, &overrides).settings;
        assert_eq!(settings.stability, 0.1);
        assert_eq!(settings.style, 0.9);
    }

    #[test]
    fn rules_apply_in_table_order() {
        fn always(_: &str, _: Accent) -> bool {
            true
        }
        fn style_to_half(s: ResolvedVoiceSettings) -> ResolvedVoiceSettings {
            ResolvedVoiceSettings { style: 0.5, ..s }
        }
        fn cap_style(s: ResolvedVoiceSettings) -> ResolvedVoiceSettings {
            ResolvedVoiceSettings {
                style: s.style.min(0.2),
                ..s
            }
        }
        let rules = [
            SmoothingRule {
                name: "half",
                applies: always,
                adjust: style_to_half,
            },
            SmoothingRule {
                name: "cap",
                applies: always,
                adjust: cap_style,
            },
        ];
        let selection = resolve_voice_with(
            &rules,
            persona("playful_kid"),
            Accent::American,
            &VoiceOverrides::default(),
        );
        assert_eq!(selection.settings.style, 0.2);
    }

    #[test]
    fn every_combination_stays_in_range() {
        let samples = [None, Some(0.0), Some(0.5), Some(1.0)];
        let rates = [None, Some(0.7), Some(1.0), Some(1.3)];
        for persona in PERSONAS {
            for accent in Accent::ALL {
                for style in samples {
                    for stability in samples {
                        for speaking_rate in rates {
                            let overrides = VoiceOverrides {
                                style,
                                stability,
                                speaking_rate,
                            };
                            let selection = resolve_voice(persona, accent, &overrides);
                            assert!(selection.settings.in_range(), "{:?}", selection);
                        }
                    }
                }
            }
        }
    }
}
