/// A named voice preset offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicePreset {
    /// Short identifier accepted on the command line.
    pub slug: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// ElevenLabs voice id sent in the request path.
    pub voice_id: &'static str,
}

/// The built-in voice catalog. The first entry is the default voice.
pub const VOICE_CATALOG: &[VoicePreset] = &[
    VoicePreset {
        slug: "bella",
        label: "Bella (female)",
        voice_id: "21m00Tcm4TlvDq8ikWAM",
    },
    VoicePreset {
        slug: "thomas",
        label: "Thomas (male)",
        voice_id: "TxGEqnHWrfWFTfGW9XjX",
    },
    VoicePreset {
        slug: "bradford",
        label: "Bradford (British)",
        voice_id: "EXAVITQu4vr4xnSDxMaL",
    },
    VoicePreset {
        slug: "custom-1",
        label: "Custom 1",
        voice_id: "DvG3I1kDzdBY3u4EzYh6",
    },
    VoicePreset {
        slug: "soft-female",
        label: "Soft female",
        voice_id: "7uqEZLMssORVvKMLEUi4",
    },
];

pub fn default_voice() -> &'static VoicePreset {
    &VOICE_CATALOG[0]
}

/// Look up a preset by slug, ignoring case.
pub fn find_voice(slug: &str) -> Option<&'static VoicePreset> {
    VOICE_CATALOG
        .iter()
        .find(|v| v.slug.eq_ignore_ascii_case(slug))
}

/// Resolve a slug to its voice id. Anything that is not a known slug is
/// taken to be a raw voice id and returned unchanged.
pub fn resolve_voice(slug_or_id: &str) -> String {
    match find_voice(slug_or_id) {
        Some(preset) => preset.voice_id.to_string(),
        None => {
            log::debug!("{slug_or_id:?} is not a catalog voice, using it as a voice id");
            slug_or_id.to_string()
        }
    }
}
