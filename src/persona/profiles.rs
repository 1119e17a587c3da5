//! Built-in persona profiles.
//!
//! The prompt bodies live under `data/personas/` so revisions show up as data
//! diffs, not code diffs.

use std::sync::LazyLock;

use super::PersonaProfile;

const GUIDE_SYSTEM: &str = include_str!("../../data/personas/guide_system.txt");
const GUIDE_ACK: &str = include_str!("../../data/personas/guide_ack.txt");
const STAGED_SYSTEM: &str = include_str!("../../data/personas/staged_system.txt");
const STAGED_ACK: &str = include_str!("../../data/personas/staged_ack.txt");

/// Single-shot profile: five-question intake, then the full guide in one reply.
pub static GUIDE: LazyLock<PersonaProfile> = LazyLock::new(|| PersonaProfile {
    name: "guide".to_string(),
    version: "2026-08".to_string(),
    system_prompt: GUIDE_SYSTEM.trim_end().to_string(),
    acknowledgment: GUIDE_ACK.trim_end().to_string(),
});

/// Staged profile: same intake, deliverable served one section per reply.
pub static STAGED: LazyLock<PersonaProfile> = LazyLock::new(|| PersonaProfile {
    name: "staged".to_string(),
    version: "2026-08".to_string(),
    system_prompt: STAGED_SYSTEM.trim_end().to_string(),
    acknowledgment: STAGED_ACK.trim_end().to_string(),
});

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION_ORDER: &[&str] = &[
        "Legal & Business Formation",
        "Licensing",
        "Kitchen Setup",
        "Branding",
        "Marketing",
        "Distribution",
        "Scaling",
    ];

    #[test]
    fn test_profiles_are_non_empty() {
        assert!(!GUIDE.system_prompt.is_empty());
        assert!(!GUIDE.acknowledgment.is_empty());
        assert!(!STAGED.system_prompt.is_empty());
        assert!(!STAGED.acknowledgment.is_empty());
    }

    #[test]
    fn test_both_profiles_carry_the_guide_marker() {
        assert!(GUIDE.system_prompt.contains("### Guide:"));
        assert!(STAGED.system_prompt.contains("### Guide:"));
    }

    #[test]
    fn test_guide_sections_appear_in_mandated_order() {
        for profile in [&*GUIDE, &*STAGED] {
            let mut last = 0;
            for section in SECTION_ORDER {
                let pos = profile
                    .system_prompt
                    .find(section)
                    .unwrap_or_else(|| panic!("{} missing section {}", profile.name, section));
                assert!(pos > last, "{}: section {} out of order", profile.name, section);
                last = pos;
            }
        }
    }

    #[test]
    fn test_intake_questions_present() {
        for needle in ["type of food product", "city, state/province, and country", "home kitchen or a commercial kitchen", "timeline", "concept"] {
            assert!(GUIDE.system_prompt.contains(needle), "guide missing: {}", needle);
            assert!(STAGED.system_prompt.contains(needle), "staged missing: {}", needle);
        }
    }

    #[test]
    fn test_staged_delivers_one_section_per_reply() {
        assert!(STAGED.system_prompt.contains("ONE SECTION PER REPLY"));
    }
}
