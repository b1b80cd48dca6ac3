//! The single entry point for mutating a `BotConfiguration`.
//!
//! Accepted configurations satisfy: branding follows the plan, numbers sit inside their ranges,
//! snippet ids are unique, and a draft only goes live when both bubble pairs pass AA contrast.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::contrast::ContrastReport;
use crate::domain::appearance::{
    CORNER_RADIUS_RANGE, FONT_SIZE_RANGE, MESSAGE_SPACING_RANGE, OFFSET_RANGE, Z_INDEX_RANGE,
};
use crate::domain::behavior::{
    MAX_ANSWER_LENGTH_RANGE, MAX_TOKENS_RANGE, PENALTY_RANGE, TEMPERATURE_RANGE, TOP_P_RANGE,
};
use crate::domain::bot::{BotConfiguration, Status};
use crate::domain::snippet;
use crate::errors::{DomainError, ValidationError};
use crate::patch::{clamp_float, clamp_int, ConfigPatch};

pub fn apply(
    config: &BotConfiguration,
    patch: ConfigPatch,
) -> Result<BotConfiguration, DomainError> {
    apply_at(config, patch, Utc::now())
}

pub fn apply_at(
    config: &BotConfiguration,
    patch: ConfigPatch,
    now: DateTime<Utc>,
) -> Result<BotConfiguration, DomainError> {
    let mut candidate = config.clone();
    if let Err(error) = patch.merge_into(&mut candidate) {
        warn!(
            event_name = "config.patch.rejected",
            bot_id = %config.id,
            error = %error,
            "configuration patch rejected"
        );
        return Err(error.into());
    }
    accept_at(config, candidate, now)
}

pub fn accept(
    previous: &BotConfiguration,
    candidate: BotConfiguration,
) -> Result<BotConfiguration, DomainError> {
    accept_at(previous, candidate, Utc::now())
}

/// Validates a candidate produced from `previous` by any means (patch, preset, snippet edit).
pub fn accept_at(
    previous: &BotConfiguration,
    mut candidate: BotConfiguration,
    now: DateTime<Utc>,
) -> Result<BotConfiguration, DomainError> {
    candidate.id = previous.id.clone();
    candidate.created_date = previous.created_date;

    let result = normalize(&mut candidate).and_then(|()| check_publish_gate(previous, &candidate));
    if let Err(error) = result {
        warn!(
            event_name = "config.patch.rejected",
            bot_id = %previous.id,
            error = %error,
            "configuration change rejected"
        );
        return Err(error);
    }

    if previous.settings.status != candidate.settings.status {
        info!(
            event_name = "config.status.changed",
            bot_id = %candidate.id,
            from = %previous.settings.status,
            to = %candidate.settings.status,
            "bot status changed"
        );
    }

    candidate.last_updated = now;
    Ok(candidate)
}

/// Re-establishes the structural invariants without judging transitions. Also used on documents
/// loaded from storage.
pub fn normalize(config: &mut BotConfiguration) -> Result<(), DomainError> {
    enforce_ranges(config)?;
    config.branding.show_branding = config.settings.plan.requires_branding();
    snippet::ensure_unique_ids(&config.snippets)
}

fn enforce_ranges(config: &mut BotConfiguration) -> Result<(), ValidationError> {
    let safety = &mut config.safety_settings;
    safety.max_answer_length = clamp_int(
        "safetySettings.maxAnswerLength",
        safety.max_answer_length.into(),
        &MAX_ANSWER_LENGTH_RANGE,
    )?;

    let llm = &mut config.llm_controls;
    llm.temperature = clamp_float("llmControls.temperature", llm.temperature, &TEMPERATURE_RANGE)?;
    llm.top_p = clamp_float("llmControls.topP", llm.top_p, &TOP_P_RANGE)?;
    llm.max_tokens = clamp_int("llmControls.maxTokens", llm.max_tokens.into(), &MAX_TOKENS_RANGE)?;
    llm.frequency_penalty =
        clamp_float("llmControls.frequencyPenalty", llm.frequency_penalty, &PENALTY_RANGE)?;
    llm.presence_penalty =
        clamp_float("llmControls.presencePenalty", llm.presence_penalty, &PENALTY_RANGE)?;

    let appearance = &mut config.appearance;
    appearance.corner_radius = clamp_int(
        "appearance.cornerRadius",
        appearance.corner_radius.into(),
        &CORNER_RADIUS_RANGE,
    )?;
    appearance.font_size =
        clamp_int("appearance.fontSize", appearance.font_size.into(), &FONT_SIZE_RANGE)?;
    appearance.message_spacing = clamp_int(
        "appearance.messageSpacing",
        appearance.message_spacing.into(),
        &MESSAGE_SPACING_RANGE,
    )?;

    let position = &mut config.position;
    position.offset_x = clamp_int("position.offsetX", position.offset_x.into(), &OFFSET_RANGE)?;
    position.offset_y = clamp_int("position.offsetY", position.offset_y.into(), &OFFSET_RANGE)?;
    position.z_index = clamp_int("position.zIndex", position.z_index.into(), &Z_INDEX_RANGE)?;
    position.mobile_offset_x =
        clamp_int("position.mobileOffsetX", position.mobile_offset_x.into(), &OFFSET_RANGE)?;
    position.mobile_offset_y =
        clamp_int("position.mobileOffsetY", position.mobile_offset_y.into(), &OFFSET_RANGE)?;

    Ok(())
}

/// Only draft -> live is gated; every other transition passes.
fn check_publish_gate(
    previous: &BotConfiguration,
    candidate: &BotConfiguration,
) -> Result<(), DomainError> {
    let publishing =
        previous.settings.status == Status::Draft && candidate.settings.status == Status::Live;
    if !publishing {
        return Ok(());
    }

    let report = ContrastReport::for_appearance(&candidate.appearance);
    match report.first_failure() {
        Some(failure) => {
            warn!(
                event_name = "config.publish.blocked",
                bot_id = %candidate.id,
                pair = %failure.pair,
                ratio = failure.ratio,
                "publish blocked by insufficient contrast"
            );
            Err(DomainError::AccessibilityGateFailed { pair: failure.pair, ratio: failure.ratio })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{accept_at, apply_at};
    use crate::domain::bot::{BotConfiguration, BotId, Plan, Status};
    use crate::domain::color::HexColor;
    use crate::domain::snippet::Snippet;
    use crate::errors::{ContrastPair, DomainError};
    use crate::patch::{AppearancePatch, ConfigPatch, SettingsPatch};

    fn base() -> BotConfiguration {
        let created = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).single().expect("valid timestamp");
        BotConfiguration::new_at(BotId("bot-validator".to_string()), "Validator", created)
    }

    fn colours(bubble: &str, text: &str) -> ConfigPatch {
        ConfigPatch {
            appearance: Some(AppearancePatch {
                user_bubble_color: Some(HexColor::parse(bubble).expect("valid")),
                user_text_color: Some(HexColor::parse(text).expect("valid")),
                ..AppearancePatch::default()
            }),
            ..ConfigPatch::default()
        }
    }

    #[test]
    fn plan_rewrites_branding_regardless_of_prior_state() {
        let now = Utc::now();
        for plan in Plan::ALL {
            for prior in [true, false] {
                let mut config = base();
                config.branding.show_branding = prior;
                let updated =
                    apply_at(&config, ConfigPatch::plan(*plan), now).expect("plan change");
                assert_eq!(updated.branding.show_branding, *plan == Plan::Launch, "{plan} {prior}");
            }
        }
    }

    #[test]
    fn publish_with_identical_colours_is_blocked() {
        let config = apply_at(&base(), colours("#FFFFFF", "#FFFFFF"), Utc::now()).expect("edit");
        let error = apply_at(&config, ConfigPatch::status(Status::Live), Utc::now())
            .expect_err("gate should block");

        assert_eq!(
            error,
            DomainError::AccessibilityGateFailed { pair: ContrastPair::UserBubble, ratio: 1.0 }
        );
    }

    #[test]
    fn publish_with_black_on_white_succeeds() {
        let config = apply_at(&base(), colours("#000000", "#FFFFFF"), Utc::now()).expect("edit");
        let live =
            apply_at(&config, ConfigPatch::status(Status::Live), Utc::now()).expect("publish");
        assert_eq!(live.settings.status, Status::Live);
    }

    #[test]
    fn gate_checks_colours_in_the_same_patch() {
        let mut patch = colours("#EEEEEE", "#FFFFFF");
        patch.settings =
            Some(SettingsPatch { status: Some(Status::Live), ..SettingsPatch::default() });

        let error = apply_at(&base(), patch, Utc::now()).expect_err("low contrast publish");
        assert!(matches!(error, DomainError::AccessibilityGateFailed { .. }));
    }

    #[test]
    fn live_edits_and_unpublish_are_not_gated() {
        let live =
            apply_at(&base(), ConfigPatch::status(Status::Live), Utc::now()).expect("publish");
        let edited = apply_at(&live, colours("#FFFFFF", "#FFFFFF"), Utc::now()).expect("live edit");
        let draft =
            apply_at(&edited, ConfigPatch::status(Status::Draft), Utc::now()).expect("unpublish");

        assert_eq!(draft.settings.status, Status::Draft);
    }

    #[test]
    fn accepted_mutation_stamps_last_updated_and_keeps_identity() {
        let config = base();
        let later = config.last_updated + Duration::minutes(5);
        let mut candidate = config.clone();
        candidate.id = BotId("hijacked".to_string());
        candidate.name = "Renamed".to_string();

        let accepted = accept_at(&config, candidate, later).expect("accept");

        assert_eq!(accepted.last_updated, later);
        assert_eq!(accepted.id, config.id);
        assert_eq!(accepted.created_date, config.created_date);
    }

    #[test]
    fn rejected_patch_leaves_input_unchanged() {
        let config = base();
        let patch = ConfigPatch {
            snippets: Some(vec![Snippet::new("a", "A", ""), Snippet::new("a", "B", "")]),
            ..ConfigPatch::default()
        };

        let error = apply_at(&config, patch, Utc::now()).expect_err("duplicate ids");
        assert_eq!(error, DomainError::DuplicateSnippetId("a".to_string()));
        assert!(config.snippets.is_empty());
    }

    #[test]
    fn out_of_range_candidate_is_clamped_on_accept() {
        let config = base();
        let mut candidate = config.clone();
        candidate.appearance.corner_radius = 60;
        candidate.llm_controls.top_p = 0.0;

        let accepted = accept_at(&config, candidate, Utc::now()).expect("accept");
        assert_eq!(accepted.appearance.corner_radius, 24);
        assert_eq!(accepted.llm_controls.top_p, 0.1);
    }
}
