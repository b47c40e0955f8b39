//! Pain (urgency) sub-score, per track

use crate::algorithm::scoring::curves::round1;
use crate::algorithm::scoring::gate::SignalDecision;
use crate::algorithm::scoring::text::percent1;
use crate::models::{OrgEnrichedRecord, PainBreakdown, ScoringTrack};

/// Pain never exceeds this
pub const MAX_PAIN: f64 = 40.0;
/// Psych volume above which the behavioral volume bonus applies
pub const PSYCH_BONUS_VOLUME: f64 = 500.0;
/// Margin below which post-acute pain ramps up
pub const LOW_MARGIN: f64 = 0.05;

/// Pain breakdown with its rationale and confidence contribution
#[derive(Debug, Clone, PartialEq)]
pub struct PainScore {
    pub breakdown: PainBreakdown,
    pub reasoning: Vec<String>,
    pub confidence: u32,
}

/// Score pain for the record's track
#[must_use]
pub fn score_pain(record: &OrgEnrichedRecord, track: ScoringTrack, decision: &SignalDecision) -> PainScore {
    match track {
        ScoringTrack::Behavioral => behavioral_pain(record, decision),
        ScoringTrack::PostAcute => post_acute_pain(record),
        ScoringTrack::Ambulatory => ambulatory_pain(decision),
    }
}

fn behavioral_pain(record: &OrgEnrichedRecord, decision: &SignalDecision) -> PainScore {
    let psych = &decision.psych_risk;
    let mut reasoning = vec![format!("+{:.1}pts: {}", psych.points, psych.reason)];
    let mut pain = psych.points;
    let mut bonus = 0.0;

    if let Some(psych_codes) = record.total_psych_codes.filter(|&n| n > PSYCH_BONUS_VOLUME) {
        bonus = (psych_codes / 1_000.0 * 5.0).min(5.0);
        pain = (pain + bonus).min(MAX_PAIN);
        reasoning.push(format!(
            "+{bonus:.1}pts: High psych volume ({} codes) = documentation lift",
            psych_codes.trunc()
        ));
    }

    PainScore {
        breakdown: PainBreakdown {
            total: round1(pain),
            therapy: psych.points,
            undercoding: decision.undercoding.points,
            psych_volume_bonus: bonus,
            ..PainBreakdown::default()
        },
        reasoning,
        confidence: if pain >= 20.0 { 40 } else { 0 },
    }
}

fn post_acute_pain(record: &OrgEnrichedRecord) -> PainScore {
    let (pain, reason, confidence) = match record.net_margin {
        Some(margin) if margin < 0.0 => (
            MAX_PAIN,
            format!("+40pts: Negative margin ({})", percent1(margin)),
            30,
        ),
        Some(margin) if margin < LOW_MARGIN => {
            let pain = round1(25.0 + (LOW_MARGIN - margin) / LOW_MARGIN * 15.0);
            (pain, format!("+{pain:.1}pts: Low margin ({})", percent1(margin)), 30)
        }
        Some(margin) => (
            15.0,
            format!("+15pts: Stable margin ({})", percent1(margin)),
            30,
        ),
        None => (10.0, "+10pts: No margin data".to_string(), 0),
    };

    PainScore {
        breakdown: PainBreakdown {
            total: pain,
            margin: pain,
            ..PainBreakdown::default()
        },
        reasoning: vec![reason],
        confidence,
    }
}

fn ambulatory_pain(decision: &SignalDecision) -> PainScore {
    let undercoding = &decision.undercoding;
    let mut reasoning = Vec::with_capacity(3);

    let mut pain = if decision.therapy_dominates() {
        reasoning.push(format!(
            "+{:.1}pts: {} (therapy coding dominates)",
            decision.gated_therapy, decision.psych_risk.reason
        ));
        reasoning.push(format!(
            "  (Alternative: {:.1}pts E&M undercoding)",
            undercoding.points
        ));
        decision.gated_therapy
    } else {
        reasoning.push(format!("+{:.1}pts: {}", undercoding.points, undercoding.reason));
        if decision.gated_therapy > 10.0 {
            reasoning.push(format!(
                "  (Secondary: {:.1}pts therapy coding)",
                decision.gated_therapy
            ));
        }
        undercoding.points
    };

    let procedure = &decision.procedure;
    if procedure.points > 0.0 {
        pain = (pain + procedure.points).min(MAX_PAIN);
        if let Some(reason) = &procedure.reason {
            reasoning.push(format!("+{:.1}pts: {reason}", procedure.points));
        }
    }

    PainScore {
        breakdown: PainBreakdown {
            total: round1(pain),
            undercoding: undercoding.points,
            therapy: decision.gated_therapy,
            procedure: procedure.points,
            ..PainBreakdown::default()
        },
        reasoning,
        confidence: if pain >= 30.0 { 50 } else { 0 },
    }
}
