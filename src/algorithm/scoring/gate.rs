//! Therapy relevance gate and signal arbitration
//!
//! Both are computed once per record and shared by the pain total, the
//! drivers and the pain label, so the three always agree.

use crate::algorithm::scoring::curves::{
    CurveScore, UNDERCODING_NATIONAL_AVG, score_psych_risk_continuous, score_undercoding_continuous,
};
use crate::algorithm::scoring::procedure::{ProcedureAlignment, score_procedure_alignment};
use crate::algorithm::scoring::quality::DataQualityEvent;
use crate::models::{OrgEnrichedRecord, ScoringTrack};

/// Psych share of ambulatory volume that must be exceeded
pub const MIN_PSYCH_SHARE: f64 = 0.20;
/// Psych codes needed for the psych signal to count
pub const MIN_PSYCH_VOLUME: f64 = 100.0;

/// Whether therapy coding is a meaningful part of an organization's volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TherapyGate {
    /// Psych codes / (psych + evaluation codes); 0 without evaluation volume
    pub psych_share: f64,
    pub psych_volume: f64,
    pub passed: bool,
}

impl TherapyGate {
    /// Evaluate the gate
    ///
    /// With missing or zero evaluation volume the share is forced to 0, so
    /// the gate stays closed whatever the psych volume.
    #[must_use]
    pub fn evaluate(total_psych_codes: Option<f64>, total_eval_codes: Option<f64>) -> Self {
        let psych_volume = total_psych_codes.unwrap_or(0.0);
        let psych_share = match total_eval_codes {
            Some(eval) if eval > 0.0 => {
                let combined = psych_volume + eval;
                if combined > 0.0 { psych_volume / combined } else { 0.0 }
            }
            _ => 0.0,
        };
        Self::from_share(psych_share, psych_volume)
    }

    /// Gate from an already computed share
    #[must_use]
    pub fn from_share(psych_share: f64, psych_volume: f64) -> Self {
        Self {
            psych_share,
            psych_volume,
            passed: psych_share > MIN_PSYCH_SHARE && psych_volume >= MIN_PSYCH_VOLUME,
        }
    }
}

/// Which signal drives undercoding-versus-therapy pain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantSignal {
    Undercoding,
    Therapy,
}

/// Every coding signal of a record, arbitrated once
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDecision {
    pub gate: TherapyGate,
    /// Undercoding ratio, 0 when missing
    pub undercoding_ratio: f64,
    /// Psych risk ratio, 0 when missing
    pub psych_risk_ratio: f64,
    pub undercoding: CurveScore,
    /// Ungated psych risk curve
    pub psych_risk: CurveScore,
    /// Psych risk points when the gate passed and a ratio exists, else 0
    pub gated_therapy: f64,
    /// Assessed on the ambulatory track only
    pub procedure: ProcedureAlignment,
    pub dominant: DominantSignal,
    /// Strong documentation with zero raw psych risk and zero procedure pain
    pub winning: bool,
}

impl SignalDecision {
    /// Derive the decision for a record on its track
    ///
    /// Returns the procedure-alignment data-quality event when the record
    /// was assessed.
    #[must_use]
    pub fn evaluate(record: &OrgEnrichedRecord, track: ScoringTrack) -> (Self, Option<DataQualityEvent>) {
        let gate = TherapyGate::evaluate(record.total_psych_codes, record.total_eval_codes);
        let undercoding = score_undercoding_continuous(record.undercoding_ratio);
        let psych_risk = score_psych_risk_continuous(record.psych_risk_ratio);
        let psych_risk_ratio = record.psych_risk_ratio.unwrap_or(0.0);
        let undercoding_ratio = record.undercoding_ratio.unwrap_or(0.0);

        let gated_therapy = if gate.passed && psych_risk_ratio > 0.0 {
            psych_risk.points
        } else {
            0.0
        };

        let (procedure, event) = match track {
            ScoringTrack::Ambulatory => score_procedure_alignment(record),
            _ => (ProcedureAlignment::not_applicable(), None),
        };

        let dominant = if gated_therapy > undercoding.points {
            DominantSignal::Therapy
        } else {
            DominantSignal::Undercoding
        };
        let winning = undercoding_ratio >= UNDERCODING_NATIONAL_AVG
            && psych_risk.points == 0.0
            && match track {
                ScoringTrack::Ambulatory => procedure.points == 0.0,
                ScoringTrack::Behavioral | ScoringTrack::PostAcute => true,
            };

        (
            Self {
                gate,
                undercoding_ratio,
                psych_risk_ratio,
                undercoding,
                psych_risk,
                gated_therapy,
                procedure,
                dominant,
                winning,
            },
            event,
        )
    }

    #[must_use]
    pub fn therapy_dominates(&self) -> bool {
        self.dominant == DominantSignal::Therapy
    }
}
