use serde::Serialize;

use crate::domain::models::invite::InviteWithResponses;
use crate::domain::models::response::{Answer, Response};

/// Refusals after which a further "no" demands a reason.
pub const REFUSAL_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerCounts {
    pub yes: u32,
    pub maybe: u32,
    pub no: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteMetrics {
    #[serde(flatten)]
    pub counts: AnswerCounts,
    pub resistance_index: u32,
    pub resistance_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_invites: u32,
    pub total_responses: u32,
    pub success_rate: u32,
}

pub fn count_answers(responses: &[Response]) -> AnswerCounts {
    responses.iter().fold(AnswerCounts { yes: 0, maybe: 0, no: 0 }, |mut acc, r| {
        match r.answer {
            Answer::Yes => acc.yes += 1,
            Answer::Maybe => acc.maybe += 1,
            Answer::No => acc.no += 1,
        }
        acc
    })
}

/// min(round(no / 3 * 100), 100)
pub fn resistance_index(no_count: u32) -> u32 {
    let pct = (f64::from(no_count) / f64::from(REFUSAL_THRESHOLD) * 100.0).round() as u32;
    pct.min(100)
}

pub fn resistance_label(index: u32) -> &'static str {
    match index {
        i if i > 75 => "Resilient",
        i if i > 40 => "Hesitant",
        i if i > 0 => "Playful",
        _ => "Instant Yes!",
    }
}

pub fn invite_metrics(responses: &[Response]) -> InviteMetrics {
    let counts = count_answers(responses);
    let index = resistance_index(counts.no);
    InviteMetrics {
        counts,
        resistance_index: index,
        resistance_label: resistance_label(index),
    }
}

/// Share of invites with at least one "yes", as a rounded percentage.
pub fn success_rate(invites: &[InviteWithResponses]) -> u32 {
    if invites.is_empty() {
        return 0;
    }
    let accepted = invites.iter()
        .filter(|i| i.responses.iter().any(|r| r.answer == Answer::Yes))
        .count();
    ((accepted as f64 / invites.len() as f64) * 100.0).round() as u32
}

pub fn summarize(invites: &[InviteWithResponses]) -> DashboardSummary {
    DashboardSummary {
        total_invites: invites.len() as u32,
        total_responses: invites.iter().map(|i| i.responses.len() as u32).sum(),
        success_rate: success_rate(invites),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::invite::{Invite, NewInviteParams};
    use crate::domain::models::response::SubmitResponse;

    fn response(answer: Answer) -> Response {
        Response::from_submission(&SubmitResponse {
            invite_id: "i".into(),
            device_token: "d".into(),
            answer,
            responder_id: None,
            reason: None,
        })
    }

    fn invite_with(answers: &[Answer]) -> InviteWithResponses {
        InviteWithResponses {
            invite: Invite::new(NewInviteParams {
                creator_id: "c".into(),
                recipient_name: "Sam".into(),
                message: "Hi".into(),
                is_public: false,
                theme: None,
                occasion: None,
            }),
            responses: answers.iter().copied().map(response).collect(),
        }
    }

    #[test]
    fn test_resistance_index_formula_and_cap() {
        assert_eq!(resistance_index(0), 0);
        assert_eq!(resistance_index(1), 33);
        assert_eq!(resistance_index(2), 67);
        assert_eq!(resistance_index(3), 100);
        for n in 3..20 {
            assert_eq!(resistance_index(n), 100);
        }
    }

    #[test]
    fn test_resistance_labels() {
        assert_eq!(resistance_label(0), "Instant Yes!");
        assert_eq!(resistance_label(33), "Playful");
        assert_eq!(resistance_label(67), "Hesitant");
        assert_eq!(resistance_label(100), "Resilient");
    }

    #[test]
    fn test_invite_metrics_counts() {
        let invite = invite_with(&[Answer::No, Answer::No, Answer::Maybe, Answer::Yes]);
        let metrics = invite_metrics(&invite.responses);
        assert_eq!(metrics.counts, AnswerCounts { yes: 1, maybe: 1, no: 2 });
        assert_eq!(metrics.resistance_index, 67);
        assert_eq!(metrics.resistance_label, "Hesitant");
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(success_rate(&[]), 0);

        let invites = vec![
            invite_with(&[Answer::No, Answer::Yes]),
            invite_with(&[Answer::Maybe]),
            invite_with(&[]),
        ];
        assert_eq!(success_rate(&invites), 33);

        let summary = summarize(&invites);
        assert_eq!(summary.total_invites, 3);
        assert_eq!(summary.total_responses, 3);
    }
}
