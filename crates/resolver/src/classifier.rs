use crumbtrail_protocol::{ClassifiedSegment, SegmentKind, FLIGHTS_SEGMENT, PAYLOADS_SEGMENT};
use std::fmt;

/// The two kinds of segment that need a remote lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    Payload,
    Flight,
}

impl IdentifierKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payload => "payload",
            Self::Flight => "flight",
        }
    }

    #[must_use]
    pub const fn from_segment(kind: SegmentKind) -> Option<Self> {
        match kind {
            SegmentKind::PayloadId => Some(Self::Payload),
            SegmentKind::FlightId => Some(Self::Flight),
            SegmentKind::Literal => None,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which collection, if any, the previous segment opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    None,
    Payloads,
    Flights,
}

impl Anchor {
    fn after(segment: &str) -> Self {
        match segment {
            PAYLOADS_SEGMENT => Self::Payloads,
            FLIGHTS_SEGMENT => Self::Flights,
            _ => Self::None,
        }
    }

    fn kind_of(self, segment: &str) -> SegmentKind {
        match self {
            Self::Payloads if segment != FLIGHTS_SEGMENT => SegmentKind::PayloadId,
            Self::Flights => SegmentKind::FlightId,
            Self::Payloads | Self::None => SegmentKind::Literal,
        }
    }
}

/// Positional classifier for path segments.
pub struct SegmentClassifier;

impl SegmentClassifier {
    /// Single left-to-right pass; a segment's kind depends only on the raw
    /// value of the segment before it.
    #[must_use]
    pub fn classify(path: &[String]) -> Vec<ClassifiedSegment> {
        let mut anchor = Anchor::None;
        path.iter()
            .enumerate()
            .map(|(position, value)| {
                let kind = anchor.kind_of(value);
                anchor = Anchor::after(value);
                ClassifiedSegment {
                    value: value.clone(),
                    kind,
                    position,
                }
            })
            .collect()
    }

    /// Distinct identifiers in the path, in first-appearance order.
    #[must_use]
    pub fn identifiers(path: &[String]) -> Vec<(IdentifierKind, String)> {
        let mut out: Vec<(IdentifierKind, String)> = Vec::new();
        for segment in Self::classify(path) {
            let Some(kind) = IdentifierKind::from_segment(segment.kind) else {
                continue;
            };
            if !out.iter().any(|(k, id)| *k == kind && *id == segment.value) {
                out.push((kind, segment.value));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn path(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn kinds(raw: &[&str]) -> Vec<SegmentKind> {
        SegmentClassifier::classify(&path(raw))
            .into_iter()
            .map(|s| s.kind)
            .collect()
    }

    #[test]
    fn classifies_payload_and_flight_ids() {
        assert_eq!(
            kinds(&["payloads", "p1", "flights", "f1"]),
            vec![
                SegmentKind::Literal,
                SegmentKind::PayloadId,
                SegmentKind::Literal,
                SegmentKind::FlightId,
            ]
        );
    }

    #[test]
    fn flights_directly_after_payloads_stays_literal() {
        assert_eq!(
            kinds(&["payloads", "flights", "f9"]),
            vec![
                SegmentKind::Literal,
                SegmentKind::Literal,
                SegmentKind::FlightId,
            ]
        );
    }

    #[test]
    fn single_segment_is_literal() {
        assert_eq!(kinds(&["payloads"]), vec![SegmentKind::Literal]);
        assert_eq!(kinds(&["flights"]), vec![SegmentKind::Literal]);
        assert_eq!(kinds(&["p1"]), vec![SegmentKind::Literal]);
    }

    #[test]
    fn positions_follow_input_order() {
        let classified = SegmentClassifier::classify(&path(&["a", "payloads", "p1"]));
        let positions: Vec<usize> = classified.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(classified[2].value, "p1");
    }

    #[test]
    fn identifiers_are_distinct_per_kind() {
        let ids = SegmentClassifier::identifiers(&path(&[
            "payloads", "x", "flights", "x", "payloads", "x",
        ]));
        assert_eq!(
            ids,
            vec![
                (IdentifierKind::Payload, "x".to_string()),
                (IdentifierKind::Flight, "x".to_string()),
            ]
        );
    }

    proptest! {
        #[test]
        fn proptest_classification_is_deterministic(
            raw in proptest::collection::vec(
                prop_oneof![Just("payloads".to_string()), Just("flights".to_string()), "[a-z0-9-]{1,6}"],
                0..10,
            )
        ) {
            prop_assert_eq!(SegmentClassifier::classify(&raw), SegmentClassifier::classify(&raw));
        }

        #[test]
        fn proptest_collection_literals_never_follow_payloads_as_ids(
            raw in proptest::collection::vec(
                prop_oneof![Just("payloads".to_string()), Just("flights".to_string()), "[a-z0-9]{1,4}"],
                1..10,
            )
        ) {
            for segment in SegmentClassifier::classify(&raw) {
                if segment.position == 0 {
                    prop_assert_eq!(segment.kind, SegmentKind::Literal);
                }
                if segment.kind == SegmentKind::PayloadId {
                    prop_assert_ne!(segment.value.as_str(), "flights");
                    prop_assert_eq!(raw[segment.position - 1].as_str(), "payloads");
                }
                if segment.kind == SegmentKind::FlightId {
                    prop_assert_eq!(raw[segment.position - 1].as_str(), "flights");
                }
            }
        }
    }
}
