//! Aggregation pipeline recognition.
//!
//! Pipelines are not interpreted stage by stage. A raw pipeline is matched against the
//! small set of shapes in [`Aggregation`]; anything else is unrecognised and produces
//! an empty result. Stage arguments are not inspected.

use bson::Document;

pub const UNWIND: &str = "$unwind";
pub const GROUP: &str = "$group";

/// Nested array whose distinct values the three-stage unwind/group shape yields.
pub const SCHEDULE_DAYS_PATH: [&str; 2] = ["schedule_details", "days"];

/// The aggregation shapes a collection knows how to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Every distinct value found in the array at `path` across all documents,
    /// sorted ascending, one `{ "_id": value }` record per value.
    DistinctNestedArrayValues {
        path: Vec<String>,
    },
}

impl Aggregation {
    /// The distinct weekdays across every activity's `schedule_details.days`.
    pub fn distinct_schedule_days() -> Self {
        Aggregation::DistinctNestedArrayValues {
            path: SCHEDULE_DAYS_PATH
                .iter()
                .map(|segment| segment.to_string())
                .collect(),
        }
    }

    /// Matches a raw pipeline against the known shapes.
    ///
    /// Any three-stage pipeline with `$unwind` in the first stage and `$group` in the
    /// second is [`Aggregation::distinct_schedule_days`], whatever the stage arguments.
    /// Returns `None` for every other pipeline.
    pub fn recognize(pipeline: &[Document]) -> Option<Self> {
        match pipeline {
            [unwind, group, _] if unwind.contains_key(UNWIND) && group.contains_key(GROUP) => {
                Some(Aggregation::distinct_schedule_days())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn days_pipeline() -> Vec<Document> {
        vec![
            doc! { "$unwind": "$schedule_details.days" },
            doc! { "$group": { "_id": "$schedule_details.days" } },
            doc! { "$sort": { "_id": 1 } },
        ]
    }

    #[test]
    fn recognizes_distinct_days_pipeline() {
        assert_eq!(
            Aggregation::recognize(&days_pipeline()),
            Some(Aggregation::DistinctNestedArrayValues {
                path: vec!["schedule_details".into(), "days".into()],
            })
        );
    }

    #[test]
    fn recognizes_on_shape_regardless_of_stage_arguments() {
        let pipeline = days_pipeline();

        for unwind in [
            doc! { "$unwind": "$participants" },
            doc! { "$unwind": "schedule_details.days" },
            doc! { "$unwind": { "path": "$tags" } },
        ] {
            assert_eq!(
                Aggregation::recognize(&[unwind, doc! { "$group": {} }, doc! {}]),
                Some(Aggregation::distinct_schedule_days())
            );
        }
        assert_eq!(
            Aggregation::recognize(&[pipeline[0].clone(), pipeline[1].clone(), doc! { "$limit": 1 }]),
            Some(Aggregation::distinct_schedule_days())
        );
    }

    #[test]
    fn rejects_other_shapes() {
        let pipeline = days_pipeline();

        assert_eq!(Aggregation::recognize(&pipeline[..2]), None);
        assert_eq!(Aggregation::recognize(&[]), None);
        assert_eq!(
            Aggregation::recognize(&[pipeline[1].clone(), pipeline[0].clone(), pipeline[2].clone()]),
            None
        );
        assert_eq!(
            Aggregation::recognize(&[pipeline[0].clone(), pipeline[1].clone(), pipeline[2].clone(), pipeline[2].clone()]),
            None
        );
    }
}
