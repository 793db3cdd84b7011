use bson::{Bson, Document, doc};
use docshim_core::{
    error::DocumentStoreError,
    query::Query,
    update::Update,
};
use docshim_memory::InMemoryCollection;

fn strings(values: &[&str]) -> Vec<Bson> {
    values
        .iter()
        .map(|value| Bson::from(*value))
        .collect()
}

fn activity(name: &str, days: &[&str], participants: &[&str]) -> Document {
    doc! {
        "_id": name,
        "description": format!("{name} description"),
        "schedule_details": { "days": strings(days), "start_time": "15:15", "end_time": "16:45" },
        "max_participants": 12,
        "participants": strings(participants),
    }
}

fn activities() -> InMemoryCollection {
    let mut collection = InMemoryCollection::new("activities");
    collection
        .init_if_empty(vec![
            activity("Chess Club", &["Monday", "Friday"], &["michael@mergington.edu"]),
            activity("Math Club", &["Tuesday"], &["james@mergington.edu"]),
            activity("Drama Club", &["Monday"], &[]),
        ])
        .expect("seed should insert");
    collection
}

fn days_pipeline() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$schedule_details.days" },
        doc! { "$group": { "_id": "$schedule_details.days" } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

fn ids(documents: &[Document]) -> Vec<&str> {
    documents
        .iter()
        .map(|document| document.get_str("_id").expect("every result carries an _id"))
        .collect()
}

#[test]
fn insert_then_find_by_id_round_trips() {
    let mut collection = InMemoryCollection::new("activities");
    let original = activity("Art Club", &["Thursday"], &["amelia@mergington.edu", "harper@mergington.edu"]);

    let inserted = collection.insert_one(original.clone()).expect("insert should work");
    assert_eq!(inserted.inserted_id, "Art Club");

    let found = collection
        .find_one(&Query::by_id("Art Club"))
        .expect("document should be found");
    assert_eq!(found, original);
}

#[test]
fn insert_without_id_fails_loudly() {
    let mut collection = activities();

    let err = collection
        .insert_one(doc! { "description": "no id" })
        .unwrap_err();

    assert!(matches!(err, DocumentStoreError::MissingId(name) if name == "activities"));
    assert_eq!(collection.len(), 3);
}

#[test]
fn insert_with_existing_id_overwrites_in_place() {
    let mut collection = activities();

    collection
        .insert_one(doc! { "_id": "Chess Club", "description": "replaced" })
        .expect("insert should work");

    let all = collection.find(&Query::all());
    assert_eq!(ids(&all), vec!["Chess Club", "Math Club", "Drama Club"]);
    assert_eq!(all[0], doc! { "_id": "Chess Club", "description": "replaced" });
}

#[test]
fn find_keeps_insertion_order_and_returns_empty_on_no_match() {
    let collection = activities();

    assert_eq!(ids(&collection.find(&Query::all())), vec!["Chess Club", "Math Club", "Drama Club"]);
    assert!(collection.find(&Query::by_id("Soccer Team")).is_empty());
    assert!(collection.find_one(&Query::by_id("Soccer Team")).is_none());
}

#[test]
fn dotted_path_set_membership_query() {
    let mut collection = InMemoryCollection::new("activities");
    collection.insert_one(activity("Chess Club", &["Monday", "Friday"], &[])).unwrap();
    collection.insert_one(activity("Math Club", &["Tuesday"], &[])).unwrap();

    let query = Query::try_from(doc! { "schedule_details.days": { "$in": ["Monday"] } }).unwrap();

    assert_eq!(ids(&collection.find(&query)), vec!["Chess Club"]);
}

#[test]
fn combined_clauses_are_anded() {
    let collection = activities();
    let query = Query::try_from(doc! {
        "schedule_details.days": { "$in": ["Monday"] },
        "participants": ["michael@mergington.edu"],
    })
    .unwrap();

    assert_eq!(ids(&collection.find(&query)), vec!["Chess Club"]);
}

#[test]
fn push_then_pull_participants() {
    let mut collection = InMemoryCollection::new("activities");
    collection
        .insert_one(doc! { "_id": "Chess Club", "participants": ["a@x.edu"] })
        .unwrap();
    let by_id = Query::by_id("Chess Club");

    let pushed = collection
        .update_one(&by_id, &Update::try_from(doc! { "$push": { "participants": "b@x.edu" } }).unwrap())
        .unwrap();
    assert_eq!(pushed.modified_count, 1);
    assert_eq!(
        collection.find_one(&by_id).unwrap().get_array("participants").unwrap(),
        &vec![Bson::from("a@x.edu"), Bson::from("b@x.edu")]
    );

    let pulled = collection
        .update_one(&by_id, &Update::try_from(doc! { "$pull": { "participants": "a@x.edu" } }).unwrap())
        .unwrap();
    assert_eq!(pulled.modified_count, 1);
    assert_eq!(
        collection.find_one(&by_id).unwrap().get_array("participants").unwrap(),
        &vec![Bson::from("b@x.edu")]
    );
}

#[test]
fn push_creates_missing_array_and_pull_removes_one_occurrence() {
    let mut collection = InMemoryCollection::new("activities");
    collection.insert_one(doc! { "_id": "Chess Club" }).unwrap();
    let by_id = Query::by_id("Chess Club");

    collection
        .update_one(&by_id, &Update::builder().push("waitlist", "a@x.edu").push("waitlist", "a@x.edu").build())
        .unwrap();
    collection
        .update_one(&by_id, &Update::builder().pull("waitlist", "a@x.edu").pull("missing", "a@x.edu").build())
        .unwrap();

    assert_eq!(
        collection.find_one(&by_id).unwrap(),
        doc! { "_id": "Chess Club", "waitlist": ["a@x.edu"] }
    );
}

#[test]
fn operations_in_one_update_see_earlier_ones() {
    let mut collection = InMemoryCollection::new("activities");
    collection.insert_one(doc! { "_id": "Chess Club", "participants": [] }).unwrap();
    let by_id = Query::by_id("Chess Club");

    let update = Update::try_from(doc! {
        "$push": { "participants": "a@x.edu" },
        "$pull": { "participants": "a@x.edu" },
    })
    .unwrap();
    collection.update_one(&by_id, &update).unwrap();

    assert_eq!(
        collection.find_one(&by_id).unwrap().get_array("participants").unwrap(),
        &Vec::<Bson>::new()
    );
}

#[test]
fn update_on_missing_id_reports_zero_modified() {
    let mut collection = activities();
    let before = collection.find(&Query::all());

    let result = collection
        .update_one(&Query::by_id("nonexistent"), &Update::builder().push("participants", "x@x.edu").build())
        .unwrap();

    assert_eq!(result.modified_count, 0);
    assert_eq!(collection.find(&Query::all()), before);
}

#[test]
fn array_operator_on_scalar_field_is_rejected_without_mutation() {
    let mut collection = activities();
    let by_id = Query::by_id("Chess Club");
    let before = collection.find_one(&by_id).unwrap();

    let update = Update::builder()
        .push("participants", "new@mergington.edu")
        .push("description", "oops")
        .build();
    let err = collection.update_one(&by_id, &update).unwrap_err();

    assert!(matches!(
        err,
        DocumentStoreError::TypeMismatch { ref field, expected: "array", found: "string" } if field == "description"
    ));
    assert_eq!(collection.find_one(&by_id).unwrap(), before);
}

#[test]
fn aggregation_returns_distinct_sorted_days() {
    let mut collection = InMemoryCollection::new("activities");
    collection.insert_one(activity("Chess Club", &["Monday", "Friday"], &[])).unwrap();
    collection.insert_one(activity("Math Club", &["Tuesday"], &[])).unwrap();
    collection.insert_one(activity("Drama Club", &["Monday"], &[])).unwrap();
    collection.insert_one(doc! { "_id": "Unscheduled" }).unwrap();

    assert_eq!(
        collection.aggregate(&days_pipeline()),
        vec![
            doc! { "_id": "Friday" },
            doc! { "_id": "Monday" },
            doc! { "_id": "Tuesday" },
        ]
    );
}

#[test]
fn unrecognised_pipeline_returns_no_records() {
    let collection = activities();
    let pipeline = days_pipeline();

    assert!(collection.aggregate(&pipeline[..2]).is_empty());
    assert!(collection.aggregate(&[doc! { "$match": {} }, pipeline[1].clone(), pipeline[2].clone()]).is_empty());
}

#[test]
fn count_matches_find_length() {
    let collection = activities();
    let queries = vec![
        Query::all(),
        Query::by_id("Chess Club"),
        Query::by_id("nonexistent"),
        Query::builder().any_of("schedule_details.days", vec!["Monday"]).build(),
        Query::builder().eq("max_participants", 12).build(),
        Query::builder().exists("schedule_details.start_time").eq("max_participants", 13).build(),
    ];

    for query in queries {
        assert_eq!(collection.count_documents(&query), collection.find(&query).len() as u64);
    }
}

#[test]
fn seeding_is_idempotent() {
    let mut collection = activities();
    let before = collection.find(&Query::all());

    let inserted = collection
        .init_if_empty(vec![activity("Soccer Team", &["Tuesday"], &[])])
        .unwrap();

    assert_eq!(inserted, 0);
    assert_eq!(collection.find(&Query::all()), before);
}

#[test]
fn seeding_with_an_invalid_record_inserts_nothing() {
    let mut collection = InMemoryCollection::builder("activities").capacity(4).build();

    let err = collection
        .init_if_empty(vec![activity("Chess Club", &[], &[]), doc! { "description": "no id" }])
        .unwrap_err();

    assert!(matches!(err, DocumentStoreError::MissingId(_)));
    assert!(collection.is_empty());
}

#[test]
fn aggregation_ignores_stage_arguments() {
    let collection = activities();
    let pipelines = vec![
        vec![doc! { "$unwind": "$participants" }, doc! { "$group": { "_id": "$participants" } }, doc! { "$sort": { "_id": 1 } }],
        vec![doc! { "$unwind": "schedule_details.days" }, doc! { "$group": {} }, doc! {}],
    ];

    for pipeline in pipelines {
        assert_eq!(
            collection.aggregate(&pipeline),
            vec![
                doc! { "_id": "Friday" },
                doc! { "_id": "Monday" },
                doc! { "_id": "Tuesday" },
            ]
        );
    }
}

#[test]
fn aggregation_over_nan_values_is_ordered_and_distinct() {
    let mut collection = InMemoryCollection::new("activities");
    let days = (0..64)
        .map(|i| if i % 5 == 0 { f64::NAN } else { ((i * 37) % 64) as f64 })
        .map(Bson::Double)
        .collect::<Vec<_>>();
    collection
        .insert_one(doc! { "_id": "Numbers", "schedule_details": { "days": days } })
        .unwrap();

    let values = collection
        .aggregate(&days_pipeline())
        .into_iter()
        .map(|record| record.get_f64("_id").unwrap())
        .collect::<Vec<_>>();

    assert!(values[0].is_nan());
    assert!(values[1..].iter().all(|value| !value.is_nan()));
    assert!(values[1..].windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn aggregation_emits_repeated_mappings_once() {
    let mut collection = InMemoryCollection::new("activities");
    collection
        .insert_one(doc! {
            "_id": "Rotating Club",
            "schedule_details": { "days": [{ "a": 1 }, { "b": 2 }, { "a": 1 }, ["x"], ["x"]] },
        })
        .unwrap();

    assert_eq!(
        collection.aggregate(&days_pipeline()),
        vec![
            doc! { "_id": { "a": 1 } },
            doc! { "_id": { "b": 2 } },
            doc! { "_id": ["x"] },
        ]
    );
}
