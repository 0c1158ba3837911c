use proptest::prelude::*;
use std::collections::BTreeMap;
use storyflame_core::{
    decode_projects, encode_projects, Chapter, ChapterId, MalformedDataError, Project, ProjectId,
};

const PROJECT_ID: &str = "11111111-2222-4333-8444-555555555555";
const CHAPTER_ID: &str = "66666666-7777-4888-9999-aaaaaaaaaaaa";

#[test]
fn encode_uses_persisted_field_names() {
    let project = Project::with_id(PROJECT_ID.into(), "Novel", "2024-05-01T10:00:00.000")
        .with_writing_goals(500, 80_000)
        .with_word_count_on("2024-05-01", 42)
        .with_chapters(vec![
            Chapter::with_id(CHAPTER_ID.into(), "Opening", 0).with_summary("Intro")
        ]);

    let text = encode_projects(&[project]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json[0]["id"], PROJECT_ID);
    assert_eq!(json[0]["name"], "Novel");
    assert_eq!(json[0]["creationDate"], "2024-05-01T10:00:00.000");
    assert_eq!(json[0]["dailyWritingGoal"], 500);
    assert_eq!(json[0]["totalWritingGoal"], 80_000);
    assert_eq!(json[0]["dailyWordCounts"]["2024-05-01"], 42);
    let chapter = &json[0]["chapters"][0];
    assert_eq!(chapter["id"], CHAPTER_ID);
    assert_eq!(chapter["title"], "Opening");
    assert_eq!(chapter["order"], 0);
    assert_eq!(chapter["content"], "");
    assert_eq!(chapter["summary"], "Intro");
    assert!(text.contains('\n'), "output should be pretty-printed");
}

#[test]
fn decode_fills_missing_content_and_summary() {
    let text = format!(
        r#"[{{"id":"{PROJECT_ID}","name":"Novel","creationDate":"2024-05-01T10:00:00",
            "chapters":[{{"id":"{CHAPTER_ID}","title":"Opening","order":0}}]}}]"#
    );

    let projects = decode_projects(&text).unwrap();

    let chapter = &projects[0].chapters[0];
    assert_eq!(chapter.title, "Opening");
    assert_eq!(chapter.content, "");
    assert_eq!(chapter.summary, "");
    assert!(projects[0].daily_word_counts.is_empty());
    assert_eq!(projects[0].daily_writing_goal, 0);
    assert_eq!(projects[0].total_writing_goal, 0);
}

#[test]
fn decode_keeps_id_text_verbatim() {
    let text = r#"[{"id":"proj-1","name":"Novel","creationDate":"2024-05-01",
        "chapters":[{"id":"6F9619FF-8B86-D011-B42D-00C04FC964FF","title":"Opening","order":0}]}]"#;

    let projects = decode_projects(text).unwrap();

    assert_eq!(projects[0].id, ProjectId::from("proj-1"));
    assert_eq!(
        projects[0].chapters[0].id,
        ChapterId::from("6F9619FF-8B86-D011-B42D-00C04FC964FF")
    );
    let encoded = encode_projects(&projects).unwrap();
    assert!(encoded.contains(r#""id": "proj-1""#));
    assert!(encoded.contains("6F9619FF-8B86-D011-B42D-00C04FC964FF"));
}

#[test]
fn decode_reads_writing_progress() {
    let text = format!(
        r#"[{{"id":"{PROJECT_ID}","name":"Novel","creationDate":"2024-05-01","chapters":[],
            "dailyWordCounts":{{"2024-05-01":10,"2024-05-02":250}},
            "dailyWritingGoal":300,"totalWritingGoal":60000}}]"#
    );

    let project = &decode_projects(&text).unwrap()[0];

    assert_eq!(project.daily_word_counts.get("2024-05-02"), Some(&250));
    assert_eq!(project.daily_writing_goal, 300);
    assert_eq!(project.total_writing_goal, 60_000);
}

#[test]
fn decode_rejects_missing_ids() {
    let text = r#"[{"name":"Novel","creationDate":"2024-05-01","chapters":[]}]"#;
    let err = decode_projects(text).unwrap_err();
    assert!(matches!(err, MalformedDataError::Json(_)));

    let text = format!(
        r#"[{{"id":"{PROJECT_ID}","name":"Novel","creationDate":"2024-05-01",
            "chapters":[{{"title":"Opening","order":0}}]}}]"#
    );
    assert!(decode_projects(&text).is_err());
}

#[test]
fn decode_rejects_negative_order() {
    let text = format!(
        r#"[{{"id":"{PROJECT_ID}","name":"Novel","creationDate":"2024-05-01",
            "chapters":[{{"id":"{CHAPTER_ID}","title":"Opening","order":-1}}]}}]"#
    );
    assert!(decode_projects(&text).is_err());
}

#[test]
fn decode_rejects_duplicate_identities() {
    let project = Project::new("Novel");
    let text = encode_projects(&[project.clone(), project]).unwrap();
    assert!(matches!(
        decode_projects(&text).unwrap_err(),
        MalformedDataError::DuplicateProjectId(_)
    ));

    let chapter = Chapter::new("Twice", 0);
    let project = Project::new("Novel").with_chapters(vec![chapter.clone(), chapter.with_order(1)]);
    let text = encode_projects(&[project]).unwrap();
    assert!(matches!(
        decode_projects(&text).unwrap_err(),
        MalformedDataError::DuplicateChapterId { .. }
    ));
}

#[test]
fn decode_rejects_non_array_documents() {
    assert!(decode_projects(r#"{"projects":[]}"#).is_err());
    assert!(decode_projects("").is_err());
}

fn chapter_strategy() -> impl Strategy<Value = Chapter> {
    (".*", ".*", any::<u32>(), ".*", ".*").prop_map(|(id, title, order, content, summary)| {
        Chapter::with_id(ChapterId::from(id), title, order)
            .with_content(content)
            .with_summary(summary)
    })
}

fn project_strategy() -> impl Strategy<Value = Project> {
    (
        ".*",
        ".*",
        ".*",
        prop::collection::vec(chapter_strategy(), 0..6),
        prop::collection::btree_map("[0-9]{4}-[0-9]{2}-[0-9]{2}", any::<usize>(), 0..4),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(
            |(id, name, creation_date, chapters, counts, daily_goal, total_goal)| {
                let mut project = Project::with_id(ProjectId::from(id), name, creation_date)
                    .with_chapters(chapters)
                    .with_writing_goals(daily_goal, total_goal);
                project.daily_word_counts = counts;
                project
            },
        )
}

/// Makes ids unique so the list passes identity validation.
fn with_unique_ids(projects: Vec<Project>) -> Vec<Project> {
    projects
        .into_iter()
        .enumerate()
        .map(|(index, project)| {
            let chapters = project
                .chapters
                .iter()
                .enumerate()
                .map(|(position, chapter)| Chapter {
                    id: ChapterId::from(format!("{}#{position}", chapter.id)),
                    ..chapter.clone()
                })
                .collect();
            Project {
                id: ProjectId::from(format!("{}#{index}", project.id)),
                ..project.with_chapters(chapters)
            }
        })
        .collect()
}

#[test]
fn empty_collections_survive_encoding() {
    let projects = vec![
        Project::with_id("".into(), "", ""),
        Project::new("Full").with_chapters(vec![
            Chapter::new("", 0).with_content("<p>rich</p>"),
            Chapter::new("Two", 1).with_summary("short"),
        ]),
    ];

    let decoded = decode_projects(&encode_projects(&projects).unwrap()).unwrap();

    assert_eq!(decoded, projects);
    assert_eq!(decoded[0].daily_word_counts, BTreeMap::new());
}

proptest! {
    #[test]
    fn encoded_projects_decode_to_equal_values(
        projects in prop::collection::vec(project_strategy(), 0..5)
    ) {
        let projects = with_unique_ids(projects);

        let text = encode_projects(&projects).unwrap();
        let decoded = decode_projects(&text).unwrap();

        prop_assert_eq!(decoded, projects);
    }
}
