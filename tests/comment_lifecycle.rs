use dangermeter::comments::{
    create_comment, delete_comment, sanitize, CommentError, NewComment, ANONYMOUS_AUTHOR,
};
use dangermeter::score::DangerClass;
use dangermeter::store::{DocumentStore, FsDocumentStore};

fn store() -> (tempfile::TempDir, FsDocumentStore) {
    let tmp = tempfile::tempdir().unwrap();
    let store = FsDocumentStore::new(
        tmp.path().join("data/danger.json"),
        tmp.path().join("danger.seed.json"),
    );
    (tmp, store)
}

fn text_comment(text: &str) -> NewComment {
    NewComment {
        text: Some(text.into()),
        ..NewComment::default()
    }
}

#[tokio::test]
async fn create_on_empty_store_scores_ten() {
    let (_tmp, s) = store();
    let created = create_comment(&s, text_comment("hi")).await.unwrap();
    assert_eq!(created.score, 10);
    assert_eq!(created.comment.text, "hi");
    assert_eq!(created.comment.author, ANONYMOUS_AUTHOR);
    assert_eq!(created.comment.evaluation_type, "dislike");
    assert_eq!(created.comment.id, created.comment.timestamp);

    let doc = s.load().await;
    assert_eq!(doc.settings.current_score, 10);
    assert_eq!(doc.settings.danger_level.classification, DangerClass::Low);
    assert_eq!(doc.evaluations.total_comments, 1);
    assert_eq!(doc.evaluations.total_dislikes, 1);
    assert_eq!(doc.evaluations.total_likes, 0);
}

#[tokio::test]
async fn crossing_thirty_reclassifies_to_medium() {
    let (_tmp, s) = store();
    let mut doc = s.load().await;
    doc.set_score(25);
    s.save(&mut doc).await.unwrap();

    let created = create_comment(&s, text_comment("one more")).await.unwrap();
    assert_eq!(created.score, 35);
    let doc = s.load().await;
    assert_eq!(doc.settings.danger_level.classification, DangerClass::Medium);
}

#[tokio::test]
async fn comments_are_newest_first() {
    let (_tmp, s) = store();
    create_comment(&s, text_comment("first")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    create_comment(&s, text_comment("second")).await.unwrap();

    let doc = s.load().await;
    assert_eq!(doc.evaluations.comments.len(), 2);
    assert_eq!(doc.evaluations.comments[0].text, "second");
    assert_eq!(doc.evaluations.comments[1].text, "first");
    assert!(doc.evaluations.comments[0].id > doc.evaluations.comments[1].id);
}

#[tokio::test]
async fn empty_submission_is_rejected_before_any_write() {
    let (_tmp, s) = store();
    let err = create_comment(&s, NewComment::default()).await.unwrap_err();
    assert!(matches!(err, CommentError::Empty));

    let err = create_comment(&s, text_comment("")).await.unwrap_err();
    assert!(matches!(err, CommentError::Empty));

    // nothing was persisted
    assert!(!s.primary_path().exists());
}

#[tokio::test]
async fn attachment_alone_is_enough() {
    let (_tmp, s) = store();
    let new = NewComment {
        attachment: Some(serde_json::json!({
            "nome": "foto.png",
            "tipo": "image/png",
            "dados": "aGVsbG8="
        })),
        ..NewComment::default()
    };
    let created = create_comment(&s, new).await.unwrap();
    assert_eq!(created.comment.text, "");
    assert!(created.comment.attachment.is_some());
}

#[tokio::test]
async fn oversized_attachment_is_rejected() {
    let (_tmp, s) = store();
    let new = NewComment {
        text: Some("with file".into()),
        attachment: Some(serde_json::json!({
            "dados": "a".repeat(10 * 1024 * 1024 + 1)
        })),
        ..NewComment::default()
    };
    let err = create_comment(&s, new).await.unwrap_err();
    assert!(matches!(err, CommentError::AttachmentTooLarge));
    assert!(!s.primary_path().exists());
}

#[tokio::test]
async fn text_and_author_are_sanitized_and_truncated() {
    let (_tmp, s) = store();
    let new = NewComment {
        text: Some("<script>alert(\"x\")</script>".into()),
        author: Some("a'b".into()),
        ..NewComment::default()
    };
    let created = create_comment(&s, new).await.unwrap();
    assert_eq!(
        created.comment.text,
        "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
    );
    assert_eq!(created.comment.author, "a&#039;b");

    let long = "x".repeat(2000);
    let created = create_comment(&s, text_comment(&long)).await.unwrap();
    assert_eq!(created.comment.text.chars().count(), 1000);
}

#[test]
fn sanitize_leaves_ampersand_alone() {
    assert_eq!(sanitize("a & b"), "a & b");
    assert_eq!(sanitize("<>\"'"), "&lt;&gt;&quot;&#039;");
}

#[tokio::test]
async fn anonymous_flag_overrides_author() {
    let (_tmp, s) = store();
    let new = NewComment {
        text: Some("x".into()),
        author: Some("Maria".into()),
        anonymous: true,
        ..NewComment::default()
    };
    let created = create_comment(&s, new).await.unwrap();
    assert_eq!(created.comment.author, ANONYMOUS_AUTHOR);
    assert!(created.comment.anonymous);
}

#[tokio::test]
async fn delete_requires_the_exact_password() {
    let (_tmp, s) = store();
    let created = create_comment(&s, text_comment("hi")).await.unwrap();

    let err = delete_comment(&s, created.comment.id, "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, CommentError::WrongPassword));

    // document untouched
    let doc = s.load().await;
    assert_eq!(doc.evaluations.total_comments, 1);
    assert_eq!(doc.settings.current_score, 10);
}

#[tokio::test]
async fn delete_reverses_the_score() {
    let (_tmp, s) = store();
    let created = create_comment(&s, text_comment("hi")).await.unwrap();
    let password = s.load().await.settings.deletion_password;

    let score = delete_comment(&s, created.comment.id, &password)
        .await
        .unwrap();
    assert_eq!(score, 0);

    let doc = s.load().await;
    assert_eq!(doc.evaluations.total_comments, 0);
    assert_eq!(doc.evaluations.total_dislikes, 0);
    assert!(doc.evaluations.comments.is_empty());
    assert_eq!(doc.settings.danger_level.classification, DangerClass::Low);
}

#[tokio::test]
async fn deleting_an_absent_id_succeeds_and_changes_nothing() {
    let (_tmp, s) = store();
    create_comment(&s, text_comment("hi")).await.unwrap();
    let password = s.load().await.settings.deletion_password;

    let score = delete_comment(&s, 123456789, &password).await.unwrap();
    assert_eq!(score, 10);
    let doc = s.load().await;
    assert_eq!(doc.evaluations.total_comments, 1);
}

#[tokio::test]
async fn score_never_goes_negative_on_delete() {
    let (_tmp, s) = store();
    let created = create_comment(&s, text_comment("hi")).await.unwrap();
    let mut doc = s.load().await;
    // points raised after the comment was scored with the old value
    doc.settings.points_per_evaluation = 50;
    doc.set_score(10);
    s.save(&mut doc).await.unwrap();

    let password = doc.settings.deletion_password.clone();
    let score = delete_comment(&s, created.comment.id, &password)
        .await
        .unwrap();
    assert_eq!(score, 0);
}
