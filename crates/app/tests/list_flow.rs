use app::ListPage;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn labels_follow_conventional_column_order() {
    let mut page = ListPage::new("person");
    page.set_rows(vec![
        json!({ "id": "1", "full_name": "Ada Lovelace" }),
        json!({ "id": "2", "email": "grace@example.com" }),
        json!({ "id": "3" }),
        json!({}),
    ]);

    assert_eq!(
        page.labels(),
        vec!["Ada Lovelace", "grace@example.com", "3", "Untitled"]
    );
    assert_eq!(page.error(), None);
}
