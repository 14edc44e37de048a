use cookmate::corpus::{import_json, ImportReport};
use cookmate::db::{self, recipes};
use cookmate::Error;

const RECIPES: &str = r#"[
    {
        "title": "Simple Pancakes",
        "tags": ["breakfast", "vegetarian"],
        "difficulty": "easy",
        "prepTimeMin": 15,
        "ingredients": [
            {"name": "flour", "quantity": "200 g"},
            {"name": "egg", "quantity": "2"},
            {"name": "milk", "quantity": "300 ml"}
        ],
        "steps": [{"text": "Whisk everything", "duration_sec": 120}]
    },
    {
        "title": "Peanut Noodles",
        "ingredient_text": "noodles peanut butter soy sauce",
        "ingredients": ["noodles", "peanut butter", "soy sauce"],
        "steps": "oops"
    }
]"#;

#[tokio::test]
async fn test_import_is_idempotent_by_content_hash() {
    let pool = db::memory_pool()
        .await
        .expect("Failed to create in-memory database");

    let first = import_json(&pool, RECIPES).await.expect("First import failed");
    assert_eq!(
        first,
        ImportReport {
            imported: 2,
            duplicates: 0,
            skipped: 0
        }
    );

    let second = import_json(&pool, RECIPES).await.expect("Second import failed");
    assert_eq!(second.imported, 0);
    assert_eq!(second.duplicates, 2);

    assert_eq!(recipes::count_all_recipes(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_imported_documents_read_back() {
    let pool = db::memory_pool()
        .await
        .expect("Failed to create in-memory database");
    import_json(&pool, RECIPES).await.expect("Import failed");

    let docs = recipes::fetch_documents_after(&pool, 0, 10)
        .await
        .expect("Failed to fetch documents");
    assert_eq!(docs.len(), 2);

    let (_, pancakes) = &docs[0];
    assert_eq!(pancakes.title, "Simple Pancakes");
    assert_eq!(pancakes.tags, ["breakfast", "vegetarian"]);
    assert_eq!(pancakes.ingredients[0].quantity.as_deref(), Some("200 g"));
    assert_eq!(pancakes.steps[0].duration_sec, Some(120));
    assert_eq!(pancakes.prep_time_min, Some(15));
    assert_eq!(pancakes.ingredient_text.as_deref(), Some("flour egg milk"));

    let (_, noodles) = &docs[1];
    assert!(noodles.steps.is_empty());
    assert_eq!(
        noodles.ingredient_text.as_deref(),
        Some("noodles peanut butter soy sauce")
    );
}

#[tokio::test]
async fn test_malformed_import_input() {
    let pool = db::memory_pool()
        .await
        .expect("Failed to create in-memory database");

    let result = import_json(&pool, r#"{"recipes": []}"#).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let report = import_json(&pool, r#"[42, null, {"ingredients": ["salt"]}, {"title": "Toast"}]"#)
        .await
        .expect("Import failed");
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 3);
}
