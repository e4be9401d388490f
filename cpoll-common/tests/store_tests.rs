//! Response store tests run against both backends through `open_store`

use cpoll_common::config::{StorageBackend, StorageConfig};
use cpoll_common::models::ResponseSubmission;
use cpoll_common::reference::ReferenceData;
use cpoll_common::store::open_store;
use cpoll_common::validation::validate_submission;
use cpoll_common::NewResponse;
use std::path::Path;

fn storage_config(backend: StorageBackend, dir: &Path) -> StorageConfig {
    StorageConfig {
        backend,
        file_path: dir.join("responses.json"),
        database_path: dir.join("cpoll.db"),
    }
}

fn submission(name: &str, phone: Option<&str>) -> NewResponse {
    let raw = ResponseSubmission {
        language: "English".to_string(),
        name: name.to_string(),
        state: "Osun".to_string(),
        lga: "Ife Central".to_string(),
        ward: "Ward 11".to_string(),
        age: "50+ years".to_string(),
        gender: "female".to_string(),
        knows_romeo: "Yes".to_string(),
        knows_muyideen: "No".to_string(),
        knows_abdulrasheed: "Yes".to_string(),
        heard_savewell: "No".to_string(),
        residence: "Opa Quarters, Ile-Ife".to_string(),
        phone: phone.map(str::to_string),
    };
    validate_submission(&raw, &ReferenceData::embedded().unwrap()).unwrap()
}

#[tokio::test]
async fn test_round_trip_both_backends() {
    for backend in [StorageBackend::File, StorageBackend::Sql] {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&storage_config(backend, dir.path()))
            .await
            .unwrap();

        let with_phone = submission("Bisi", Some("08031234567"));
        let without_phone = submission("Tunde", None);
        let stored_a = store.append(&with_phone).await.unwrap();
        let stored_b = store.append(&without_phone).await.unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 2, "backend {}", store.backend_name());

        for stored in [&stored_a, &stored_b] {
            let found = listed
                .iter()
                .find(|r| r.name == stored.name)
                .expect("stored record listed");
            assert!(found.same_content(stored), "backend {}", store.backend_name());
            assert!(found.created_at.is_some());
        }

        let expected = with_phone.to_record(None, chrono::Utc::now());
        assert!(stored_a.same_content(&expected));
    }
}

#[tokio::test]
async fn test_backend_names() {
    let dir = tempfile::tempdir().unwrap();
    let file = open_store(&storage_config(StorageBackend::File, dir.path()))
        .await
        .unwrap();
    let sql = open_store(&storage_config(StorageBackend::Sql, dir.path()))
        .await
        .unwrap();
    assert_eq!(file.backend_name(), "file");
    assert_eq!(sql.backend_name(), "sql");
}

#[tokio::test]
async fn test_sql_assigns_ids_file_does_not() {
    let dir = tempfile::tempdir().unwrap();
    let file = open_store(&storage_config(StorageBackend::File, dir.path()))
        .await
        .unwrap();
    let sql = open_store(&storage_config(StorageBackend::Sql, dir.path()))
        .await
        .unwrap();

    let response = submission("Kemi", None);
    assert!(file.append(&response).await.unwrap().id.is_none());
    assert!(sql.append(&response).await.unwrap().id.is_some());
}

#[tokio::test]
async fn test_file_backend_tolerates_corrupt_line() {
    let dir = tempfile::tempdir().unwrap();
    let config = storage_config(StorageBackend::File, dir.path());
    let store = open_store(&config).await.unwrap();

    store.append(&submission("before", None)).await.unwrap();
    {
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .open(&config.file_path)
            .unwrap();
        writeln!(f, "{{\"name\": \"truncated").unwrap();
    }
    store.append(&submission("after", None)).await.unwrap();

    let names: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["before", "after"]);
}

#[tokio::test]
async fn test_file_append_after_unterminated_line_is_listed() {
    let dir = tempfile::tempdir().unwrap();
    let config = storage_config(StorageBackend::File, dir.path());
    std::fs::write(&config.file_path, "{\"name\":\"torn").unwrap();

    let store = open_store(&config).await.unwrap();
    store.append(&submission("after torn write", None)).await.unwrap();
    store.append(&submission("next", None)).await.unwrap();

    let names: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["after torn write", "next"]);

    let content = std::fs::read_to_string(&config.file_path).unwrap();
    assert!(content.starts_with("{\"name\":\"torn\n"));
}
