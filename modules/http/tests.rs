use super::*;

#[cfg(test)]
mod router_tests {
    use super::*;
    use std::io::{Cursor, Read};
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::{ServerConfig, SplitSettings};
    use crate::file_splitter::{
        CellValue, DocumentLoader, DocumentWriter, TabularDocument, WorkbookReader, XlsxWriter,
    };
    use crate::split_job::SplitJob;

    const BOUNDARY: &str = "sheet-splitter-test-boundary";

    enum Part<'a> {
        File { name: &'a str, filename: &'a str, data: &'a [u8] },
        Text { name: &'a str, value: &'a str },
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::File { name, filename, data } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            name, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}", name, value)
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn split_request(parts: &[Part]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/split")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn app(dir: &TempDir, max_upload_bytes: usize) -> Router {
        let server = ServerConfig {
            upload_dir: dir.path().join("uploads"),
            max_upload_bytes,
            ..ServerConfig::default()
        };
        let state = AppState {
            job: Arc::new(SplitJob::new(server, SplitSettings::default())),
        };
        create_router(state, max_upload_bytes)
    }

    fn workbook(data_rows: usize) -> Vec<u8> {
        let rows = (0..data_rows)
            .map(|i| vec![CellValue::from(i as i64), CellValue::from(format!("row {}", i))])
            .collect();
        let doc = TabularDocument::new(vec!["A".into(), "B".into()], rows);
        XlsxWriter::new().write(&doc).unwrap()
    }

    async fn error_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn upload_dir_is_empty(dir: &TempDir) -> bool {
        let uploads = dir.path().join("uploads");
        !uploads.exists() || std::fs::read_dir(uploads).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let dir = TempDir::new().unwrap();

        let health = app(&dir, 1024)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(error_body(health).await["healthy"], true);

        let index = app(&dir, 1024)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(index.status(), StatusCode::OK);
        let html = to_bytes(index.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("enctype=\"multipart/form-data\""));
    }

    #[tokio::test]
    async fn test_split_returns_zip_of_chunks() {
        let dir = TempDir::new().unwrap();
        let data = workbook(5);

        let response = app(&dir, 10 * 1024 * 1024)
            .oneshot(split_request(&[
                Part::File { name: "file", filename: "sales report.xlsx", data: &data },
                Part::Text { name: "chunks", value: "2" },
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sales_report_chunks.zip\""
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let reader = WorkbookReader::new();
        let mut seen = Vec::new();
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            let doc = reader.load_bytes(&data).unwrap();
            assert_eq!(doc.header(), &[CellValue::from("A"), CellValue::from("B")]);
            seen.push((entry.name().to_string(), doc.data_row_count()));
        }
        assert_eq!(
            seen,
            vec![
                ("sales_report_chunk_1.xlsx".to_string(), 3),
                ("sales_report_chunk_2.xlsx".to_string(), 2),
            ]
        );
        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_chunks_default_to_two() {
        let dir = TempDir::new().unwrap();
        let data = workbook(4);

        let response = app(&dir, 10 * 1024 * 1024)
            .oneshot(split_request(&[Part::File { name: "file", filename: "d.xlsx", data: &data }]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(zip.len(), 2);
    }

    #[tokio::test]
    async fn test_huge_chunk_count_yields_one_chunk_per_row() {
        let dir = TempDir::new().unwrap();
        let data = workbook(3);

        let response = app(&dir, 10 * 1024 * 1024)
            .oneshot(split_request(&[
                Part::File { name: "file", filename: "d.xlsx", data: &data },
                Part::Text { name: "chunks", value: "1000000000000000" },
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let names: Vec<&str> = zip.file_names().collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"d_chunk_3.xlsx"));
        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let dir = TempDir::new().unwrap();
        let data = workbook(3);

        let cases: Vec<(Vec<Part>, &str, &str)> = vec![
            (
                vec![Part::Text { name: "chunks", value: "2" }],
                "No file part",
                "MISSING_FILE",
            ),
            (
                vec![Part::File { name: "file", filename: "", data: &data }],
                "No selected file",
                "EMPTY_FILENAME",
            ),
            (
                vec![Part::File { name: "file", filename: "data.csv", data: &data }],
                "File type not allowed",
                "FILE_TYPE_NOT_ALLOWED",
            ),
            (
                vec![
                    Part::File { name: "file", filename: "data.xlsx", data: &data },
                    Part::Text { name: "chunks", value: "many" },
                ],
                "Invalid number of chunks",
                "INVALID_CHUNK_COUNT",
            ),
            (
                vec![
                    Part::File { name: "file", filename: "data.xlsx", data: &data },
                    Part::Text { name: "chunks", value: "1" },
                ],
                "Number of chunks must be at least 2",
                "CHUNK_COUNT_TOO_SMALL",
            ),
        ];

        for (parts, message, code) in cases {
            let response = app(&dir, 10 * 1024 * 1024)
                .oneshot(split_request(&parts))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", message);
            let body = error_body(response).await;
            assert_eq!(body["error"], message);
            assert_eq!(body["code"], code);
        }
        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_unreadable_spreadsheet_is_server_error() {
        let dir = TempDir::new().unwrap();

        let response = app(&dir, 10 * 1024 * 1024)
            .oneshot(split_request(&[Part::File {
                name: "file",
                filename: "broken.xlsx",
                data: b"this is not a workbook",
            }]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(body["error"].as_str().unwrap().contains("broken.xlsx"));
        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let dir = TempDir::new().unwrap();
        let data = vec![b'x'; 8 * 1024];

        let response = app(&dir, 1024)
            .oneshot(split_request(&[Part::File { name: "file", filename: "big.xlsx", data: &data }]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(upload_dir_is_empty(&dir));
    }
}
